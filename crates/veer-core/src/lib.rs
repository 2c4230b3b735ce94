//! Veer shared types and configuration.
//!
//! This crate holds the vocabulary shared by the rollout controller and
//! the CLI: revision identifiers, traffic splits, and the `veer.toml`
//! deployment configuration.
//!
//! # Components
//!
//! - **`types`** — Revision identifiers and alias traffic splits
//! - **`config`** — `veer.toml` parsing (platform endpoints + deployments)
//! - **`error`** — Configuration error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{DeployConfig, PlatformConfig, RollbackThreshold, VeerConfig};
pub use error::{ConfigError, ConfigResult};
pub use types::{RevisionId, SecondaryWeight, TrafficSplit};
