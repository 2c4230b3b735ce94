//! Veer deployment controller — gradual traffic shifting with rollback.
//!
//! This crate drives a function rollout through a configured sequence of
//! traffic percentages. After each shift it pauses for a fixed observation
//! interval, reads error telemetry for the function, and reverts the alias
//! to the old revision if the error rate breaches the configured threshold.
//!
//! # Components
//!
//! - **`controller`** — The [`Deployer`] rollout loop (shift, observe, revert)
//! - **`service`** — Collaborator traits ([`RevisionStore`], [`MetricsSource`])
//! - **`telemetry`** — Error-rate evaluation over an observation window
//! - **`http`** — HTTP implementations of the collaborator traits

pub mod controller;
pub mod error;
pub mod http;
pub mod service;
pub mod telemetry;

pub use controller::{Deployer, RolloutReport};
pub use error::{RolloutError, RolloutResult};
pub use http::{HttpMetricsSource, HttpRevisionStore};
pub use service::{MetricsSource, RevisionStore};
pub use telemetry::HealthVerdict;
