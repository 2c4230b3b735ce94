//! veer.toml configuration parser.
//!
//! A config file names the platform endpoints and one `[[deployment]]`
//! entry per function. Each deployment is immutable for the duration of
//! a run; the controller never writes configuration back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Top-level veer.toml contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeerConfig {
    pub platform: PlatformConfig,
    #[serde(rename = "deployment", default)]
    pub deployments: Vec<DeployConfig>,
}

/// Base URLs for the platform services the controller talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Revision store base URL (publish, aliases, traffic splits).
    pub revision_api: String,
    /// Metrics source base URL (windowed counter queries).
    pub metrics_api: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

/// One function's rollout plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Function to deploy.
    pub function: String,
    /// Alias whose traffic split is driven through the rollout.
    pub alias: String,
    /// Traffic percentages routed to the new revision, in rollout order.
    /// The controller applies them as given and always finishes with a
    /// full cutover, so the list does not need to end at 100.
    pub steps: Vec<u32>,
    /// When to abandon the rollout and revert.
    pub rollback: RollbackThreshold,
}

/// Error-rate threshold that triggers an automatic rollback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackThreshold {
    /// Maximum tolerated error rate, as a percentage of invocations.
    pub max_error_rate: f64,
    /// Telemetry observation window, in seconds, ending at check time.
    pub window_secs: u64,
}

impl VeerConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: VeerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Look up the deployment entry for a function.
    pub fn find(&self, function: &str) -> Option<&DeployConfig> {
        self.deployments.iter().find(|d| d.function == function)
    }

    /// Names of all configured functions, in file order.
    pub fn function_names(&self) -> Vec<&str> {
        self.deployments.iter().map(|d| d.function.as_str()).collect()
    }
}
