//! Error types for rollout operations.

use thiserror::Error;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Errors that can occur during a rollout run.
///
/// `Publish` and `Alias` failures propagate to the caller untouched; no
/// retry is attempted. `Telemetry` failures are caught at the health
/// check and treated as healthy — a monitoring outage must never trigger
/// a rollback on its own. `RolledBack` is the expected degradation
/// branch, raised only after the alias has been reverted.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("failed to publish revision: {0}")]
    Publish(String),

    #[error("alias operation failed: {0}")]
    Alias(String),

    #[error("telemetry query failed: {0}")]
    Telemetry(String),

    #[error("http client error: {0}")]
    Client(String),

    #[error(
        "rollout of {function} rolled back at {step_percent}%: \
         error rate {error_rate:.2}% exceeded threshold {threshold}%"
    )]
    RolledBack {
        function: String,
        step_percent: u32,
        error_rate: f64,
        threshold: f64,
    },
}
