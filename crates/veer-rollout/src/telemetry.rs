//! Error-rate evaluation over an observation window.

/// Counter name for failed invocations.
pub const ERRORS_COUNTER: &str = "Errors";

/// Counter name for total invocations.
pub const INVOCATIONS_COUNTER: &str = "Invocations";

/// Outcome of one health check.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthVerdict {
    /// Error rate within threshold, or no traffic to judge by.
    Healthy,
    /// Error rate breached the threshold; the rollout must revert.
    Degraded { error_rate: f64 },
}

/// Evaluate summed window counters against a threshold percentage.
///
/// A window with zero invocations is healthy: absence of traffic is not
/// evidence of failure. The threshold comparison is strict, so a rate
/// exactly at the threshold passes.
pub fn evaluate_window(errors: f64, invocations: f64, max_error_rate: f64) -> HealthVerdict {
    if invocations <= 0.0 {
        return HealthVerdict::Healthy;
    }

    let error_rate = 100.0 * errors / invocations;
    if error_rate > max_error_rate {
        HealthVerdict::Degraded { error_rate }
    } else {
        HealthVerdict::Healthy
    }
}

/// Sum the per-period datapoints returned by the metrics source.
pub fn sum_datapoints(points: &[f64]) -> f64 {
    points.iter().sum()
}
