//! Rollout controller — drives the traffic-shift loop.
//!
//! The controller publishes a new revision, then walks the configured
//! traffic percentages one at a time. After each shift it waits a fixed
//! observation interval, reads error telemetry, and reverts the alias to
//! the old revision if the error rate breaches the threshold. Only the
//! two terminal alias states are stable: all-old (rollback) or all-new
//! (success).

use std::time::Duration;

use tracing::{info, warn};

use veer_core::{DeployConfig, RevisionId, RollbackThreshold, TrafficSplit};

use crate::error::{RolloutError, RolloutResult};
use crate::service::{MetricsSource, RevisionStore};
use crate::telemetry::{self, ERRORS_COUNTER, HealthVerdict, INVOCATIONS_COUNTER};

/// Time to wait after each traffic shift before reading telemetry.
/// Unconditional; the observation pause is the point of the loop.
pub const OBSERVATION_INTERVAL: Duration = Duration::from_secs(60);

/// Summary of a completed rollout.
#[derive(Debug, Clone)]
pub struct RolloutReport {
    pub function: String,
    pub old_revision: RevisionId,
    pub new_revision: RevisionId,
    pub steps_completed: usize,
}

/// Drives one rollout at a time against the platform services.
///
/// Runs are strictly sequential; there is no cancellation once a run
/// starts, and concurrent runs against the same function+alias are
/// undefined behavior (the alias is assumed exclusively owned).
pub struct Deployer<R, M> {
    revisions: R,
    metrics: M,
}

impl<R: RevisionStore, M: MetricsSource> Deployer<R, M> {
    pub fn new(revisions: R, metrics: M) -> Self {
        Self { revisions, metrics }
    }

    /// Run a full rollout for one deployment entry.
    ///
    /// On success the alias routes 100% of traffic to the new revision.
    /// On an error-rate breach the alias is reverted to the old revision
    /// first, then [`RolloutError::RolledBack`] is returned. Revision
    /// store failures propagate untouched; nothing is retried.
    pub async fn deploy(&self, config: &DeployConfig) -> RolloutResult<RolloutReport> {
        info!(function = %config.function, alias = %config.alias, "starting rollout");

        let new = self.revisions.publish_revision(&config.function).await?;
        info!(function = %config.function, revision = %new, "published new revision");

        let old = self.resolve_old_revision(config).await?;
        info!(function = %config.function, revision = %old, "current alias target");

        let mut steps_completed = 0;
        for &percent in &config.steps {
            let split = TrafficSplit::weighted(new.clone(), old.clone(), percent);
            self.revisions
                .update_alias(&config.function, &config.alias, &split)
                .await?;
            info!(function = %config.function, percent, "shifted traffic to new revision");

            tokio::time::sleep(OBSERVATION_INTERVAL).await;

            match self.observed_health(&config.function, &config.rollback).await {
                HealthVerdict::Healthy => {
                    steps_completed += 1;
                }
                HealthVerdict::Degraded { error_rate } => {
                    warn!(
                        function = %config.function,
                        percent,
                        error_rate,
                        threshold = config.rollback.max_error_rate,
                        "error rate breached threshold, rolling back"
                    );
                    self.revisions
                        .update_alias(&config.function, &config.alias, &TrafficSplit::full(old.clone()))
                        .await?;
                    return Err(RolloutError::RolledBack {
                        function: config.function.clone(),
                        step_percent: percent,
                        error_rate,
                        threshold: config.rollback.max_error_rate,
                    });
                }
            }
        }

        // Full cutover, even when the step list stops short of 100.
        self.revisions
            .update_alias(&config.function, &config.alias, &TrafficSplit::full(new.clone()))
            .await?;
        info!(function = %config.function, revision = %new, "rollout complete");

        Ok(RolloutReport {
            function: config.function.clone(),
            old_revision: old,
            new_revision: new,
            steps_completed,
        })
    }

    /// Resolve the revision currently behind the alias.
    ///
    /// A missing alias is not an error: it is created pointing at the
    /// unpublished head, and the head is treated as the old revision.
    async fn resolve_old_revision(&self, config: &DeployConfig) -> RolloutResult<RevisionId> {
        if let Some(revision) = self
            .revisions
            .alias_target(&config.function, &config.alias)
            .await?
        {
            return Ok(revision);
        }

        let head = RevisionId::head();
        info!(
            function = %config.function,
            alias = %config.alias,
            "alias missing, creating at unpublished head"
        );
        self.revisions
            .create_alias(&config.function, &config.alias, &head)
            .await?;
        Ok(head)
    }

    /// Read windowed error telemetry and judge it against the threshold.
    ///
    /// Fails open: if either counter query errors, the step is treated as
    /// healthy. A monitoring outage is not evidence of a bad revision and
    /// must not cause a spurious rollback.
    async fn observed_health(
        &self,
        function: &str,
        threshold: &RollbackThreshold,
    ) -> HealthVerdict {
        let window = Duration::from_secs(threshold.window_secs);

        let (errors, invocations) = tokio::join!(
            self.metrics.query_sums(function, ERRORS_COUNTER, window),
            self.metrics.query_sums(function, INVOCATIONS_COUNTER, window),
        );

        let (errors, invocations) = match (errors, invocations) {
            (Ok(e), Ok(i)) => (telemetry::sum_datapoints(&e), telemetry::sum_datapoints(&i)),
            (Err(e), _) | (_, Err(e)) => {
                warn!(function, error = %e, "telemetry query failed, treating step as healthy");
                return HealthVerdict::Healthy;
            }
        };

        let verdict = telemetry::evaluate_window(errors, invocations, threshold.max_error_rate);
        if let HealthVerdict::Degraded { error_rate } = &verdict {
            info!(function, error_rate, "observed degraded error rate");
        }
        verdict
    }
}
