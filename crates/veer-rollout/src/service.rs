//! Collaborator traits for the platform services the controller drives.
//!
//! The controller owns the rollout decisions; everything that touches the
//! platform goes through these two seams. `http` provides the production
//! implementations; tests substitute recording fakes.

use std::time::Duration;

use veer_core::{RevisionId, TrafficSplit};

use crate::error::RolloutResult;

/// Revision management: publish revisions and drive alias traffic splits.
#[allow(async_fn_in_trait)]
pub trait RevisionStore {
    /// Publish a new immutable revision of the function. Every call
    /// yields a fresh revision identifier.
    async fn publish_revision(&self, function: &str) -> RolloutResult<RevisionId>;

    /// Current primary revision of an alias, or `None` if the alias does
    /// not exist.
    async fn alias_target(
        &self,
        function: &str,
        alias: &str,
    ) -> RolloutResult<Option<RevisionId>>;

    /// Create an alias pointing at a revision with no traffic split.
    async fn create_alias(
        &self,
        function: &str,
        alias: &str,
        revision: &RevisionId,
    ) -> RolloutResult<()>;

    /// Replace the alias's traffic split.
    async fn update_alias(
        &self,
        function: &str,
        alias: &str,
        split: &TrafficSplit,
    ) -> RolloutResult<()>;
}

/// Windowed counter queries against the telemetry service.
#[allow(async_fn_in_trait)]
pub trait MetricsSource {
    /// Per-period sums for a named counter over a window ending now.
    /// The caller aggregates the datapoints itself.
    async fn query_sums(
        &self,
        function: &str,
        counter: &str,
        window: Duration,
    ) -> RolloutResult<Vec<f64>>;
}
