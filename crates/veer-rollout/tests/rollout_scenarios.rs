//! Config-driven rollout scenarios.
//!
//! Exercises the full path from a parsed veer.toml deployment entry
//! through the controller against fake platform services: a clean
//! multi-step rollout and a first-step threshold breach.

use std::sync::Mutex;
use std::time::Duration;

use veer_core::{RevisionId, TrafficSplit, VeerConfig};
use veer_rollout::telemetry::ERRORS_COUNTER;
use veer_rollout::{Deployer, MetricsSource, RevisionStore, RolloutError, RolloutResult};

const CONFIG: &str = r#"
[platform]
revision_api = "http://127.0.0.1:8443"
metrics_api = "http://127.0.0.1:8443"

[[deployment]]
function = "billing-webhook"
alias = "live"
steps = [10, 25, 50, 75]

[deployment.rollback]
max_error_rate = 5.0
window_secs = 300

[[deployment]]
function = "tenant-export"
alias = "live"
steps = [20, 50, 100]

[deployment.rollback]
max_error_rate = 3.0
window_secs = 180
"#;

/// Platform fake: alias starts at revision "4", publishes revision "5",
/// records every traffic-split update.
struct FakePlatform {
    updates: Mutex<Vec<TrafficSplit>>,
}

impl FakePlatform {
    fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
        }
    }

    fn updates(&self) -> Vec<TrafficSplit> {
        self.updates.lock().unwrap().clone()
    }
}

impl RevisionStore for &FakePlatform {
    async fn publish_revision(&self, _function: &str) -> RolloutResult<RevisionId> {
        Ok("5".into())
    }

    async fn alias_target(
        &self,
        _function: &str,
        _alias: &str,
    ) -> RolloutResult<Option<RevisionId>> {
        Ok(Some("4".into()))
    }

    async fn create_alias(
        &self,
        _function: &str,
        _alias: &str,
        _revision: &RevisionId,
    ) -> RolloutResult<()> {
        Ok(())
    }

    async fn update_alias(
        &self,
        _function: &str,
        _alias: &str,
        split: &TrafficSplit,
    ) -> RolloutResult<()> {
        self.updates.lock().unwrap().push(split.clone());
        Ok(())
    }
}

/// Metrics fake reporting the same error/invocation sums at every check.
struct FixedMetrics {
    errors: f64,
    invocations: f64,
}

impl MetricsSource for FixedMetrics {
    async fn query_sums(
        &self,
        _function: &str,
        counter: &str,
        _window: Duration,
    ) -> RolloutResult<Vec<f64>> {
        if counter == ERRORS_COUNTER {
            Ok(vec![self.errors])
        } else {
            Ok(vec![self.invocations])
        }
    }
}

#[tokio::test(start_paused = true)]
async fn configured_rollout_completes_under_threshold() {
    let config: VeerConfig = toml::from_str(CONFIG).unwrap();
    let deployment = config.find("billing-webhook").unwrap();

    let platform = FakePlatform::new();
    // 2 / 1000 = 0.2%, well under the configured 5%.
    let deployer = Deployer::new(
        &platform,
        FixedMetrics {
            errors: 2.0,
            invocations: 1000.0,
        },
    );

    let report = deployer.deploy(deployment).await.unwrap();
    assert_eq!(report.steps_completed, 4);

    // 10/25/50/75 weighted shifts, then the final full cutover.
    let updates = platform.updates();
    assert_eq!(updates.len(), 5);
    for (update, percent) in updates.iter().zip([10u32, 25, 50, 75]) {
        assert_eq!(*update, TrafficSplit::weighted("5".into(), "4".into(), percent));
    }
    assert_eq!(updates[4], TrafficSplit::full("5".into()));
}

#[tokio::test(start_paused = true)]
async fn configured_rollout_reverts_on_breach() {
    let config: VeerConfig = toml::from_str(CONFIG).unwrap();
    let deployment = config.find("tenant-export").unwrap();

    let platform = FakePlatform::new();
    // 10 / 100 = 10%, over the configured 3%.
    let deployer = Deployer::new(
        &platform,
        FixedMetrics {
            errors: 10.0,
            invocations: 100.0,
        },
    );

    let err = deployer.deploy(deployment).await.unwrap_err();
    assert!(matches!(
        err,
        RolloutError::RolledBack { step_percent: 20, .. }
    ));

    // One shift to 20%, then the revert; 50 and 100 never applied.
    let updates = platform.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], TrafficSplit::weighted("5".into(), "4".into(), 20));
    assert_eq!(updates[1], TrafficSplit::full("4".into()));
}
