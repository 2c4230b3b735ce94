//! HTTP implementations of the collaborator traits.
//!
//! Both clients speak JSON against the platform's control-plane API.
//! Requests carry a per-request timeout; non-success statuses are mapped
//! into [`RolloutError`] variants at the call site. There is no retry —
//! a failed revision-store call aborts the run, and a failed metrics
//! query is handled (fail-open) by the controller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use veer_core::{RevisionId, TrafficSplit};

use crate::error::{RolloutError, RolloutResult};
use crate::service::{MetricsSource, RevisionStore};

/// Revision store client: publish revisions and manage alias splits.
///
/// ```text
/// POST {base}/v1/functions/{fn}/revisions
/// GET  {base}/v1/functions/{fn}/aliases/{alias}
/// POST {base}/v1/functions/{fn}/aliases
/// PUT  {base}/v1/functions/{fn}/aliases/{alias}
/// ```
pub struct HttpRevisionStore {
    client: reqwest::Client,
    base: String,
}

#[derive(Deserialize)]
struct PublishResponse {
    revision: String,
}

#[derive(Serialize, Deserialize)]
struct AliasBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    revision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary: Option<SecondaryBody>,
}

#[derive(Serialize, Deserialize)]
struct SecondaryBody {
    revision: String,
    weight: f64,
}

impl AliasBody {
    fn from_split(name: Option<&str>, split: &TrafficSplit) -> Self {
        Self {
            name: name.map(str::to_string),
            revision: split.primary.to_string(),
            secondary: split.secondary.as_ref().map(|s| SecondaryBody {
                revision: s.revision.to_string(),
                weight: s.weight,
            }),
        }
    }
}

impl HttpRevisionStore {
    pub fn new(base: &str, timeout: Duration) -> RolloutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RolloutError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn alias_url(&self, function: &str, alias: &str) -> String {
        format!("{}/v1/functions/{function}/aliases/{alias}", self.base)
    }
}

impl RevisionStore for HttpRevisionStore {
    async fn publish_revision(&self, function: &str) -> RolloutResult<RevisionId> {
        let url = format!("{}/v1/functions/{function}/revisions", self.base);
        debug!(%url, "publishing revision");

        let resp = self
            .client
            .post(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RolloutError::Publish(e.to_string()))?;
        let body: PublishResponse = resp
            .json()
            .await
            .map_err(|e| RolloutError::Publish(e.to_string()))?;
        Ok(body.revision.into())
    }

    async fn alias_target(
        &self,
        function: &str,
        alias: &str,
    ) -> RolloutResult<Option<RevisionId>> {
        let url = self.alias_url(function, alias);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RolloutError::Alias(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| RolloutError::Alias(e.to_string()))?;
        let body: AliasBody = resp
            .json()
            .await
            .map_err(|e| RolloutError::Alias(e.to_string()))?;
        Ok(Some(body.revision.into()))
    }

    async fn create_alias(
        &self,
        function: &str,
        alias: &str,
        revision: &RevisionId,
    ) -> RolloutResult<()> {
        let url = format!("{}/v1/functions/{function}/aliases", self.base);
        let body = AliasBody::from_split(Some(alias), &TrafficSplit::full(revision.clone()));
        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RolloutError::Alias(e.to_string()))?;
        Ok(())
    }

    async fn update_alias(
        &self,
        function: &str,
        alias: &str,
        split: &TrafficSplit,
    ) -> RolloutResult<()> {
        let url = self.alias_url(function, alias);
        let body = AliasBody::from_split(None, split);
        self.client
            .put(&url)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RolloutError::Alias(e.to_string()))?;
        Ok(())
    }
}

/// Metrics source client: windowed counter sum queries.
///
/// ```text
/// GET {base}/v1/metrics/query?function=&counter=&window_secs=
/// ```
pub struct HttpMetricsSource {
    client: reqwest::Client,
    base: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    datapoints: Vec<f64>,
}

impl HttpMetricsSource {
    pub fn new(base: &str, timeout: Duration) -> RolloutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RolloutError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }
}

impl MetricsSource for HttpMetricsSource {
    async fn query_sums(
        &self,
        function: &str,
        counter: &str,
        window: Duration,
    ) -> RolloutResult<Vec<f64>> {
        let url = format!("{}/v1/metrics/query", self.base);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("function", function),
                ("counter", counter),
                ("window_secs", &window.as_secs().to_string()),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| RolloutError::Telemetry(e.to_string()))?;
        let body: QueryResponse = resp
            .json()
            .await
            .map_err(|e| RolloutError::Telemetry(e.to_string()))?;
        Ok(body.datapoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_body_serializes_weighted_split() {
        let split = TrafficSplit::weighted("9".into(), "7".into(), 25);
        let body = AliasBody::from_split(None, &split);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["revision"], "9");
        assert_eq!(json["secondary"]["revision"], "7");
        assert!((json["secondary"]["weight"].as_f64().unwrap() - 0.75).abs() < f64::EPSILON);
        assert!(json.get("name").is_none());
    }

    #[test]
    fn alias_body_omits_secondary_when_collapsed() {
        let body = AliasBody::from_split(Some("live"), &TrafficSplit::full("9".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["name"], "live");
        assert!(json.get("secondary").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let store =
            HttpRevisionStore::new("http://localhost:8443/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.alias_url("billing-webhook", "live"),
            "http://localhost:8443/v1/functions/billing-webhook/aliases/live"
        );
    }
}
