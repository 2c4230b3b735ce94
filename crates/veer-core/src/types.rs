//! Revision identifiers and alias traffic splits.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An immutable, versioned snapshot of a function's code and configuration.
///
/// Revision identifiers are opaque strings assigned by the revision store.
/// The sentinel [`RevisionId::head`] names the unpublished head of a
/// function, which is what a freshly created alias points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionId(String);

impl RevisionId {
    /// The unpublished head of a function (not yet a numbered revision).
    pub fn head() -> Self {
        Self("head".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RevisionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RevisionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A weighted secondary routing entry behind an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryWeight {
    /// Revision receiving the secondary share of traffic.
    pub revision: RevisionId,
    /// Fraction of traffic routed to `revision` (0.0–1.0).
    pub weight: f64,
}

/// The traffic split behind an alias: a primary revision plus at most one
/// weighted secondary revision.
///
/// The routing mechanism forbids a 100% primary with an additional
/// weighted entry, so [`TrafficSplit::weighted`] collapses to a
/// primary-only split when the primary share reaches 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSplit {
    /// Revision receiving the primary share of traffic.
    pub primary: RevisionId,
    /// Optional secondary revision with its traffic fraction.
    pub secondary: Option<SecondaryWeight>,
}

impl TrafficSplit {
    /// Route 100% of traffic to a single revision.
    pub fn full(revision: RevisionId) -> Self {
        Self {
            primary: revision,
            secondary: None,
        }
    }

    /// Route `percent`% of traffic to `new`, the remainder to `old`.
    ///
    /// A percent of 100 or more yields a primary-only split.
    pub fn weighted(new: RevisionId, old: RevisionId, percent: u32) -> Self {
        if percent >= 100 {
            return Self::full(new);
        }
        Self {
            primary: new,
            secondary: Some(SecondaryWeight {
                revision: old,
                weight: f64::from(100 - percent) / 100.0,
            }),
        }
    }

    /// Whether all traffic is routed to a single revision.
    pub fn is_collapsed(&self) -> bool {
        self.secondary.is_none()
    }
}
