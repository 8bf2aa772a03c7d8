//! Polling-place incident records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; no action expected.
    Low,
    /// Needs attention.
    Medium,
    /// Needs immediate attention.
    High,
}

impl Severity {
    /// Returns the severity as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reported incident at a polling place.
///
/// Immutable once created. Incidents are created client-side when an
/// observer reports one, or arrive from the feed on the `incident update`
/// event; either way they are merged into view state by `id` and never
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique incident identifier.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Severity classification.
    pub severity: Severity,
    /// When the incident was reported.
    pub timestamp: DateTime<Utc>,
    /// Department or polling-place name.
    pub location: String,
}

impl Incident {
    /// Creates a new incident report with a generated id, stamped now.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            severity,
            timestamp: Utc::now(),
            location: location.into(),
        }
    }
}
