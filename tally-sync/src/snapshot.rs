//! Reconciled aggregate snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The current reconciled value of one aggregate, as exposed to rendering
/// code.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateSnapshot<T> {
    /// The reconciled domain payload.
    pub value: T,
    /// When the last payload was successfully reconciled; `None` until the
    /// first one lands.
    pub last_updated_at: Option<DateTime<Utc>>,
    /// True only while the owning connection is live.
    pub is_live: bool,
}

impl<T> AggregateSnapshot<T> {
    /// Returns the age of the snapshot, if it has ever been updated.
    #[must_use]
    pub fn age(&self) -> Option<chrono::Duration> {
        self.last_updated_at.map(|at| Utc::now() - at)
    }
}
