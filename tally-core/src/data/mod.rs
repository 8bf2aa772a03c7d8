//! Domain payload types for the live election feed.
//!
//! These are the shapes that cross the wire as named-event payloads and the
//! shapes the synchronizers hold as reconciled view state. All of them are
//! plain serde structs; percentages are always derived locally from raw
//! counts rather than trusted from upstream.

mod incident;
mod mock;
mod party;
mod region;
mod summary;

pub use incident::{Incident, Severity};
pub use mock::{mock_incidents, mock_regions, mock_summary};
pub use party::{recompute_percentages, PartyTally};
pub use region::{department_name, RegionTally};
pub use summary::VoteSummary;
