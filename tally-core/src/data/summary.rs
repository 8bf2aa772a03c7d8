//! Global vote summary payload.

use serde::{Deserialize, Serialize};

use super::party::{recompute_percentages, PartyTally};

/// The global vote summary pushed by the feed: a running total plus the
/// per-party breakdown.
///
/// Wire form (the `global vote summary` event):
/// `{ "totalVotes": 2847593, "partyBreakdown": [{ "name", "count", "percent" }] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    /// Total votes counted so far.
    pub total_votes: u64,
    /// Per-party breakdown rows, in server order.
    pub party_breakdown: Vec<PartyTally>,
}

impl VoteSummary {
    /// Creates a summary and derives its percentages from the raw counts.
    #[must_use]
    pub fn new(total_votes: u64, mut party_breakdown: Vec<PartyTally>) -> Self {
        recompute_percentages(&mut party_breakdown);
        Self {
            total_votes,
            party_breakdown,
        }
    }

    /// Returns the row with the highest count, if any.
    #[must_use]
    pub fn leading_party(&self) -> Option<&PartyTally> {
        self.party_breakdown.iter().max_by_key(|p| p.count)
    }

    /// Recomputes the breakdown percentages in place.
    pub fn normalize(&mut self) {
        recompute_percentages(&mut self.party_breakdown);
    }
}
