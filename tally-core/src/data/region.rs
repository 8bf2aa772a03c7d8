//! Per-region (department) vote tallies.

use serde::{Deserialize, Serialize};

use super::party::{recompute_percentages, PartyTally};

/// Department names by wire location id.
///
/// The feed addresses regions by a small numeric id; names are resolved
/// client-side from this table.
const DEPARTMENTS: &[(u32, &str)] = &[
    (1, "La Paz"),
    (2, "Santa Cruz"),
    (3, "Cochabamba"),
    (4, "Oruro"),
    (5, "Potosí"),
    (6, "Tarija"),
    (7, "Chuquisaca"),
    (8, "Beni"),
    (9, "Pando"),
];

/// Returns the department name for a wire location id, if known.
#[must_use]
pub fn department_name(location_id: u32) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(id, _)| *id == location_id)
        .map(|(_, name)| *name)
}

/// One region's slice of the election state.
///
/// Wire form (the `location` event):
/// `{ "locationId": 1, "totalVotes": 456789, "partyBreakdown": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTally {
    /// Numeric region identifier assigned by the feed.
    pub location_id: u32,
    /// Total votes counted in this region.
    pub total_votes: u64,
    /// Per-party breakdown within the region.
    #[serde(default)]
    pub party_breakdown: Vec<PartyTally>,
}

impl RegionTally {
    /// Creates a region tally and derives its breakdown percentages.
    #[must_use]
    pub fn new(location_id: u32, total_votes: u64, mut party_breakdown: Vec<PartyTally>) -> Self {
        recompute_percentages(&mut party_breakdown);
        Self {
            location_id,
            total_votes,
            party_breakdown,
        }
    }

    /// Returns the department name for this region, if known.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        department_name(self.location_id)
    }
}
