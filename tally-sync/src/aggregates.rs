//! Ready-made synchronizers for the dashboard aggregates.
//!
//! Reconciliation rules, per aggregate:
//! - **Global tally**: last-write-wins, an incoming total replaces the
//!   previous one, no ordering check beyond arrival order.
//! - **Party breakdown**: replace-wholesale by list; percentages are
//!   recomputed locally from raw counts so they sum to 100.
//! - **Region breakdown**: an incoming `location` payload replaces that
//!   region's entry (matched by location id, appended if new), with its
//!   percentages recomputed.
//! - **Incident list**: merge by id, replace in place preserving list
//!   position, append if new. There is no removal path.

use std::time::Duration;

use serde::Deserialize;

use tally_core::data::{recompute_percentages, Incident, PartyTally, RegionTally, VoteSummary};
use tally_feed::event::events;

use crate::sync::ViewSync;

/// Inbound payload carrying just the running total.
///
/// The `global vote summary` event carries more, but the global tally only
/// tracks the headline number.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalVotesPayload {
    /// Total votes counted so far.
    pub total_votes: u64,
}

/// Synchronizer for the headline total-vote count.
#[must_use]
pub fn global_tally(refresh_interval: Duration) -> ViewSync<u64, TotalVotesPayload> {
    ViewSync::new(
        [events::GLOBAL_VOTE_SUMMARY],
        Some(events::GET_GLOBAL_SUMMARY),
        0,
        |total, payload: TotalVotesPayload| *total = payload.total_votes,
        refresh_interval,
    )
}

/// Synchronizer for the per-party breakdown list.
#[must_use]
pub fn party_breakdown(refresh_interval: Duration) -> ViewSync<Vec<PartyTally>, VoteSummary> {
    ViewSync::new(
        [events::GLOBAL_VOTE_SUMMARY],
        Some(events::GET_GLOBAL_SUMMARY),
        Vec::new(),
        |rows, summary: VoteSummary| {
            let mut breakdown = summary.party_breakdown;
            recompute_percentages(&mut breakdown);
            *rows = breakdown;
        },
        refresh_interval,
    )
}

/// Synchronizer for the per-region tallies shown on the map.
///
/// Regions arrive one at a time on the `location` event; there is no
/// snapshot-request for this family, the server pushes on change.
#[must_use]
pub fn region_breakdown(refresh_interval: Duration) -> ViewSync<Vec<RegionTally>, RegionTally> {
    ViewSync::new(
        [events::LOCATION],
        None,
        Vec::new(),
        |regions, mut incoming: RegionTally| {
            recompute_percentages(&mut incoming.party_breakdown);
            match regions
                .iter_mut()
                .find(|r| r.location_id == incoming.location_id)
            {
                Some(slot) => *slot = incoming,
                None => regions.push(incoming),
            }
        },
        refresh_interval,
    )
}

/// Synchronizer for the incident list.
#[must_use]
pub fn incidents(refresh_interval: Duration) -> ViewSync<Vec<Incident>, Incident> {
    ViewSync::new(
        [events::INCIDENT_UPDATE],
        None,
        Vec::new(),
        |list, incoming: Incident| {
            match list.iter_mut().find(|i| i.id == incoming.id) {
                Some(slot) => *slot = incoming,
                None => list.push(incoming),
            }
        },
        refresh_interval,
    )
}
