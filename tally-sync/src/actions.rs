//! Typed outbound actions.
//!
//! Rendering code never emits on the transport directly; these wrappers
//! encode the domain payload and hand it to the feed handle. All of them are
//! fire-and-forget: when the feed is not connected the payload is dropped
//! with a warning and `false` comes back.

use serde_json::json;
use tracing::warn;

use tally_core::data::{Incident, VoteSummary};
use tally_feed::event::events;
use tally_feed::FeedHandle;

/// Broadcasts a tally correction from the editable counter.
pub fn send_vote_update(handle: &FeedHandle, summary: &VoteSummary) -> bool {
    match serde_json::to_value(summary) {
        Ok(payload) => handle.emit(events::VOTE_UPDATE, payload),
        Err(e) => {
            warn!(error = %e, "vote update did not encode");
            false
        }
    }
}

/// Broadcasts an observer's incident report.
pub fn report_incident(handle: &FeedHandle, incident: &Incident) -> bool {
    match serde_json::to_value(incident) {
        Ok(payload) => handle.emit(events::INCIDENT_UPDATE, payload),
        Err(e) => {
            warn!(error = %e, "incident report did not encode");
            false
        }
    }
}

/// Requests detail for a region selected on the map.
pub fn select_department(handle: &FeedHandle, location_id: u32) -> bool {
    handle.emit(events::DEPARTMENT_CLICK, json!(location_id))
}
