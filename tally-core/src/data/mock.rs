//! Static mock dataset for local development.
//!
//! Mirrors a plausible mid-count state of the 2025 Bolivian general
//! election. Used by the CLI's offline export path and by tests; nothing in
//! the synchronization layer depends on it.

use chrono::{TimeZone, Utc};

use super::incident::{Incident, Severity};
use super::party::PartyTally;
use super::region::RegionTally;
use super::summary::VoteSummary;

/// Returns the mock global vote summary.
#[must_use]
pub fn mock_summary() -> VoteSummary {
    VoteSummary::new(
        2_847_593,
        vec![
            PartyTally::new("MAS-IPSP", 1_423_796),
            PartyTally::new("LIBRE", 854_277),
            PartyTally::new("UNIDAD", 426_414),
            PartyTally::new("APB", 85_552),
            PartyTally::new("MSM", 42_380),
            PartyTally::new("AP", 14_238),
            PartyTally::new("PDC", 0),
            PartyTally::new("NGP", 0),
            PartyTally::new("FP", 0),
            PartyTally::new("LYP-ADN", 0),
        ],
    )
}

/// Returns the mock per-department tallies.
#[must_use]
pub fn mock_regions() -> Vec<RegionTally> {
    vec![
        RegionTally::new(1, 456_789, Vec::new()),
        RegionTally::new(2, 567_234, Vec::new()),
        RegionTally::new(3, 298_456, Vec::new()),
        RegionTally::new(4, 187_654, Vec::new()),
        RegionTally::new(5, 234_567, Vec::new()),
        RegionTally::new(6, 145_678, Vec::new()),
        RegionTally::new(7, 198_765, Vec::new()),
        RegionTally::new(8, 123_456, Vec::new()),
        RegionTally::new(9, 87_654, Vec::new()),
    ]
}

/// Returns the mock incident list.
#[must_use]
pub fn mock_incidents() -> Vec<Incident> {
    vec![
        Incident {
            id: "1".to_string(),
            title: "Polling Station Delay".to_string(),
            description: "Delayed opening at Station 247 in La Paz due to technical issues"
                .to_string(),
            severity: Severity::Medium,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
            location: "La Paz".to_string(),
        },
        Incident {
            id: "2".to_string(),
            title: "Minor Disturbance".to_string(),
            description: "Small crowd gathering reported near voting center in Santa Cruz"
                .to_string(),
            severity: Severity::Low,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 10, 15, 0).unwrap(),
            location: "Santa Cruz".to_string(),
        },
        Incident {
            id: "3".to_string(),
            title: "Equipment Malfunction".to_string(),
            description: "Voting machine malfunction reported in Cochabamba district".to_string(),
            severity: Severity::High,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 11, 45, 0).unwrap(),
            location: "Cochabamba".to_string(),
        },
    ]
}
