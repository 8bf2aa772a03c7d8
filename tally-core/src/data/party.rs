//! Per-party vote tallies and percentage derivation.

use serde::{Deserialize, Deserializer, Serialize};

/// One row of a party breakdown: a party name, its raw vote count, and its
/// share of the total.
///
/// The `percent` field is advisory on the wire: some feed endpoints send it
/// as a number, some as a string, and the rounding is not trustworthy, so it
/// is decoded leniently and recomputed from raw counts before display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyTally {
    /// Party name or abbreviation.
    pub name: String,
    /// Raw vote count.
    pub count: u64,
    /// Share of the total vote, in percent. Derived locally.
    #[serde(default, deserialize_with = "lenient_percent")]
    pub percent: f64,
}

impl PartyTally {
    /// Creates a tally row with a zero percentage.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
            percent: 0.0,
        }
    }
}

/// Recomputes every row's percentage from the raw counts so that the shares
/// sum to 100 regardless of upstream rounding.
///
/// An all-zero breakdown yields all-zero percentages.
#[allow(clippy::cast_precision_loss)]
pub fn recompute_percentages(parties: &mut [PartyTally]) {
    let total: u64 = parties.iter().map(|p| p.count).sum();
    if total == 0 {
        for party in parties.iter_mut() {
            party.percent = 0.0;
        }
        return;
    }
    for party in parties.iter_mut() {
        party.percent = party.count as f64 / total as f64 * 100.0;
    }
}

/// Accepts a percentage as a JSON number, a numeric string (with or without a
/// trailing `%`), or nothing at all.
fn lenient_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => {
            s.trim().trim_end_matches('%').parse().unwrap_or(0.0)
        }
        _ => 0.0,
    })
}
