//! Vote-summary CSV export.
//!
//! Stateless transform plus a file write; no network, no state. Columns
//! match the dashboard's download button: Party, Votes, Percent.

use std::path::Path;

use tally_core::data::PartyTally;

/// Renders a party breakdown as CSV text.
#[must_use]
pub fn summary_to_csv(rows: &[PartyTally]) -> String {
    let mut csv = String::from("Party,Votes,Percent\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{:.2}\n",
            escape_field(&row.name),
            row.count,
            row.percent
        ));
    }
    csv
}

/// Writes a party breakdown to a CSV file.
pub fn write_summary_csv(path: impl AsRef<Path>, rows: &[PartyTally]) -> std::io::Result<()> {
    std::fs::write(path, summary_to_csv(rows))
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::data::{mock_summary, recompute_percentages};

    #[test]
    fn test_header_and_rows() {
        let mut rows = vec![
            PartyTally::new("MAS-IPSP", 150),
            PartyTally::new("LIBRE", 50),
        ];
        recompute_percentages(&mut rows);

        let csv = summary_to_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Party,Votes,Percent");
        assert_eq!(lines[1], "MAS-IPSP,150,75.00");
        assert_eq!(lines[2], "LIBRE,50,25.00");
    }

    #[test]
    fn test_names_with_delimiters_are_quoted() {
        let rows = vec![PartyTally::new("Libertad, y \"Democracia\"", 10)];
        let csv = summary_to_csv(&rows);
        assert!(csv.contains("\"Libertad, y \"\"Democracia\"\"\",10"));
    }

    #[test]
    fn test_empty_breakdown_is_header_only() {
        assert_eq!(summary_to_csv(&[]), "Party,Votes,Percent\n");
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VoteSummary.csv");

        let summary = mock_summary();
        write_summary_csv(&path, &summary.party_breakdown).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Party,Votes,Percent\n"));
        assert!(content.contains("MAS-IPSP,1423796,"));
        assert_eq!(content.lines().count(), summary.party_breakdown.len() + 1);
    }
}
