use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use super::super::domain::{ThresholdExpr, ThresholdRule};

#[derive(Debug, Deserialize)]
struct ThresholdRow {
    profile: String,
    #[serde(default)]
    majority: String,
    #[serde(default)]
    audience: String,
    #[serde(default)]
    axis: String,
    condition: String,
    #[serde(default)]
    recommendation: String,
}

/// Loads an ordered threshold partition. Row order is the scan order, so the
/// rows are returned exactly as written. Rows whose condition does not parse
/// are skipped with a warning.
pub(crate) fn parse_thresholds<R: Read>(reader: R) -> Vec<ThresholdRule> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rules = Vec::new();

    for row in csv_reader.deserialize::<ThresholdRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(%err, "skipping malformed threshold row");
                continue;
            }
        };

        if row.profile.is_empty() {
            continue;
        }

        let Some(condition) = ThresholdExpr::parse(&row.condition) else {
            warn!(
                profile = %row.profile,
                condition = %row.condition,
                "skipping threshold row with unparsable condition"
            );
            continue;
        };

        rules.push(ThresholdRule {
            profile: row.profile,
            majority: row.majority,
            audience: row.audience,
            axis: row.axis,
            condition,
            recommendation: row.recommendation,
        });
    }

    rules
}
