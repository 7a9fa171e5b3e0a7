use std::collections::BTreeMap;
use std::io::Read;

use tracing::warn;

use super::super::domain::{Profile, ProfileCatalog};
use super::super::normalize::normalize_text;

/// Column names accepted as the profile key, newest first. The legacy name
/// survives in older exports.
const KEY_COLUMNS: [&str; 2] = ["code", "profile"];
const TITLE_COLUMNS: [&str; 2] = ["title", "profile title"];
const DESCRIPTION_COLUMNS: [&str; 2] = ["description", "profile description"];

/// Loads a profile partition. Any failure yields a smaller (possibly empty)
/// catalog instead of an error; a missing result email beats a crashed run.
pub(crate) fn parse_profiles<R: Read>(reader: R) -> ProfileCatalog {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = match csv_reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            warn!(%err, "profile partition has no readable header row");
            return ProfileCatalog::default();
        }
    };

    let find_column = |candidates: &[&str]| {
        candidates.iter().find_map(|candidate| {
            headers
                .iter()
                .position(|header| normalize_text(header) == *candidate)
        })
    };

    let Some(code_index) = find_column(&KEY_COLUMNS) else {
        warn!("profile partition lacks a 'code' (or legacy 'profile') column");
        return ProfileCatalog::default();
    };
    let title_index = find_column(&TITLE_COLUMNS);
    let description_index = find_column(&DESCRIPTION_COLUMNS);

    let mut catalog = ProfileCatalog::default();

    for record in csv_reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                warn!(%err, "skipping malformed profile row");
                continue;
            }
        };

        let code = record.get(code_index).unwrap_or("").trim();
        if code.is_empty() {
            continue;
        }

        let field_at = |index: Option<usize>| {
            index
                .and_then(|index| record.get(index))
                .unwrap_or("")
                .trim()
                .to_string()
        };

        // Every column is kept verbatim so templates can reference any
        // metadata the catalog author added.
        let mut metadata = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            if index == code_index || header.is_empty() {
                continue;
            }
            let value = record.get(index).unwrap_or("").trim();
            metadata.insert(header.to_string(), value.to_string());
        }

        catalog.insert(Profile {
            code: code.to_string(),
            title: field_at(title_index),
            description: field_at(description_index),
            metadata,
        });
    }

    catalog
}
