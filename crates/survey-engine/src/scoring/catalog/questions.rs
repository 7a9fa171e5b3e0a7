use std::io::Read;

use serde::Deserialize;
use tracing::warn;

use super::super::domain::{ChoiceOption, ProcessingMode, Question, QuestionCatalog, QuestionId};

#[derive(Debug, Deserialize)]
struct QuestionRow {
    id: String,
    #[serde(default)]
    params: String,
}

/// JSON parameter payload embedded in each question row.
#[derive(Debug, Deserialize)]
struct RawParameters {
    mode: Option<String>,
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    label: String,
    #[serde(default)]
    profile: Option<String>,
    #[serde(default)]
    value: Option<f64>,
}

/// Loads a question partition, skipping rows whose parameter payload is
/// missing, unparsable, or lacks a mode. Partial corruption degrades the
/// catalog, it never aborts the load.
pub(crate) fn parse_questions<R: Read>(
    reader: R,
    test_type: &str,
    language: &str,
) -> QuestionCatalog {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut catalog = QuestionCatalog::new(test_type, language);

    for row in csv_reader.deserialize::<QuestionRow>() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(test_type, language, %err, "skipping malformed question row");
                continue;
            }
        };

        if row.id.is_empty() {
            continue;
        }

        let params: RawParameters = match serde_json::from_str(&row.params) {
            Ok(params) => params,
            Err(err) => {
                warn!(
                    test_type,
                    language,
                    question_id = %row.id,
                    %err,
                    "skipping question with unparsable parameters"
                );
                continue;
            }
        };

        let Some(mode_label) = params.mode else {
            warn!(
                test_type,
                language,
                question_id = %row.id,
                "skipping question without a processing mode"
            );
            continue;
        };

        let options = params
            .options
            .into_iter()
            .map(|option| ChoiceOption::new(option.label, option.profile, option.value))
            .collect();

        catalog.insert(Question {
            id: QuestionId(row.id),
            mode: ProcessingMode::parse(&mode_label),
            mode_label,
            profile: params.profile,
            options,
            min: params.min,
            max: params.max,
        });
    }

    catalog
}
