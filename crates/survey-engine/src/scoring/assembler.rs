use std::collections::BTreeMap;

use serde::Serialize;

use super::diagnostics::ScoringDiagnostics;
use super::domain::{format_score, ProfileCatalog, ProfileOutcome, ScoreMap};
use super::engine::ScoreRun;

/// Flat result record handed to templating and the email composer.
///
/// `fields` is the `{{key}}`-ready view: every profile metadata column plus
/// the engine's own fields, one string value per key.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyResult {
    pub test_type: String,
    pub language: String,
    pub scores: ScoreMap,
    pub outcome: ProfileOutcome,
    pub profile_title: String,
    pub code_names: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
    pub diagnostics: ScoringDiagnostics,
}

impl SurveyResult {
    /// Scores ordered for display: descending by value, code order on ties.
    pub fn sorted_scores(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(code, score)| (code.as_str(), *score))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries
    }

    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.code_names
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }
}

/// Builds the flat result record with a fixed field precedence, lowest first:
///
/// 1. the resolved profile's catalog metadata,
/// 2. per-profile score fields,
/// 3. the resolver's own fields (final code, title, recommendation).
///
/// Later layers win on key collision, so a catalog column can never mask the
/// computed outcome.
pub struct ResultAssembler<'a> {
    profiles: &'a ProfileCatalog,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(profiles: &'a ProfileCatalog) -> Self {
        Self { profiles }
    }

    pub fn assemble(
        &self,
        test_type: &str,
        language: &str,
        run: ScoreRun,
        outcome: ProfileOutcome,
    ) -> SurveyResult {
        let ScoreRun {
            scores,
            diagnostics,
        } = run;

        let profile = self.profiles.get(outcome.code());
        let profile_title = profile
            .map(|profile| profile.display_name().to_string())
            .unwrap_or_else(|| outcome.code().to_string());

        let mut fields = BTreeMap::new();

        if let Some(profile) = profile {
            for (key, value) in &profile.metadata {
                fields.insert(key.clone(), value.clone());
            }
        }

        for (code, score) in &scores {
            fields.insert(format!("score_{code}"), format_score(*score));
        }
        let total: f64 = scores.values().sum();
        fields.insert("total_score".to_string(), format_score(total));

        fields.insert("test_type".to_string(), test_type.to_string());
        fields.insert("language".to_string(), language.to_string());
        fields.insert("profile_final".to_string(), outcome.code().to_string());
        fields.insert("profile_title".to_string(), profile_title.clone());
        if let Some(profile) = profile {
            fields.insert(
                "profile_description".to_string(),
                profile.description.clone(),
            );
        }
        if let Some(recommendation) = outcome.recommendation() {
            fields.insert("recommendation".to_string(), recommendation.to_string());
        }

        SurveyResult {
            test_type: test_type.to_string(),
            language: language.to_string(),
            scores,
            outcome,
            profile_title,
            code_names: self.profiles.code_names(),
            fields,
            diagnostics,
        }
    }
}
