use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::assembler::{ResultAssembler, SurveyResult};
use super::catalog::{CatalogError, CatalogStore};
use super::domain::{
    ProfileCatalog, ProfileOutcome, ScoringRequest, StrategyKind, ThresholdRule,
};
use super::engine::{ScoreRun, ScoringEngine};
use super::environment::{self, score_environment};
use super::normalize::normalize_language_code;
use super::resolver;

/// Service composing the catalog store, scoring engine, resolver, and result
/// assembler into one request/response call. Each run loads its catalogs,
/// scores, and returns; no state survives between invocations.
pub struct SurveyScoringService<C> {
    store: Arc<C>,
}

impl<C> SurveyScoringService<C>
where
    C: CatalogStore + 'static,
{
    pub fn new(store: Arc<C>) -> Self {
        Self { store }
    }

    /// Runs one scoring computation end to end.
    ///
    /// A missing question catalog for the requested (or origin) language is
    /// the only hard failure; everything else degrades into a smaller or
    /// undetermined result.
    pub fn run(&self, request: &ScoringRequest) -> Result<SurveyResult, ScoringServiceError> {
        let language = normalize_language_code(&request.language);
        let origin_language = request
            .origin_language
            .as_deref()
            .map(normalize_language_code)
            .unwrap_or_else(|| language.clone());

        let strategy = StrategyKind::for_test_type(&request.test_type);
        let profiles = self.load_profiles(&request.test_type, &language);

        if strategy == StrategyKind::EnvironmentScan {
            return Ok(self.run_environment(request, &language, &profiles));
        }

        let questions = self
            .store
            .questions(&request.test_type, &language)?
            .ok_or_else(|| ScoringServiceError::MissingCatalog {
                test_type: request.test_type.clone(),
                language: language.clone(),
            })?;
        let engine = ScoringEngine::new(questions);

        let run = if origin_language == language {
            engine.score(&request.answers)
        } else {
            let origin_questions = self
                .store
                .questions(&request.test_type, &origin_language)?
                .ok_or_else(|| ScoringServiceError::MissingCatalog {
                    test_type: request.test_type.clone(),
                    language: origin_language.clone(),
                })?;
            engine.score_translated(&request.answers, &origin_questions)
        };

        let thresholds = if strategy == StrategyKind::ThresholdTable {
            self.load_thresholds(&request.test_type, &language)
        } else {
            Vec::new()
        };

        let outcome = resolver::resolve(&run.scores, strategy, &thresholds);
        let assembler = ResultAssembler::new(&profiles);
        Ok(assembler.assemble(&request.test_type, &language, run, outcome))
    }

    /// Lightweight partition summary for catalog inspection endpoints.
    pub fn catalog_summary(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Option<CatalogSummary>, ScoringServiceError> {
        let language = normalize_language_code(language);
        let Some(questions) = self.store.questions(test_type, &language)? else {
            return Ok(None);
        };
        let profiles = self.load_profiles(test_type, &language);

        Ok(Some(CatalogSummary {
            test_type: test_type.to_string(),
            language,
            questions: questions.len(),
            profiles: profiles.len(),
        }))
    }

    fn run_environment(
        &self,
        request: &ScoringRequest,
        language: &str,
        profiles: &ProfileCatalog,
    ) -> SurveyResult {
        let scan = score_environment(&request.answers);

        let (run, outcome) = if scan.answered == 0 {
            (ScoreRun::default(), ProfileOutcome::Undetermined)
        } else {
            let run = ScoreRun {
                scores: scan.score_map(),
                diagnostics: Default::default(),
            };
            (run, ProfileOutcome::determined(scan.quadrant_label()))
        };

        let assembler = ResultAssembler::new(profiles);
        let mut result = assembler.assemble(&request.test_type, language, run, outcome);

        if result.code_names.is_empty() {
            result.code_names = environment::code_names();
        }
        if scan.answered > 0 {
            result.fields.insert(
                "stability_interpretation".to_string(),
                scan.stability_interpretation().to_string(),
            );
            result.fields.insert(
                "velocity_interpretation".to_string(),
                scan.velocity_interpretation().to_string(),
            );
        }

        result
    }

    /// Profile loading never fails a run; a store error just means the result
    /// ships without display metadata.
    fn load_profiles(&self, test_type: &str, language: &str) -> ProfileCatalog {
        match self.store.profiles(test_type, language) {
            Ok(profiles) => profiles,
            Err(err) => {
                warn!(test_type, language, %err, "profile catalog unavailable");
                ProfileCatalog::default()
            }
        }
    }

    fn load_thresholds(&self, test_type: &str, language: &str) -> Vec<ThresholdRule> {
        match self.store.thresholds(test_type, language) {
            Ok(thresholds) => thresholds,
            Err(err) => {
                warn!(test_type, language, %err, "threshold table unavailable");
                Vec::new()
            }
        }
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("no question catalog for test '{test_type}' in language '{language}'")]
    MissingCatalog { test_type: String, language: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Partition summary exposed by the catalog inspection endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub test_type: String,
    pub language: String,
    pub questions: usize,
    pub profiles: usize,
}
