use std::collections::HashMap;
use std::sync::Arc;

use crate::scoring::catalog::{CatalogError, CatalogStore};
use crate::scoring::domain::{
    AnswerSet, AnswerValue, ChoiceOption, ProcessingMode, Profile, ProfileCatalog, Question,
    QuestionCatalog, QuestionId, ScoringRequest, ThresholdExpr, ThresholdRule,
};
use crate::scoring::engine::ScoringEngine;
use crate::scoring::service::SurveyScoringService;

/// In-memory catalog store so service and router behavior can be exercised
/// without touching the filesystem.
#[derive(Default)]
pub(super) struct MemoryCatalogStore {
    pub(super) questions: HashMap<(String, String), QuestionCatalog>,
    pub(super) profiles: HashMap<(String, String), ProfileCatalog>,
    pub(super) thresholds: HashMap<(String, String), Vec<ThresholdRule>>,
}

impl MemoryCatalogStore {
    pub(super) fn with_questions(mut self, catalog: QuestionCatalog) -> Self {
        let key = (catalog.test_type.clone(), catalog.language.clone());
        self.questions.insert(key, catalog);
        self
    }

    pub(super) fn with_profiles(
        mut self,
        test_type: &str,
        language: &str,
        catalog: ProfileCatalog,
    ) -> Self {
        self.profiles
            .insert((test_type.to_string(), language.to_string()), catalog);
        self
    }

    pub(super) fn with_thresholds(
        mut self,
        test_type: &str,
        language: &str,
        rules: Vec<ThresholdRule>,
    ) -> Self {
        self.thresholds
            .insert((test_type.to_string(), language.to_string()), rules);
        self
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn questions(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError> {
        Ok(self
            .questions
            .get(&(test_type.to_string(), language.to_string()))
            .cloned())
    }

    fn profiles(&self, test_type: &str, language: &str) -> Result<ProfileCatalog, CatalogError> {
        Ok(self
            .profiles
            .get(&(test_type.to_string(), language.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn thresholds(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Vec<ThresholdRule>, CatalogError> {
        Ok(self
            .thresholds
            .get(&(test_type.to_string(), language.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Store whose reads always fail, for error-path coverage.
pub(super) struct UnavailableCatalogStore;

impl CatalogStore for UnavailableCatalogStore {
    fn questions(
        &self,
        _test_type: &str,
        _language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError> {
        Err(unavailable())
    }

    fn profiles(&self, _test_type: &str, _language: &str) -> Result<ProfileCatalog, CatalogError> {
        Err(unavailable())
    }

    fn thresholds(
        &self,
        _test_type: &str,
        _language: &str,
    ) -> Result<Vec<ThresholdRule>, CatalogError> {
        Err(unavailable())
    }
}

fn unavailable() -> CatalogError {
    CatalogError::Io {
        partition: "memory".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "store offline"),
    }
}

pub(super) fn option(label: &str, profile: &str, value: f64) -> ChoiceOption {
    ChoiceOption::new(label, Some(profile.to_string()), Some(value))
}

pub(super) fn choice_question(id: &str, mode: ProcessingMode, options: Vec<ChoiceOption>) -> Question {
    let mode_label = match mode {
        ProcessingMode::SingleChoice => "QCU_CAT",
        ProcessingMode::MultiChoice => "QRM_CAT",
        _ => "QCU_CAT",
    };
    Question {
        id: QuestionId(id.to_string()),
        mode,
        mode_label: mode_label.to_string(),
        profile: None,
        options,
        min: None,
        max: None,
    }
}

pub(super) fn scale_question(id: &str, profile: &str) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        mode: ProcessingMode::NumericScale,
        mode_label: "ECHELLE_NOTE".to_string(),
        profile: Some(profile.to_string()),
        options: Vec::new(),
        min: Some(1.0),
        max: Some(5.0),
    }
}

pub(super) fn direct_question(id: &str, profile: &str) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        mode: ProcessingMode::DirectAssign,
        mode_label: "QCU_DIRECT".to_string(),
        profile: Some(profile.to_string()),
        options: Vec::new(),
        min: None,
        max: None,
    }
}

pub(super) fn unknown_mode_question(id: &str) -> Question {
    Question {
        id: QuestionId(id.to_string()),
        mode: ProcessingMode::Unrecognized,
        mode_label: "QCU_LEGACY".to_string(),
        profile: None,
        options: Vec::new(),
        min: None,
        max: None,
    }
}

pub(super) fn catalog_with(test_type: &str, language: &str, questions: Vec<Question>) -> QuestionCatalog {
    let mut catalog = QuestionCatalog::new(test_type, language);
    for question in questions {
        catalog.insert(question);
    }
    catalog
}

/// Two-question catalog matching the canonical end-to-end scenario: a color
/// pick worth one point and a 1..5 scale feeding the same profile.
pub(super) fn color_and_scale_catalog(test_type: &str, language: &str) -> QuestionCatalog {
    catalog_with(
        test_type,
        language,
        vec![
            choice_question(
                "Q1",
                ProcessingMode::SingleChoice,
                vec![option("Red", "X", 1.0), option("Blue", "Y", 1.0)],
            ),
            scale_question("Q2", "X"),
        ],
    )
}

pub(super) fn profile(code: &str, title: &str, description: &str) -> Profile {
    let mut metadata = std::collections::BTreeMap::new();
    metadata.insert("title".to_string(), title.to_string());
    metadata.insert("description".to_string(), description.to_string());
    Profile {
        code: code.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        metadata,
    }
}

pub(super) fn profile_catalog(profiles: Vec<Profile>) -> ProfileCatalog {
    let mut catalog = ProfileCatalog::default();
    for entry in profiles {
        catalog.insert(entry);
    }
    catalog
}

pub(super) fn respondent_threshold(
    profile: &str,
    condition: ThresholdExpr,
    recommendation: &str,
) -> ThresholdRule {
    ThresholdRule {
        profile: profile.to_string(),
        majority: String::new(),
        audience: "Respondent".to_string(),
        axis: "Develop-Potential".to_string(),
        condition,
        recommendation: recommendation.to_string(),
    }
}

pub(super) fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(header, value)| (header.to_string(), AnswerValue::Text(value.to_string())))
        .collect()
}

pub(super) fn request(test_type: &str, language: &str, pairs: &[(&str, &str)]) -> ScoringRequest {
    ScoringRequest {
        test_type: test_type.to_string(),
        language: language.to_string(),
        origin_language: None,
        answers: answers(pairs),
    }
}

pub(super) fn engine_for(catalog: QuestionCatalog) -> ScoringEngine {
    ScoringEngine::new(catalog)
}

pub(super) fn service_with(store: MemoryCatalogStore) -> SurveyScoringService<MemoryCatalogStore> {
    SurveyScoringService::new(Arc::new(store))
}
