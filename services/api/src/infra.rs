use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use survey_engine::composition::{CompositionBlock, CompositionCatalog};
use survey_engine::scoring::catalog::{CatalogError, CatalogStore};
use survey_engine::scoring::{
    ChoiceOption, ProcessingMode, Profile, ProfileCatalog, Question, QuestionCatalog, QuestionId,
    ThresholdRule,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed in-memory catalogs backing the `demo` subcommand, so it runs without
/// any exported catalog files on disk.
pub(crate) struct DemoCatalogStore {
    questions: QuestionCatalog,
    profiles: ProfileCatalog,
}

pub(crate) const DEMO_TEST_TYPE: &str = "DISC";
pub(crate) const DEMO_LANGUAGE: &str = "EN";

impl Default for DemoCatalogStore {
    fn default() -> Self {
        let mut questions = QuestionCatalog::new(DEMO_TEST_TYPE, DEMO_LANGUAGE);
        questions.insert(Question {
            id: QuestionId("Q1".to_string()),
            mode: ProcessingMode::SingleChoice,
            mode_label: "QCU_CAT".to_string(),
            profile: None,
            options: vec![
                ChoiceOption::new("Lead the group", Some("D".to_string()), Some(2.0)),
                ChoiceOption::new("Energize the group", Some("I".to_string()), Some(2.0)),
                ChoiceOption::new("Support the group", Some("S".to_string()), Some(2.0)),
                ChoiceOption::new("Structure the group", Some("C".to_string()), Some(2.0)),
            ],
            min: None,
            max: None,
        });
        questions.insert(Question {
            id: QuestionId("Q2".to_string()),
            mode: ProcessingMode::MultiChoice,
            mode_label: "QRM_CAT".to_string(),
            profile: None,
            options: vec![
                ChoiceOption::new("Deadlines", Some("D".to_string()), Some(1.0)),
                ChoiceOption::new("Brainstorms", Some("I".to_string()), Some(1.0)),
                ChoiceOption::new("Routines", Some("S".to_string()), Some(1.0)),
                ChoiceOption::new("Checklists", Some("C".to_string()), Some(1.0)),
            ],
            min: None,
            max: None,
        });
        questions.insert(Question {
            id: QuestionId("Q3".to_string()),
            mode: ProcessingMode::NumericScale,
            mode_label: "ECHELLE_NOTE".to_string(),
            profile: Some("D".to_string()),
            options: Vec::new(),
            min: Some(1.0),
            max: Some(5.0),
        });

        let mut profiles = ProfileCatalog::default();
        for (code, title, description) in [
            ("D", "Driver", "Direct, decisive, and results-focused."),
            ("I", "Influencer", "Outgoing, optimistic, and persuasive."),
            ("S", "Stabilizer", "Patient, loyal, and team-minded."),
            ("C", "Analyst", "Precise, systematic, and quality-driven."),
        ] {
            let mut metadata = BTreeMap::new();
            metadata.insert("title".to_string(), title.to_string());
            metadata.insert("description".to_string(), description.to_string());
            profiles.insert(Profile {
                code: code.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                metadata,
            });
        }

        Self {
            questions,
            profiles,
        }
    }
}

impl CatalogStore for DemoCatalogStore {
    fn questions(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError> {
        if test_type == DEMO_TEST_TYPE && language == DEMO_LANGUAGE {
            Ok(Some(self.questions.clone()))
        } else {
            Ok(None)
        }
    }

    fn profiles(&self, _test_type: &str, _language: &str) -> Result<ProfileCatalog, CatalogError> {
        Ok(self.profiles.clone())
    }

    fn thresholds(
        &self,
        _test_type: &str,
        _language: &str,
    ) -> Result<Vec<ThresholdRule>, CatalogError> {
        Ok(Vec::new())
    }
}

pub(crate) fn demo_composition() -> CompositionCatalog {
    use survey_engine::composition::BlockElement;

    let block = |element, order, content: &str| CompositionBlock {
        test_type: String::new(),
        language: DEMO_LANGUAGE.to_string(),
        levels: vec!["N1".to_string()],
        profile: String::new(),
        element,
        order,
        content: content.to_string(),
    };

    CompositionCatalog::new(vec![
        block(BlockElement::Subject, 1, "Your {{test_type}} results: {{profile_title}}"),
        block(BlockElement::Introduction, 10, "Thank you for completing the survey."),
        block(BlockElement::ScoreLine, 20, "{{profile_name}}: {{score}} points"),
        block(BlockElement::BodyText, 30, "{{profile_description}}"),
        block(
            BlockElement::CopyNotice,
            40,
            "This is a copy of a respondent's result email.<br>",
        ),
    ])
}
