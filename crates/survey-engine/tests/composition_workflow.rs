//! Integration specification for composing a result email from a scored run.

use std::io::Cursor;
use std::sync::Arc;

use survey_engine::composition::{CompositionCatalog, DeliveryRules};
use survey_engine::scoring::{
    AnswerValue, ChoiceOption, ProcessingMode, Profile, ProfileCatalog, Question, QuestionCatalog,
    QuestionId, ScoringRequest, SurveyScoringService,
};

use std::collections::BTreeMap;

use survey_engine::scoring::catalog::{CatalogError, CatalogStore};
use survey_engine::scoring::ThresholdRule;

struct FixtureStore {
    questions: QuestionCatalog,
    profiles: ProfileCatalog,
}

impl CatalogStore for FixtureStore {
    fn questions(
        &self,
        _test_type: &str,
        _language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError> {
        Ok(Some(self.questions.clone()))
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

fn fixture_store() -> FixtureStore {
    let mut questions = QuestionCatalog::new("DISC", "EN");
    questions.insert(Question {
        id: QuestionId("Q1".to_string()),
        mode: ProcessingMode::SingleChoice,
        mode_label: "QCU_CAT".to_string(),
        profile: None,
        options: vec![
            ChoiceOption::new("Red", Some("X".to_string()), Some(3.0)),
            ChoiceOption::new("Blue", Some("Y".to_string()), Some(2.0)),
        ],
        min: None,
        max: None,
    });

    let mut profiles = ProfileCatalog::default();
    let mut metadata = BTreeMap::new();
    metadata.insert("title".to_string(), "Explorer".to_string());
    metadata.insert("description".to_string(), "Curious and bold".to_string());
    profiles.insert(Profile {
        code: "X".to_string(),
        title: "Explorer".to_string(),
        description: "Curious and bold".to_string(),
        metadata,
    });

    FixtureStore {
        questions,
        profiles,
    }
}

const COMPOSITION_CSV: &str = "test_type,language,levels,profile,element,order,content\n\
,EN,\"N1,N2\",,Subject,1,{{profile_title}} - your results\n\
,EN,N1,,Introduction,10,\"Hello {{Your name}},\"\n\
,EN,N1,,Score line,20,{{profile_name}}: {{score}} points\n\
,EN,N1,X,Body,30,{{description}}\n\
,EN,N1,,Document,40,doc-overview\n\
,EN,N1,,Copy notice,50,You receive a copy of this result.<br>\n";

#[test]
fn scored_run_renders_into_a_complete_email() {
    let service = SurveyScoringService::new(Arc::new(fixture_store()));
    let request = ScoringRequest {
        test_type: "DISC".to_string(),
        language: "EN".to_string(),
        origin_language: None,
        answers: [
            (
                "Q1: color".to_string(),
                AnswerValue::Text("Red".to_string()),
            ),
            (
                "Your name".to_string(),
                AnswerValue::Text("Ada".to_string()),
            ),
        ]
        .into_iter()
        .collect(),
    };

    let result = service.run(&request).expect("run succeeds");
    let catalog = CompositionCatalog::from_reader(Cursor::new(COMPOSITION_CSV));
    let email = catalog.compose(&result, &request.answers, "N1", "EN");

    assert_eq!(email.subject, "Explorer - your results");
    assert!(email.html_body.starts_with("Hello Ada,<br>"));
    assert!(email.html_body.contains("Explorer: 3 points<br>"));
    assert!(email.html_body.contains("Curious and bold<br>"));
    assert_eq!(email.attachment_ids, vec!["doc-overview"]);

    let rules = DeliveryRules {
        respondent_enabled: true,
        trainer_email: Some("coach@example.com".to_string()),
        sponsor_email: None,
        developer_email: None,
    };
    let recipients = rules.recipients(Some("ada@example.com"));
    assert_eq!(recipients.len(), 2);

    let copy_body = email.body_for(&recipients[1]);
    assert!(copy_body.starts_with("You receive a copy of this result.<br>"));
    assert_eq!(
        email.subject_for(&recipients[1], "Copy: "),
        "Copy: Explorer - your results"
    );
}

#[test]
fn level_filtering_selects_a_different_rendition() {
    let service = SurveyScoringService::new(Arc::new(fixture_store()));
    let request = ScoringRequest {
        test_type: "DISC".to_string(),
        language: "EN".to_string(),
        origin_language: None,
        answers: [(
            "Q1: color".to_string(),
            AnswerValue::Text("Red".to_string()),
        )]
        .into_iter()
        .collect(),
    };

    let result = service.run(&request).expect("run succeeds");
    let catalog = CompositionCatalog::from_reader(Cursor::new(COMPOSITION_CSV));
    let email = catalog.compose(&result, &request.answers, "N2", "EN");

    // Only the subject block carries the N2 tag.
    assert_eq!(email.subject, "Explorer - your results");
    assert!(email.html_body.is_empty());
    assert!(email.attachment_ids.is_empty());
}
