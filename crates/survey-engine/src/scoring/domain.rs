use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::normalize::{normalize_mode_label, normalize_text};

/// Identifier wrapper for catalog questions (e.g. "Q12", "ENV007").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw answer cell as submitted through the forms host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Numeric reading of the answer; text values accept a comma or a dot as
    /// the decimal separator.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(value) => parse_decimal(value),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Number(value) => format_score(*value),
            AnswerValue::Text(value) => value.clone(),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

/// One submission's answers keyed by the response-sheet column header.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

/// Accumulated profile scores for a single scoring run.
pub type ScoreMap = BTreeMap<String, f64>;

/// Extracts the question id from a `"<id>: <free text>"` column header.
/// Headers without the separator are metadata columns, not scored answers.
pub fn question_id_from_header(header: &str) -> Option<&str> {
    let (id, _) = header.split_once(':')?;
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

pub(crate) fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned = value.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Renders a score without a trailing `.0` for whole values, matching how the
/// spreadsheet displayed them.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// How a raw answer maps to a score contribution. Resolved once at catalog
/// load; the engine never re-parses mode strings per answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingMode {
    /// The raw numeric answer replaces the configured profile's score.
    DirectAssign,
    /// Single-select: one option match contributes its weight.
    SingleChoice,
    /// Multi-select: comma-separated labels each contribute, additively.
    MultiChoice,
    /// Numeric scale: the parsed answer accumulates into one profile.
    NumericScale,
    /// Five-point rating: numeric, with a label fallback through options.
    Likert,
    /// Unknown mode label kept for per-answer diagnostics.
    Unrecognized,
}

impl ProcessingMode {
    pub fn parse(label: &str) -> Self {
        match normalize_mode_label(label).as_str() {
            "QCU_DIRECT" => ProcessingMode::DirectAssign,
            "QCU_CAT" => ProcessingMode::SingleChoice,
            "QRM_CAT" => ProcessingMode::MultiChoice,
            "ECHELLE_NOTE" => ProcessingMode::NumericScale,
            "LIKERT_5" => ProcessingMode::Likert,
            _ => ProcessingMode::Unrecognized,
        }
    }
}

/// One selectable option of a choice question, with its normalized label
/// precomputed so answer matching is a plain string comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub normalized_label: String,
    pub profile: Option<String>,
    pub value: Option<f64>,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, profile: Option<String>, value: Option<f64>) -> Self {
        let label = label.into();
        let normalized_label = normalize_text(&label);
        Self {
            label,
            normalized_label,
            profile,
            value,
        }
    }

    /// Contribution weight; options without an explicit weight count for one.
    pub fn weight(&self) -> f64 {
        self.value.unwrap_or(1.0)
    }
}

/// A question definition compiled from its catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub mode: ProcessingMode,
    pub mode_label: String,
    pub profile: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-language question partition, keyed by question id.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    pub test_type: String,
    pub language: String,
    questions: BTreeMap<String, Question>,
}

impl QuestionCatalog {
    pub fn new(test_type: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            test_type: test_type.into(),
            language: language.into(),
            questions: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, question: Question) {
        self.questions.insert(question.id.0.clone(), question);
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.get(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }
}

/// A named outcome category with whatever display metadata the templates need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub code: String,
    pub title: String,
    pub description: String,
    /// Every other catalog column, kept verbatim for templating.
    pub metadata: BTreeMap<String, String>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            &self.code
        } else {
            &self.title
        }
    }
}

/// Per-language profile partition keyed by profile code.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: BTreeMap<String, Profile>,
}

impl ProfileCatalog {
    pub fn insert(&mut self, profile: Profile) {
        self.profiles.insert(profile.code.clone(), profile);
    }

    pub fn get(&self, code: &str) -> Option<&Profile> {
        self.profiles.get(code)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Lookup table handed to templating so score lines can show display
    /// names instead of bare codes.
    pub fn code_names(&self) -> BTreeMap<String, String> {
        self.profiles
            .iter()
            .map(|(code, profile)| (code.clone(), profile.display_name().to_string()))
            .collect()
    }
}

/// Ordered threshold row refining a majority profile into a final profile and
/// recommendation, scanned first-match-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    /// Refined profile code returned when the row matches.
    pub profile: String,
    /// Majority-profile tag the row applies to; empty means the row's own
    /// profile code doubles as the tag.
    pub majority: String,
    pub audience: String,
    pub axis: String,
    pub condition: ThresholdExpr,
    pub recommendation: String,
}

impl ThresholdRule {
    pub fn match_tag(&self) -> &str {
        if self.majority.is_empty() {
            &self.profile
        } else {
            &self.majority
        }
    }
}

/// Threshold expression over the majority profile's percentage of the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdExpr {
    AtLeast(f64),
    AtMost(f64),
    Between(f64, f64),
}

impl ThresholdExpr {
    /// Parses `">= 80"`, `"<= 20"`, or `"40-60"`. A leading profile token
    /// (legacy `"R >= 80"` rows) is tolerated and ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some((_, rest)) = trimmed.split_once(">=") {
            return parse_decimal(rest).map(ThresholdExpr::AtLeast);
        }
        if let Some((_, rest)) = trimmed.split_once("<=") {
            return parse_decimal(rest).map(ThresholdExpr::AtMost);
        }

        let numeric_part = trimmed
            .trim_start_matches(|ch: char| ch.is_alphabetic() || ch == '&' || ch == '_')
            .trim();
        let (low, high) = numeric_part.split_once('-')?;
        let low = parse_decimal(low)?;
        let high = parse_decimal(high)?;
        Some(ThresholdExpr::Between(low, high))
    }

    pub fn matches(&self, percentage: f64) -> bool {
        match self {
            ThresholdExpr::AtLeast(limit) => percentage >= *limit,
            ThresholdExpr::AtMost(limit) => percentage <= *limit,
            ThresholdExpr::Between(low, high) => percentage >= *low && percentage <= *high,
        }
    }
}

/// Final outcome of profile resolution. An empty score map resolves to
/// [`ProfileOutcome::Undetermined`], a normal terminal state rather than an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileOutcome {
    Determined {
        code: String,
        recommendation: Option<String>,
    },
    Undetermined,
}

impl ProfileOutcome {
    pub fn determined(code: impl Into<String>) -> Self {
        ProfileOutcome::Determined {
            code: code.into(),
            recommendation: None,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ProfileOutcome::Determined { code, .. } => code,
            ProfileOutcome::Undetermined => "",
        }
    }

    pub fn recommendation(&self) -> Option<&str> {
        match self {
            ProfileOutcome::Determined { recommendation, .. } => recommendation.as_deref(),
            ProfileOutcome::Undetermined => None,
        }
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, ProfileOutcome::Undetermined)
    }
}

/// Test families wired to a fixed resolution strategy. Everything not listed
/// falls back to majority resolution.
const DICHOTOMY_TEST_TYPES: [&str; 1] = ["MBTI"];
const THRESHOLD_TEST_TYPES: [&str; 3] = ["r&K_Adaptabilite", "r&K_Resilience", "r&K_Creativite"];
const ENVIRONMENT_TEST_TYPES: [&str; 1] = ["r&K_Environnement"];

/// Scoring/resolution strategy selected by test-type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Dichotomy,
    ThresholdTable,
    Majority,
    EnvironmentScan,
}

impl StrategyKind {
    pub fn for_test_type(test_type: &str) -> Self {
        let needle = normalize_text(test_type);
        let matches_any =
            |candidates: &[&str]| candidates.iter().any(|name| normalize_text(name) == needle);

        if matches_any(&ENVIRONMENT_TEST_TYPES) {
            StrategyKind::EnvironmentScan
        } else if matches_any(&THRESHOLD_TEST_TYPES) {
            StrategyKind::ThresholdTable
        } else if matches_any(&DICHOTOMY_TEST_TYPES) {
            StrategyKind::Dichotomy
        } else {
            StrategyKind::Majority
        }
    }
}

/// One scoring run's input: a survey answer set plus its routing metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringRequest {
    pub test_type: String,
    pub language: String,
    #[serde(default)]
    pub origin_language: Option<String>,
    pub answers: AnswerSet,
}
