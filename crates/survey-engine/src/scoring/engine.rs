use super::diagnostics::ScoringDiagnostics;
use super::domain::{
    question_id_from_header, AnswerSet, AnswerValue, ChoiceOption, ProcessingMode, Question,
    QuestionCatalog, ScoreMap,
};
use super::normalize::normalize_text;

/// Stateless scorer over one compiled question catalog. Each call builds a
/// fresh [`ScoreMap`]; nothing is shared between runs.
pub struct ScoringEngine {
    questions: QuestionCatalog,
}

/// Outcome of one scoring pass: the accumulated scores plus the run-scoped
/// diagnostics counters.
#[derive(Debug, Default, Clone)]
pub struct ScoreRun {
    pub scores: ScoreMap,
    pub diagnostics: ScoringDiagnostics,
}

impl ScoringEngine {
    pub fn new(questions: QuestionCatalog) -> Self {
        Self { questions }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.questions
    }

    /// Scores an answer set against the engine's catalog. Headers that do not
    /// follow the `"<id>: <text>"` convention, or reference unknown
    /// questions, are metadata columns and contribute nothing.
    pub fn score(&self, answers: &AnswerSet) -> ScoreRun {
        let mut run = ScoreRun::default();

        for (header, value) in answers {
            let Some(id) = question_id_from_header(header) else {
                continue;
            };
            let Some(question) = self.questions.get(id) else {
                continue;
            };
            apply_answer(question, value, &mut run);
        }

        run
    }

    /// Cross-language scoring: the respondent answered in `origin`'s labels,
    /// the result is computed against this engine's (target) catalog.
    ///
    /// Numeric modes carry over unchanged. Choice answers are located in the
    /// origin catalog and mapped by option index into the target catalog.
    /// The partitions are assumed to list options in the same order, which is
    /// unverified (a known correctness gap of the source data model). An
    /// index with no target counterpart is skipped and counted, never fatal.
    pub fn score_translated(&self, answers: &AnswerSet, origin: &QuestionCatalog) -> ScoreRun {
        let mut run = ScoreRun::default();

        for (header, value) in answers {
            let Some(id) = question_id_from_header(header) else {
                continue;
            };
            let Some(target) = self.questions.get(id) else {
                continue;
            };

            match target.mode {
                ProcessingMode::DirectAssign
                | ProcessingMode::NumericScale
                | ProcessingMode::Likert => {
                    apply_answer(target, value, &mut run);
                }
                ProcessingMode::SingleChoice | ProcessingMode::MultiChoice => {
                    let Some(origin_question) = origin.get(id) else {
                        run.diagnostics.translation_miss(id, header);
                        continue;
                    };
                    translate_choice(target, origin_question, &value.as_text(), &mut run);
                }
                ProcessingMode::Unrecognized => {
                    run.diagnostics.unknown_mode(id, &target.mode_label);
                }
            }
        }

        run
    }
}

fn apply_answer(question: &Question, value: &AnswerValue, run: &mut ScoreRun) {
    let id = question.id.as_str();

    match question.mode {
        ProcessingMode::DirectAssign => {
            let Some(profile) = question.profile.as_deref() else {
                return;
            };
            match value.as_number() {
                // Direct assignment replaces any earlier value instead of
                // accumulating; this is the one overwriting mode.
                Some(number) => {
                    run.scores.insert(profile.to_string(), number);
                }
                None => run.diagnostics.unmatched_answer(id, &value.as_text()),
            }
        }
        ProcessingMode::SingleChoice => {
            score_choice_token(question, &value.as_text(), run);
        }
        ProcessingMode::MultiChoice => {
            // Multi-select answers arrive as one comma-joined cell; each
            // token is matched independently and accumulates, so repeated
            // selections count repeatedly.
            for token in value.as_text().split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    score_choice_token(question, token, run);
                }
            }
        }
        ProcessingMode::NumericScale => {
            let Some(profile) = question.profile.as_deref() else {
                return;
            };
            match value.as_number() {
                Some(number) => accumulate(&mut run.scores, profile, number),
                None => run.diagnostics.unmatched_answer(id, &value.as_text()),
            }
        }
        ProcessingMode::Likert => {
            match value.as_number() {
                Some(number) => {
                    if let Some(profile) = question.profile.as_deref() {
                        accumulate(&mut run.scores, profile, number);
                    }
                }
                // Non-numeric ratings fall back to the option labels, which
                // carry their own weight and profile.
                None => score_choice_token(question, &value.as_text(), run),
            }
        }
        ProcessingMode::Unrecognized => {
            run.diagnostics.unknown_mode(id, &question.mode_label);
        }
    }
}

/// Matches one answer token against a question's options and accumulates the
/// matched option's weight. Misses contribute nothing.
fn score_choice_token(question: &Question, token: &str, run: &mut ScoreRun) {
    let Some(option) = match_option(question, token) else {
        run.diagnostics
            .unmatched_answer(question.id.as_str(), token);
        return;
    };

    // Options without a profile are display-only entries.
    let Some(profile) = option.profile.as_deref().or(question.profile.as_deref()) else {
        return;
    };
    accumulate(&mut run.scores, profile, option.weight());
}

/// Label lookup with the numeric fallback: an unmatched answer that parses as
/// a whole number is read as a 1-based index into the options list.
fn match_option<'q>(question: &'q Question, token: &str) -> Option<&'q ChoiceOption> {
    match_option_index(question, token).map(|index| &question.options[index])
}

fn match_option_index(question: &Question, token: &str) -> Option<usize> {
    let normalized = normalize_text(token);
    if let Some(position) = question
        .options
        .iter()
        .position(|option| option.normalized_label == normalized)
    {
        return Some(position);
    }

    let index = super::domain::parse_decimal(token)
        .filter(|number| number.fract() == 0.0 && *number >= 1.0)
        .map(|number| number as usize)?;
    if index <= question.options.len() {
        Some(index - 1)
    } else {
        None
    }
}

fn translate_choice(target: &Question, origin: &Question, raw: &str, run: &mut ScoreRun) {
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let Some(position) = match_option_index(origin, token) else {
            run.diagnostics
                .unmatched_answer(target.id.as_str(), token);
            continue;
        };

        let Some(option) = target.options.get(position) else {
            run.diagnostics.translation_miss(target.id.as_str(), token);
            continue;
        };

        let Some(profile) = option.profile.as_deref().or(target.profile.as_deref()) else {
            continue;
        };
        accumulate(&mut run.scores, profile, option.weight());
    }
}

fn accumulate(scores: &mut ScoreMap, profile: &str, value: f64) {
    *scores.entry(profile.to_string()).or_insert(0.0) += value;
}
