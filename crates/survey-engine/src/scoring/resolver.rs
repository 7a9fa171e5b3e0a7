//! Final-profile resolution over an accumulated score map.
//!
//! Exactly one strategy applies per run, selected by test type: the fixed
//! four-axis dichotomy, the threshold-table refinement, or plain majority.
//! An empty score map always resolves to `Undetermined`; that is a normal
//! terminal state for an empty or unmatched submission, not a fault.

use super::domain::{ProfileOutcome, ScoreMap, StrategyKind, ThresholdRule};
use super::normalize::normalize_text;

/// Axis pairs of the dichotomy scheme; the strictly higher pole wins, ties
/// fall to the second pole.
const DICHOTOMY_AXES: [(char, char); 4] = [('E', 'I'), ('S', 'N'), ('T', 'F'), ('J', 'P')];

/// Audience and axis tags a threshold row must carry to participate in
/// respondent-facing resolution.
const RESPONDENT_AUDIENCE: &str = "respondent";
const DEVELOP_POTENTIAL_AXIS: &str = "develop-potential";

pub fn resolve(
    scores: &ScoreMap,
    strategy: StrategyKind,
    thresholds: &[ThresholdRule],
) -> ProfileOutcome {
    if scores.is_empty() {
        return ProfileOutcome::Undetermined;
    }

    match strategy {
        StrategyKind::Dichotomy => resolve_dichotomy(scores),
        StrategyKind::ThresholdTable => resolve_thresholds(scores, thresholds),
        // The environment scan derives its label during scoring; anything
        // that still reaches the resolver falls back to majority.
        StrategyKind::Majority | StrategyKind::EnvironmentScan => resolve_majority(scores),
    }
}

/// Concatenates the winning pole of each fixed axis pair into a four-letter
/// code. Missing poles count as zero, so the result is total: any score map
/// (including all-zero) yields a full code.
fn resolve_dichotomy(scores: &ScoreMap) -> ProfileOutcome {
    let score_of = |pole: char| {
        scores
            .get(pole.to_string().as_str())
            .copied()
            .unwrap_or(0.0)
    };

    let code: String = DICHOTOMY_AXES
        .iter()
        .map(|(first, second)| {
            if score_of(*first) > score_of(*second) {
                *first
            } else {
                *second
            }
        })
        .collect();

    ProfileOutcome::determined(code)
}

/// Majority resolution with a deterministic tie-break: the strictly highest
/// score wins; equal scores fall to the lexicographically smallest profile
/// code. (The score map iterates in code order, so keeping the first
/// strictly-greater entry implements exactly that.)
fn resolve_majority(scores: &ScoreMap) -> ProfileOutcome {
    let mut winner: Option<(&str, f64)> = None;
    for (code, score) in scores {
        match winner {
            Some((_, best)) if *score <= best => {}
            _ => winner = Some((code, *score)),
        }
    }

    match winner {
        Some((code, _)) => ProfileOutcome::determined(code),
        None => ProfileOutcome::Undetermined,
    }
}

/// Threshold-table resolution: the majority profile's share of the total is
/// matched against the ordered rules; the first satisfied row supplies the
/// refined profile and its recommendation. With no matching row the raw
/// majority code stands, without a recommendation.
fn resolve_thresholds(scores: &ScoreMap, thresholds: &[ThresholdRule]) -> ProfileOutcome {
    let total: f64 = scores.values().sum();
    if total == 0.0 {
        return ProfileOutcome::Undetermined;
    }

    let ProfileOutcome::Determined { code: majority, .. } = resolve_majority(scores) else {
        return ProfileOutcome::Undetermined;
    };
    let majority_score = scores.get(&majority).copied().unwrap_or(0.0);
    let percentage = majority_score / total * 100.0;

    let majority_tag = normalize_text(&majority);
    for rule in thresholds {
        if normalize_text(rule.match_tag()) != majority_tag {
            continue;
        }
        if normalize_text(&rule.audience) != RESPONDENT_AUDIENCE
            || normalize_text(&rule.axis) != DEVELOP_POTENTIAL_AXIS
        {
            continue;
        }
        if rule.condition.matches(percentage) {
            let recommendation = if rule.recommendation.is_empty() {
                None
            } else {
                Some(rule.recommendation.clone())
            };
            return ProfileOutcome::Determined {
                code: rule.profile.clone(),
                recommendation,
            };
        }
    }

    ProfileOutcome::determined(majority)
}
