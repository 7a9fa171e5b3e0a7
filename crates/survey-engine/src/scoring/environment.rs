//! Fixed scoring scheme for the environment-scan test family.
//!
//! Unlike the catalog-driven path, this family hard-codes its scheme: items
//! are numbered `ENV001..`, rated on a 1..9 scale, and grouped in packets of
//! four where the first two items probe stability (`K`) and the last two
//! probe velocity (`r`). The run therefore produces exactly two aggregate
//! scores instead of a general profile map.

use std::collections::BTreeMap;

use super::domain::{question_id_from_header, AnswerSet, ScoreMap};

pub const STABILITY_CODE: &str = "K";
pub const VELOCITY_CODE: &str = "r";

const ITEM_PREFIX: &str = "ENV";
const SCALE_HIGH: f64 = 6.5;
const SCALE_LOW: f64 = 3.5;

/// Aggregate result of an environment scan, on the item scale (1..9).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentScan {
    pub stability: f64,
    pub velocity: f64,
    /// Number of items that carried a usable numeric value.
    pub answered: usize,
}

/// Scores an environment-scan answer set. Items are bucketed by their
/// position inside each packet of four: `(n - 1) mod 4 < 2` feeds stability,
/// the rest feed velocity; each bucket is averaged.
pub fn score_environment(answers: &AnswerSet) -> EnvironmentScan {
    let mut stability = BucketAverage::default();
    let mut velocity = BucketAverage::default();

    for (header, value) in answers {
        let Some(number) = item_number(header) else {
            continue;
        };
        let Some(rating) = value.as_number() else {
            continue;
        };

        if (number - 1) % 4 < 2 {
            stability.push(rating);
        } else {
            velocity.push(rating);
        }
    }

    EnvironmentScan {
        stability: round2(stability.mean()),
        velocity: round2(velocity.mean()),
        answered: stability.count + velocity.count,
    }
}

impl EnvironmentScan {
    pub fn score_map(&self) -> ScoreMap {
        let mut scores = ScoreMap::new();
        scores.insert(STABILITY_CODE.to_string(), self.stability);
        scores.insert(VELOCITY_CODE.to_string(), self.velocity);
        scores
    }

    /// Quadrant label used as the final profile for this family.
    pub fn quadrant_label(&self) -> &'static str {
        let stable = self.stability >= SCALE_HIGH;
        let unstable = self.stability <= SCALE_LOW;
        let fast = self.velocity >= SCALE_HIGH;
        let slow = self.velocity <= SCALE_LOW;

        if stable && slow {
            "Stable & Slow"
        } else if stable && fast {
            "Stable & Fast"
        } else if unstable && fast {
            "Unstable & Fast"
        } else if unstable && slow {
            "Unstable & Slow"
        } else if self.stability >= self.velocity {
            "Mostly Stable"
        } else {
            "Mostly Fast"
        }
    }

    pub fn stability_interpretation(&self) -> &'static str {
        interpret(
            self.stability,
            "Stable, predictable environment",
            "Unstable, shifting environment",
            "Moderate stability with some variation",
        )
    }

    pub fn velocity_interpretation(&self) -> &'static str {
        interpret(
            self.velocity,
            "Rapid change, strong momentum",
            "Slow change, weak momentum",
            "Moderate pace of change",
        )
    }
}

/// Display names for the two aggregate codes.
pub fn code_names() -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    names.insert(STABILITY_CODE.to_string(), "Stability (K)".to_string());
    names.insert(VELOCITY_CODE.to_string(), "Velocity (r)".to_string());
    names
}

fn interpret(
    score: f64,
    high: &'static str,
    low: &'static str,
    middle: &'static str,
) -> &'static str {
    if score >= 7.0 {
        high
    } else if score <= 3.0 {
        low
    } else {
        middle
    }
}

/// Item number from an `"ENV007: ..."` header; headers without the packet
/// prefix (or without digits) belong to other columns.
fn item_number(header: &str) -> Option<u32> {
    let id = question_id_from_header(header).unwrap_or(header).trim();
    let digits = id.strip_prefix(ITEM_PREFIX)?;
    let digits: String = digits.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok().filter(|number| *number >= 1)
}

#[derive(Debug, Default)]
struct BucketAverage {
    sum: f64,
    count: usize,
}

impl BucketAverage {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
