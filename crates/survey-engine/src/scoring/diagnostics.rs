use serde::Serialize;
use tracing::debug;

/// Cap on per-run debug lines so a malformed submission cannot flood the log.
const MAX_LOGGED_EVENTS: u32 = 5;

/// Per-run counters for answers that contributed nothing. Scoped to one
/// scoring run and returned with it, so repeated runs never share state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringDiagnostics {
    pub unmatched_answers: u32,
    pub unknown_modes: u32,
    pub translation_misses: u32,
    #[serde(skip)]
    logged: u32,
}

impl ScoringDiagnostics {
    pub fn unmatched_answer(&mut self, question_id: &str, raw: &str) {
        self.unmatched_answers += 1;
        if self.bump_logged() {
            debug!(question_id, raw, "answer matched no option");
        }
    }

    pub fn unknown_mode(&mut self, question_id: &str, mode_label: &str) {
        self.unknown_modes += 1;
        if self.bump_logged() {
            debug!(question_id, mode_label, "unrecognized processing mode");
        }
    }

    pub fn translation_miss(&mut self, question_id: &str, token: &str) {
        self.translation_misses += 1;
        if self.bump_logged() {
            debug!(question_id, token, "origin option missing from target catalog");
        }
    }

    /// True while the run is still under its logging budget.
    fn bump_logged(&mut self) -> bool {
        if self.logged >= MAX_LOGGED_EVENTS {
            return false;
        }
        self.logged += 1;
        true
    }

    pub fn is_clean(&self) -> bool {
        self.unmatched_answers == 0 && self.unknown_modes == 0 && self.translation_misses == 0
    }
}
