//! Catalog-driven survey scoring.
//!
//! One scoring run flows raw answers through the normalizer and the compiled
//! question catalog into a per-profile score map, resolves the final profile
//! with the strategy bound to the test type, and assembles a flat result
//! record for templating. Catalogs are read-only per run and the score map is
//! run-local, so invocations never share state.

pub mod catalog;
pub mod domain;
pub mod normalize;
pub mod router;
pub mod service;

mod assembler;
mod diagnostics;
mod engine;
mod environment;
mod resolver;

#[cfg(test)]
mod tests;

pub use assembler::{ResultAssembler, SurveyResult};
pub use catalog::{CatalogError, CatalogStore, CsvCatalogStore};
pub use diagnostics::ScoringDiagnostics;
pub use domain::{
    AnswerSet, AnswerValue, ChoiceOption, ProcessingMode, Profile, ProfileCatalog, ProfileOutcome,
    Question, QuestionCatalog, QuestionId, ScoreMap, ScoringRequest, StrategyKind, ThresholdExpr,
    ThresholdRule,
};
pub use engine::{ScoreRun, ScoringEngine};
pub use environment::{score_environment, EnvironmentScan};
pub use normalize::{normalize_language_code, normalize_text};
pub use resolver::resolve;
pub use router::scoring_router;
pub use service::{CatalogSummary, ScoringServiceError, SurveyScoringService};
