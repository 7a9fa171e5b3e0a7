//! Scoring and results engine for spreadsheet-driven survey campaigns.
//!
//! The engine consumes an answer set collected by a forms host, scores it
//! against CSV catalog partitions (questions, profiles, thresholds), resolves
//! a final profile, and assembles the flat result record the email composer
//! renders. Form rendering, document generation, and mail transport remain
//! external services.

pub mod composition;
pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
