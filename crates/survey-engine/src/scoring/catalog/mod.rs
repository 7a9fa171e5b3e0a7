//! Catalog partition loading.
//!
//! The backing database is a set of CSV exports, one file per
//! `(kind, test type, language)` partition, mirroring the spreadsheet tabs
//! they were extracted from (`questions_MBTI_EN.csv`,
//! `profiles_MBTI_EN.csv`, ...). Loading is deliberately tolerant: a corrupt
//! row is logged and skipped, never fatal. Only a missing *questions*
//! partition makes scoring impossible, and that is reported as an absence,
//! not an error.

mod profiles;
mod questions;
mod thresholds;

pub(crate) use profiles::parse_profiles;
pub(crate) use questions::parse_questions;
pub(crate) use thresholds::parse_thresholds;

use std::fs::File;
use std::path::{Path, PathBuf};

use super::domain::{ProfileCatalog, QuestionCatalog, ThresholdRule};
use crate::composition::CompositionCatalog;

/// Catalog provider seam so the engine can be exercised against in-memory
/// fixtures in tests and a CSV directory in production.
pub trait CatalogStore: Send + Sync {
    /// Question partition for one test type and language; `None` when the
    /// partition does not exist (scoring is then impossible for that pair).
    fn questions(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError>;

    /// Profile partition; absent partitions yield an empty catalog.
    fn profiles(&self, test_type: &str, language: &str) -> Result<ProfileCatalog, CatalogError>;

    /// Ordered threshold rows; absent partitions yield an empty list.
    fn thresholds(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Vec<ThresholdRule>, CatalogError>;
}

/// Error enumeration for catalog access failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog partition '{partition}' is unreadable: {source}")]
    Io {
        partition: String,
        #[source]
        source: std::io::Error,
    },
}

/// CSV-directory implementation of [`CatalogStore`].
#[derive(Debug, Clone)]
pub struct CsvCatalogStore {
    directory: PathBuf,
}

impl CsvCatalogStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn partition_path(&self, kind: &str, test_type: &str, language: &str) -> PathBuf {
        self.directory
            .join(format!("{kind}_{test_type}_{language}.csv"))
    }

    fn open(&self, path: &Path) -> Result<Option<File>, CatalogError> {
        if !path.exists() {
            return Ok(None);
        }
        File::open(path)
            .map(Some)
            .map_err(|source| CatalogError::Io {
                partition: path.display().to_string(),
                source,
            })
    }

    /// Email composition blocks, shared across test types per language file.
    pub fn composition(&self) -> Result<CompositionCatalog, CatalogError> {
        let path = self.directory.join("composition.csv");
        match self.open(&path)? {
            Some(file) => Ok(CompositionCatalog::from_reader(file)),
            None => Ok(CompositionCatalog::default()),
        }
    }
}

impl CatalogStore for CsvCatalogStore {
    fn questions(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Option<QuestionCatalog>, CatalogError> {
        let path = self.partition_path("questions", test_type, language);
        match self.open(&path)? {
            Some(file) => Ok(Some(parse_questions(file, test_type, language))),
            None => Ok(None),
        }
    }

    fn profiles(&self, test_type: &str, language: &str) -> Result<ProfileCatalog, CatalogError> {
        let path = self.partition_path("profiles", test_type, language);
        match self.open(&path)? {
            Some(file) => Ok(parse_profiles(file)),
            None => Ok(ProfileCatalog::default()),
        }
    }

    fn thresholds(
        &self,
        test_type: &str,
        language: &str,
    ) -> Result<Vec<ThresholdRule>, CatalogError> {
        let path = self.partition_path("thresholds", test_type, language);
        match self.open(&path)? {
            Some(file) => Ok(parse_thresholds(file)),
            None => Ok(Vec::new()),
        }
    }
}
