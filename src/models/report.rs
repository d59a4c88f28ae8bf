//! Batch fetch report models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::identifier::SystemNumber;
use crate::error::{AppError, FailureKind};
use crate::marc::MarcRecord;

/// Where a record came from during this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    Cache,
    Catalogue,
}

/// One successfully decoded record
#[derive(Debug, Clone)]
pub struct FetchedRecord {
    pub system_number: SystemNumber,
    pub origin: RecordOrigin,
    pub record: MarcRecord,
}

/// One identifier that could not be fetched; enough to retry it later
#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub system_number: SystemNumber,
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(system_number: SystemNumber, err: &AppError) -> Self {
        Self {
            system_number,
            kind: err.into(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a batch: successes in input order plus every failure
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub records: Vec<FetchedRecord>,
    pub failures: Vec<FetchFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn system_numbers(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.system_number.as_str()).collect()
    }

    pub fn from_cache(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.origin == RecordOrigin::Cache)
            .count()
    }
}
