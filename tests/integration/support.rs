//! Shared fixtures: an ISO 2709 writer and an in-memory catalogue

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bebb_catalogue::{
    models::{RawRecord, SystemNumber},
    services::CatalogueClient,
    AppError, AppResult,
};

/// Serialize fields into a MARC21 record. Tags below 010 are control fields.
pub fn marc(fields: &[(&str, &[(char, &str)])]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, subfields) in fields {
        let mut body = Vec::new();
        if tag.as_bytes() < b"010".as_slice() {
            body.extend_from_slice(subfields.first().map(|(_, v)| *v).unwrap_or("").as_bytes());
        } else {
            body.extend_from_slice(b"  ");
            for (code, value) in *subfields {
                body.push(0x1F);
                body.push(*code as u8);
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.push(0x1E);
        directory.extend_from_slice(format!("{}{:04}{:05}", tag, body.len(), data.len()).as_bytes());
        data.extend_from_slice(&body);
    }
    directory.push(0x1E);
    data.push(0x1D);

    let base = 24 + directory.len();
    let mut record = format!("{:05}nam a22{:05} a 4500", base + data.len(), base).into_bytes();
    record.extend_from_slice(&directory);
    record.extend_from_slice(&data);
    record
}

pub fn number(s: &str) -> SystemNumber {
    s.parse().unwrap()
}

/// Catalogue answering from a fixed map; unknown numbers fail to connect
#[derive(Clone, Default)]
pub struct FakeCatalogue {
    records: HashMap<String, Vec<u8>>,
    missing: Vec<String>,
    calls: Arc<AtomicUsize>,
}

impl FakeCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, system_number: &str, bytes: Vec<u8>) -> Self {
        self.records.insert(system_number.to_string(), bytes);
        self
    }

    /// Reachable, but no hit for this number
    pub fn without_record(mut self, system_number: &str) -> Self {
        self.missing.push(system_number.to_string());
        self
    }

    /// Shared counter, readable after the catalogue is boxed away
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl CatalogueClient for FakeCatalogue {
    async fn fetch(&self, system_number: &SystemNumber) -> AppResult<RawRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(bytes) = self.records.get(system_number.as_str()) {
            return Ok(RawRecord::from(bytes.clone()));
        }
        if self.missing.iter().any(|m| m == system_number.as_str()) {
            return Err(AppError::NoRecord(system_number.to_string()));
        }
        Err(AppError::Connection(format!(
            "session to catalogue failed for {}",
            system_number
        )))
    }
}
