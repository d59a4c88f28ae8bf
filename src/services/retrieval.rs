//! Fetch orchestration: cache first, catalogue second
//!
//! `get` decides per system number where the record comes from; `get_all`
//! runs it over a batch and never aborts on a single failure.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    error::{AppError, AppResult, FailureKind},
    marc::MarcRecord,
    models::{
        BatchReport, FetchFailure, FetchedRecord, RecordOrigin, RunMode, SystemNumber,
    },
    services::{cache::CacheStore, catalogue::CatalogueClient},
};

pub struct Retriever {
    cache: CacheStore,
    client: Box<dyn CatalogueClient>,
    mode: RunMode,
}

impl Retriever {
    pub fn new(cache: CacheStore, client: Box<dyn CatalogueClient>, mode: RunMode) -> Self {
        Self {
            cache,
            client,
            mode,
        }
    }

    pub fn mode(&self) -> &RunMode {
        &self.mode
    }

    /// Fetch and decode one record.
    ///
    /// Forced and test runs always ask the catalogue. Otherwise a cached
    /// copy is used when present; fresh bytes are decoded before they are
    /// cached.
    pub async fn get(&self, system_number: &SystemNumber) -> AppResult<FetchedRecord> {
        if !self.mode.bypasses_cache() && self.cache.has(system_number) {
            match self.cache.read(system_number) {
                Ok(raw) => {
                    let record = MarcRecord::from_bytes(raw.as_bytes())?;
                    tracing::debug!("Loaded {} from cache", system_number);
                    return Ok(FetchedRecord {
                        system_number: system_number.clone(),
                        origin: RecordOrigin::Cache,
                        record,
                    });
                }
                Err(AppError::NotFound(reason)) => {
                    tracing::debug!("Cache entry unusable ({}), asking catalogue", reason);
                }
                Err(e) => return Err(e),
            }
        }

        let raw = self.client.fetch(system_number).await?;
        let record = MarcRecord::from_bytes(raw.as_bytes())?;

        // A failed cache write costs a refetch next run, not this record
        if let Err(e) = self.cache.write(system_number, &raw) {
            tracing::warn!("Could not cache {}: {}", system_number, e);
        }

        tracing::debug!("Loaded {} from catalogue", system_number);
        Ok(FetchedRecord {
            system_number: system_number.clone(),
            origin: RecordOrigin::Catalogue,
            record,
        })
    }

    /// Fetch a batch. Test runs reduce it to a single system number.
    pub async fn get_all(&self, system_numbers: &[SystemNumber]) -> BatchReport {
        let targets = {
            let mut rng = rand::thread_rng();
            self.select_targets(system_numbers, &mut rng)
        };
        self.fetch_batch(&targets).await
    }

    /// The numbers this run will fetch, in order
    pub fn select_targets<R: Rng + ?Sized>(
        &self,
        system_numbers: &[SystemNumber],
        rng: &mut R,
    ) -> Vec<SystemNumber> {
        if !self.mode.test {
            return system_numbers.to_vec();
        }

        let target = match &self.mode.test_identifier {
            Some(number) => Some(number.clone()),
            None => system_numbers.choose(rng).cloned(),
        };
        match &target {
            Some(number) => tracing::info!("Testing: {}", number),
            None => tracing::warn!("Test run without any system number to pick from"),
        }
        target.into_iter().collect()
    }

    /// Fetch every number in order, collecting successes and failures
    pub async fn fetch_batch(&self, system_numbers: &[SystemNumber]) -> BatchReport {
        tracing::info!(
            "Getting meta information from catalogue (force: {}, test: {})",
            self.mode.force,
            self.mode.test
        );

        let started_at = Utc::now();
        let total = system_numbers.len();
        let mut records = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (idx, system_number) in system_numbers.iter().enumerate() {
            let done = idx + 1;
            tracing::info!(
                "{} of {} ({:.1}%)",
                done,
                total,
                100.0 * done as f64 / total as f64
            );

            match self.get(system_number).await {
                Ok(fetched) => {
                    if self.mode.test {
                        tracing::debug!("MARC data: {:?}", fetched.record);
                    }
                    records.push(fetched);
                }
                Err(err) => {
                    let failure = FetchFailure::new(system_number.clone(), &err);
                    match failure.kind {
                        FailureKind::Format => {
                            tracing::error!("Corrupt record {}: {}", system_number, err)
                        }
                        _ => tracing::warn!("Skipping {}: {}", system_number, err),
                    }
                    failures.push(failure);
                }
            }
        }

        let report = BatchReport {
            records,
            failures,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            "Done getting meta information: {} records ({} from cache), {} failed",
            report.records.len(),
            report.from_cache(),
            report.failures.len()
        );
        report
    }
}
