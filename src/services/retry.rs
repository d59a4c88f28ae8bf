//! Timeout and retry around any catalogue client

use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{RawRecord, SystemNumber},
    services::catalogue::CatalogueClient,
};

/// Bounds every attempt by `timeout` and makes up to `retries` extra
/// attempts. `NoRecord` is final.
pub struct RetryingClient<C> {
    inner: C,
    timeout: Duration,
    retries: u32,
}

impl<C: CatalogueClient> RetryingClient<C> {
    pub fn new(inner: C, timeout: Duration, retries: u32) -> Self {
        Self {
            inner,
            timeout,
            retries,
        }
    }
}

#[async_trait]
impl<C: CatalogueClient> CatalogueClient for RetryingClient<C> {
    async fn fetch(&self, system_number: &SystemNumber) -> AppResult<RawRecord> {
        let attempts = self.retries + 1;
        let mut last_error = None;

        for attempt in 1..=attempts {
            let err = match tokio::time::timeout(self.timeout, self.inner.fetch(system_number)).await
            {
                Ok(Ok(record)) => return Ok(record),
                // The catalogue answered; asking again will not change that
                Ok(Err(err @ AppError::NoRecord(_))) => return Err(err),
                Ok(Err(err)) => err,
                Err(_) => AppError::Connection(format!(
                    "no answer for {} within {:?}",
                    system_number, self.timeout
                )),
            };

            tracing::warn!(
                "Fetch of {} failed (attempt {}/{}): {}",
                system_number,
                attempt,
                attempts,
                err
            );
            last_error = Some(err);
        }

        Err(last_error.unwrap_or_else(|| {
            AppError::Connection(format!("no attempt made for {}", system_number))
        }))
    }
}
