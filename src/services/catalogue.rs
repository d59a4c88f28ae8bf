//! Remote catalogue seam

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{RawRecord, SystemNumber},
};

/// Looks up one record in the remote catalogue by system number.
///
/// Fails with `AppError::Connection` when the session or query cannot
/// complete, and with `AppError::NoRecord` when the catalogue has no hit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueClient: Send + Sync {
    async fn fetch(&self, system_number: &SystemNumber) -> AppResult<RawRecord>;
}
