//! Z39.50 catalogue client
//!
//! Opens one association per lookup, searches the system number index and
//! presents the first hit. The presented bytes are handed back untouched.

use async_trait::async_trait;
use z3950_rs::pdu::{
    bib1_attribute_set, AttributeElement, AttributeValue, AttributesPlusTerm, Operand, Query,
    RpnQuery, RpnStructure, SearchResponse, Term,
};
use z3950_rs::Client;

use crate::{
    config::CatalogueConfig,
    error::{AppError, AppResult},
    models::{RawRecord, SystemNumber},
    services::catalogue::CatalogueClient,
};

/// bib-1 attribute type 1 ("use")
const USE_ATTRIBUTE: i64 = 1;

#[derive(Debug, Clone)]
pub struct Z3950Client {
    address: String,
    database: String,
    attribute: u32,
}

impl Z3950Client {
    pub fn new(config: &CatalogueConfig) -> Self {
        Self {
            address: config.address(),
            database: config.database.clone(),
            attribute: config.attribute,
        }
    }

    async fn lookup(
        &self,
        client: &mut Client,
        system_number: &SystemNumber,
        query: Query,
    ) -> AppResult<RawRecord> {
        let response = client
            .search(&[self.database.as_str()], query)
            .await
            .map_err(|e| self.connection_error("search", e))?;

        let hits = hit_count(system_number, &response)?;
        tracing::debug!("Z39.50 search returned {} hits for {}", hits, system_number);

        // Identifier lookups have at most one meaningful hit
        let bytes = client
            .present_raw(1, 1)
            .await
            .map_err(|e| self.connection_error("present", e))?;

        presented_record(system_number, bytes)
    }

    fn connection_error(&self, step: &str, err: z3950_rs::Error) -> AppError {
        tracing::warn!("Z39.50 {} failed on {}: {}", step, self.address, err);
        AppError::Connection(format!("Z39.50 {} failed on {}: {}", step, self.address, err))
    }
}

#[async_trait]
impl CatalogueClient for Z3950Client {
    async fn fetch(&self, system_number: &SystemNumber) -> AppResult<RawRecord> {
        tracing::debug!("Z39.50 connection: {} (database: {})", self.address, self.database);

        let query = system_number_query(self.attribute, system_number)?;
        let mut client = Client::connect(&self.address)
            .await
            .map_err(|e| self.connection_error("connect", e))?;

        let result = self.lookup(&mut client, system_number, query).await;

        if let Err(e) = client.close().await {
            tracing::debug!("Z39.50 close failed on {}: {}", self.address, e);
        }

        result
    }
}

/// Type-1 query `@attr 1=<attribute> <system number>` over bib-1
pub fn system_number_query(attribute: u32, system_number: &SystemNumber) -> AppResult<Query> {
    let attribute_set = bib1_attribute_set()
        .map_err(|e| AppError::Connection(format!("bib-1 attribute set: {}", e)))?;

    let element = AttributeElement {
        attribute_set: None,
        attribute_type: USE_ATTRIBUTE.into(),
        attribute_value: AttributeValue::Numeric(i64::from(attribute).into()),
    };

    Ok(Query::Type1(RpnQuery {
        attribute_set,
        rpn: RpnStructure::Op(Operand::AttributesPlusTerm(AttributesPlusTerm {
            attributes: vec![element],
            term: Term::General(system_number.as_str().as_bytes().to_vec().into()),
        })),
    }))
}

/// Number of hits, or why there is nothing to present
pub fn hit_count(system_number: &SystemNumber, response: &SearchResponse) -> AppResult<usize> {
    if !response.search_status {
        return Err(AppError::Connection(format!(
            "search for {} failed: {:?}",
            system_number, response.records
        )));
    }

    let hits = usize::try_from(&response.result_count).map_err(|_| {
        AppError::Connection(format!(
            "unusable result count {} for {}",
            response.result_count, system_number
        ))
    })?;

    if hits == 0 {
        return Err(AppError::NoRecord(system_number.to_string()));
    }
    Ok(hits)
}

/// An empty present means the hit vanished between search and present
pub fn presented_record(system_number: &SystemNumber, bytes: Vec<u8>) -> AppResult<RawRecord> {
    let raw = RawRecord::from(bytes);
    if raw.is_empty() {
        return Err(AppError::NoRecord(system_number.to_string()));
    }
    Ok(raw)
}
