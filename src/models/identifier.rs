//! System numbers, raw records and the per-run mode

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::config::RunConfig;
use crate::error::{AppError, AppResult};

/// Catalogue system number. Doubles as the cache file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SystemNumber(String);

impl SystemNumber {
    pub fn new(raw: &str) -> AppResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed == "."
            || trimmed == ".."
        {
            return Err(AppError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SystemNumber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SystemNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Undecoded ISO 2709 bytes, exactly as the catalogue sent them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord(Vec<u8>);

impl RawRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RawRecord {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Run flags, fixed before the batch starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMode {
    pub force: bool,
    pub test: bool,
    /// Test runs fetch this number instead of a random one
    pub test_identifier: Option<SystemNumber>,
}

impl RunMode {
    pub fn normal() -> Self {
        Self::default()
    }

    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    pub fn test(identifier: Option<SystemNumber>) -> Self {
        Self {
            test: true,
            test_identifier: identifier,
            ..Self::default()
        }
    }

    /// Whether an existing cache entry may be replaced
    pub fn allows_overwrite(&self) -> bool {
        self.force || self.test
    }

    /// Whether fetches skip the cache lookup
    pub fn bypasses_cache(&self) -> bool {
        self.force || self.test
    }
}

impl TryFrom<&RunConfig> for RunMode {
    type Error = AppError;

    fn try_from(config: &RunConfig) -> Result<Self, Self::Error> {
        let test_identifier = config
            .test_identifier
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(SystemNumber::new)
            .transpose()?;

        Ok(Self {
            force: config.force,
            test: config.test,
            test_identifier,
        })
    }
}
