//! Configuration management for the catalogue pipeline

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogueConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// bib-1 use attribute for the system number index
    pub attribute: u32,
    pub timeout_secs: u64,
    /// Extra attempts after the first failed fetch
    pub retries: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub root: PathBuf,
    pub extension: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub numbers_file: PathBuf,
    pub xml_dir: PathBuf,
    pub existing_numbers_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RunConfig {
    pub force: bool,
    pub test: bool,
    pub test_identifier: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // BEBB_RUN__FORCE=true, BEBB_CATALOGUE__HOST=...
            .add_source(
                Environment::with_prefix("BEBB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl CatalogueConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            host: "aleph.unibas.ch".to_string(),
            port: 9909,
            database: "dsv05".to_string(),
            attribute: 1032,
            timeout_secs: 30,
            retries: 1,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data/tmp/marc"),
            extension: "marc".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            numbers_file: PathBuf::from("data/input/all_numbers.txt"),
            xml_dir: PathBuf::from("data/input/xml"),
            existing_numbers_file: PathBuf::from("data/tmp/existing_numbers.txt"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
