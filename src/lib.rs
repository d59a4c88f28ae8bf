//! BEBB catalogue records
//!
//! Fetches the Aleph catalogue records of the Bernoulli-Euler letters over
//! Z39.50, caches them on disk as MARC21 and extracts the normalized
//! attributes used for letter XML generation.

pub mod config;
pub mod error;
pub mod marc;
pub mod models;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
