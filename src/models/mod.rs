//! Data models for the catalogue pipeline

pub mod attributes;
pub mod identifier;
pub mod report;

// Re-export commonly used types
pub use attributes::{Person, RecordAttributes, NO_GND};
pub use identifier::{RawRecord, RunMode, SystemNumber};
pub use report::{BatchReport, FetchFailure, FetchedRecord, RecordOrigin};
