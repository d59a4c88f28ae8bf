//! MARC record parsing and field extraction
//!
//! This module decodes MARC21 records as delivered by the catalogue and
//! extracts the normalized attributes used for letter XML generation.

pub mod extract;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use extract::extract_all;
pub use parser::{ControlField, DataField, MarcRecord, Subfield};
