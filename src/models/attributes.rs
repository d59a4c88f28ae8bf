//! Normalized attribute set extracted from a catalogue record
//!
//! Everything here is plain UTF-8 text; encoding for the XML output happens
//! downstream.

use serde::Serialize;

/// Identifier placed in `Person::gnd` when the field carries no `$0`
pub const NO_GND: &str = "no_GND";

/// A person named in a record (author, recipient or mentioned person)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    #[serde(rename = "GND")]
    pub gnd: String,
    pub name: String,
    pub date: String,
    pub role: String,
}

/// 245: title statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Description {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// 751: place where the letter was written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreationPlace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gnd: Option<String>,
}

/// 300: extent and dimensions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhysicalDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// 510: citation / reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BibliographicInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// 533: reproduction note
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReproductionInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
}

/// All attributes handed to the letter XML generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_place: Option<CreationPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub authors: Vec<Person>,
    pub recipients: Vec<Person>,
    pub mentioned_persons: Vec<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_description: Option<PhysicalDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bibliographic_info: Option<BibliographicInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accompanying_material: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reproduction_info: Option<ReproductionInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
}
