//! MARC record parser
//!
//! Decodes ISO 2709 bytes into a structured record. Structural damage (bad
//! leader, directory or offsets) is an error; text is always read as UTF-8
//! and normalized to NFC.

use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, AppResult};

const LEADER_LEN: usize = 24;
const DIRECTORY_ENTRY_LEN: usize = 12;
pub(crate) const FIELD_TERMINATOR: u8 = 0x1E;
pub(crate) const SUBFIELD_DELIMITER: u8 = 0x1F;

/// A MARC record containing leader and fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcRecord {
    /// The 24-character record leader
    pub leader: String,
    /// Control fields (00X), in directory order
    pub control_fields: Vec<ControlField>,
    /// Data fields with indicators and subfields, in directory order
    pub data_fields: Vec<DataField>,
}

/// A MARC control field (001-009)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlField {
    pub tag: String,
    pub value: String,
}

/// A MARC data field (010-999 and local alphanumeric tags)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    /// Field tag (3 characters)
    pub tag: String,
    pub ind1: char,
    pub ind2: char,
    pub subfields: Vec<Subfield>,
}

/// A MARC subfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    pub data: String,
}

impl MarcRecord {
    /// Parse a MARC record from raw bytes (ISO 2709 format)
    pub fn from_bytes(data: &[u8]) -> AppResult<Self> {
        if data.len() < LEADER_LEN {
            return Err(malformed(format!(
                "{} bytes is shorter than the leader",
                data.len()
            )));
        }

        let record_length = parse_number(&data[0..5], "record length")?;
        if record_length < LEADER_LEN || record_length > data.len() {
            return Err(malformed(format!(
                "record length {} does not fit {} bytes",
                record_length,
                data.len()
            )));
        }
        let data = &data[..record_length];

        let base_address = parse_number(&data[12..17], "base address")?;
        if base_address <= LEADER_LEN || base_address > data.len() {
            return Err(malformed(format!("base address {} out of range", base_address)));
        }
        if data[base_address - 1] != FIELD_TERMINATOR {
            return Err(malformed("directory is not terminated".to_string()));
        }

        let directory = &data[LEADER_LEN..base_address - 1];
        if directory.len() % DIRECTORY_ENTRY_LEN != 0 {
            return Err(malformed(format!(
                "directory length {} is not a multiple of {}",
                directory.len(),
                DIRECTORY_ENTRY_LEN
            )));
        }

        let leader = normalize_text(&data[..LEADER_LEN]);
        let mut control_fields = Vec::new();
        let mut data_fields = Vec::new();

        // Each directory entry is 12 bytes: tag(3) + length(4) + start(5)
        for entry in directory.chunks_exact(DIRECTORY_ENTRY_LEN) {
            let tag = std::str::from_utf8(&entry[0..3])
                .map_err(|_| malformed("non-text directory tag".to_string()))?
                .to_string();
            let length = parse_number(&entry[3..7], "field length")?;
            let start = parse_number(&entry[7..12], "field start")?;

            let field_start = base_address + start;
            let field_end = field_start + length;
            if length == 0 || field_end > data.len() {
                return Err(malformed(format!(
                    "field {} at {}+{} runs past the record",
                    tag, start, length
                )));
            }

            let raw = &data[field_start..field_end];
            let raw = raw.strip_suffix(&[FIELD_TERMINATOR]).unwrap_or(raw);

            if is_control_tag(&tag) {
                control_fields.push(ControlField {
                    value: normalize_text(raw),
                    tag,
                });
            } else {
                data_fields.push(DataField::parse(tag, raw)?);
            }
        }

        Ok(MarcRecord {
            leader,
            control_fields,
            data_fields,
        })
    }

    /// Get a control field value
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields
            .iter()
            .find(|f| f.tag == tag)
            .map(|f| f.value.as_str())
    }

    /// Get all data fields with a specific tag, in source order
    pub fn get_fields<'a, 'b>(&'a self, tag: &'b str) -> impl Iterator<Item = &'a DataField> + 'b
    where
        'a: 'b,
    {
        self.data_fields.iter().filter(move |f| f.tag == tag)
    }

    /// Get a subfield value from the first field with this tag that has it
    pub fn get_subfield(&self, tag: &str, code: char) -> Option<&str> {
        self.get_fields(tag).find_map(|f| f.get_subfield(code))
    }
}

impl DataField {
    /// Parse a data field body (indicators + subfields, terminator stripped)
    fn parse(tag: String, data: &[u8]) -> AppResult<Self> {
        if data.len() < 2 {
            return Err(malformed(format!("field {} has no indicators", tag)));
        }

        let ind1 = data[0] as char;
        let ind2 = data[1] as char;

        // Anything before the first delimiter is not addressable
        let subfields = data[2..]
            .split(|&b| b == SUBFIELD_DELIMITER)
            .skip(1)
            .filter(|part| !part.is_empty())
            .map(|part| Subfield {
                code: part[0] as char,
                data: normalize_text(&part[1..]),
            })
            .collect();

        Ok(DataField {
            tag,
            ind1,
            ind2,
            subfields,
        })
    }

    /// Get a subfield value by code (first occurrence)
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.data.as_str())
    }
}

fn is_control_tag(tag: &str) -> bool {
    tag.starts_with("00") && tag.bytes().all(|b| b.is_ascii_digit())
}

fn normalize_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).nfc().collect()
}

fn parse_number(bytes: &[u8], what: &str) -> AppResult<usize> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(malformed(format!(
            "{} {:?} is not numeric",
            what,
            String::from_utf8_lossy(bytes)
        )));
    }
    // all ASCII digits, at most 5 of them
    Ok(bytes
        .iter()
        .fold(0usize, |acc, b| acc * 10 + usize::from(b - b'0')))
}

fn malformed(msg: String) -> AppError {
    AppError::Format(msg)
}
