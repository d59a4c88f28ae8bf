//! ISO 2709 record builder for tests

use super::parser::{FIELD_TERMINATOR, SUBFIELD_DELIMITER};

const RECORD_TERMINATOR: u8 = 0x1D;

#[derive(Default)]
pub(crate) struct RecordBuilder {
    fields: Vec<(String, Vec<u8>)>,
}

impl RecordBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn control(self, tag: &str, value: &str) -> Self {
        self.raw_field(tag, value.as_bytes())
    }

    pub(crate) fn field(self, tag: &str, subfields: &[(char, &str)]) -> Self {
        let mut body = b"  ".to_vec();
        for (code, data) in subfields {
            body.push(SUBFIELD_DELIMITER);
            body.push(*code as u8);
            body.extend_from_slice(data.as_bytes());
        }
        self.raw_field(tag, &body)
    }

    pub(crate) fn raw_field(mut self, tag: &str, body: &[u8]) -> Self {
        let mut body = body.to_vec();
        body.push(FIELD_TERMINATOR);
        self.fields.push((tag.to_string(), body));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let base_address = 24 + 12 * self.fields.len() + 1;
        let mut directory = Vec::new();
        let mut data = Vec::new();
        for (tag, body) in &self.fields {
            directory.extend_from_slice(
                format!("{}{:04}{:05}", tag, body.len(), data.len()).as_bytes(),
            );
            data.extend_from_slice(body);
        }
        directory.push(FIELD_TERMINATOR);
        data.push(RECORD_TERMINATOR);

        let total = base_address + data.len();
        let mut out = format!("{:05}nam a22{:05} a 4500", total, base_address).into_bytes();
        out.extend_from_slice(&directory);
        out.extend_from_slice(&data);
        out
    }
}
