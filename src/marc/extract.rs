//! MARC to letter attribute extraction
//!
//! Every extractor is a pure function of the record. Missing fields give
//! `None` or an empty list.
//!
//! Precedence when a tag repeats:
//! - single values: the last occurrence carrying the subfield wins
//! - composite values: occurrences are folded in source order and merged per
//!   attribute, so a later occurrence overrides only the attributes it carries
//! - persons: every qualifying occurrence is kept, in source order

use super::parser::{DataField, MarcRecord};
use crate::models::attributes::{
    BibliographicInfo, CreationPlace, Description, Person, PhysicalDescription,
    RecordAttributes, ReproductionInfo, NO_GND,
};

/// Relator code routing a 700 field to the authors
pub const ROLE_AUTHOR: &str = "aut";
/// Relator code routing a 700 field to the recipients
pub const ROLE_RECIPIENT: &str = "rcp";

/// Run every extractor over one record
pub fn extract_all(record: &MarcRecord) -> RecordAttributes {
    log_unrouted_roles(record);

    RecordAttributes {
        system_number: system_number(record),
        description: description(record),
        creation_form: creation_form(record),
        creation_place: creation_place(record),
        date: date(record),
        authors: authors(record),
        recipients: recipients(record),
        mentioned_persons: mentioned_persons(record),
        physical_description: physical_description(record),
        footnote: footnote(record),
        bibliographic_info: bibliographic_info(record),
        content: content(record),
        accompanying_material: accompanying_material(record),
        reproduction_info: reproduction_info(record),
        language: language(record),
        work_reference: work_reference(record),
        external_link: external_link(record),
    }
}

/// 035$a of the first 035 field
pub fn system_number(record: &MarcRecord) -> Option<String> {
    record
        .get_fields("035")
        .next()
        .and_then(|f| f.get_subfield('a'))
        .map(String::from)
}

/// 046$c
pub fn date(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "046", 'c')
}

/// 250$a
pub fn creation_form(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "250", 'a')
}

/// 500$a
pub fn footnote(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "500", 'a')
}

/// 520$a
pub fn content(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "520", 'a')
}

/// 525$a
pub fn accompanying_material(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "525", 'a')
}

/// 546$a
pub fn language(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "546", 'a')
}

/// 596$a, the reference into the edition's work list
pub fn work_reference(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "596", 'a')
}

/// 856$u, link to the digitized manuscript
pub fn external_link(record: &MarcRecord) -> Option<String> {
    last_subfield(record, "856", 'u')
}

/// 245: $a title, $c statement of responsibility
pub fn description(record: &MarcRecord) -> Option<Description> {
    fold_composite(record, "245", &['a', 'c'], |d: &mut Description, code, value| {
        match code {
            'a' => d.title = Some(value.to_string()),
            'c' => d.author = Some(value.to_string()),
            _ => {}
        }
    })
}

/// 751: $a place name, $0 authority id
pub fn creation_place(record: &MarcRecord) -> Option<CreationPlace> {
    fold_composite(record, "751", &['a', '0'], |p: &mut CreationPlace, code, value| {
        match code {
            'a' => p.place = Some(value.to_string()),
            '0' => p.gnd = Some(value.to_string()),
            _ => {}
        }
    })
}

/// 300: $a extent, $c dimensions
pub fn physical_description(record: &MarcRecord) -> Option<PhysicalDescription> {
    fold_composite(
        record,
        "300",
        &['a', 'c'],
        |p: &mut PhysicalDescription, code, value| match code {
            'a' => p.amount = Some(value.to_string()),
            'c' => p.format = Some(value.to_string()),
            _ => {}
        },
    )
}

/// 510: $a reference, $i relationship
pub fn bibliographic_info(record: &MarcRecord) -> Option<BibliographicInfo> {
    fold_composite(
        record,
        "510",
        &['a', 'i'],
        |b: &mut BibliographicInfo, code, value| match code {
            'a' => b.reference = Some(value.to_string()),
            'i' => b.kind = Some(value.to_string()),
            _ => {}
        },
    )
}

/// 533: reproduction type, place, agency, date and note
pub fn reproduction_info(record: &MarcRecord) -> Option<ReproductionInfo> {
    fold_composite(
        record,
        "533",
        &['a', 'b', 'c', 'd', 'n'],
        |r: &mut ReproductionInfo, code, value| {
            let slot = match code {
                'a' => &mut r.kind,
                'b' => &mut r.place,
                'c' => &mut r.institution,
                'd' => &mut r.year,
                'n' => &mut r.additional,
                _ => return,
            };
            *slot = Some(value.to_string());
        },
    )
}

/// Every 100 field, then 700 fields with the author relator code
pub fn authors(record: &MarcRecord) -> Vec<Person> {
    record
        .get_fields("100")
        .map(person)
        .chain(with_role(record, ROLE_AUTHOR))
        .collect()
}

/// 700 fields with the recipient relator code
pub fn recipients(record: &MarcRecord) -> Vec<Person> {
    with_role(record, ROLE_RECIPIENT).collect()
}

/// Every 600 field
pub fn mentioned_persons(record: &MarcRecord) -> Vec<Person> {
    record.get_fields("600").map(person).collect()
}

/// Build a person from a name field ($0 id, $a name, $d dates, $4 role)
pub fn person(field: &DataField) -> Person {
    let gnd = field
        .get_subfield('0')
        .map(|id| id.trim_end_matches(|c: char| c == ',' || c.is_whitespace()))
        .filter(|id| !id.is_empty())
        .unwrap_or(NO_GND)
        .to_string();

    Person {
        gnd,
        name: field.get_subfield('a').unwrap_or_default().to_string(),
        date: field.get_subfield('d').unwrap_or_default().to_string(),
        role: field.get_subfield('4').unwrap_or_default().to_string(),
    }
}

fn with_role<'a>(record: &'a MarcRecord, role: &'a str) -> impl Iterator<Item = Person> + 'a {
    record
        .get_fields("700")
        .map(person)
        .filter(move |p| p.role == role)
}

fn last_subfield(record: &MarcRecord, tag: &str, code: char) -> Option<String> {
    record
        .get_fields(tag)
        .filter_map(|f| f.get_subfield(code))
        .last()
        .map(String::from)
}

/// Fold every occurrence of `tag` into one object. The object is created on
/// the first subfield seen; `apply` sets the attribute for one subfield.
fn fold_composite<T: Default>(
    record: &MarcRecord,
    tag: &str,
    codes: &[char],
    mut apply: impl FnMut(&mut T, char, &str),
) -> Option<T> {
    record.get_fields(tag).fold(None, |mut acc, field| {
        for &code in codes {
            if let Some(value) = field.get_subfield(code) {
                apply(acc.get_or_insert_with(T::default), code, value);
            }
        }
        acc
    })
}

fn log_unrouted_roles(record: &MarcRecord) {
    for p in record.get_fields("700").map(person) {
        if p.role != ROLE_AUTHOR && p.role != ROLE_RECIPIENT {
            tracing::debug!("Dropping 700 person {:?} with role {:?}", p.name, p.role);
        }
    }
}
