//! Records decoded from bytes and extracted end to end

use bebb_catalogue::{
    marc::{extract_all, MarcRecord},
    models::{attributes::Description, NO_GND},
};

use crate::support::marc;

#[test]
fn test_title_only_record() {
    let bytes = marc(&[("245", &[('a', "Letter to Euler")])]);
    let record = MarcRecord::from_bytes(&bytes).unwrap();
    let attributes = extract_all(&record);

    assert_eq!(
        attributes.description,
        Some(Description {
            title: Some("Letter to Euler".to_string()),
            author: None,
        })
    );

    let json = serde_json::to_value(&attributes).unwrap();
    assert_eq!(json["description"], serde_json::json!({"title": "Letter to Euler"}));
}

#[test]
fn test_added_persons_are_routed_by_role() {
    let bytes = marc(&[
        ("700", &[('a', "Bernoulli, Johann"), ('0', "(DE-588)118509861"), ('4', "aut")]),
        ("700", &[('a', "Euler, Leonhard"), ('4', "rcp")]),
        ("700", &[('a', "Somebody"), ('4', "oth")]),
    ]);
    let attributes = extract_all(&MarcRecord::from_bytes(&bytes).unwrap());

    assert_eq!(attributes.authors.len(), 1);
    assert_eq!(attributes.authors[0].name, "Bernoulli, Johann");
    assert_eq!(attributes.authors[0].gnd, "(DE-588)118509861");
    assert_eq!(attributes.recipients.len(), 1);
    assert_eq!(attributes.recipients[0].name, "Euler, Leonhard");
    assert_eq!(attributes.recipients[0].gnd, NO_GND);
}

#[test]
fn test_full_letter() {
    let bytes = marc(&[
        ("001", &[(' ', "000055275")]),
        ("035", &[('a', "(IDSBB)000055275")]),
        ("046", &[('c', "1738.05.17")]),
        ("100", &[('a', "Bernoulli, Daniel"), ('d', "1700-1782"), ('4', "aut")]),
        ("245", &[('a', "Brief an Leonhard Euler"), ('c', "Daniel Bernoulli")]),
        ("300", &[('a', "1 Brief"), ('c', "4 S.")]),
        ("546", &[('a', "Lateinisch")]),
        ("546", &[('a', "Französisch")]),
        ("600", &[('a', "Maupertuis"), ('0', "(DE-588)118579428,")]),
        ("751", &[('a', "Basel")]),
        ("751", &[('0', "(DE-588)4004617-5")]),
        ("856", &[('u', "https://www.e-manuscripta.ch/")]),
    ]);
    let attributes = extract_all(&MarcRecord::from_bytes(&bytes).unwrap());

    assert_eq!(attributes.system_number.as_deref(), Some("(IDSBB)000055275"));
    assert_eq!(attributes.date.as_deref(), Some("1738.05.17"));
    assert_eq!(attributes.language.as_deref(), Some("Französisch"));
    assert_eq!(attributes.authors[0].date, "1700-1782");
    assert_eq!(attributes.mentioned_persons[0].gnd, "(DE-588)118579428");

    let place = attributes.creation_place.unwrap();
    assert_eq!(place.place.as_deref(), Some("Basel"));
    assert_eq!(place.gnd.as_deref(), Some("(DE-588)4004617-5"));

    let physical = attributes.physical_description.unwrap();
    assert_eq!(physical.amount.as_deref(), Some("1 Brief"));
    assert_eq!(physical.format.as_deref(), Some("4 S."));

    assert_eq!(attributes.footnote, None);
    assert_eq!(
        attributes.external_link.as_deref(),
        Some("https://www.e-manuscripta.ch/")
    );
}

#[test]
fn test_truncated_bytes_are_rejected() {
    let mut bytes = marc(&[("245", &[('a', "Letter")])]);
    bytes.truncate(bytes.len() - 5);
    assert!(MarcRecord::from_bytes(&bytes).is_err());
}
