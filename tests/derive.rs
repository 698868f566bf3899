use fhir_search::lir;
use fhir_search::mir::{Modifier, Precision, Prefix, SearchType};
use pretty_assertions::assert_eq;
use time::macros::date;

include!("resource.rs");

#[test]
fn test_names() {
    assert_eq!(Some(PatientSearch::Id), PatientSearch::from_name("_id"));
    assert_eq!(
        Some(PatientSearch::BirthDate),
        PatientSearch::from_name("birthdate")
    );
    assert_eq!(
        Some(PatientSearch::GeneralPractitioner),
        PatientSearch::from_name("general-practitioner")
    );
    assert_eq!(
        Some(ObservationSearch::ValueQuantity),
        ObservationSearch::from_name("value-quantity")
    );
    assert_eq!(None, PatientSearch::from_name("birth-date"));
    assert_eq!(None, PatientSearch::from_name("Family"));
    assert_eq!(None, ObservationSearch::from_name("family"));

    assert_eq!("birthdate", PatientSearch::BirthDate.name());
    assert_eq!("given", PatientSearch::Given.name());
    assert_eq!("_profile", ObservationSearch::Profile.name());
}

#[test]
fn test_types() {
    assert_eq!(SearchType::Token, PatientSearch::Id.search_type());
    assert_eq!(SearchType::String, PatientSearch::Family.search_type());
    assert_eq!(SearchType::Date, PatientSearch::BirthDate.search_type());
    assert_eq!(
        SearchType::Reference,
        PatientSearch::GeneralPractitioner.search_type()
    );
    assert_eq!(
        SearchType::Quantity,
        ObservationSearch::ValueQuantity.search_type()
    );
    assert_eq!(
        SearchType::Number,
        ObservationSearch::ValueInteger.search_type()
    );
    assert_eq!(SearchType::Uri, ObservationSearch::Profile.search_type());
}

#[test]
fn test_precision() {
    assert_eq!(Precision::Date, PatientSearch::BirthDate.precision());
    assert_eq!(Precision::Timestamp, ObservationSearch::Date.precision());
    assert_eq!(Precision::Timestamp, PatientSearch::Family.precision());
}

#[test]
fn test_parse() {
    let query = PatientSearch::parse("family:exact=Reed&birthdate=lt1970-01-01").unwrap();

    assert_eq!(
        Query {
            terms: vec![
                Term {
                    field: PatientSearch::Family,
                    value: ParsedValue::String(Parsed::Value(Qualified {
                        modifier: Some(StringModifier::Exact),
                        value: "Reed".into(),
                    })),
                },
                Term {
                    field: PatientSearch::BirthDate,
                    value: ParsedValue::Date(Parsed::Value(Ordered {
                        prefix: Prefix::Lt,
                        value: DateValue::Date(date!(1970 - 01 - 01)),
                    })),
                },
            ]
        },
        query
    );
}

#[test]
fn test_parse_repeated() {
    let query = PatientSearch::parse("?birthdate=ge1960&birthdate=lt1970&").unwrap();

    let prefixes = query
        .terms
        .iter()
        .map(|term| (term.field, term.value.prefix()))
        .collect::<Vec<_>>();

    assert_eq!(
        vec![
            (PatientSearch::BirthDate, Some(Prefix::Ge)),
            (PatientSearch::BirthDate, Some(Prefix::Lt)),
        ],
        prefixes
    );
}

#[test]
fn test_reference_type_modifier() {
    let typed = ObservationSearch::parse("subject:Patient=23").unwrap();
    let plain = ObservationSearch::parse("subject=Patient/23").unwrap();

    assert_eq!(plain, typed);
    assert_eq!(
        ParsedValue::Reference(Parsed::Value(Qualified {
            modifier: None,
            value: Reference {
                resource_type: Some("Patient".into()),
                id: "23".into(),
            },
        })),
        typed.terms[0].value
    );
}

#[test]
fn test_custom_resource_types() {
    let types: &[&str] = &["Widget"];

    let query = ObservationSearch::parse_with("subject:Widget=1", types).unwrap();
    assert_eq!("Widget/1", query.terms[0].value.to_string());

    assert_eq!(
        Err(lir::Error::Parameter {
            parameter: "subject".into(),
            error: ValueError::InvalidModifier("Patient".into()),
        }),
        ObservationSearch::parse_with("subject:Patient=1", types)
    );
}

#[test]
fn test_missing() {
    let query = PatientSearch::parse("family:missing=true&gender:missing=false").unwrap();

    assert_eq!(
        vec![
            ParsedValue::String(Parsed::Missing(true)),
            ParsedValue::Token(Parsed::Missing(false)),
        ],
        query
            .terms
            .into_iter()
            .map(|term| term.value)
            .collect::<Vec<_>>()
    );
}

#[test]
fn test_unknown_parameter() {
    assert_eq!(
        Err(lir::Error::UnknownParameter("name".into())),
        PatientSearch::parse("family=Reed&name=Reed")
    );
}

#[test]
fn test_invalid_modifier() {
    assert_eq!(
        Err(lir::Error::Parameter {
            parameter: "birthdate".into(),
            error: ValueError::InvalidModifier("exact".into()),
        }),
        PatientSearch::parse("birthdate:exact=1970")
    );
    assert_eq!(
        Err(lir::Error::Parameter {
            parameter: "family".into(),
            error: ValueError::InvalidModifier("missing=maybe".into()),
        }),
        PatientSearch::parse("family:missing=maybe")
    );
}

#[test]
fn test_invalid_value() {
    assert_eq!(
        Err(lir::Error::Parameter {
            parameter: "value-quantity".into(),
            error: ValueError::InvalidValue("5.4|http://unitsofmeasure.org".into()),
        }),
        ObservationSearch::parse("value-quantity=5.4|http://unitsofmeasure.org")
    );
    assert_eq!(
        Err(lir::Error::Parameter {
            parameter: "subject".into(),
            error: ValueError::InvalidValue("Patient/Patient/12".into()),
        }),
        ObservationSearch::parse("subject:Patient=Patient/12")
    );
}

#[test]
fn test_syntax_error() {
    assert!(matches!(
        PatientSearch::parse("family"),
        Err(lir::Error::Parser(_))
    ));
    assert!(matches!(
        PatientSearch::parse("family:exact:contains=Reed"),
        Err(lir::Error::Parser(_))
    ));
}

#[test]
fn test_from_pairs() {
    let pairs = [("family:contains", "ee"), ("_id", "123")];

    let query = Query::<PatientSearch>::from_pairs(pairs, &R4).unwrap();

    assert_eq!(
        PatientSearch::parse("family:contains=ee&_id=123").unwrap(),
        query
    );
    assert_eq!(Some(Modifier::Contains), query.terms[0].value.modifier());
}

#[test]
fn test_and() {
    let first = PatientSearch::parse("family=Reed").unwrap();
    let second = PatientSearch::parse("given=Lou").unwrap();

    assert_eq!(
        PatientSearch::parse("family=Reed&given=Lou").unwrap(),
        first.and(second)
    );
}

#[test]
fn test_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Query<PatientSearch>>();
    assert_send_sync::<ParsedValue>();
    assert_send_sync::<lir::Error>();
    assert_send_sync::<R4>();
}
