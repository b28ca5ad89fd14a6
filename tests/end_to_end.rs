//! End-to-end scenarios against the reference dataset.

use odata_filter_sort::prelude::*;

/// Makes `tracing::debug!`/`trace!` output from the compiler visible under
/// `cargo test -- --nocapture`; harmless to call more than once across
/// test binaries since `try_init` only installs the first subscriber.
fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

#[derive(Debug, Clone, PartialEq)]
struct Address {
    city: String,
    state: String,
    zip: String,
}

record_shape! {
    Address : "Address" {
        field("City", ValueType::String, false, |r: &Address| Value::String(r.city.clone())),
        field("State", ValueType::String, false, |r: &Address| Value::String(r.state.clone())),
        field("Zip", ValueType::String, false, |r: &Address| Value::String(r.zip.clone())),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Person {
    first_name: String,
    last_name: String,
    age: i32,
    address: Address,
}

record_shape! {
    Person : "Person" {
        field("FirstName", ValueType::String, false, |r: &Person| Value::String(r.first_name.clone())),
        field("LastName", ValueType::String, false, |r: &Person| Value::String(r.last_name.clone())),
        field("Age", ValueType::I32, false, |r: &Person| Value::I32(r.age)),
        nested("Address", false, |r: &Person| Some(&r.address), Address),
    }
}

fn person(first: &str, last: &str, age: i32, city: &str, state: &str, zip: &str) -> Person {
    Person {
        first_name: first.to_string(),
        last_name: last.to_string(),
        age,
        address: Address {
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
        },
    }
}

fn dataset() -> Vec<Person> {
    vec![
        person("John", "Doe", 30, "New York", "NY", "10001"),
        person("Jane", "Smith", 25, "Los Angeles", "CA", "90001"),
        person("Bob", "Johnson", 35, "Chicago", "IL", "60601"),
        person("Alice", "Williams", 28, "Houston", "TX", "77001"),
        person("Charlie", "Brown", 30, "Phoenix", "AZ", "85001"),
    ]
}

fn first_names(people: &[Person]) -> Vec<&str> {
    people.iter().map(|p| p.first_name.as_str()).collect()
}

#[test]
fn scenario_1_age_equals_30() {
    init_tracing();
    let people = dataset();
    let result = people.filter(Some("Age eq 30")).unwrap();
    assert_eq!(first_names(&result), vec!["John", "Charlie"]);
}

#[test]
fn scenario_2_starts_with_and_age() {
    let people = dataset();
    let result = people
        .filter(Some("FirstName startswith 'J' and Age gt 25"))
        .unwrap();
    assert_eq!(first_names(&result), vec!["John"]);
}

#[test]
fn scenario_3_negated_contains() {
    let people = dataset();
    let result = people.filter(Some("not contains(FirstName, 'oh')")).unwrap();
    assert_eq!(
        first_names(&result),
        vec!["Jane", "Bob", "Alice", "Charlie"]
    );
}

#[test]
fn scenario_4_grouped_or_and_and() {
    let people = dataset();
    let result = people
        .filter(Some(
            "(Age lt 30 or Age gt 30) and FirstName startswith 'J'",
        ))
        .unwrap();
    assert_eq!(first_names(&result), vec!["Jane"]);
}

#[test]
fn scenario_5_order_by_age_then_name_desc() {
    let people = dataset();
    let result = people.order_by(Some("Age asc, FirstName desc")).unwrap();
    assert_eq!(
        first_names(&result),
        vec!["Jane", "Alice", "John", "Charlie", "Bob"]
    );
}

#[test]
fn scenario_6_order_by_nested_path() {
    let people = dataset();
    let result = people.order_by(Some("Address.City")).unwrap();
    let cities: Vec<&str> = result.iter().map(|p| p.address.city.as_str()).collect();
    assert_eq!(
        cities,
        vec!["Chicago", "Houston", "Los Angeles", "New York", "Phoenix"]
    );
}

#[test]
fn filter_then_order_by_is_canonical_composition() {
    let people = dataset();
    let filtered = people.filter(Some("Age ge 28")).unwrap();
    let sorted = filtered.order_by(Some("Age desc")).unwrap();
    assert_eq!(first_names(&sorted), vec!["Bob", "John", "Charlie", "Alice"]);
}

#[test]
fn blank_inputs_are_no_ops_for_both_operations() {
    let people = dataset();
    for blank in [None, Some(""), Some("   ")] {
        assert_eq!(people.filter(blank).unwrap(), people);
        assert_eq!(people.order_by(blank).unwrap(), people);
    }
}

#[test]
fn keyword_case_insensitivity_is_irrelevant_to_result() {
    let people = dataset();
    let a = people.filter(Some("Age EQ 30")).unwrap();
    let b = people.filter(Some("age eq 30")).unwrap();
    let c = people.filter(Some("AGE Eq 30")).unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn path_case_insensitivity_is_irrelevant_to_result() {
    let people = dataset();
    let a = people.order_by(Some("Address.City")).unwrap();
    let b = people.order_by(Some("address.city")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_direction_names_offending_word() {
    let people = dataset();
    let err = people.order_by(Some("Age sideways")).unwrap_err();
    match err {
        FilterError::InvalidDirection { word } => assert_eq!(word, "sideways"),
        other => panic!("expected InvalidDirection, got {other:?}"),
    }
}

#[test]
fn unknown_property_names_the_segment_and_shape() {
    let people = dataset();
    let err = people.filter(Some("Nickname eq 'x'")).unwrap_err();
    match err {
        FilterError::PropertyNotFound { segment, shape } => {
            assert_eq!(segment, "Nickname");
            assert_eq!(shape, "Person");
        }
        other => panic!("expected PropertyNotFound, got {other:?}"),
    }
}

#[test]
fn unterminated_parenthesis_is_invalid_syntax() {
    let people = dataset();
    let err = people.filter(Some("(Age eq 30")).unwrap_err();
    assert!(matches!(err, FilterError::InvalidSyntax { .. }));
}

#[test]
fn empty_ordering_clauses_are_skipped() {
    let clauses = odata_filter_sort::ordering::parse_ordering("Age,,FirstName,,,").unwrap();
    let paths: Vec<&str> = clauses.iter().map(|c| c.property_path.as_str()).collect();
    assert_eq!(paths, vec!["Age", "FirstName"]);
}
