//! Property-based tests for value validation
//!
//! These tests verify that the validator behaves consistently across a wide
//! range of generated values and constraints.

use modelguard_schemas::{
    includes_any, ContainmentOptions, ErrorKind, FailureMode, Model, Name, Spec, Validator, Value,
};
use proptest::prelude::*;

/// Strategy for generating random values with controlled complexity
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,50}".prop_map(Value::from),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::from),
                proptest::collection::vec(("[a-zA-Z_][a-zA-Z0-9_]{0,20}", inner), 0..5)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        },
    )
}

/// Strategy for the falsy values that count as missing
fn falsy_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::from(false)),
        Just(Value::from(0)),
        Just(Value::from(0.0)),
        Just(Value::from("")),
    ]
}

fn type_names() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("array"),
        Just("function"),
        Just("object"),
        Just("string"),
        Just("number"),
        Just("boolean"),
        Just("email"),
    ]
}

proptest! {
    #[test]
    fn test_validation_never_panics(value in value_strategy(), type_name in type_names()) {
        let validator = Validator::default();
        let _ = validator.validate(&value, &Model::from(type_name), FailureMode::Raise);
    }

    #[test]
    fn test_shorthand_matches_spec(value in value_strategy(), type_name in type_names()) {
        let validator = Validator::default();
        let shorthand = validator.is_valid(&value, &Model::from(type_name));
        let spec = validator.is_valid(&value, &Model::from(Spec::new(type_name)));
        prop_assert_eq!(shorthand, spec);
    }

    #[test]
    fn test_bool_mode_agrees_with_raise(value in value_strategy(), type_name in type_names()) {
        let validator = Validator::default();
        let model = Model::from(type_name);
        let raised = validator.validate(&value, &model, FailureMode::Raise);
        let flagged = validator.validate(&value, &model, FailureMode::Bool).unwrap();
        prop_assert_eq!(flagged, Some(raised.is_ok()));
    }

    #[test]
    fn test_off_mode_never_reports(value in value_strategy(), type_name in type_names()) {
        let outcome = Validator::default().validate(&value, &Model::from(type_name), FailureMode::Off);
        prop_assert!(matches!(outcome, Ok(None)));
    }

    #[test]
    fn test_union_is_any_of_its_branches(
        value in value_strategy(),
        first in type_names(),
        second in type_names(),
    ) {
        let validator = Validator::default();
        let union = Model::union(vec![Model::from(first), Model::from(second)]).unwrap();
        let expected = validator.is_valid(&value, &Model::from(first))
            || validator.is_valid(&value, &Model::from(second));
        prop_assert_eq!(validator.is_valid(&value, &union), expected);
    }

    #[test]
    fn test_not_required_accepts_every_falsy_value(value in falsy_strategy(), type_name in type_names()) {
        prop_assert!(value.is_falsy());
        let model = Model::from(Spec::new(type_name).with_not_required());
        prop_assert!(Validator::default().is_valid(&value, &model));
    }

    #[test]
    fn test_missing_values_fail_as_required(value in falsy_strategy(), type_name in type_names()) {
        let error = Validator::default()
            .check(&value, &Model::from(type_name), &Name::Root)
            .unwrap_err();
        prop_assert_eq!(error.kind, ErrorKind::RequiredValue);
    }

    #[test]
    fn test_string_length_bounds(text in "[a-z]{1,30}", max in 0usize..30) {
        let model = Model::from(Spec::new("string").with_max_length(max));
        let valid = Validator::default().is_valid(&Value::from(text.as_str()), &model);
        prop_assert_eq!(valid, text.chars().count() <= max);
    }

    #[test]
    fn test_number_bounds(n in 1i64..1000, min in 0f64..1000.0, max in 0f64..1000.0) {
        let model = Model::from(Spec::new("number").with_min(min).with_max(max));
        let valid = Validator::default().is_valid(&Value::from(n), &model);
        let n = n as f64;
        prop_assert_eq!(valid, n >= min && n <= max);
    }

    #[test]
    fn test_array_all_children(items in proptest::collection::vec(1i64..100, 0..10)) {
        let values: Vec<Value> = items.iter().copied().map(Value::from).collect();
        let validator = Validator::default();
        let numbers = Model::from(Spec::new("array").with_all_children("number"));
        let strings = Model::from(Spec::new("array").with_all_children("string"));

        prop_assert!(validator.is_valid(&Value::from(values.clone()), &numbers));
        prop_assert_eq!(validator.is_valid(&Value::from(values), &strings), items.is_empty());
    }

    #[test]
    fn test_includes_any_matches_some_needle(haystack in "[a-z]{0,20}", needles in proptest::collection::vec("[a-z]{1,3}", 0..5)) {
        let needle_values: Vec<Value> = needles.iter().map(|n| Value::from(n.as_str())).collect();
        let found = includes_any(&Value::from(haystack.as_str()), &needle_values, ContainmentOptions::default());
        prop_assert_eq!(found, needles.iter().any(|n| haystack.contains(n.as_str())));
    }
}
