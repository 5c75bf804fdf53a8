//! Validation demonstration example
//!
//! Copyright (c) 2025 Modelguard Team
//! Licensed under the Apache-2.0 license

use modelguard_schemas::{
    validate, validate_func, ErrorKind, FailureMode, Model, RuleRegistry, Spec, ValidatedFn, ValidationError,
    Validator, Value,
};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Modelguard Validation Demo ===\n");

    demo_object_model()?;

    println!();

    demo_failure_modes()?;

    println!();

    demo_custom_type()?;

    println!();

    demo_function_contract()?;

    Ok(())
}

fn demo_object_model() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Object Model Demo ---");

    let model: Model = serde_json::from_value(json!({
        "type": "object",
        "requiredKeys": ["email", "tags"],
        "children": {
            "email": "email",
            "tags": {"type": "array", "maxLength": 3, "allChildren": "string"},
            "score": [{"type": "number", "min": 0, "max": 100, "decimals": 1}, "boolean"]
        }
    }))?;

    let valid = Value::from(json!({"email": "ada@example.com", "tags": ["math"], "score": 99.5}));
    println!("✅ Validating a complete record:");
    match validate(&valid, &model, FailureMode::Raise) {
        Ok(_) => println!("   Valid!"),
        Err(e) => println!("   Error: {}", e),
    }

    let missing = Value::from(json!({"email": "ada@example.com"}));
    println!("\n❌ Validating a record without tags:");
    match validate(&missing, &model, FailureMode::Raise) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   [{}] {}", e.code(), e),
    }

    let union_miss = Value::from(json!({"email": "ada@example.com", "tags": [], "score": "high"}));
    println!("\n❌ Validating a score matching neither branch:");
    match validate(&union_miss, &model, FailureMode::Raise) {
        Ok(_) => println!("   Unexpectedly valid!"),
        Err(e) => println!("   [{}] {}", e.code(), e),
    }

    Ok(())
}

fn demo_failure_modes() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Failure Mode Demo ---");

    let model = Model::from(Spec::new("string").with_min_length(3));
    let value = Value::from("ab");

    for mode in [FailureMode::Raise, FailureMode::Bool, FailureMode::Off, FailureMode::Warn] {
        match validate(&value, &model, mode) {
            Ok(outcome) => println!("   {:?}: {:?}", mode, outcome),
            Err(e) => println!("   {:?}: error: {}", mode, e),
        }
    }

    Ok(())
}

fn demo_custom_type() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Custom Type Demo ---");

    let mut registry = RuleRegistry::builtin();
    registry.register_fn("even", |value, _spec, name, _validator| match value.as_f64() {
        Some(n) if n % 2.0 == 0.0 => Ok(()),
        _ => Err(ValidationError::new(
            ErrorKind::CustomExtension,
            name.to_string(),
            format!("Expected {} to be an even number", name),
        )),
    });
    let validator = Validator::new(registry);

    for n in [4, 7] {
        let valid = validator.is_valid(&Value::from(n), &Model::from("even"));
        println!("   {} is even: {}", n, valid);
    }

    Ok(())
}

fn demo_function_contract() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Function Contract Demo ---");

    let add = ValidatedFn::from_fn(|args| {
        let sum = args.iter().filter_map(Value::as_f64).sum::<f64>();
        Ok(Value::from(sum))
    })
    .with_input_model(vec![Model::from("number"), Model::from("number")])
    .with_output_model(Spec::new("number").with_max(100.0));

    match validate_func(&add, vec![Value::from(2), Value::from(3)]) {
        Ok(result) => println!("   add(2, 3) = {}", result),
        Err(e) => println!("   add(2, 3) failed: {}", e),
    }

    match validate_func(&add, vec![Value::from(2), Value::from("3")]) {
        Ok(result) => println!("   add(2, \"3\") = {}", result),
        Err(e) => println!("   add(2, \"3\") failed: {}", e),
    }

    match validate_func(&add, vec![Value::from(70), Value::from(50)]) {
        Ok(result) => println!("   add(70, 50) = {}", result),
        Err(e) => println!("   add(70, 50) failed: {}", e),
    }

    Ok(())
}
