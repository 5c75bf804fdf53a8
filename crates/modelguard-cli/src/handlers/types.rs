//! Types command handler

use crate::error::Result;
use crate::output::OutputWriter;
use modelguard_schemas::{RuleRegistry, Validator};
use serde::Serialize;

/// One registered rule type
#[derive(Debug, Serialize)]
struct TypeEntry<'a> {
    name: &'a str,
    description: &'a str,
}

/// Describe a built-in rule type
fn describe(type_name: &str) -> &'static str {
    match type_name {
        "array" => "Arrays: length, includes, allChildren, positional children",
        "function" => "Callable values",
        "object" => "Objects: requiredKeys, key count, includes, keyed children",
        "string" => "Strings: length, regEx, includes",
        "number" => "Finite numbers: min, max, decimals, regEx",
        "boolean" => "true or false",
        "email" => "Strings shaped like an email address, at most 50 characters",
        _ => "Custom rule",
    }
}

/// Handle the types command
pub fn handle_types(output: &mut OutputWriter) -> Result<()> {
    list_types(Validator::global().registry(), output)
}

fn list_types(registry: &RuleRegistry, output: &mut OutputWriter) -> Result<()> {
    let entries = registry
        .type_names()
        .map(|name| TypeEntry {
            name,
            description: describe(name),
        })
        .collect::<Vec<_>>();

    if output.format() == crate::cli::OutputFormat::Human {
        let rows = entries
            .iter()
            .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
            .collect();
        output.table(&["Type", "Checks"], rows)
    } else {
        output.data(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    #[test]
    fn test_builtin_types_described() {
        let registry = RuleRegistry::builtin();
        for name in registry.type_names() {
            assert_ne!(describe(name), "Custom rule", "{} has no description", name);
        }
        assert_eq!(describe("pair"), "Custom rule");
    }

    #[test]
    fn test_list_types() {
        let mut output = OutputWriter::with_writer(OutputFormat::Json, false, false, 0, Box::new(std::io::sink()));
        assert!(list_types(&RuleRegistry::builtin(), &mut output).is_ok());
    }
}
