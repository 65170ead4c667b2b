//! Model-facing description of a schema.
//!
//! CSF drops every key from the payload, so a model can only read it when the
//! prompt carries the field order and encoding rules. [`describe`] renders them
//! from a [`SchemaTable`]; [`instructions`] wraps that with a lead-in and a
//! closing request.
//!
//! ```rust
//! use serde_csf::{prompt, SchemaTable};
//!
//! let text = prompt::describe(&SchemaTable::standard());
//! assert!(text.starts_with("Schema (field order):\ni|n|e|ia|a|s|c|st|z|pn|r|ca\n"));
//! assert!(text.contains("- Roles are numeric: 0 = admin, 1 = editor"));
//! ```

use crate::schema::FieldKind;
use crate::SchemaTable;
use std::fmt::Write;

const LEAD: &str =
    "You are given data in Compact Serializer Format (CSF), a token-efficient schema-based encoding.";
const CLOSING: &str = "Please decode the data into a readable JSON structure before reasoning.";

/// Renders the field order, field meanings and encoding rules of `schema`.
///
/// Rules are only listed for kinds the schema actually uses.
#[must_use]
pub fn describe(schema: &SchemaTable) -> String {
    let shorts: Vec<&str> = schema.positions().map(|f| f.short()).collect();
    let names: Vec<&str> = schema.positions().map(|f| f.name()).collect();
    let has = |kind: FieldKind| schema.positions().any(|f| f.kind() == kind);

    let mut out = String::with_capacity(256);
    out.push_str("Schema (field order):\n");
    out.push_str(&shorts.join("|"));
    out.push_str("\n\nMeaning:\n");
    out.push_str(&names.join(" | "));
    out.push_str("\n\nEncoding rules:\n");
    out.push_str("- \"|\" separates fields\n");
    if has(FieldKind::List) || has(FieldKind::Roles) {
        out.push_str("- \",\" separates multiple items (arrays)\n");
    }
    if has(FieldKind::Text) {
        out.push_str("- \"_\" represents spaces\n");
    }
    if has(FieldKind::Bool) {
        out.push_str("- \"1\" means True, \"0\" means False\n");
    }
    if has(FieldKind::Roles) && schema.roles().next().is_some() {
        let roles: Vec<String> = schema
            .roles()
            .map(|(name, code)| format!("{} = {}", code, name))
            .collect();
        // Infallible for String
        let _ = writeln!(out, "- Roles are numeric: {}", roles.join(", "));
    }
    out
}

/// Full prompt text to send ahead of one or more CSF records.
///
/// # Examples
///
/// ```rust
/// use serde_csf::{prompt, SchemaTable};
///
/// let text = prompt::instructions(&SchemaTable::standard());
/// assert!(text.starts_with("You are given data in Compact Serializer Format (CSF)"));
/// assert!(text.trim_end().ends_with("before reasoning."));
/// ```
#[must_use]
pub fn instructions(schema: &SchemaTable) -> String {
    format!("{}\n\n{}\n{}\n", LEAD, describe(schema), CLOSING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_description() {
        let expected = "Schema (field order):\n\
            i|n|e|ia|a|s|c|st|z|pn|r|ca\n\
            \n\
            Meaning:\n\
            id | name | email | is_active | age | street | city | state | zip_code | phone_numbers | roles | created_at\n\
            \n\
            Encoding rules:\n\
            - \"|\" separates fields\n\
            - \",\" separates multiple items (arrays)\n\
            - \"_\" represents spaces\n\
            - \"1\" means True, \"0\" means False\n\
            - Roles are numeric: 0 = admin, 1 = editor\n";
        assert_eq!(describe(&SchemaTable::standard()), expected);
    }

    #[test]
    fn test_rules_follow_schema_kinds() {
        let schema = SchemaTable::from_columns(&["city", "state"], &["c", "st"]).unwrap();
        let text = describe(&schema);
        assert!(text.contains("c|st\n"));
        assert!(text.contains("city | state\n"));
        assert!(!text.contains("represents spaces"));
        assert!(!text.contains("Roles"));
    }
}
