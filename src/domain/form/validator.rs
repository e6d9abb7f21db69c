//! Whole-form validation

use serde_json::Value;

use super::schema::{FieldSpec, FormSchemaName};
use crate::domain::validation::{Locale, Message, ValidationResult};

/// Validate a decoded form body against a named schema
///
/// Unknown schema names produce a failing result rather than a panic.
pub fn validate_form_data(data: &Value, schema_name: &str) -> ValidationResult {
    validate_form_data_in(data, schema_name, Locale::default())
}

pub fn validate_form_data_in(data: &Value, schema_name: &str, locale: Locale) -> ValidationResult {
    match schema_name.parse::<FormSchemaName>() {
        Ok(schema) => validate_form(data, schema, locale),
        Err(_) => ValidationResult::error(Message::UnknownSchema { name: schema_name }.render(locale)),
    }
}

/// Validate every declared field, collecting all problems
pub fn validate_form(data: &Value, schema: FormSchemaName, locale: Locale) -> ValidationResult {
    let mut aggregate = ValidationResult::ok();

    for field in schema.fields() {
        aggregate.merge_field(field.name, validate_field(field, data.get(field.name), locale));
    }

    aggregate
}

fn validate_field(field: &FieldSpec, value: Option<&Value>, locale: Locale) -> ValidationResult {
    let label = field.label.render(locale);

    match value {
        Some(value) if !is_blank(value) => field.rule.validate(value, label, locale),
        _ if field.required => ValidationResult::error(Message::Required { label }.render(locale)),
        _ => ValidationResult::ok(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
