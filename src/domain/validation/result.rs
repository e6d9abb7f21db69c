//! Validation outcome shared by field, form and CSP checks

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Outcome of a validation pass
///
/// Validity is derived from the error list, so a result can never claim to
/// be valid while carrying errors. Warnings are advisory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    /// A passing result with no warnings
    pub fn ok() -> Self {
        Self::default()
    }

    /// A failing result with a single error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add a warning, builder style
    pub fn with_warning(mut self, message: impl Into<String>) -> Self {
        self.push_warning(message);
        self
    }

    /// Append another result's errors and warnings, tagging each with `field`
    pub fn merge_field(&mut self, field: &str, other: ValidationResult) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{}: {}", field, e)));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{}: {}", field, w)));
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.errors, self.warnings)
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_follows_errors() {
        let mut result = ValidationResult::ok().with_warning("advisory");
        assert!(result.is_valid());

        result.push_error("broken");
        assert!(!result.is_valid());
    }

    #[test]
    fn test_merge_field_tags_messages() {
        let mut aggregate = ValidationResult::ok();
        aggregate.merge_field("email", ValidationResult::error("Invalid email format"));
        aggregate.merge_field("name", ValidationResult::ok().with_warning("odd"));

        assert_eq!(aggregate.errors(), ["email: Invalid email format"]);
        assert_eq!(aggregate.warnings(), ["name: odd"]);
    }

    #[test]
    fn test_serialization_includes_valid_flag() {
        let result = ValidationResult::error("nope");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0], "nope");
        assert!(json["warnings"].as_array().unwrap().is_empty());
    }
}
