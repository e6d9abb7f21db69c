//! API key name validation

use thiserror::Error;

/// Errors that can occur during API key name validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyNameError {
    #[error("API key name cannot be empty")]
    Empty,

    #[error("API key name must be {0} characters or less")]
    TooLong(usize),

    #[error("API key name contains invalid character: '{0}'. Only letters, numbers, spaces, hyphens, and underscores are allowed")]
    InvalidCharacter(char),
}

const MAX_API_KEY_NAME_LENGTH: usize = 100;

/// Validate and normalize an API key display name
///
/// Rules:
/// - Surrounding whitespace is trimmed
/// - Cannot be empty after trimming
/// - Maximum 100 characters
/// - Only ASCII letters, digits, spaces, hyphens and underscores
pub fn validate_api_key_name(name: &str) -> Result<String, ApiKeyNameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ApiKeyNameError::Empty);
    }

    if trimmed.chars().count() > MAX_API_KEY_NAME_LENGTH {
        return Err(ApiKeyNameError::TooLong(MAX_API_KEY_NAME_LENGTH));
    }

    if let Some(c) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_')))
    {
        return Err(ApiKeyNameError::InvalidCharacter(c));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(validate_api_key_name("Production").unwrap(), "Production");
        assert_eq!(validate_api_key_name("  ci-runner_2 ").unwrap(), "ci-runner_2");
        assert!(validate_api_key_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_api_key_name(""), Err(ApiKeyNameError::Empty));
        assert_eq!(validate_api_key_name("   "), Err(ApiKeyNameError::Empty));
    }

    #[test]
    fn test_too_long_name() {
        assert_eq!(
            validate_api_key_name(&"a".repeat(101)),
            Err(ApiKeyNameError::TooLong(100))
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(
            validate_api_key_name("my.key"),
            Err(ApiKeyNameError::InvalidCharacter('.'))
        );
        assert_eq!(
            validate_api_key_name("clé"),
            Err(ApiKeyNameError::InvalidCharacter('é'))
        );
        assert_eq!(
            validate_api_key_name("tab\tkey"),
            Err(ApiKeyNameError::InvalidCharacter('\t'))
        );
    }
}
