//! Input normalization applied after validation, before business logic

use once_cell::sync::Lazy;
use regex::Regex;

static DANGEROUS_SCHEMES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:javascript|data):").expect("scheme pattern is valid"));

static REPEATED_UNDERSCORES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("underscore pattern is valid"));

const MAX_FILENAME_LENGTH: usize = 255;

/// Strip angle brackets and script-capable URL schemes
pub fn sanitize_text(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    DANGEROUS_SCHEMES
        .replace_all(&without_brackets, "")
        .trim()
        .to_string()
}

pub fn sanitize_email(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Keep only digits, `+`, whitespace, `-` and parentheses
pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn sanitize_filename(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    REPEATED_UNDERSCORES
        .replace_all(&replaced, "_")
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .collect()
}
