//! Field validators
//!
//! Every validator accepts an arbitrary JSON value, since form bodies are
//! untrusted, and always returns a [`ValidationResult`]. Each one stops at
//! the first blocking problem so a field reports at most one error.

use serde_json::Value;

use super::lists::SUSPICIOUS_REPEAT_RUN;
use super::messages::{FieldLabel, Locale, Message};
use super::result::ValidationResult;
use super::spam;

/// RFC 5321 upper bound for a whole address
pub const EMAIL_MAX_LENGTH: usize = 254;

/// RFC 1035 upper bound for a single domain label
pub const DOMAIN_LABEL_MAX_LENGTH: usize = 63;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;

pub const PHONE_MIN_DIGITS: usize = 8;
pub const PHONE_MAX_DIGITS: usize = 15;

/// Digit counts above this are valid but unusual
pub const PHONE_LONG_DIGITS: usize = 12;

/// Punctuation stripped from phone numbers before counting digits
pub const PHONE_ALLOWED_PUNCTUATION: &[char] = &['+', '-', '.', '(', ')', ' '];

/// Validate an email address using the default locale
pub fn validate_email(value: &Value) -> ValidationResult {
    validate_email_in(value, Locale::default())
}

pub fn validate_email_in(value: &Value, locale: Locale) -> ValidationResult {
    let Some(raw) = value.as_str() else {
        return ValidationResult::error(Message::EmailNotString.render(locale));
    };

    let email = raw.trim();

    if email.is_empty() {
        return ValidationResult::error(Message::EmailEmpty.render(locale));
    }

    if email.chars().count() > EMAIL_MAX_LENGTH {
        return ValidationResult::error(
            Message::EmailTooLong {
                max: EMAIL_MAX_LENGTH,
            }
            .render(locale),
        );
    }

    let Some((_, domain)) = split_address(email) else {
        return ValidationResult::error(Message::EmailMalformed.render(locale));
    };

    if domain
        .split('.')
        .any(|label| label.chars().count() > DOMAIN_LABEL_MAX_LENGTH)
    {
        return ValidationResult::error(Message::EmailDomainTooLong.render(locale));
    }

    let mut result = ValidationResult::ok();

    if spam::is_disposable_domain(domain) {
        result.push_warning(Message::DisposableEmail.render(locale));
    }

    result
}

/// Split a well-formed address into local part and domain
fn split_address(email: &str) -> Option<(&str, &str)> {
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }

    let (local, domain) = email.split_once('@')?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }

    if email.contains("..") {
        return None;
    }

    if local.starts_with('.') || local.ends_with('.') {
        return None;
    }

    if local
        .chars()
        .any(|c| matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | ',' | ';' | ':' | '"' | '\\'))
    {
        return None;
    }

    if domain.starts_with('-') || !domain.contains('.') {
        return None;
    }

    let labels_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });

    labels_ok.then_some((local, domain))
}

/// Validate a person's name using the default locale and label
pub fn validate_name(value: &Value) -> ValidationResult {
    let locale = Locale::default();
    validate_name_in(value, FieldLabel::Name.render(locale), locale)
}

/// Validate a name-like field (person, company, industry)
pub fn validate_name_in(value: &Value, label: &str, locale: Locale) -> ValidationResult {
    let Some(raw) = value.as_str() else {
        return ValidationResult::error(Message::TextNotString { label }.render(locale));
    };

    let name = raw.trim();
    let length = name.chars().count();

    if length == 0 {
        return ValidationResult::error(Message::TextEmpty { label }.render(locale));
    }

    if length < NAME_MIN_LENGTH {
        return ValidationResult::error(
            Message::TextTooShort {
                label,
                min: NAME_MIN_LENGTH,
            }
            .render(locale),
        );
    }

    if length > NAME_MAX_LENGTH {
        return ValidationResult::error(
            Message::TextTooLong {
                label,
                max: NAME_MAX_LENGTH,
            }
            .render(locale),
        );
    }

    if !name.chars().any(char::is_alphabetic) {
        let numeric = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(char::is_numeric);

        let message = if numeric {
            Message::NameNumeric { label }
        } else {
            Message::NameSymbolic { label }
        };

        return ValidationResult::error(message.render(locale));
    }

    let mut result = ValidationResult::ok();

    if spam::longest_repeat_run(name) >= SUSPICIOUS_REPEAT_RUN {
        result.push_warning(Message::RepeatedCharacters { label }.render(locale));
    }

    result
}

/// Validate free text using the default locale
pub fn validate_message(value: &Value, min_len: usize, max_len: usize, label: &str) -> ValidationResult {
    validate_message_in(value, min_len, max_len, label, Locale::default())
}

pub fn validate_message_in(
    value: &Value,
    min_len: usize,
    max_len: usize,
    label: &str,
    locale: Locale,
) -> ValidationResult {
    let Some(raw) = value.as_str() else {
        return ValidationResult::error(Message::TextNotString { label }.render(locale));
    };

    let message = raw.trim();
    let length = message.chars().count();

    if length == 0 {
        return ValidationResult::error(Message::TextEmpty { label }.render(locale));
    }

    if length < min_len {
        return ValidationResult::error(Message::TextTooShort { label, min: min_len }.render(locale));
    }

    if length > max_len {
        return ValidationResult::error(Message::TextTooLong { label, max: max_len }.render(locale));
    }

    let mut result = ValidationResult::ok();

    if message.split_whitespace().count() < 3 {
        result.push_warning(Message::FewWords { label }.render(locale));
    }

    for signal in spam::scan(message) {
        result.push_warning(signal.message().render(locale));
    }

    result
}

/// Validate an optional phone number using the default locale
pub fn validate_phone(value: &Value) -> ValidationResult {
    validate_phone_in(value, Locale::default())
}

/// Anything other than a string counts as an absent optional field
pub fn validate_phone_in(value: &Value, locale: Locale) -> ValidationResult {
    let raw = match value {
        Value::String(s) => s.trim(),
        _ => return ValidationResult::ok(),
    };

    if raw.is_empty() {
        return ValidationResult::ok();
    }

    let remaining: String = raw
        .chars()
        .filter(|c| !PHONE_ALLOWED_PUNCTUATION.contains(c))
        .collect();

    if !remaining.chars().all(|c| c.is_ascii_digit()) {
        return ValidationResult::error(Message::PhoneInvalidCharacters.render(locale));
    }

    let digits = remaining.len();

    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return ValidationResult::error(
            Message::PhoneDigitCount {
                min: PHONE_MIN_DIGITS,
                max: PHONE_MAX_DIGITS,
            }
            .render(locale),
        );
    }

    let mut result = ValidationResult::ok();

    if digits == PHONE_MIN_DIGITS {
        result.push_warning(Message::PhoneShort.render(locale));
    } else if digits > PHONE_LONG_DIGITS {
        result.push_warning(Message::PhoneLong.render(locale));
    }

    result
}

/// Validate that a value is one of a fixed set of options
pub fn validate_choice_in(
    value: &Value,
    options: &[&str],
    label: &str,
    locale: Locale,
) -> ValidationResult {
    match value.as_str() {
        Some(choice) if options.contains(&choice.trim()) => ValidationResult::ok(),
        _ => ValidationResult::error(Message::InvalidChoice { label }.render(locale)),
    }
}
