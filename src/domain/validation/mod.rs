//! Field validation
//!
//! Pure validators for the public forms, the spam heuristics they consult,
//! and the message catalog used to render problems.

mod fields;
pub mod lists;
mod messages;
mod result;
mod sanitize;
pub mod spam;

pub use fields::{
    validate_choice_in, validate_email, validate_email_in, validate_message,
    validate_message_in, validate_name, validate_name_in, validate_phone, validate_phone_in,
    EMAIL_MAX_LENGTH, PHONE_MAX_DIGITS, PHONE_MIN_DIGITS,
};
pub use messages::{FieldLabel, Locale, Message};
pub use result::ValidationResult;
pub use sanitize::{sanitize_email, sanitize_filename, sanitize_phone, sanitize_text};
