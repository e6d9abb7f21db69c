//! Static reference data consulted by the validators
//!
//! Updating these tables never requires touching validation logic.

/// Domains known to hand out throwaway inboxes
pub const DISPOSABLE_EMAIL_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "tempmail.org",
    "temp-mail.org",
    "guerrillamail.com",
    "throwaway.email",
    "maildrop.cc",
    "mailinator.com",
    "yopmail.com",
    "trashmail.com",
    "sharklasers.com",
    "getnada.com",
    "dispostable.com",
];

/// Accepted values of the demo form's company size field
pub const COMPANY_SIZE_OPTIONS: &[&str] = &["1-10", "11-50", "51-200", "201-500", "501-1000", "1000+"];

/// Accepted values of the demo form's timeline field
pub const TIMELINE_OPTIONS: &[&str] = &[
    "Moins de 1 mois",
    "1-3 mois",
    "3-6 mois",
    "6-12 mois",
    "Plus de 12 mois",
];

/// Spam pattern sources, compiled once in [`super::spam`]
pub(crate) const EMBEDDED_EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

pub(crate) const EMBEDDED_PHONE_PATTERN: &str = concat!(
    r"\d{3}[-.\s]?\d{2,3}[-.\s]?\d{4}",
    r"|\(\d{3}\)\s*\d{3}[-.\s]?\d{4}",
    r"|\+?\d{1,3}[\s.-]?\d(?:[\s.-]?\d{2}){4}",
);

pub(crate) const EMBEDDED_URL_PATTERN: &str = r"(?i)\b(?:https?://|www\.)[^\s]+";

/// More than this many `!`/`?` in a row is flagged
pub const MAX_CONSECUTIVE_PUNCTUATION: usize = 3;

/// Share of upper-case letters above which a message is flagged
pub const CAPITALS_RATIO_THRESHOLD: f64 = 0.5;

/// Messages with fewer letters are never checked for capitals
pub const CAPITALS_MIN_LETTERS: usize = 10;

/// Runs of identical characters at least this long are flagged
pub const SUSPICIOUS_REPEAT_RUN: usize = 4;
