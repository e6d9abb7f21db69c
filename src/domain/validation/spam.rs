//! Spam and disposable-content heuristics
//!
//! Everything here is advisory: callers turn signals into warnings, never
//! into errors.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lists::{
    CAPITALS_MIN_LETTERS, CAPITALS_RATIO_THRESHOLD, DISPOSABLE_EMAIL_DOMAINS,
    EMBEDDED_EMAIL_PATTERN, EMBEDDED_PHONE_PATTERN, EMBEDDED_URL_PATTERN,
    MAX_CONSECUTIVE_PUNCTUATION,
};
use super::messages::Message;

static EMBEDDED_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMBEDDED_EMAIL_PATTERN).expect("embedded email pattern is valid"));

static EMBEDDED_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMBEDDED_PHONE_PATTERN).expect("embedded phone pattern is valid"));

static EMBEDDED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMBEDDED_URL_PATTERN).expect("embedded url pattern is valid"));

/// A spam indicator found in free text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamSignal {
    EmbeddedEmail,
    EmbeddedPhone,
    EmbeddedUrl,
    ExcessivePunctuation,
    ExcessiveCapitals,
}

impl SpamSignal {
    pub fn message(self) -> Message<'static> {
        match self {
            Self::EmbeddedEmail => Message::ContainsEmail,
            Self::EmbeddedPhone => Message::ContainsPhone,
            Self::EmbeddedUrl => Message::ContainsUrl,
            Self::ExcessivePunctuation => Message::ExcessivePunctuation,
            Self::ExcessiveCapitals => Message::ExcessiveCapitals,
        }
    }
}

/// Whether `domain` (or a parent domain) hands out throwaway inboxes
pub fn is_disposable_domain(domain: &str) -> bool {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();

    DISPOSABLE_EMAIL_DOMAINS.iter().any(|d| {
        domain == *d
            || domain
                .strip_suffix(d)
                .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Scan free text for spam indicators, in a stable order
pub fn scan(text: &str) -> Vec<SpamSignal> {
    let mut signals = Vec::new();

    if EMBEDDED_EMAIL.is_match(text) {
        signals.push(SpamSignal::EmbeddedEmail);
    }

    if EMBEDDED_PHONE.is_match(text) {
        signals.push(SpamSignal::EmbeddedPhone);
    }

    if EMBEDDED_URL.is_match(text) {
        signals.push(SpamSignal::EmbeddedUrl);
    }

    if longest_run(text, |c| c == '!' || c == '?') > MAX_CONSECUTIVE_PUNCTUATION {
        signals.push(SpamSignal::ExcessivePunctuation);
    }

    if capitals_ratio(text).is_some_and(|ratio| ratio > CAPITALS_RATIO_THRESHOLD) {
        signals.push(SpamSignal::ExcessiveCapitals);
    }

    signals
}

/// Length of the longest run of identical consecutive characters
pub fn longest_repeat_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous = None;

    for c in text.chars() {
        if Some(c) == previous {
            current += 1;
        } else {
            current = 1;
            previous = Some(c);
        }
        longest = longest.max(current);
    }

    longest
}

fn longest_run(text: &str, matches: impl Fn(char) -> bool) -> usize {
    let mut longest = 0;
    let mut current = 0;

    for c in text.chars() {
        if matches(c) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    longest
}

/// Upper-case share of the letters in `text`, or `None` if there are too few
/// letters to judge
fn capitals_ratio(text: &str) -> Option<f64> {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();

    if letters.len() < CAPITALS_MIN_LETTERS {
        return None;
    }

    let upper = letters.iter().filter(|c| c.is_uppercase()).count();
    Some(upper as f64 / letters.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposable_domains() {
        assert!(is_disposable_domain("mailinator.com"));
        assert!(is_disposable_domain("MAILINATOR.COM"));
        assert!(is_disposable_domain("inbox.yopmail.com"));
        assert!(!is_disposable_domain("example.com"));
        assert!(!is_disposable_domain("notmailinator.com"));
    }

    #[test]
    fn test_clean_text_has_no_signals() {
        let text = "Bonjour, nous aimerions automatiser le traitement de nos factures.";
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_embedded_contact_details() {
        let signals = scan("Write to me at someone@example.com or call 555-123-4567");
        assert!(signals.contains(&SpamSignal::EmbeddedEmail));
        assert!(signals.contains(&SpamSignal::EmbeddedPhone));
    }

    #[test]
    fn test_french_phone_number() {
        let signals = scan("Appelez-moi au 06 12 34 56 78 demain");
        assert_eq!(signals, vec![SpamSignal::EmbeddedPhone]);
    }

    #[test]
    fn test_embedded_url() {
        assert_eq!(
            scan("Check out https://spam.example/offer now"),
            vec![SpamSignal::EmbeddedUrl]
        );
        assert_eq!(
            scan("Visit www.example.org for details"),
            vec![SpamSignal::EmbeddedUrl]
        );
    }

    #[test]
    fn test_consecutive_punctuation() {
        assert!(scan("Really?!?! Amazing").contains(&SpamSignal::ExcessivePunctuation));
        assert!(!scan("Really?! Amazing!").contains(&SpamSignal::ExcessivePunctuation));
    }

    #[test]
    fn test_excessive_capitals() {
        assert!(scan("BUY NOW THIS INCREDIBLE OFFER").contains(&SpamSignal::ExcessiveCapitals));
        assert!(!scan("Buy now this incredible offer").contains(&SpamSignal::ExcessiveCapitals));
        // Too few letters to judge
        assert!(!scan("OK THX").contains(&SpamSignal::ExcessiveCapitals));
    }

    #[test]
    fn test_longest_repeat_run() {
        assert_eq!(longest_repeat_run(""), 0);
        assert_eq!(longest_repeat_run("abc"), 1);
        assert_eq!(longest_repeat_run("aaab"), 3);
        assert_eq!(longest_repeat_run("Jeaaaan"), 4);
        assert_eq!(longest_repeat_run("ééééé"), 5);
    }
}
