//! Form schema registry

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::domain::validation::lists::{COMPANY_SIZE_OPTIONS, TIMELINE_OPTIONS};
use crate::domain::validation::{
    validate_choice_in, validate_email_in, validate_message_in, validate_name_in,
    validate_phone_in, FieldLabel, Locale, ValidationResult,
};
use crate::domain::DomainError;

/// How a single field is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Email,
    Name,
    Text { min: usize, max: usize },
    Phone,
    OneOf(&'static [&'static str]),
}

impl FieldRule {
    pub fn validate(&self, value: &Value, label: &str, locale: Locale) -> ValidationResult {
        match *self {
            Self::Email => validate_email_in(value, locale),
            Self::Name => validate_name_in(value, label, locale),
            Self::Text { min, max } => validate_message_in(value, min, max, label, locale),
            Self::Phone => validate_phone_in(value, locale),
            Self::OneOf(options) => validate_choice_in(value, options, label, locale),
        }
    }
}

/// A declared form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: FieldLabel,
    pub required: bool,
    pub rule: FieldRule,
}

impl FieldSpec {
    const fn required(name: &'static str, label: FieldLabel, rule: FieldRule) -> Self {
        Self {
            name,
            label,
            required: true,
            rule,
        }
    }

    const fn optional(name: &'static str, label: FieldLabel, rule: FieldRule) -> Self {
        Self {
            name,
            label,
            required: false,
            rule,
        }
    }
}

const CONTACT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldLabel::Name, FieldRule::Name),
    FieldSpec::required("email", FieldLabel::Email, FieldRule::Email),
    FieldSpec::required(
        "message",
        FieldLabel::Message,
        FieldRule::Text { min: 10, max: 5000 },
    ),
    FieldSpec::optional("phone", FieldLabel::Phone, FieldRule::Phone),
    FieldSpec::optional("company", FieldLabel::Company, FieldRule::Name),
];

const DEMO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", FieldLabel::Name, FieldRule::Name),
    FieldSpec::required("email", FieldLabel::Email, FieldRule::Email),
    FieldSpec::required(
        "businessNeeds",
        FieldLabel::BusinessNeeds,
        FieldRule::Text { min: 10, max: 5000 },
    ),
    FieldSpec::optional("phone", FieldLabel::Phone, FieldRule::Phone),
    FieldSpec::required("company", FieldLabel::Company, FieldRule::Name),
    FieldSpec::optional(
        "companySize",
        FieldLabel::CompanySize,
        FieldRule::OneOf(COMPANY_SIZE_OPTIONS),
    ),
    FieldSpec::optional("industry", FieldLabel::Industry, FieldRule::Name),
    FieldSpec::optional(
        "useCase",
        FieldLabel::UseCase,
        FieldRule::Text { min: 5, max: 500 },
    ),
    FieldSpec::optional(
        "timeline",
        FieldLabel::Timeline,
        FieldRule::OneOf(TIMELINE_OPTIONS),
    ),
];

/// Known form schemas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSchemaName {
    Contact,
    Demo,
}

impl FormSchemaName {
    pub const ALL: [FormSchemaName; 2] = [Self::Contact, Self::Demo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Demo => "demo",
        }
    }

    /// Declared fields, in the order they are checked
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::Contact => CONTACT_FIELDS,
            Self::Demo => DEMO_FIELDS,
        }
    }
}

impl FromStr for FormSchemaName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.as_str() == s)
            .ok_or_else(|| DomainError::unknown_schema(s))
    }
}

impl fmt::Display for FormSchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
