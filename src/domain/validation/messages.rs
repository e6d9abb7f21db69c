//! User-facing validation messages
//!
//! Validators describe problems with a [`Message`] and render it for the
//! requested [`Locale`], keeping wording out of the validation logic.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used to render validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

/// Display label of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLabel {
    Name,
    Email,
    Message,
    Phone,
    Company,
    BusinessNeeds,
    CompanySize,
    Industry,
    UseCase,
    Timeline,
}

impl FieldLabel {
    pub fn render(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Name, Locale::En) => "Name",
            (Self::Name, Locale::Fr) => "Nom",
            (Self::Email, _) => "Email",
            (Self::Message, _) => "Message",
            (Self::Phone, Locale::En) => "Phone",
            (Self::Phone, Locale::Fr) => "Téléphone",
            (Self::Company, Locale::En) => "Company",
            (Self::Company, Locale::Fr) => "Entreprise",
            (Self::BusinessNeeds, Locale::En) => "Business needs",
            (Self::BusinessNeeds, Locale::Fr) => "Besoins spécifiques",
            (Self::CompanySize, Locale::En) => "Company size",
            (Self::CompanySize, Locale::Fr) => "Taille d'entreprise",
            (Self::Industry, Locale::En) => "Industry",
            (Self::Industry, Locale::Fr) => "Secteur d'activité",
            (Self::UseCase, Locale::En) => "Use case",
            (Self::UseCase, Locale::Fr) => "Cas d'usage",
            (Self::Timeline, _) => "Timeline",
        }
    }
}

/// A single validation problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    EmailNotString,
    EmailEmpty,
    EmailTooLong { max: usize },
    EmailMalformed,
    EmailDomainTooLong,
    DisposableEmail,

    TextNotString { label: &'a str },
    TextEmpty { label: &'a str },
    TextTooShort { label: &'a str, min: usize },
    TextTooLong { label: &'a str, max: usize },
    NameNumeric { label: &'a str },
    NameSymbolic { label: &'a str },
    RepeatedCharacters { label: &'a str },
    FewWords { label: &'a str },

    ContainsEmail,
    ContainsPhone,
    ContainsUrl,
    ExcessivePunctuation,
    ExcessiveCapitals,

    PhoneInvalidCharacters,
    PhoneDigitCount { min: usize, max: usize },
    PhoneShort,
    PhoneLong,

    InvalidChoice { label: &'a str },
    Required { label: &'a str },
    UnknownSchema { name: &'a str },
}

impl Message<'_> {
    pub fn render(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.english(),
            Locale::Fr => self.french(),
        }
    }

    fn english(&self) -> String {
        match *self {
            Self::EmailNotString => "Email is required and must be a string".to_string(),
            Self::EmailEmpty => "Email cannot be empty".to_string(),
            Self::EmailTooLong { max } => format!("Email is too long (maximum {} characters)", max),
            Self::EmailMalformed => "Invalid email format".to_string(),
            Self::EmailDomainTooLong => "Email domain is too long".to_string(),
            Self::DisposableEmail => {
                "Disposable email address detected, please use a professional address".to_string()
            }
            Self::TextNotString { label } => format!("{} is required and must be a string", label),
            Self::TextEmpty { label } => format!("{} cannot be empty", label),
            Self::TextTooShort { label, min } => {
                format!("{} must be at least {} characters long", label, min)
            }
            Self::TextTooLong { label, max } => {
                format!("{} is too long (maximum {} characters)", label, max)
            }
            Self::NameNumeric { label } => format!("{} cannot contain only digits", label),
            Self::NameSymbolic { label } => {
                format!("{} cannot contain only special characters", label)
            }
            Self::RepeatedCharacters { label } => {
                format!("{} contains suspicious repeated characters", label)
            }
            Self::FewWords { label } => format!("{} seems too short in words", label),
            Self::ContainsEmail => "Message contains an email address".to_string(),
            Self::ContainsPhone => "Message contains a phone number".to_string(),
            Self::ContainsUrl => "Message contains a link".to_string(),
            Self::ExcessivePunctuation => "Message contains too much punctuation".to_string(),
            Self::ExcessiveCapitals => "Message contains too many capital letters".to_string(),
            Self::PhoneInvalidCharacters => "Invalid phone number format".to_string(),
            Self::PhoneDigitCount { min, max } => {
                format!("Phone number must contain between {} and {} digits", min, max)
            }
            Self::PhoneShort => "Phone number is very short".to_string(),
            Self::PhoneLong => "Phone number is very long".to_string(),
            Self::InvalidChoice { label } => format!("Invalid {}", label.to_lowercase()),
            Self::Required { label } => format!("{} is required", label),
            Self::UnknownSchema { name } => format!("Unknown validation schema: {}", name),
        }
    }

    fn french(&self) -> String {
        match *self {
            Self::EmailNotString => {
                "L'email est requis et doit être une chaîne de caractères".to_string()
            }
            Self::EmailEmpty => "L'email ne peut pas être vide".to_string(),
            Self::EmailTooLong { max } => {
                format!("L'email est trop long (maximum {} caractères)", max)
            }
            Self::EmailMalformed => "Format d'email invalide".to_string(),
            Self::EmailDomainTooLong => "Le domaine de l'email est trop long".to_string(),
            Self::DisposableEmail => "Adresse email temporaire détectée - veuillez utiliser une adresse email professionnelle".to_string(),
            Self::TextNotString { label } => format!(
                "Le champ {} est requis et doit être une chaîne de caractères",
                label.to_lowercase()
            ),
            Self::TextEmpty { label } => {
                format!("Le champ {} ne peut pas être vide", label.to_lowercase())
            }
            Self::TextTooShort { label, min } => format!(
                "Le champ {} doit contenir au moins {} caractères",
                label.to_lowercase(),
                min
            ),
            Self::TextTooLong { label, max } => format!(
                "Le champ {} est trop long (maximum {} caractères)",
                label.to_lowercase(),
                max
            ),
            Self::NameNumeric { label } => format!("{} ne contient que des chiffres", label),
            Self::NameSymbolic { label } => {
                format!("{} ne contient que des caractères spéciaux", label)
            }
            Self::RepeatedCharacters { label } => {
                format!("{} contient des caractères répétés", label)
            }
            Self::FewWords { label } => format!("{} semble trop court en termes de mots", label),
            Self::ContainsEmail => "Le message contient une adresse email".to_string(),
            Self::ContainsPhone => "Le message contient un numéro de téléphone".to_string(),
            Self::ContainsUrl => "Le message contient un lien".to_string(),
            Self::ExcessivePunctuation => {
                "Le message contient trop de signes de ponctuation".to_string()
            }
            Self::ExcessiveCapitals => "Le message contient trop de majuscules".to_string(),
            Self::PhoneInvalidCharacters => "Format de numéro de téléphone invalide".to_string(),
            Self::PhoneDigitCount { min, max } => format!(
                "Le numéro de téléphone doit contenir entre {} et {} chiffres",
                min, max
            ),
            Self::PhoneShort => "Numéro de téléphone très court".to_string(),
            Self::PhoneLong => "Numéro de téléphone très long".to_string(),
            Self::InvalidChoice { label } => format!("{} invalide", label),
            Self::Required { label } => format!("Le champ {} est requis", label.to_lowercase()),
            Self::UnknownSchema { name } => format!("Schéma de validation inconnu: {}", name),
        }
    }
}
