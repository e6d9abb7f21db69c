//! Content-Security-Policy model, canonical policies and auditing

use std::fmt;

use crate::domain::validation::ValidationResult;

/// Reviewed policy for the marketing site and app pages
pub const STANDARD_CSP: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     font-src 'self'; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Reviewed policy for pages that load nothing but first-party assets
pub const STRICT_CSP: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self'; \
     font-src 'self'; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'none'; \
     form-action 'self'; \
     frame-ancestors 'none'; \
     upgrade-insecure-requests";

/// Directives whose absence makes a policy invalid
const REQUIRED_DIRECTIVES: &[(&str, &str)] = &[
    (
        "base-uri",
        "Missing base-uri directive: injected <base> tags can redirect relative URLs",
    ),
    (
        "form-action",
        "Missing form-action directive: forms may submit to any origin",
    ),
    (
        "frame-ancestors",
        "Missing frame-ancestors directive: pages can be framed by any site",
    ),
];

const UNSAFE_SCRIPT_SOURCES: &[&str] = &["'unsafe-inline'", "'unsafe-eval'"];

pub fn standard_csp() -> &'static str {
    STANDARD_CSP
}

pub fn strict_csp() -> &'static str {
    STRICT_CSP
}

/// A single policy directive, e.g. `script-src 'self'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    name: String,
    sources: Vec<String>,
}

impl Directive {
    pub fn new(name: impl Into<String>, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn allows(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s.eq_ignore_ascii_case(source))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for source in &self.sources {
            write!(f, " {}", source)?;
        }
        Ok(())
    }
}

/// Parsed or programmatically built policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    directives: Vec<Directive>,
}

impl ContentSecurityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;`-delimited policy. Empty segments are ignored; parsing
    /// never fails.
    pub fn parse(csp: &str) -> Self {
        let directives = csp
            .split(';')
            .filter_map(|segment| {
                let mut tokens = segment.split_whitespace();
                let name = tokens.next()?;
                Some(Directive::new(name, tokens))
            })
            .collect();

        Self { directives }
    }

    /// Append a directive, builder style
    pub fn directive(
        mut self,
        name: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.directives.push(Directive::new(name, sources));
        self
    }

    /// Append a `report-uri` directive
    pub fn with_report_uri(self, uri: impl Into<String>) -> Self {
        self.directive("report-uri", [uri.into()])
    }

    /// First directive with the given name
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.directives
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Check the policy against the required directives
    pub fn audit(&self) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for (name, message) in REQUIRED_DIRECTIVES {
            if !self.contains(name) {
                result.push_error(*message);
            }
        }

        if !self.contains("default-src") {
            result.push_warning("Missing default-src directive: unlisted resource types are unrestricted");
        }

        if !self.contains("object-src") && !self.contains("default-src") {
            result.push_warning("Missing object-src directive: plugins can load from any origin");
        }

        if let Some(script_src) = self.get("script-src") {
            for source in UNSAFE_SCRIPT_SOURCES {
                if script_src.allows(source) {
                    result.push_warning(format!("script-src allows {}", source));
                }
            }
        }

        for (i, directive) in self.directives.iter().enumerate() {
            if self.directives[..i].iter().any(|d| d.name == directive.name) {
                result.push_warning(format!(
                    "Duplicate {} directive is ignored by browsers",
                    directive.name
                ));
            }
        }

        result
    }
}

impl fmt::Display for ContentSecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", directive)?;
        }
        Ok(())
    }
}

/// Audit a policy string
pub fn test_csp(csp: &str) -> ValidationResult {
    ContentSecurityPolicy::parse(csp).audit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_policies_are_valid() {
        let standard = test_csp(standard_csp());
        assert!(standard.is_valid(), "{:?}", standard);
        assert!(standard.warnings().is_empty());

        let strict = test_csp(strict_csp());
        assert!(strict.is_valid(), "{:?}", strict);
        assert!(strict.warnings().is_empty());
    }

    #[test]
    fn test_missing_base_uri_always_reported() {
        for csp in [
            "",
            "default-src 'self'",
            "default-src 'self'; form-action 'self'; frame-ancestors 'none'",
            "form-action 'self'; frame-ancestors 'none'; object-src 'none'",
        ] {
            let result = test_csp(csp);
            assert!(!result.is_valid());
            assert!(
                result.errors().iter().any(|e| e.contains("base-uri")),
                "{:?} should mention base-uri",
                csp
            );
        }
    }

    #[test]
    fn test_each_missing_directive_has_its_own_error() {
        let result = test_csp("default-src 'self'");

        assert_eq!(result.errors().len(), 3);
        assert!(result.errors()[0].contains("base-uri"));
        assert!(result.errors()[1].contains("form-action"));
        assert!(result.errors()[2].contains("frame-ancestors"));
    }

    #[test]
    fn test_unsafe_script_sources_are_warnings() {
        let result = test_csp(
            "default-src 'self'; script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
             base-uri 'self'; form-action 'self'; frame-ancestors 'none'",
        );

        assert!(result.is_valid());
        assert!(result.warnings().iter().any(|w| w.contains("unsafe-inline")));
        assert!(result.warnings().iter().any(|w| w.contains("unsafe-eval")));
    }

    #[test]
    fn test_missing_fallback_directives_are_warnings() {
        let result = test_csp("base-uri 'self'; form-action 'self'; frame-ancestors 'none'");

        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 2);
        assert!(result.warnings()[0].contains("default-src"));
        assert!(result.warnings()[1].contains("object-src"));
    }

    #[test]
    fn test_unsafe_inline_outside_script_src_is_fine() {
        let result = test_csp(standard_csp());
        assert!(!result.warnings().iter().any(|w| w.contains("unsafe-inline")));
    }

    #[test]
    fn test_parse_is_case_insensitive_and_tolerant() {
        let policy = ContentSecurityPolicy::parse(" ; BASE-URI 'self' ;;  form-action  'self' ; ");

        assert_eq!(policy.directives().len(), 2);
        assert!(policy.contains("base-uri"));
        assert_eq!(policy.get("form-action").unwrap().sources(), ["'self'"]);
    }

    #[test]
    fn test_duplicate_directive_warning() {
        let result = test_csp(&format!("{}; script-src 'none'", standard_csp()));
        assert!(result.is_valid());
        assert_eq!(
            result.warnings(),
            ["Duplicate script-src directive is ignored by browsers"]
        );
    }

    #[test]
    fn test_builder_round_trips_through_display() {
        let policy = ContentSecurityPolicy::new()
            .directive("default-src", ["'self'"])
            .directive("img-src", ["'self'", "data:"])
            .with_report_uri("https://csp-report.example.com");

        assert_eq!(
            policy.to_string(),
            "default-src 'self'; img-src 'self' data:; report-uri https://csp-report.example.com"
        );
        assert_eq!(ContentSecurityPolicy::parse(&policy.to_string()), policy);
    }
}
