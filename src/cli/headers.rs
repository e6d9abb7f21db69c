//! `headers` command

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::security::{security_headers, validate_headers, SecurityHeaderOptions};
use crate::domain::ValidationResult;

#[derive(Args, Debug)]
pub struct HeadersArgs {
    /// Use the strict CSP
    #[arg(long)]
    pub strict: bool,

    /// Append a report-uri directive to the CSP
    #[arg(long)]
    pub report_uri: Option<String>,

    /// Leave out Strict-Transport-Security
    #[arg(long)]
    pub no_hsts: bool,
}

#[derive(Debug, Serialize)]
pub struct HeadersReport {
    pub headers: Vec<HeaderEntry>,
    pub audit: ValidationResult,
}

#[derive(Debug, Serialize)]
pub struct HeaderEntry {
    pub name: &'static str,
    pub value: String,
}

/// Command-line flags layered over the `security` config section
pub fn options(args: &HeadersArgs, config: &AppConfig) -> SecurityHeaderOptions {
    let mut options = config.security.header_options();
    options.strict_csp |= args.strict;
    options.include_hsts &= !args.no_hsts;
    if args.report_uri.is_some() {
        options.report_uri = args.report_uri.clone();
    }
    options
}

pub fn report(options: &SecurityHeaderOptions) -> HeadersReport {
    let headers = security_headers(options);
    let audit = validate_headers(&headers);

    HeadersReport {
        headers: headers
            .into_iter()
            .map(|(name, value)| HeaderEntry { name, value })
            .collect(),
        audit,
    }
}

pub fn run(args: HeadersArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let report = report(&options(&args, config));
    super::print_json(&report)?;

    Ok(super::exit_code(report.audit.is_valid()))
}
