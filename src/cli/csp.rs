//! `audit-csp` command

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::domain::security::{standard_csp, strict_csp, ContentSecurityPolicy};
use crate::domain::ValidationResult;

#[derive(Args, Debug)]
pub struct AuditCspArgs {
    /// Policy to audit instead of the built-in standard policy
    #[arg(long, conflicts_with = "strict")]
    pub policy: Option<String>,

    /// Audit the built-in strict policy
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct CspReport {
    pub policy: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Audit the selected policy
pub fn audit(args: &AuditCspArgs) -> CspReport {
    let source = match (&args.policy, args.strict) {
        (Some(policy), _) => policy.as_str(),
        (None, true) => strict_csp(),
        (None, false) => standard_csp(),
    };

    let policy = ContentSecurityPolicy::parse(source);

    CspReport {
        policy: policy.to_string(),
        result: policy.audit(),
    }
}

pub fn run(args: AuditCspArgs) -> anyhow::Result<ExitCode> {
    let report = audit(&args);
    super::print_json(&report)?;

    Ok(super::exit_code(report.result.is_valid()))
}
