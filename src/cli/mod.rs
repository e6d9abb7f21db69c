//! Operational CLI for tcd-guard
//!
//! Subcommands print JSON on stdout and exit non-zero when the check fails,
//! so they can gate deployments:
//! - `audit-csp`: audit a Content-Security-Policy
//! - `check-origin`: test an origin against the CORS allow-list
//! - `validate-form`: validate a JSON submission against a form schema
//! - `headers`: print and audit the security response headers

pub mod csp;
pub mod form;
pub mod headers;
pub mod origin;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;

/// tcd-guard - request validation and abuse prevention checks
#[derive(Parser)]
#[command(name = "tcd-guard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit a Content-Security-Policy (the standard policy by default)
    AuditCsp(csp::AuditCspArgs),

    /// Check whether an origin is on the CORS allow-list
    CheckOrigin(origin::CheckOriginArgs),

    /// Validate a JSON form submission
    ValidateForm(form::ValidateFormArgs),

    /// Print and audit the security response headers
    Headers(headers::HeadersArgs),
}

/// Run a parsed command
pub fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::AuditCsp(args) => csp::run(args),
        Command::CheckOrigin(args) => origin::run(args, config),
        Command::ValidateForm(args) => form::run(args, config),
        Command::Headers(args) => headers::run(args, config),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["tcd-guard", "audit-csp", "--strict"]).unwrap();
        assert!(matches!(cli.command, Command::AuditCsp(args) if args.strict));

        let cli =
            Cli::try_parse_from(["tcd-guard", "check-origin", "https://tcdynamics.fr"]).unwrap();
        assert!(matches!(cli.command, Command::CheckOrigin(_)));

        let cli = Cli::try_parse_from([
            "tcd-guard",
            "validate-form",
            "--schema",
            "demo",
            "--file",
            "lead.json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::ValidateForm(_)));

        let cli = Cli::try_parse_from(["tcd-guard", "headers", "--report-uri", "/csp-report"])
            .unwrap();
        assert!(matches!(cli.command, Command::Headers(_)));
    }

    #[test]
    fn test_policy_and_strict_conflict() {
        let parsed =
            Cli::try_parse_from(["tcd-guard", "audit-csp", "--strict", "--policy", "x"]);
        assert!(parsed.is_err());
    }
}
