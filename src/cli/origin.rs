//! `check-origin` command

use std::process::ExitCode;

use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;

#[derive(Args, Debug)]
pub struct CheckOriginArgs {
    /// Origin to test, e.g. https://tcdynamics.fr
    pub origin: String,
}

#[derive(Debug, Serialize)]
struct OriginReport<'a> {
    origin: &'a str,
    allowed: bool,
}

pub fn run(args: CheckOriginArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let policy = config.security.origin_policy()?;
    let allowed = policy.is_allowed(Some(&args.origin));

    super::print_json(&OriginReport {
        origin: &args.origin,
        allowed,
    })?;

    Ok(super::exit_code(allowed))
}
