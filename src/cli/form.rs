//! `validate-form` command

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::config::AppConfig;
use crate::domain::form::validate_form_data_in;
use crate::domain::validation::Locale;

#[derive(Args, Debug)]
pub struct ValidateFormArgs {
    /// Form schema name (contact or demo)
    #[arg(long)]
    pub schema: String,

    /// JSON file holding the submission; `-` reads stdin
    #[arg(long)]
    pub file: PathBuf,

    /// Message language; defaults to the configured locale
    #[arg(long)]
    pub locale: Option<Locale>,
}

pub fn run(args: ValidateFormArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let raw = read_input(&args.file)?;
    let data: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let locale = args.locale.unwrap_or(config.locale);
    let result = validate_form_data_in(&data, &args.schema, locale);
    super::print_json(&result)?;

    Ok(super::exit_code(result.is_valid()))
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
