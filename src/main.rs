use std::process::ExitCode;

use clap::Parser;
use tcd_guard::cli::{self, Cli};
use tcd_guard::infrastructure::logging::init_logging;
use tcd_guard::AppConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    cli::run(cli, &config)
}
