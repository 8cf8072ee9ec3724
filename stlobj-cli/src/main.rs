/// stlobj - convert STL meshes to OBJ or re-encoded STL
///
/// Inputs may be files or directories; directories are searched recursively
/// for *.stl. Each file is detected, decoded, optionally transformed, and
/// written under the output root.
use std::io::stdout;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, warn};
use stlobj_cli::{driver, print_summary, walk, Cli, Settings};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> Result<bool> {
    let settings = Settings::resolve(cli)?;
    let inputs = walk::collect_inputs(&cli.inputs)?;
    if inputs.is_empty() {
        warn!("No STL files found");
        return Ok(true);
    }

    let summary = driver::run(&settings, &inputs)?;
    print_summary(&mut stdout(), &summary).context("Failed to print summary")?;
    Ok(summary.is_success())
}
