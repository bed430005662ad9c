use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use gstinvoice_cli::commands;
use gstinvoice_cli::config::GeneratorConfig;
use gstinvoice_cli::{Cli, Command};

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => {
            let config = args.apply(GeneratorConfig::from_env());
            info!(
                locale = %config.locale,
                split_total = %config.split_total,
                output = %config.output.display(),
                "generating invoice"
            );
            let written = commands::generate(&config)?;
            println!("{}", written.display());
        }
        Command::Sample { output } => {
            commands::write_sample(&output)?;
            println!("{}", output.display());
        }
    }
    Ok(())
}

fn main() -> std::process::ExitCode {
    gstinvoice_observability::init();

    match run(Cli::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "invoice generation failed");
            eprintln!("error: {err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
