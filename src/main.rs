use clap::Parser;
use colored::*;
use std::process;
use tidyws::OrganizeError;
use tidyws::cli::{Cli, RunOutcome, run_cli_with_config};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.quiet, cli.verbose);
    log::debug!("CLI args parsed: {:?}", cli);

    let command = cli.command();
    let exit_code = match run_cli_with_config(&command, &cli.root_path(), cli.config.as_deref()) {
        Ok(RunOutcome::Undone(report)) if !report.failed.is_empty() => 1,
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let OrganizeError::PartialApply {
                log_path: Some(log_path),
                ..
            } = &e
            {
                eprintln!(
                    "Completed moves were logged. Revert them with: tidyws --undo {}",
                    log_path.display()
                );
            }
            e.exit_code()
        }
    };

    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}
