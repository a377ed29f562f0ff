mod commands;
mod logging;
mod progress;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, InputArgs};
use dotenv::dotenv;
use img_sieve_core::analysis::size_check::{SizeCleanup, SizeVerdict};
use img_sieve_core::{AppConfig, SieveEngine};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match img_sieve_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Report(input)) => run_report(config, &input),
        Some(Commands::DeleteUnlisted(input)) => run_delete_unlisted(config, &input),
        Some(Commands::DeleteSizeMismatched { input, dry_run }) => {
            run_delete_size_mismatched(config, &input, dry_run)
        }
        Some(Commands::CleanAll(input)) => run_clean_all(config, &input),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn open_engine(
    mut config: AppConfig,
    input: &InputArgs,
    reporter: &CliReporter,
) -> Result<SieveEngine> {
    if let Some(tolerance) = input.tolerance {
        config = config.with_tolerance(tolerance);
    }
    if let Some(size_folder) = input.size_folder {
        config = config.with_size_folder(size_folder.into());
    }

    let engine = SieveEngine::open(config, &input.archive, &input.manifest, reporter)
        .inspect_err(|_| reporter.clear())
        .with_context(|| format!("Failed to load {}", input.archive.display()))?;
    print_summary(&engine);
    Ok(engine)
}

fn output_path(engine: &SieveEngine, input: &InputArgs) -> PathBuf {
    input
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&engine.config().output_name))
}

fn export(engine: &SieveEngine, output: &Path, reporter: &CliReporter) -> Result<()> {
    let report = engine
        .export(output, reporter)
        .inspect_err(|_| reporter.clear())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Cleaned archive: {} ({} files)",
        output.display().to_string().cyan(),
        report.files
    );
    Ok(())
}

fn print_summary(engine: &SieveEngine) {
    let report = engine.name_report();
    info!("Total in list: {}", format!("{}", report.retained).green());
    info!(
        "Found {} image(s) not in the list",
        format!("{}", report.extra.len()).yellow()
    );
    info!(
        "{} listed name(s) not found in archive",
        format!("{}", report.missing.len()).yellow()
    );
}

fn print_listing(title: &str, lines: impl IntoIterator<Item = String>) {
    println!("{}", title.bold());
    for line in lines {
        println!("  {}", line);
    }
}

fn print_size_cleanup(cleanup: &SizeCleanup) {
    for warning in &cleanup.warnings {
        warn!("{}", warning);
    }
    print_listing(
        "Deleted size mismatch details:",
        cleanup.deleted.iter().map(|d| d.to_string()),
    );
}

fn run_report(config: AppConfig, input: &InputArgs) -> Result<()> {
    let reporter = CliReporter::new();
    let engine = open_engine(config, input, &reporter)?;

    let report = engine.name_report();
    print_listing("Image names NOT in list:", report.extra.iter().cloned());
    print_listing("List names NOT in archive:", report.missing.iter().cloned());

    if let Some(output) = &input.output {
        export(&engine, output, &reporter)?;
    }
    engine.close()?;
    Ok(())
}

fn run_delete_unlisted(config: AppConfig, input: &InputArgs) -> Result<()> {
    let reporter = CliReporter::new();
    let engine = open_engine(config, input, &reporter)?;

    let deleted = engine.delete_unlisted(&reporter)?;
    info!(
        "Deleted {} images not in the list.",
        format!("{}", deleted.len()).red()
    );

    export(&engine, &output_path(&engine, input), &reporter)?;
    engine.close()?;
    Ok(())
}

fn run_delete_size_mismatched(config: AppConfig, input: &InputArgs, dry_run: bool) -> Result<()> {
    let reporter = CliReporter::new();
    let engine = open_engine(config, input, &reporter)?;

    if dry_run {
        let evaluation = engine.evaluate_sizes(&reporter)?;
        for warning in &evaluation.warnings {
            warn!("{}", warning);
        }
        print_listing(
            "Size mismatches (dry run, nothing deleted):",
            evaluation.checks.iter().filter_map(|c| match &c.verdict {
                SizeVerdict::Mismatch { expected, actual } => Some(format!(
                    "{} | Expected: {}, Actual: {}",
                    c.file.relative.display(),
                    expected,
                    actual
                )),
                _ => None,
            }),
        );
        engine.close()?;
        return Ok(());
    }

    let cleanup = engine.delete_size_mismatched(&reporter)?;
    info!(
        "Deleted {} images with size mismatch.",
        format!("{}", cleanup.deleted.len()).red()
    );
    print_size_cleanup(&cleanup);

    export(&engine, &output_path(&engine, input), &reporter)?;
    engine.close()?;
    Ok(())
}

fn run_clean_all(config: AppConfig, input: &InputArgs) -> Result<()> {
    let reporter = CliReporter::new();
    let engine = open_engine(config, input, &reporter)?;

    let report = engine.clean_all(&reporter)?;
    info!(
        "Cleaned {} images not in list and {} size mismatches.",
        format!("{}", report.unlisted.len()).red(),
        format!("{}", report.size.deleted.len()).red(),
    );
    print_size_cleanup(&report.size);

    export(&engine, &output_path(&engine, input), &reporter)?;
    engine.close()?;
    Ok(())
}
