//! depcheck - pyproject.toml dependency checker CLI tool
//!
//! Reports how each declared dependency compares with the latest release on
//! the index and, with `--update`, raises outdated minimums and installs
//! what the local environment is missing.

use clap::Parser;
use depcheck::cli::CliArgs;
use depcheck::manifest::locate_manifest;
use depcheck::orchestrator::{Orchestrator, OrchestratorConfig};
use depcheck::output::{create_formatter, OutputConfig};
use depcheck::package_manager::{
    InstalledInventory, InstalledSyncer, PythonEnvironment, SystemProcessRunner,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for fatal errors
const FATAL_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity-derived default
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;

    let manifest = locate_manifest(&args.path)?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let show_progress = output_config.shows_progress();
    let failures_to_stderr = output_config.failures_to_stderr();
    let formatter = create_formatter(output_config);
    let orchestrator = Orchestrator::new(OrchestratorConfig::from_args(&args))?;

    let mut stdout = io::stdout();

    // Step 1: check
    formatter.format_check_start(&manifest, &mut stdout)?;
    let records = orchestrator.check(&manifest, show_progress).await?;
    let report_code = formatter.format_report(&records, &mut stdout)?;

    if !args.update {
        stdout.flush()?;
        return Ok(exit_code(report_code));
    }

    // Step 2: rewrite the manifest, then re-check what was written
    let write_result = orchestrator.apply_updates(&manifest, &records, args.dry_run)?;
    formatter.format_write_result(&write_result, &mut stdout)?;

    let records = if write_result.file_modified {
        orchestrator.check(&manifest, show_progress).await?
    } else {
        records
    };

    // Step 3: bring the environment up to the declared minimums
    let environment = PythonEnvironment::discover(&args.python)?;
    let inventory = InstalledInventory::from_environment(&environment);
    tracing::debug!(
        python = %environment.executable,
        installed = inventory.len(),
        "read installed distributions"
    );

    let runner = SystemProcessRunner::new().with_stdout_to_stderr(args.json);
    let syncer = InstalledSyncer::new(&inventory, &runner, environment.pip_install_command());
    let plan = syncer.plan(&records);

    formatter.format_install_plan(&plan, &mut stdout)?;
    stdout.flush()?;

    let result = syncer.apply(&plan, args.dry_run)?;
    let installer_code = if args.dry_run { 0 } else { result };

    if installer_code != 0 && failures_to_stderr {
        formatter.format_install_result(&plan, installer_code, &mut io::stderr())?;
    } else {
        formatter.format_install_result(&plan, installer_code, &mut stdout)?;
    }
    stdout.flush()?;

    Ok(exit_code(installer_code))
}
