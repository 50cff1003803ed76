//! CLI entry point and dispatch logic
//!
//! This module owns the `run()` function which:
//! - Parses CLI arguments
//! - Builds CliArgs and discovers Config
//! - Initializes logging
//! - Dispatches to command handlers
//! - Handles all error output

use clap::Parser;
use tracing::error;

use pgmrun_drivers::{HideRequest, SampleRequest, ScoreRequest};
use pgmrun_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

use crate::{CliArgs, Config, ExitCode, PgmError};

/// Main CLI execution function.
///
/// This function handles ALL output including errors. It returns `Result<(), ExitCode>`:
/// - On success: returns `Ok(())` after printing any output
/// - On error: prints the error to stderr and returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
/// Usage errors never get here: clap prints them and exits with code 2.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        verbose: cli.verbose.then_some(true),
        seed: cli.seed,
        kill_grace_ms: cli.kill_grace_ms,
        timeout_secs: cli.command.timeout_secs(),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("✗ {err:#}");
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(err) = init_tracing(config.verbose()) {
        eprintln!("⚠ Failed to initialize logging: {err}");
    }
    commands::log_effective_config(&config);

    let operation = cli.command.name();
    if let Err(err) = dispatch(cli.command, &config) {
        error!(operation, %err, "command failed");
        eprintln!("✗ {operation} failed: {err}");
        return Err(err.to_exit_code());
    }

    Ok(())
}

/// Run one parsed command against the effective configuration.
pub(crate) fn dispatch(command: Commands, config: &Config) -> Result<(), PgmError> {
    match command {
        Commands::Learn {
            input,
            output,
            executable,
            sub_mode,
            param_file,
            timeout: _,
        } => commands::execute_learn_command(input, output, executable, sub_mode, param_file, config),
        Commands::Infer {
            input,
            output,
            executable,
            sub_mode,
            timeout: _,
        } => commands::execute_infer_command(input, output, executable, sub_mode, config),
        Commands::Sample {
            input,
            train,
            test,
            valid,
            executable,
        } => {
            let request = SampleRequest {
                input_dir: input,
                train,
                test,
                valid,
            };
            commands::execute_sample_command(request, executable, config)
        }
        Commands::Hide {
            input,
            output,
            count,
            instances,
        } => {
            let request = HideRequest {
                input_dir: input,
                output_dir: output,
                count,
                instances,
            };
            commands::execute_hide_command(&request, config)
        }
        Commands::Append {
            network,
            input,
            output,
        } => commands::execute_append_command(&network, &input, &output),
        Commands::Score {
            input,
            output,
            executable,
            ext,
        } => {
            let request = ScoreRequest {
                input_dir: input,
                output_dir: output,
                executable,
                ext,
            };
            commands::execute_score_command(&request)
        }
        Commands::Split { file, test_size } => {
            commands::execute_split_command(&file, test_size, config)
        }
    }
}
