//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, installs logging,
//! creates the tokio runtime and dispatches to the command handlers. It owns
//! all error output.

use clap::Parser;

use fiterior_config::{CliArgs, Config};
use fiterior_utils::error::FiteriorError;
use fiterior_utils::exit_codes::ExitCode;
use fiterior_utils::logging::init_tracing;

use super::args::{Cli, Commands};
use super::commands;

/// Main CLI execution function.
///
/// Returns `Err(ExitCode)` after printing the error; main.rs only maps the code
/// to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        endpoint: cli.endpoint.clone(),
        timeout_ms: cli.timeout_ms,
        verbose: Some(cli.verbose),
        ..CliArgs::default()
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = FiteriorError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    if let Err(e) = init_tracing(config.verbose(), config.output_format()) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.command.name();
    let result = rt.block_on(async {
        match cli.command {
            Commands::Transform {
                image,
                theme,
                model,
                retries,
                json,
            } => {
                commands::execute_transform_command(
                    commands::TransformArgs {
                        image,
                        theme,
                        model,
                        retries,
                        json,
                    },
                    &config,
                )
                .await
            }
            Commands::Themes { json } => commands::execute_themes_command(json),
            Commands::Models { json } => commands::execute_models_command(json),
            Commands::Steps { json } => commands::execute_steps_command(json, &config),
            Commands::Config { json } => commands::execute_config_command(json, &config),
        }
    });

    if let Err(error) = result {
        if let Some(fiterior_error) = error.downcast_ref::<FiteriorError>() {
            eprintln!("{}", fiterior_error.display_for_user());
            return Err(fiterior_error.to_exit_code());
        }
        eprintln!("✗ Unexpected error during '{operation}': {error:#}");
        eprintln!("\n  Run with --verbose for more detailed output");
        return Err(ExitCode::INTERNAL);
    }

    Ok(())
}
