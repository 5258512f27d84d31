//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use sandbox_cli::{Cli, CliError, Commands, VolumeCommand, VolumesCommand, handlers, logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let sdk_level = match &cli.command {
        Some(Commands::Agent(args)) => Some(args.sdk_log_level),
        _ => None,
    };
    logging::init(cli.verbose, sdk_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = CliError::classify(&err).exit_code();
            tracing::debug!(exit_code = code, error = ?err, "Command failed");
            eprintln!("Error: {err:#}");
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Volume { command } => match command {
            VolumeCommand::Decode { file, format } => {
                handlers::volume::decode(file.as_deref(), format)?;
            }
            VolumeCommand::Check { file } => {
                handlers::volume::check(file.as_deref())?;
            }
        },
        Commands::Volumes { command } => match command {
            VolumesCommand::DecodePage { file, format } => {
                handlers::volume::decode_page(file.as_deref(), format)?;
            }
        },
        Commands::Agent(args) => {
            handlers::agent::execute(args).await?;
        }
    }

    Ok(())
}
