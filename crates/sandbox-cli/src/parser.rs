//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for sandbox API records and the coding agent.
#[derive(Parser)]
#[command(name = "sandbox")]
#[command(about = "Inspect sandbox API payloads and drive the coding agent")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{OutputFormat, VolumeCommand, VolumesCommand};
    use clap::CommandFactory;
    use sandbox_agent::{LevelFilter, PermissionMode};
    use std::path::PathBuf;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_volume_decode_defaults() {
        let cli = Cli::parse_from(["sandbox", "volume", "decode"]);
        let Some(Commands::Volume {
            command: VolumeCommand::Decode { file, format },
        }) = cli.command
        else {
            panic!("expected volume decode");
        };
        assert!(file.is_none());
        assert_eq!(format, OutputFormat::Canonical);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_volume_check_with_file_and_verbose() {
        let cli = Cli::parse_from(["sandbox", "volume", "check", "vol.json", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Commands::Volume {
                command: VolumeCommand::Check { file: Some(ref f) }
            }) if f == &PathBuf::from("vol.json")
        ));
    }

    #[test]
    fn test_decode_page_format() {
        let cli = Cli::parse_from(["sandbox", "volumes", "decode-page", "--format", "pretty"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Volumes {
                command: VolumesCommand::DecodePage {
                    format: OutputFormat::Pretty,
                    ..
                }
            })
        ));
    }

    #[test]
    fn test_agent_args() {
        let cli = Cli::parse_from([
            "sandbox",
            "agent",
            "--prompt",
            "hi",
            "--preview-url",
            "https://80-x.example.com",
            "--allowed-tool",
            "Read",
            "--allowed-tool",
            "Bash",
            "--permission-mode",
            "plan",
            "--sdk-log-level",
            "error",
            "--agent-bin",
            "/opt/agent",
        ]);
        let Some(Commands::Agent(args)) = cli.command else {
            panic!("expected agent command");
        };

        assert_eq!(args.prompt.as_deref(), Some("hi"));
        assert_eq!(args.allowed_tools, ["Read", "Bash"]);
        assert_eq!(args.permission_mode, PermissionMode::Plan);
        assert_eq!(args.sdk_log_level, LevelFilter::ERROR);
        assert_eq!(args.agent_bin, PathBuf::from("/opt/agent"));
    }

    #[test]
    fn test_invalid_permission_mode_rejected() {
        let result = Cli::try_parse_from(["sandbox", "agent", "--permission-mode", "yolo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Cli::try_parse_from(["sandbox", "volume", "decode", "--format", "xml"]);
        assert!(result.is_err());
    }
}
