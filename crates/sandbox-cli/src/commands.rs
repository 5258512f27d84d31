//! Subcommands and their arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use sandbox_agent::{AgentOptions, DEFAULT_AGENT_PROGRAM, LevelFilter, PermissionMode, SdkLogConfig};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Decode or validate a single volume payload
    Volume {
        #[command(subcommand)]
        command: VolumeCommand,
    },

    /// Decode paginated volume listings
    Volumes {
        #[command(subcommand)]
        command: VolumesCommand,
    },

    /// Run the coding agent, once or interactively
    Agent(AgentArgs),
}

/// Single-volume commands.
#[derive(Subcommand)]
pub enum VolumeCommand {
    /// Decode a volume and print it re-encoded
    Decode {
        /// JSON file to read (stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Output rendering
        #[arg(long, value_enum, default_value_t = OutputFormat::Canonical)]
        format: OutputFormat,
    },
    /// Validate a volume payload without printing it
    Check {
        /// JSON file to read (stdin when omitted or "-")
        file: Option<PathBuf>,
    },
}

/// Volume listing commands.
#[derive(Subcommand)]
pub enum VolumesCommand {
    /// Decode one page of volumes and print it re-encoded
    DecodePage {
        /// JSON file to read (stdin when omitted or "-")
        file: Option<PathBuf>,
        /// Output rendering
        #[arg(long, value_enum, default_value_t = OutputFormat::Canonical)]
        format: OutputFormat,
    },
}

/// How decoded records are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single line, sorted keys
    Canonical,
    /// Indented, sorted keys
    Pretty,
    /// Single line, known fields first in schema order, then extension fields
    Json,
}

/// Arguments for the agent command.
#[derive(Debug, Args)]
pub struct AgentArgs {
    /// Prompt to run; omit to read prompts from stdin
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Public preview URL for the sandbox's port 80
    #[arg(long, env = "PREVIEW_URL", default_value = "")]
    pub preview_url: String,

    /// Tool the agent may use without asking (repeatable; defaults to Read, Edit, Glob, Grep, Bash)
    #[arg(long = "allowed-tool", value_name = "TOOL")]
    pub allowed_tools: Vec<String>,

    /// Approval behavior: default, acceptEdits, plan or bypassPermissions
    #[arg(long, default_value_t = PermissionMode::AcceptEdits)]
    pub permission_mode: PermissionMode,

    /// Model override
    #[arg(long, env = "SANDBOX_AGENT_MODEL")]
    pub model: Option<String>,

    /// Agent executable
    #[arg(long, env = "SANDBOX_AGENT_BIN", default_value = DEFAULT_AGENT_PROGRAM)]
    pub agent_bin: PathBuf,

    /// Most verbose level of the agent's own diagnostics to show
    #[arg(long, default_value_t = LevelFilter::WARN)]
    pub sdk_log_level: LevelFilter,

    /// Working directory for the agent
    #[arg(long)]
    pub cwd: Option<PathBuf>,
}

impl AgentArgs {
    /// Build launch options from the parsed arguments.
    pub fn to_options(&self) -> AgentOptions {
        let mut options = AgentOptions::for_sandbox(&self.preview_url)
            .with_program(&self.agent_bin)
            .with_permission_mode(self.permission_mode)
            .with_sdk_log(SdkLogConfig::new(self.sdk_log_level));

        if !self.allowed_tools.is_empty() {
            options = options.with_allowed_tools(self.allowed_tools.clone());
        }
        if let Some(model) = &self.model {
            options = options.with_model(model);
        }
        if let Some(dir) = &self.cwd {
            options = options.with_working_dir(dir);
        }
        options
    }
}
