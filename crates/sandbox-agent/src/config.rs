//! Agent launch options.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;
use tracing::level_filters::LevelFilter;

/// Executable launched when no other is configured.
pub const DEFAULT_AGENT_PROGRAM: &str = "claude";

/// Tools the agent may use without asking.
pub const DEFAULT_ALLOWED_TOOLS: [&str; 5] = ["Read", "Edit", "Glob", "Grep", "Bash"];

/// System prompt for an agent running inside a sandbox.
///
/// `preview_url` is the public URL of the sandbox's port 80.
pub fn sandbox_system_prompt(preview_url: &str) -> String {
    format!(
        "You are running in a sandbox. Your public preview URL for port 80 is: {preview_url}. \
         This is an example of the preview URL format - when you start services on different \
         ports, they will be accessible at similar preview URLs following the same pattern. \
         For example, a server on port 8000 would be accessible at a preview URL like this one \
         but for port 8000."
    )
}

// ============================================================================
// Permission Mode
// ============================================================================

/// How the agent treats actions that need approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionMode {
    /// Ask before every sensitive action
    Default,
    /// Apply file edits without asking
    #[default]
    AcceptEdits,
    /// Plan only, make no changes
    Plan,
    /// Never ask
    BypassPermissions,
}

impl PermissionMode {
    /// Name passed to `--permission-mode`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::AcceptEdits => "acceptEdits",
            Self::Plan => "plan",
            Self::BypassPermissions => "bypassPermissions",
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "acceptEdits" | "accept-edits" => Ok(Self::AcceptEdits),
            "plan" => Ok(Self::Plan),
            "bypassPermissions" | "bypass-permissions" => Ok(Self::BypassPermissions),
            other => Err(format!(
                "unknown permission mode '{other}' (expected default, acceptEdits, plan or bypassPermissions)"
            )),
        }
    }
}

// ============================================================================
// SDK Log Config
// ============================================================================

/// Which of the agent's own diagnostic lines (its stderr) reach `tracing`.
///
/// Lines are classified by a leading severity word such as `WARNING:` or
/// `[error]`; unlabelled lines count as `INFO`. The default forwards `WARN`
/// and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkLogConfig {
    max_level: LevelFilter,
}

impl Default for SdkLogConfig {
    fn default() -> Self {
        Self {
            max_level: LevelFilter::WARN,
        }
    }
}

impl SdkLogConfig {
    /// Forward lines at `max_level` or more severe.
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Forward nothing.
    pub const fn silent() -> Self {
        Self::new(LevelFilter::OFF)
    }

    /// Least severe level that is forwarded.
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Whether a line of the given severity is forwarded.
    pub fn forwards(&self, level: Level) -> bool {
        level <= self.max_level
    }

    /// Severity of one stderr line.
    pub fn classify(line: &str) -> Level {
        let word = line
            .trim_start()
            .trim_start_matches('[')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();

        match word.as_str() {
            "ERROR" | "CRITICAL" | "FATAL" => Level::ERROR,
            "WARN" | "WARNING" => Level::WARN,
            "DEBUG" => Level::DEBUG,
            "TRACE" => Level::TRACE,
            _ => Level::INFO,
        }
    }
}

// ============================================================================
// Agent Options
// ============================================================================

/// Options for launching an agent session.
#[derive(Debug, Clone)]
pub struct AgentOptions {
    /// Agent executable
    pub program: PathBuf,
    /// Arguments placed before the generated flags (e.g. a script path)
    pub program_args: Vec<String>,
    /// Tools the agent may use without asking
    pub allowed_tools: Vec<String>,
    /// Approval behavior
    pub permission_mode: PermissionMode,
    /// System prompt override
    pub system_prompt: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Working directory for the agent process
    pub working_dir: Option<PathBuf>,
    /// Forwarding of the agent's own diagnostics
    pub sdk_log: SdkLogConfig,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_AGENT_PROGRAM),
            program_args: Vec::new(),
            allowed_tools: DEFAULT_ALLOWED_TOOLS.iter().map(ToString::to_string).collect(),
            permission_mode: PermissionMode::default(),
            system_prompt: None,
            model: None,
            working_dir: None,
            sdk_log: SdkLogConfig::default(),
        }
    }
}

impl AgentOptions {
    /// Defaults plus the sandbox system prompt for `preview_url`.
    pub fn for_sandbox(preview_url: &str) -> Self {
        Self::default().with_system_prompt(sandbox_system_prompt(preview_url))
    }

    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn with_program_args(mut self, args: Vec<String>) -> Self {
        self.program_args = args;
        self
    }

    #[must_use]
    pub fn with_allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = tools;
        self
    }

    #[must_use]
    pub const fn with_permission_mode(mut self, mode: PermissionMode) -> Self {
        self.permission_mode = mode;
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub const fn with_sdk_log(mut self, sdk_log: SdkLogConfig) -> Self {
        self.sdk_log = sdk_log;
        self
    }

    /// Command-line arguments for the agent executable.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = self.program_args.clone();
        args.extend(
            [
                "--print",
                "--verbose",
                "--input-format",
                "stream-json",
                "--output-format",
                "stream-json",
                "--permission-mode",
                self.permission_mode.as_str(),
            ]
            .map(String::from),
        );

        if !self.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(self.allowed_tools.join(","));
        }
        if let Some(prompt) = &self.system_prompt {
            args.push("--system-prompt".to_string());
            args.push(prompt.clone());
        }
        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }
        args
    }
}
