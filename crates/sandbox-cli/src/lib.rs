//! Command-line front end for sandbox API records and the coding agent.
//!
//! The `sandbox` binary decodes and validates volume payloads through the
//! `sandbox-core` record contract, and runs the coding agent through
//! `sandbox-agent`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by the binary target
use dotenvy as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod utils;

// Re-export primary types for convenient access
pub use commands::{AgentArgs, Commands, OutputFormat, VolumeCommand, VolumesCommand};
pub use error::CliError;
pub use parser::Cli;
