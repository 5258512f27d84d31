//! Command handlers.
//!
//! Handlers are thin: read input, call into `sandbox-core` or
//! `sandbox-agent`, format output for the terminal.

pub mod agent;
pub mod volume;
