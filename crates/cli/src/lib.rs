//! CLI tool for exercising consistent hash rings.
//!
//! Provides commands for:
//! - Simulating load and membership churn (`simulate`)
//! - Resolving keys to members (`lookup`)
//! - Inspecting keyspace ownership per member (`ownership`)

pub mod commands;
pub mod config;

pub use commands::{execute, CommandResult};
pub use config::{CliConfig, Command};
