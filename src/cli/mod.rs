//! CLI argument parsing
//!
//! Defines command-line interface using clap.

pub mod selfcheck;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parameterized test engine
#[derive(Parser, Debug)]
#[command(name = "paramspec")]
#[command(version)]
#[command(about = "Run the paramspec self-check suite")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the built-in suite
    Run(RunArgs),

    /// List declared tests and their parameters
    List(ListArgs),

    /// Show supported environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Comma-separated tags; only tests carrying one of them run
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Default per-test timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show tags, timeout and ignore flag
    #[arg(short, long)]
    pub detailed: bool,
}
