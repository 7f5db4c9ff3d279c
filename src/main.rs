//! paramspec - parameterized test execution engine
//!
//! Runs the built-in self-check suite through the engine so every execution
//! parameter can be exercised from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Run everything
//! paramspec run
//!
//! # Only tests tagged foo or bar, JSON report
//! paramspec run --tags foo,bar --format json
//!
//! # List declared tests
//! paramspec list --detailed
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod cli;

use cli::Args;
use paramspec::config::{print_env_help, RunnerConfig};
use paramspec::utils::{init_logger, LogLevel};
use paramspec::SuiteRunner;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        cli::Command::Run(run_args) => {
            let success = run_suite(run_args, args.verbose).await?;
            if !success {
                std::process::exit(1);
            }
        }
        cli::Command::List(list_args) => {
            init_logger(LogLevel::Warn);
            list_tests(list_args)?;
        }
        cli::Command::Env => print_env_help(),
    }

    Ok(())
}

async fn run_suite(args: cli::RunArgs, verbose: bool) -> Result<bool> {
    let mut config = RunnerConfig::resolve(args.config.as_deref())?;
    if let Some(tags) = args.tags {
        config.tags = Some(tags);
    }
    if let Some(timeout) = args.timeout_ms {
        config.default_timeout_ms = timeout;
    }
    config.validate()?;

    let level = if verbose {
        LogLevel::Debug
    } else {
        LogLevel::from_str(&config.log_level).unwrap_or(LogLevel::Info)
    };
    init_logger(level);

    let suite = cli::selfcheck::suite()?;
    let mut runner = SuiteRunner::from_config(&config);
    info!("Tag filter: {}", runner.filter());

    let report = runner.run(&suite).await;

    match args.format.to_lowercase().as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
        _ => println!("{report}"),
    }

    Ok(report.is_success())
}

fn list_tests(args: cli::ListArgs) -> Result<()> {
    let suite = cli::selfcheck::suite()?;

    println!("\nSuite '{}' ({} tests)\n", suite.name(), suite.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for (index, test) in suite.tests().iter().enumerate() {
        println!("  {:2}. {}", index + 1, test);
        if args.detailed {
            let config = test.config();
            let tags: Vec<String> = config.all_tags().into_iter().collect();
            println!(
                "      tags: [{}]  timeout: {}  ignored: {}",
                tags.join(", "),
                config
                    .timeout
                    .map(|t| format!("{}ms", t.as_millis()))
                    .unwrap_or_else(|| "default".to_string()),
                config.ignored
            );
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    Ok(())
}
