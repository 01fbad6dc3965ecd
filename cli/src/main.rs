// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # orgview CLI
//!
//! The `orgview` binary drives the organisation store from a terminal: it
//! reads employees and organisation units as of a chosen date and submits
//! the administrative workflows (move, leave, terminate, create).
//!
//! ## Commands
//!
//! - `orgview employee show|details|terminate|move|leave|create`
//! - `orgview unit show|create|terminate`
//! - `orgview config show|validate|generate`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use orgview_cli::commands::{self, ConfigCommand, EmployeeCommand, UnitCommand};
use orgview_cli::session::Session;

/// orgview - organisation and employee administration
#[derive(Parser)]
#[command(name = "orgview")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "ORGVIEW_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "ORGVIEW_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Observation date for reads (YYYY-MM-DD, default: today)
    #[arg(long, global = true, value_name = "DATE")]
    at: Option<NaiveDate>,

    /// Print the session work/error log after the command
    #[arg(long, global = true)]
    show_log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Employee reads and workflows
    #[command(name = "employee")]
    Employee {
        #[command(subcommand)]
        command: EmployeeCommand,
    },

    /// Organisation unit reads and workflows
    #[command(name = "unit")]
    Unit {
        #[command(subcommand)]
        command: UnitCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Some(Commands::Config { command }) => {
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Employee { command }) => {
            let session = Session::open(cli.config, cli.at, cli.show_log)?;
            let result = commands::employee::handle_command(command, &session).await;
            session.finish();
            result
        }
        Some(Commands::Unit { command }) => {
            let session = Session::open(cli.config, cli.at, cli.show_log)?;
            let result = commands::unit::handle_command(command, &session).await;
            session.finish();
            result
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    Ok(())
}
