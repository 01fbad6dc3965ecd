// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the orgview CLI

use anyhow::{Context, Result};
use serde::Serialize;

pub mod config;
pub mod employee;
pub mod unit;

pub use self::config::ConfigCommand;
pub use self::employee::EmployeeCommand;
pub use self::unit::UnitCommand;

/// Borrow parsed `--param` pairs as the store's extra query parameters.
fn extras(params: &[(String, String)]) -> Vec<(&str, &str)> {
    params
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(value).context("Failed to render response")?;
    print!("{}", yaml);
    Ok(())
}
