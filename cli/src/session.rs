// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! One CLI invocation's store session: configuration, context and the
//! shared helpers commands use to submit workflows and print results.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use orgview_core::domain::workflow::Workflow;
use orgview_core::{LogKind, StoreConfig, StoreContext, WorkLog};

pub struct Session {
    context: StoreContext,
    show_log: bool,
}

impl Session {
    pub fn open(
        config_path: Option<PathBuf>,
        at: Option<NaiveDate>,
        show_log: bool,
    ) -> Result<Self> {
        let config =
            StoreConfig::load_or_default(config_path).context("Failed to load configuration")?;
        config
            .validate()
            .context("Configuration validation failed")?;

        let context =
            StoreContext::from_config(&config).context("Failed to create backend client")?;
        if let Some(date) = at {
            context.as_of().set(date);
        }
        debug!(as_of = %context.as_of().get(), "Session opened");

        Ok(Self { context, show_log })
    }

    pub fn context(&self) -> &StoreContext {
        &self.context
    }

    /// Fill a workflow draft field by field and submit it.
    pub async fn submit<W: Workflow>(&self, fields: Vec<(&str, Value)>) -> Result<Value> {
        let module = self
            .context
            .workflow::<W>()
            .context("Failed to open workflow module")?;

        for (path, value) in fields {
            module.update_field(path, value)?;
        }

        match module.submit().await {
            Ok(response) => Ok(response),
            Err(e) => {
                if let Some(payload) = module.backend_validation_error() {
                    eprintln!("{}", format!("✗ {}", describe(&payload)).red());
                }
                Err(e).with_context(|| format!("{} failed", W::NAMESPACE))
            }
        }
    }

    /// Print the log if requested. Called once the command has run.
    pub fn finish(&self) {
        if self.show_log {
            print_log(self.context.log());
        }
    }
}

/// Human-readable summary of a backend error payload.
pub fn describe(payload: &Value) -> String {
    payload
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}

pub fn print_log(log: &WorkLog) {
    println!();
    println!("{}", "Session log:".bold());
    if log.is_empty() {
        println!("  {}", "(empty)".dimmed());
        return;
    }

    for entry in log.all() {
        let kind = match entry.kind() {
            LogKind::Work => "WORK ".green(),
            LogKind::Event => "EVENT".cyan(),
            LogKind::Error => "ERROR".red(),
        };
        println!(
            "  {} {} {} {}",
            entry.timestamp().format("%H:%M:%S").to_string().dimmed(),
            kind,
            entry.tag().bold(),
            entry.payload()
        );
    }
}

/// Parse a `key=value` extra query parameter.
pub fn parse_param(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("foo=bar"),
            Ok(("foo".to_string(), "bar".to_string()))
        );
        assert_eq!(
            parse_param("empty="),
            Ok(("empty".to_string(), String::new()))
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=bar").is_err());
    }

    #[test]
    fn test_describe_prefers_description() {
        assert_eq!(
            describe(&json!({"error": true, "description": "Unit has children"})),
            "Unit has children"
        );
        assert_eq!(describe(&json!({"error": true})), r#"{"error":true}"#);
    }

    #[test]
    fn test_open_applies_as_of_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgview-config.yaml");
        std::fs::write(&path, "backend:\n  base_url: http://localhost:5000/service\n").unwrap();

        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let session = Session::open(Some(path), Some(date), false).unwrap();

        assert_eq!(session.context().as_of().get(), date);
    }

    #[test]
    fn test_open_rejects_invalid_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgview-config.yaml");
        std::fs::write(&path, "backend:\n  base_url: ftp://example.org\n").unwrap();

        assert!(Session::open(Some(path), None, false).is_err());
    }
}
