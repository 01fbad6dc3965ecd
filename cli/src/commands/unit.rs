// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Organisation unit commands
//!
//! Commands: show, create, terminate

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;
use uuid::Uuid;

use orgview_core::domain::workflow::{CreateOrganisationUnit, TerminateOrganisationUnit};
use orgview_core::{Validity, ValidityFilter};

use super::{extras, print_yaml};
use crate::session::{parse_param, Session};

#[derive(Subcommand)]
pub enum UnitCommand {
    /// Show an organisation unit as of the session date
    Show {
        #[arg(value_name = "UNIT_ID")]
        id: Uuid,

        /// Validity window (past, present, future)
        #[arg(long, default_value = "present")]
        validity: ValidityFilter,

        /// Extra query parameter (key=value), repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Create an organisation unit
    Create {
        #[arg(value_name = "NAME")]
        name: String,

        /// Parent unit UUID
        #[arg(long, value_name = "UUID")]
        parent: Uuid,

        /// Unit type facet UUID
        #[arg(long, value_name = "UUID")]
        unit_type: Uuid,

        #[arg(long, value_name = "DATE")]
        from: NaiveDate,

        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,

        /// Short user-facing key
        #[arg(long)]
        user_key: Option<String>,
    },

    /// Terminate an organisation unit
    Terminate {
        #[arg(value_name = "UNIT_ID")]
        id: Uuid,

        /// Last day the unit is active
        #[arg(long, value_name = "DATE")]
        to: NaiveDate,
    },
}

pub async fn handle_command(command: UnitCommand, session: &Session) -> Result<()> {
    match command {
        UnitCommand::Show {
            id,
            validity,
            params,
        } => {
            let store = session.context().org_unit_store()?;
            let record = store
                .fetch(id, validity, &extras(&params))
                .await
                .with_context(|| format!("Failed to fetch organisation unit {}", id))?;

            println!(
                "{}",
                format!(
                    "Organisation unit {} ({} as of {})",
                    id,
                    validity,
                    session.context().as_of().get()
                )
                .bold()
            );
            print_yaml(&record)
        }
        UnitCommand::Create {
            name,
            parent,
            unit_type,
            from,
            to,
            user_key,
        } => {
            let mut fields = vec![
                ("name", json!(name)),
                ("parent", json!(parent)),
                ("org_unit_type", json!(unit_type)),
                ("validity", json!(Validity { from: Some(from), to })),
            ];
            if let Some(user_key) = user_key {
                fields.push(("user_key", json!(user_key)));
            }
            let response = session.submit::<CreateOrganisationUnit>(fields).await?;
            println!("{}", format!("✓ Organisation unit created: {}", response).green());
            Ok(())
        }
        UnitCommand::Terminate { id, to } => {
            session
                .submit::<TerminateOrganisationUnit>(vec![
                    ("uuid", json!(id)),
                    ("validity", json!(Validity::until(to))),
                ])
                .await?;
            println!(
                "{}",
                format!("✓ Organisation unit {} terminated as of {}", id, to).green()
            );
            Ok(())
        }
    }
}
