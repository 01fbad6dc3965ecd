// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Employee commands
//!
//! Commands: show, details, terminate, move, leave, create

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;
use uuid::Uuid;

use orgview_core::domain::workflow::{
    CreateEmployee, EmployeeLeave, MoveEmployees, TerminateEmployee,
};
use orgview_core::{Validity, ValidityFilter};

use super::{extras, print_yaml};
use crate::session::{parse_param, Session};

#[derive(Subcommand)]
pub enum EmployeeCommand {
    /// Show an employee as of the session date
    Show {
        /// Employee UUID
        #[arg(value_name = "EMPLOYEE_ID")]
        id: Uuid,

        /// Validity window (past, present, future)
        #[arg(long, default_value = "present")]
        validity: ValidityFilter,

        /// Extra query parameter (key=value), repeatable
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Show one detail tab (engagement, address, leave, ...)
    Details {
        #[arg(value_name = "EMPLOYEE_ID")]
        id: Uuid,

        #[arg(value_name = "DETAIL")]
        detail: String,

        #[arg(long, default_value = "present")]
        validity: ValidityFilter,

        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Terminate an employee
    Terminate {
        #[arg(value_name = "EMPLOYEE_ID")]
        id: Uuid,

        /// Last day of employment
        #[arg(long, value_name = "DATE")]
        to: NaiveDate,
    },

    /// Move one or more engagements to another organisation unit
    Move {
        /// Engagement UUIDs
        #[arg(value_name = "ENGAGEMENT_ID", required = true, num_args = 1..)]
        subjects: Vec<Uuid>,

        /// Destination organisation unit
        #[arg(long, value_name = "UNIT_ID")]
        to_unit: Uuid,

        /// Date the move takes effect
        #[arg(long, value_name = "DATE")]
        from: NaiveDate,
    },

    /// Register a leave
    Leave {
        #[arg(value_name = "EMPLOYEE_ID")]
        person: Uuid,

        /// Leave type facet UUID
        #[arg(long, value_name = "UUID")]
        leave_type: Uuid,

        /// Engagement the leave applies to
        #[arg(long, value_name = "UUID")]
        engagement: Option<Uuid>,

        #[arg(long, value_name = "DATE")]
        from: NaiveDate,

        #[arg(long, value_name = "DATE")]
        to: Option<NaiveDate>,
    },

    /// Create an employee
    Create {
        /// Full name
        #[arg(value_name = "NAME")]
        name: String,

        /// Organisation UUID
        #[arg(long, value_name = "UUID")]
        org: Uuid,

        /// CPR number
        #[arg(long)]
        cpr_no: Option<String>,
    },
}

pub async fn handle_command(command: EmployeeCommand, session: &Session) -> Result<()> {
    match command {
        EmployeeCommand::Show {
            id,
            validity,
            params,
        } => show(session, id, validity, &params).await,
        EmployeeCommand::Details {
            id,
            detail,
            validity,
            params,
        } => details(session, id, &detail, validity, &params).await,
        EmployeeCommand::Terminate { id, to } => {
            session
                .submit::<TerminateEmployee>(vec![
                    ("uuid", json!(id)),
                    ("validity", json!(Validity::until(to))),
                ])
                .await?;
            println!("{}", format!("✓ Employee {} terminated as of {}", id, to).green());
            Ok(())
        }
        EmployeeCommand::Move {
            subjects,
            to_unit,
            from,
        } => {
            let count = subjects.len();
            session
                .submit::<MoveEmployees>(vec![
                    ("subjects", json!(subjects)),
                    ("org_unit", json!(to_unit)),
                    ("validity", json!(Validity::starting(from))),
                ])
                .await?;
            println!(
                "{}",
                format!("✓ {} engagement(s) moved to {}", count, to_unit).green()
            );
            Ok(())
        }
        EmployeeCommand::Leave {
            person,
            leave_type,
            engagement,
            from,
            to,
        } => {
            let validity = Validity {
                from: Some(from),
                to,
            };
            let mut fields = vec![
                ("person", json!(person)),
                ("leave_type", json!(leave_type)),
                ("validity", json!(validity)),
            ];
            if let Some(engagement) = engagement {
                fields.push(("engagement", json!(engagement)));
            }
            session.submit::<EmployeeLeave>(fields).await?;
            println!("{}", format!("✓ Leave registered for {}", person).green());
            Ok(())
        }
        EmployeeCommand::Create { name, org, cpr_no } => {
            let mut fields = vec![("name", json!(name)), ("org", json!(org))];
            if let Some(cpr_no) = cpr_no {
                fields.push(("cpr_no", json!(cpr_no)));
            }
            let response = session.submit::<CreateEmployee>(fields).await?;
            println!("{}", format!("✓ Employee created: {}", response).green());
            Ok(())
        }
    }
}

async fn show(
    session: &Session,
    id: Uuid,
    validity: ValidityFilter,
    params: &[(String, String)],
) -> Result<()> {
    let store = session.context().employee_store()?;
    let record = store
        .fetch(id, validity, &extras(params))
        .await
        .with_context(|| format!("Failed to fetch employee {}", id))?;

    println!(
        "{}",
        format!("Employee {} ({} as of {})", id, validity, session.context().as_of().get()).bold()
    );
    print_yaml(&record)
}

async fn details(
    session: &Session,
    id: Uuid,
    detail: &str,
    validity: ValidityFilter,
    params: &[(String, String)],
) -> Result<()> {
    let store = session.context().employee_store()?;
    let body = store
        .fetch_detail(id, detail, validity, &extras(params))
        .await
        .with_context(|| format!("Failed to fetch {} for employee {}", detail, id))?;

    if body.as_array().is_some_and(|items| items.is_empty()) {
        println!("{}", format!("No {} ({})", detail, validity).yellow());
        return Ok(());
    }
    print_yaml(&body)
}
