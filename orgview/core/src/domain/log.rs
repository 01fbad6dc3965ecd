// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::events::StoreEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Work,
    Event,
    Error,
}

/// Completed operation recorded by a successful workflow submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    EmployeeCreate,
    EmployeeMove,
    EmployeeMoveMany,
    EmployeeLeave,
    EmployeeTerminate,
    OrganisationCreate,
    OrganisationTerminate,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::EmployeeCreate => "EMPLOYEE_CREATE",
            WorkType::EmployeeMove => "EMPLOYEE_MOVE",
            WorkType::EmployeeMoveMany => "EMPLOYEE_MOVE_MANY",
            WorkType::EmployeeLeave => "EMPLOYEE_LEAVE",
            WorkType::EmployeeTerminate => "EMPLOYEE_TERMINATE",
            WorkType::OrganisationCreate => "ORGANISATION_CREATE",
            WorkType::OrganisationTerminate => "ORGANISATION_TERMINATE",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record in the session work/error log.
///
/// `tag` identifies what produced the entry: the work type for `Work`, the
/// event name for `Event`, and the failing module key (`employee/fetch`) for
/// `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    kind: LogKind,
    tag: String,
    payload: Value,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn work(work: WorkType, payload: Value) -> Self {
        Self::new(LogKind::Work, work.as_str(), payload)
    }

    pub fn event(event: &StoreEvent) -> Self {
        let payload = serde_json::to_value(event).unwrap_or(Value::Null);
        Self::new(LogKind::Event, event.name().as_str(), payload)
    }

    pub fn error(tag: impl Into<String>, payload: Value) -> Self {
        Self::new(LogKind::Error, tag, payload)
    }

    fn new(kind: LogKind, tag: impl Into<String>, payload: Value) -> Self {
        Self {
            kind,
            tag: tag.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> LogKind {
        self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
