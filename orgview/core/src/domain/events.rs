// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::log::WorkType;

/// Names under which store events cross module boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    EmployeeChanged,
    OrganisationChanged,
    OrganisationUnitChanged,
    UpdateTreeView,
}

impl EventName {
    pub const ALL: [EventName; 4] = [
        EventName::EmployeeChanged,
        EventName::OrganisationChanged,
        EventName::OrganisationUnitChanged,
        EventName::UpdateTreeView,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::EmployeeChanged => "employee-changed",
            EventName::OrganisationChanged => "organisation-changed",
            EventName::OrganisationUnitChanged => "organisation-unit-changed",
            EventName::UpdateTreeView => "update-tree-view",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that some entity changed on the backend and views holding
/// it should re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum StoreEvent {
    EmployeeChanged {
        employees: Vec<Uuid>,
        work: WorkType,
    },
    OrganisationChanged {
        organisation: Option<Uuid>,
    },
    OrganisationUnitChanged {
        units: Vec<Uuid>,
        work: WorkType,
    },
    UpdateTreeView {
        units: Vec<Uuid>,
    },
}

impl StoreEvent {
    pub fn name(&self) -> EventName {
        match self {
            StoreEvent::EmployeeChanged { .. } => EventName::EmployeeChanged,
            StoreEvent::OrganisationChanged { .. } => EventName::OrganisationChanged,
            StoreEvent::OrganisationUnitChanged { .. } => EventName::OrganisationUnitChanged,
            StoreEvent::UpdateTreeView { .. } => EventName::UpdateTreeView,
        }
    }
}
