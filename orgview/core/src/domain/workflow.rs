// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Workflows
//!
//! A workflow is a user-initiated, multi-field write submitted as one backend
//! call. Each workflow declares the typed request its draft deserializes
//! into, how that request becomes a [`WriteRequest`], the work type recorded
//! on success, and the event published afterwards.
//!
//! | Workflow | Endpoint | Work type | Event |
//! |----------|----------|-----------|-------|
//! | [`MoveEmployees`] | `POST /details/edit` | `EMPLOYEE_MOVE` / `EMPLOYEE_MOVE_MANY` | `employee-changed` |
//! | [`EmployeeLeave`] | `POST /details/create` | `EMPLOYEE_LEAVE` | `employee-changed` |
//! | [`TerminateEmployee`] | `POST /e/<id>/terminate` | `EMPLOYEE_TERMINATE` | `employee-changed` |
//! | [`TerminateOrganisationUnit`] | `POST /ou/<id>/terminate` | `ORGANISATION_TERMINATE` | `organisation-unit-changed` |
//! | [`CreateEmployee`] | `POST /e/create` | `EMPLOYEE_CREATE` | `employee-changed` |
//! | [`CreateOrganisationUnit`] | `POST /ou/create` | `ORGANISATION_CREATE` | `organisation-unit-changed` |

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::domain::backend::WriteRequest;
use crate::domain::entity::{Employee, EntityKind, OrganisationUnit, Validity};
use crate::domain::events::StoreEvent;
use crate::domain::log::WorkType;

/// Lifecycle of a workflow submission module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    #[default]
    Empty,
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

pub trait Workflow: Send + Sync + 'static {
    /// Store namespace of the submission module.
    const NAMESPACE: &'static str;

    type Request: DeserializeOwned + Serialize + Send + Sync;

    /// Shape of the draft right after load or reset.
    fn initial_draft() -> Map<String, Value> {
        Map::new()
    }

    fn write(request: &Self::Request) -> WriteRequest;

    fn work_type(request: &Self::Request) -> WorkType;

    /// Event published after the backend accepted the write.
    fn event(request: &Self::Request, response: &Value) -> StoreEvent;
}

fn uuid_ref(id: Uuid) -> Value {
    json!({ "uuid": id })
}

/// Identifiers the backend returns from a create: either a bare uuid string
/// or a list of them.
fn created_ids(response: &Value) -> Vec<Uuid> {
    match response {
        Value::String(s) => Uuid::parse_str(s).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|s| Uuid::parse_str(s).ok())
            .collect(),
        Value::Object(map) => map
            .get("uuid")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

// ============================================================================
// Move
// ============================================================================

/// Move one or more engagements to another organisation unit. Each subject
/// becomes its own edit payload; all share destination and validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub subjects: Vec<Uuid>,
    pub org_unit: Uuid,
    pub validity: Validity,
}

pub struct MoveEmployees;

impl Workflow for MoveEmployees {
    const NAMESPACE: &'static str = "employeeMove";

    type Request = MoveRequest;

    fn initial_draft() -> Map<String, Value> {
        let mut draft = Map::new();
        draft.insert("subjects".to_string(), Value::Array(Vec::new()));
        draft
    }

    fn write(request: &MoveRequest) -> WriteRequest {
        let batch = request
            .subjects
            .iter()
            .map(|subject| {
                json!({
                    "type": "engagement",
                    "uuid": subject,
                    "data": {
                        "org_unit": request.org_unit,
                        "validity": request.validity,
                    },
                })
            })
            .collect();
        WriteRequest::details_edit(batch)
    }

    fn work_type(request: &MoveRequest) -> WorkType {
        if request.subjects.len() > 1 {
            WorkType::EmployeeMoveMany
        } else {
            WorkType::EmployeeMove
        }
    }

    fn event(request: &MoveRequest, _response: &Value) -> StoreEvent {
        StoreEvent::EmployeeChanged {
            employees: request.subjects.clone(),
            work: Self::work_type(request),
        }
    }
}

// ============================================================================
// Leave
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub person: Uuid,
    pub leave_type: Uuid,
    #[serde(default)]
    pub engagement: Option<Uuid>,
    pub validity: Validity,
}

pub struct EmployeeLeave;

impl Workflow for EmployeeLeave {
    const NAMESPACE: &'static str = "employeeLeave";

    type Request = LeaveRequest;

    fn write(request: &LeaveRequest) -> WriteRequest {
        let mut payload = json!({
            "type": "leave",
            "person": uuid_ref(request.person),
            "leave_type": uuid_ref(request.leave_type),
            "validity": request.validity,
        });
        if let Some(engagement) = request.engagement {
            payload["engagement"] = uuid_ref(engagement);
        }
        WriteRequest::details_create(vec![payload])
    }

    fn work_type(_request: &LeaveRequest) -> WorkType {
        WorkType::EmployeeLeave
    }

    fn event(request: &LeaveRequest, _response: &Value) -> StoreEvent {
        StoreEvent::EmployeeChanged {
            employees: vec![request.person],
            work: WorkType::EmployeeLeave,
        }
    }
}

// ============================================================================
// Terminate
// ============================================================================

/// End an entity's validity. Only `validity.to` is sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminateRequest {
    pub uuid: Uuid,
    pub validity: Validity,
}

pub struct TerminateEmployee;

impl Workflow for TerminateEmployee {
    const NAMESPACE: &'static str = "employeeTerminate";

    type Request = TerminateRequest;

    fn write(request: &TerminateRequest) -> WriteRequest {
        WriteRequest::terminate(Employee::RESOURCE, request.uuid, request.validity.to)
    }

    fn work_type(_request: &TerminateRequest) -> WorkType {
        WorkType::EmployeeTerminate
    }

    fn event(request: &TerminateRequest, _response: &Value) -> StoreEvent {
        StoreEvent::EmployeeChanged {
            employees: vec![request.uuid],
            work: WorkType::EmployeeTerminate,
        }
    }
}

pub struct TerminateOrganisationUnit;

impl Workflow for TerminateOrganisationUnit {
    const NAMESPACE: &'static str = "organisationUnitTerminate";

    type Request = TerminateRequest;

    fn write(request: &TerminateRequest) -> WriteRequest {
        WriteRequest::terminate(OrganisationUnit::RESOURCE, request.uuid, request.validity.to)
    }

    fn work_type(_request: &TerminateRequest) -> WorkType {
        WorkType::OrganisationTerminate
    }

    fn event(request: &TerminateRequest, _response: &Value) -> StoreEvent {
        StoreEvent::OrganisationUnitChanged {
            units: vec![request.uuid],
            work: WorkType::OrganisationTerminate,
        }
    }
}

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    #[serde(default)]
    pub cpr_no: Option<String>,
    pub org: Uuid,
    #[serde(default)]
    pub details: Vec<Value>,
}

pub struct CreateEmployee;

impl Workflow for CreateEmployee {
    const NAMESPACE: &'static str = "employeeCreate";

    type Request = CreateEmployeeRequest;

    fn initial_draft() -> Map<String, Value> {
        let mut draft = Map::new();
        draft.insert("details".to_string(), Value::Array(Vec::new()));
        draft
    }

    fn write(request: &CreateEmployeeRequest) -> WriteRequest {
        let mut body = json!({
            "name": request.name,
            "org": uuid_ref(request.org),
            "details": request.details,
        });
        if let Some(cpr_no) = &request.cpr_no {
            body["cpr_no"] = json!(cpr_no);
        }
        WriteRequest::create(Employee::RESOURCE, body)
    }

    fn work_type(_request: &CreateEmployeeRequest) -> WorkType {
        WorkType::EmployeeCreate
    }

    fn event(_request: &CreateEmployeeRequest, response: &Value) -> StoreEvent {
        StoreEvent::EmployeeChanged {
            employees: created_ids(response),
            work: WorkType::EmployeeCreate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrganisationUnitRequest {
    pub name: String,
    #[serde(default)]
    pub user_key: Option<String>,
    pub parent: Uuid,
    pub org_unit_type: Uuid,
    pub validity: Validity,
    #[serde(default)]
    pub details: Vec<Value>,
}

pub struct CreateOrganisationUnit;

impl Workflow for CreateOrganisationUnit {
    const NAMESPACE: &'static str = "organisationUnitCreate";

    type Request = CreateOrganisationUnitRequest;

    fn initial_draft() -> Map<String, Value> {
        let mut draft = Map::new();
        draft.insert("details".to_string(), Value::Array(Vec::new()));
        draft
    }

    fn write(request: &CreateOrganisationUnitRequest) -> WriteRequest {
        let mut body = json!({
            "name": request.name,
            "parent": uuid_ref(request.parent),
            "org_unit_type": uuid_ref(request.org_unit_type),
            "validity": request.validity,
            "details": request.details,
        });
        if let Some(user_key) = &request.user_key {
            body["user_key"] = json!(user_key);
        }
        WriteRequest::create(OrganisationUnit::RESOURCE, body)
    }

    fn work_type(_request: &CreateOrganisationUnitRequest) -> WorkType {
        WorkType::OrganisationCreate
    }

    fn event(request: &CreateOrganisationUnitRequest, response: &Value) -> StoreEvent {
        let mut units = created_ids(response);
        units.push(request.parent);
        StoreEvent::OrganisationUnitChanged {
            units,
            work: WorkType::OrganisationCreate,
        }
    }
}
