// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Workflow Submission Module
//!
//! Holds the pending draft of one workflow (move, leave, terminate, create),
//! submits it as a single backend write and reports the outcome.
//!
//! ```text
//! Empty ──update_field──▶ Editing ──submit──▶ Submitting ──▶ Succeeded
//!   ▲                                              │
//!   └──────────── reset_fields ◀── Failed ◀────────┘
//! ```
//!
//! On success the module appends one `Work` entry, publishes one event,
//! clears the draft and the backend validation error. On failure it appends
//! one `Error` entry, keeps the draft so it can be corrected, and exposes the
//! backend payload through [`WorkflowModule::backend_validation_error`].
//! Every failure path releases the submission lock.
//!
//! `reset_fields` starts a new draft generation. A submission still in flight
//! from an earlier generation records its outcome in the log (and publishes
//! its event on success) but leaves the current draft and state untouched.
//!
//! The module performs no business-rule validation; the backend is the
//! authority. A draft that cannot be read as the workflow's request type is
//! reported as [`SubmitError::InvalidRequest`] and handled like any other
//! failed submission.

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::StoreModule;
use crate::domain::backend::{Backend, BackendError};
use crate::domain::entity::{get_path, set_path};
use crate::domain::log::LogEntry;
use crate::domain::namespace::{Namespace, Verb};
use crate::domain::workflow::{SubmissionState, Workflow};
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::work_log::WorkLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Submit,
}

impl Verb for WorkflowAction {
    const ALL: &'static [Self] = &[WorkflowAction::Submit];

    fn name(&self) -> &'static str {
        "submit"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowMutation {
    UpdateField,
    ResetFields,
    SetState,
    SetBackendValidationError,
}

impl Verb for WorkflowMutation {
    const ALL: &'static [Self] = &[
        WorkflowMutation::UpdateField,
        WorkflowMutation::ResetFields,
        WorkflowMutation::SetState,
        WorkflowMutation::SetBackendValidationError,
    ];

    fn name(&self) -> &'static str {
        match self {
            WorkflowMutation::UpdateField => "updateField",
            WorkflowMutation::ResetFields => "resetFields",
            WorkflowMutation::SetState => "setState",
            WorkflowMutation::SetBackendValidationError => "setBackendValidationError",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowGetter {
    State,
    Draft,
    Field,
    BackendValidationError,
}

impl Verb for WorkflowGetter {
    const ALL: &'static [Self] = &[
        WorkflowGetter::State,
        WorkflowGetter::Draft,
        WorkflowGetter::Field,
        WorkflowGetter::BackendValidationError,
    ];

    fn name(&self) -> &'static str {
        match self {
            WorkflowGetter::State => "state",
            WorkflowGetter::Draft => "draft",
            WorkflowGetter::Field => "field",
            WorkflowGetter::BackendValidationError => "backendValidationError",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("pending request is incomplete: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SubmitError {
    fn payload(&self) -> Value {
        match self {
            SubmitError::Backend(e) => e.payload(),
            other => json!({ "error": true, "description": other.to_string() }),
        }
    }
}

#[derive(Debug)]
struct WorkflowState {
    status: SubmissionState,
    draft: Map<String, Value>,
    backend_validation_error: Option<Value>,
    // Bumped by `reset_fields`; a submission only settles its own generation.
    generation: u64,
}

impl WorkflowState {
    fn initial<W: Workflow>(generation: u64) -> Self {
        Self {
            status: SubmissionState::Empty,
            draft: W::initial_draft(),
            backend_validation_error: None,
            generation,
        }
    }
}

pub struct WorkflowModule<W: Workflow> {
    namespace: Namespace,
    backend: Arc<dyn Backend>,
    bus: Arc<EventBus>,
    log: Arc<WorkLog>,
    state: Mutex<WorkflowState>,
    _workflow: PhantomData<fn() -> W>,
}

impl<W: Workflow> WorkflowModule<W> {
    pub fn new(
        namespace: Namespace,
        backend: Arc<dyn Backend>,
        bus: Arc<EventBus>,
        log: Arc<WorkLog>,
    ) -> Self {
        Self {
            namespace,
            backend,
            bus,
            log,
            state: Mutex::new(WorkflowState::initial::<W>(0)),
            _workflow: PhantomData,
        }
    }

    /// Set one field of the pending draft (dotted path). Rejected while a
    /// submission is in flight; any other state moves to `Editing`.
    pub fn update_field(&self, path: &str, value: Value) -> Result<(), SubmitError> {
        let mut state = self.state.lock();
        if state.status == SubmissionState::Submitting {
            return Err(SubmitError::InFlight);
        }
        set_path(&mut state.draft, path, value);
        state.status = SubmissionState::Editing;
        Ok(())
    }

    /// Submit the pending draft as one backend write.
    pub async fn submit(&self) -> Result<Value, SubmitError> {
        let key = self.namespace.key_of(WorkflowAction::Submit);

        let (parsed, generation) = {
            let mut state = self.state.lock();
            if state.status == SubmissionState::Submitting {
                return Err(SubmitError::InFlight);
            }
            let parsed = serde_json::from_value::<W::Request>(Value::Object(state.draft.clone()));
            if parsed.is_ok() {
                state.status = SubmissionState::Submitting;
            }
            (parsed, state.generation)
        };

        let request = match parsed {
            Ok(request) => request,
            Err(e) => {
                let err = SubmitError::InvalidRequest(e.to_string());
                return Err(self.fail(&key, generation, err));
            }
        };

        let write = W::write(&request);
        info!(key = %key, path = write.path(), payloads = write.batch_len(), "Submitting workflow");

        let response = match self.backend.post(write).await.and_then(BackendError::check) {
            Ok(response) => response,
            Err(e) => return Err(self.fail(&key, generation, e.into())),
        };

        let work = W::work_type(&request);
        let event = W::event(&request, &response);
        self.log.append(LogEntry::work(
            work,
            json!({ "request": request, "response": response }),
        ));

        {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.status = SubmissionState::Succeeded;
                state.draft = W::initial_draft();
                state.backend_validation_error = None;
            } else {
                debug!(key = %key, generation, "Draft was reset during submission");
            }
        }

        debug!(key = %key, work = %work, "Workflow succeeded");
        self.bus.publish(event);
        Ok(response)
    }

    /// Discard the draft and any validation error and return to `Empty`.
    pub fn reset_fields(&self) {
        let mut state = self.state.lock();
        if state.status == SubmissionState::Submitting {
            warn!(
                key = %self.namespace.key_of(WorkflowMutation::ResetFields),
                "Resetting while a submission is in flight"
            );
        }
        let next = state.generation + 1;
        *state = WorkflowState::initial::<W>(next);
    }

    pub fn state(&self) -> SubmissionState {
        self.state.lock().status
    }

    pub fn draft(&self) -> Map<String, Value> {
        self.state.lock().draft.clone()
    }

    pub fn field(&self, path: &str) -> Option<Value> {
        get_path(&self.state.lock().draft, path).cloned()
    }

    pub fn backend_validation_error(&self) -> Option<Value> {
        self.state.lock().backend_validation_error.clone()
    }

    fn fail(&self, key: &str, generation: u64, err: SubmitError) -> SubmitError {
        let payload = err.payload();
        {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.status = SubmissionState::Failed;
                state.backend_validation_error = Some(payload.clone());
            }
        }
        self.log.append(LogEntry::error(key, payload));
        err
    }
}

impl<W: Workflow> StoreModule for WorkflowModule<W> {
    type Action = WorkflowAction;
    type Mutation = WorkflowMutation;
    type Getter = WorkflowGetter;

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}
