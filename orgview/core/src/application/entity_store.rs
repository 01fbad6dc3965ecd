// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Entity Store Module
//!
//! Holds one entity (employee, organisation unit, organisation) fetched as of
//! the session's observation date, plus the detail tabs fetched for it.
//!
//! - `fetch` reads the as-of date before its first suspension point, so the
//!   request carries the date current at call time.
//! - `patch_field` edits the in-memory record for form binding and never
//!   touches the backend.
//! - A failed fetch keeps the previous record, records the error in the work
//!   log and returns it to the caller.
//!
//! Overlapping fetches are applied in arrival order unless the module was
//! built with [`FetchPolicy::DiscardStale`].

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::StoreModule;
use crate::domain::as_of::AsOfDate;
use crate::domain::backend::{Backend, BackendError, ReadRequest};
use crate::domain::config::FetchPolicy;
use crate::domain::entity::{EntityKind, EntityRecord, ValidityFilter};
use crate::domain::log::LogEntry;
use crate::domain::namespace::{Namespace, Verb};
use crate::infrastructure::work_log::WorkLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityAction {
    Fetch,
    FetchDetail,
}

impl Verb for EntityAction {
    const ALL: &'static [Self] = &[EntityAction::Fetch, EntityAction::FetchDetail];

    fn name(&self) -> &'static str {
        match self {
            EntityAction::Fetch => "fetch",
            EntityAction::FetchDetail => "fetchDetail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityMutation {
    SetRecord,
    SetDetail,
    PatchField,
    Reset,
}

impl Verb for EntityMutation {
    const ALL: &'static [Self] = &[
        EntityMutation::SetRecord,
        EntityMutation::SetDetail,
        EntityMutation::PatchField,
        EntityMutation::Reset,
    ];

    fn name(&self) -> &'static str {
        match self {
            EntityMutation::SetRecord => "setRecord",
            EntityMutation::SetDetail => "setDetail",
            EntityMutation::PatchField => "patchField",
            EntityMutation::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityGetter {
    Current,
    Detail,
    IsLoading,
    LastError,
}

impl Verb for EntityGetter {
    const ALL: &'static [Self] = &[
        EntityGetter::Current,
        EntityGetter::Detail,
        EntityGetter::IsLoading,
        EntityGetter::LastError,
    ];

    fn name(&self) -> &'static str {
        match self {
            EntityGetter::Current => "current",
            EntityGetter::Detail => "detail",
            EntityGetter::IsLoading => "isLoading",
            EntityGetter::LastError => "lastError",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("unexpected response shape for {0}")]
    UnexpectedShape(String),

    #[error("response superseded by a newer fetch")]
    Superseded,
}

impl FetchError {
    pub fn payload(&self) -> Value {
        match self {
            FetchError::Backend(e) => e.payload(),
            other => json!({ "error": true, "description": other.to_string() }),
        }
    }
}

#[derive(Debug, Default)]
struct EntityState {
    record: EntityRecord,
    details: BTreeMap<(String, ValidityFilter), Value>,
    in_flight: usize,
    last_error: Option<FetchError>,
    // Fetch fencing: ticket of the last issued and last applied record fetch.
    issued: u64,
    applied: u64,
}

pub struct EntityStore<K: EntityKind> {
    namespace: Namespace,
    as_of: Arc<AsOfDate>,
    backend: Arc<dyn Backend>,
    log: Arc<WorkLog>,
    policy: FetchPolicy,
    state: Mutex<EntityState>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> EntityStore<K> {
    pub fn new(
        namespace: Namespace,
        as_of: Arc<AsOfDate>,
        backend: Arc<dyn Backend>,
        log: Arc<WorkLog>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            namespace,
            as_of,
            backend,
            log,
            policy,
            state: Mutex::new(EntityState::default()),
            _kind: PhantomData,
        }
    }

    /// Fetch the entity's default detail and replace the held record.
    pub async fn fetch(
        &self,
        id: Uuid,
        validity: ValidityFilter,
        extras: &[(&str, &str)],
    ) -> Result<EntityRecord, FetchError> {
        let at = self.as_of.get();
        let request = ReadRequest::entity_detail(K::RESOURCE, id, K::DETAIL, validity, at, extras);
        let key = self.namespace.key_of(EntityAction::Fetch);
        let ticket = self.begin();
        debug!(key = %key, ticket, "GET {}", request.path_and_query());

        let outcome = self
            .backend
            .get(request)
            .await
            .and_then(BackendError::check)
            .map_err(FetchError::from)
            .and_then(|body| {
                EntityRecord::from_response(body)
                    .ok_or_else(|| FetchError::UnexpectedShape(key.clone()))
            });

        let mut state = self.state.lock();
        if self.is_stale(ticket, state.applied) {
            state.in_flight = state.in_flight.saturating_sub(1);
            debug!(key = %key, ticket, applied = state.applied, "Discarding stale response");
            return Err(FetchError::Superseded);
        }

        let record = match outcome {
            Ok(record) => record,
            Err(err) => {
                drop(state);
                return Err(self.fail(&key, err));
            }
        };

        state.in_flight = state.in_flight.saturating_sub(1);
        state.applied = ticket;
        state.record = record.clone();
        state.last_error = None;
        Ok(record)
    }

    /// Fetch a detail tab (`engagement`, `address`, `leave`, ...) of an
    /// entity and keep it under `(detail, validity)`.
    pub async fn fetch_detail(
        &self,
        id: Uuid,
        detail: &str,
        validity: ValidityFilter,
        extras: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let at = self.as_of.get();
        let request = ReadRequest::entity_detail(K::RESOURCE, id, detail, validity, at, extras);
        let key = self.namespace.key_of(EntityAction::FetchDetail);
        self.begin();
        debug!(key = %key, "GET {}", request.path_and_query());

        let body = match self.backend.get(request).await.and_then(BackendError::check) {
            Ok(body) => body,
            Err(err) => return Err(self.fail(&key, err.into())),
        };

        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.details.insert((detail.to_string(), validity), body.clone());
        state.last_error = None;
        Ok(body)
    }

    /// Update one field of the held record without refetching.
    pub fn patch_field(&self, path: &str, value: Value) {
        debug!(key = %self.namespace.key_of(EntityMutation::PatchField), path, "Patching field");
        self.state.lock().record.set(path, value);
    }

    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.record = EntityRecord::default();
        state.details.clear();
        state.last_error = None;
    }

    pub fn current(&self) -> EntityRecord {
        self.state.lock().record.clone()
    }

    pub fn detail(&self, detail: &str, validity: ValidityFilter) -> Option<Value> {
        self.state
            .lock()
            .details
            .get(&(detail.to_string(), validity))
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.state.lock().last_error.clone()
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// Under `DiscardStale`, any outcome older than the newest applied
    /// record is dropped, failures included.
    fn is_stale(&self, ticket: u64, applied: u64) -> bool {
        self.policy == FetchPolicy::DiscardStale && ticket < applied
    }

    fn begin(&self) -> u64 {
        let mut state = self.state.lock();
        state.in_flight += 1;
        state.issued += 1;
        state.issued
    }

    fn fail(&self, key: &str, err: FetchError) -> FetchError {
        {
            let mut state = self.state.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.last_error = Some(err.clone());
        }
        self.log.append(LogEntry::error(key, err.payload()));
        err
    }
}

impl<K: EntityKind> StoreModule for EntityStore<K> {
    type Action = EntityAction;
    type Mutation = EntityMutation;
    type Getter = EntityGetter;

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}
