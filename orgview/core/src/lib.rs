// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! orgview core
//!
//! Client-side store for organisation and employee administration: entity
//! modules read "as of" a session-wide date, workflow modules submit batched
//! writes, and an event bus plus a work log tie them together.
//!
//! # Architecture
//!
//! - **domain:** pure types and the backend seam
//! - **application:** store modules and the `StoreContext` composition root
//! - **infrastructure:** event bus, work log, HTTP backend

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::configuration::ConfigurationStore;
pub use application::context::StoreContext;
pub use application::entity_store::{EntityStore, FetchError};
pub use application::workflow_module::{SubmitError, WorkflowModule};
pub use application::StoreModule;
pub use domain::as_of::AsOfDate;
pub use domain::backend::{Backend, BackendError, ReadRequest, WriteRequest};
pub use domain::config::{FetchPolicy, StoreConfig};
pub use domain::entity::{EntityRecord, Validity, ValidityFilter};
pub use domain::events::{EventName, StoreEvent};
pub use domain::log::{LogEntry, LogKind, WorkType};
pub use domain::workflow::SubmissionState;
pub use infrastructure::event_bus::EventBus;
pub use infrastructure::http_backend::HttpBackend;
pub use infrastructure::work_log::WorkLog;
