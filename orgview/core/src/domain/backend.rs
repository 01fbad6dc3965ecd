// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Backend Interface
//!
//! The store never talks HTTP directly. Entity reads and workflow writes are
//! described as [`ReadRequest`] / [`WriteRequest`] values and handed to a
//! [`Backend`], implemented over `reqwest` in
//! `crate::infrastructure::http_backend` and by hand-written fakes in tests.
//!
//! | Request | Method | Path |
//! |---------|--------|------|
//! | entity detail | GET | `/<resource>/<id>/details/<detail>?validity=..&at=..` |
//! | configuration | GET | `/configuration` |
//! | details create / edit | POST | `/details/create`, `/details/edit` |
//! | terminate | POST | `/<resource>/<id>/terminate` |
//! | create entity | POST | `/<resource>/create` |

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::form_urlencoded;
use uuid::Uuid;

use crate::domain::as_of::DATE_FORMAT;
use crate::domain::entity::ValidityFilter;

/// A parameterised read against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl ReadRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// `GET /<resource>/<id>/details/<detail>?validity=<v>&at=<date>[&extras]`.
    /// Extras are appended after `at`, in the order given.
    pub fn entity_detail(
        resource: &str,
        id: Uuid,
        detail: &str,
        validity: ValidityFilter,
        at: NaiveDate,
        extras: &[(&str, &str)],
    ) -> Self {
        let request = Self::new(format!("/{}/{}/details/{}", resource, id, detail))
            .with_query("validity", validity.as_str())
            .with_query("at", at.format(DATE_FORMAT).to_string());

        extras
            .iter()
            .fold(request, |request, (key, value)| request.with_query(*key, *value))
    }

    pub fn configuration() -> Self {
        Self::new("/configuration")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

/// A write against the backend. The body is sent as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteRequest {
    path: String,
    body: Value,
}

impl WriteRequest {
    pub fn new(path: impl Into<String>, body: Value) -> Self {
        Self {
            path: path.into(),
            body,
        }
    }

    /// `POST /details/create` with an ordered batch of payloads.
    pub fn details_create(batch: Vec<Value>) -> Self {
        Self::new("/details/create", Value::Array(batch))
    }

    /// `POST /details/edit` with an ordered batch of payloads.
    pub fn details_edit(batch: Vec<Value>) -> Self {
        Self::new("/details/edit", Value::Array(batch))
    }

    /// `POST /<resource>/<id>/terminate` with `{validity: {to}}`.
    pub fn terminate(resource: &str, id: Uuid, to: Option<NaiveDate>) -> Self {
        Self::new(
            format!("/{}/{}/terminate", resource, id),
            json!({ "validity": { "to": to } }),
        )
    }

    /// `POST /<resource>/create`.
    pub fn create(resource: &str, body: Value) -> Self {
        Self::new(format!("/{}/create", resource), body)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Number of payloads carried by a batch body; 1 for object bodies.
    pub fn batch_len(&self) -> usize {
        match &self.body {
            Value::Array(items) => items.len(),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend answered HTTP {status}: {body}")]
    Status { status: u16, body: Value },

    #[error("backend rejected the request: {0}")]
    Rejected(Value),

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// A 2xx body that still signals a domain-level rejection: an object
    /// carrying an `error` field that is neither `null` nor `false`.
    pub fn rejection(body: &Value) -> Option<Self> {
        match body.get("error") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(_) => Some(BackendError::Rejected(body.clone())),
        }
    }

    /// Check a successful response for a domain-level rejection.
    pub fn check(body: Value) -> Result<Value, Self> {
        match Self::rejection(&body) {
            Some(err) => Err(err),
            None => Ok(body),
        }
    }

    /// Payload recorded in the error log and shown as the validation error.
    pub fn payload(&self) -> Value {
        match self {
            BackendError::Rejected(body) => body.clone(),
            BackendError::Status { status, body } => json!({
                "error": true,
                "status": status,
                "body": body,
            }),
            BackendError::Transport(message) => json!({
                "error": true,
                "error_key": "E_TRANSPORT",
                "description": message,
            }),
            BackendError::Decode(message) => json!({
                "error": true,
                "error_key": "E_DECODE",
                "description": message,
            }),
        }
    }
}

/// Transport collaborator behind every store module.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, request: ReadRequest) -> Result<Value, BackendError>;

    async fn post(&self, request: WriteRequest) -> Result<Value, BackendError>;
}
