// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Entity records and the kinds of entity the store can hold.
//!
//! A record is an untyped field map as returned by the backend. Entity store
//! modules replace it wholesale on fetch and patch it field by field when a
//! form is edited, so the record keeps the backend's shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// A kind of entity addressable under `/<resource>/<id>/details/<detail>`.
pub trait EntityKind: Send + Sync + 'static {
    /// Store namespace for modules holding this kind.
    const NAMESPACE: &'static str;
    /// Resource path segment (`e`, `ou`, `o`).
    const RESOURCE: &'static str;
    /// Detail fetched by a plain `fetch`.
    const DETAIL: &'static str;
}

#[derive(Debug, Clone, Copy)]
pub struct Employee;

impl EntityKind for Employee {
    const NAMESPACE: &'static str = "employee";
    const RESOURCE: &'static str = "e";
    const DETAIL: &'static str = "employee";
}

#[derive(Debug, Clone, Copy)]
pub struct OrganisationUnit;

impl EntityKind for OrganisationUnit {
    const NAMESPACE: &'static str = "organisationUnit";
    const RESOURCE: &'static str = "ou";
    const DETAIL: &'static str = "org_unit";
}

#[derive(Debug, Clone, Copy)]
pub struct Organisation;

impl EntityKind for Organisation {
    const NAMESPACE: &'static str = "organisation";
    const RESOURCE: &'static str = "o";
    const DETAIL: &'static str = "organisation";
}

/// Which slice of an entity's history a read asks for, relative to the
/// as-of date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityFilter {
    Past,
    #[default]
    Present,
    Future,
}

impl ValidityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityFilter::Past => "past",
            ValidityFilter::Present => "present",
            ValidityFilter::Future => "future",
        }
    }
}

impl fmt::Display for ValidityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValidityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "past" => Ok(ValidityFilter::Past),
            "present" => Ok(ValidityFilter::Present),
            "future" => Ok(ValidityFilter::Future),
            other => Err(format!("unknown validity '{}', expected past|present|future", other)),
        }
    }
}

/// Temporal bounds of a fact. `None` means open-ended on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl Validity {
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            from: Some(date),
            to: None,
        }
    }

    pub fn until(date: NaiveDate) -> Self {
        Self {
            from: None,
            to: Some(date),
        }
    }

    /// Bounds are inclusive on both sides.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }
}

/// One domain object keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRecord(Map<String, Value>);

impl EntityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a record out of a backend response. Detail endpoints answer with a
    /// list; the first element is the record valid at the requested date.
    pub fn from_response(body: Value) -> Option<Self> {
        match body {
            Value::Object(map) => Some(Self(map)),
            Value::Array(items) => match items.into_iter().next() {
                Some(Value::Object(map)) => Some(Self(map)),
                None => Some(Self::default()),
                Some(_) => None,
            },
            _ => None,
        }
    }

    pub fn uuid(&self) -> Option<Uuid> {
        self.0
            .get("uuid")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    pub fn validity(&self) -> Option<Validity> {
        self.0
            .get("validity")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.0, path)
    }

    pub fn set(&mut self, path: &str, value: Value) {
        set_path(&mut self.0, path, value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for EntityRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Look up a dotted path (`validity.from`) inside a JSON object.
pub fn get_path<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    segments.try_fold(map.get(first)?, |current, segment| current.get(segment))
}

/// Write a value at a dotted path, creating intermediate objects. A
/// non-object value sitting on the path is replaced by an object.
pub fn set_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(inner) = child {
                set_path(inner, rest, value);
            }
        }
    }
}
