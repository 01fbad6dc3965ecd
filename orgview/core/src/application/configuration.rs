// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration store module: the backend's opaque settings blob
//! (`GET /configuration`), kept alongside the entity stores.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::application::entity_store::FetchError;
use crate::application::StoreModule;
use crate::domain::backend::{Backend, BackendError, ReadRequest};
use crate::domain::log::LogEntry;
use crate::domain::namespace::{Namespace, Verb};
use crate::infrastructure::work_log::WorkLog;

pub const CONFIGURATION_NAMESPACE: &str = "configuration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationAction {
    Fetch,
}

impl Verb for ConfigurationAction {
    const ALL: &'static [Self] = &[ConfigurationAction::Fetch];

    fn name(&self) -> &'static str {
        "fetch"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationMutation {
    SetSettings,
    Reset,
}

impl Verb for ConfigurationMutation {
    const ALL: &'static [Self] = &[
        ConfigurationMutation::SetSettings,
        ConfigurationMutation::Reset,
    ];

    fn name(&self) -> &'static str {
        match self {
            ConfigurationMutation::SetSettings => "setSettings",
            ConfigurationMutation::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationGetter {
    Settings,
    Setting,
}

impl Verb for ConfigurationGetter {
    const ALL: &'static [Self] = &[ConfigurationGetter::Settings, ConfigurationGetter::Setting];

    fn name(&self) -> &'static str {
        match self {
            ConfigurationGetter::Settings => "settings",
            ConfigurationGetter::Setting => "setting",
        }
    }
}

#[derive(Debug, Default)]
struct ConfigurationState {
    settings: Map<String, Value>,
    last_error: Option<FetchError>,
}

pub struct ConfigurationStore {
    namespace: Namespace,
    backend: Arc<dyn Backend>,
    log: Arc<WorkLog>,
    state: Mutex<ConfigurationState>,
}

impl ConfigurationStore {
    pub fn new(namespace: Namespace, backend: Arc<dyn Backend>, log: Arc<WorkLog>) -> Self {
        Self {
            namespace,
            backend,
            log,
            state: Mutex::new(ConfigurationState::default()),
        }
    }

    pub async fn fetch(&self) -> Result<Map<String, Value>, FetchError> {
        let key = self.namespace.key_of(ConfigurationAction::Fetch);
        debug!(key = %key, "Fetching configuration");

        let outcome = self
            .backend
            .get(ReadRequest::configuration())
            .await
            .and_then(BackendError::check)
            .map_err(FetchError::from)
            .and_then(|body| match body {
                Value::Object(settings) => Ok(settings),
                _ => Err(FetchError::UnexpectedShape(key.clone())),
            });

        match outcome {
            Ok(settings) => {
                let mut state = self.state.lock();
                state.settings = settings.clone();
                state.last_error = None;
                Ok(settings)
            }
            Err(err) => {
                self.state.lock().last_error = Some(err.clone());
                self.log.append(LogEntry::error(key, err.payload()));
                Err(err)
            }
        }
    }

    pub fn settings(&self) -> Map<String, Value> {
        self.state.lock().settings.clone()
    }

    pub fn setting(&self, key: &str) -> Option<Value> {
        self.state.lock().settings.get(key).cloned()
    }

    pub fn last_error(&self) -> Option<FetchError> {
        self.state.lock().last_error.clone()
    }

    pub fn reset(&self) {
        *self.state.lock() = ConfigurationState::default();
    }
}

impl StoreModule for ConfigurationStore {
    type Action = ConfigurationAction;
    type Mutation = ConfigurationMutation;
    type Getter = ConfigurationGetter;

    fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}
