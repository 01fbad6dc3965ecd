// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Store Context
//!
//! Composition root for a session. Created once at start-up, it owns the
//! pieces every module shares (namespace registry, as-of date, event bus,
//! work log and backend) and builds modules with those pieces injected.
//! Dropping the context and its modules ends the session.
//!
//! Each module registers its namespace on construction, so building the
//! same module twice in one session fails with
//! [`NamespaceError::Duplicate`].

use std::sync::Arc;
use tracing::info;

use crate::application::configuration::{ConfigurationStore, CONFIGURATION_NAMESPACE};
use crate::application::entity_store::EntityStore;
use crate::application::workflow_module::WorkflowModule;
use crate::domain::as_of::AsOfDate;
use crate::domain::backend::{Backend, BackendError};
use crate::domain::config::{StoreConfig, StoreSettings};
use crate::domain::entity::{Employee, EntityKind, Organisation, OrganisationUnit};
use crate::domain::namespace::{NamespaceError, NamespaceRegistry};
use crate::domain::workflow::Workflow;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::http_backend::HttpBackend;
use crate::infrastructure::work_log::WorkLog;

pub struct StoreContext {
    registry: NamespaceRegistry,
    as_of: Arc<AsOfDate>,
    bus: Arc<EventBus>,
    log: Arc<WorkLog>,
    backend: Arc<dyn Backend>,
    settings: StoreSettings,
}

impl StoreContext {
    /// Context with default settings over the given backend.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_settings(backend, StoreSettings::default())
    }

    pub fn with_settings(backend: Arc<dyn Backend>, settings: StoreSettings) -> Self {
        let bus = Arc::new(EventBus::new(settings.event_capacity));
        let log = Arc::new(WorkLog::new());
        if settings.journal_events {
            log.journal_events(&bus);
        }

        Self {
            registry: NamespaceRegistry::new(),
            as_of: Arc::new(AsOfDate::today()),
            bus,
            log,
            backend,
            settings,
        }
    }

    /// Context over an [`HttpBackend`] built from the configuration file.
    pub fn from_config(config: &StoreConfig) -> Result<Self, BackendError> {
        let backend = HttpBackend::from_config(&config.backend)?;
        info!(
            base_url = backend.base_url(),
            fetch_policy = ?config.store.fetch_policy,
            "Store context created"
        );
        Ok(Self::with_settings(Arc::new(backend), config.store.clone()))
    }

    pub fn as_of(&self) -> &Arc<AsOfDate> {
        &self.as_of
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn log(&self) -> &Arc<WorkLog> {
        &self.log
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub fn entity_store<K: EntityKind>(&self) -> Result<EntityStore<K>, NamespaceError> {
        let namespace = self.registry.register(K::NAMESPACE)?;
        Ok(EntityStore::new(
            namespace,
            Arc::clone(&self.as_of),
            Arc::clone(&self.backend),
            Arc::clone(&self.log),
            self.settings.fetch_policy,
        ))
    }

    pub fn employee_store(&self) -> Result<EntityStore<Employee>, NamespaceError> {
        self.entity_store::<Employee>()
    }

    pub fn org_unit_store(&self) -> Result<EntityStore<OrganisationUnit>, NamespaceError> {
        self.entity_store::<OrganisationUnit>()
    }

    pub fn organisation_store(&self) -> Result<EntityStore<Organisation>, NamespaceError> {
        self.entity_store::<Organisation>()
    }

    pub fn configuration_store(&self) -> Result<ConfigurationStore, NamespaceError> {
        let namespace = self.registry.register(CONFIGURATION_NAMESPACE)?;
        Ok(ConfigurationStore::new(
            namespace,
            Arc::clone(&self.backend),
            Arc::clone(&self.log),
        ))
    }

    pub fn workflow<W: Workflow>(&self) -> Result<WorkflowModule<W>, NamespaceError> {
        let namespace = self.registry.register(W::NAMESPACE)?;
        Ok(WorkflowModule::new(
            namespace,
            Arc::clone(&self.backend),
            Arc::clone(&self.bus),
            Arc::clone(&self.log),
        ))
    }
}
