// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Application Layer
//!
//! Store modules and the composition root that wires them together.
//!
//! | Module | Namespace | Holds |
//! |--------|-----------|-------|
//! | `EntityStore<Employee>` | `employee` | employee record + detail tabs |
//! | `EntityStore<OrganisationUnit>` | `organisationUnit` | unit record + detail tabs |
//! | `EntityStore<Organisation>` | `organisation` | organisation record |
//! | `ConfigurationStore` | `configuration` | backend settings blob |
//! | `WorkflowModule<W>` | `W::NAMESPACE` | pending workflow draft |

pub mod configuration;
pub mod context;
pub mod entity_store;
pub mod workflow_module;

use crate::domain::namespace::{KeyMap, Namespace, Verb};

/// A namespaced store module with a closed set of verbs.
pub trait StoreModule {
    type Action: Verb;
    type Mutation: Verb;
    type Getter: Verb;

    fn namespace(&self) -> &Namespace;

    /// Namespaced keys of every verb this module exposes.
    fn keys(&self) -> KeyMap {
        self.namespace()
            .keys_for::<Self::Action, Self::Mutation, Self::Getter>()
    }
}
