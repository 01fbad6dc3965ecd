// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Namespace Registry
//!
//! Every store module owns a namespace, and every action, mutation and getter
//! it exposes is labelled `<namespace>/<verb>`. Verbs are closed Rust enums
//! implementing [`Verb`], so dispatch inside a module is a plain method call;
//! the generated string keys are only used as labels for log entries, tracing
//! fields and debug listings.
//!
//! The [`NamespaceRegistry`] hands out namespaces once per session and refuses
//! duplicates, which keeps generated keys unique process-wide.

use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Separator between a namespace and a verb in generated keys.
pub const KEY_SEPARATOR: char = '/';

/// A closed set of verb names belonging to one kind of module operation.
pub trait Verb: Copy + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Bare verb name, without the namespace prefix.
    fn name(&self) -> &'static str;
}

/// Mapping from bare verb to generated (or stripped) key.
pub type KeyMapping = BTreeMap<String, String>;

/// The three key tables generated for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    pub actions: KeyMapping,
    pub mutations: KeyMapping,
    pub getters: KeyMapping,
}

impl KeyMap {
    /// Every generated key across the three tables.
    pub fn all_keys(&self) -> impl Iterator<Item = &String> {
        self.actions
            .values()
            .chain(self.mutations.values())
            .chain(self.getters.values())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<namespace>/<verb>`
    pub fn key(&self, verb: &str) -> String {
        format!("{}{}{}", self.0, KEY_SEPARATOR, verb)
    }

    pub fn key_of<V: Verb>(&self, verb: V) -> String {
        self.key(verb.name())
    }

    /// Generate action, mutation and getter tables from bare verb names.
    pub fn keys(&self, actions: &[&str], mutations: &[&str], getters: &[&str]) -> KeyMap {
        KeyMap {
            actions: self.mapping(actions.iter().copied()),
            mutations: self.mapping(mutations.iter().copied()),
            getters: self.mapping(getters.iter().copied()),
        }
    }

    /// Generate the key tables from a module's verb enums.
    pub fn keys_for<A: Verb, M: Verb, G: Verb>(&self) -> KeyMap {
        KeyMap {
            actions: self.mapping(A::ALL.iter().map(Verb::name)),
            mutations: self.mapping(M::ALL.iter().map(Verb::name)),
            getters: self.mapping(G::ALL.iter().map(Verb::name)),
        }
    }

    fn mapping<'a>(&self, verbs: impl Iterator<Item = &'a str>) -> KeyMapping {
        verbs
            .map(|verb| (verb.to_string(), self.key(verb)))
            .collect()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inverse of [`Namespace::keys`]: map each verb back to its bare name by
/// removing `<prefix>/` from the generated key. Keys that do not carry the
/// prefix are returned unchanged.
pub fn strip_namespace(prefix: &str, mapping: &KeyMapping) -> KeyMapping {
    let prefix = format!("{}{}", prefix, KEY_SEPARATOR);
    mapping
        .iter()
        .map(|(verb, key)| {
            let bare = key.strip_prefix(prefix.as_str()).unwrap_or(key);
            (verb.clone(), bare.to_string())
        })
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("namespace '{0}' is already registered")]
    Duplicate(String),

    #[error("namespace name cannot be empty")]
    Empty,

    #[error("namespace '{0}' contains the reserved separator '/'")]
    InvalidCharacter(String),
}

/// Session-wide registry of namespaces in use.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    names: Mutex<BTreeSet<String>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) -> Result<Namespace, NamespaceError> {
        if name.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if name.contains(KEY_SEPARATOR) {
            return Err(NamespaceError::InvalidCharacter(name.to_string()));
        }

        let mut names = self.names.lock();
        if !names.insert(name.to_string()) {
            return Err(NamespaceError::Duplicate(name.to_string()));
        }

        tracing::debug!(namespace = name, "Registered store namespace");
        Ok(Namespace(name.to_string()))
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.lock().contains(name)
    }

    /// Registered namespaces in lexical order.
    pub fn registered(&self) -> Vec<String> {
        self.names.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, Copy)]
    enum Sample {
        Fetch,
        Reset,
    }

    impl Verb for Sample {
        const ALL: &'static [Self] = &[Sample::Fetch, Sample::Reset];

        fn name(&self) -> &'static str {
            match self {
                Sample::Fetch => "fetch",
                Sample::Reset => "reset",
            }
        }
    }

    #[test]
    fn test_keys_are_prefixed_per_table() {
        let registry = NamespaceRegistry::new();
        let ns = registry.register("employee").unwrap();

        let keys = ns.keys(&["fetch"], &["setRecord", "reset"], &["current"]);

        assert_eq!(keys.actions["fetch"], "employee/fetch");
        assert_eq!(keys.mutations["setRecord"], "employee/setRecord");
        assert_eq!(keys.mutations["reset"], "employee/reset");
        assert_eq!(keys.getters["current"], "employee/current");
    }

    #[test]
    fn test_distinct_namespaces_never_share_keys() {
        let registry = NamespaceRegistry::new();
        let verbs = ["fetch", "reset", "current"];
        let first = registry.register("employee").unwrap().keys(&verbs, &verbs, &verbs);
        let second = registry.register("organisationUnit").unwrap().keys(&verbs, &verbs, &verbs);

        let first_keys: HashSet<_> = first.all_keys().collect();
        let second_keys: HashSet<_> = second.all_keys().collect();

        assert!(first_keys.is_disjoint(&second_keys));
    }

    #[test]
    fn test_strip_inverts_generation() {
        let registry = NamespaceRegistry::new();
        let ns = registry.register("employeeMove").unwrap();
        let keys = ns.keys(&["submit", "updateField"], &[], &[]);

        let stripped = strip_namespace(ns.as_str(), &keys.actions);

        for (verb, bare) in &stripped {
            assert_eq!(verb, bare);
        }
        assert_eq!(stripped.len(), 2);
    }

    #[test]
    fn test_strip_leaves_foreign_keys_alone() {
        let mut mapping = KeyMapping::new();
        mapping.insert("fetch".to_string(), "other/fetch".to_string());

        let stripped = strip_namespace("employee", &mapping);
        assert_eq!(stripped["fetch"], "other/fetch");
    }

    #[test]
    fn test_typed_verbs_generate_keys() {
        let registry = NamespaceRegistry::new();
        let ns = registry.register("sample").unwrap();

        let keys = ns.keys_for::<Sample, Sample, Sample>();
        assert_eq!(keys.actions.len(), 2);
        assert_eq!(ns.key_of(Sample::Reset), "sample/reset");
    }

    #[test]
    fn test_registry_rejects_duplicates_and_bad_names() {
        let registry = NamespaceRegistry::new();
        registry.register("employee").unwrap();

        assert_eq!(
            registry.register("employee"),
            Err(NamespaceError::Duplicate("employee".to_string()))
        );
        assert_eq!(registry.register(""), Err(NamespaceError::Empty));
        assert!(matches!(
            registry.register("employee/move"),
            Err(NamespaceError::InvalidCharacter(_))
        ));
        assert_eq!(registry.registered(), vec!["employee".to_string()]);
    }
}
