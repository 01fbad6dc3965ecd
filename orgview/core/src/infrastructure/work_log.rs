// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Session work/error log.
//!
//! Append-only and unbounded for the lifetime of the session; entries are
//! never edited or removed. Error entries are mirrored to `tracing` at warn
//! level so they also reach the process log.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::events::EventName;
use crate::domain::log::{LogEntry, LogKind};
use crate::infrastructure::event_bus::{EventBus, SubscriptionId};

#[derive(Debug, Default)]
pub struct WorkLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl WorkLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, entry: LogEntry) {
        match entry.kind() {
            LogKind::Error => warn!(tag = entry.tag(), payload = %entry.payload(), "Store error"),
            LogKind::Work => debug!(tag = entry.tag(), "Work completed"),
            LogKind::Event => debug!(tag = entry.tag(), "Event recorded"),
        }
        self.entries.lock().push(entry);
    }

    /// Every entry in insertion order.
    pub fn all(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn of_kind(&self, kind: LogKind) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn works(&self) -> Vec<LogEntry> {
        self.of_kind(LogKind::Work)
    }

    pub fn errors(&self) -> Vec<LogEntry> {
        self.of_kind(LogKind::Error)
    }

    pub fn events(&self) -> Vec<LogEntry> {
        self.of_kind(LogKind::Event)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Record every event published on `bus` as an `Event` entry.
    pub fn journal_events(self: &Arc<Self>, bus: &EventBus) -> Vec<SubscriptionId> {
        EventName::ALL
            .iter()
            .map(|name| {
                let log = Arc::clone(self);
                bus.subscribe(*name, move |event| log.append(LogEntry::event(event)))
            })
            .collect()
    }
}
