// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Event Bus Implementation - Pub/Sub for Store Events
//
// Two delivery paths share one publish call:
// - Handlers registered per event name run synchronously inside `publish`,
//   in subscription order.
// - Async receivers fed by a tokio broadcast channel, for consumers that
//   live in their own task.
//
// Nothing is buffered for absent subscribers; state is lost with the process.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::events::{EventName, StoreEvent};

type Handler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Token returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    name: EventName,
    handler: Handler,
}

/// Event bus for publishing and subscribing to store events
pub struct EventBus {
    subscriptions: Mutex<Vec<Subscription>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a new event bus; `capacity` bounds how many events an async
    /// receiver may fall behind before it lags.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            sender,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to every handler subscribed to its name, then to
    /// async receivers.
    pub fn publish(&self, event: StoreEvent) {
        let name = event.name();
        debug!("Publishing event: {}", name);

        // Snapshot first so handlers may subscribe or unsubscribe.
        let handlers: Vec<Handler> = self
            .subscriptions
            .lock()
            .iter()
            .filter(|s| s.name == name)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        for handler in &handlers {
            handler(&event);
        }

        let receiver_count = self.sender.send(event).unwrap_or(0);

        if handlers.is_empty() && receiver_count == 0 {
            debug!("No subscribers listening to {}", name);
        }
    }

    pub fn subscribe<F>(&self, name: EventName, handler: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.lock().push(Subscription {
            id,
            name,
            handler: Arc::new(handler),
        });
        id
    }

    /// Returns `false` when the token was unknown or already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.lock();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        subscriptions.len() != before
    }

    /// Number of handlers currently subscribed to `name`
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.subscriptions
            .lock()
            .iter()
            .filter(|s| s.name == name)
            .count()
    }

    /// Subscribe to all store events as an async stream
    pub fn subscribe_all(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to one event name as an async stream
    pub fn subscribe_named(&self, name: EventName) -> NamedEventReceiver {
        NamedEventReceiver {
            receiver: self.sender.subscribe(),
            name,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.subscriptions.lock().len())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

/// Receiver for all store events
pub struct EventReceiver {
    receiver: broadcast::Receiver<StoreEvent>,
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Result<StoreEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    /// Try to receive an event without waiting
    pub fn try_recv(&mut self) -> Result<StoreEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }
}

/// Receiver filtered to a single event name
pub struct NamedEventReceiver {
    receiver: broadcast::Receiver<StoreEvent>,
    name: EventName,
}

impl NamedEventReceiver {
    /// Receive the next event with the subscribed name, skipping others
    pub async fn recv(&mut self) -> Result<StoreEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if event.name() == self.name {
                return Ok(event);
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}
