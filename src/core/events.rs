//! Catalog and repository events.
//!
//! Store and repository mutations are announced as immutable events through
//! an explicit observer interface. A slow or failing subscriber must never
//! abort the mutation that triggered it: the bus catches subscriber errors
//! and logs them.

use crate::core::catalog::{EdgeKind, TechCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new unique event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event kind, used for filtered subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NodeAdded,
    EdgeAdded,
    PathAdded,
    PathSynthesized,
    ProgressUpdated,
    NodeCompleted,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeAdded => write!(f, "node.added"),
            Self::EdgeAdded => write!(f, "edge.added"),
            Self::PathAdded => write!(f, "path.added"),
            Self::PathSynthesized => write!(f, "path.synthesized"),
            Self::ProgressUpdated => write!(f, "progress.updated"),
            Self::NodeCompleted => write!(f, "node.completed"),
        }
    }
}

/// Event payload data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// A technology node was registered in the catalog.
    NodeAdded {
        node_id: Uuid,
        label: String,
        category: TechCategory,
    },
    /// A relationship edge was inserted.
    EdgeAdded {
        edge_id: Uuid,
        source: Uuid,
        target: Uuid,
        edge_kind: EdgeKind,
    },
    /// A learning path was stored in the repository.
    PathAdded { path_id: Uuid, title: String },
    /// A learning path was synthesized from skill gaps.
    PathSynthesized {
        path_id: Uuid,
        node_count: usize,
        total_hours: u32,
    },
    /// A user's progress on a path changed.
    ProgressUpdated {
        user_id: String,
        path_id: Uuid,
        percent: f64,
    },
    /// A user completed one learning node of a path.
    NodeCompleted {
        user_id: String,
        path_id: Uuid,
        node_id: Uuid,
    },
}

impl EventPayload {
    /// Returns the kind of this payload.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NodeAdded { .. } => EventKind::NodeAdded,
            Self::EdgeAdded { .. } => EventKind::EdgeAdded,
            Self::PathAdded { .. } => EventKind::PathAdded,
            Self::PathSynthesized { .. } => EventKind::PathSynthesized,
            Self::ProgressUpdated { .. } => EventKind::ProgressUpdated,
            Self::NodeCompleted { .. } => EventKind::NodeCompleted,
        }
    }
}

/// An immutable event with identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEvent {
    /// Unique event ID.
    pub id: EventId,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
    /// Event data.
    pub payload: EventPayload,
}

impl GraphEvent {
    /// Creates a new event with a fresh ID and the current timestamp.
    #[must_use]
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Returns the event's kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

/// Errors a subscriber may surface to the bus.
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Handler error: {0}")]
    Handler(String),
}

/// Observer interface for catalog and repository events.
pub trait EventSubscriber: Send + Sync {
    /// Handles one event. Errors are caught and logged by the bus.
    ///
    /// # Errors
    /// Implementations may fail; the failure never reaches the mutation
    /// that emitted the event.
    fn on_event(&self, event: &GraphEvent) -> std::result::Result<(), SubscriberError>;
}

struct Subscription {
    filter: Option<EventKind>,
    subscriber: Arc<dyn EventSubscriber>,
}

/// Synchronous, in-process event bus.
///
/// Shared as `Arc<EventBus>` between the store, the repository, and the
/// host. Emission is synchronous; dispatch order is subscription order.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber, optionally restricted to one event kind.
    pub fn subscribe(&self, filter: Option<EventKind>, subscriber: Arc<dyn EventSubscriber>) {
        let mut subscriptions = self.subscriptions.write().expect("lock poisoned");
        subscriptions.push(Subscription { filter, subscriber });
    }

    /// Emits an event to every matching subscriber.
    ///
    /// Subscriber failures are logged at warn level and swallowed.
    pub fn emit(&self, payload: EventPayload) {
        let event = GraphEvent::new(payload);
        let subscriptions = self.subscriptions.read().expect("lock poisoned");
        for subscription in subscriptions.iter() {
            if subscription
                .filter
                .is_some_and(|kind| kind != event.kind())
            {
                continue;
            }
            if let Err(e) = subscription.subscriber.on_event(&event) {
                tracing::warn!(kind = %event.kind(), error = %e, "event subscriber failed");
            }
        }
    }
}

/// In-memory event log subscriber.
///
/// Retains every received event in order. Useful for tests and for hosts
/// that want an audit trail without an external sink.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<GraphEvent>>,
}

impl InMemoryEventLog {
    /// Creates a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all received events in order.
    #[must_use]
    pub fn events(&self) -> Vec<GraphEvent> {
        self.events.read().expect("lock poisoned").clone()
    }

    /// Returns the number of received events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().expect("lock poisoned").len()
    }

    /// Returns true if no events were received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSubscriber for InMemoryEventLog {
    fn on_event(&self, event: &GraphEvent) -> std::result::Result<(), SubscriberError> {
        self.events.write().expect("lock poisoned").push(event.clone());
        Ok(())
    }
}
