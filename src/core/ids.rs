//! Injectable id generation.
//!
//! Node, edge, path, and learning-node ids all come from an [`IdGenerator`]
//! supplied by the host. Production wiring uses random UUIDs; tests inject
//! [`SequentialIds`] so synthesized output is reproducible byte-for-byte.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of fresh unique ids.
pub trait IdGenerator: Send + Sync {
    /// Returns the next id. Every call must return a distinct value.
    fn next_id(&self) -> Uuid;
}

/// Random (UUID v4) id generation for production use.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic id generation for tests.
///
/// Encodes a monotonic counter into the UUID's leading bytes, preserving
/// UUID wire format while making ids ordered and reproducible.
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> Uuid {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0_u8; 16];
        bytes[..8].copy_from_slice(&sequence.to_be_bytes());
        Uuid::from_bytes(bytes)
    }
}
