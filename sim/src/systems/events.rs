//! Fire transition events collected for hosts and diagnostics.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Events kept when no capacity is configured.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Kind of burn-state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireEventKind {
    Ignited,
    Extinguished,
    Burnt,
}

/// A single burn-state transition. Plants are referred to by `PlantId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireEvent {
    pub kind: FireEventKind,
    pub plant: u64,
    /// Plant whose fire caused an ignition, if it spread from one.
    pub source: Option<u64>,
}

/// Resource buffering fire events until the next snapshot drains them.
///
/// Bounded: once `capacity` events are waiting, the oldest is dropped for
/// each new one, so a host that never takes snapshots does not grow it.
#[derive(Resource, Debug)]
pub struct FireEventBuffer {
    events: VecDeque<FireEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for FireEventBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl FireEventBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, kind: FireEventKind, plant: u64, source: Option<u64>) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(FireEvent { kind, plant, source });
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&mut self) -> Vec<FireEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events discarded because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, kind: FireEventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}
