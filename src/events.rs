use std::collections::VecDeque;

use crate::components::{ActorId, Tick};
use crate::sound::Cue;

/// Everything observable that happens in the scene. Every variant includes
/// tick: Tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Spawned {
        actor: ActorId,
        tick: Tick,
    },
    /// A patroller reached a margin and reversed.
    Turned {
        actor: ActorId,
        facing_left: bool,
        x: f32,
        tick: Tick,
    },
    Clicked {
        actor: ActorId,
        tick: Tick,
    },
    DialogueOpened {
        actor: ActorId,
        tick: Tick,
    },
    CuePlayed {
        actor: ActorId,
        cue: Cue,
        tick: Tick,
    },
    Resized {
        width: f32,
        height: f32,
        tick: Tick,
    },
}

impl Event {
    pub fn tick(&self) -> Tick {
        match self {
            Event::Spawned { tick, .. }
            | Event::Turned { tick, .. }
            | Event::Clicked { tick, .. }
            | Event::DialogueOpened { tick, .. }
            | Event::CuePlayed { tick, .. }
            | Event::Resized { tick, .. } => *tick,
        }
    }
}

/// Bounded history of scene events. Once `cap` entries are stored the
/// oldest one is dropped for each push.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<Event>,
    cap: usize,
}

impl EventLog {
    pub const DEFAULT_CAP: usize = 512;

    pub fn with_cap(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter()
    }

    /// The last `n` events, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Event> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_cap(Self::DEFAULT_CAP)
    }
}
