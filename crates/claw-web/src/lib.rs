#![forbid(unsafe_code)]

//! `claw-web` provides a headless, host-driven document for the claw
//! hint-mode engine.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes input events and
//!   viewport changes.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **DOM-order dispatch**: keyboard events go to the engine first, then to
//!   the document's capture listeners, then to the page's own handlers.
//!
//! The crate does not bind to a real browser. It exists so the engine can be
//! driven and observed end to end without one.

pub mod document;
pub mod listeners;
pub mod page;

use core::time::Duration;
use std::collections::VecDeque;

use claw_core::config::ConfigError;
use claw_core::event::Event;
use claw_hints::host::ElementRef;

pub use document::{Element, HeadlessDocument, HostAction, Label, Tag};
pub use listeners::ListenerTable;
pub use page::{HeadlessPage, KeyReport};

/// Headless host error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebHostError {
    /// The element handle was never issued or has been removed.
    UnknownElement(ElementRef),
    /// Engine configuration was rejected.
    Config(ConfigError),
}

impl core::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownElement(id) => write!(f, "unknown element #{}", id.0),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for WebHostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::UnknownElement(_) => None,
        }
    }
}

impl From<ConfigError> for WebHostError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now_mono(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// FIFO of host events awaiting dispatch.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    queue: VecDeque<Event>,
}

impl EventQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a canonical event.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Whether events are waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Pop the oldest event.
    pub fn read_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
