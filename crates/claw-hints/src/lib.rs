#![forbid(unsafe_code)]

//! Claw Hints
//!
//! Keyboard hint mode for a rendered document: every visible interactive
//! element gets a one-character label, and pressing that key activates it.
//!
//! # Key Components
//!
//! - [`visibility::is_relevant`] - Viewport intersection test
//! - [`assign`] - Deterministic key-to-element assignment ([`KeyMap`])
//! - [`RefreshScheduler`] - Last-call-wins relabel debouncing
//! - [`Interceptor`] - Held keys, toggle chord and typing context
//! - [`SuppressionGuard`] - Scoped ownership of suppression listeners
//! - [`OverlayController`] - Hidden/Visible state machine
//! - [`InputSession`] - Owned entry point that routes host events
//!
//! # How it fits in the system
//! `claw-core` supplies events, geometry and configuration. The host (see
//! `claw-web` for a headless one) implements the traits in [`host`] and
//! forwards its events and clock to an [`InputSession`].

pub mod assign;
pub mod controller;
pub mod host;
pub mod intercept;
pub mod refresh;
pub mod session;
pub mod visibility;

#[cfg(test)]
mod test_support;

pub use assign::{Binding, Candidate, KeyMap};
pub use controller::{Activation, HintStats, OverlayController, OverlayState};
pub use host::{
    Activator, CaptureListener, CaptureTarget, Document, ElementKind, ElementRef, FocusState,
    HintHost, KeyDispatch, LabelSurface, ListenerId,
};
pub use intercept::{HeldKeys, Interception, Interceptor, SuppressionGuard, is_typing_context};
pub use refresh::{RefreshClass, RefreshScheduler, SettleTimers, TimerState};
pub use session::{InputSession, KeyOutcome};
