#![forbid(unsafe_code)]

//! Input session.
//!
//! An [`InputSession`] is the owned form of the always-on keyboard capture:
//! construct one per document, feed it every [`Event`] the host observes,
//! and poll it whenever the host clock advances. Several sessions can live
//! side by side; nothing is global.
//!
//! # Event routing
//!
//! | Event            | Effect                                            |
//! |------------------|---------------------------------------------------|
//! | key-down         | held keys, then toggle or hint-key dispatch       |
//! | key-up           | held keys cleared                                 |
//! | resize           | immediate relabel (not scheduled)                 |
//! | scroll, wheel    | relabel after half the refresh timeout            |
//! | click            | relabel after the full refresh timeout            |
//! | tick             | due timers fire                                   |
//!
//! Activating a non-text-entry element arms a separate settle timer for one
//! full timeout. Settle timers neither cancel nor are cancelled by the
//! debounce timer.
//!
//! # Teardown
//!
//! [`InputSession::shutdown`] hides the overlay through the host. Dropping a
//! session without it still removes the suppression listeners (and logs a
//! warning), but labels stay on the host surface.

use std::rc::Rc;
use std::time::Duration;

use claw_core::config::HintConfig;
use claw_core::event::{Event, KeyEvent};

use crate::assign::KeyMap;
use crate::controller::{Activation, HintStats, OverlayController, OverlayState};
use crate::host::{CaptureTarget, ElementRef, HintHost};
use crate::intercept::{Interception, Interceptor, is_typing_context};
use crate::refresh::{RefreshClass, RefreshScheduler, SettleTimers};

/// What the session did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Nothing; the host handles the key as usual (unless suppressed).
    Passed,
    /// Key-up; held keys were cleared.
    Released,
    /// Ignored because the focused element accepts typing.
    Typing,
    /// The toggle chord switched the overlay to the given state.
    Toggled(OverlayState),
    /// A hint key activated an element.
    Activated {
        /// The activated element.
        element: ElementRef,
        /// Whether it was a text entry (overlay hidden).
        text_entry: bool,
    },
}

impl KeyOutcome {
    /// Whether the host should suppress the key's default action.
    #[must_use]
    pub const fn prevents_default(&self) -> bool {
        matches!(self, Self::Toggled(_) | Self::Activated { .. })
    }
}

/// Owned keyboard capture plus overlay, scheduler and settle timers.
#[derive(Debug)]
pub struct InputSession {
    config: HintConfig,
    interceptor: Interceptor,
    controller: OverlayController,
    scheduler: RefreshScheduler,
    settle: SettleTimers,
}

impl InputSession {
    /// Start a hidden session that installs suppression on `target` when
    /// shown.
    #[must_use]
    pub fn new(config: HintConfig, target: Rc<dyn CaptureTarget>) -> Self {
        let interceptor = Interceptor::new(config.toggle.clone());
        let controller = OverlayController::new(config.keys.clone(), target);
        let scheduler = RefreshScheduler::new(config.refresh_timeout);
        tracing::debug!(
            keys = config.keys.len(),
            toggle = %config.toggle,
            timeout_ms = config.refresh_timeout.as_millis() as u64,
            "input session started"
        );
        Self {
            config,
            interceptor,
            controller,
            scheduler,
            settle: SettleTimers::default(),
        }
    }

    /// Route one host event. Returns the key outcome for keyboard events.
    pub fn handle_event<H: HintHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &Event,
        now: Duration,
    ) -> Option<KeyOutcome> {
        match event {
            Event::Key(key) => return Some(self.handle_key(host, key, now)),
            Event::Resize { .. } => {
                self.controller.refresh(host);
            }
            Event::Scroll | Event::Wheel => {
                self.scheduler.schedule(RefreshClass::Half, now);
            }
            Event::Click => {
                self.scheduler.schedule(RefreshClass::Full, now);
            }
            Event::Tick => {
                self.poll(host, now);
            }
        }
        None
    }

    /// Route one keyboard event.
    pub fn handle_key<H: HintHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: &KeyEvent,
        now: Duration,
    ) -> KeyOutcome {
        let typing = event.is_down() && is_typing_context(host.active_element().as_ref());

        match self.interceptor.classify(event, typing) {
            Interception::Released => KeyOutcome::Released,
            Interception::Typing => {
                self.controller.record_typing_skip();
                KeyOutcome::Typing
            }
            Interception::Toggle => KeyOutcome::Toggled(self.controller.toggle(host)),
            Interception::Key(symbol) => match self.controller.activate(host, &symbol) {
                Activation::Unbound => KeyOutcome::Passed,
                Activation::TextEntry(element) => KeyOutcome::Activated {
                    element,
                    text_entry: true,
                },
                Activation::Settling(element) => {
                    let deadline = now.saturating_add(self.config.refresh_timeout);
                    if !self.settle.arm(deadline) {
                        tracing::trace!(
                            deadline_ms = deadline.as_millis() as u64,
                            "settle timer merged"
                        );
                    }
                    KeyOutcome::Activated {
                        element,
                        text_entry: false,
                    }
                }
            },
        }
    }

    /// Fire every timer due at `now`. Returns how many relabel passes ran.
    pub fn poll<H: HintHost + ?Sized>(&mut self, host: &mut H, now: Duration) -> usize {
        let mut due = self.settle.take_due(now);
        if self.scheduler.poll(now) {
            due += 1;
        }
        (0..due).filter(|_| self.controller.refresh(host)).count()
    }

    /// Earliest time a pending timer wants to fire.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduler.deadline(), self.settle.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Overlay state.
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.controller.state()
    }

    /// Current key map.
    #[must_use]
    pub fn key_map(&self) -> &KeyMap {
        self.controller.key_map()
    }

    /// Diagnostic counters.
    #[must_use]
    pub fn stats(&self) -> HintStats {
        self.controller.stats()
    }

    /// Debounce timer, for inspection.
    #[must_use]
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Configuration the session was built with.
    #[must_use]
    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    /// Show the overlay without the chord.
    pub fn show<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        self.controller.show(host);
    }

    /// Hide the overlay without the chord.
    pub fn hide<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        self.controller.hide(host);
    }

    /// Hide the overlay and drop all pending timers.
    pub fn shutdown<H: HintHost + ?Sized>(mut self, host: &mut H) {
        self.scheduler.cancel();
        self.settle = SettleTimers::default();
        self.controller.hide(host);
        tracing::debug!(stats = ?self.controller.stats(), "input session shut down");
    }
}
