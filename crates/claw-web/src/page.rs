#![forbid(unsafe_code)]

//! Headless page driver.
//!
//! [`HeadlessPage`] wires a [`HeadlessDocument`], a [`ListenerTable`], a
//! [`DeterministicClock`] and an [`InputSession`] together, and dispatches
//! events the way a browser would:
//!
//! 1. Keyboard events reach the engine's always-on capture first, then every
//!    installed capture listener, then (unless propagation was stopped) the
//!    page's own handlers.
//! 2. A key-down producing a character is followed by a key-press, unless
//!    its default was prevented.
//! 3. An element the engine activates raises a click, which the engine sees
//!    like any other document click.
//!
//! Time only moves through [`HeadlessPage::advance`].

use std::rc::Rc;
use std::time::Duration;

use claw_core::config::HintConfig;
use claw_core::event::{Event, KeyCode, KeyEvent, KeyEventClass, Modifiers};
use claw_hints::host::{CaptureTarget, Document, KeyDispatch};
use claw_hints::session::{InputSession, KeyOutcome};

use crate::document::HeadlessDocument;
use crate::listeners::ListenerTable;
use crate::{DeterministicClock, EventQueue, WebHostError};

/// How one key event was handled end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReport {
    /// What the engine did.
    pub outcome: KeyOutcome,
    /// Whether the browser default action was suppressed.
    pub default_prevented: bool,
    /// Whether the page's own handlers saw the event.
    pub reached_page: bool,
}

/// A document plus an engine session, driven by the host.
#[derive(Debug)]
pub struct HeadlessPage {
    clock: DeterministicClock,
    events: EventQueue,
    document: HeadlessDocument,
    listeners: Rc<ListenerTable>,
    session: InputSession,
    page_keys: Vec<(KeyEventClass, KeyEvent)>,
    default_actions: Vec<KeyEvent>,
}

impl HeadlessPage {
    /// Attach a new session configured by `config` to `document`.
    #[must_use]
    pub fn new(document: HeadlessDocument, config: HintConfig) -> Self {
        let listeners = Rc::new(ListenerTable::new());
        let target: Rc<dyn CaptureTarget> = listeners.clone();
        Self {
            clock: DeterministicClock::new(),
            events: EventQueue::new(),
            document,
            listeners,
            session: InputSession::new(config, target),
            page_keys: Vec::new(),
            default_actions: Vec::new(),
        }
    }

    /// Attach a session configured from `CLAW_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`WebHostError::Config`] if a variable holds an invalid value.
    pub fn from_env(document: HeadlessDocument) -> Result<Self, WebHostError> {
        Ok(Self::new(document, HintConfig::from_env()?))
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// The document.
    #[must_use]
    pub fn document(&self) -> &HeadlessDocument {
        &self.document
    }

    /// Mutable access to the document, for page-side mutations.
    pub fn document_mut(&mut self) -> &mut HeadlessDocument {
        &mut self.document
    }

    /// The engine session.
    #[must_use]
    pub fn session(&self) -> &InputSession {
        &self.session
    }

    /// The document's capture listeners.
    #[must_use]
    pub fn listeners(&self) -> &Rc<ListenerTable> {
        &self.listeners
    }

    /// Key events the page's own handlers received.
    #[must_use]
    pub fn page_keys(&self) -> &[(KeyEventClass, KeyEvent)] {
        &self.page_keys
    }

    /// Key-downs whose default action ran.
    #[must_use]
    pub fn default_actions(&self) -> &[KeyEvent] {
        &self.default_actions
    }

    /// Queue an event for [`Self::pump`].
    pub fn push_event(&mut self, event: Event) {
        self.events.push_event(event);
    }

    /// Dispatch every queued event in order. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.events.read_event() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Dispatch one event immediately.
    pub fn dispatch(&mut self, event: Event) -> Option<KeyReport> {
        let now = self.now();
        match event {
            Event::Key(key) => return Some(self.dispatch_key(key)),
            Event::Resize { width, height } => self.document.resize(width, height),
            Event::Scroll | Event::Wheel | Event::Click | Event::Tick => {}
        }
        self.session.handle_event(&mut self.document, &event, now);
        None
    }

    /// Key-down of `code` with `modifiers`.
    pub fn key_down(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyReport {
        self.dispatch_key(KeyEvent::new(code).with_modifiers(modifiers))
    }

    /// Key-up of `code` with `modifiers`.
    pub fn key_up(&mut self, code: KeyCode, modifiers: Modifiers) -> KeyReport {
        self.dispatch_key(KeyEvent::new(code).with_modifiers(modifiers).released())
    }

    /// Press and release a character key, returning the key-down report.
    pub fn tap(&mut self, c: char) -> KeyReport {
        let report = self.key_down(KeyCode::Char(c), Modifiers::NONE);
        self.key_up(KeyCode::Char(c), Modifiers::NONE);
        report
    }

    /// Hold every character of `keys` down in order, then release them in
    /// reverse. Returns the report of the last key-down.
    pub fn chord(&mut self, keys: &str) -> Option<KeyReport> {
        let mut last = None;
        for c in keys.chars() {
            last = Some(self.key_down(KeyCode::Char(c), Modifiers::NONE));
        }
        for c in keys.chars().rev() {
            self.key_up(KeyCode::Char(c), Modifiers::NONE);
        }
        last
    }

    /// Scroll the document to `(x, y)`.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.document.scroll_to(x, y);
        self.dispatch(Event::Scroll);
    }

    /// Wheel gesture scrolling by `dy`.
    pub fn wheel(&mut self, dy: f64) {
        let viewport = self.document.viewport();
        self.document
            .scroll_to(viewport.scroll_x, viewport.scroll_y + dy);
        self.dispatch(Event::Wheel);
    }

    /// A pointer click somewhere on the page.
    pub fn click(&mut self) {
        self.dispatch(Event::Click);
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.dispatch(Event::Resize { width, height });
    }

    /// Advance the clock by `dt` and fire due timers.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.dispatch(Event::Tick);
    }

    /// Tear the session down, hiding the overlay.
    pub fn shutdown(self) -> HeadlessDocument {
        let Self {
            mut document,
            session,
            ..
        } = self;
        session.shutdown(&mut document);
        document
    }

    fn dispatch_key(&mut self, event: KeyEvent) -> KeyReport {
        let now = self.now();
        let class = event.class();

        let mut outcome = KeyOutcome::Passed;
        let session = &mut self.session;
        let document = &mut self.document;
        let dispatch = self
            .listeners
            .dispatch_with(KeyDispatch::new(event.clone(), class), |dispatch| {
                outcome = session.handle_key(document, &event, now);
                if outcome.prevents_default() {
                    dispatch.prevent_default();
                }
            });
        self.deliver(&dispatch);
        let mut default_prevented = dispatch.default_prevented();

        if event.is_down() && matches!(event.code, KeyCode::Char(_)) && !default_prevented {
            let press = self
                .listeners
                .dispatch_event(event.clone(), KeyEventClass::KeyPress);
            self.deliver(&press);
            default_prevented = press.default_prevented();
        }

        if event.is_down() && !default_prevented {
            self.default_actions.push(event);
        }

        self.flush_clicks(now);

        KeyReport {
            outcome,
            default_prevented,
            reached_page: !dispatch.propagation_stopped(),
        }
    }

    fn deliver(&mut self, dispatch: &KeyDispatch) {
        if !dispatch.propagation_stopped() {
            self.page_keys.push((dispatch.class, dispatch.event.clone()));
        }
    }

    fn flush_clicks(&mut self, now: Duration) {
        for _ in 0..self.document.take_clicks() {
            self.session
                .handle_event(&mut self.document, &Event::Click, now);
        }
    }
}
