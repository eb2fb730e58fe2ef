#![forbid(unsafe_code)]

//! Overlay controller.
//!
//! Owns the Hidden/Visible state and everything whose lifetime follows it:
//! the [`KeyMap`], the rendered labels and the [`SuppressionGuard`].
//!
//! # State Machine
//!
//! ```text
//!            toggle (show)
//!   ┌────────┐ ─────────────▶ ┌─────────┐
//!   │ Hidden │                │ Visible │ ──refresh──▶ Visible (relabel)
//!   └────────┘ ◀───────────── └─────────┘
//!        toggle (hide), or activation of a text entry
//! ```
//!
//! # Invariants
//!
//! - The key map is non-empty only while Visible.
//! - A suppression guard is held iff the state is Visible.
//! - Labels are drawn at the element rectangle translated by the viewport
//!   scroll offset, so they stay attached to content in document space.

use std::rc::Rc;

use claw_core::key::{KeyPool, KeySymbol};

use crate::assign::{KeyMap, assign, collect_candidates};
use crate::host::{CaptureTarget, ElementRef, HintHost};
use crate::intercept::{SuppressionGuard, VisibilityFlag};

/// Overlay visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    /// No labels, keyboard untouched.
    #[default]
    Hidden,
    /// Labels drawn, keyboard suppressed.
    Visible,
}

/// What a hint key did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The key is not in the map (or the overlay is hidden).
    Unbound,
    /// A text-entry element was activated; the overlay is now hidden.
    TextEntry(ElementRef),
    /// Another element was activated; the overlay stays up and should be
    /// relabeled once the page settles.
    Settling(ElementRef),
}

impl Activation {
    /// The activated element, if any.
    #[must_use]
    pub const fn element(&self) -> Option<ElementRef> {
        match self {
            Self::Unbound => None,
            Self::TextEntry(element) | Self::Settling(element) => Some(*element),
        }
    }
}

/// Diagnostic counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HintStats {
    /// Hidden → Visible transitions, refreshes excluded.
    pub shows: u64,
    /// Visible → Hidden transitions, refreshes excluded.
    pub hides: u64,
    /// Relabel passes performed while Visible.
    pub refreshes: u64,
    /// Elements activated through a hint key.
    pub activations: u64,
    /// Key-downs ignored because the user was typing.
    pub typing_skips: u64,
}

/// The overlay state machine.
pub struct OverlayController {
    pool: KeyPool,
    state: OverlayState,
    key_map: KeyMap,
    target: Rc<dyn CaptureTarget>,
    visible: VisibilityFlag,
    guard: Option<SuppressionGuard>,
    stats: HintStats,
}

impl OverlayController {
    /// Create a hidden controller assigning from `pool` and installing
    /// suppression on `target`.
    #[must_use]
    pub fn new(pool: KeyPool, target: Rc<dyn CaptureTarget>) -> Self {
        Self {
            pool,
            state: OverlayState::Hidden,
            key_map: KeyMap::default(),
            target,
            visible: VisibilityFlag::default(),
            guard: None,
            stats: HintStats::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> OverlayState {
        self.state
    }

    /// Whether labels are shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state == OverlayState::Visible
    }

    /// The current key map (empty while Hidden).
    #[must_use]
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> HintStats {
        self.stats
    }

    pub(crate) fn record_typing_skip(&mut self) {
        self.stats.typing_skips += 1;
    }

    /// Show the overlay. No-op when already Visible.
    pub fn show<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        if self.is_visible() {
            return;
        }
        self.stats.shows += 1;
        self.enter_visible(host);
    }

    /// Hide the overlay. No-op when already Hidden.
    pub fn hide<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        if !self.is_visible() {
            return;
        }
        self.stats.hides += 1;
        self.leave_visible(host);
    }

    /// Flip between Hidden and Visible, returning the new state.
    pub fn toggle<H: HintHost + ?Sized>(&mut self, host: &mut H) -> OverlayState {
        match self.state {
            OverlayState::Hidden => self.show(host),
            OverlayState::Visible => self.hide(host),
        }
        self.state
    }

    /// Relabel from fresh geometry. Returns `false` (and does nothing) while
    /// Hidden.
    pub fn refresh<H: HintHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.is_visible() {
            tracing::trace!("refresh skipped while hidden");
            return false;
        }
        self.stats.refreshes += 1;
        self.leave_visible(host);
        self.enter_visible(host);
        true
    }

    /// Activate the element bound to `key`.
    ///
    /// Focus moves first, then the element is activated. Activating a
    /// text-entry element hides the overlay. The element is classified
    /// before activation, which may detach it.
    pub fn activate<H: HintHost + ?Sized>(&mut self, host: &mut H, key: &KeySymbol) -> Activation {
        if !self.is_visible() {
            return Activation::Unbound;
        }
        let Some(element) = self.key_map.element(key) else {
            return Activation::Unbound;
        };

        let text_entry = host.is_text_entry(element);
        host.focus(element);
        host.activate(element);
        self.stats.activations += 1;

        tracing::info!(key = %key, element = element.0, text_entry, "hint activated");

        if text_entry {
            self.hide(host);
            Activation::TextEntry(element)
        } else {
            Activation::Settling(element)
        }
    }

    fn enter_visible<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        self.visible.set(true);
        self.guard = Some(SuppressionGuard::acquire(
            Rc::clone(&self.target),
            self.visible.clone(),
        ));

        let candidates = collect_candidates(&*host);
        let candidate_count = candidates.len();
        self.key_map = assign(candidates, &self.pool);

        let viewport = host.viewport();
        for binding in self.key_map.iter() {
            host.render_label(&binding.key, viewport.to_document(binding.rect));
        }
        self.state = OverlayState::Visible;

        tracing::debug!(
            candidates = candidate_count,
            labels = self.key_map.len(),
            "hints shown"
        );
    }

    fn leave_visible<H: HintHost + ?Sized>(&mut self, host: &mut H) {
        self.visible.set(false);
        if let Some(guard) = self.guard.take() {
            guard.release();
        }
        let labels = self.key_map.len();
        self.key_map.clear();
        host.clear_all_labels();
        self.state = OverlayState::Hidden;

        tracing::debug!(labels, "hints hidden");
    }
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("state", &self.state)
            .field("key_map", &self.key_map)
            .field("guard", &self.guard)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementKind;
    use crate::test_support::{Call, MockHost, Registry};
    use claw_core::geometry::{Rect, Viewport};
    use pretty_assertions::assert_eq;

    fn controller(keys: &str) -> (OverlayController, Rc<Registry>) {
        let registry = Rc::new(Registry::default());
        let pool = KeyPool::from_chars(keys).expect("valid pool");
        (OverlayController::new(pool, registry.clone()), registry)
    }

    fn key(s: &str) -> KeySymbol {
        KeySymbol::new(s)
    }

    #[test]
    fn starts_hidden_with_empty_map() {
        let (ctl, registry) = controller("AB");
        assert_eq!(ctl.state(), OverlayState::Hidden);
        assert!(ctl.key_map().is_empty());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn show_installs_suppression_and_labels() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0)
            .with(1, ElementKind::Button)
            .with(2, ElementKind::Anchor);
        ctl.show(&mut host);
        assert_eq!(ctl.state(), OverlayState::Visible);
        assert_eq!(registry.count(), 3);
        assert_eq!(host.label_keys(), vec!["A", "B"]);
        assert_eq!(ctl.key_map().element(&key("B")), Some(ElementRef(2)));
    }

    #[test]
    fn show_twice_is_idempotent() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        ctl.show(&mut host);
        ctl.show(&mut host);
        assert_eq!(registry.count(), 3);
        assert_eq!(ctl.stats().shows, 1);
    }

    #[test]
    fn hide_tears_everything_down() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        ctl.show(&mut host);
        ctl.hide(&mut host);
        assert_eq!(ctl.state(), OverlayState::Hidden);
        assert!(ctl.key_map().is_empty());
        assert!(host.labels.is_empty());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn toggle_flips_state() {
        let (mut ctl, _registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0);
        assert_eq!(ctl.toggle(&mut host), OverlayState::Visible);
        assert_eq!(ctl.toggle(&mut host), OverlayState::Hidden);
    }

    #[test]
    fn empty_page_is_visible_with_no_labels() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0);
        ctl.show(&mut host);
        assert!(ctl.is_visible());
        assert!(ctl.key_map().is_empty());
        assert_eq!(registry.count(), 3);
    }

    #[test]
    fn labels_are_placed_in_document_space() {
        let (mut ctl, _registry) = controller("A");
        let mut host = MockHost::new(800.0, 600.0).with_rect(
            1,
            ElementKind::Button,
            Rect::new(10.0, 20.0, 30.0, 12.0),
        );
        host.viewport = Viewport::new(800.0, 600.0).with_scroll(5.0, 100.0);
        ctl.show(&mut host);
        assert_eq!(host.labels, vec![(key("A"), Rect::new(15.0, 120.0, 30.0, 12.0))]);
    }

    #[test]
    fn refresh_relabels_from_current_geometry() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0)
            .with(1, ElementKind::Button)
            .with(2, ElementKind::Button);
        ctl.show(&mut host);
        host.elements[0].2 = Rect::new(0.0, 9_000.0, 60.0, 16.0);
        assert!(ctl.refresh(&mut host));
        assert_eq!(ctl.key_map().element(&key("A")), Some(ElementRef(2)));
        assert_eq!(host.label_keys(), vec!["A"]);
        assert_eq!(registry.count(), 3);
        let stats = ctl.stats();
        assert_eq!((stats.shows, stats.hides, stats.refreshes), (1, 0, 1));
    }

    #[test]
    fn refresh_while_hidden_is_noop() {
        let (mut ctl, _registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        assert!(!ctl.refresh(&mut host));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn activating_button_focuses_then_clicks_and_stays_visible() {
        let (mut ctl, _registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        ctl.show(&mut host);
        host.calls.clear();
        let outcome = ctl.activate(&mut host, &key("A"));
        assert_eq!(outcome, Activation::Settling(ElementRef(1)));
        assert_eq!(
            host.calls,
            vec![Call::Focus(ElementRef(1)), Call::Activate(ElementRef(1))]
        );
        assert!(ctl.is_visible());
    }

    #[test]
    fn activating_text_entry_hides() {
        let (mut ctl, registry) = controller("Q");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::TextArea);
        ctl.show(&mut host);
        let outcome = ctl.activate(&mut host, &key("Q"));
        assert_eq!(outcome, Activation::TextEntry(ElementRef(1)));
        assert_eq!(ctl.state(), OverlayState::Hidden);
        assert_eq!(registry.count(), 0);
        assert_eq!(ctl.stats().activations, 1);
    }

    #[test]
    fn text_entry_detached_by_activation_still_hides() {
        let (mut ctl, registry) = controller("Q");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Input);
        host.detach_on_activate = true;
        ctl.show(&mut host);
        let outcome = ctl.activate(&mut host, &key("Q"));
        assert_eq!(outcome, Activation::TextEntry(ElementRef(1)));
        assert!(host.elements.is_empty());
        assert_eq!(ctl.state(), OverlayState::Hidden);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn unbound_key_does_nothing() {
        let (mut ctl, _registry) = controller("A");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        ctl.show(&mut host);
        host.calls.clear();
        assert_eq!(ctl.activate(&mut host, &key("Z")), Activation::Unbound);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn activation_while_hidden_is_unbound() {
        let (mut ctl, _registry) = controller("A");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        assert_eq!(ctl.activate(&mut host, &key("A")), Activation::Unbound);
    }

    #[test]
    fn cycles_leave_no_listeners() {
        let (mut ctl, registry) = controller("AB");
        let mut host = MockHost::new(800.0, 600.0).with(1, ElementKind::Button);
        for _ in 0..10 {
            ctl.show(&mut host);
            ctl.refresh(&mut host);
            ctl.hide(&mut host);
        }
        assert_eq!(registry.count(), 0);
        assert_eq!(registry.added.get(), registry.removed.get());
    }
}
