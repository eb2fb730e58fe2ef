#![forbid(unsafe_code)]

//! Host collaborator interfaces.
//!
//! The engine never touches a document directly. Element enumeration,
//! geometry, focus/activation, label drawing and listener registration are
//! capabilities the embedding host provides through these traits.
//!
//! # Contract
//!
//! - [`Document::query_interactive`] returns elements in document order.
//! - [`Document::bounding_rect`] and [`Document::viewport`] share one
//!   coordinate origin (the viewport's top-left corner).
//! - [`Activator`] calls on a stale [`ElementRef`] must be no-ops; the engine
//!   does not check liveness before calling.
//! - [`CaptureTarget`] listeners run at the earliest capture point, in
//!   registration order, after the engine's own key handling.

use std::rc::Rc;

use claw_core::event::{KeyEvent, KeyEventClass};
use claw_core::geometry::{Rect, Viewport};
use claw_core::key::KeySymbol;

/// Opaque handle to a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub u64);

/// Coarse element classification used by the typing-context check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementKind {
    /// `<button>`.
    Button,
    /// `<input>` of any type.
    Input,
    /// `<textarea>`.
    TextArea,
    /// `<select>`.
    Select,
    /// `<a>`.
    Anchor,
    /// Anything else.
    #[default]
    Other,
}

/// Snapshot of the currently focused element's editing attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    /// Element classification.
    pub kind: ElementKind,
    /// Marked content-editable.
    pub content_editable: bool,
    /// Carries `role="textbox"`.
    pub textbox_role: bool,
    /// Read-only.
    pub read_only: bool,
    /// Disabled.
    pub disabled: bool,
}

impl FocusState {
    /// Focus on an element of `kind` with no editing attributes set.
    #[must_use]
    pub const fn of(kind: ElementKind) -> Self {
        Self {
            kind,
            content_editable: false,
            textbox_role: false,
            read_only: false,
            disabled: false,
        }
    }

    /// Mark content-editable.
    #[must_use]
    pub const fn content_editable(mut self) -> Self {
        self.content_editable = true;
        self
    }

    /// Mark `role="textbox"`.
    #[must_use]
    pub const fn textbox_role(mut self) -> Self {
        self.textbox_role = true;
        self
    }

    /// Mark read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Read access to the document.
pub trait Document {
    /// Interactive elements in document order.
    fn query_interactive(&self) -> Vec<ElementRef>;

    /// Bounding rectangle of `element`, viewport-relative.
    fn bounding_rect(&self, element: ElementRef) -> Rect;

    /// Current viewport size and scroll offset.
    fn viewport(&self) -> Viewport;

    /// The focused element, if any.
    fn active_element(&self) -> Option<FocusState>;

    /// Whether `element` is a text-entry field (input or text area).
    fn is_text_entry(&self, element: ElementRef) -> bool;
}

/// Focus and click-equivalent activation.
pub trait Activator {
    /// Move focus to `element`.
    fn focus(&mut self, element: ElementRef);

    /// Activate `element` as a click would.
    fn activate(&mut self, element: ElementRef);
}

/// Label drawing.
pub trait LabelSurface {
    /// Draw a label showing `key` over `rect` (document coordinates).
    fn render_label(&mut self, key: &KeySymbol, rect: Rect);

    /// Remove every label drawn so far.
    fn clear_all_labels(&mut self);
}

/// Everything the controller needs from a host.
pub trait HintHost: Document + Activator + LabelSurface {}

impl<T: Document + Activator + LabelSurface + ?Sized> HintHost for T {}

/// Identity of an installed capture listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A keyboard event in flight through the host's dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDispatch {
    /// The event being dispatched.
    pub event: KeyEvent,
    /// Listener class the event is delivered under.
    pub class: KeyEventClass,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl KeyDispatch {
    /// Start dispatching `event` under `class`.
    #[must_use]
    pub const fn new(event: KeyEvent, class: KeyEventClass) -> Self {
        Self {
            event,
            class,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Suppress the host's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop the event before it reaches other nodes.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop the event before it reaches any further listener, including
    /// listeners on the same node and phase.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Whether the default action was suppressed.
    #[must_use]
    pub const fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether propagation to other nodes was stopped.
    #[must_use]
    pub const fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether propagation to further listeners was stopped.
    #[must_use]
    pub const fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// A listener installed at the capture phase.
pub trait CaptureListener {
    /// Handle one dispatched event.
    fn handle(&self, dispatch: &mut KeyDispatch);
}

/// The host's document-level capture registration point.
///
/// Methods take `&self` so registrations can be made and removed while the
/// host is dispatching; implementations use interior mutability and must
/// snapshot their listener list before invoking listeners.
pub trait CaptureTarget {
    /// Install `listener` for `class`, returning its identity.
    fn add_capture_listener(
        &self,
        class: KeyEventClass,
        listener: Rc<dyn CaptureListener>,
    ) -> ListenerId;

    /// Remove the listener with identity `id` from `class`.
    ///
    /// Returns `false` if no such listener was installed.
    fn remove_capture_listener(&self, class: KeyEventClass, id: ListenerId) -> bool;
}
