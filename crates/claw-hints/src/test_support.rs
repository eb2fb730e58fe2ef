//! In-crate doubles for host collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use claw_core::event::{KeyEvent, KeyEventClass};
use claw_core::geometry::{Rect, Viewport};
use claw_core::key::KeySymbol;

use crate::host::{
    Activator, CaptureListener, CaptureTarget, Document, ElementKind, ElementRef, FocusState,
    KeyDispatch, LabelSurface, ListenerId,
};

type Entry = (KeyEventClass, ListenerId, Rc<dyn CaptureListener>);

/// Capture listener table that records registrations.
#[derive(Default)]
pub(crate) struct Registry {
    next: Cell<u64>,
    listeners: RefCell<Vec<Entry>>,
    pub(crate) added: Cell<usize>,
    pub(crate) removed: Cell<usize>,
}

impl Registry {
    pub(crate) fn count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub(crate) fn dispatch(&self, event: KeyEvent, class: KeyEventClass) -> KeyDispatch {
        let snapshot: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(c, _, _)| *c == class)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        let mut dispatch = KeyDispatch::new(event, class);
        for listener in snapshot {
            listener.handle(&mut dispatch);
            if dispatch.immediate_propagation_stopped() {
                break;
            }
        }
        dispatch
    }
}

impl CaptureTarget for Registry {
    fn add_capture_listener(
        &self,
        class: KeyEventClass,
        listener: Rc<dyn CaptureListener>,
    ) -> ListenerId {
        let id = ListenerId(self.next.get());
        self.next.set(id.0 + 1);
        self.listeners.borrow_mut().push((class, id, listener));
        self.added.set(self.added.get() + 1);
        id
    }

    fn remove_capture_listener(&self, class: KeyEventClass, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(c, i, _)| !(*c == class && *i == id));
        let removed = listeners.len() != before;
        if removed {
            self.removed.set(self.removed.get() + 1);
        }
        removed
    }
}

/// Calls observed by [`MockHost`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Focus(ElementRef),
    Activate(ElementRef),
    Label(String, Rect),
    Clear,
}

/// A flat page of elements with fixed rectangles.
#[derive(Default)]
pub(crate) struct MockHost {
    pub(crate) elements: Vec<(ElementRef, ElementKind, Rect)>,
    pub(crate) viewport: Viewport,
    pub(crate) focus: Option<FocusState>,
    pub(crate) calls: Vec<Call>,
    pub(crate) labels: Vec<(KeySymbol, Rect)>,
    /// Activation removes the element from the page.
    pub(crate) detach_on_activate: bool,
}

impl MockHost {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Add an element stacked vertically at row `id`.
    pub(crate) fn with(mut self, id: u64, kind: ElementKind) -> Self {
        let rect = Rect::new(0.0, id as f64 * 20.0, 60.0, 16.0);
        self.elements.push((ElementRef(id), kind, rect));
        self
    }

    pub(crate) fn with_rect(mut self, id: u64, kind: ElementKind, rect: Rect) -> Self {
        self.elements.push((ElementRef(id), kind, rect));
        self
    }

    pub(crate) fn label_keys(&self) -> Vec<&str> {
        self.labels.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn kind(&self, element: ElementRef) -> Option<ElementKind> {
        self.elements
            .iter()
            .find(|(e, _, _)| *e == element)
            .map(|(_, k, _)| *k)
    }
}

impl Document for MockHost {
    fn query_interactive(&self) -> Vec<ElementRef> {
        self.elements.iter().map(|(e, _, _)| *e).collect()
    }

    fn bounding_rect(&self, element: ElementRef) -> Rect {
        self.elements
            .iter()
            .find(|(e, _, _)| *e == element)
            .map(|(_, _, r)| *r)
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn active_element(&self) -> Option<FocusState> {
        self.focus
    }

    fn is_text_entry(&self, element: ElementRef) -> bool {
        matches!(
            self.kind(element),
            Some(ElementKind::Input | ElementKind::TextArea)
        )
    }
}

impl Activator for MockHost {
    fn focus(&mut self, element: ElementRef) {
        self.calls.push(Call::Focus(element));
        if let Some(kind) = self.kind(element) {
            self.focus = Some(FocusState::of(kind));
        }
    }

    fn activate(&mut self, element: ElementRef) {
        self.calls.push(Call::Activate(element));
        if self.detach_on_activate {
            self.elements.retain(|(e, _, _)| *e != element);
        }
    }
}

impl LabelSurface for MockHost {
    fn render_label(&mut self, key: &KeySymbol, rect: Rect) {
        self.calls.push(Call::Label(key.as_str().to_owned(), rect));
        self.labels.push((key.clone(), rect));
    }

    fn clear_all_labels(&mut self) {
        self.calls.push(Call::Clear);
        self.labels.clear();
    }
}
