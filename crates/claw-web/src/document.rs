#![forbid(unsafe_code)]

//! Headless document.
//!
//! A flat arena of elements with document-space rectangles, a viewport with
//! a scroll offset, focus, and a label layer. [`HeadlessDocument`] implements
//! every collaborator trait the engine consumes.
//!
//! # Coordinates
//!
//! Element rectangles are stored in document space. The engine sees them
//! viewport-relative (`rect - scroll`), which is what a bounding-rect query
//! returns in a browser.
//!
//! # Interactive selector
//!
//! An element is interactive iff it is a button, an input whose type is not
//! `hidden`, a text area, a select, or an anchor with a destination.
//! Removed elements are never returned.

use claw_core::geometry::{Rect, Viewport};
use claw_core::key::KeySymbol;
use claw_hints::host::{Activator, Document, ElementKind, ElementRef, FocusState, LabelSurface};

use crate::WebHostError;

/// Element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<button>`.
    Button,
    /// `<input>`.
    Input,
    /// `<textarea>`.
    TextArea,
    /// `<select>`.
    Select,
    /// `<a>`.
    Anchor,
    /// Any non-interactive container.
    Div,
}

impl Tag {
    fn kind(self) -> ElementKind {
        match self {
            Self::Button => ElementKind::Button,
            Self::Input => ElementKind::Input,
            Self::TextArea => ElementKind::TextArea,
            Self::Select => ElementKind::Select,
            Self::Anchor => ElementKind::Anchor,
            Self::Div => ElementKind::Other,
        }
    }
}

/// One element of the headless document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: Tag,
    rect: Rect,
    input_type: Option<String>,
    href: Option<String>,
    role: Option<String>,
    content_editable: bool,
    read_only: bool,
    disabled: bool,
}

impl Element {
    /// An element with `tag` occupying `rect` in document space.
    #[must_use]
    pub fn new(tag: Tag, rect: Rect) -> Self {
        Self {
            tag,
            rect,
            input_type: None,
            href: None,
            role: None,
            content_editable: false,
            read_only: false,
            disabled: false,
        }
    }

    /// Set the `type` attribute.
    #[must_use]
    pub fn input_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.to_owned());
        self
    }

    /// Set the `href` attribute.
    #[must_use]
    pub fn href(mut self, href: &str) -> Self {
        self.href = Some(href.to_owned());
        self
    }

    /// Set the `role` attribute.
    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    /// Mark content-editable.
    #[must_use]
    pub fn content_editable(mut self) -> Self {
        self.content_editable = true;
        self
    }

    /// Mark read-only.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Element tag.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Rectangle in document space.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether the interactive selector matches this element.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        match self.tag {
            Tag::Button | Tag::TextArea | Tag::Select => true,
            Tag::Input => !self
                .input_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
            Tag::Anchor => self.href.is_some(),
            Tag::Div => false,
        }
    }

    fn focus_state(&self) -> FocusState {
        FocusState {
            kind: self.tag.kind(),
            content_editable: self.content_editable,
            textbox_role: self
                .role
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case("textbox")),
            read_only: self.read_only,
            disabled: self.disabled,
        }
    }
}

/// A label drawn by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Hotkey shown.
    pub key: KeySymbol,
    /// Placement in document space.
    pub rect: Rect,
}

/// Host primitive invoked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Focus moved to the element.
    Focus(ElementRef),
    /// The element was clicked.
    Activate(ElementRef),
}

/// In-memory document implementing the engine's host traits.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    elements: Vec<Option<Element>>,
    viewport: Viewport,
    focused: Option<ElementRef>,
    labels: Vec<Label>,
    actions: Vec<HostAction>,
    clicks: usize,
}

impl HeadlessDocument {
    /// An empty document with a `width` x `height` viewport.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Append `element`, returning its handle. Document order is insertion
    /// order.
    pub fn insert(&mut self, element: Element) -> ElementRef {
        let id = ElementRef(self.elements.len() as u64);
        self.elements.push(Some(element));
        id
    }

    /// Look up a live element.
    #[must_use]
    pub fn get(&self, id: ElementRef) -> Option<&Element> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.elements.get(index))
            .and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: ElementRef) -> Result<&mut Element, WebHostError> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.elements.get_mut(index))
            .and_then(Option::as_mut)
            .ok_or(WebHostError::UnknownElement(id))
    }

    /// Detach an element. Its handle becomes stale.
    ///
    /// # Errors
    ///
    /// [`WebHostError::UnknownElement`] if it was never inserted or is
    /// already removed.
    pub fn remove(&mut self, id: ElementRef) -> Result<Element, WebHostError> {
        let slot = usize::try_from(id.0)
            .ok()
            .and_then(|index| self.elements.get_mut(index))
            .ok_or(WebHostError::UnknownElement(id))?;
        let element = slot.take().ok_or(WebHostError::UnknownElement(id))?;
        if self.focused == Some(id) {
            self.focused = None;
        }
        Ok(element)
    }

    /// Move an element (document space).
    ///
    /// # Errors
    ///
    /// [`WebHostError::UnknownElement`] for stale handles.
    pub fn set_rect(&mut self, id: ElementRef, rect: Rect) -> Result<(), WebHostError> {
        self.get_mut(id)?.rect = rect;
        Ok(())
    }

    /// Focus an element as the user would by clicking into it.
    ///
    /// # Errors
    ///
    /// [`WebHostError::UnknownElement`] for stale handles.
    pub fn set_focus(&mut self, id: ElementRef) -> Result<(), WebHostError> {
        self.get_mut(id)?;
        self.focused = Some(id);
        Ok(())
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// The focused element.
    #[must_use]
    pub const fn focused(&self) -> Option<ElementRef> {
        self.focused
    }

    /// Resize the viewport, keeping the scroll offset.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Set the scroll offset, clamped at zero.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x.max(0.0);
        self.viewport.scroll_y = y.max(0.0);
    }

    /// Labels currently drawn, in drawing order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label text currently drawn, in drawing order.
    #[must_use]
    pub fn label_keys(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.key.as_str()).collect()
    }

    /// Every focus/activate call the engine made.
    #[must_use]
    pub fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    /// Elements clicked by the engine, in order.
    #[must_use]
    pub fn activations(&self) -> Vec<ElementRef> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                HostAction::Activate(e) => Some(*e),
                HostAction::Focus(_) => None,
            })
            .collect()
    }

    /// Take the number of synthetic clicks raised since the last call.
    pub(crate) fn take_clicks(&mut self) -> usize {
        std::mem::take(&mut self.clicks)
    }
}

impl Document for HeadlessDocument {
    fn query_interactive(&self) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref()
                    .filter(|e| e.is_interactive())
                    .map(|_| ElementRef(index as u64))
            })
            .collect()
    }

    fn bounding_rect(&self, element: ElementRef) -> Rect {
        self.get(element)
            .map(|e| e.rect.translate(-self.viewport.scroll_x, -self.viewport.scroll_y))
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn active_element(&self) -> Option<FocusState> {
        self.focused
            .and_then(|id| self.get(id))
            .map(Element::focus_state)
    }

    fn is_text_entry(&self, element: ElementRef) -> bool {
        self.get(element)
            .is_some_and(|e| matches!(e.tag, Tag::Input | Tag::TextArea))
    }
}

impl Activator for HeadlessDocument {
    fn focus(&mut self, element: ElementRef) {
        if self.get(element).is_none() {
            tracing::debug!(element = element.0, "focus on stale element ignored");
            return;
        }
        self.focused = Some(element);
        self.actions.push(HostAction::Focus(element));
    }

    fn activate(&mut self, element: ElementRef) {
        if self.get(element).is_none() {
            tracing::debug!(element = element.0, "activate on stale element ignored");
            return;
        }
        self.actions.push(HostAction::Activate(element));
        self.clicks += 1;
    }
}

impl LabelSurface for HeadlessDocument {
    fn render_label(&mut self, key: &KeySymbol, rect: Rect) {
        self.labels.push(Label {
            key: key.clone(),
            rect,
        });
    }

    fn clear_all_labels(&mut self) {
        self.labels.clear();
    }
}
