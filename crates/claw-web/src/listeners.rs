#![forbid(unsafe_code)]

//! Document-level capture listeners.
//!
//! Listeners run in registration order. Dispatch works on a snapshot taken
//! when it starts: a listener added mid-dispatch first sees the next event,
//! while one removed mid-dispatch is skipped immediately.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use claw_core::event::{KeyEvent, KeyEventClass};
use claw_hints::host::{CaptureListener, CaptureTarget, KeyDispatch, ListenerId};

struct Registration {
    class: KeyEventClass,
    id: ListenerId,
    listener: Rc<dyn CaptureListener>,
}

/// Capture-phase listener table.
#[derive(Default)]
pub struct ListenerTable {
    next_id: Cell<u64>,
    entries: RefCell<Vec<Registration>>,
}

impl ListenerTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total listeners installed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no listener is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Listeners installed for `class`.
    #[must_use]
    pub fn count(&self, class: KeyEventClass) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|r| r.class == class)
            .count()
    }

    /// Run `dispatch` through the listeners for its class, stopping early
    /// once immediate propagation is stopped.
    pub fn dispatch(&self, dispatch: KeyDispatch) -> KeyDispatch {
        self.dispatch_with(dispatch, |_| {})
    }

    /// Like [`Self::dispatch`], with `first` running ahead of every
    /// installed listener as the earliest registration would.
    ///
    /// The snapshot is taken before `first` runs.
    pub fn dispatch_with<F>(&self, mut dispatch: KeyDispatch, first: F) -> KeyDispatch
    where
        F: FnOnce(&mut KeyDispatch),
    {
        let snapshot: Vec<(ListenerId, Rc<dyn CaptureListener>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|r| r.class == dispatch.class)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect();

        first(&mut dispatch);

        for (id, listener) in snapshot {
            if dispatch.immediate_propagation_stopped() {
                break;
            }
            if !self.is_registered(dispatch.class, id) {
                continue;
            }
            listener.handle(&mut dispatch);
        }
        dispatch
    }

    fn is_registered(&self, class: KeyEventClass, id: ListenerId) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|r| r.class == class && r.id == id)
    }

    /// Dispatch a fresh `event` under `class`.
    pub fn dispatch_event(&self, event: KeyEvent, class: KeyEventClass) -> KeyDispatch {
        self.dispatch(KeyDispatch::new(event, class))
    }
}

impl CaptureTarget for ListenerTable {
    fn add_capture_listener(
        &self,
        class: KeyEventClass,
        listener: Rc<dyn CaptureListener>,
    ) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.entries.borrow_mut().push(Registration {
            class,
            id,
            listener,
        });
        tracing::trace!(?class, id = id.0, "capture listener added");
        id
    }

    fn remove_capture_listener(&self, class: KeyEventClass, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|r| r.class == class && r.id == id) else {
            return false;
        };
        entries.remove(index);
        tracing::trace!(?class, id = id.0, "capture listener removed");
        true
    }
}

impl std::fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerTable")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
