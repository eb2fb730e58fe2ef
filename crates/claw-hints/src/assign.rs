#![forbid(unsafe_code)]

//! Hotkey assignment.
//!
//! Pairs the i-th relevant candidate with the i-th pool symbol and stops
//! when either runs out. Candidates past the pool's length get no label;
//! that is a capacity limit, not an error.
//!
//! # Invariants
//!
//! 1. Deterministic: the same candidates and pool always give the same map.
//! 2. `len == min(relevant candidates, pool size)`.
//! 3. Injective: no key and no element appears twice.

use claw_core::geometry::{Rect, Viewport};
use claw_core::key::{KeyPool, KeySymbol};

use crate::host::{Document, ElementRef};
use crate::visibility::is_relevant;

/// An element eligible for a label, with the rectangle it was measured at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The element.
    pub element: ElementRef,
    /// Its viewport-relative bounding rectangle.
    pub rect: Rect,
}

/// One key-to-element entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Assigned hotkey.
    pub key: KeySymbol,
    /// Labeled element.
    pub element: ElementRef,
    /// Rectangle the label was drawn for (viewport-relative).
    pub rect: Rect,
}

/// Mapping from hotkey to element, in assignment order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyMap {
    bindings: Vec<Binding>,
}

impl KeyMap {
    /// Look up the binding for `key`.
    #[must_use]
    pub fn get(&self, key: &KeySymbol) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.key == *key)
    }

    /// Element bound to `key`.
    #[must_use]
    pub fn element(&self, key: &KeySymbol) -> Option<ElementRef> {
        self.get(key).map(|b| b.element)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in assignment order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Binding> + '_ {
        self.bindings.iter()
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

/// Zip candidates with pool symbols, in order.
#[must_use]
pub fn assign<I>(candidates: I, pool: &KeyPool) -> KeyMap
where
    I: IntoIterator<Item = Candidate>,
{
    let bindings = candidates
        .into_iter()
        .zip(pool.iter())
        .map(|(candidate, key)| Binding {
            key: key.clone(),
            element: candidate.element,
            rect: candidate.rect,
        })
        .collect();
    KeyMap { bindings }
}

/// Interactive elements of `document` that pass the visibility filter, in
/// document order.
///
/// The same element reported twice by the host is kept once.
#[must_use]
pub fn collect_candidates<D>(document: &D) -> Vec<Candidate>
where
    D: Document + ?Sized,
{
    let viewport: Viewport = document.viewport();
    let mut candidates: Vec<Candidate> = Vec::new();
    for element in document.query_interactive() {
        if candidates.iter().any(|c| c.element == element) {
            continue;
        }
        let rect = document.bounding_rect(element);
        if is_relevant(&rect, &viewport) {
            candidates.push(Candidate { element, rect });
        }
    }
    candidates
}

/// Build the key map for the current state of `document`.
#[must_use]
pub fn build_key_map<D>(document: &D, pool: &KeyPool) -> KeyMap
where
    D: Document + ?Sized,
{
    assign(collect_candidates(document), pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FocusState;
    use pretty_assertions::assert_eq;

    struct Page {
        elements: Vec<(ElementRef, Rect)>,
        viewport: Viewport,
    }

    impl Document for Page {
        fn query_interactive(&self) -> Vec<ElementRef> {
            self.elements.iter().map(|(e, _)| *e).collect()
        }

        fn bounding_rect(&self, element: ElementRef) -> Rect {
            self.elements
                .iter()
                .find(|(e, _)| *e == element)
                .map(|(_, r)| *r)
                .unwrap_or_default()
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn active_element(&self) -> Option<FocusState> {
            None
        }

        fn is_text_entry(&self, _element: ElementRef) -> bool {
            false
        }
    }

    fn visible(id: u64) -> (ElementRef, Rect) {
        (ElementRef(id), Rect::new(0.0, id as f64 * 10.0, 40.0, 8.0))
    }

    fn hidden(id: u64) -> (ElementRef, Rect) {
        (ElementRef(id), Rect::new(0.0, 5_000.0, 40.0, 8.0))
    }

    fn pool(keys: &str) -> KeyPool {
        KeyPool::from_chars(keys).expect("valid pool")
    }

    fn keys(map: &KeyMap) -> Vec<(&str, u64)> {
        map.iter().map(|b| (b.key.as_str(), b.element.0)).collect()
    }

    #[test]
    fn two_candidates_two_keys() {
        let page = Page {
            elements: vec![visible(1), visible(2)],
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("AB"));
        assert_eq!(keys(&map), vec![("A", 1), ("B", 2)]);
    }

    #[test]
    fn invisible_candidates_are_skipped_without_consuming_keys() {
        let page = Page {
            elements: vec![hidden(1), visible(2), hidden(3), visible(4)],
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("AB"));
        assert_eq!(keys(&map), vec![("A", 2), ("B", 4)]);
    }

    #[test]
    fn excess_candidates_are_unlabeled() {
        let page = Page {
            elements: (1..=5).map(visible).collect(),
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("XY"));
        assert_eq!(keys(&map), vec![("X", 1), ("Y", 2)]);
    }

    #[test]
    fn excess_keys_are_unused() {
        let page = Page {
            elements: vec![visible(7)],
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("QWE"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.element(&KeySymbol::new("q")), Some(ElementRef(7)));
        assert_eq!(map.element(&KeySymbol::new("W")), None);
    }

    #[test]
    fn empty_document_gives_empty_map() {
        let page = Page {
            elements: Vec::new(),
            viewport: Viewport::new(800.0, 600.0),
        };
        assert!(build_key_map(&page, &KeyPool::default()).is_empty());
    }

    #[test]
    fn duplicate_elements_are_labeled_once() {
        let page = Page {
            elements: vec![visible(1), visible(1), visible(2)],
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("AB"));
        assert_eq!(keys(&map), vec![("A", 1), ("B", 2)]);
    }

    #[test]
    fn binding_keeps_measured_rect() {
        let page = Page {
            elements: vec![visible(3)],
            viewport: Viewport::new(800.0, 600.0),
        };
        let map = build_key_map(&page, &pool("A"));
        let binding = map.get(&KeySymbol::new("A")).expect("bound");
        assert_eq!(binding.rect, Rect::new(0.0, 30.0, 40.0, 8.0));
    }

    #[test]
    fn clear_empties_map() {
        let mut map = assign(
            [Candidate {
                element: ElementRef(1),
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            }],
            &pool("A"),
        );
        assert_eq!(map.len(), 1);
        map.clear();
        assert!(map.is_empty());
    }
}
