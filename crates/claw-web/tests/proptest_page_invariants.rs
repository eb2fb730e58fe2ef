//! Property-based invariant tests for the headless page.
//!
//! Random interleavings of keys, scrolling, clicks, resizes, page mutations
//! and clock advances must keep these true after every step:
//!
//! 1. Capture listeners are installed iff the overlay is Visible, one per
//!    key event class.
//! 2. Drawn labels match the key map one to one.
//! 3. Nothing is labeled while Hidden.
//! 4. Shutdown leaves no listener and no label behind.

use std::time::Duration;

use claw_core::config::HintConfig;
use claw_core::event::{KeyCode, KeyEventClass, Modifiers};
use claw_core::geometry::Rect;
use claw_hints::{ElementRef, OverlayState};
use claw_web::{Element, HeadlessDocument, HeadlessPage, Tag};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Down(char),
    Up(char),
    Toggle,
    Focus(u64),
    Blur,
    Scroll(f64),
    Wheel(f64),
    Click,
    Resize(f64, f64),
    Move(u64, f64),
    Remove(u64),
    Advance(u64),
}

const ELEMENTS: u64 = 12;

fn op_strategy() -> impl Strategy<Value = Op> {
    let key = prop::sample::select(vec!['a', 'b', 'c', 'd', 'g', 'h', 'x']);
    prop_oneof![
        4 => key.clone().prop_map(Op::Down),
        3 => key.prop_map(Op::Up),
        2 => Just(Op::Toggle),
        1 => (0..ELEMENTS).prop_map(Op::Focus),
        1 => Just(Op::Blur),
        1 => (0.0f64..2_000.0).prop_map(Op::Scroll),
        1 => (-300.0f64..300.0).prop_map(Op::Wheel),
        1 => Just(Op::Click),
        1 => (100.0f64..1_200.0, 100.0f64..900.0).prop_map(|(w, h)| Op::Resize(w, h)),
        1 => (0..ELEMENTS, 0.0f64..2_500.0).prop_map(|(i, y)| Op::Move(i, y)),
        1 => (0..ELEMENTS).prop_map(Op::Remove),
        2 => (0u64..800).prop_map(Op::Advance),
    ]
}

fn build_page() -> HeadlessPage {
    let mut doc = HeadlessDocument::new(800.0, 600.0);
    let tags = [Tag::Button, Tag::Anchor, Tag::Input, Tag::TextArea, Tag::Select, Tag::Div];
    for i in 0..ELEMENTS {
        let rect = Rect::new(10.0, i as f64 * 180.0, 100.0, 24.0);
        let mut element = Element::new(tags[(i as usize) % tags.len()], rect);
        if element.tag() == Tag::Anchor {
            element = element.href("#");
        }
        doc.insert(element);
    }
    let config = HintConfig::default().with_keys("ABCD").expect("valid keys");
    HeadlessPage::new(doc, config)
}

fn apply(page: &mut HeadlessPage, op: &Op) {
    match op {
        Op::Down(c) => {
            page.key_down(KeyCode::Char(*c), Modifiers::NONE);
        }
        Op::Up(c) => {
            page.key_up(KeyCode::Char(*c), Modifiers::NONE);
        }
        Op::Toggle => {
            page.chord("gh");
        }
        Op::Focus(i) => {
            let _ = page.document_mut().set_focus(ElementRef(*i));
        }
        Op::Blur => page.document_mut().blur(),
        Op::Scroll(y) => page.scroll_to(0.0, *y),
        Op::Wheel(dy) => page.wheel(*dy),
        Op::Click => page.click(),
        Op::Resize(w, h) => page.resize(*w, *h),
        Op::Move(i, y) => {
            let _ = page
                .document_mut()
                .set_rect(ElementRef(*i), Rect::new(10.0, *y, 100.0, 24.0));
        }
        Op::Remove(i) => {
            let _ = page.document_mut().remove(ElementRef(*i));
        }
        Op::Advance(ms) => page.advance(Duration::from_millis(*ms)),
    }
}

fn check(page: &HeadlessPage) -> Result<(), TestCaseError> {
    let listeners = page.listeners();
    match page.session().state() {
        OverlayState::Visible => {
            for class in KeyEventClass::ALL {
                prop_assert_eq!(listeners.count(class), 1);
            }
        }
        OverlayState::Hidden => {
            prop_assert!(listeners.is_empty());
            prop_assert!(page.document().labels().is_empty());
            prop_assert!(page.session().key_map().is_empty());
        }
    }

    let map = page.session().key_map();
    let labels = page.document().labels();
    prop_assert_eq!(labels.len(), map.len());
    for (label, binding) in labels.iter().zip(map.iter()) {
        prop_assert_eq!(&label.key, &binding.key);
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Invariants hold after every step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_throughout(ops in prop::collection::vec(op_strategy(), 0..150)) {
        let mut page = build_page();
        for op in &ops {
            apply(&mut page, op);
            check(&page)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Shutdown
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shutdown_leaves_nothing(ops in prop::collection::vec(op_strategy(), 0..100)) {
        let mut page = build_page();
        for op in &ops {
            apply(&mut page, op);
        }
        let listeners = std::rc::Rc::clone(page.listeners());
        let doc = page.shutdown();
        prop_assert!(listeners.is_empty());
        prop_assert!(doc.labels().is_empty());
    }
}
