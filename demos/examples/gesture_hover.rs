// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover transitions, the raw input channel, and clicks.
//!
//! A pointer sweeps across a label sitting on a panel. Hover is not exclusive,
//! so both report `MouseOver`; the input channel and clicks go to the topmost
//! shape only.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_hover`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_gesture::{Dispatcher, GestureConfig, GestureKind, RawInput};
use understory_stage::{Content, LocalShape, ShapeId};

struct Panel(Rect);

impl Content for Panel {
    type Bitmap = ();

    fn render(&self) {}

    fn contains(&self, local: Point) -> bool {
        self.0.contains(local)
    }
}

fn main() {
    env_logger::init();
    log::info!("sweeping a pointer across a label on a panel");

    let mut d = Dispatcher::new(Size::new(300.0, 100.0), GestureConfig::default());
    let panel = d.insert(Panel(Rect::new(0.0, 0.0, 200.0, 100.0)), LocalShape::default());
    let label = d.insert(
        Panel(Rect::new(0.0, 0.0, 50.0, 20.0)),
        LocalShape {
            position: Point::new(20.0, 20.0),
            ..Default::default()
        },
    );

    let seen: Rc<RefCell<Vec<(ShapeId, GestureKind)>>> = Rc::default();
    for id in [panel, label] {
        for kind in [
            GestureKind::MouseOver,
            GestureKind::MouseOut,
            GestureKind::InputMove,
            GestureKind::Click,
        ] {
            let seen = seen.clone();
            d.bind(id, kind, move |cx| seen.borrow_mut().push((cx.shape(), cx.gesture().kind())));
        }
    }

    for (i, x) in [250.0, 150.0, 30.0, 35.0, 150.0].into_iter().enumerate() {
        d.pointer_move(&RawInput::mouse(Point::new(x, 30.0)), i as u64 * 16);
    }
    d.click(&RawInput::mouse(Point::new(30.0, 30.0)), 100);
    d.pointer_leave();

    for (id, kind) in seen.borrow().iter() {
        println!("{id:?} {kind:?}");
    }
    assert_eq!(
        *seen.borrow(),
        [
            // x = 150: over the panel only.
            (panel, GestureKind::InputMove),
            (panel, GestureKind::MouseOver),
            // x = 30: the label is on top for input, both are hovered.
            (label, GestureKind::InputMove),
            (label, GestureKind::MouseOver),
            // x = 35: no new transitions.
            (label, GestureKind::InputMove),
            // x = 150: back to the panel.
            (panel, GestureKind::InputMove),
            (label, GestureKind::MouseOut),
            (label, GestureKind::Click),
            (panel, GestureKind::MouseOut),
        ]
    );
}
