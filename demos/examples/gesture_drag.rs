// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multi-touch dragging through the dispatcher.
//!
//! Two fingers land on two overlapping cards. The frontmost card takes the
//! first finger, the second finger falls through to the card below, and each
//! card follows its own finger until it lifts. A horizontal slider only moves
//! along x.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example gesture_drag`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};
use understory_gesture::{
    Dispatcher, Gesture, GestureConfig, GestureKind, RawInput, RawTouch, Viewport,
};
use understory_stage::{Content, LocalShape, ShapeFlags};

struct Card(Rect);

impl Content for Card {
    type Bitmap = ();

    fn render(&self) {}

    fn contains(&self, local: Point) -> bool {
        self.0.contains(local)
    }
}

fn touches(points: &[(u64, f64, f64)]) -> RawInput {
    RawInput::touches(points.iter().map(|&(id, x, y)| RawTouch {
        id,
        client: Point::new(x, y),
    }))
}

fn main() {
    env_logger::init();
    log::info!("dragging two cards with two fingers");

    let mut d = Dispatcher::new(Size::new(400.0, 300.0), GestureConfig::default());
    // The stage sits 20px right of and 10px below the window origin.
    d.engine_mut().set_viewport(Viewport {
        origin: Point::new(20.0, 10.0),
        ..Default::default()
    });

    let draggable = ShapeFlags::default() | ShapeFlags::DRAGGABLE;
    let lower = d.insert(
        Card(Rect::new(0.0, 0.0, 100.0, 100.0)),
        LocalShape {
            position: Point::new(0.0, 0.0),
            flags: draggable,
        },
    );
    let upper = d.insert(
        Card(Rect::new(0.0, 0.0, 100.0, 100.0)),
        LocalShape {
            position: Point::new(0.0, 0.0),
            flags: draggable,
        },
    );
    let slider = d.insert(
        Card(Rect::new(0.0, 0.0, 40.0, 20.0)),
        LocalShape {
            position: Point::new(200.0, 200.0),
            flags: ShapeFlags::VISIBLE | ShapeFlags::DRAGGABLE | ShapeFlags::DRAG_X,
        },
    );

    let seen = Rc::new(RefCell::new(Vec::new()));
    for id in [lower, upper, slider] {
        for kind in [GestureKind::DragStart, GestureKind::DragEnd] {
            let seen = seen.clone();
            d.bind(id, kind, move |cx| {
                seen.borrow_mut().push((cx.shape(), cx.gesture().kind()));
                cx.prevent_default();
            });
        }
    }

    // Both fingers inside both cards (client → stage subtracts the viewport origin).
    let down = d.pointer_down(&touches(&[(1, 30.0, 20.0), (2, 40.0, 30.0)]), 0);
    assert!(down.default_prevented);
    assert!(d.engine().drag().is_dragging(upper));
    assert!(d.engine().drag().is_dragging(lower));

    let moved = d.pointer_move(&touches(&[(1, 80.0, 20.0), (2, 40.0, 130.0)]), 16);
    for event in &moved.events {
        if let Gesture::DragMove { delta, .. } = event.gesture {
            println!("{:?} moved by {delta:?}", event.shape);
        }
    }
    assert_eq!(d.stage().position(upper), Some(Point::new(50.0, 0.0)));
    assert_eq!(d.stage().position(lower), Some(Point::new(0.0, 100.0)));

    // Finger 1 lifts; finger 2 is still down.
    d.pointer_up(&touches(&[(2, 40.0, 130.0)]), 32);
    // Then finger 2.
    d.pointer_up(&touches(&[]), 48);
    log::info!("both fingers lifted, {} drags left", d.engine().drag().len());

    // The slider ignores vertical motion.
    d.pointer_down(&RawInput::mouse(Point::new(230.0, 215.0)), 100);
    d.pointer_move(&RawInput::mouse(Point::new(260.0, 290.0)), 116);
    d.pointer_up(&RawInput::mouse(Point::new(260.0, 290.0)), 132);
    assert_eq!(d.stage().position(slider), Some(Point::new(230.0, 200.0)));

    println!("listener log:");
    for (id, kind) in seen.borrow().iter() {
        println!("  {id:?} {kind:?}");
    }
    assert_eq!(
        *seen.borrow(),
        [
            (upper, GestureKind::DragStart),
            (lower, GestureKind::DragStart),
            (upper, GestureKind::DragEnd),
            (lower, GestureKind::DragEnd),
            (slider, GestureKind::DragStart),
            (slider, GestureKind::DragEnd),
        ]
    );
}
