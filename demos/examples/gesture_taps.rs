// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap recognition with host-driven time.
//!
//! The accumulator reports every tap of a quick run; the counter reports a
//! double tap. Time is a plain millisecond counter, and the host asks the engine
//! when its next tap window closes.
//!
//! Run:
//! - `cargo run -p understory_demos --example gesture_taps`

use kurbo::{Point, Rect, Size};
use understory_gesture::{
    Gesture, GestureConfig, GestureEngine, GestureKind, RawInput, TapRecognition,
};
use understory_stage::{Content, LocalShape, Stage};

struct Button(Rect);

impl Content for Button {
    type Bitmap = ();

    fn render(&self) {}

    fn contains(&self, local: Point) -> bool {
        self.0.contains(local)
    }
}

fn stage() -> Stage<Button> {
    let mut stage = Stage::new(Size::new(200.0, 200.0));
    stage.insert(Button(Rect::new(0.0, 0.0, 60.0, 30.0)), LocalShape::default());
    stage
}

fn main() {
    env_logger::init();
    log::info!("tap window is {} ms", understory_gesture::TAP_WINDOW_MS);
    let at = RawInput::mouse(Point::new(10.0, 10.0));

    // Accumulator: three quick taps, each end reports the run so far.
    let mut stage = crate::stage();
    let mut engine = GestureEngine::default();
    let mut runs = Vec::new();
    for now in [0, 80, 160] {
        engine.pointer_down(&mut stage, &at, now);
        for event in engine.pointer_up(&mut stage, &at, now + 40) {
            if let Gesture::Tap { taps, .. } = event.gesture {
                runs.push(taps.len());
            }
        }
    }
    println!("accumulated runs: {runs:?}");
    assert_eq!(runs, [1, 2, 3]);

    // The window opened by the first tap closes at 300.
    let deadline = engine.next_deadline();
    println!("next deadline: {deadline:?}");
    assert_eq!(deadline, Some(300));
    assert_eq!(engine.tick(300), 1);

    // Counter: taps 1+2 and 3+4 make two double taps.
    let mut stage = crate::stage();
    let mut engine = GestureEngine::new(GestureConfig {
        tap: TapRecognition::Counter,
        ..GestureConfig::default()
    });
    let mut doubles = 0;
    for now in [1000, 1100, 1200, 1300] {
        let down = engine.pointer_down(&mut stage, &at, now);
        doubles += down
            .iter()
            .filter(|e| e.kind() == GestureKind::DoubleTap)
            .count();
        engine.pointer_up(&mut stage, &at, now + 20);
    }
    println!("double taps: {doubles}");
    assert_eq!(doubles, 2);

    // A lone tap followed by a slow one is not a double tap.
    engine.pointer_down(&mut stage, &at, 2000);
    let late = engine.pointer_down(&mut stage, &at, 2400);
    assert!(late.iter().all(|e| e.kind() != GestureKind::DoubleTap));
}
