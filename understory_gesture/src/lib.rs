// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: deterministic gesture resolution over a z-ordered stage.
//!
//! This crate turns raw mouse and multi-touch events into shape-scoped gestures:
//! drags, taps and double taps, hover transitions, raw input phases and clicks. It
//! works on an [`understory_stage::Stage`] and never talks to a platform directly:
//! the host feeds one [`RawInput`] per phase together with a millisecond timestamp.
//!
//! ## Pipeline
//!
//! 1) [`normalize`] converts client coordinates into stage-space [`Sample`]s, one per
//!    active touch (or a single [`PointerId::Mouse`] sample).
//! 2) [`GestureEngine`] runs the recognizers for the phase and returns the resolved
//!    [`GestureEvent`]s in emission order.
//! 3) [`Dispatcher`] delivers them to listeners bound per shape and [`GestureKind`],
//!    and reports whether any listener prevented the host default.
//!
//! ## Claims
//!
//! Drag starts, tap starts and the input channel *claim* samples: shapes are visited
//! from the highest z down and each takes at most one sample nobody claimed yet in
//! this phase. Where shapes overlap, only the frontmost reacts. A pointer bound to a
//! dragged shape stays bound until it lifts; it is never offered to another shape.
//!
//! ## Time
//!
//! Nothing here reads a clock. Tap windows are cancellable tasks on an
//! [`understory_timer::Timers`] queue; every phase first closes windows due by its
//! timestamp, and hosts that want prompt expiry call [`Dispatcher::tick`] at
//! [`GestureEngine::next_deadline`].
//!
//! ## Configuration
//!
//! [`GestureConfig`] selects the coordinate scaling ([`ScaleMode`]), per-axis drag
//! locking, the tap recognizer ([`TapRecognition`]) and the tap window.
//!
//! ## Minimal usage
//!
//! ```
//! use understory_gesture::{GestureEngine, GestureKind, RawInput};
//! use understory_stage::{Content, LocalShape, ShapeFlags, Stage};
//! use kurbo::{Point, Rect, Size};
//!
//! struct Card(Rect);
//!
//! impl Content for Card {
//!     type Bitmap = ();
//!     fn render(&self) {}
//!     fn contains(&self, local: Point) -> bool {
//!         self.0.contains(local)
//!     }
//! }
//!
//! let mut stage = Stage::new(Size::new(320.0, 240.0));
//! let card = stage.insert(
//!     Card(Rect::new(0.0, 0.0, 80.0, 120.0)),
//!     LocalShape { flags: ShapeFlags::default() | ShapeFlags::DRAGGABLE, ..Default::default() },
//! );
//! let mut engine = GestureEngine::default();
//!
//! let down = engine.pointer_down(&mut stage, &RawInput::mouse(Point::new(10.0, 10.0)), 0);
//! assert_eq!(down[0].kind(), GestureKind::DragStart);
//!
//! engine.pointer_move(&mut stage, &RawInput::mouse(Point::new(40.0, 25.0)), 16);
//! assert_eq!(stage.position(card), Some(Point::new(30.0, 15.0)));
//!
//! let up = engine.pointer_up(&mut stage, &RawInput::mouse(Point::new(40.0, 25.0)), 32);
//! assert_eq!(up[0].kind(), GestureKind::DragEnd);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod claim;
mod dispatch;
mod drag;
mod engine;
mod hover;
mod input;
mod sample;
mod tap;
mod types;

pub use dispatch::{Dispatcher, EventContext, Listener, Listeners, Response};
pub use drag::DragTracker;
pub use engine::GestureEngine;
pub use hover::HoverState;
pub use input::{click_events, input_events};
pub use sample::{PointerId, RawInput, RawTouch, Sample, Viewport, normalize};
pub use tap::TapTracker;
pub use types::{
    Gesture, GestureConfig, GestureEvent, GestureKind, Phase, ScaleMode, TAP_WINDOW_MS,
    TapRecognition,
};
