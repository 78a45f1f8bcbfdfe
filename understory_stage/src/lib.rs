// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_stage --heading-base-level=0

//! Understory Stage: a Kurbo-native, z-ordered stage of hit-testable shapes.
//!
//! Understory Stage is the geometry half of a small interactive canvas:
//!
//! - Holds shapes with a position, a unique z value, flags, and host-defined [`Content`].
//! - Caches each shape's rendered bitmap and composites them onto a host [`Canvas`].
//! - Answers "which shape is on top at this point?" with [`Stage::hit_test_point`].
//! - Defers repainting: mutations mark the stage dirty and [`Stage::flush`] paints once.
//!
//! It does not interpret input. The `understory_gesture` crate drives a stage from raw
//! pointer and touch events.
//!
//! ## Z order
//!
//! Every insert takes `max_z + 1`, and [`Stage::move_to_top`] does the same for an
//! existing shape, so z values are unique but not contiguous. Painting walks shapes in
//! ascending z; hit testing walks them in descending z.
//!
//! ## Shape-local coordinates
//!
//! [`Content::contains`] receives points relative to the shape position. Moving a shape
//! never requires re-rendering its bitmap.
//!
//! ## API overview
//!
//! - [`Stage`]: container managing shapes, z order, scale ratio, and repaint requests.
//! - [`ShapeId`]: generational handle of a shape.
//! - [`LocalShape`]: initial position and [`ShapeFlags`].
//! - [`QueryFilter`]: restricts hit tests (visible/draggable).
//! - [`Animator`] / [`AnimateTo`]: frame-stepped movement.
//! - [`fit_ratio`] / [`fit_size`]: aspect-preserving display fit used by [`Stage::resize_display`].
//!
//! ## Minimal usage
//!
//! ```
//! use understory_stage::{Content, LocalShape, QueryFilter, Stage};
//! use kurbo::{Point, Rect, Size, Vec2};
//!
//! struct Tile(Rect);
//!
//! impl Content for Tile {
//!     type Bitmap = ();
//!     fn render(&self) {}
//!     fn contains(&self, local: Point) -> bool {
//!         self.0.contains(local)
//!     }
//! }
//!
//! let mut stage = Stage::new(Size::new(320.0, 240.0));
//! let back = stage.insert(Tile(Rect::new(0.0, 0.0, 100.0, 100.0)), LocalShape::default());
//! let front = stage.insert(
//!     Tile(Rect::new(0.0, 0.0, 50.0, 50.0)),
//!     LocalShape { position: Point::new(25.0, 25.0), ..Default::default() },
//! );
//!
//! // The front tile is on top where both overlap.
//! let filter = QueryFilter::default();
//! assert_eq!(stage.hit_test_point(Point::new(30.0, 30.0), filter), Some(front));
//!
//! // Move it away and the back tile is hit instead.
//! stage.translate(front, Vec2::new(100.0, 0.0));
//! assert_eq!(stage.hit_test_point(Point::new(30.0, 30.0), filter), Some(back));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod animate;
mod fit;
mod paint;
mod stage;
mod types;

pub use animate::{AnimateTo, Animator, FRAME_INTERVAL_MS};
pub use fit::{fit_ratio, fit_size};
pub use paint::Canvas;
pub use stage::Stage;
pub use types::{Content, LocalShape, QueryFilter, ShapeFlags, ShapeId};
