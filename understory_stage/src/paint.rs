// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting: composite cached shape bitmaps onto a host canvas.
//!
//! The stage never paints synchronously when it changes. Mutations only mark it
//! as needing a repaint, and the host calls [`Stage::flush`] once per scheduling
//! tick, so every change made while handling one input phase lands in a single
//! clear + composite pass.

use kurbo::Point;

use crate::stage::Stage;
use crate::types::{Content, ShapeFlags};

/// Rendering target provided by the host.
pub trait Canvas<B> {
    /// Clear the whole drawing area.
    fn clear(&mut self);

    /// Composite a pre-rendered bitmap with its origin at `offset`.
    fn draw_bitmap(&mut self, bitmap: &B, offset: Point);
}

impl<C: Content> Stage<C> {
    /// Clear `canvas` and composite every visible shape in ascending z.
    pub fn paint(&self, canvas: &mut impl Canvas<C::Bitmap>) {
        canvas.clear();
        for &id in &self.order {
            let Some(shape) = self.shape(id) else {
                continue;
            };
            if !shape.flags.contains(ShapeFlags::VISIBLE) {
                continue;
            }
            canvas.draw_bitmap(&shape.bitmap, shape.position);
        }
    }

    /// Paint if a repaint is pending. Returns true if the canvas was painted.
    pub fn flush(&mut self, canvas: &mut impl Canvas<C::Bitmap>) -> bool {
        if !self.redraw_pending {
            return false;
        }
        self.redraw_pending = false;
        self.paint(canvas);
        log::trace!("stage: flushed {} shapes", self.order.len());
        true
    }
}
