// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state: compute over/out transitions from pointer containment.
//!
//! Unlike claims, hover is not exclusive. A shape is hovered while *any* sample
//! lies inside its path, regardless of what is stacked above it or of any drag
//! in progress. Only transitions are reported:
//!
//! ```
//! use understory_gesture::{Gesture, HoverState, Sample};
//! use understory_stage::{Content, LocalShape, Stage};
//! use kurbo::{Point, Rect, Size};
//!
//! struct Block(Rect);
//! impl Content for Block {
//!     type Bitmap = ();
//!     fn render(&self) {}
//!     fn contains(&self, p: Point) -> bool { self.0.contains(p) }
//! }
//!
//! let mut stage = Stage::new(Size::new(100.0, 100.0));
//! let id = stage.insert(Block(Rect::new(0.0, 0.0, 10.0, 10.0)), LocalShape::default());
//! let mut hover = HoverState::new();
//!
//! let over = hover.update(&stage, &[Sample::mouse(5.0, 5.0)]);
//! assert_eq!(over[0].gesture, Gesture::MouseOver);
//! assert!(hover.update(&stage, &[Sample::mouse(6.0, 6.0)]).is_empty());
//! let out = hover.update(&stage, &[Sample::mouse(50.0, 50.0)]);
//! assert_eq!(out[0].gesture, Gesture::MouseOut);
//! assert!(!hover.is_hovered(id));
//! ```

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use understory_stage::{Content, ShapeId, Stage};

use crate::sample::Sample;
use crate::types::{Gesture, GestureEvent};

/// The set of shapes currently under a pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState {
    hovered: BTreeSet<ShapeId>,
}

impl HoverState {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the shape is currently hovered.
    pub fn is_hovered(&self, id: ShapeId) -> bool {
        self.hovered.contains(&id)
    }

    /// Hovered shapes, in id order.
    pub fn hovered(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.hovered.iter().copied()
    }

    /// Recompute containment for every shape and return the transitions, in stage order.
    pub fn update<C: Content>(&mut self, stage: &Stage<C>, samples: &[Sample]) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        for id in stage.ids_bottom_to_top() {
            let hit = samples.iter().any(|s| stage.contains_point(id, s.pos));
            let was = self.hovered.contains(&id);
            if hit && !was {
                self.hovered.insert(id);
                out.push(GestureEvent::new(id, Gesture::MouseOver));
            } else if !hit && was {
                self.hovered.remove(&id);
                out.push(GestureEvent::new(id, Gesture::MouseOut));
            }
        }
        // Shapes removed from the stage drop out silently.
        self.hovered.retain(|id| stage.is_alive(*id));
        out
    }

    /// Clear the hover set, returning a [`Gesture::MouseOut`] for every shape that was hovered.
    pub fn clear(&mut self) -> Vec<GestureEvent> {
        let out = self
            .hovered
            .iter()
            .map(|id| GestureEvent::new(*id, Gesture::MouseOut))
            .collect();
        self.hovered.clear();
        out
    }

    /// Drop a shape without emitting anything.
    pub fn forget(&mut self, id: ShapeId) -> bool {
        self.hovered.remove(&id)
    }
}
