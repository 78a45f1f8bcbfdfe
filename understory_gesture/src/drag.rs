// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state machine: binds pointers to draggable shapes and moves them.
//!
//! Each shape is either idle or bound to exactly one pointer:
//!
//! - [`DragTracker::start`] binds unbound draggable shapes to unclaimed samples,
//!   topmost shape first, and emits [`Gesture::DragStart`].
//! - [`DragTracker::moved`] looks up each bound pointer in the new samples and
//!   translates the shape by the incremental delta, emitting [`Gesture::DragMove`].
//!   The binding slides to the new sample, so deltas never accumulate from the origin.
//! - [`DragTracker::end`] unbinds shapes whose pointer is gone and emits [`Gesture::DragEnd`].
//!
//! A pointer that is already bound is never offered to another shape.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use kurbo::Vec2;
use understory_stage::{Content, ShapeFlags, ShapeId, Stage};

use crate::claim::claim_topmost;
use crate::sample::{PointerId, Sample, find};
use crate::types::{Gesture, GestureEvent};

#[derive(Copy, Clone, Debug, PartialEq)]
struct Binding {
    point: Sample,
    moving: bool,
}

/// Per-shape drag bindings.
#[derive(Clone, Debug, Default)]
pub struct DragTracker {
    bindings: BTreeMap<ShapeId, Binding>,
}

impl DragTracker {
    /// Create a tracker with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the shape is bound to a pointer.
    pub fn is_dragging(&self, id: ShapeId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// True if the shape moved since its drag started.
    pub fn is_moving(&self, id: ShapeId) -> bool {
        self.bindings.get(&id).is_some_and(|b| b.moving)
    }

    /// Sample the shape is currently bound to.
    pub fn drag_point(&self, id: ShapeId) -> Option<Sample> {
        self.bindings.get(&id).map(|b| b.point)
    }

    /// Shape bound to `pointer`, if any.
    pub fn shape_for(&self, pointer: PointerId) -> Option<ShapeId> {
        self.bindings
            .iter()
            .find(|(_, b)| b.point.pointer == pointer)
            .map(|(id, _)| *id)
    }

    /// Number of active drags.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is being dragged.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Start phase: bind unbound draggable shapes to the samples under them.
    pub fn start<C: Content>(&mut self, stage: &Stage<C>, samples: &[Sample]) -> Vec<GestureEvent> {
        let taken: Vec<PointerId> = self.bindings.values().map(|b| b.point.pointer).collect();
        let claims = claim_topmost(stage, samples, &taken, |id| {
            stage.is_draggable(id) && !self.bindings.contains_key(&id)
        });
        claims
            .into_iter()
            .map(|(id, sample)| {
                self.bindings.insert(
                    id,
                    Binding {
                        point: sample,
                        moving: false,
                    },
                );
                log::trace!("drag: start {id:?} with {:?}", sample.pointer);
                GestureEvent::new(id, Gesture::DragStart { sample })
            })
            .collect()
    }

    /// Move phase: translate bound shapes by their pointer's incremental delta.
    ///
    /// With `axis_lock`, movement on an axis is applied only if the shape has
    /// [`ShapeFlags::DRAG_X`] / [`ShapeFlags::DRAG_Y`]. Shapes whose pointer is
    /// missing from `samples` keep their binding unchanged.
    pub fn moved<C: Content>(
        &mut self,
        stage: &mut Stage<C>,
        samples: &[Sample],
        axis_lock: bool,
    ) -> Vec<GestureEvent> {
        let bound: Vec<ShapeId> = stage
            .ids_bottom_to_top()
            .filter(|id| self.bindings.contains_key(id))
            .collect();
        let mut out = Vec::new();
        for id in bound {
            let Some(binding) = self.bindings.get_mut(&id) else {
                continue;
            };
            let Some(sample) = find(samples, binding.point.pointer).copied() else {
                continue;
            };
            let flags = stage.flags(id).unwrap_or_default();
            let x_enabled = !axis_lock || flags.contains(ShapeFlags::DRAG_X);
            let y_enabled = !axis_lock || flags.contains(ShapeFlags::DRAG_Y);
            let delta = Vec2::new(
                if x_enabled { sample.pos.x - binding.point.pos.x } else { 0.0 },
                if y_enabled { sample.pos.y - binding.point.pos.y } else { 0.0 },
            );
            if delta.x == 0.0 && delta.y == 0.0 {
                continue;
            }
            stage.translate(id, delta);
            binding.moving = true;
            binding.point = sample;
            out.push(GestureEvent::new(id, Gesture::DragMove { sample, delta }));
        }
        out
    }

    /// End phase: release shapes whose pointer is no longer present.
    ///
    /// `samples` are the pointers still down. With `release_all` (mouse-up
    /// semantics: the event carries no touch list) every binding is released.
    pub fn end<C: Content>(
        &mut self,
        stage: &Stage<C>,
        samples: &[Sample],
        release_all: bool,
    ) -> Vec<GestureEvent> {
        let bound: Vec<ShapeId> = stage
            .ids_bottom_to_top()
            .filter(|id| self.bindings.contains_key(id))
            .collect();
        let mut out = Vec::new();
        for id in bound {
            let Some(binding) = self.bindings.get(&id).copied() else {
                continue;
            };
            if !release_all && find(samples, binding.point.pointer).is_some() {
                continue;
            }
            self.bindings.remove(&id);
            log::trace!("drag: end {id:?}");
            out.push(GestureEvent::new(
                id,
                Gesture::DragEnd {
                    sample: binding.point,
                },
            ));
        }
        out
    }

    /// Drop the binding of a shape without emitting anything.
    pub fn forget(&mut self, id: ShapeId) -> bool {
        self.bindings.remove(&id).is_some()
    }

    /// Drop bindings of shapes that are no longer on the stage.
    pub fn retain_alive<C: Content>(&mut self, stage: &Stage<C>) {
        self.bindings.retain(|id, _| stage.is_alive(*id));
    }
}
