// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-stepped position animation.
//!
//! An [`Animator`] proposes the next translation for a shape given its current
//! position. The host calls [`Stage::animate_step`] once per frame (see
//! [`FRAME_INTERVAL_MS`]) until it reports that the animation is finished.

use kurbo::{Point, Vec2};

use crate::stage::Stage;
use crate::types::{Content, ShapeId};

/// Frame interval for stepped animations (~60 frames per second).
pub const FRAME_INTERVAL_MS: u64 = 1000 / 60;

/// A time-stepped position interpolator.
pub trait Animator {
    /// Translation to apply this frame, or `None` once the animation has arrived.
    fn step(&mut self, current: Point) -> Option<Vec2>;
}

/// Ease toward `target` by a quarter of the remaining distance per frame.
///
/// Each axis step is truncated toward zero; once that truncates to zero the
/// remaining distance is covered in one step, so the animation always lands
/// exactly on the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimateTo {
    /// Destination of the shape's local origin.
    pub target: Point,
}

impl AnimateTo {
    const DIVISOR: f64 = 4.0;

    /// Animate toward `target`.
    pub fn new(target: Point) -> Self {
        Self { target }
    }
}

impl Animator for AnimateTo {
    fn step(&mut self, current: Point) -> Option<Vec2> {
        let remaining = self.target - current;
        if remaining.x == 0.0 && remaining.y == 0.0 {
            return None;
        }
        let mut step = (remaining / Self::DIVISOR).trunc();
        if step.x == 0.0 {
            step.x = remaining.x;
        }
        if step.y == 0.0 {
            step.y = remaining.y;
        }
        Some(step)
    }
}

impl<C: Content> Stage<C> {
    /// Apply one animation frame to a shape.
    ///
    /// Returns true if the shape moved and more frames may follow. A moved shape
    /// requests a repaint. Stale ids return false.
    pub fn animate_step(&mut self, id: ShapeId, animator: &mut impl Animator) -> bool {
        let Some(current) = self.position(id) else {
            return false;
        };
        let Some(delta) = animator.step(current) else {
            return false;
        };
        self.translate(id, delta);
        self.request_redraw();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalShape;
    use alloc::vec::Vec;
    use kurbo::Size;

    struct Nothing;

    impl Content for Nothing {
        type Bitmap = ();
        fn render(&self) {}
        fn contains(&self, _local: Point) -> bool {
            false
        }
    }

    #[test]
    fn steps_quarter_distance_truncated() {
        let mut anim = AnimateTo::new(Point::new(100.0, -10.0));
        assert_eq!(anim.step(Point::ZERO), Some(Vec2::new(25.0, -2.0)));
        // 3 / 4 truncates to zero, so the rest is covered at once.
        assert_eq!(
            anim.step(Point::new(97.0, -10.0)),
            Some(Vec2::new(3.0, 0.0))
        );
        assert_eq!(anim.step(Point::new(100.0, -10.0)), None);
    }

    #[test]
    fn animate_step_reaches_target() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let id = stage.insert(Nothing, LocalShape::default());
        let mut anim = AnimateTo::new(Point::new(40.0, 8.0));
        let mut frames = Vec::new();
        while stage.animate_step(id, &mut anim) {
            frames.push(stage.position(id).unwrap());
            assert!(frames.len() < 64, "animation must terminate");
        }
        assert_eq!(stage.position(id), Some(Point::new(40.0, 8.0)));
        assert_eq!(frames[0], Point::new(10.0, 2.0));
        assert!(stage.redraw_pending());
    }
}
