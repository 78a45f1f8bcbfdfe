// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate normalization: raw host events → stage-space [`Sample`]s.
//!
//! Mouse and touch input arrive in client (window) coordinates. Each event is
//! converted into a list of samples in logical stage pixels:
//!
//! `stage = (client - viewport.origin + viewport.page_offset) * scale_ratio`
//!
//! Samples carry a [`PointerId`] so later phases of the same gesture can be
//! matched back to the shape that claimed them.

use alloc::vec::Vec;
use kurbo::{Point, Vec2};

/// Stable identity of a pointer across the phases of one gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerId {
    /// The mouse pointer (or any single-pointer device).
    Mouse,
    /// A touch point with its platform-assigned identifier.
    Touch(u64),
}

/// A normalized pointer sample in stage coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Position in logical stage pixels.
    pub pos: Point,
    /// Pointer that produced this sample.
    pub pointer: PointerId,
}

impl Sample {
    /// Create a sample.
    pub fn new(pos: Point, pointer: PointerId) -> Self {
        Self { pos, pointer }
    }

    /// A mouse sample at `(x, y)`.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointerId::Mouse)
    }

    /// A touch sample at `(x, y)`.
    pub fn touch(id: u64, x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y), PointerId::Touch(id))
    }
}

/// One touch point of a raw host event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawTouch {
    /// Platform-assigned touch identifier.
    pub id: u64,
    /// Position in client coordinates.
    pub client: Point,
}

/// A raw input event as delivered by the host, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct RawInput {
    /// Pointer position in client coordinates (mouse events).
    pub client: Point,
    /// Active touch points for touch events, `None` for mouse events.
    ///
    /// An end phase of a touch event lists the touches that are *still* down.
    pub touches: Option<Vec<RawTouch>>,
}

impl RawInput {
    /// A mouse event at `client`.
    pub fn mouse(client: Point) -> Self {
        Self {
            client,
            touches: None,
        }
    }

    /// A touch event with the given active touches.
    pub fn touches(touches: impl IntoIterator<Item = RawTouch>) -> Self {
        Self {
            client: Point::ZERO,
            touches: Some(touches.into_iter().collect()),
        }
    }

    /// True if the event carries a touch list (possibly empty).
    pub fn is_touch(&self) -> bool {
        self.touches.is_some()
    }
}

/// Placement of the stage inside the host's client area.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Client-space position of the stage's top-left corner.
    pub origin: Point,
    /// Page scroll offset added back to client coordinates.
    pub page_offset: Vec2,
}

impl Viewport {
    /// Convert a client-space point into stage space.
    pub fn to_stage(&self, client: Point, scale_ratio: f64) -> Point {
        ((client - self.origin + self.page_offset) * scale_ratio).to_point()
    }
}

/// Normalize a raw event into one or more stage-space samples.
///
/// Touch events yield one sample per active touch. Everything else (including a
/// touch event whose touch list is empty) yields a single [`PointerId::Mouse`]
/// sample at [`RawInput::client`]. The result is never empty.
///
/// ```
/// use understory_gesture::{normalize, PointerId, RawInput, RawTouch, Viewport};
/// use kurbo::{Point, Vec2};
///
/// let viewport = Viewport { origin: Point::new(10.0, 20.0), page_offset: Vec2::ZERO };
/// let raw = RawInput::touches([RawTouch { id: 7, client: Point::new(110.0, 60.0) }]);
/// let samples = normalize(&viewport, 2.0, &raw);
/// assert_eq!(samples[0].pos, Point::new(200.0, 80.0));
/// assert_eq!(samples[0].pointer, PointerId::Touch(7));
/// ```
pub fn normalize(viewport: &Viewport, scale_ratio: f64, raw: &RawInput) -> Vec<Sample> {
    let touches = raw.touches.as_deref().unwrap_or_default();
    if !touches.is_empty() {
        return touches
            .iter()
            .map(|t| Sample::new(viewport.to_stage(t.client, scale_ratio), PointerId::Touch(t.id)))
            .collect();
    }
    let mut out = Vec::with_capacity(1);
    out.push(Sample::new(
        viewport.to_stage(raw.client, scale_ratio),
        PointerId::Mouse,
    ));
    out
}

/// Find the sample produced by `pointer`, if present.
pub(crate) fn find(samples: &[Sample], pointer: PointerId) -> Option<&Sample> {
    samples.iter().find(|s| s.pointer == pointer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(id: u64, x: f64, y: f64) -> RawTouch {
        RawTouch {
            id,
            client: Point::new(x, y),
        }
    }

    #[test]
    fn touch_points_are_offset_and_scaled() {
        let viewport = Viewport {
            origin: Point::new(10.0, 20.0),
            page_offset: Vec2::ZERO,
        };
        let raw = RawInput::touches([touch(1, 110.0, 60.0), touch(2, 10.0, 20.0)]);
        let samples = normalize(&viewport, 2.0, &raw);
        assert_eq!(
            samples,
            [Sample::touch(1, 200.0, 80.0), Sample::touch(2, 0.0, 0.0)]
        );
    }

    #[test]
    fn page_offset_is_added_back() {
        let viewport = Viewport {
            origin: Point::new(5.0, 5.0),
            page_offset: Vec2::new(100.0, 50.0),
        };
        let samples = normalize(&viewport, 1.0, &RawInput::mouse(Point::new(5.0, 5.0)));
        assert_eq!(samples, [Sample::mouse(100.0, 50.0)]);
    }

    #[test]
    fn empty_touch_list_falls_back_to_mouse() {
        let raw = RawInput::touches([]);
        assert!(raw.is_touch());
        let samples = normalize(&Viewport::default(), 1.0, &raw);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].pointer, PointerId::Mouse);
    }

    #[test]
    fn find_matches_pointer_not_position() {
        let samples = [Sample::touch(3, 1.0, 1.0), Sample::touch(4, 1.0, 1.0)];
        assert_eq!(
            find(&samples, PointerId::Touch(4)),
            Some(&Sample::touch(4, 1.0, 1.0))
        );
        assert_eq!(find(&samples, PointerId::Mouse), None);
    }
}
