// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: gestures, gesture kinds, phases, and engine configuration.

use alloc::vec::Vec;
use kurbo::Vec2;
use understory_stage::ShapeId;

use crate::sample::Sample;

/// Default tap window in milliseconds.
///
/// Taps accumulate (or count toward a double tap) only within this window.
pub const TAP_WINDOW_MS: u64 = 300;

/// Phase of an input gesture, mirrored across mouse and touch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Mouse down / touch start.
    Start,
    /// Mouse move / touch move.
    Move,
    /// Mouse up / touch end.
    End,
}

/// Discriminant of a [`Gesture`], used to key listener registries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum GestureKind {
    /// See [`Gesture::DragStart`].
    DragStart,
    /// See [`Gesture::DragMove`].
    DragMove,
    /// See [`Gesture::DragEnd`].
    DragEnd,
    /// See [`Gesture::Tap`].
    Tap,
    /// See [`Gesture::DoubleTap`].
    DoubleTap,
    /// See [`Gesture::MouseOver`].
    MouseOver,
    /// See [`Gesture::MouseOut`].
    MouseOut,
    /// See [`Gesture::InputStart`].
    InputStart,
    /// See [`Gesture::InputMove`].
    InputMove,
    /// See [`Gesture::InputEnd`].
    InputEnd,
    /// See [`Gesture::Click`].
    Click,
}

/// A resolved gesture and its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Gesture {
    /// A draggable shape was claimed by a pointer.
    DragStart {
        /// The claiming sample.
        sample: Sample,
    },
    /// A dragged shape moved by `delta` since the previous move.
    DragMove {
        /// The sample that moved the shape.
        sample: Sample,
        /// Applied translation (zero on locked axes).
        delta: Vec2,
    },
    /// The pointer bound to a dragged shape went away.
    DragEnd {
        /// Last sample the shape was bound to.
        sample: Sample,
    },
    /// One or more taps landed on the shape within the tap window.
    Tap {
        /// Most recent tap.
        sample: Sample,
        /// Every tap in the current window, oldest first.
        taps: Vec<Sample>,
    },
    /// Two taps landed on the shape within the tap window.
    DoubleTap {
        /// The second tap.
        sample: Sample,
    },
    /// A pointer entered the shape's path.
    MouseOver,
    /// No pointer is inside the shape's path any more.
    MouseOut,
    /// Raw start phase on a non-draggable shape.
    InputStart {
        /// The claiming sample.
        sample: Sample,
    },
    /// Raw move phase on a non-draggable shape.
    InputMove {
        /// The claiming sample.
        sample: Sample,
    },
    /// Raw end phase on a non-draggable shape.
    InputEnd {
        /// The claiming sample.
        sample: Sample,
    },
    /// A host click landed on the shape.
    Click {
        /// The clicking sample.
        sample: Sample,
    },
}

impl Gesture {
    /// The kind of this gesture.
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::DragStart { .. } => GestureKind::DragStart,
            Self::DragMove { .. } => GestureKind::DragMove,
            Self::DragEnd { .. } => GestureKind::DragEnd,
            Self::Tap { .. } => GestureKind::Tap,
            Self::DoubleTap { .. } => GestureKind::DoubleTap,
            Self::MouseOver => GestureKind::MouseOver,
            Self::MouseOut => GestureKind::MouseOut,
            Self::InputStart { .. } => GestureKind::InputStart,
            Self::InputMove { .. } => GestureKind::InputMove,
            Self::InputEnd { .. } => GestureKind::InputEnd,
            Self::Click { .. } => GestureKind::Click,
        }
    }

    /// The resolved sample, for every gesture except hover transitions.
    pub fn sample(&self) -> Option<&Sample> {
        match self {
            Self::DragStart { sample }
            | Self::DragMove { sample, .. }
            | Self::DragEnd { sample }
            | Self::Tap { sample, .. }
            | Self::DoubleTap { sample }
            | Self::InputStart { sample }
            | Self::InputMove { sample }
            | Self::InputEnd { sample }
            | Self::Click { sample } => Some(sample),
            Self::MouseOver | Self::MouseOut => None,
        }
    }
}

/// A gesture resolved against a specific shape.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// Shape the gesture belongs to.
    pub shape: ShapeId,
    /// The gesture and its payload.
    pub gesture: Gesture,
}

impl GestureEvent {
    /// Pair a gesture with a shape.
    pub fn new(shape: ShapeId, gesture: Gesture) -> Self {
        Self { shape, gesture }
    }

    /// Shorthand for `self.gesture.kind()`.
    pub fn kind(&self) -> GestureKind {
        self.gesture.kind()
    }
}

/// How client coordinates are scaled into stage coordinates.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ScaleMode {
    /// Multiply by the stage's [`scale_ratio`](understory_stage::Stage::scale_ratio).
    #[default]
    Applied,
    /// Always use a ratio of `1` (stages that are never resized).
    Fixed,
}

/// Which tap recognizer runs.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TapRecognition {
    /// Accumulate taps per shape and emit [`Gesture::Tap`] on every end phase.
    #[default]
    Accumulator,
    /// Count taps per shape and emit [`Gesture::DoubleTap`] on the second.
    Counter,
}

/// Engine configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Client → stage scaling.
    pub scale: ScaleMode,
    /// Honor [`ShapeFlags::DRAG_X`](understory_stage::ShapeFlags::DRAG_X) and
    /// [`ShapeFlags::DRAG_Y`](understory_stage::ShapeFlags::DRAG_Y) when dragging.
    pub drag_axis_lock: bool,
    /// Tap recognizer.
    pub tap: TapRecognition,
    /// Tap window in milliseconds.
    pub tap_window_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            scale: ScaleMode::Applied,
            drag_axis_lock: true,
            tap: TapRecognition::Accumulator,
            tap_window_ms: TAP_WINDOW_MS,
        }
    }
}
