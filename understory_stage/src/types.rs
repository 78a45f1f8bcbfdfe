// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the stage: shape identifiers, flags, content, and query filters.

use alloc::boxed::Box;
use kurbo::Point;

/// Identifier for a shape on a [`Stage`](crate::Stage).
///
/// A small, copyable handle consisting of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ShapeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ShapeId`.
///
/// Stale ids never alias a different live shape. Every [`Stage`](crate::Stage) method
/// accepting a `ShapeId` treats a stale id as "no such shape".
///
/// The `Ord` impl exists so ids can key ordered maps; it carries no z-order meaning.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub(crate) u32, pub(crate) u32);

impl ShapeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Shape flags controlling painting and dragging.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u8 {
        /// Shape is painted by [`Stage::paint`](crate::Stage::paint).
        const VISIBLE   = 0b0000_0001;
        /// Shape can be claimed by a drag gesture.
        const DRAGGABLE = 0b0000_0010;
        /// Horizontal drag movement is applied (when axis locking is enabled).
        const DRAG_X    = 0b0000_0100;
        /// Vertical drag movement is applied (when axis locking is enabled).
        const DRAG_Y    = 0b0000_1000;
    }
}

impl Default for ShapeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::DRAG_X | Self::DRAG_Y
    }
}

/// Initial placement for a shape.
#[derive(Clone, Copy, Debug)]
pub struct LocalShape {
    /// Position of the shape's local origin in stage coordinates.
    pub position: Point,
    /// Painting and dragging flags.
    pub flags: ShapeFlags,
}

impl Default for LocalShape {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            flags: ShapeFlags::default(),
        }
    }
}

/// Drawable content owned by a shape.
///
/// The stage never inspects pixels: it asks the content to render into an opaque
/// bitmap once on insert (and again on [`Stage::redraw`](crate::Stage::redraw)), and asks it
/// whether a point in shape-local coordinates lies inside its path.
pub trait Content {
    /// Offscreen bitmap type consumed by a [`Canvas`](crate::Canvas).
    type Bitmap;

    /// Render the content into a fresh bitmap.
    fn render(&self) -> Self::Bitmap;

    /// Returns true if `local` (stage point minus shape position) is inside the content's path.
    fn contains(&self, local: Point) -> bool;
}

impl<C: Content + ?Sized> Content for Box<C> {
    type Bitmap = C::Bitmap;

    fn render(&self) -> Self::Bitmap {
        (**self).render()
    }

    fn contains(&self, local: Point) -> bool {
        (**self).contains(local)
    }
}

/// Filters applied during hit testing.
///
/// Used by [`Stage::hit_test_point`](crate::Stage::hit_test_point). The default filter
/// considers every shape, visible or not.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, only consider shapes marked [`ShapeFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only consider shapes marked [`ShapeFlags::DRAGGABLE`].
    pub draggable_only: bool,
}

impl QueryFilter {
    pub(crate) fn accepts(self, flags: ShapeFlags) -> bool {
        if self.visible_only && !flags.contains(ShapeFlags::VISIBLE) {
            return false;
        }
        if self.draggable_only && !flags.contains(ShapeFlags::DRAGGABLE) {
            return false;
        }
        true
    }
}
