// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core stage implementation: shape storage, z order, updates, queries.

use alloc::vec::Vec;
use kurbo::{Point, Size, Vec2};

use crate::fit::{fit_ratio, fit_size};
use crate::types::{Content, LocalShape, QueryFilter, ShapeFlags, ShapeId};

pub(crate) struct Shape<C: Content> {
    generation: u32,
    content: C,
    pub(crate) bitmap: C::Bitmap,
    pub(crate) position: Point,
    z: u64,
    pub(crate) flags: ShapeFlags,
}

/// A z-ordered collection of hit-testable shapes.
///
/// Shapes are painted in ascending z and hit-tested in descending z, so the
/// visually frontmost shape is always tested first.
pub struct Stage<C: Content> {
    shapes: Vec<Option<Shape<C>>>, // slots
    generations: Vec<u32>,         // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    // Live ids sorted by ascending z.
    pub(crate) order: Vec<ShapeId>,
    max_z: u64,
    size: Size,
    scale_ratio: f64,
    pub(crate) redraw_pending: bool,
}

impl<C: Content> core::fmt::Debug for Stage<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stage")
            .field("shapes_alive", &self.order.len())
            .field("free_list", &self.free_list.len())
            .field("max_z", &self.max_z)
            .field("size", &self.size)
            .field("scale_ratio", &self.scale_ratio)
            .field("redraw_pending", &self.redraw_pending)
            .finish_non_exhaustive()
    }
}

impl<C: Content> Stage<C> {
    /// Create an empty stage with the given logical size and a scale ratio of `1`.
    pub fn new(size: Size) -> Self {
        Self {
            shapes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
            max_z: 0,
            size,
            scale_ratio: 1.0,
            redraw_pending: false,
        }
    }

    /// Logical (backing store) size of the stage.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Ratio converting displayed pixels into logical stage pixels.
    pub fn scale_ratio(&self) -> f64 {
        self.scale_ratio
    }

    /// Override the display-to-logical ratio.
    pub fn set_scale_ratio(&mut self, ratio: f64) {
        debug_assert!(ratio.is_finite() && ratio > 0.0, "scale ratio must be positive");
        self.scale_ratio = ratio;
    }

    /// Fit the stage into a `max` display box, preserving aspect ratio.
    ///
    /// Returns the rounded display size and updates [`Stage::scale_ratio`] so that
    /// display coordinates map back onto logical coordinates.
    ///
    /// An empty stage or display box has no usable ratio: the scale ratio is left
    /// unchanged and [`Size::ZERO`] is returned.
    pub fn resize_display(&mut self, max: Size) -> Size {
        let ratio = fit_ratio(self.size, max);
        if !(ratio.is_finite() && ratio > 0.0) {
            log::debug!("stage: cannot fit {:?} into {max:?}", self.size);
            return Size::ZERO;
        }
        self.set_scale_ratio(1.0 / ratio);
        fit_size(self.size, max)
    }

    /// Insert a shape on top of every existing shape.
    ///
    /// The content renders into its bitmap immediately and a redraw is requested.
    pub fn insert(&mut self, content: C, local: LocalShape) -> ShapeId {
        let z = self.max_z + 1;
        self.max_z = z;
        let bitmap = content.render();
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.shapes.push(None);
            self.generations.push(1);
            (self.shapes.len() - 1, 1)
        };
        self.shapes[idx] = Some(Shape {
            generation,
            content,
            bitmap,
            position: local.position,
            z,
            flags: local.flags,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ShapeId indices are 32-bit; stages never hold 2^32 shapes."
        )]
        let id = ShapeId::new(idx as u32, generation);
        self.order.push(id);
        self.redraw_pending = true;
        log::debug!("stage: inserted {id:?} at z {z}");
        id
    }

    /// Remove a shape, returning its content.
    ///
    /// Returns `None` if the id is stale.
    pub fn remove(&mut self, id: ShapeId) -> Option<C> {
        if !self.is_alive(id) {
            return None;
        }
        let shape = self.shapes[id.idx()].take()?;
        self.free_list.push(id.idx());
        self.order.retain(|o| *o != id);
        self.redraw_pending = true;
        log::debug!("stage: removed {id:?}");
        Some(shape.content)
    }

    /// Returns true if `id` refers to a live shape.
    pub fn is_alive(&self, id: ShapeId) -> bool {
        self.shapes
            .get(id.idx())
            .and_then(|s| s.as_ref())
            .is_some_and(|s| s.generation == id.1)
    }

    /// Number of live shapes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if the stage holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live shape ids from bottom (lowest z) to top.
    pub fn ids_bottom_to_top(&self) -> impl DoubleEndedIterator<Item = ShapeId> + '_ {
        self.order.iter().copied()
    }

    /// Live shape ids from top (highest z) to bottom.
    pub fn ids_top_to_bottom(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.order.iter().rev().copied()
    }

    /// Position of a shape's local origin.
    pub fn position(&self, id: ShapeId) -> Option<Point> {
        self.shape(id).map(|s| s.position)
    }

    /// Place a shape's local origin at `position`.
    pub fn set_position(&mut self, id: ShapeId, position: Point) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.position = position;
        true
    }

    /// Move a shape by `delta`.
    pub fn translate(&mut self, id: ShapeId, delta: Vec2) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.position += delta;
        true
    }

    /// Returns the z value of a shape.
    pub fn z_index(&self, id: ShapeId) -> Option<u64> {
        self.shape(id).map(|s| s.z)
    }

    /// Highest z value handed out so far.
    pub fn max_z(&self) -> u64 {
        self.max_z
    }

    /// Raise a shape above every other shape.
    pub fn move_to_top(&mut self, id: ShapeId) -> bool {
        let z = self.max_z + 1;
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.z = z;
        self.max_z = z;
        self.order.retain(|o| *o != id);
        self.order.push(id);
        self.redraw_pending = true;
        true
    }

    /// Flags of a shape.
    pub fn flags(&self, id: ShapeId) -> Option<ShapeFlags> {
        self.shape(id).map(|s| s.flags)
    }

    /// Replace the flags of a shape.
    pub fn set_flags(&mut self, id: ShapeId, flags: ShapeFlags) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        let visibility_changed =
            shape.flags.contains(ShapeFlags::VISIBLE) != flags.contains(ShapeFlags::VISIBLE);
        shape.flags = flags;
        if visibility_changed {
            self.redraw_pending = true;
        }
        true
    }

    /// True if the shape is live and marked [`ShapeFlags::DRAGGABLE`].
    pub fn is_draggable(&self, id: ShapeId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ShapeFlags::DRAGGABLE))
    }

    /// Borrow a shape's content.
    pub fn content(&self, id: ShapeId) -> Option<&C> {
        self.shape(id).map(|s| &s.content)
    }

    /// Mutably borrow a shape's content. Call [`Stage::redraw`] afterwards to refresh its bitmap.
    pub fn content_mut(&mut self, id: ShapeId) -> Option<&mut C> {
        self.shape_mut(id).map(|s| &mut s.content)
    }

    /// Borrow a shape's cached bitmap.
    pub fn bitmap(&self, id: ShapeId) -> Option<&C::Bitmap> {
        self.shape(id).map(|s| &s.bitmap)
    }

    /// Re-render a shape's bitmap from its content and request a repaint.
    pub fn redraw(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.shape_mut(id) else {
            return false;
        };
        shape.bitmap = shape.content.render();
        self.redraw_pending = true;
        true
    }

    /// Returns true if the stage point `pt` lies inside the shape's path.
    ///
    /// The point is converted into shape-local coordinates (minus the shape position)
    /// before asking the content.
    pub fn contains_point(&self, id: ShapeId, pt: Point) -> bool {
        self.shape(id)
            .is_some_and(|s| s.content.contains((pt - s.position).to_point()))
    }

    /// Hit test a stage point. Returns the topmost (highest z) shape containing it.
    ///
    /// Overlapping shapes never tie: z values are unique.
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<ShapeId> {
        self.ids_top_to_bottom().find(|&id| {
            self.shape(id)
                .is_some_and(|s| filter.accepts(s.flags) && self.contains_point(id, pt))
        })
    }

    /// Mark the stage as needing a repaint on the next [`Stage::flush`](crate::Stage::flush).
    pub fn request_redraw(&mut self) {
        self.redraw_pending = true;
    }

    /// True if a repaint has been requested and not yet flushed.
    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    // --- internals ---

    pub(crate) fn shape(&self, id: ShapeId) -> Option<&Shape<C>> {
        let s = self.shapes.get(id.idx())?.as_ref()?;
        (s.generation == id.1).then_some(s)
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape<C>> {
        let s = self.shapes.get_mut(id.idx())?.as_mut()?;
        if s.generation != id.1 {
            return None;
        }
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[derive(Debug)]
    struct Block {
        name: &'static str,
        rect: Rect,
    }

    impl Content for Block {
        type Bitmap = &'static str;
        fn render(&self) -> &'static str {
            self.name
        }
        fn contains(&self, local: Point) -> bool {
            self.rect.contains(local)
        }
    }

    fn block(name: &'static str, w: f64, h: f64) -> Block {
        Block {
            name,
            rect: Rect::new(0.0, 0.0, w, h),
        }
    }

    fn at(x: f64, y: f64) -> LocalShape {
        LocalShape {
            position: Point::new(x, y),
            ..Default::default()
        }
    }

    #[test]
    fn insert_assigns_increasing_z() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let a = stage.insert(block("a", 10.0, 10.0), LocalShape::default());
        let b = stage.insert(block("b", 10.0, 10.0), LocalShape::default());
        assert_eq!(stage.z_index(a), Some(1));
        assert_eq!(stage.z_index(b), Some(2));
        assert_eq!(stage.bitmap(a), Some(&"a"), "content renders on insert");
        let bottom_up: Vec<_> = stage.ids_bottom_to_top().collect();
        assert_eq!(bottom_up, [a, b]);
    }

    #[test]
    fn hit_test_prefers_highest_z() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let low = stage.insert(block("low", 50.0, 50.0), at(0.0, 0.0));
        let high = stage.insert(block("high", 50.0, 50.0), at(0.0, 0.0));
        let pt = Point::new(10.0, 10.0);
        assert_eq!(
            stage.hit_test_point(pt, QueryFilter::default()),
            Some(high),
            "topmost by z should win"
        );
        assert!(stage.move_to_top(low));
        assert_eq!(stage.hit_test_point(pt, QueryFilter::default()), Some(low));
        assert!(stage.z_index(low) > stage.z_index(high));
    }

    #[test]
    fn hit_test_uses_local_coordinates() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let s = stage.insert(block("s", 10.0, 10.0), at(100.0, 100.0));
        let filter = QueryFilter::default();
        assert_eq!(stage.hit_test_point(Point::new(105.0, 105.0), filter), Some(s));
        assert_eq!(stage.hit_test_point(Point::new(5.0, 5.0), filter), None);
        assert!(stage.translate(s, Vec2::new(-100.0, -100.0)));
        assert_eq!(stage.hit_test_point(Point::new(5.0, 5.0), filter), Some(s));
    }

    #[test]
    fn hit_test_filters() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let drag = stage.insert(
            block("drag", 50.0, 50.0),
            LocalShape {
                flags: ShapeFlags::default() | ShapeFlags::DRAGGABLE,
                ..Default::default()
            },
        );
        let hidden = stage.insert(
            block("hidden", 50.0, 50.0),
            LocalShape {
                flags: ShapeFlags::empty(),
                ..Default::default()
            },
        );
        let pt = Point::new(1.0, 1.0);
        assert_eq!(stage.hit_test_point(pt, QueryFilter::default()), Some(hidden));
        let visible = QueryFilter {
            visible_only: true,
            ..Default::default()
        };
        assert_eq!(stage.hit_test_point(pt, visible), Some(drag));
        let draggable = QueryFilter {
            draggable_only: true,
            ..Default::default()
        };
        assert_eq!(stage.hit_test_point(pt, draggable), Some(drag));
    }

    #[test]
    fn remove_makes_id_stale() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let a = stage.insert(block("a", 10.0, 10.0), LocalShape::default());
        assert_eq!(stage.remove(a).map(|b| b.name), Some("a"));
        assert!(!stage.is_alive(a));
        assert!(stage.remove(a).is_none());
        assert!(!stage.set_position(a, Point::ZERO));
        assert!(!stage.move_to_top(a));
        assert_eq!(stage.position(a), None);

        let b = stage.insert(block("b", 10.0, 10.0), LocalShape::default());
        assert_ne!(a, b, "slot reuse must bump the generation");
        assert_eq!(stage.len(), 1);
        assert_eq!(stage.z_index(b), Some(2), "z values are never reused");
    }

    #[test]
    fn redraw_rerenders_bitmap() {
        let mut stage = Stage::new(Size::new(100.0, 100.0));
        let a = stage.insert(block("a", 10.0, 10.0), LocalShape::default());
        stage.content_mut(a).unwrap().name = "renamed";
        assert_eq!(stage.bitmap(a), Some(&"a"));
        assert!(stage.redraw(a));
        assert_eq!(stage.bitmap(a), Some(&"renamed"));
        assert!(stage.redraw_pending());
    }

    #[test]
    fn resize_display_sets_scale_ratio() {
        let mut stage: Stage<Block> = Stage::new(Size::new(800.0, 600.0));
        let shown = stage.resize_display(Size::new(400.0, 400.0));
        assert_eq!(shown, Size::new(400.0, 300.0));
        assert_eq!(stage.scale_ratio(), 2.0);
    }

    #[test]
    fn resize_display_ignores_empty_boxes() {
        let mut stage: Stage<Block> = Stage::new(Size::new(800.0, 600.0));
        assert_eq!(stage.resize_display(Size::new(0.0, 400.0)), Size::ZERO);
        assert_eq!(stage.scale_ratio(), 1.0);

        let mut empty: Stage<Block> = Stage::new(Size::new(0.0, 600.0));
        assert_eq!(empty.resize_display(Size::new(400.0, 400.0)), Size::ZERO);
        assert_eq!(empty.scale_ratio(), 1.0);
    }
}
