// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gesture engine: runs every recognizer over one input phase.
//!
//! ## Phase order
//!
//! - Start: drag start, input start, tap start.
//! - Move: drag move, input move, tap cancellation, hover.
//! - End: drag end, input end, tap emission.
//!
//! Each phase first closes tap windows that expired by the phase timestamp and
//! drops gesture state of shapes no longer on the stage. A phase that moved any
//! shape requests a (deferred) redraw on the stage.

use alloc::vec::Vec;
use understory_stage::{Content, ShapeId, Stage};

use crate::drag::DragTracker;
use crate::hover::HoverState;
use crate::input::{click_events, input_events};
use crate::sample::{RawInput, Sample, Viewport, normalize};
use crate::tap::TapTracker;
use crate::types::{GestureConfig, GestureEvent, GestureKind, Phase, ScaleMode};

/// Gesture state for one stage, keyed by [`ShapeId`].
///
/// The engine never owns the stage; every phase borrows it. Events come back as
/// a list in emission order and the caller decides how to deliver them (see
/// [`Dispatcher`](crate::Dispatcher) for a listener registry that does).
#[derive(Clone, Debug)]
pub struct GestureEngine {
    config: GestureConfig,
    viewport: Viewport,
    drag: DragTracker,
    taps: TapTracker,
    hover: HoverState,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureEngine {
    /// Create an engine with the given configuration and a zero viewport.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            drag: DragTracker::new(),
            taps: TapTracker::new(config.tap, config.tap_window_ms),
            hover: HoverState::new(),
        }
    }

    /// Builder-style viewport setter.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport (the host moved or scrolled the stage).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Drag bindings.
    pub fn drag(&self) -> &DragTracker {
        &self.drag
    }

    /// Tap windows.
    pub fn taps(&self) -> &TapTracker {
        &self.taps
    }

    /// Hover state.
    pub fn hover(&self) -> &HoverState {
        &self.hover
    }

    /// Normalize a raw event using this engine's viewport and scale mode.
    pub fn samples<C: Content>(&self, stage: &Stage<C>, raw: &RawInput) -> Vec<Sample> {
        let ratio = match self.config.scale {
            ScaleMode::Applied => stage.scale_ratio(),
            ScaleMode::Fixed => 1.0,
        };
        normalize(&self.viewport, ratio, raw)
    }

    /// Close tap windows whose deadline is at or before `now`.
    pub fn tick(&mut self, now: u64) -> usize {
        let closed = self.taps.expire(now);
        if closed > 0 {
            log::trace!("engine: {closed} tap window(s) expired at {now}");
        }
        closed
    }

    /// Earliest time at which [`GestureEngine::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        self.taps.next_deadline()
    }

    /// Drop every piece of gesture state held for a shape, cancelling its timers.
    pub fn forget(&mut self, id: ShapeId) {
        let dragging = self.drag.forget(id);
        let tapping = self.taps.forget(id);
        let hovered = self.hover.forget(id);
        if dragging || tapping || hovered {
            log::debug!("engine: forgot {id:?}");
        }
    }

    /// Drop gesture state of shapes no longer on the stage.
    pub fn retain_alive<C: Content>(&mut self, stage: &Stage<C>) {
        self.drag.retain_alive(stage);
        self.taps.retain_alive(stage);
        let dead: Vec<ShapeId> = self.hover.hovered().filter(|id| !stage.is_alive(*id)).collect();
        for id in dead {
            self.hover.forget(id);
        }
    }

    /// Mouse down / touch start.
    pub fn pointer_down<C: Content>(
        &mut self,
        stage: &mut Stage<C>,
        raw: &RawInput,
        now: u64,
    ) -> Vec<GestureEvent> {
        self.prepare(stage, now);
        let samples = self.phase_samples(stage, raw);
        log::trace!("engine: start with {} sample(s)", samples.len());
        let mut out = self.drag.start(stage, &samples);
        out.extend(input_events(stage, &samples, Phase::Start));
        let drag = &self.drag;
        out.extend(self.taps.start(stage, &samples, now, |id| drag.is_moving(id)));
        out
    }

    /// Mouse move / touch move.
    pub fn pointer_move<C: Content>(
        &mut self,
        stage: &mut Stage<C>,
        raw: &RawInput,
        now: u64,
    ) -> Vec<GestureEvent> {
        self.prepare(stage, now);
        let samples = self.phase_samples(stage, raw);
        let mut out = self
            .drag
            .moved(stage, &samples, self.config.drag_axis_lock);
        let moved: Vec<ShapeId> = out
            .iter()
            .filter(|e| e.kind() == GestureKind::DragMove)
            .map(|e| e.shape)
            .collect();
        if !moved.is_empty() {
            stage.request_redraw();
        }
        out.extend(input_events(stage, &samples, Phase::Move));
        self.taps.moved(&moved);
        out.extend(self.hover.update(stage, &samples));
        out
    }

    /// Mouse up / touch end.
    ///
    /// For touch events, `raw` lists the touches still down; an empty list (the
    /// last finger lifted) releases every drag and resolves no input events. A
    /// mouse event (no touch list) releases every drag.
    pub fn pointer_up<C: Content>(
        &mut self,
        stage: &mut Stage<C>,
        raw: &RawInput,
        now: u64,
    ) -> Vec<GestureEvent> {
        self.prepare(stage, now);
        let samples = self.phase_samples(stage, raw);
        let mut out = self.drag.end(stage, &samples, !raw.is_touch());
        out.extend(input_events(stage, &samples, Phase::End));
        out.extend(self.taps.end(stage));
        out
    }

    /// Host click.
    pub fn click<C: Content>(
        &mut self,
        stage: &mut Stage<C>,
        raw: &RawInput,
        now: u64,
    ) -> Vec<GestureEvent> {
        self.prepare(stage, now);
        let samples = self.phase_samples(stage, raw);
        let drag = &self.drag;
        click_events(stage, &samples, |id| drag.is_moving(id))
    }

    /// The pointer left the stage: report [`Gesture::MouseOut`](crate::Gesture::MouseOut)
    /// for every hovered shape.
    pub fn pointer_leave(&mut self) -> Vec<GestureEvent> {
        self.hover.clear()
    }

    // A touch event with no touches left means no pointer is down: there is
    // nothing to hit test, and bound pointers are all missing.
    fn phase_samples<C: Content>(&self, stage: &Stage<C>, raw: &RawInput) -> Vec<Sample> {
        if raw.touches.as_ref().is_some_and(Vec::is_empty) {
            return Vec::new();
        }
        self.samples(stage, raw)
    }

    fn prepare<C: Content>(&mut self, stage: &Stage<C>, now: u64) {
        self.retain_alive(stage);
        self.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::RawTouch;
    use crate::types::{Gesture, TapRecognition};
    use kurbo::{Point, Rect, Size, Vec2};
    use understory_stage::{LocalShape, ShapeFlags};

    struct Block(Rect);

    impl Content for Block {
        type Bitmap = ();
        fn render(&self) {}
        fn contains(&self, local: Point) -> bool {
            self.0.contains(local)
        }
    }

    fn draggable(stage: &mut Stage<Block>, x: f64, y: f64) -> ShapeId {
        stage.insert(
            Block(Rect::new(0.0, 0.0, 50.0, 50.0)),
            LocalShape {
                position: Point::new(x, y),
                flags: ShapeFlags::default() | ShapeFlags::DRAGGABLE,
            },
        )
    }

    fn mouse(x: f64, y: f64) -> RawInput {
        RawInput::mouse(Point::new(x, y))
    }

    fn touch(id: u64, x: f64, y: f64) -> RawTouch {
        RawTouch {
            id,
            client: Point::new(x, y),
        }
    }

    fn kinds(events: &[GestureEvent]) -> Vec<GestureKind> {
        events.iter().map(GestureEvent::kind).collect()
    }

    #[test]
    fn drag_cycle_moves_shape_and_requests_redraw() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = draggable(&mut stage, 0.0, 0.0);
        let mut engine = GestureEngine::default();

        let down = engine.pointer_down(&mut stage, &mouse(10.0, 10.0), 0);
        assert_eq!(kinds(&down), [GestureKind::DragStart]);

        let m1 = engine.pointer_move(&mut stage, &mouse(15.0, 12.0), 10);
        let m2 = engine.pointer_move(&mut stage, &mouse(15.0, 20.0), 20);
        let delta = |ev: &[GestureEvent]| match ev[0].gesture {
            Gesture::DragMove { delta, .. } => delta,
            _ => Vec2::ZERO,
        };
        assert_eq!(delta(&m1), Vec2::new(5.0, 2.0));
        assert_eq!(delta(&m2), Vec2::new(0.0, 8.0));
        assert_eq!(stage.position(id), Some(Point::new(5.0, 10.0)));
        assert!(stage.redraw_pending());

        // Mouse up carries no touch list: the mouse-bound drag ends, no tap fires.
        let up = engine.pointer_up(&mut stage, &mouse(15.0, 20.0), 30);
        assert_eq!(kinds(&up), [GestureKind::DragEnd]);
        assert!(!engine.drag().is_dragging(id));
    }

    #[test]
    fn still_press_is_a_tap() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = draggable(&mut stage, 0.0, 0.0);
        let mut engine = GestureEngine::default();
        let _ = engine.pointer_down(&mut stage, &mouse(10.0, 10.0), 0);
        let up = engine.pointer_up(&mut stage, &mouse(10.0, 10.0), 50);
        assert_eq!(kinds(&up), [GestureKind::DragEnd, GestureKind::Tap]);
        assert!(up.iter().all(|e| e.shape == id));
    }

    #[test]
    fn scale_mode_fixed_ignores_stage_ratio() {
        let mut stage: Stage<Block> = Stage::new(Size::new(200.0, 200.0));
        stage.set_scale_ratio(2.0);
        let applied = GestureEngine::default();
        let fixed = GestureEngine::new(GestureConfig {
            scale: ScaleMode::Fixed,
            ..GestureConfig::default()
        });
        assert_eq!(applied.samples(&stage, &mouse(3.0, 4.0))[0].pos, Point::new(6.0, 8.0));
        assert_eq!(fixed.samples(&stage, &mouse(3.0, 4.0))[0].pos, Point::new(3.0, 4.0));
    }

    #[test]
    fn two_touches_drag_two_shapes() {
        let mut stage = Stage::new(Size::new(300.0, 200.0));
        let a = draggable(&mut stage, 0.0, 0.0);
        let b = draggable(&mut stage, 100.0, 0.0);
        let mut engine = GestureEngine::default();

        let down = engine.pointer_down(
            &mut stage,
            &RawInput::touches([touch(1, 10.0, 10.0), touch(2, 110.0, 10.0)]),
            0,
        );
        let starts: Vec<ShapeId> = down
            .iter()
            .filter(|e| e.kind() == GestureKind::DragStart)
            .map(|e| e.shape)
            .collect();
        assert_eq!(starts, [b, a]);

        let _ = engine.pointer_move(
            &mut stage,
            &RawInput::touches([touch(1, 12.0, 10.0), touch(2, 110.0, 15.0)]),
            10,
        );
        assert_eq!(stage.position(a), Some(Point::new(2.0, 0.0)));
        assert_eq!(stage.position(b), Some(Point::new(100.0, 5.0)));

        // Touch 1 lifts; touch 2 keeps dragging.
        let up = engine.pointer_up(&mut stage, &RawInput::touches([touch(2, 110.0, 15.0)]), 20);
        assert_eq!(kinds(&up), [GestureKind::DragEnd]);
        assert_eq!(up[0].shape, a);
        assert!(engine.drag().is_dragging(b));
    }

    #[test]
    fn counter_mode_double_tap() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = stage.insert(Block(Rect::new(0.0, 0.0, 50.0, 50.0)), LocalShape::default());
        let mut engine = GestureEngine::new(GestureConfig {
            tap: TapRecognition::Counter,
            ..GestureConfig::default()
        });
        let mut taps = Vec::new();
        for now in [0, 100, 200, 300] {
            taps.extend(engine.pointer_down(&mut stage, &mouse(5.0, 5.0), now));
            let _ = engine.pointer_up(&mut stage, &mouse(5.0, 5.0), now + 10);
        }
        let doubles: Vec<ShapeId> = taps
            .iter()
            .filter(|e| e.kind() == GestureKind::DoubleTap)
            .map(|e| e.shape)
            .collect();
        assert_eq!(doubles, [id, id]);
    }

    #[test]
    fn expired_window_is_closed_by_next_phase() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = stage.insert(Block(Rect::new(0.0, 0.0, 50.0, 50.0)), LocalShape::default());
        let mut engine = GestureEngine::default();
        let _ = engine.pointer_down(&mut stage, &mouse(5.0, 5.0), 0);
        assert_eq!(engine.next_deadline(), Some(300));
        // The up phase arrives after the window closed: the tap is gone.
        let up = engine.pointer_up(&mut stage, &mouse(5.0, 5.0), 400);
        assert!(up.iter().all(|e| e.kind() != GestureKind::Tap));
        assert!(engine.taps().taps(id).is_empty());
    }

    #[test]
    fn hover_and_leave() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = stage.insert(Block(Rect::new(0.0, 0.0, 50.0, 50.0)), LocalShape::default());
        let mut engine = GestureEngine::default();
        let ev = engine.pointer_move(&mut stage, &mouse(5.0, 5.0), 0);
        assert_eq!(kinds(&ev), [GestureKind::InputMove, GestureKind::MouseOver]);
        assert!(engine.hover().is_hovered(id));
        assert_eq!(kinds(&engine.pointer_leave()), [GestureKind::MouseOut]);
    }

    #[test]
    fn last_touch_lift_resolves_no_position() {
        let mut stage = Stage::new(Size::new(400.0, 400.0));
        let background =
            stage.insert(Block(Rect::new(0.0, 0.0, 400.0, 400.0)), LocalShape::default());
        let mut engine = GestureEngine::default();

        let down = engine.pointer_down(&mut stage, &RawInput::touches([touch(1, 300.0, 300.0)]), 0);
        assert!(down.iter().any(|e| e.shape == background && e.kind() == GestureKind::InputStart));

        let up = engine.pointer_up(&mut stage, &RawInput::touches([]), 40);
        assert!(
            up.iter().all(|e| e.kind() != GestureKind::InputEnd),
            "an empty touch list has no position to resolve"
        );
        // The tap claimed at start is still reported.
        assert_eq!(kinds(&up), [GestureKind::Tap]);
    }

    #[test]
    fn empty_touch_list_releases_mouse_drag() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = draggable(&mut stage, 0.0, 0.0);
        let mut engine = GestureEngine::default();
        let _ = engine.pointer_down(&mut stage, &mouse(10.0, 10.0), 0);
        let up = engine.pointer_up(&mut stage, &RawInput::touches([]), 10);
        assert_eq!(kinds(&up), [GestureKind::DragEnd, GestureKind::Tap]);
        assert!(!engine.drag().is_dragging(id));
    }

    #[test]
    fn removed_shape_state_is_pruned() {
        let mut stage = Stage::new(Size::new(200.0, 200.0));
        let id = draggable(&mut stage, 0.0, 0.0);
        let mut engine = GestureEngine::default();
        let _ = engine.pointer_down(&mut stage, &mouse(5.0, 5.0), 0);
        let _ = stage.remove(id);
        let ev = engine.pointer_move(&mut stage, &mouse(9.0, 9.0), 10);
        assert!(ev.is_empty());
        assert!(engine.drag().is_empty());
        assert_eq!(engine.next_deadline(), None);
    }
}
