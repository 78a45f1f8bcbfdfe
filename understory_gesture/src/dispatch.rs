// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry and the dispatch facade.
//!
//! [`Listeners`] maps `(shape, gesture kind)` to an ordered list of callbacks.
//! [`Dispatcher`] owns a [`Stage`], a [`GestureEngine`] and a registry. It runs
//! the engine for one phase, collects the events, then delivers them in order.
//!
//! Listeners get an [`EventContext`] with mutable access to the stage, so they
//! can move, restyle or remove shapes. Events addressed to a shape removed by an
//! earlier listener in the same phase are dropped.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;
use kurbo::Size;
use understory_stage::{Canvas, Content, LocalShape, ShapeId, Stage};

use crate::engine::GestureEngine;
use crate::sample::RawInput;
use crate::types::{Gesture, GestureConfig, GestureEvent, GestureKind};

/// Context handed to a listener.
pub struct EventContext<'a, C: Content> {
    stage: &'a mut Stage<C>,
    event: &'a GestureEvent,
    default_prevented: bool,
}

impl<C: Content> fmt::Debug for EventContext<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("event", self.event)
            .field("default_prevented", &self.default_prevented)
            .finish_non_exhaustive()
    }
}

impl<C: Content> EventContext<'_, C> {
    /// Shape the event is addressed to.
    pub fn shape(&self) -> ShapeId {
        self.event.shape
    }

    /// The resolved event.
    pub fn event(&self) -> &GestureEvent {
        self.event
    }

    /// The gesture and its payload.
    pub fn gesture(&self) -> &Gesture {
        &self.event.gesture
    }

    /// The stage.
    pub fn stage(&self) -> &Stage<C> {
        &*self.stage
    }

    /// Mutable access to the stage.
    pub fn stage_mut(&mut self) -> &mut Stage<C> {
        &mut *self.stage
    }

    /// Ask the host not to run its default action for this phase.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// True if a listener already called [`EventContext::prevent_default`] in this phase.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A boxed gesture listener.
pub type Listener<C> = Box<dyn FnMut(&mut EventContext<'_, C>)>;

/// Ordered listener lists keyed by shape and gesture kind.
pub struct Listeners<C: Content> {
    map: BTreeMap<(ShapeId, GestureKind), Vec<Listener<C>>>,
}

impl<C: Content> Default for Listeners<C> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<C: Content> fmt::Debug for Listeners<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for (key, list) in &self.map {
            m.entry(key, &list.len());
        }
        m.finish()
    }
}

impl<C: Content> Listeners<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Listeners of one kind run in bind order.
    pub fn bind(
        &mut self,
        shape: ShapeId,
        kind: GestureKind,
        listener: impl FnMut(&mut EventContext<'_, C>) + 'static,
    ) {
        self.map
            .entry((shape, kind))
            .or_default()
            .push(Box::new(listener));
    }

    /// Remove every listener of `kind` on `shape`. Returns how many were removed.
    pub fn unbind(&mut self, shape: ShapeId, kind: GestureKind) -> usize {
        self.map.remove(&(shape, kind)).map_or(0, |l| l.len())
    }

    /// Remove every listener on `shape`.
    pub fn unbind_all(&mut self, shape: ShapeId) -> usize {
        let mut removed = 0;
        self.map.retain(|(s, _), list| {
            if *s == shape {
                removed += list.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of listeners bound for `(shape, kind)`.
    pub fn count(&self, shape: ShapeId, kind: GestureKind) -> usize {
        self.map.get(&(shape, kind)).map_or(0, Vec::len)
    }

    /// Drop listeners of shapes that are no longer on the stage.
    pub fn retain_alive(&mut self, stage: &Stage<C>) {
        self.map.retain(|(s, _), _| stage.is_alive(*s));
    }

    /// Deliver one event. Returns how many listeners ran.
    fn deliver(&mut self, stage: &mut Stage<C>, event: &GestureEvent, prevented: &mut bool) -> usize {
        let Some(list) = self.map.get_mut(&(event.shape, event.kind())) else {
            return 0;
        };
        let mut cx = EventContext {
            stage,
            event,
            default_prevented: *prevented,
        };
        for listener in list.iter_mut() {
            listener(&mut cx);
        }
        *prevented = cx.default_prevented;
        list.len()
    }
}

/// Outcome of one dispatched phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    /// Resolved events, in emission order.
    pub events: Vec<GestureEvent>,
    /// Number of listener invocations.
    pub delivered: usize,
    /// True if any listener asked to prevent the host default for this phase.
    pub default_prevented: bool,
}

/// A stage, its gesture engine and its listeners.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use understory_gesture::{Dispatcher, GestureConfig, GestureKind, RawInput};
/// use understory_stage::{Content, LocalShape, ShapeFlags};
/// use kurbo::{Point, Rect, Size};
///
/// struct Block(Rect);
/// impl Content for Block {
///     type Bitmap = ();
///     fn render(&self) {}
///     fn contains(&self, p: Point) -> bool { self.0.contains(p) }
/// }
///
/// let mut d = Dispatcher::new(Size::new(200.0, 200.0), GestureConfig::default());
/// let id = d.insert(
///     Block(Rect::new(0.0, 0.0, 50.0, 50.0)),
///     LocalShape { flags: ShapeFlags::default() | ShapeFlags::DRAGGABLE, ..Default::default() },
/// );
///
/// let ends = Rc::new(Cell::new(0));
/// let seen = ends.clone();
/// d.bind(id, GestureKind::DragEnd, move |cx| {
///     seen.set(seen.get() + 1);
///     cx.prevent_default();
/// });
///
/// d.pointer_down(&RawInput::mouse(Point::new(10.0, 10.0)), 0);
/// d.pointer_move(&RawInput::mouse(Point::new(30.0, 10.0)), 16);
/// let up = d.pointer_up(&RawInput::mouse(Point::new(30.0, 10.0)), 32);
///
/// assert_eq!(ends.get(), 1);
/// assert!(up.default_prevented);
/// assert_eq!(d.stage().position(id), Some(Point::new(20.0, 0.0)));
/// ```
pub struct Dispatcher<C: Content> {
    stage: Stage<C>,
    engine: GestureEngine,
    listeners: Listeners<C>,
}

impl<C: Content> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("shapes", &self.stage.len())
            .field("engine", &self.engine)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<C: Content> Dispatcher<C> {
    /// Create a dispatcher over an empty stage of `size`.
    pub fn new(size: Size, config: GestureConfig) -> Self {
        Self::with_stage(Stage::new(size), GestureEngine::new(config))
    }

    /// Wrap an existing stage and engine.
    pub fn with_stage(stage: Stage<C>, engine: GestureEngine) -> Self {
        Self {
            stage,
            engine,
            listeners: Listeners::new(),
        }
    }

    /// The stage.
    pub fn stage(&self) -> &Stage<C> {
        &self.stage
    }

    /// Mutable access to the stage.
    ///
    /// Gesture state and listeners of shapes removed through this handle are
    /// dropped at the start of the next phase.
    pub fn stage_mut(&mut self) -> &mut Stage<C> {
        &mut self.stage
    }

    /// The gesture engine.
    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    /// Mutable access to the gesture engine (viewport updates).
    pub fn engine_mut(&mut self) -> &mut GestureEngine {
        &mut self.engine
    }

    /// The listener registry.
    pub fn listeners(&self) -> &Listeners<C> {
        &self.listeners
    }

    /// Insert a shape on top of the stage.
    pub fn insert(&mut self, content: C, local: LocalShape) -> ShapeId {
        self.stage.insert(content, local)
    }

    /// Remove a shape with its gesture state and listeners.
    pub fn remove(&mut self, id: ShapeId) -> Option<C> {
        self.engine.forget(id);
        self.listeners.unbind_all(id);
        self.stage.remove(id)
    }

    /// See [`Listeners::bind`].
    pub fn bind(
        &mut self,
        shape: ShapeId,
        kind: GestureKind,
        listener: impl FnMut(&mut EventContext<'_, C>) + 'static,
    ) {
        self.listeners.bind(shape, kind, listener);
    }

    /// See [`Listeners::unbind`].
    pub fn unbind(&mut self, shape: ShapeId, kind: GestureKind) -> usize {
        self.listeners.unbind(shape, kind)
    }

    /// Mouse down / touch start at time `now` (milliseconds).
    pub fn pointer_down(&mut self, raw: &RawInput, now: u64) -> Response {
        self.listeners.retain_alive(&self.stage);
        let events = self.engine.pointer_down(&mut self.stage, raw, now);
        self.deliver(events)
    }

    /// Mouse move / touch move.
    pub fn pointer_move(&mut self, raw: &RawInput, now: u64) -> Response {
        self.listeners.retain_alive(&self.stage);
        let events = self.engine.pointer_move(&mut self.stage, raw, now);
        self.deliver(events)
    }

    /// Mouse up / touch end.
    pub fn pointer_up(&mut self, raw: &RawInput, now: u64) -> Response {
        self.listeners.retain_alive(&self.stage);
        let events = self.engine.pointer_up(&mut self.stage, raw, now);
        self.deliver(events)
    }

    /// Host click.
    pub fn click(&mut self, raw: &RawInput, now: u64) -> Response {
        self.listeners.retain_alive(&self.stage);
        let events = self.engine.click(&mut self.stage, raw, now);
        self.deliver(events)
    }

    /// The pointer left the stage.
    pub fn pointer_leave(&mut self) -> Response {
        let events = self.engine.pointer_leave();
        self.deliver(events)
    }

    /// Close tap windows due at `now`. Hosts call this from their timer at
    /// [`GestureEngine::next_deadline`].
    pub fn tick(&mut self, now: u64) -> usize {
        self.engine.tick(now)
    }

    /// Paint the stage if a redraw is pending. See [`Stage::flush`].
    pub fn flush(&mut self, canvas: &mut impl Canvas<C::Bitmap>) -> bool {
        let painted = self.stage.flush(canvas);
        if painted {
            log::debug!("dispatch: repainted {} shape(s)", self.stage.len());
        }
        painted
    }

    fn deliver(&mut self, events: Vec<GestureEvent>) -> Response {
        let mut response = Response::default();
        for event in &events {
            if !self.stage.is_alive(event.shape) {
                continue;
            }
            response.delivered +=
                self.listeners
                    .deliver(&mut self.stage, event, &mut response.default_prevented);
        }
        // Listeners may have removed shapes.
        if !events.is_empty() {
            self.engine.retain_alive(&self.stage);
            self.listeners.retain_alive(&self.stage);
        }
        response.events = events;
        response
    }
}
