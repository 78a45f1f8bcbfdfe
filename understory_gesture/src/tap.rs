// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap and double-tap recognition over a fixed timing window.
//!
//! Two recognizers share one per-shape window record:
//!
//! - [`TapRecognition::Accumulator`]: start phases append the claimed sample to
//!   the shape's tap list, any move phase empties every list, and end phases emit
//!   [`Gesture::Tap`] for every shape whose list is non-empty. The list survives
//!   until its window expires, so quick repeated taps report the whole run.
//! - [`TapRecognition::Counter`]: start phases bump the shape's counter and emit
//!   [`Gesture::DoubleTap`] when it reaches two, resetting it.
//!
//! A window opens with the first tap of a sequence and is a cancellable task in a
//! [`Timers`] queue. Emptying a window early cancels its task, so a late expiry
//! can never clear a sequence that started after it.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use understory_stage::{Content, ShapeId, Stage};
use understory_timer::{TaskId, Timers};

use crate::claim::claim_topmost;
use crate::sample::Sample;
use crate::types::{Gesture, GestureEvent, TAP_WINDOW_MS, TapRecognition};

#[derive(Clone, Debug, Default)]
struct TapWindow {
    samples: Vec<Sample>,
    count: u32,
    timer: Option<TaskId>,
}

impl TapWindow {
    fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.count == 0
    }
}

/// Per-shape tap windows and their expiry timers.
#[derive(Clone, Debug)]
pub struct TapTracker {
    mode: TapRecognition,
    window_ms: u64,
    windows: BTreeMap<ShapeId, TapWindow>,
    timers: Timers<ShapeId>,
}

impl Default for TapTracker {
    fn default() -> Self {
        Self::new(TapRecognition::default(), TAP_WINDOW_MS)
    }
}

impl TapTracker {
    /// Create a tracker running `mode` with a window of `window_ms`.
    pub fn new(mode: TapRecognition, window_ms: u64) -> Self {
        Self {
            mode,
            window_ms,
            windows: BTreeMap::new(),
            timers: Timers::new(),
        }
    }

    /// Active recognizer.
    pub fn mode(&self) -> TapRecognition {
        self.mode
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Taps accumulated for a shape in its current window.
    pub fn taps(&self, id: ShapeId) -> &[Sample] {
        self.windows.get(&id).map_or(&[], |w| w.samples.as_slice())
    }

    /// Tap count for a shape in its current window.
    pub fn count(&self, id: ShapeId) -> u32 {
        self.windows.get(&id).map_or(0, |w| w.count)
    }

    /// Earliest pending window expiry.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Start phase at time `now`.
    ///
    /// Shapes for which `is_moving` returns true do not take taps. In counter
    /// mode the returned events are the double taps completed by this phase.
    pub fn start<C: Content>(
        &mut self,
        stage: &Stage<C>,
        samples: &[Sample],
        now: u64,
        is_moving: impl Fn(ShapeId) -> bool,
    ) -> Vec<GestureEvent> {
        let claims = claim_topmost(stage, samples, &[], |id| !is_moving(id));
        let mut out = Vec::new();
        for (id, sample) in claims {
            let window = self.windows.entry(id).or_default();
            if window.is_empty() {
                if let Some(stale) = window.timer.take() {
                    self.timers.cancel(stale);
                }
                window.timer = Some(self.timers.schedule_after(now, self.window_ms, id));
            }
            match self.mode {
                TapRecognition::Accumulator => window.samples.push(sample),
                TapRecognition::Counter => {
                    window.count += 1;
                    if window.count >= 2 {
                        log::trace!("tap: double tap on {id:?}");
                        out.push(GestureEvent::new(id, Gesture::DoubleTap { sample }));
                        self.close(id);
                    }
                }
            }
        }
        out
    }

    /// Move phase.
    ///
    /// The accumulator drops every tap list. The counter resets only the shapes
    /// in `moved` (those translated by a drag during this phase).
    pub fn moved(&mut self, moved: &[ShapeId]) {
        match self.mode {
            TapRecognition::Accumulator => {
                let ids: Vec<ShapeId> = self.windows.keys().copied().collect();
                for id in ids {
                    self.close(id);
                }
            }
            TapRecognition::Counter => {
                for id in moved {
                    self.close(*id);
                }
            }
        }
    }

    /// End phase: emit [`Gesture::Tap`] for every shape holding taps, in stage order.
    ///
    /// Counter mode emits nothing here.
    pub fn end<C: Content>(&self, stage: &Stage<C>) -> Vec<GestureEvent> {
        if self.mode == TapRecognition::Counter {
            return Vec::new();
        }
        stage
            .ids_bottom_to_top()
            .filter_map(|id| {
                let window = self.windows.get(&id)?;
                let sample = *window.samples.last()?;
                Some(GestureEvent::new(
                    id,
                    Gesture::Tap {
                        sample,
                        taps: window.samples.clone(),
                    },
                ))
            })
            .collect()
    }

    /// Close every window whose deadline is at or before `now`.
    ///
    /// Returns the number of windows closed.
    pub fn expire(&mut self, now: u64) -> usize {
        let mut closed = 0;
        for (task, id) in self.timers.expire(now) {
            let current = self.windows.get(&id).is_some_and(|w| w.timer == Some(task));
            if current {
                self.windows.remove(&id);
                closed += 1;
            }
        }
        closed
    }

    /// Drop a shape's window and cancel its timer.
    pub fn forget(&mut self, id: ShapeId) -> bool {
        self.close(id)
    }

    /// Drop windows of shapes that are no longer on the stage.
    pub fn retain_alive<C: Content>(&mut self, stage: &Stage<C>) {
        let dead: Vec<ShapeId> = self
            .windows
            .keys()
            .copied()
            .filter(|id| !stage.is_alive(*id))
            .collect();
        for id in dead {
            self.close(id);
        }
        self.timers.retain(|id| stage.is_alive(*id));
    }

    fn close(&mut self, id: ShapeId) -> bool {
        let Some(window) = self.windows.remove(&id) else {
            return false;
        };
        if let Some(task) = window.timer {
            self.timers.cancel(task);
        }
        true
    }
}
