// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw positional channels: `Input*` phases and host clicks.
//!
//! The input channel mirrors the start/move/end phases for shapes that want
//! positions without gesture semantics. Draggable shapes never receive it; each
//! phase claims samples topmost first, like a drag start.

use alloc::vec::Vec;
use understory_stage::{Content, QueryFilter, ShapeId, Stage};

use crate::claim::claim_topmost;
use crate::sample::Sample;
use crate::types::{Gesture, GestureEvent, Phase};

/// Resolve one phase of the input channel.
pub fn input_events<C: Content>(
    stage: &Stage<C>,
    samples: &[Sample],
    phase: Phase,
) -> Vec<GestureEvent> {
    claim_topmost(stage, samples, &[], |id| !stage.is_draggable(id))
        .into_iter()
        .map(|(id, sample)| {
            let gesture = match phase {
                Phase::Start => Gesture::InputStart { sample },
                Phase::Move => Gesture::InputMove { sample },
                Phase::End => Gesture::InputEnd { sample },
            };
            GestureEvent::new(id, gesture)
        })
        .collect()
}

/// Resolve a host click.
///
/// Each sample clicks only the topmost shape under it. When that shape is being
/// dragged around (`is_moving`) the click is dropped; it does not fall through
/// to shapes below. A shape receives at most one click per call.
pub fn click_events<C: Content>(
    stage: &Stage<C>,
    samples: &[Sample],
    is_moving: impl Fn(ShapeId) -> bool,
) -> Vec<GestureEvent> {
    let mut out: Vec<GestureEvent> = Vec::new();
    for sample in samples {
        let Some(id) = stage.hit_test_point(sample.pos, QueryFilter::default()) else {
            continue;
        };
        if is_moving(id) || out.iter().any(|e| e.shape == id) {
            continue;
        }
        out.push(GestureEvent::new(id, Gesture::Click { sample: *sample }));
    }
    out
}
