// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-phase exclusive claims of samples by shapes.
//!
//! Shapes are visited topmost first. Each eligible shape takes the first sample
//! it contains that nobody claimed yet in this phase, so:
//!
//! - a sample is claimed by at most one shape, and
//! - a shape claims at most one sample,
//!
//! and where shapes overlap, the frontmost one wins.

use alloc::vec::Vec;
use understory_stage::{Content, ShapeId, Stage};

use crate::sample::{PointerId, Sample};

/// Claim samples for one phase.
///
/// Samples whose pointer appears in `taken` are treated as already claimed.
/// Returns `(shape, sample)` pairs in claim order (topmost shape first).
pub(crate) fn claim_topmost<C: Content>(
    stage: &Stage<C>,
    samples: &[Sample],
    taken: &[PointerId],
    mut eligible: impl FnMut(ShapeId) -> bool,
) -> Vec<(ShapeId, Sample)> {
    let mut claimed: Vec<bool> = samples
        .iter()
        .map(|s| taken.contains(&s.pointer))
        .collect();
    let mut out = Vec::new();
    for id in stage.ids_top_to_bottom() {
        if claimed.iter().all(|c| *c) {
            break;
        }
        if !eligible(id) {
            continue;
        }
        let hit = samples
            .iter()
            .enumerate()
            .find(|(i, s)| !claimed[*i] && stage.contains_point(id, s.pos));
        if let Some((i, sample)) = hit {
            claimed[i] = true;
            log::trace!("claim: {:?} -> {id:?}", sample.pointer);
            out.push((id, *sample));
        }
    }
    debug_assert!(
        {
            let mut shapes: Vec<ShapeId> = out.iter().map(|(id, _)| *id).collect();
            shapes.sort_unstable();
            shapes.windows(2).all(|w| w[0] != w[1])
        },
        "a shape claimed two samples in one phase"
    );
    out
}
