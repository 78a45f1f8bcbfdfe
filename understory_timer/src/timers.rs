// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer queue: generational task slots plus a deadline-ordered queue.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Generational handle for a scheduled task.
///
/// A `TaskId` is valid from [`Timers::schedule`] until the task is cancelled or expires.
/// Afterwards it is stale: slot reuse bumps the generation, so a stale id never
/// refers to a newer task.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32, u32);

impl TaskId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Task ids are intentionally 32-bit; queues never hold 2^32 pending tasks."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Entry<P> {
    generation: u32,
    deadline: u64,
    seq: u64,
    payload: P,
}

/// A single-shot timer queue keyed by caller-supplied timestamps.
#[derive(Clone, Debug)]
pub struct Timers<P> {
    entries: Vec<Option<Entry<P>>>,
    generations: Vec<u32>, // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    // (deadline, seq) -> slot; `seq` keeps equal deadlines in scheduling order.
    queue: BTreeMap<(u64, u64), usize>,
    next_seq: u64,
}

impl<P> Default for Timers<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Timers<P> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to expire at the absolute time `deadline`.
    pub fn schedule(&mut self, deadline: u64, payload: P) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.entries.push(None);
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        self.entries[idx] = Some(Entry {
            generation,
            deadline,
            seq,
            payload,
        });
        self.queue.insert((deadline, seq), idx);
        TaskId::new(idx, generation)
    }

    /// Schedule `payload` to expire `delay` after `now`.
    pub fn schedule_after(&mut self, now: u64, delay: u64, payload: P) -> TaskId {
        self.schedule(now.saturating_add(delay), payload)
    }

    /// Cancel a pending task and return its payload.
    ///
    /// Returns `None` if the id is stale (already cancelled or expired).
    pub fn cancel(&mut self, id: TaskId) -> Option<P> {
        if !self.is_pending(id) {
            return None;
        }
        let entry = self.entries[id.idx()].take()?;
        self.queue.remove(&(entry.deadline, entry.seq));
        self.free_list.push(id.idx());
        Some(entry.payload)
    }

    /// Returns true if `id` refers to a task that has neither fired nor been cancelled.
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.entries
            .get(id.idx())
            .and_then(|e| e.as_ref())
            .is_some_and(|e| e.generation == id.1)
    }

    /// Deadline of a pending task.
    pub fn deadline(&self, id: TaskId) -> Option<u64> {
        if !self.is_pending(id) {
            return None;
        }
        self.entries[id.idx()].as_ref().map(|e| e.deadline)
    }

    /// Earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Remove and return every task whose deadline is at or before `now`.
    ///
    /// Ids of returned tasks are stale after this call.
    pub fn expire(&mut self, now: u64) -> Vec<(TaskId, P)> {
        let mut out = Vec::new();
        while let Some((&(deadline, _), _)) = self.queue.first_key_value() {
            if deadline > now {
                break;
            }
            let Some((_, idx)) = self.queue.pop_first() else {
                break;
            };
            if let Some(entry) = self.entries[idx].take() {
                self.free_list.push(idx);
                out.push((TaskId::new(idx, entry.generation), entry.payload));
            }
        }
        out
    }

    /// Cancel every pending task whose payload fails the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&P) -> bool) {
        for idx in 0..self.entries.len() {
            let drop_it = self.entries[idx]
                .as_ref()
                .is_some_and(|e| !keep(&e.payload));
            if drop_it && let Some(entry) = self.entries[idx].take() {
                self.queue.remove(&(entry.deadline, entry.seq));
                self.free_list.push(idx);
            }
        }
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending task. Outstanding ids become stale.
    pub fn clear(&mut self) {
        for idx in 0..self.entries.len() {
            if self.entries[idx].take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.queue.clear();
    }
}
