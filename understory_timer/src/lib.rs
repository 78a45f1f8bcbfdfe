// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timer --heading-base-level=0

//! Understory Timer: a deterministic, cancellable single-shot timer queue.
//!
//! Understory Timer is a small building block for state machines that need
//! "do this later" without owning a clock or an executor.
//!
//! - Schedule a payload for a deadline and receive a generational [`TaskId`].
//! - Cancel a pending task; a cancelled or expired [`TaskId`] goes stale and never aliases a newer task.
//! - Drain every task whose deadline has passed with [`Timers::expire`].
//!
//! Time is an opaque, monotonically non-decreasing `u64` supplied by the caller (milliseconds in
//! the gesture crates). Nothing happens between calls: the host decides when to call
//! [`Timers::expire`], which keeps tests and replays fully deterministic.
//!
//! ## Ordering
//!
//! Expired tasks are returned by ascending deadline.
//! Tasks sharing a deadline are returned in scheduling order.
//!
//! # Example
//!
//! ```rust
//! use understory_timer::Timers;
//!
//! let mut timers: Timers<&str> = Timers::new();
//! let a = timers.schedule_after(0, 300, "clear taps");
//! let b = timers.schedule_after(0, 100, "blink");
//! assert_eq!(timers.next_deadline(), Some(100));
//!
//! // Cancel one task; its id is now stale.
//! assert_eq!(timers.cancel(b), Some("blink"));
//! assert!(!timers.is_pending(b));
//!
//! // Nothing is due yet.
//! assert!(timers.expire(299).is_empty());
//!
//! let due = timers.expire(300);
//! assert_eq!(due, vec![(a, "clear taps")]);
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod timers;

pub use timers::{TaskId, Timers};
