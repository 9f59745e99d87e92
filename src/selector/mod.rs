//! # Selector Module
//!
//! Picks tracks from a candidate pool so that their combined running time
//! lands on a requested duration, give or take a small allowance.
//!
//! ## Overview
//!
//! One selection request is a bounded randomized search:
//!
//! ```text
//! Selector::select
//!     ├── pre-checks (empty pool, pool too short)
//!     └── background attempt loop (spawn_blocking)
//!             shuffle ──► greedy fit ──► gap fill
//!                 ▲                          │
//!                 └──────── rejected ────────┘
//!     raced against the time budget and a CancelToken
//! ```
//!
//! - [`shuffle`] - Fisher-Yates permutation of the pool, once per attempt
//! - [`fitter`] - greedy accumulation up to the target, dropping the overshoot
//! - [`gap_filler`] - single closest track to close the remaining gap
//! - [`orchestrator`] - the time-bounded retry harness
//! - [`classify`] - failure labeling and the [`Outcome`] type
//! - [`policy`] - tolerance constants and the comparison mode
//!
//! The search is a heuristic. It stops at the first acceptable selection,
//! not at the best one.
//!
//! ## Guarantees
//!
//! For every [`Outcome::Success`], the selected tracks sum to at most the
//! target and fall short of it by at most the allowance. No background work
//! survives the call, whether it ends in success, timeout or cancellation.

pub mod cancel;
pub mod classify;
pub mod fitter;
pub mod gap_filler;
pub mod orchestrator;
pub mod policy;
pub mod shuffle;

pub use cancel::CancelToken;
pub use classify::{Interrupt, Outcome, SelectionError, classify};
pub use fitter::{Fit, Selection, fit};
pub use gap_filler::fill_gap;
pub use orchestrator::{DEFAULT_BUDGET, SelectionReport, Selector};
pub use policy::{ALLOWANCE_MS, AllowanceComparison, MIN_DURATION_FOR_ALLOWANCE_MS, SelectionPolicy};
pub use shuffle::{shuffle, shuffle_in_place};

use crate::types::Track;

/// Anything with a running time the selector can add up.
pub trait Playable {
    fn duration_ms(&self) -> u64;
}

impl Playable for Track {
    fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl Playable for u64 {
    fn duration_ms(&self) -> u64 {
        *self
    }
}

impl<T: Playable + ?Sized> Playable for &T {
    fn duration_ms(&self) -> u64 {
        (**self).duration_ms()
    }
}

/// Sum of the running times of `items`.
pub fn total_duration_ms<T: Playable>(items: &[T]) -> u64 {
    items.iter().map(Playable::duration_ms).sum()
}
