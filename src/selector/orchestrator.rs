use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use tokio::task::JoinHandle;

use super::{
    SelectionPolicy,
    total_duration_ms,
    cancel::{CancelOnDrop, CancelToken},
    classify::{Interrupt, Outcome, classify},
    fitter::fit,
    shuffle::shuffle_in_place,
};
use crate::types::Track;

/// Default wall-clock budget of one selection.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(15);

/// Outcome of a selection plus the diagnostics gathered on the way.
#[derive(Debug, Clone)]
pub struct SelectionReport {
    pub outcome: Outcome,
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Runs shuffle/fit attempts under a time budget until one fits.
#[derive(Debug, Clone)]
pub struct Selector {
    policy: SelectionPolicy,
    budget: Duration,
    attempt_counter: Option<Arc<AtomicU64>>,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(SelectionPolicy::default(), DEFAULT_BUDGET)
    }
}

/// Why the attempt loop returned.
enum LoopExit {
    Found(Vec<Track>),
    Stopped(Interrupt),
}

struct LoopResult {
    exit: LoopExit,
    attempts: u64,
}

enum Race {
    Finished(LoopResult),
    Interrupted(Interrupt),
}

impl Selector {
    pub fn new(policy: SelectionPolicy, budget: Duration) -> Self {
        Self {
            policy,
            budget,
            attempt_counter: None,
        }
    }

    /// Mirrors the per-call attempt count into `counter` while the loop runs.
    pub fn with_attempt_counter(mut self, counter: Arc<AtomicU64>) -> Self {
        self.attempt_counter = Some(counter);
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub async fn select(&self, pool: Vec<Track>, target_ms: u64, cancel: &CancelToken) -> Outcome {
        self.select_with_report(pool, target_ms, cancel).await.outcome
    }

    /// Selects tracks from `pool` adding up to `target_ms` within the allowance.
    ///
    /// The attempt loop runs on the blocking pool and only observes the
    /// deadline and `cancel` between attempts. The call returns after the
    /// loop has exited.
    pub async fn select_with_report(
        &self,
        pool: Vec<Track>,
        target_ms: u64,
        cancel: &CancelToken,
    ) -> SelectionReport {
        let started = Instant::now();

        if pool.is_empty() {
            tracing::debug!(target_ms, "empty pool, nothing to select from");
            return self.report(Outcome::PoolEmpty, 0, started);
        }

        let pool_ms = total_duration_ms(&pool);
        if pool_ms < target_ms {
            tracing::debug!(pool_ms, target_ms, "pool shorter than the target");
            return self.report(
                Outcome::PoolInsufficientDuration { pool_ms, target_ms },
                0,
                started,
            );
        }

        if cancel.is_cancelled() {
            return self.report(Outcome::Cancelled, 0, started);
        }

        let stop = CancelToken::new();
        let stop_guard = CancelOnDrop(stop.clone());
        let deadline = started + self.budget;

        let mut handle = self.spawn_attempts(pool, target_ms, deadline, stop.clone(), cancel.clone());

        let race = tokio::select! {
            biased;
            joined = &mut handle => Race::Finished(Self::joined(joined)),
            _ = cancel.cancelled() => Race::Interrupted(Interrupt::Cancelled),
            _ = tokio::time::sleep_until(deadline.into()) => Race::Interrupted(Interrupt::Deadline),
        };

        let (exit, attempts) = match race {
            Race::Finished(result) => (result.exit, result.attempts),
            Race::Interrupted(interrupt) => {
                stop.cancel();
                // the loop sees the stop token at the top of its next attempt
                let attempts = Self::joined(handle.await).attempts;
                (LoopExit::Stopped(interrupt), attempts)
            }
        };
        drop(stop_guard);

        let outcome = match exit {
            LoopExit::Found(tracks) => Outcome::Success(tracks),
            LoopExit::Stopped(interrupt) => {
                classify(interrupt, pool_ms, target_ms, attempts, self.budget)
            }
        };

        self.report(outcome, attempts, started)
    }

    fn spawn_attempts(
        &self,
        pool: Vec<Track>,
        target_ms: u64,
        deadline: Instant,
        stop: CancelToken,
        cancel: CancelToken,
    ) -> JoinHandle<LoopResult> {
        let policy = self.policy;
        let counter = self.attempt_counter.clone();
        let pool: Arc<[Track]> = pool.into();

        tokio::task::spawn_blocking(move || {
            let mut rng = rand::rng();
            let mut order: Vec<&Track> = pool.iter().collect();
            let mut attempts: u64 = 0;

            loop {
                if cancel.is_cancelled() {
                    return LoopResult {
                        exit: LoopExit::Stopped(Interrupt::Cancelled),
                        attempts,
                    };
                }
                if stop.is_cancelled() || Instant::now() >= deadline {
                    return LoopResult {
                        exit: LoopExit::Stopped(Interrupt::Deadline),
                        attempts,
                    };
                }

                attempts += 1;
                if let Some(counter) = &counter {
                    counter.fetch_add(1, Ordering::SeqCst);
                }

                shuffle_in_place(&mut order, &mut rng);
                if let Some(selection) = fit(&order, target_ms, &policy).into_selection() {
                    tracing::trace!(
                        attempts,
                        total_ms = selection.total_ms,
                        gap_filled = selection.gap_filled,
                        "attempt accepted"
                    );
                    return LoopResult {
                        exit: LoopExit::Found(selection.tracks.into_iter().cloned().collect()),
                        attempts,
                    };
                }
            }
        })
    }

    fn joined(joined: Result<LoopResult, tokio::task::JoinError>) -> LoopResult {
        match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // runtime shutting down under us
            Err(_) => LoopResult {
                exit: LoopExit::Stopped(Interrupt::Cancelled),
                attempts: 0,
            },
        }
    }

    fn report(&self, outcome: Outcome, attempts: u64, started: Instant) -> SelectionReport {
        let elapsed = started.elapsed();
        match &outcome {
            Outcome::Success(tracks) => tracing::info!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                tracks = tracks.len(),
                "selection succeeded"
            ),
            other => tracing::info!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                outcome = %other,
                "selection failed"
            ),
        }

        SelectionReport {
            outcome,
            attempts,
            elapsed,
        }
    }
}
