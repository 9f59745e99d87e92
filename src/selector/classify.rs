use std::{fmt, time::Duration};

use thiserror::Error;

use crate::{types::Track, utils};

/// Final result of one selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Vec<Track>),
    PoolEmpty,
    PoolInsufficientDuration { pool_ms: u64, target_ms: u64 },
    NoFeasibleCombinationBeforeTimeout { attempts: u64, budget: Duration },
    Cancelled,
}

/// The failure kinds of [`Outcome`], for callers that prefer a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no candidate tracks available")]
    PoolEmpty,
    #[error(
        "not enough tracks: the pool runs {} but {} were requested",
        clock(.pool_ms),
        clock(.target_ms)
    )]
    PoolInsufficientDuration { pool_ms: u64, target_ms: u64 },
    #[error("no matching combination found within {budget:?} ({attempts} attempts)")]
    NoFeasibleCombinationBeforeTimeout { attempts: u64, budget: Duration },
    #[error("selection cancelled")]
    Cancelled,
}

fn clock(ms: &u64) -> String {
    utils::format_duration_ms(*ms)
}

impl SelectionError {
    /// Only a timeout may succeed when asked again with the same pool.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SelectionError::NoFeasibleCombinationBeforeTimeout { .. })
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_result(self) -> Result<Vec<Track>, SelectionError> {
        match self {
            Outcome::Success(tracks) => Ok(tracks),
            Outcome::PoolEmpty => Err(SelectionError::PoolEmpty),
            Outcome::PoolInsufficientDuration { pool_ms, target_ms } => {
                Err(SelectionError::PoolInsufficientDuration { pool_ms, target_ms })
            }
            Outcome::NoFeasibleCombinationBeforeTimeout { attempts, budget } => {
                Err(SelectionError::NoFeasibleCombinationBeforeTimeout { attempts, budget })
            }
            Outcome::Cancelled => Err(SelectionError::Cancelled),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.clone().into_result() {
            Ok(tracks) => write!(f, "selected {} tracks", tracks.len()),
            Err(e) => write!(f, "{}", e),
        }
    }
}

/// What stopped the attempt loop before it found a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Deadline,
    Cancelled,
}

/// Labels an interrupted selection.
///
/// A deadline on a pool shorter than the target means no amount of retrying
/// would have helped; otherwise the search simply ran out of time.
pub fn classify(
    interrupt: Interrupt,
    pool_ms: u64,
    target_ms: u64,
    attempts: u64,
    budget: Duration,
) -> Outcome {
    match interrupt {
        Interrupt::Cancelled => Outcome::Cancelled,
        Interrupt::Deadline if pool_ms < target_ms => {
            Outcome::PoolInsufficientDuration { pool_ms, target_ms }
        }
        Interrupt::Deadline => Outcome::NoFeasibleCombinationBeforeTimeout { attempts, budget },
    }
}
