use super::{Playable, SelectionPolicy, gap_filler::fill_gap};

/// Tracks accepted by one greedy pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    pub tracks: Vec<T>,
    /// Duration of the greedy part, before any filler was appended.
    pub greedy_ms: u64,
    pub total_ms: u64,
    pub gap_filled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fit<T> {
    Accepted(Selection<T>),
    /// No acceptable selection for this ordering.
    Rejected { greedy_ms: u64, gap_ms: u64 },
}

impl<T> Fit<T> {
    pub fn into_selection(self) -> Option<Selection<T>> {
        match self {
            Fit::Accepted(selection) => Some(selection),
            Fit::Rejected { .. } => None,
        }
    }
}

/// Greedily fits `ordered` into `target_ms`.
///
/// Tracks are taken in order until the running sum would exceed the target;
/// the overshooting track is left out. If the remaining gap is not
/// acceptable under `policy`, one filler is looked up among the tracks that
/// were not taken.
pub fn fit<T: Playable + Clone>(ordered: &[T], target_ms: u64, policy: &SelectionPolicy) -> Fit<T> {
    let mut greedy_ms: u64 = 0;
    let mut kept = 0;

    for track in ordered {
        let next_ms = greedy_ms + track.duration_ms();
        if next_ms > target_ms {
            // the overshooting track is never pushed, so an oversized first
            // track just leaves the selection empty
            break;
        }
        greedy_ms = next_ms;
        kept += 1;
    }

    let gap_ms = target_ms - greedy_ms;
    let mut tracks: Vec<T> = ordered[..kept].to_vec();

    if policy.accepts_without_fill(gap_ms, target_ms) {
        return Fit::Accepted(Selection {
            tracks,
            greedy_ms,
            total_ms: greedy_ms,
            gap_filled: false,
        });
    }

    match fill_gap(&ordered[kept..], gap_ms, policy) {
        Some(filler) => {
            let total_ms = greedy_ms + filler.duration_ms();
            tracks.push(filler.clone());
            Fit::Accepted(Selection {
                tracks,
                greedy_ms,
                total_ms,
                gap_filled: true,
            })
        }
        None => Fit::Rejected { greedy_ms, gap_ms },
    }
}
