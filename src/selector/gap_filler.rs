use super::{Playable, SelectionPolicy};

/// Finds the single track that best closes a gap of `gap_ms`.
///
/// Candidates are scanned in order and the first one with the smallest
/// distance to the gap wins; an exact match ends the scan. Only tracks the
/// policy accepts as fillers are considered (within the allowance and not
/// longer than the gap).
pub fn fill_gap<'a, T: Playable>(
    candidates: &'a [T],
    gap_ms: u64,
    policy: &SelectionPolicy,
) -> Option<&'a T> {
    let mut best: Option<(&T, u64)> = None;

    for candidate in candidates {
        let duration_ms = candidate.duration_ms();
        if !policy.fills(duration_ms, gap_ms) {
            continue;
        }

        let diff = duration_ms.abs_diff(gap_ms);
        if diff == 0 {
            return Some(candidate);
        }

        match best {
            Some((_, best_diff)) if best_diff <= diff => {}
            _ => best = Some((candidate, diff)),
        }
    }

    best.map(|(track, _)| track)
}
