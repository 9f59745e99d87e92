use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use playtimer::selector::*;
use playtimer::types::Track;

// Helper function to create a test track
fn create_test_track(id: usize, duration_ms: u64) -> Track {
    Track {
        id: format!("track{}", id),
        uri: format!("spotify:track:track{}", id),
        name: format!("Track {}", id),
        duration_ms,
        isrc: String::new(),
        artist_ids: Vec::new(),
        artist_names: Vec::new(),
    }
}

fn create_test_pool(durations: &[u64]) -> Vec<Track> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| create_test_track(i, *d))
        .collect()
}

/// Remembers its position in the input so tests can check identity.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    index: usize,
    ms: u64,
}

impl Playable for Item {
    fn duration_ms(&self) -> u64 {
        self.ms
    }
}

fn items(durations: &[u64]) -> Vec<Item> {
    durations
        .iter()
        .enumerate()
        .map(|(index, ms)| Item { index, ms: *ms })
        .collect()
}

fn selector_with_budget(budget: Duration) -> Selector {
    Selector::new(SelectionPolicy::default(), budget)
}

// --- policy ---

#[test]
fn test_allowance_comparison_parse() {
    assert_eq!("at-most".parse::<AllowanceComparison>(), Ok(AllowanceComparison::AtMost));
    assert_eq!("AT_MOST".parse::<AllowanceComparison>(), Ok(AllowanceComparison::AtMost));
    assert_eq!("<=".parse::<AllowanceComparison>(), Ok(AllowanceComparison::AtMost));
    assert_eq!("exact".parse::<AllowanceComparison>(), Ok(AllowanceComparison::Exact));
    assert_eq!(" == ".parse::<AllowanceComparison>(), Ok(AllowanceComparison::Exact));

    let err = "roughly".parse::<AllowanceComparison>().unwrap_err();
    assert!(err.contains("invalid value 'roughly'"));
}

#[test]
fn test_allowance_comparison_display() {
    assert_eq!(AllowanceComparison::AtMost.to_string(), "at-most");
    assert_eq!(AllowanceComparison::Exact.to_string(), "exact");
    assert_eq!(AllowanceComparison::default(), AllowanceComparison::AtMost);
}

#[test]
fn test_policy_accepts_without_fill() {
    let policy = SelectionPolicy::default();

    // exact fit is always fine
    assert!(policy.accepts_without_fill(0, 60_000));
    assert!(policy.accepts_without_fill(0, 600_000));

    // the allowance shortcut starts at ten minutes
    assert!(!policy.accepts_without_fill(10_000, 599_999));
    assert!(policy.accepts_without_fill(10_000, 600_000));
    assert!(policy.accepts_without_fill(15_000, 600_000));
    assert!(!policy.accepts_without_fill(15_001, 600_000));

    let exact = policy.with_comparison(AllowanceComparison::Exact);
    assert!(exact.accepts_without_fill(0, 600_000));
    assert!(exact.accepts_without_fill(15_000, 600_000));
    assert!(!exact.accepts_without_fill(10_000, 600_000));
}

#[test]
fn test_policy_fills() {
    let policy = SelectionPolicy::default();

    assert!(policy.fills(15_000, 15_000));
    assert!(policy.fills(10_000, 20_000));
    assert!(policy.fills(5_000, 20_000));
    assert!(!policy.fills(4_999, 20_000));
    // never past the target
    assert!(!policy.fills(20_001, 20_000));
}

// --- shuffle ---

#[test]
fn test_shuffle_keeps_input() {
    let mut rng = StdRng::seed_from_u64(7);
    let input: Vec<u64> = (0..50).collect();

    let shuffled = shuffle(&input, &mut rng);

    assert_eq!(input, (0..50).collect::<Vec<u64>>());
    let mut sorted = shuffled.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, input);
}

#[test]
fn test_shuffle_trivial_inputs() {
    let mut rng = StdRng::seed_from_u64(1);

    let mut empty: Vec<u64> = Vec::new();
    shuffle_in_place(&mut empty, &mut rng);
    assert!(empty.is_empty());

    let mut single = vec![42u64];
    shuffle_in_place(&mut single, &mut rng);
    assert_eq!(single, vec![42]);
}

#[test]
fn test_shuffle_reaches_every_order() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut seen = HashSet::new();

    for _ in 0..2_000 {
        seen.insert(shuffle(&[1u64, 2, 3], &mut rng));
    }

    assert_eq!(seen.len(), 6);
}

// --- gap filler ---

#[test]
fn test_fill_gap_exact_match() {
    let policy = SelectionPolicy::default();
    let candidates = items(&[12_000, 15_000, 14_000]);

    let filler = fill_gap(&candidates, 15_000, &policy);

    assert_eq!(filler.map(|f| f.index), Some(1));
}

#[test]
fn test_fill_gap_first_closest_wins() {
    let policy = SelectionPolicy::default();
    let candidates = items(&[9_000, 13_000, 11_000, 13_000]);

    let filler = fill_gap(&candidates, 14_000, &policy);

    assert_eq!(filler.map(|f| f.index), Some(1));
}

#[test]
fn test_fill_gap_rejects_overshoot_and_far_candidates() {
    let policy = SelectionPolicy::default();

    // longer than the gap
    assert!(fill_gap(&items(&[15_001, 30_000]), 15_000, &policy).is_none());
    // too short to land within the allowance
    assert!(fill_gap(&items(&[20_000]), 40_000, &policy).is_none());
    assert!(fill_gap(&items(&[]), 10_000, &policy).is_none());
}

// --- greedy fitter ---

#[test]
fn test_fit_exact_fit() {
    let policy = SelectionPolicy::default();
    let ordered = items(&[200_000, 200_000, 200_000, 15_000]);

    let selection = fit(&ordered, 600_000, &policy)
        .into_selection()
        .expect("exact fit must be accepted");

    assert_eq!(selection.total_ms, 600_000);
    assert!(!selection.gap_filled);
    let indices: Vec<usize> = selection.tracks.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_fit_gap_fill_exact_match() {
    let policy = SelectionPolicy::default();
    let ordered = items(&[40_000, 45_000, 30_000, 15_000]);

    let selection = fit(&ordered, 100_000, &policy)
        .into_selection()
        .expect("15s filler must close the gap");

    assert_eq!(selection.greedy_ms, 85_000);
    assert_eq!(selection.total_ms, 100_000);
    assert!(selection.gap_filled);
    let indices: Vec<usize> = selection.tracks.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 1, 3]);
}

#[test]
fn test_fit_short_target_has_no_allowance_shortcut() {
    let policy = SelectionPolicy::default();
    let ordered = items(&[20_000, 30_000, 25_000]);

    let result = fit(&ordered, 60_000, &policy);

    assert_eq!(
        result,
        Fit::Rejected {
            greedy_ms: 50_000,
            gap_ms: 10_000
        }
    );
}

#[test]
fn test_fit_long_target_accepts_within_allowance() {
    let ordered = items(&[200_000, 200_000, 190_000]);

    let at_most = fit(&ordered, 600_000, &SelectionPolicy::default());
    assert!(matches!(at_most, Fit::Accepted(_)));

    let exact = SelectionPolicy::default().with_comparison(AllowanceComparison::Exact);
    assert_eq!(
        fit(&ordered, 600_000, &exact),
        Fit::Rejected {
            greedy_ms: 590_000,
            gap_ms: 10_000
        }
    );
}

#[test]
fn test_fit_oversized_first_track() {
    let policy = SelectionPolicy::default();

    // nothing fits before the first track, the filler closes the gap alone
    let ordered = items(&[90_000, 55_000]);
    let selection = fit(&ordered, 60_000, &policy)
        .into_selection()
        .expect("filler alone lands within the allowance");
    let indices: Vec<usize> = selection.tracks.iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![1]);
    assert_eq!(selection.greedy_ms, 0);

    let ordered = items(&[90_000]);
    assert_eq!(
        fit(&ordered, 60_000, &policy),
        Fit::Rejected {
            greedy_ms: 0,
            gap_ms: 60_000
        }
    );
}

#[test]
fn test_fit_exhausted_pool_keeps_everything() {
    let policy = SelectionPolicy::default();
    let ordered = items(&[200_000, 200_000, 195_000]);

    let selection = fit(&ordered, 600_000, &policy)
        .into_selection()
        .expect("5s short of ten minutes is within the allowance");

    assert_eq!(selection.tracks.len(), 3);
    assert_eq!(selection.total_ms, 595_000);
}

proptest! {
    #[test]
    fn prop_shuffle_is_permutation(input in prop::collection::vec(any::<u32>(), 0..64), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled = shuffle(&input, &mut rng);
        let mut expected = input.clone();
        shuffled.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(shuffled, expected);
    }

    #[test]
    fn prop_accepted_fit_respects_bounds(
        durations in prop::collection::vec(1u64..=400_000, 0..40),
        target_ms in 1u64..=3_000_000,
    ) {
        let policy = SelectionPolicy::default();
        let ordered = items(&durations);

        match fit(&ordered, target_ms, &policy) {
            Fit::Accepted(selection) => {
                let sum: u64 = selection.tracks.iter().map(|t| t.ms).sum();
                prop_assert_eq!(sum, selection.total_ms);
                prop_assert!(selection.total_ms <= target_ms);
                prop_assert!(target_ms - selection.total_ms <= ALLOWANCE_MS);

                let indices: HashSet<usize> = selection.tracks.iter().map(|t| t.index).collect();
                prop_assert_eq!(indices.len(), selection.tracks.len());

                // the greedy part is a prefix of the ordering
                let greedy = if selection.gap_filled {
                    &selection.tracks[..selection.tracks.len() - 1]
                } else {
                    &selection.tracks[..]
                };
                prop_assert_eq!(greedy, &ordered[..greedy.len()]);
            }
            Fit::Rejected { greedy_ms, gap_ms } => {
                prop_assert!(greedy_ms <= target_ms);
                prop_assert_eq!(greedy_ms + gap_ms, target_ms);
            }
        }
    }
}

// --- classification ---

#[test]
fn test_classify() {
    let budget = Duration::from_secs(15);

    assert_eq!(
        classify(Interrupt::Cancelled, 1_000, 500, 3, budget),
        Outcome::Cancelled
    );
    assert_eq!(
        classify(Interrupt::Deadline, 50_000, 60_000, 3, budget),
        Outcome::PoolInsufficientDuration {
            pool_ms: 50_000,
            target_ms: 60_000
        }
    );
    assert_eq!(
        classify(Interrupt::Deadline, 75_000, 60_000, 3, budget),
        Outcome::NoFeasibleCombinationBeforeTimeout {
            attempts: 3,
            budget
        }
    );
}

#[test]
fn test_selection_error() {
    let timeout = Outcome::NoFeasibleCombinationBeforeTimeout {
        attempts: 10,
        budget: Duration::from_secs(1),
    };
    let err = timeout.into_result().unwrap_err();
    assert!(err.is_retryable());

    assert!(!SelectionError::PoolEmpty.is_retryable());
    assert!(!SelectionError::Cancelled.is_retryable());

    let short = SelectionError::PoolInsufficientDuration {
        pool_ms: 400_000,
        target_ms: 1_000_000,
    };
    assert!(!short.is_retryable());
    assert_eq!(
        short.to_string(),
        "not enough tracks: the pool runs 6:40 but 16:40 were requested"
    );
}

// --- cancel token ---

#[tokio::test]
async fn test_cancel_token_shared_between_clones() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!token.is_cancelled());

    clone.cancel();
    clone.cancel();

    assert!(token.is_cancelled());
    // resolves immediately once cancelled
    tokio::time::timeout(Duration::from_secs(1), token.cancelled())
        .await
        .expect("already cancelled token must resolve");
}

#[tokio::test]
async fn test_cancel_token_wakes_waiter() {
    let token = CancelToken::new();
    let waiter = {
        let token = token.clone();
        tokio::spawn(async move { token.cancelled().await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter must wake up")
        .expect("waiter must not panic");
}

// --- orchestrator ---

#[tokio::test]
async fn test_select_exact_fit() {
    let pool = create_test_pool(&[200_000, 200_000, 200_000, 15_000]);
    let selector = selector_with_budget(Duration::from_secs(5));

    let report = selector
        .select_with_report(pool, 600_000, &CancelToken::new())
        .await;

    assert!(report.outcome.is_success());
    let Outcome::Success(tracks) = report.outcome else {
        panic!("expected success, got {:?}", report.outcome);
    };
    assert_eq!(tracks.len(), 3);
    assert!(tracks.iter().all(|t| t.duration_ms == 200_000));
    assert!(report.attempts >= 1);
}

#[tokio::test]
async fn test_select_success_invariants() {
    let durations: Vec<u64> = (0..60).map(|i| 150_000 + (i * 7_919) % 150_000).collect();
    let pool = create_test_pool(&durations);
    let pool_ids: HashSet<String> = pool.iter().map(|t| t.id.clone()).collect();
    let target_ms = 45 * 60_000;

    let outcome = Selector::default()
        .select(pool, target_ms, &CancelToken::new())
        .await;

    let tracks = outcome.into_result().expect("a large pool must fit 45 minutes");
    let total_ms = total_duration_ms(&tracks);
    assert!(total_ms <= target_ms);
    assert!(target_ms - total_ms <= ALLOWANCE_MS);

    let ids: HashSet<String> = tracks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), tracks.len());
    assert!(ids.is_subset(&pool_ids));
}

#[tokio::test]
async fn test_select_empty_pool() {
    let counter = Arc::new(AtomicU64::new(0));
    let selector = Selector::default().with_attempt_counter(Arc::clone(&counter));

    let report = selector
        .select_with_report(Vec::new(), 60_000, &CancelToken::new())
        .await;

    assert_eq!(report.outcome, Outcome::PoolEmpty);
    assert_eq!(report.attempts, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_select_insufficient_pool_fails_fast() {
    let counter = Arc::new(AtomicU64::new(0));
    let selector = Selector::default().with_attempt_counter(Arc::clone(&counter));
    let pool = create_test_pool(&[200_000, 200_000]);

    let report = selector
        .select_with_report(pool, 1_000_000, &CancelToken::new())
        .await;

    assert_eq!(
        report.outcome,
        Outcome::PoolInsufficientDuration {
            pool_ms: 400_000,
            target_ms: 1_000_000
        }
    );
    assert_eq!(report.attempts, 0);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(report.elapsed < Duration::from_secs(1));
}

#[tokio::test]
async fn test_select_short_target_times_out() {
    let budget = Duration::from_millis(200);
    let pool = create_test_pool(&[20_000, 30_000, 25_000]);

    let report = selector_with_budget(budget)
        .select_with_report(pool, 60_000, &CancelToken::new())
        .await;

    match report.outcome {
        Outcome::NoFeasibleCombinationBeforeTimeout { attempts, budget: b } => {
            assert_eq!(b, budget);
            assert!(attempts > 0);
            assert_eq!(attempts, report.attempts);
        }
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(report.elapsed >= budget);
}

#[tokio::test]
async fn test_select_pool_within_allowance_of_target_fails_fast() {
    let counter = Arc::new(AtomicU64::new(0));
    let budget = Duration::from_secs(2);

    // short target: would otherwise spin until the deadline
    let report = selector_with_budget(budget)
        .with_attempt_counter(Arc::clone(&counter))
        .select_with_report(create_test_pool(&[50_000]), 60_000, &CancelToken::new())
        .await;

    assert_eq!(
        report.outcome,
        Outcome::PoolInsufficientDuration {
            pool_ms: 50_000,
            target_ms: 60_000
        }
    );
    assert_eq!(report.attempts, 0);
    assert!(report.elapsed < Duration::from_millis(500));

    // long target: 5s short would pass the allowance, the pool is still too short
    let report = selector_with_budget(budget)
        .with_attempt_counter(Arc::clone(&counter))
        .select_with_report(
            create_test_pool(&[300_000, 295_000]),
            600_000,
            &CancelToken::new(),
        )
        .await;

    assert_eq!(
        report.outcome,
        Outcome::PoolInsufficientDuration {
            pool_ms: 595_000,
            target_ms: 600_000
        }
    );
    assert_eq!(report.attempts, 0);
    assert!(report.elapsed < Duration::from_millis(500));
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_select_cancelled_before_start() {
    let counter = Arc::new(AtomicU64::new(0));
    let selector = Selector::default().with_attempt_counter(Arc::clone(&counter));
    let cancel = CancelToken::new();
    cancel.cancel();

    let outcome = selector
        .select(create_test_pool(&[20_000, 30_000, 25_000]), 60_000, &cancel)
        .await;

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_select_cancellation_stops_background_loop() {
    let counter = Arc::new(AtomicU64::new(0));
    let selector = selector_with_budget(Duration::from_secs(30))
        .with_attempt_counter(Arc::clone(&counter));
    let cancel = CancelToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let report = selector
        .select_with_report(create_test_pool(&[20_000, 30_000, 25_000]), 60_000, &cancel)
        .await;
    canceller.await.expect("canceller must not panic");

    assert_eq!(report.outcome, Outcome::Cancelled);
    assert!(report.elapsed < Duration::from_secs(5));

    let attempts_at_return = counter.load(Ordering::SeqCst);
    assert!(attempts_at_return > 0);
    assert_eq!(attempts_at_return, report.attempts);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(counter.load(Ordering::SeqCst), attempts_at_return);
}

#[tokio::test]
async fn test_select_exact_comparison_still_finds_exact_fits() {
    let policy = SelectionPolicy::default().with_comparison(AllowanceComparison::Exact);
    let selector = Selector::new(policy, Duration::from_secs(5));
    let pool = create_test_pool(&[300_000, 300_000, 100_000]);

    let tracks = selector
        .select(pool, 600_000, &CancelToken::new())
        .await
        .into_result()
        .expect("two five minute tracks make ten minutes");

    assert_eq!(total_duration_ms(&tracks), 600_000);
}
