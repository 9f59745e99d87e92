use std::{io, time::Duration};

use playtimer::cli::SignalWatch;
use tokio::{sync::oneshot, time::timeout};

const SHORT: Duration = Duration::from_millis(50);

#[tokio::test]
async fn test_signal_fires_once() {
    let mut watch = SignalWatch::new(async { Ok(()) });
    assert!(!watch.has_fired());

    timeout(SHORT, watch.fired()).await.expect("first signal fires");
    assert!(watch.has_fired());

    // the same press is not reported twice
    assert!(timeout(SHORT, watch.fired()).await.is_err());
    assert!(watch.has_fired());
}

#[tokio::test]
async fn test_signal_listener_error_never_fires() {
    let mut watch = SignalWatch::new(async { Err(io::Error::other("no signal handler")) });

    assert!(timeout(SHORT, watch.fired()).await.is_err());
    assert!(timeout(SHORT, watch.fired()).await.is_err());
    assert!(!watch.has_fired());
}

#[tokio::test]
async fn test_signal_between_races_is_kept() {
    let (press, pressed) = oneshot::channel::<()>();
    let mut watch = SignalWatch::new(async move {
        pressed.await.map_err(|_| io::Error::other("sender dropped"))
    });

    // first race: the work finishes before any press
    let first = tokio::select! {
        value = async { 1 } => value,
        _ = watch.fired() => 0,
    };
    assert_eq!(first, 1);
    assert!(!watch.has_fired());

    // the press lands while nothing is racing the watch
    press.send(()).expect("receiver alive");

    // second race: slow work loses to the earlier press
    let second = tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(5)) => 2,
        _ = watch.fired() => 0,
    };
    assert_eq!(second, 0);
    assert!(watch.has_fired());
}
