use std::error::Error;

use tokio::time::{sleep, timeout, Duration, Instant};

use pollwatch::{FetchError, MemoryTarget, Target, Watcher};
use pollwatch_test_utils::{drain, init_tracing, with_timeout, CountingTarget};

type TestResult = Result<(), Box<dyn Error>>;

const PERIOD: Duration = Duration::from_millis(100);

/// Long enough for the loop to take its baseline, well before the first tick.
const SETTLE: Duration = Duration::from_millis(50);

/// Target whose every fetch takes `delay` of wall-clock time.
struct SlowTarget {
    inner: MemoryTarget,
    delay: std::time::Duration,
}

impl Target for SlowTarget {
    fn fail_open(&self) -> bool {
        self.inner.fail_open()
    }

    fn content(&self) -> Result<Vec<u8>, FetchError> {
        std::thread::sleep(self.delay);
        self.inner.content()
    }
}

#[tokio::test(start_paused = true)]
async fn single_change_produces_exactly_one_notification() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("before", true);
    let watcher = Watcher::new(target.clone());
    let start = Instant::now();

    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    let writer = tokio::spawn({
        let target = target.clone();
        async move {
            sleep(Duration::from_millis(250)).await;
            target.set("after");
        }
    });

    let first = with_timeout(rx.recv()).await;
    assert_eq!(first, Some(()));

    // Delivered on the first tick at or after the change.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(250), "too early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(400), "too late: {elapsed:?}");

    // Nothing else while the content stays put.
    assert!(timeout(Duration::from_millis(550), rx.recv()).await.is_err());

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);

    writer.await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_before_first_tick_closes_with_no_notifications() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("content", true);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    // A change that would otherwise be reported on the first tick.
    target.set("changed");
    cancel.cancel();
    assert!(cancel.is_cancelled());

    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent_and_safe_after_stop() -> TestResult {
    init_tracing();

    let watcher = Watcher::new(MemoryTarget::new("x", true));
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    cancel.cancel();
    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);

    tokio::task::yield_now().await;
    cancel.cancel();
    with_timeout(cancel.stop()).await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn cancel_wins_over_a_blocked_send() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("0", true);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    // Change the content between every tick without consuming anything, so
    // the loop ends up parked on a full channel.
    sleep(Duration::from_millis(50)).await;
    for i in 1..=4 {
        target.set(i.to_string());
        sleep(PERIOD).await;
    }

    with_timeout(cancel.stop()).await;

    // Only the notification that fit in the channel was ever delivered.
    assert_eq!(drain(&mut rx).await?, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_stops_the_loop() -> TestResult {
    init_tracing();

    let watcher = Watcher::new(MemoryTarget::new("x", true));
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    drop(cancel);
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn dropping_the_receiver_stops_the_loop() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("x", true);
    let watcher = Watcher::new(target.clone());
    let (rx, cancel) = watcher.on_interval(PERIOD);

    drop(rx);
    sleep(SETTLE).await;
    target.set("y");

    sleep(Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    assert!(cancel.is_stopped());
    assert!(!cancel.is_cancelled());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn every_distinct_change_is_reported_in_order() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("v0", true);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);
    sleep(SETTLE).await;

    for (version, changes) in [("v1", true), ("v2", true), ("v2", false), ("v3", true)] {
        target.set(version);
        let got = timeout(Duration::from_millis(150), rx.recv()).await;
        if changes {
            assert_eq!(got?, Some(()), "expected notification for {version}");
        } else {
            assert!(got.is_err(), "unexpected notification for repeated {version}");
        }
    }

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fail_open_error_streak_signals_once() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("a", true);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    sleep(Duration::from_millis(150)).await;
    target.fail("disk unplugged");

    // t=200: first failing tick is a change.
    assert_eq!(timeout(Duration::from_millis(100), rx.recv()).await?, Some(()));

    // t=300, t=400: still failing, nothing new.
    assert!(timeout(Duration::from_millis(250), rx.recv()).await.is_err());

    // Recovery with the last good content is not a change.
    target.set("a");
    assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());

    // A real change afterwards is.
    target.set("b");
    assert_eq!(timeout(Duration::from_millis(100), rx.recv()).await?, Some(()));

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fail_closed_errors_are_silent() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("a", false);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);
    sleep(SETTLE).await;

    target.fail("permission denied");
    assert!(timeout(Duration::from_millis(400), rx.recv()).await.is_err());

    target.set("b");
    assert_eq!(timeout(Duration::from_millis(150), rx.recv()).await?, Some(()));

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_baseline_reports_first_successful_read() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("", true);
    target.fail("not there yet");
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    // The loop started inside the error streak, so no error notification.
    assert!(timeout(Duration::from_millis(250), rx.recv()).await.is_err());

    target.set("created");
    assert_eq!(timeout(Duration::from_millis(150), rx.recv()).await?, Some(()));

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn manual_checks_and_interval_loop_do_not_interfere() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("a", true);
    let mut watcher = Watcher::new(target.clone());
    assert!(watcher.updated()?);

    let (mut rx, cancel) = watcher.on_interval(PERIOD);

    sleep(Duration::from_millis(150)).await;
    target.set("b");

    // Both lineages see the change exactly once.
    assert_eq!(timeout(Duration::from_millis(100), rx.recv()).await?, Some(()));
    assert!(watcher.updated()?);
    assert!(!watcher.updated()?);
    assert!(timeout(Duration::from_millis(250), rx.recv()).await.is_err());

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn fetches_once_at_start_and_once_per_tick() -> TestResult {
    init_tracing();

    let target = CountingTarget::new(MemoryTarget::new("x", true));
    let watcher = Watcher::new(target.clone());

    let (mut rx, cancel) = watcher.on_interval(PERIOD);
    sleep(SETTLE).await;
    assert_eq!(target.fetches(), 1);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(target.fetches(), 11);

    cancel.cancel();
    assert_eq!(drain(&mut rx).await?, 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn queued_notification_survives_cancel_but_waiting_one_does_not() -> TestResult {
    init_tracing();

    let target = MemoryTarget::new("a", true);
    let watcher = Watcher::new(target.clone());
    let (mut rx, cancel) = watcher.on_interval(PERIOD);
    sleep(SETTLE).await;

    // t=100 fills the channel, t=200 waits for room.
    target.set("b");
    sleep(PERIOD).await;
    target.set("c");
    sleep(PERIOD).await;

    cancel.cancel();
    assert_eq!(rx.recv().await, Some(()));
    assert_eq!(rx.recv().await, None);
    Ok(())
}

#[tokio::test]
async fn slow_target_does_not_stall_caller_or_cancellation() -> TestResult {
    init_tracing();

    let fetch_delay = std::time::Duration::from_millis(300);
    let watcher = Watcher::new(SlowTarget {
        inner: MemoryTarget::new("x", true),
        delay: fetch_delay,
    });

    let started = std::time::Instant::now();
    let (mut rx, cancel) = watcher.on_interval(Duration::from_millis(20));
    assert!(
        started.elapsed() < Duration::from_millis(100),
        "on_interval blocked for {:?}",
        started.elapsed()
    );

    // The current-thread runtime keeps running other tasks during the fetch.
    let mut max_gap = Duration::ZERO;
    for _ in 0..10 {
        let before = std::time::Instant::now();
        sleep(Duration::from_millis(10)).await;
        max_gap = max_gap.max(before.elapsed());
    }
    assert!(max_gap < Duration::from_millis(150), "caller stalled for {max_gap:?}");

    // Cancelled while a fetch is in flight: the channel closes without
    // waiting for it.
    let cancelled_at = std::time::Instant::now();
    cancel.cancel();
    assert_eq!(with_timeout(rx.recv()).await, None);
    assert!(
        cancelled_at.elapsed() < fetch_delay,
        "cancel waited {:?} for the fetch",
        cancelled_at.elapsed()
    );
    Ok(())
}
