use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use daycycle::{
    clock::{until_next_second_at, Clock},
    simulator::{DayCycle, Frame},
    theme::Theme,
    ticker::Ticker,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

/// Wall clock that follows tokio's (paused) time. `start` may sit part way
/// through a second.
struct RuntimeClock {
    start: NaiveDateTime,
    origin: Instant,
}

impl RuntimeClock {
    fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            origin: Instant::now(),
        }
    }

    fn precise(&self) -> NaiveDateTime {
        self.start + chrono::Duration::from_std(self.origin.elapsed()).unwrap()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> NaiveDateTime {
        self.precise().with_nanosecond(0).unwrap()
    }

    fn until_next_second(&self) -> Duration {
        until_next_second_at(&self.precise())
    }
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn at_millis(h: u32, m: u32, s: u32, milli: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_milli_opt(h, m, s, milli)
        .unwrap()
}

fn spawn_ticker(
    start: NaiveDateTime,
) -> (
    daycycle::TickerHandle,
    broadcast::Receiver<Frame>,
    watch::Sender<Theme>,
) {
    let (frames_tx, frames_rx) = broadcast::channel(32);
    let (theme_tx, theme_rx) = watch::channel(Theme::Light);
    let handle = Ticker::new(
        DayCycle::new(start),
        RuntimeClock::starting_at(start),
        ChaCha8Rng::seed_from_u64(5),
    )
    .spawn(theme_rx, frames_tx);
    (handle, frames_rx, theme_tx)
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_second_and_refreshes_on_the_hour() {
    let (handle, mut frames, _theme) = spawn_ticker(at(12, 59, 57));

    let mut received = Vec::new();
    for _ in 0..4 {
        received.push(frames.recv().await.unwrap());
    }

    let elapsed: Vec<u32> = received.iter().map(|frame| frame.seconds_elapsed).collect();
    assert_eq!(elapsed, vec![46_797, 46_798, 46_799, 46_800]);
    let refreshed: Vec<bool> = received
        .iter()
        .map(|frame| frame.weather_refreshed)
        .collect();
    assert_eq!(refreshed, vec![false, false, false, true]);

    let cycle = handle.stop().await.unwrap();
    assert!(cycle.now() >= at(13, 0, 0));
}

#[tokio::test(start_paused = true)]
async fn mid_second_start_aligns_to_the_boundary() {
    let (handle, mut frames, _theme) = spawn_ticker(at_millis(12, 59, 58, 700));

    let first = frames.recv().await.unwrap();
    assert_eq!(first.now, at(12, 59, 59));

    let mut received = vec![first];
    while received.len() < 10 {
        received.push(frames.recv().await.unwrap());
    }

    let times: Vec<NaiveDateTime> = received.iter().map(|frame| frame.now).collect();
    let expected: Vec<NaiveDateTime> = (0..10)
        .map(|offset| at(12, 59, 59) + chrono::Duration::seconds(offset))
        .collect();
    assert_eq!(times, expected);

    let refreshes: Vec<NaiveDateTime> = received
        .iter()
        .filter(|frame| frame.weather_refreshed)
        .map(|frame| frame.now)
        .collect();
    assert_eq!(refreshes, vec![at(13, 0, 0)]);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn theme_changes_reach_the_next_frame() {
    let (handle, mut frames, theme) = spawn_ticker(at(9, 15, 0));

    let first = frames.recv().await.unwrap();
    assert_eq!(first.background.name(), "sunny-light");

    theme.send_replace(Theme::Dark);
    let second = frames.recv().await.unwrap();
    assert_eq!(second.theme, Theme::Dark);
    assert_eq!(second.background.name(), "sunny-dark");

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn missed_seconds_are_not_replayed() {
    let (handle, mut frames, _theme) = spawn_ticker(at(10, 0, 1));

    let first = frames.recv().await.unwrap();
    assert_eq!(first.now, at(10, 0, 1));

    tokio::time::advance(Duration::from_millis(5_500)).await;
    let after_gap = frames.recv().await.unwrap();
    assert_eq!(after_gap.now, at(10, 0, 6));

    let next = frames.recv().await.unwrap();
    assert!(next.now > after_gap.now);

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn no_frames_after_stop() {
    let (handle, mut frames, _theme) = spawn_ticker(at(20, 0, 30));
    frames.recv().await.unwrap();
    frames.recv().await.unwrap();

    let cycle = handle.stop().await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;

    loop {
        match frames.try_recv() {
            Ok(frame) => assert!(frame.now <= cycle.now()),
            Err(broadcast::error::TryRecvError::Closed) => break,
            Err(other) => panic!("unexpected receive state: {other:?}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_tears_the_ticker_down() {
    let (handle, mut frames, _theme) = spawn_ticker(at(3, 0, 0));
    frames.recv().await.unwrap();
    drop(handle);

    let drained = tokio::time::timeout(Duration::from_secs(30), async {
        while frames.recv().await.is_ok() {}
    })
    .await;
    assert!(drained.is_ok(), "ticker kept publishing after its handle was dropped");
}
