//! Periodic driver for [`DayCycle`].
//!
//! One task owns the simulator for its whole life. It ticks once per second,
//! aligned to the wall-clock second boundary, reads the theme preference on
//! every tick and publishes the resulting frame. Missed seconds are skipped
//! rather than replayed: the next tick simply reads the clock again.

use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::simulator::{DayCycle, Frame};
use crate::theme::Theme;

/// The hourly refresh relies on exactly one tick per wall-clock second.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Ticks land this far past the boundary so the clock read is already in
/// the new second.
const BOUNDARY_MARGIN: Duration = Duration::from_millis(5);

pub struct Ticker<C, R> {
    cycle: DayCycle,
    clock: C,
    rng: R,
}

impl<C, R> Ticker<C, R>
where
    C: Clock + Send + 'static,
    R: Rng + Send + 'static,
{
    pub fn new(cycle: DayCycle, clock: C, rng: R) -> Self {
        Self { cycle, clock, rng }
    }

    /// Starts ticking on the current runtime. The first tick fires just
    /// after the next whole wall-clock second. Frames nobody is subscribed
    /// to are dropped.
    pub fn spawn(
        self,
        theme: watch::Receiver<Theme>,
        frames: broadcast::Sender<Frame>,
    ) -> TickerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        info!("ticker started");
        let task = tokio::spawn(self.run(theme, frames, shutdown_rx));
        TickerHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn run(
        self,
        theme: watch::Receiver<Theme>,
        frames: broadcast::Sender<Frame>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> DayCycle {
        let Ticker {
            mut cycle,
            clock,
            mut rng,
        } = self;
        let start = Instant::now() + clock.until_next_second() + BOUNDARY_MARGIN;
        let mut interval = tokio::time::interval_at(start, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    cycle.set_theme(*theme.borrow());
                    let frame = cycle.tick(clock.now(), &mut rng);
                    if frames.send(frame).is_err() {
                        debug!("no frame subscribers");
                    }
                }
            }
        }
        cycle
    }
}

/// Owns the running ticker. Dropping the handle aborts the task; `stop`
/// shuts it down and hands the simulator back.
pub struct TickerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<DayCycle>,
}

impl TickerHandle {
    pub async fn stop(mut self) -> Result<DayCycle, JoinError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let cycle = (&mut self.task).await?;
        info!(last_tick = %cycle.now(), "ticker stopped");
        Ok(cycle)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
