use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// One elapsed period, stamped with the arming it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub epoch: u64,
}

/// Cancellable once-per-period countdown driver.
///
/// Each [`arm`](Self::arm) aborts the previous task, starts a fresh cadence and
/// bumps the epoch. Ticks that were already queued before a re-arm or
/// [`disarm`](Self::disarm) fail [`is_current`](Self::is_current) and must be dropped
/// by the receiver.
pub struct SessionClock {
    period: Duration,
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl SessionClock {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            // `tokio::time::interval` panics on a zero period.
            period: period.max(Duration::from_millis(1)),
            epoch: 0,
            task: None,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// True if `tick` came from the live arming.
    #[must_use]
    pub fn is_current(&self, tick: ClockTick) -> bool {
        self.is_armed() && tick.epoch == self.epoch
    }

    /// Start ticking into `sink`; the first tick arrives one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm<E>(&mut self, sink: UnboundedSender<E>) -> u64
    where
        E: From<ClockTick> + Send + 'static,
    {
        self.disarm();
        self.epoch = self.epoch.wrapping_add(1);
        let epoch = self.epoch;
        let period = self.period;

        self.task = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sink.send(E::from(ClockTick { epoch })).is_err() {
                    break;
                }
            }
        }));
        epoch
    }

    /// Stop ticking. Safe to call when already disarmed.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClock")
            .field("period", &self.period)
            .field("epoch", &self.epoch)
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_after_arming() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ClockTick>();
        let mut clock = SessionClock::new(Duration::from_secs(1));
        let started = Instant::now();
        let epoch = clock.arm(tx);

        for n in 1..=3 {
            let tick = rx.recv().await.unwrap();
            assert_eq!(tick, ClockTick { epoch });
            assert_eq!(started.elapsed(), Duration::from_secs(n));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ClockTick>();
        let mut clock = SessionClock::new(Duration::from_secs(1));
        let _keep_open = tx.clone();
        clock.arm(tx);
        rx.recv().await.unwrap();

        clock.disarm();
        assert!(!clock.is_armed());
        let waited = time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err(), "no tick expected after disarm");
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_invalidates_old_epoch() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ClockTick>();
        let mut clock = SessionClock::new(Duration::from_secs(1));
        let first = clock.arm(tx.clone());
        let old = rx.recv().await.unwrap();
        assert!(clock.is_current(old));

        let second = clock.arm(tx);
        assert_ne!(first, second);
        assert!(!clock.is_current(old));
        let fresh = rx.recv().await.unwrap();
        assert_eq!(fresh.epoch, second);
        assert!(clock.is_current(fresh));

        clock.disarm();
        assert!(!clock.is_current(fresh));
    }

    #[test]
    fn zero_period_is_clamped() {
        let clock = SessionClock::new(Duration::ZERO);
        assert_eq!(clock.period(), Duration::from_millis(1));
    }
}
