use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Fixed-period timer driving the race poll loop.
///
/// The first tick fires one period after the timer starts. Releasing the
/// timer consumes it, so it is released at most once and cannot tick
/// afterwards.
pub(crate) struct PollTimer {
    interval: Interval,
    token: CancellationToken,
}

impl PollTimer {
    /// `token` also stops the timer when cancelled from outside
    pub fn start(period: Duration, token: CancellationToken) -> Self {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, token }
    }

    /// Wait for the next tick; `None` once the timer has been cancelled
    pub async fn tick(&mut self) -> Option<Instant> {
        if self.token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            at = self.interval.tick() => Some(at),
        }
    }

    pub fn release(self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let start = Instant::now();
        let mut timer = PollTimer::start(Duration::from_millis(500), CancellationToken::new());

        timer.tick().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(500));
        timer.tick().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_cancels_token() {
        let token = CancellationToken::new();
        let timer = PollTimer::start(Duration::from_millis(500), token.clone());

        timer.release();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_cancel_stops_ticks() {
        let parent = CancellationToken::new();
        let mut timer = PollTimer::start(Duration::from_millis(500), parent.child_token());

        parent.cancel();
        assert!(timer.tick().await.is_none());
    }
}
