use std::time::{Duration, Instant};

/// Periodic tick source driven by polling.
///
/// The ticker never fires more than once per [`Ticker::poll`], so a slow tick
/// delays the next one instead of queueing a burst.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// When the next tick is due, if the ticker is running.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true if a tick is due at `now`, and schedules the following one.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due + self.interval;
                // Fell behind, don't try to catch up
                self.next_due = Some(if next <= now { now + self.interval } else { next });
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        let now = Instant::now();
        assert!(!ticker.is_running());
        assert!(!ticker.poll(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        let now = Instant::now();
        ticker.start(now);
        assert!(!ticker.poll(now + Duration::from_millis(50)));
        assert!(ticker.poll(now + Duration::from_millis(100)));
        assert!(!ticker.poll(now + Duration::from_millis(150)));
        assert!(ticker.poll(now + Duration::from_millis(200)));
        assert_eq!(ticker.next_due(), Some(now + Duration::from_millis(300)));
    }

    #[test]
    fn test_does_not_burst_after_stall() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        let now = Instant::now();
        ticker.start(now);
        let late = now + Duration::from_secs(5);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.next_due(), Some(late + Duration::from_millis(100)));
    }

    #[test]
    fn test_stop_and_restart() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        let now = Instant::now();
        ticker.start(now);
        ticker.stop();
        assert!(!ticker.poll(now + Duration::from_secs(1)));
        ticker.start(now + Duration::from_secs(1));
        assert!(ticker.poll(now + Duration::from_millis(1100)));
    }
}
