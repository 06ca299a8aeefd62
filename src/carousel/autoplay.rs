use std::time::Duration;

/// Interval timer for idle advancing. Stopped while the host is hidden.
#[derive(Debug, Clone)]
pub struct Autoplay {
    period: Duration,
    due: Option<Duration>,
}

impl Autoplay {
    pub fn new(period: Duration) -> Self {
        Self { period, due: None }
    }

    /// Starts a fresh period from `now`, dropping any countdown in progress.
    pub fn restart(&mut self, now: Duration) {
        self.due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.due = None;
    }

    pub fn is_running(&self) -> bool {
        self.due.is_some()
    }

    /// True at most once per call when a period has elapsed. Missed periods
    /// are not replayed; the interval keeps its phase.
    pub fn poll(&mut self, now: Duration) -> bool {
        let Some(mut due) = self.due else {
            return false;
        };
        if now < due || self.period.is_zero() {
            return false;
        }
        while due <= now {
            due += self.period;
        }
        self.due = Some(due);
        true
    }
}
