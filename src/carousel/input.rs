use super::{Direction, SWIPE_THRESHOLD, SWIPE_THROTTLE};
use crate::events::Key;
use std::time::Duration;

/// Lets at most one call through per window. The window opens on the call
/// that passes.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    closes_at: Option<Duration>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            closes_at: None,
        }
    }

    pub fn try_pass(&mut self, now: Duration) -> bool {
        if self.closes_at.is_some_and(|t| now < t) {
            return false;
        }
        self.closes_at = Some(now + self.window);
        true
    }
}

/// Fires once, `wait` after the most recent poke.
#[derive(Debug, Clone)]
pub struct Debounce {
    wait: Duration,
    due: Option<Duration>,
}

impl Debounce {
    pub fn new(wait: Duration) -> Self {
        Self { wait, due: None }
    }

    pub fn poke(&mut self, now: Duration) {
        self.due = Some(now + self.wait);
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// Turns wheel, swipe and arrow keys into navigation commands.
///
/// `busy` is the carousel's animation lock; every source drops input while
/// it is held, on top of any throttling.
#[derive(Debug, Clone)]
pub struct InputGate {
    wheel: Throttle,
    swipe: Throttle,
    touch_start: Option<f64>,
}

impl Default for InputGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InputGate {
    pub fn new() -> Self {
        Self {
            wheel: Throttle::new(SWIPE_THROTTLE),
            swipe: Throttle::new(SWIPE_THROTTLE),
            touch_start: None,
        }
    }

    pub fn wheel(&mut self, delta_y: f64, now: Duration, busy: bool) -> Option<Direction> {
        if delta_y == 0.0 || !self.wheel.try_pass(now) || busy {
            return None;
        }
        Some(if delta_y > 0.0 {
            Direction::Next
        } else {
            Direction::Prev
        })
    }

    pub fn touch_start(&mut self, y: f64) {
        self.touch_start = Some(y);
    }

    pub fn touch_end(&mut self, y: f64, now: Duration, busy: bool) -> Option<Direction> {
        let diff = self.touch_start.take()? - y;
        // threshold before throttle: a short swipe leaves the window open
        if diff.abs() < SWIPE_THRESHOLD || !self.swipe.try_pass(now) || busy {
            return None;
        }
        // finger travelling up pulls the next slide in
        Some(if diff > 0.0 {
            Direction::Next
        } else {
            Direction::Prev
        })
    }

    pub fn key(&self, key: Key, busy: bool) -> Option<Direction> {
        if busy {
            return None;
        }
        match key {
            Key::Down | Key::Right => Some(Direction::Next),
            Key::Up | Key::Left => Some(Direction::Prev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_throttle_reopens_after_window() {
        let mut t = Throttle::new(ms(100));
        assert!(t.try_pass(ms(0)));
        assert!(!t.try_pass(ms(50)));
        assert!(!t.try_pass(ms(99)));
        assert!(t.try_pass(ms(100)));
    }

    #[test]
    fn test_debounce_waits_for_quiet() {
        let mut d = Debounce::new(ms(300));
        d.poke(ms(0));
        d.poke(ms(200));
        assert!(!d.poll(ms(400)));
        assert!(d.poll(ms(500)));
        assert!(!d.poll(ms(900)));
    }

    #[test]
    fn test_wheel_burst_collapses_to_one_command() {
        let mut gate = InputGate::new();
        let passed = (0..10)
            .filter_map(|i| gate.wheel(3.0, ms(i * 100), false))
            .count();
        assert_eq!(passed, 1);
        assert_eq!(gate.wheel(-3.0, ms(1800), false), Some(Direction::Prev));
    }

    #[test]
    fn test_wheel_without_vertical_delta_is_ignored() {
        let mut gate = InputGate::new();
        assert_eq!(gate.wheel(0.0, ms(0), false), None);
        assert_eq!(gate.wheel(1.0, ms(1), false), Some(Direction::Next));
    }

    #[test]
    fn test_short_swipe_is_ignored_without_spending_window() {
        let mut gate = InputGate::new();
        gate.touch_start(300.0);
        assert_eq!(gate.touch_end(280.0, ms(0), false), None);

        gate.touch_start(300.0);
        assert_eq!(gate.touch_end(200.0, ms(10), false), Some(Direction::Next));
        gate.touch_start(100.0);
        assert_eq!(gate.touch_end(400.0, ms(20), false), None);
        gate.touch_start(100.0);
        assert_eq!(gate.touch_end(400.0, ms(2000), false), Some(Direction::Prev));
    }

    #[test]
    fn test_touch_end_without_start_is_ignored() {
        let mut gate = InputGate::new();
        assert_eq!(gate.touch_end(0.0, ms(0), false), None);
    }

    #[test]
    fn test_lock_blocks_every_source() {
        let mut gate = InputGate::new();
        assert_eq!(gate.key(Key::Down, true), None);
        assert_eq!(gate.wheel(5.0, ms(0), true), None);
        gate.touch_start(500.0);
        assert_eq!(gate.touch_end(0.0, ms(0), true), None);
    }

    #[test]
    fn test_arrow_mapping() {
        let gate = InputGate::new();
        assert_eq!(gate.key(Key::Down, false), Some(Direction::Next));
        assert_eq!(gate.key(Key::Right, false), Some(Direction::Next));
        assert_eq!(gate.key(Key::Up, false), Some(Direction::Prev));
        assert_eq!(gate.key(Key::Left, false), Some(Direction::Prev));
    }
}
