//! Wall clock and countdown waits

use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::Duration;

/// Source of the current time and of blocking waits
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

const TICK: Duration = Duration::from_secs(1);

/// Block for `wait` in one-second ticks, redrawing the time left on stderr
pub fn countdown<C: Clock + ?Sized>(clock: &C, wait: Duration) {
    if wait.is_zero() {
        return;
    }
    let mut remaining = wait;
    while !remaining.is_zero() {
        let shown = Duration::from_secs(remaining.as_secs_f64().ceil() as u64);
        eprint!("\rWaiting {} ...   ", humantime::format_duration(shown));
        std::io::stderr().flush().ok();

        let tick = remaining.min(TICK);
        clock.sleep(tick);
        remaining -= tick;
    }
    eprintln!("\rWaiting done.          ");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder(RefCell<Vec<Duration>>);

    impl Clock for Recorder {
        fn now(&self) -> DateTime<Utc> {
            DateTime::UNIX_EPOCH
        }

        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    #[test]
    fn test_countdown_ticks_each_second() {
        let clock = Recorder(RefCell::new(Vec::new()));
        countdown(&clock, Duration::from_millis(2500));

        let slept = clock.0.into_inner();
        assert_eq!(
            slept,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_millis(500)
            ]
        );
    }

    #[test]
    fn test_zero_countdown_does_not_sleep() {
        let clock = Recorder(RefCell::new(Vec::new()));
        countdown(&clock, Duration::ZERO);
        assert!(clock.0.into_inner().is_empty());
    }
}
