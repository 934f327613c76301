use crate::time::TimeSource;

/// Blocks until the clock moves past a given timestamp.
///
/// The generator calls this, while still holding its lock, after the 4096
/// sequence values of the current millisecond run out. Implementations must
/// return a reading from `time` that is strictly greater than
/// `last_timestamp`.
pub trait Waiter {
    /// Polls `time` until it reports a value greater than `last_timestamp`
    /// and returns that value.
    fn wait_until_after(&self, time: &dyn TimeSource, last_timestamp: i64) -> i64;
}

/// Busy-polls the clock with [`core::hint::spin_loop`].
///
/// The wait is bounded by the time until the next millisecond tick, so
/// spinning keeps the hand-off latency as low as possible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinWaiter;

impl Waiter for SpinWaiter {
    fn wait_until_after(&self, time: &dyn TimeSource, last_timestamp: i64) -> i64 {
        let mut timestamp = time.current_millis();
        while timestamp <= last_timestamp {
            core::hint::spin_loop();
            timestamp = time.current_millis();
        }
        timestamp
    }
}

/// Polls the clock, yielding the thread between reads.
///
/// Useful on oversubscribed machines where a spinning thread would compete
/// with the threads it is waiting on. Other callers still queue behind the
/// generator lock for the duration of the wait.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YieldWaiter;

impl Waiter for YieldWaiter {
    fn wait_until_after(&self, time: &dyn TimeSource, last_timestamp: i64) -> i64 {
        let mut timestamp = time.current_millis();
        while timestamp <= last_timestamp {
            std::thread::yield_now();
            timestamp = time.current_millis();
        }
        timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn stepping_clock(start: i64) -> impl Fn() -> i64 {
        let next = AtomicI64::new(start);
        move || next.fetch_add(1, Ordering::Relaxed)
    }

    #[test]
    fn spin_waiter_returns_first_later_reading() {
        let clock = stepping_clock(10);
        assert_eq!(SpinWaiter.wait_until_after(&clock, 14), 15);
    }

    #[test]
    fn yield_waiter_returns_first_later_reading() {
        let clock = stepping_clock(10);
        assert_eq!(YieldWaiter.wait_until_after(&clock, 12), 13);
    }

    #[test]
    fn waiter_returns_immediately_when_clock_already_advanced() {
        let clock = || 100;
        assert_eq!(SpinWaiter.wait_until_after(&clock, 99), 100);
    }
}
