use std::time::{SystemTime, UNIX_EPOCH};

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC, in milliseconds
/// since the Unix epoch.
///
/// Every ID stores its timestamp as an offset from this instant.
pub const TWITTER_EPOCH: i64 = 1_288_834_974_657;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// The generator reads the clock on every call, so a scripted implementation
/// can replay repeated, stalled, or backward readings without real time
/// passing.
///
/// Any `Fn() -> i64` closure is a time source:
///
/// ```
/// use std::sync::{Arc, atomic::{AtomicI64, Ordering}};
/// use flake::TimeSource;
///
/// let now = Arc::new(AtomicI64::new(1_700_000_000_000));
/// let clock = {
///     let now = Arc::clone(&now);
///     move || now.load(Ordering::Relaxed)
/// };
///
/// assert_eq!(clock.current_millis(), 1_700_000_000_000);
/// now.store(1_700_000_000_001, Ordering::Relaxed);
/// assert_eq!(clock.current_millis(), 1_700_000_000_001);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> i64;
}

impl<F> TimeSource for F
where
    F: Fn() -> i64,
{
    fn current_millis(&self) -> i64 {
        self()
    }
}

/// The system wall clock.
///
/// This is not monotonic: NTP corrections can move it backward, which the
/// generator reports as [`Error::ClockMovedBackward`].
///
/// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            // Before 1970: report it as a negative offset
            Err(e) => -(e.duration().as_millis() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_twitter_epoch() {
        assert!(SystemClock.current_millis() > TWITTER_EPOCH);
    }

    #[test]
    fn closure_is_time_source() {
        let clock = || 42;
        assert_eq!(clock.current_millis(), 42);
    }
}
