use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{Mutex, lock_state},
    id::{FlakeId, MAX_DATACENTER_ID, MAX_WORKER_ID, SEQUENCE_MASK},
    time::{SystemClock, TWITTER_EPOCH, TimeSource},
    wait::{SpinWaiter, Waiter},
};

/// Reported by [`IdWorker::last_timestamp`] before the first ID is issued.
const NO_TIMESTAMP: i64 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct State {
    /// `None` until the first ID is issued.
    last_timestamp: Option<i64>,
    sequence: i64,
}

/// A lock-based Snowflake ID generator, safe to share across threads.
///
/// Each generator owns one `(worker_id, datacenter_id)` identity and the
/// mutable `(last_timestamp, sequence)` pair. Every call to
/// [`IdWorker::next_id`] reads the clock, compares it with the last issued
/// timestamp, and updates the sequence while holding a single mutex, so IDs
/// from one generator are strictly increasing in the order calls complete.
///
/// Identity assignment is the caller's job: two live generators configured
/// with the same pair will produce duplicate IDs.
///
/// ## Collaborators
/// - `T`: the [`TimeSource`] read on every call ([`SystemClock`] by default).
/// - `W`: the [`Waiter`] that blocks until the next millisecond once a
///   millisecond's 4096 sequence values are spent ([`SpinWaiter`] by
///   default).
///
/// # Example
/// ```
/// use std::{sync::Arc, thread};
/// use flake::IdWorker;
///
/// let worker = Arc::new(IdWorker::new(3, 7)?);
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let worker = Arc::clone(&worker);
///         thread::spawn(move || worker.next_id())
///     })
///     .collect();
///
/// for handle in handles {
///     assert!(handle.join().unwrap()? > 0);
/// }
/// # Ok::<(), flake::Error>(())
/// ```
#[derive(Debug)]
pub struct IdWorker<T = SystemClock, W = SpinWaiter> {
    worker_id: i64,
    datacenter_id: i64,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    time: T,
    waiter: W,
}

impl IdWorker {
    /// Creates a generator on the system clock with a starting sequence of
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    pub fn new(worker_id: i64, datacenter_id: i64) -> Result<Self> {
        Self::with_sequence(worker_id, datacenter_id, 0)
    }

    /// Creates a generator on the system clock with an explicit starting
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    pub fn with_sequence(worker_id: i64, datacenter_id: i64, sequence: i64) -> Result<Self> {
        Self::from_components(worker_id, datacenter_id, sequence, SystemClock, SpinWaiter)
    }
}

impl<T> IdWorker<T, SpinWaiter>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `time`.
    ///
    /// # Example
    /// ```
    /// use flake::{FlakeId, IdWorker, TWITTER_EPOCH};
    ///
    /// let worker = IdWorker::with_time(1, 1, 0, || TWITTER_EPOCH)?;
    /// assert_eq!(worker.next_id()?, 135_168);
    /// assert_eq!(FlakeId::from_raw(worker.next_id()?).sequence(), 1);
    /// # Ok::<(), flake::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    pub fn with_time(worker_id: i64, datacenter_id: i64, sequence: i64, time: T) -> Result<Self> {
        Self::from_components(worker_id, datacenter_id, sequence, time, SpinWaiter)
    }
}

impl<T, W> IdWorker<T, W>
where
    T: TimeSource,
    W: Waiter,
{
    /// Creates a generator from explicit components.
    ///
    /// # Parameters
    /// - `worker_id`: worker identity, `0..=31`
    /// - `datacenter_id`: datacenter identity, `0..=31`
    /// - `sequence`: initial sequence value; it only takes effect if the
    ///   next call lands in the same millisecond as the last issued ID, since
    ///   a fresh millisecond always restarts the sequence at zero
    /// - `time`: the clock collaborator
    /// - `waiter`: the sequence-rollover wait collaborator
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    pub fn from_components(
        worker_id: i64,
        datacenter_id: i64,
        sequence: i64,
        time: T,
        waiter: W,
    ) -> Result<Self> {
        validate_identity(worker_id, datacenter_id)?;

        let state = Mutex::new(State {
            last_timestamp: None,
            sequence,
        });
        Ok(Self {
            worker_id,
            datacenter_id,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            time,
            waiter,
        })
    }

    /// Generates the next ID.
    ///
    /// Within one millisecond the sequence increments; when all 4096 values
    /// are used the call blocks in the [`Waiter`], holding the lock, until the
    /// clock advances. A new millisecond restarts the sequence at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued timestamp. No state changes in that case, so a later
    /// call continues the same sequence once the clock recovers.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<i64> {
        let mut state = lock_state(&self.state);
        let now = self.time.current_millis();
        let State {
            last_timestamp,
            sequence,
        } = *state;

        // State is only written once the new pair is complete
        let (timestamp, sequence) = match last_timestamp {
            None => (now, 0),
            Some(last_timestamp) => match now.cmp(&last_timestamp) {
                Ordering::Equal => {
                    let sequence = sequence.wrapping_add(1) & SEQUENCE_MASK;
                    if sequence == 0 {
                        (self.cold_til_next_millis(last_timestamp), sequence)
                    } else {
                        (last_timestamp, sequence)
                    }
                }
                Ordering::Greater => (now, 0),
                Ordering::Less => return Err(Self::cold_clock_behind(now, last_timestamp)),
            },
        };
        *state = State {
            last_timestamp: Some(timestamp),
            sequence,
        };

        Ok(FlakeId::from_components(
            timestamp.wrapping_sub(TWITTER_EPOCH),
            self.datacenter_id,
            self.worker_id,
            sequence,
        )
        .to_raw())
    }

    /// Generates the next ID as a decoded [`FlakeId`].
    ///
    /// # Errors
    ///
    /// See [`IdWorker::next_id`].
    pub fn next_flake_id(&self) -> Result<FlakeId> {
        self.next_id().map(FlakeId::from_raw)
    }

    #[cold]
    #[inline(never)]
    fn cold_til_next_millis(&self, last_timestamp: i64) -> i64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(last_timestamp, "sequence exhausted, waiting for next millisecond");
        self.waiter.wait_until_after(&self.time, last_timestamp)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: i64, last_timestamp: i64) -> Error {
        let millis = last_timestamp.saturating_sub(now);
        debug_assert!(millis > 0);
        #[cfg(feature = "tracing")]
        tracing::warn!(millis, last_timestamp, "clock moved backwards");
        Error::ClockMovedBackward { millis }
    }
}

impl<T, W> IdWorker<T, W> {
    /// The worker ID encoded into every ID, `0..=31`.
    pub const fn worker_id(&self) -> i64 {
        self.worker_id
    }

    /// The datacenter ID encoded into every ID, `0..=31`.
    pub const fn datacenter_id(&self) -> i64 {
        self.datacenter_id
    }

    /// The sequence of the last issued ID, or the starting sequence before
    /// the first call.
    pub fn sequence(&self) -> i64 {
        lock_state(&self.state).sequence
    }

    /// Overwrites the sequence, e.g. to warm-start a generator.
    ///
    /// The value applies to the next call only if it lands in the same
    /// millisecond as the last issued ID. Reusing an already issued sequence
    /// for that millisecond produces duplicates.
    pub fn set_sequence(&self, sequence: i64) {
        lock_state(&self.state).sequence = sequence;
    }

    /// The Unix timestamp (ms) of the last issued ID, or `-1` before the
    /// first call.
    ///
    /// A clock that really reads `-1` is still told apart from the unset
    /// state internally.
    pub fn last_timestamp(&self) -> i64 {
        lock_state(&self.state)
            .last_timestamp
            .unwrap_or(NO_TIMESTAMP)
    }

    /// The clock this generator reads.
    pub const fn time(&self) -> &T {
        &self.time
    }

    /// The waiter used once a millisecond's sequence is spent.
    pub const fn waiter(&self) -> &W {
        &self.waiter
    }
}

pub(crate) fn validate_identity(worker_id: i64, datacenter_id: i64) -> Result<()> {
    check_component("worker id", worker_id, MAX_WORKER_ID)?;
    check_component("datacenter id", datacenter_id, MAX_DATACENTER_ID)
}

fn check_component(name: &'static str, value: i64, max: i64) -> Result<()> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidArgument { name, value, max })
    }
}
