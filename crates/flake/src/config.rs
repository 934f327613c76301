#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    generator::{IdWorker, validate_identity},
    time::{SystemClock, TimeSource},
    wait::{SpinWaiter, Waiter},
};

/// Identity and warm-start settings for an [`IdWorker`].
///
/// With the `serde` feature this can be embedded in a host application's
/// configuration file. Missing fields default to zero.
///
/// ```
/// use flake::WorkerConfig;
///
/// let config = WorkerConfig {
///     worker_id: 4,
///     datacenter_id: 2,
///     ..WorkerConfig::default()
/// };
/// let worker = config.build()?;
/// assert_eq!(worker.worker_id(), 4);
/// assert_eq!(worker.datacenter_id(), 2);
/// # Ok::<(), flake::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct WorkerConfig {
    /// Worker ID, `0..=31`.
    pub worker_id: i64,
    /// Datacenter ID, `0..=31`.
    pub datacenter_id: i64,
    /// Starting sequence.
    pub sequence: i64,
}

impl WorkerConfig {
    /// Checks the IDs without building a generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn validate(&self) -> Result<()> {
        validate_identity(self.worker_id, self.datacenter_id)
    }

    /// Builds a generator on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn build(self) -> Result<IdWorker<SystemClock, SpinWaiter>> {
        self.build_with(SystemClock, SpinWaiter)
    }

    /// Builds a generator with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either ID is outside `0..=31`.
    ///
    /// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
    pub fn build_with<T, W>(self, time: T, waiter: W) -> Result<IdWorker<T, W>>
    where
        T: TimeSource,
        W: Waiter,
    {
        IdWorker::from_components(
            self.worker_id,
            self.datacenter_id,
            self.sequence,
            time,
            waiter,
        )
    }
}

impl<T, W> From<&IdWorker<T, W>> for WorkerConfig {
    /// Captures a running generator's identity and current sequence.
    fn from(worker: &IdWorker<T, W>) -> Self {
        Self {
            worker_id: worker.worker_id(),
            datacenter_id: worker.datacenter_id(),
            sequence: worker.sequence(),
        }
    }
}
