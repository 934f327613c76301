/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that an [`IdWorker`] can produce.
///
/// [`IdWorker`]: crate::IdWorker
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A worker or datacenter ID was outside `0..=max` at construction.
    ///
    /// Not retryable: build the generator again with a corrected value.
    #[error("{name} can't be greater than {max} or less than 0 (got {value})")]
    InvalidArgument {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: i64,
        /// Largest accepted value.
        max: i64,
    },

    /// The clock reported a time earlier than the last issued ID.
    ///
    /// Generator state is left untouched, so once the clock catches up the
    /// next call resumes the sequence where it stopped.
    #[error("clock moved backwards; refusing to generate id for {millis} milliseconds")]
    ClockMovedBackward {
        /// How far the clock regressed, in milliseconds.
        millis: i64,
    },
}

impl Error {
    /// Returns `true` for [`Error::ClockMovedBackward`].
    pub const fn is_clock_regression(&self) -> bool {
        matches!(self, Self::ClockMovedBackward { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_message() {
        let err = Error::InvalidArgument {
            name: "worker id",
            value: 32,
            max: 31,
        };
        assert_eq!(
            err.to_string(),
            "worker id can't be greater than 31 or less than 0 (got 32)"
        );
        assert!(!err.is_clock_regression());
    }

    #[test]
    fn clock_moved_backward_message() {
        let err = Error::ClockMovedBackward { millis: 5 };
        assert_eq!(
            err.to_string(),
            "clock moved backwards; refusing to generate id for 5 milliseconds"
        );
        assert!(err.is_clock_regression());
    }
}
