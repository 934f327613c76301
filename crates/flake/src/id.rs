use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::TWITTER_EPOCH;

/// Width of the per-millisecond sequence field.
pub const SEQUENCE_BITS: u32 = 12;
/// Width of the worker ID field.
pub const WORKER_ID_BITS: u32 = 5;
/// Width of the datacenter ID field.
pub const DATACENTER_ID_BITS: u32 = 5;

/// Largest worker ID that fits in [`WORKER_ID_BITS`] (31).
pub const MAX_WORKER_ID: i64 = -1 ^ (-1 << WORKER_ID_BITS);
/// Largest datacenter ID that fits in [`DATACENTER_ID_BITS`] (31).
pub const MAX_DATACENTER_ID: i64 = -1 ^ (-1 << DATACENTER_ID_BITS);
/// Mask of the sequence field (4095).
pub const SEQUENCE_MASK: i64 = -1 ^ (-1 << SEQUENCE_BITS);

/// Bit offset of the worker ID field.
pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
/// Bit offset of the datacenter ID field.
pub const DATACENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
/// Bit offset of the timestamp field.
pub const TIMESTAMP_LEFT_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS;

/// Mask of the worker ID field in place (`0x1F000`).
pub const WORKER_ID_MASK: i64 = MAX_WORKER_ID << WORKER_ID_SHIFT;
/// Mask of the datacenter ID field in place (`0x3E0000`).
pub const DATACENTER_ID_MASK: i64 = MAX_DATACENTER_ID << DATACENTER_ID_SHIFT;

/// A decoded view over a 64-bit ID produced by an [`IdWorker`].
///
/// - 1 bit reserved (always zero for timestamps after [`TWITTER_EPOCH`])
/// - 41 bits timestamp (ms since [`TWITTER_EPOCH`])
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63 62            22 21        17 16        12 11             0
///              +--------------+----------------+------------+------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | dc ID (5)  | wkr ID (5) | sequence (12) |
///              +--------------+----------------+------------+------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------------->|
/// ```
///
/// Ordering is the ordering of the raw integer, so IDs from one worker sort in
/// the order they were issued.
///
/// [`IdWorker`]: crate::IdWorker
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[repr(transparent)]
pub struct FlakeId {
    id: i64,
}

impl FlakeId {
    /// Wraps a raw ID.
    pub const fn from_raw(id: i64) -> Self {
        Self { id }
    }

    /// Returns the raw ID.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Packs the fields into an ID.
    ///
    /// `timestamp` is the offset from [`TWITTER_EPOCH`] in milliseconds. The
    /// datacenter ID, worker ID, and sequence are masked to their widths.
    pub const fn from_components(
        timestamp: i64,
        datacenter_id: i64,
        worker_id: i64,
        sequence: i64,
    ) -> Self {
        let id = (timestamp << TIMESTAMP_LEFT_SHIFT)
            | ((datacenter_id & MAX_DATACENTER_ID) << DATACENTER_ID_SHIFT)
            | ((worker_id & MAX_WORKER_ID) << WORKER_ID_SHIFT)
            | (sequence & SEQUENCE_MASK);
        Self { id }
    }

    /// Milliseconds since [`TWITTER_EPOCH`].
    pub const fn timestamp(&self) -> i64 {
        self.id >> TIMESTAMP_LEFT_SHIFT
    }

    /// Milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp() + TWITTER_EPOCH
    }

    /// The datacenter ID field, `0..=31`.
    pub const fn datacenter_id(&self) -> i64 {
        (self.id & DATACENTER_ID_MASK) >> DATACENTER_ID_SHIFT
    }

    /// The worker ID field, `0..=31`.
    pub const fn worker_id(&self) -> i64 {
        (self.id & WORKER_ID_MASK) >> WORKER_ID_SHIFT
    }

    /// The per-millisecond sequence field, `0..=4095`.
    pub const fn sequence(&self) -> i64 {
        self.id & SEQUENCE_MASK
    }
}

impl From<i64> for FlakeId {
    fn from(id: i64) -> Self {
        Self::from_raw(id)
    }
}

impl From<FlakeId> for i64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_constants() {
        assert_eq!(MAX_WORKER_ID, 31);
        assert_eq!(MAX_DATACENTER_ID, 31);
        assert_eq!(SEQUENCE_MASK, 4095);
        assert_eq!(WORKER_ID_SHIFT, 12);
        assert_eq!(DATACENTER_ID_SHIFT, 17);
        assert_eq!(TIMESTAMP_LEFT_SHIFT, 22);
        assert_eq!(WORKER_ID_MASK, 0x0000_0000_0001_F000);
        assert_eq!(DATACENTER_ID_MASK, 0x0000_0000_003E_0000);
    }

    #[test]
    fn zero_timestamp_layout() {
        let id = FlakeId::from_components(0, 1, 1, 0);
        assert_eq!(id.to_raw(), (1 << 17) | (1 << 12));
        assert_eq!(id.to_raw(), 135_168);
    }

    #[test]
    fn decodes_every_field() {
        let id = FlakeId::from_components(1_234_567, 17, 9, 4000);
        assert_eq!(id.timestamp(), 1_234_567);
        assert_eq!(id.unix_millis(), 1_234_567 + TWITTER_EPOCH);
        assert_eq!(id.datacenter_id(), 17);
        assert_eq!(id.worker_id(), 9);
        assert_eq!(id.sequence(), 4000);
    }

    #[test]
    fn oversized_fields_are_masked() {
        let id = FlakeId::from_components(5, 31, 31, 4096 + 7);
        assert_eq!(id.datacenter_id(), 31);
        assert_eq!(id.worker_id(), 31);
        assert_eq!(id.sequence(), 7);
        assert_eq!(id.timestamp(), 5);
    }

    #[test]
    fn pre_epoch_timestamp_round_trips() {
        let id = FlakeId::from_components(-3, 1, 2, 3);
        assert!(id.to_raw() < 0);
        assert_eq!(id.timestamp(), -3);
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.worker_id(), 2);
        assert_eq!(id.sequence(), 3);
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = FlakeId::from_components(10, 31, 31, 4095);
        let b = FlakeId::from_components(11, 0, 0, 0);
        assert!(a < b);
        assert!(a.to_raw() < b.to_raw());
    }

    #[test]
    fn display_and_debug() {
        let id = FlakeId::from_components(1, 2, 3, 4);
        assert_eq!(id.to_string(), id.to_raw().to_string());
        let debug = format!("{id:?}");
        assert!(debug.contains("datacenter_id: 2"));
        assert!(debug.contains("worker_id: 3"));
        assert!(debug.contains("sequence: 4"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_integer() {
        let id = FlakeId::from_components(1, 1, 1, 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: FlakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
