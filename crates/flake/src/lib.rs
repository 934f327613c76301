//! Snowflake-style, time-ordered 64-bit identifiers.
//!
//! An [`IdWorker`] packs a millisecond timestamp (relative to
//! [`TWITTER_EPOCH`]), a datacenter ID, a worker ID, and a per-millisecond
//! sequence into a single `i64`:
//!
//! ```text
//!  63  62                              22 21     17 16     12 11          0
//! +---+----------------------------------+---------+---------+-------------+
//! | 0 |   timestamp delta (41 bits)      | dc (5)  | wkr (5) | seq (12)    |
//! +---+----------------------------------+---------+---------+-------------+
//! ```
//!
//! Many processes can generate IDs independently as long as each one is
//! assigned a distinct `(worker_id, datacenter_id)` pair.
//!
//! # Example
//!
//! ```
//! use flake::{FlakeId, IdWorker};
//!
//! let worker = IdWorker::new(1, 1)?;
//! let id = worker.next_id()?;
//!
//! let decoded = FlakeId::from_raw(id);
//! assert_eq!(decoded.worker_id(), 1);
//! assert_eq!(decoded.datacenter_id(), 1);
//! # Ok::<(), flake::Error>(())
//! ```
//!
//! # Feature flags
//!
//! - `parking-lot`: guard generator state with `parking_lot::Mutex`.
//! - `cache-padded`: pad the shared state to a cache line.
//! - `serde`: `Serialize`/`Deserialize` for [`FlakeId`] and [`WorkerConfig`].
//! - `tracing`: trace spans and events from the generator.

mod config;
mod error;
mod generator;
mod id;
mod time;
mod wait;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
pub use crate::wait::*;
