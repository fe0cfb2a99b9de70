//! Per-message accumulation of fragments into complete payloads.
//!
//! [`ReassemblyTable`] owns the chunk ordering and duplicate suppression
//! policy. Storage is delegated to a [`KeyedAccumulator`], so the locking
//! strategy can change without touching the reassembly rules.

pub mod accumulator;
pub mod table;

pub use accumulator::{KeyedAccumulator, LockedAccumulator, PartialMessage, ShardedAccumulator};
pub use table::{FragmentStatus, ReassembledMessage, ReassemblyTable};
