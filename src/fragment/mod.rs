//! Normalised fragment descriptors and the envelope decoders that produce
//! them.
//!
//! Both IPC envelopes carry the same facts under different field names. The
//! decoder folds them into one [`Fragment`] so nothing downstream needs to
//! know which envelope a chunk arrived in.

pub mod decoder;
pub mod header;
pub mod id;

pub use decoder::IpcMode;
pub use header::Fragment;
pub use id::MessageId;

#[cfg(test)]
mod tests;
