//! Error taxonomy shared across the inspection pipeline.

use std::io;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Failures surfaced while capturing or rendering a tree.
///
/// All variants propagate to the invoking command unchanged; the crate
/// performs no recovery or retries, and never returns a partial snapshot.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The external memory reader could not satisfy a read.
    #[error("memory read failed at 0x{addr:x} ({len} bytes): {source}")]
    Read {
        /// Address the read started at.
        addr: u64,
        /// Number of bytes requested.
        len: usize,
        /// Underlying reader failure.
        source: io::Error,
    },
    /// A buffer did not match the expected fixed layout.
    #[error("decode error: {0}")]
    Decode(&'static str),
    /// A decoded root/parent/child index falls outside the snapshot.
    #[error("index {index} out of range (snapshot has {len} nodes)")]
    Index {
        /// The offending stored index.
        index: u64,
        /// Number of nodes in the snapshot.
        len: u64,
    },
    /// I/O error in the render pipeline (temp dir, dot file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The external renderer or viewer failed.
    #[error("renderer failed: {0}")]
    Render(String),
}
