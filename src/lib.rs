//! Decode and visualize red-black trees living in another process's
//! memory.
//!
//! The inspected process keeps its tree in a flat backing store: a
//! length word, an optional root slot, and a dense array of 64-byte
//! node records ([`layout`]). One inspection is a single synchronous
//! pass:
//!
//! ```text
//! MemoryRead → TreeSnapshot → GraphDescription → dot → viewer
//! ```
//!
//! 1. [`reader`] — positioned reads against the target's address space
//!    (live process, dump file, or in-memory fixture).
//! 2. [`snapshot`] — captures and validates a decoded copy of the tree.
//! 3. [`graph`] — walks the snapshot into a Graphviz graph description.
//! 4. [`render`] — external boundary: runs `dot` and opens the image.
//!
//! Nothing is persisted between inspections, and the target is never
//! written to.

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod layout;
pub mod reader;
pub mod render;
pub mod snapshot;
pub mod testkit;

pub use error::{ProbeError, Result};
pub use graph::GraphDescription;
pub use reader::{MemoryRead, SliceReader};
pub use render::{render, RenderOptions};
pub use snapshot::{DecodedNode, TreeHandle, TreeMeta, TreeSnapshot};

#[cfg(unix)]
pub use reader::ProcessReader;
