#![forbid(unsafe_code)]
//! Capturing a decoded copy of the remote tree.

use tracing::debug;

use crate::error::{ProbeError, Result};
use crate::layout::{
    decode_meta, decode_node, META_RECORD_LEN, NODE_RECORD_LEN, STORE_LEN, STORE_META, STORE_NODES,
};
use crate::reader::MemoryRead;

/// One stored tree node, decoded from its 64-byte record.
///
/// Immutable once decoded; a fresh set is produced on every capture.
/// `parent` is decoded for completeness and diagnostics but is not
/// consulted when building the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNode {
    /// Stored color flag; red when set, black otherwise.
    pub red: bool,
    /// Stored index of the parent node, if any.
    pub parent: Option<u64>,
    /// Stored index of the left child, if any.
    pub left: Option<u64>,
    /// Stored index of the right child, if any.
    pub right: Option<u64>,
    /// The node's value.
    pub value: u64,
}

/// Tree-level metadata: which stored slot holds the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMeta {
    /// Root slot index; `None` for an empty tree.
    pub root: Option<u64>,
}

/// Caller-supplied location of the tree inside the target process.
#[derive(Debug, Clone, Copy)]
pub struct TreeHandle {
    /// Address of the backing store's length word.
    pub base: u64,
    /// The container's capacity field, when known. Used as a sanity
    /// bound on the decoded node count.
    pub capacity: Option<u64>,
}

impl TreeHandle {
    /// Handle for a backing store whose base address is already known.
    pub fn at(base: u64) -> Self {
        Self {
            base,
            capacity: None,
        }
    }

    /// Resolves a handle by dereferencing the container's internal
    /// pointer field at `ptr_addr`.
    pub fn resolve(
        reader: &dyn MemoryRead,
        ptr_addr: u64,
        capacity: Option<u64>,
    ) -> Result<Self> {
        let mut buf = [0u8; 8];
        reader.read_at(ptr_addr, &mut buf)?;
        let base = u64::from_le_bytes(buf);
        debug!(ptr_addr, base, "resolved backing store base");
        Ok(Self { base, capacity })
    }

    /// Attaches the container's capacity field to the handle.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// A fully decoded copy of the remote tree, indexed by stored slot.
///
/// Built once per inspection and discarded after rendering. Capture
/// validates every stored reference, so a snapshot that exists is
/// internally consistent: all `root`/`parent`/`left`/`right` indices
/// point inside `nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Tree metadata read alongside the node array.
    pub meta: TreeMeta,
    /// Decoded node records, in stored order.
    pub nodes: Vec<DecodedNode>,
}

impl TreeSnapshot {
    /// Reads and decodes the whole tree behind `handle`.
    ///
    /// Performs `length + 2` reads: the length word, the metadata
    /// record, then one read per node record at `base + 24 + i * 64`.
    /// Any failed read or decode propagates; a partial snapshot is
    /// never returned.
    pub fn capture(reader: &dyn MemoryRead, handle: &TreeHandle) -> Result<Self> {
        let mut word = [0u8; 8];
        reader.read_at(handle.base + STORE_LEN.start as u64, &mut word)?;
        let len = u64::from_le_bytes(word);

        if let Some(capacity) = handle.capacity {
            if len > capacity {
                return Err(ProbeError::Decode("node count exceeds container capacity"));
            }
        }

        let mut meta_buf = [0u8; META_RECORD_LEN];
        reader.read_at(handle.base + STORE_META.start as u64, &mut meta_buf)?;
        let meta = decode_meta(&meta_buf)?;
        debug!(len, root = ?meta.root, "decoded tree header");

        // The length word is untrusted target memory; do not pre-size
        // from it. A bogus length fails on its first node read instead.
        let mut nodes = Vec::new();
        let mut record = [0u8; NODE_RECORD_LEN];
        for i in 0..len {
            let addr = handle.base + STORE_NODES as u64 + i * NODE_RECORD_LEN as u64;
            reader.read_at(addr, &mut record)?;
            nodes.push(decode_node(&record)?);
        }

        let snapshot = Self { meta, nodes };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Number of stored node records.
    pub fn len(&self) -> u64 {
        self.nodes.len() as u64
    }

    /// True when the backing store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Range-checked access to a stored node.
    pub fn node(&self, index: u64) -> Result<&DecodedNode> {
        self.nodes
            .get(index as usize)
            .ok_or(ProbeError::Index {
                index,
                len: self.len(),
            })
    }

    /// Checks that every stored reference lands inside the snapshot.
    ///
    /// An out-of-range index means the bytes read do not belong to a
    /// tree of this layout (corrupted or mismatched memory); it is
    /// reported, never truncated or wrapped.
    pub fn validate(&self) -> Result<()> {
        let len = self.len();
        let check = |index: Option<u64>| match index {
            Some(i) if i >= len => Err(ProbeError::Index { index: i, len }),
            _ => Ok(()),
        };
        check(self.meta.root)?;
        for node in &self.nodes {
            check(node.parent)?;
            check(node.left)?;
            check(node.right)?;
        }
        Ok(())
    }
}
