#![forbid(unsafe_code)]
//! Binary layout of the inspected tree's backing store.
//!
//! The target process stores its tree in a flat mapping: a `u64` node
//! count, a 16-byte optional-root record, then a dense array of 64-byte
//! node records. The offsets below mirror the target's `#[repr(C)]`
//! structs byte for byte; they are a compatibility contract, not a
//! design choice, and must not be rearranged.
//!
//! Each optional index is stored as a 16-byte slot: a 1-byte present
//! flag, 7 bytes of alignment padding, and a little-endian `u64`.

use std::convert::TryInto;
use std::ops::Range;

use crate::error::{ProbeError, Result};
use crate::snapshot::{DecodedNode, TreeMeta};

/// Offset of the node-count word within the backing store.
pub const STORE_LEN: Range<usize> = 0..8;
/// Offset of the tree metadata record within the backing store.
pub const STORE_META: Range<usize> = 8..24;
/// Offset of the first node record within the backing store.
pub const STORE_NODES: usize = 24;

/// Size of the tree metadata record.
pub const META_RECORD_LEN: usize = 16;
const META_ROOT_FLAG: usize = 0;
const META_ROOT_IDX: Range<usize> = 8..16;

/// Size of one node record.
pub const NODE_RECORD_LEN: usize = 64;
const NODE_COLOR: usize = 0;
const NODE_PARENT_FLAG: usize = 8;
const NODE_PARENT_IDX: Range<usize> = 16..24;
const NODE_LEFT_FLAG: usize = 24;
const NODE_LEFT_IDX: Range<usize> = 32..40;
const NODE_RIGHT_FLAG: usize = 40;
const NODE_RIGHT_IDX: Range<usize> = 48..56;
const NODE_VALUE: Range<usize> = 56..64;

fn read_u64(buf: &[u8], at: Range<usize>) -> u64 {
    u64::from_le_bytes(buf[at].try_into().expect("range is 8 bytes"))
}

fn read_slot(buf: &[u8], flag: usize, idx: Range<usize>) -> Option<u64> {
    if buf[flag] == 0 {
        None
    } else {
        Some(read_u64(buf, idx))
    }
}

/// Decodes one 64-byte node record.
///
/// Pure and deterministic; the same buffer always yields the same node.
pub fn decode_node(buf: &[u8]) -> Result<DecodedNode> {
    if buf.len() != NODE_RECORD_LEN {
        return Err(ProbeError::Decode("node record is not 64 bytes"));
    }
    Ok(DecodedNode {
        red: buf[NODE_COLOR] != 0,
        parent: read_slot(buf, NODE_PARENT_FLAG, NODE_PARENT_IDX),
        left: read_slot(buf, NODE_LEFT_FLAG, NODE_LEFT_IDX),
        right: read_slot(buf, NODE_RIGHT_FLAG, NODE_RIGHT_IDX),
        value: read_u64(buf, NODE_VALUE),
    })
}

/// Decodes the 16-byte tree metadata record.
pub fn decode_meta(buf: &[u8]) -> Result<TreeMeta> {
    if buf.len() != META_RECORD_LEN {
        return Err(ProbeError::Decode("metadata record is not 16 bytes"));
    }
    Ok(TreeMeta {
        root: read_slot(buf, META_ROOT_FLAG, META_ROOT_IDX),
    })
}
