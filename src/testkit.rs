#![forbid(unsafe_code)]
//! Fixture builders for tests and offline experiments.
//!
//! Mirrors the decoders in [`crate::layout`]: these encoders produce
//! byte images laid out exactly like the inspected process's backing
//! store, so snapshots can be captured from a [`SliceReader`] without a
//! live target.
//!
//! [`SliceReader`]: crate::reader::SliceReader

use crate::layout::{META_RECORD_LEN, NODE_RECORD_LEN, STORE_NODES};

/// Plain description of one stored node, used to build fixtures.
#[derive(Debug, Clone, Copy)]
pub struct StoredNode {
    /// Color flag.
    pub red: bool,
    /// Parent slot.
    pub parent: Option<u64>,
    /// Left child slot.
    pub left: Option<u64>,
    /// Right child slot.
    pub right: Option<u64>,
    /// Node value.
    pub value: u64,
}

fn put_slot(buf: &mut [u8], flag: usize, idx: usize, slot: Option<u64>) {
    if let Some(v) = slot {
        buf[flag] = 1;
        buf[idx..idx + 8].copy_from_slice(&v.to_le_bytes());
    }
}

/// Encodes one 64-byte node record.
pub fn encode_node(
    red: bool,
    parent: Option<u64>,
    left: Option<u64>,
    right: Option<u64>,
    value: u64,
) -> [u8; NODE_RECORD_LEN] {
    let mut buf = [0u8; NODE_RECORD_LEN];
    buf[0] = red as u8;
    put_slot(&mut buf, 8, 16, parent);
    put_slot(&mut buf, 24, 32, left);
    put_slot(&mut buf, 40, 48, right);
    buf[56..64].copy_from_slice(&value.to_le_bytes());
    buf
}

/// Encodes the 16-byte tree metadata record.
pub fn encode_meta(root: Option<u64>) -> [u8; META_RECORD_LEN] {
    let mut buf = [0u8; META_RECORD_LEN];
    put_slot(&mut buf, 0, 8, root);
    buf
}

/// Builds a complete backing-store image: length word, metadata record,
/// then every node record in slot order.
pub fn store_image(root: Option<u64>, nodes: &[StoredNode]) -> Vec<u8> {
    let mut image = Vec::with_capacity(STORE_NODES + nodes.len() * NODE_RECORD_LEN);
    image.extend_from_slice(&(nodes.len() as u64).to_le_bytes());
    image.extend_from_slice(&encode_meta(root));
    for node in nodes {
        image.extend_from_slice(&encode_node(
            node.red,
            node.parent,
            node.left,
            node.right,
            node.value,
        ));
    }
    image
}
