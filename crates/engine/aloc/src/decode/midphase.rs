//! Mid-phase bounding volume trees (BV4, BV32)
//!
//! Both trees are skipped; only the header values are kept. Version and
//! node counts are big-endian in BV4, matching the cooker's mismatch flag.

use super::constants::*;
use crate::cursor::{signed_len, ByteCursor};
use crate::error::Result;
use crate::types::MidphaseInfo;
use tracing::{debug, warn};

/// Skip a BV4 tree.
///
/// ```text
/// "BV4" + 1 pad
/// version         i32 BE
/// local bounds    4×f32 + 4 bytes init data
/// quantization    6×f32
/// node count      i32 BE
/// nodes           count × 16 bytes
/// ```
pub fn skip_bv4(cursor: &mut ByteCursor<'_>) -> Result<MidphaseInfo> {
    let tag_offset = cursor.position();
    let tag = cursor.bytes(BV4_TAG.len())?;
    if tag != BV4_TAG {
        warn!(offset = tag_offset, ?tag, "expected BV4 mid-phase tag");
    }
    cursor.skip(1)?;

    let version = cursor.i32_be()?;
    cursor.skip(MIDPHASE_BOUNDS_SIZE)?;
    cursor.skip(BV4_QUANTIZATION_SIZE)?;
    let node_count = signed_len(cursor.i32_be()?);
    cursor.skip_elements(node_count, BV4_NODE_SIZE)?;

    debug!(version, node_count, "skipped BV4 tree");
    Ok(MidphaseInfo {
        version,
        node_count,
    })
}

/// Skip a BV32 tree (GPU mid-phase).
///
/// ```text
/// "BV32"
/// version         i32 BE
/// local bounds    4×f32 + 4 bytes init data
/// node count      u32 LE, then the same count u32 BE
/// packed nodes    per node: nb u32, depth u32, nb × u32 data,
///                 nb × 4×f32 min, nb × 4×f32 max
/// ```
///
/// The big-endian copy of the node count is read but not checked.
pub fn skip_bv32(cursor: &mut ByteCursor<'_>) -> Result<MidphaseInfo> {
    let tag_offset = cursor.position();
    let tag = cursor.bytes(BV32_TAG.len())?;
    if tag != BV32_TAG {
        warn!(offset = tag_offset, ?tag, "expected BV32 mid-phase tag");
    }

    let version = cursor.i32_be()?;
    cursor.skip(MIDPHASE_BOUNDS_SIZE)?;
    let node_count = cursor.u32_le()?;
    let node_count_be = cursor.u32_be()?;
    if node_count != node_count_be {
        debug!(node_count, node_count_be, "BV32 node counts differ");
    }

    for _ in 0..node_count {
        let nb_nodes = cursor.u32_le()? as usize;
        let _depth = cursor.u32_le()?;
        cursor.skip_elements(nb_nodes, 4)?;
        cursor.skip_elements(nb_nodes, 16)?;
        cursor.skip_elements(nb_nodes, 16)?;
    }

    debug!(version, node_count, "skipped BV32 tree");
    Ok(MidphaseInfo {
        version,
        node_count: node_count as usize,
    })
}
