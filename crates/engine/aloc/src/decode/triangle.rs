//! Triangle mesh section
//!
//! ```text
//! collision_layer u32
//! 16 bytes format tag, 4 bytes mid-phase id
//! serial_flags i32, vertex_count u32, triangle_count u32
//! vertices               vertex_count × 3×f32
//! indices                triangle_count × 3 × {1, 2, 4} bytes
//! [material indices]     triangle_count × 2 bytes          (bit 0)
//! [face remap]           i32 max id + triangle_count × width (bit 1)
//! [adjacencies]          triangle_count × 3 × i32          (bit 4)
//! BV4 tree
//! epsilon f32, AABB 6×f32, extra triangle count i32 + that many bytes
//! [GRB]                  indices again, triangle_count × 4 × u32 adjacency,
//!                        triangle_count × u32 face remap, BV32 tree (bit 5)
//! ```
//!
//! There is no tolerance here: any short read fails the decode.

use super::constants::*;
use super::convex::read_vertices;
use super::midphase::{skip_bv32, skip_bv4};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::{IndexWidth, SerialFlags, TriangleMesh};
use tracing::debug;

/// Decode `count` triangle meshes
pub fn decode_triangle_section(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Vec<TriangleMesh>> {
    let mut meshes = Vec::new();
    for _ in 0..count {
        meshes.push(decode_triangle_mesh(cursor)?);
    }
    debug!(meshes = meshes.len(), "triangle section decoded");
    Ok(meshes)
}

/// Decode a single triangle mesh starting at the cursor
pub fn decode_triangle_mesh(cursor: &mut ByteCursor<'_>) -> Result<TriangleMesh> {
    let collision_layer = cursor.u32_le()?;
    cursor.skip(TRIANGLE_FORMAT_TAG_SIZE)?;
    cursor.skip(MIDPHASE_ID_SIZE)?;

    let serial_flags = SerialFlags::from_bits_retain(cursor.u32_le()?);
    let vertex_count = cursor.u32_le()?;
    let triangle_count = cursor.u32_le()?;
    let vertices = read_vertices(cursor, vertex_count)?;

    let width = IndexWidth::from_flags(serial_flags);
    let triangles = triangle_count as usize;
    let index_count = triangles.saturating_mul(3);
    let triangle_data = read_indices(cursor, width, index_count)?;

    if serial_flags.contains(SerialFlags::MATERIAL_INDICES) {
        cursor.skip_elements(triangles, 2)?;
    }
    if serial_flags.contains(SerialFlags::FACE_REMAP) {
        let _max_id = cursor.i32_le()?;
        cursor.skip_elements(triangles, width.bytes())?;
    }
    if serial_flags.contains(SerialFlags::ADJACENCIES) {
        cursor.skip_elements(index_count, 4)?;
    }

    let midphase = skip_bv4(cursor)?;

    cursor.skip(MESH_BOUNDS_SIZE)?;
    let extra_triangles = cursor.signed_count()?;
    cursor.skip(extra_triangles)?;

    if serial_flags.contains(SerialFlags::GRB_DATA) {
        cursor.skip_elements(index_count, width.bytes())?;
        cursor.skip_elements(triangles, 4 * 4)?;
        cursor.skip_elements(triangles, 4)?;
        skip_bv32(cursor)?;
    }

    debug!(
        collision_layer,
        ?serial_flags,
        vertex_count,
        triangle_count,
        "triangle mesh decoded"
    );

    Ok(TriangleMesh {
        collision_layer,
        serial_flags,
        vertex_count,
        triangle_count,
        vertices,
        triangle_data,
        midphase,
    })
}

/// Read `count` indices of the given width, widened to u32.
///
/// 32-bit indices are signed on disk and kept with the same bits.
fn read_indices(cursor: &mut ByteCursor<'_>, width: IndexWidth, count: usize) -> Result<Vec<u32>> {
    let capacity = count.min(cursor.remaining() / width.bytes());
    let mut indices = Vec::with_capacity(capacity);
    for _ in 0..count {
        let index = match width {
            IndexWidth::U8 => u32::from(cursor.u8()?),
            IndexWidth::U16 => u32::from(cursor.u16_le()?),
            IndexWidth::U32 => cursor.u32_le()?,
        };
        indices.push(index);
    }
    Ok(indices)
}
