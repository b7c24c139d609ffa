//! Convex mesh section
//!
//! ```text
//! collision_layer u32, position 3×f32, rotation 4×f32
//! 44 bytes internal tags
//! vertex_count u32
//! edge word u32          bit 15 = GRB data, bits 0-14 = edge count
//! polygon_count u32, polygons_vertex_count u32
//! vertices               vertex_count × 3×f32
//! polygons               polygon_count × 20 bytes
//! polygon vertex refs    polygons_vertex_count bytes
//! faces by edge          edge_count × 2 bytes
//! faces by vertex        vertex_count × 3 bytes
//! [GRB adjacency]        edge_count × 8 bytes
//! sanity f32 (0.0), local AABB 6×f32, mass f32, inertia 9×f32,
//! centre of mass 3×f32, gauss flag f32
//! [gauss map]            when the flag is 1.0
//! bounding radius f32, extents 3×f32
//! ```

use super::constants::*;
use crate::bits::unpack_grb_edges;
use crate::cursor::{signed_len, ByteCursor};
use crate::error::Result;
use crate::types::{Aabb, ConvexMesh};
use glam::{Mat3, Vec3};
use tracing::{debug, warn};

/// Result of decoding one convex mesh
#[derive(Debug, Clone, PartialEq)]
pub enum ConvexOutcome {
    Complete(ConvexMesh),
    /// A polygon record came up short; the mesh is dropped
    Truncated { polygons_read: u32 },
}

/// Meshes decoded from a convex section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexSection {
    pub meshes: Vec<ConvexMesh>,
    /// Decoding stopped early at a short polygon record
    pub truncated: bool,
}

/// Decode `count` convex meshes.
///
/// A short polygon record ends the section without an error and keeps the
/// meshes decoded before it. Every other short read fails.
pub fn decode_convex_section(cursor: &mut ByteCursor<'_>, count: u32) -> Result<ConvexSection> {
    let mut section = ConvexSection::default();
    for index in 0..count {
        match decode_convex_mesh(cursor)? {
            ConvexOutcome::Complete(mesh) => section.meshes.push(mesh),
            ConvexOutcome::Truncated { polygons_read } => {
                warn!(
                    mesh = index,
                    declared = count,
                    polygons_read,
                    "convex polygon data ended early, stopping convex section"
                );
                section.truncated = true;
                break;
            }
        }
    }
    debug!(meshes = section.meshes.len(), "convex section decoded");
    Ok(section)
}

/// Decode a single convex mesh starting at the cursor
pub fn decode_convex_mesh(cursor: &mut ByteCursor<'_>) -> Result<ConvexOutcome> {
    let collision_layer = cursor.u32_le()?;
    let position = cursor.vec3()?;
    let rotation = cursor.quat()?;
    cursor.skip(CONVEX_INTERNAL_TAG_SIZE)?;

    let vertex_count = cursor.u32_le()?;
    let (has_grb_data, edge_count) = unpack_grb_edges(cursor.u32_le()?);
    let polygon_count = cursor.u32_le()?;
    let polygons_vertex_count = cursor.u32_le()?;

    let vertices = read_vertices(cursor, vertex_count)?;

    for polygons_read in 0..polygon_count {
        if cursor.bytes_up_to(POLYGON_RECORD_SIZE).len() < POLYGON_RECORD_SIZE {
            return Ok(ConvexOutcome::Truncated { polygons_read });
        }
    }

    let vertex_count_len = vertex_count as usize;
    let edge_count_len = edge_count as usize;
    cursor.skip(polygons_vertex_count as usize)?;
    cursor.skip_elements(edge_count_len, 2)?;
    cursor.skip_elements(vertex_count_len, 3)?;
    if has_grb_data {
        cursor.skip_elements(edge_count_len, 8)?;
    }

    let sanity = cursor.f32_le()?;
    if sanity != 0.0 {
        warn!(
            offset = cursor.position() - 4,
            value = sanity,
            "convex hull sanity slot is not 0.0"
        );
    }
    let local_bounds = Aabb::from_array(cursor.f32_array::<6>()?);
    let mass = cursor.f32_le()?;
    let inertia = Mat3::from_cols_array(&cursor.f32_array::<9>()?);
    let center_of_mass = cursor.vec3()?;

    let gauss_map_flag = cursor.f32_le()?;
    let has_gauss_map = gauss_map_flag == GAUSS_MAP_PRESENT;
    if has_gauss_map {
        skip_gauss_map(cursor)?;
    }

    let bounding_radius = cursor.f32_le()?;
    let extents = cursor.vec3()?;

    Ok(ConvexOutcome::Complete(ConvexMesh {
        collision_layer,
        position,
        rotation,
        vertex_count,
        has_grb_data,
        edge_count,
        polygon_count,
        polygons_vertex_count,
        vertices,
        local_bounds,
        mass,
        inertia,
        center_of_mass,
        has_gauss_map,
        bounding_radius,
        extents,
    }))
}

pub(crate) fn read_vertices(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Vec<Vec3>> {
    // Cap the reservation by what the buffer could actually hold
    let capacity = (count as usize).min(cursor.remaining() / 12);
    let mut vertices = Vec::with_capacity(capacity);
    for _ in 0..count {
        vertices.push(cursor.vec3()?);
    }
    Ok(vertices)
}

/// Skip the Gauss map acceleration structure (big convex data)
fn skip_gauss_map(cursor: &mut ByteCursor<'_>) -> Result<()> {
    cursor.skip(GAUSS_MAP_TAG_SIZE)?;
    let subdiv = cursor.i32_le()?;
    let num_samples = cursor.signed_count()?;
    cursor.skip_elements(num_samples, 2)?;

    cursor.skip(GAUSS_MAP_SVM_TAG_SIZE)?;
    let num_svm_verts = cursor.i32_le()?;
    let num_svm_adj_verts = cursor.i32_le()?;
    let svm_max_index = cursor.i32_le()?;
    let index_width = if svm_max_index <= SVM_BYTE_INDEX_MAX { 1 } else { 2 };
    cursor.skip_elements(signed_len(num_svm_verts), index_width)?;
    cursor.skip(signed_len(num_svm_adj_verts))?;

    debug!(
        subdiv,
        num_samples, num_svm_verts, num_svm_adj_verts, svm_max_index, "skipped gauss map"
    );
    Ok(())
}
