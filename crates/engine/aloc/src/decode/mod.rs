//! ALOC container decoding
//!
//! # File Format
//!
//! ```text
//! [Header: 27 bytes]
//!   data_type:       u32 LE
//!   collision_type:  u32 LE
//!   signature:       15 bytes (ignored)
//!   mesh type tag:   4 bytes (ignored)
//!
//! [Sections: variable, chosen by data_type]
//!   convex meshes    u32 count + records
//!   triangle meshes  u32 count + records
//!   primitives       u32 count + tagged records ("BOX", "CAP", "SPH")
//!   shatter          u32 count (body not decoded)
//! ```
//!
//! Composite data types run their sections back to back on one cursor.
//! Decoding is all-or-nothing: any error discards the partial container. The
//! one exception is a convex section cut short inside a polygon record, which
//! ends decoding with the meshes read so far and skips any later section.

pub mod convex;
pub mod midphase;
pub mod primitive;
pub mod shatter;
pub mod triangle;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::types::{CollisionType, Container, DataType, UnimplementedSection};
use tracing::debug;

/// Layout constants
pub mod constants {
    /// Format signature following the two header words
    pub const HEADER_SIGNATURE_SIZE: usize = 15;

    /// Human-readable mesh type hint
    pub const MESH_TYPE_TAG_SIZE: usize = 4;

    /// Fixed header length
    pub const HEADER_SIZE: usize = 8 + HEADER_SIGNATURE_SIZE + MESH_TYPE_TAG_SIZE;

    /// Internal tags between a convex mesh transform and its hull
    pub const CONVEX_INTERNAL_TAG_SIZE: usize = 44;

    /// Hull polygon record (plane + index base + vertex count)
    pub const POLYGON_RECORD_SIZE: usize = 20;

    /// Gauss map flag value meaning "acceleration data follows"
    pub const GAUSS_MAP_PRESENT: f32 = 1.0;

    pub const GAUSS_MAP_TAG_SIZE: usize = 24;
    pub const GAUSS_MAP_SVM_TAG_SIZE: usize = 8;

    /// Largest valence index that still fits the byte-wide SVM table
    pub const SVM_BYTE_INDEX_MAX: i32 = 255;

    /// Triangle mesh format tag
    pub const TRIANGLE_FORMAT_TAG_SIZE: usize = 16;

    /// Mid-phase structure id preceding the serial flags
    pub const MIDPHASE_ID_SIZE: usize = 4;

    pub const BV4_TAG: &[u8; 3] = b"BV4";
    pub const BV32_TAG: &[u8; 4] = b"BV32";

    /// Quantized AABB (12 bytes) + node data (4 bytes)
    pub const BV4_NODE_SIZE: usize = 16;

    /// Local bounds centre and extents magnitude, then init data
    pub const MIDPHASE_BOUNDS_SIZE: usize = 4 * 4 + 4;

    /// BV4 quantization coefficients (centre/min and extents/max)
    pub const BV4_QUANTIZATION_SIZE: usize = 6 * 4;

    /// Geometry epsilon + AABB after the mid-phase block
    pub const MESH_BOUNDS_SIZE: usize = 4 + 6 * 4;

    pub const PRIMITIVE_TAG_SIZE: usize = 3;
}

use constants::*;

/// Decode a complete ALOC file held in memory.
///
/// # Example
///
/// ```
/// let mut data = Vec::new();
/// data.extend_from_slice(&4u32.to_le_bytes()); // PRIMITIVE
/// data.extend_from_slice(&1u32.to_le_bytes()); // STATIC
/// data.extend_from_slice(&[0u8; 19]);
/// data.extend_from_slice(&0u32.to_le_bytes()); // no primitives
///
/// let container = aloc::decode(&data).unwrap();
/// assert_eq!(container.data_type, aloc::DataType::Primitive);
/// assert_eq!(container.primitive_count(), 0);
/// ```
pub fn decode(data: &[u8]) -> Result<Container> {
    ContainerDecoder::new(data).decode()
}

/// Root decoder: reads the header and drives the section decoders
pub struct ContainerDecoder<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> ContainerDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    pub fn decode(mut self) -> Result<Container> {
        let raw_data_type = self.cursor.u32_le()?;
        let data_type = DataType::from_code(raw_data_type)
            .ok_or(DecodeError::UnsupportedDataType(raw_data_type))?;
        let collision_type = CollisionType::from_code(self.cursor.u32_le()?);
        self.cursor.skip(HEADER_SIGNATURE_SIZE)?;
        self.cursor.skip(MESH_TYPE_TAG_SIZE)?;

        debug!(?data_type, ?collision_type, len = self.cursor.len(), "decoding ALOC container");

        let mut container = Container::new(data_type, collision_type);
        match data_type {
            DataType::ConvexMesh => self.convex_section(&mut container)?,
            DataType::TriangleMesh => self.triangle_section(&mut container)?,
            DataType::ConvexMeshAndTriangleMesh => {
                self.convex_section(&mut container)?;
                if !container.convex_section_truncated {
                    self.triangle_section(&mut container)?;
                }
            }
            DataType::Primitive => self.primitive_section(&mut container)?,
            DataType::ConvexMeshAndPrimitive => {
                self.convex_section(&mut container)?;
                if !container.convex_section_truncated {
                    self.primitive_section(&mut container)?;
                }
            }
            DataType::TriangleMeshAndPrimitive => {
                self.triangle_section(&mut container)?;
                self.primitive_section(&mut container)?;
            }
            DataType::ShatterLinked => self.shatter_section(&mut container)?,
            DataType::None | DataType::KinematicLinked | DataType::KinematicLinked2 => {
                return Err(DecodeError::UnsupportedDataType(raw_data_type));
            }
        }

        container.trailing_bytes = self.cursor.remaining();
        if container.trailing_bytes > 0 {
            debug!(trailing = container.trailing_bytes, "unread bytes after last section");
        }

        Ok(container)
    }

    fn convex_section(&mut self, container: &mut Container) -> Result<()> {
        let count = self.cursor.u32_le()?;
        let section = convex::decode_convex_section(&mut self.cursor, count)?;
        container.convex_meshes = section.meshes;
        container.convex_section_truncated = section.truncated;
        Ok(())
    }

    fn triangle_section(&mut self, container: &mut Container) -> Result<()> {
        let count = self.cursor.u32_le()?;
        container.triangle_meshes = triangle::decode_triangle_section(&mut self.cursor, count)?;
        Ok(())
    }

    fn primitive_section(&mut self, container: &mut Container) -> Result<()> {
        let count = self.cursor.u32_le()?;
        let set = primitive::decode_primitive_set(&mut self.cursor, count)?;
        container.primitive_boxes = set.boxes;
        container.primitive_capsules = set.capsules;
        container.primitive_spheres = set.spheres;
        Ok(())
    }

    fn shatter_section(&mut self, container: &mut Container) -> Result<()> {
        let section = shatter::decode_shatter_section(&mut self.cursor)?;
        container.shatters = section.shatters;
        container.unimplemented = Some(UnimplementedSection::Shatter {
            declared_count: section.declared_count,
        });
        Ok(())
    }
}
