//! Primitive shape section
//!
//! Each record starts with a 3-byte ASCII tag and one pad byte:
//!
//! ```text
//! "BOX"  half_extents 3×f32, layer u64, position 3×f32, rotation 4×f32
//! "CAP"  radius f32, length f32, layer u64, position 3×f32, rotation 4×f32
//! "SPH"  radius f32, layer u64, position 3×f32, rotation 4×f32
//! ```

use super::constants::PRIMITIVE_TAG_SIZE;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::types::{PrimitiveBox, PrimitiveCapsule, PrimitiveKind, PrimitiveSphere};
use tracing::{debug, trace};

/// Primitives grouped by kind, each in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveSet {
    pub boxes: Vec<PrimitiveBox>,
    pub capsules: Vec<PrimitiveCapsule>,
    pub spheres: Vec<PrimitiveSphere>,
}

/// Decode `count` tagged primitive records
pub fn decode_primitive_set(cursor: &mut ByteCursor<'_>, count: u32) -> Result<PrimitiveSet> {
    let mut set = PrimitiveSet::default();
    for _ in 0..count {
        let tag = cursor.bytes(PRIMITIVE_TAG_SIZE)?;
        let kind = PrimitiveKind::from_tag(tag).ok_or_else(|| {
            DecodeError::UnknownPrimitiveTag(String::from_utf8_lossy(tag).into_owned())
        })?;
        cursor.skip(1)?;
        trace!(?kind, offset = cursor.position(), "primitive record");

        match kind {
            PrimitiveKind::Box => set.boxes.push(read_box(cursor)?),
            PrimitiveKind::Capsule => set.capsules.push(read_capsule(cursor)?),
            PrimitiveKind::Sphere => set.spheres.push(read_sphere(cursor)?),
        }
    }
    debug!(
        boxes = set.boxes.len(),
        capsules = set.capsules.len(),
        spheres = set.spheres.len(),
        "primitive section decoded"
    );
    Ok(set)
}

fn read_box(cursor: &mut ByteCursor<'_>) -> Result<PrimitiveBox> {
    Ok(PrimitiveBox {
        half_extents: cursor.vec3()?,
        collision_layer: cursor.u64_le()?,
        position: cursor.vec3()?,
        rotation: cursor.quat()?,
    })
}

fn read_capsule(cursor: &mut ByteCursor<'_>) -> Result<PrimitiveCapsule> {
    Ok(PrimitiveCapsule {
        radius: cursor.f32_le()?,
        length: cursor.f32_le()?,
        collision_layer: cursor.u64_le()?,
        position: cursor.vec3()?,
        rotation: cursor.quat()?,
    })
}

fn read_sphere(cursor: &mut ByteCursor<'_>) -> Result<PrimitiveSphere> {
    Ok(PrimitiveSphere {
        radius: cursor.f32_le()?,
        collision_layer: cursor.u64_le()?,
        position: cursor.vec3()?,
        rotation: cursor.quat()?,
    })
}
