//! Decoded ALOC records
//!
//! Plain data only: every record is produced by a section decoder and owned
//! by the [`Container`] that holds it.

use crate::layer::LayerFilter;
use bitflags::bitflags;
use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Top-level shape of a container, from the first header word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    None,
    ConvexMesh,
    TriangleMesh,
    ConvexMeshAndTriangleMesh,
    Primitive,
    ConvexMeshAndPrimitive,
    TriangleMeshAndPrimitive,
    KinematicLinked,
    ShatterLinked,
    KinematicLinked2,
}

impl DataType {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(DataType::None),
            1 => Some(DataType::ConvexMesh),
            2 => Some(DataType::TriangleMesh),
            3 => Some(DataType::ConvexMeshAndTriangleMesh),
            4 => Some(DataType::Primitive),
            5 => Some(DataType::ConvexMeshAndPrimitive),
            6 => Some(DataType::TriangleMeshAndPrimitive),
            7 => Some(DataType::KinematicLinked),
            8 => Some(DataType::ShatterLinked),
            9 => Some(DataType::KinematicLinked2),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            DataType::None => 0,
            DataType::ConvexMesh => 1,
            DataType::TriangleMesh => 2,
            DataType::ConvexMeshAndTriangleMesh => 3,
            DataType::Primitive => 4,
            DataType::ConvexMeshAndPrimitive => 5,
            DataType::TriangleMeshAndPrimitive => 6,
            DataType::KinematicLinked => 7,
            DataType::ShatterLinked => 8,
            DataType::KinematicLinked2 => 9,
        }
    }
}

/// How the engine treats the collider, from the second header word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionType {
    None,
    Static,
    Rigidbody,
    ShatterLinked,
    KinematicLinked,
    BackwardCompatible,
    /// A code this decoder does not know; kept verbatim
    Other(u32),
}

impl CollisionType {
    pub const BACKWARD_COMPATIBLE_CODE: u32 = 0x7FFF_FFFF;

    pub fn from_code(code: u32) -> Self {
        match code {
            0 => CollisionType::None,
            1 => CollisionType::Static,
            2 => CollisionType::Rigidbody,
            3 => CollisionType::ShatterLinked,
            4 => CollisionType::KinematicLinked,
            Self::BACKWARD_COMPATIBLE_CODE => CollisionType::BackwardCompatible,
            other => CollisionType::Other(other),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            CollisionType::None => 0,
            CollisionType::Static => 1,
            CollisionType::Rigidbody => 2,
            CollisionType::ShatterLinked => 3,
            CollisionType::KinematicLinked => 4,
            CollisionType::BackwardCompatible => Self::BACKWARD_COMPATIBLE_CODE,
            CollisionType::Other(code) => code,
        }
    }
}

bitflags! {
    /// Triangle mesh serialization flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SerialFlags: u32 {
        const MATERIAL_INDICES = 1 << 0;
        const FACE_REMAP = 1 << 1;
        const EIGHT_BIT_INDICES = 1 << 2;
        const SIXTEEN_BIT_INDICES = 1 << 3;
        const ADJACENCIES = 1 << 4;
        const GRB_DATA = 1 << 5;
    }
}

/// On-disk width of triangle vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexWidth {
    U8,
    U16,
    U32,
}

impl IndexWidth {
    /// 8-bit wins over 16-bit when both bits are set; 32-bit when neither is.
    pub fn from_flags(flags: SerialFlags) -> Self {
        if flags.contains(SerialFlags::EIGHT_BIT_INDICES) {
            IndexWidth::U8
        } else if flags.contains(SerialFlags::SIXTEEN_BIT_INDICES) {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        }
    }

    pub const fn bytes(self) -> usize {
        match self {
            IndexWidth::U8 => 1,
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }
}

/// Axis-aligned bounds as stored on disk (min then max)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_array(values: [f32; 6]) -> Self {
        Self {
            min: Vec3::new(values[0], values[1], values[2]),
            max: Vec3::new(values[3], values[4], values[5]),
        }
    }
}

/// Convex hull collider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConvexMesh {
    pub collision_layer: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub vertex_count: u32,
    pub has_grb_data: bool,
    pub edge_count: u32,
    pub polygon_count: u32,
    pub polygons_vertex_count: u32,
    pub vertices: Vec<Vec3>,
    pub local_bounds: Aabb,
    pub mass: f32,
    /// Column-major, as serialized
    pub inertia: Mat3,
    pub center_of_mass: Vec3,
    pub has_gauss_map: bool,
    pub bounding_radius: f32,
    pub extents: Vec3,
}

/// BV4 mid-phase header values kept for inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MidphaseInfo {
    pub version: i32,
    pub node_count: usize,
}

/// Triangle mesh collider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub collision_layer: u32,
    pub serial_flags: SerialFlags,
    pub vertex_count: u32,
    pub triangle_count: u32,
    pub vertices: Vec<Vec3>,
    /// `triangle_count * 3` vertex indices, widened to 32 bits
    pub triangle_data: Vec<u32>,
    pub midphase: MidphaseInfo,
}

impl TriangleMesh {
    pub fn index_width(&self) -> IndexWidth {
        IndexWidth::from_flags(self.serial_flags)
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangle_data
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }
}

/// Primitive tag order used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Box,
    Capsule,
    Sphere,
}

impl PrimitiveKind {
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"BOX" => Some(PrimitiveKind::Box),
            b"CAP" => Some(PrimitiveKind::Capsule),
            b"SPH" => Some(PrimitiveKind::Sphere),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static [u8; 3] {
        match self {
            PrimitiveKind::Box => b"BOX",
            PrimitiveKind::Capsule => b"CAP",
            PrimitiveKind::Sphere => b"SPH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrimitiveBox {
    pub half_extents: Vec3,
    pub collision_layer: u64,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrimitiveCapsule {
    pub radius: f32,
    pub length: f32,
    pub collision_layer: u64,
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrimitiveSphere {
    pub radius: f32,
    pub collision_layer: u64,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Shatter-linked mesh. The layout past the section count is not known yet,
/// so the decoder never produces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shatter {
    pub collision_layer: u32,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

/// A section whose count was read but whose body is not decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnimplementedSection {
    Shatter { declared_count: u32 },
}

/// A decoded ALOC file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub data_type: DataType,
    pub collision_type: CollisionType,
    pub convex_meshes: Vec<ConvexMesh>,
    pub triangle_meshes: Vec<TriangleMesh>,
    pub primitive_boxes: Vec<PrimitiveBox>,
    pub primitive_capsules: Vec<PrimitiveCapsule>,
    pub primitive_spheres: Vec<PrimitiveSphere>,
    pub shatters: Vec<Shatter>,
    /// The convex section stopped at a short polygon record
    pub convex_section_truncated: bool,
    pub unimplemented: Option<UnimplementedSection>,
    /// Bytes left unread after the last section
    pub trailing_bytes: usize,
}

impl Container {
    pub fn new(data_type: DataType, collision_type: CollisionType) -> Self {
        Self {
            data_type,
            collision_type,
            convex_meshes: Vec::new(),
            triangle_meshes: Vec::new(),
            primitive_boxes: Vec::new(),
            primitive_capsules: Vec::new(),
            primitive_spheres: Vec::new(),
            shatters: Vec::new(),
            convex_section_truncated: false,
            unimplemented: None,
            trailing_bytes: 0,
        }
    }

    pub fn primitive_count(&self) -> usize {
        self.primitive_boxes.len() + self.primitive_capsules.len() + self.primitive_spheres.len()
    }

    pub fn record_count(&self) -> usize {
        self.convex_meshes.len()
            + self.triangle_meshes.len()
            + self.primitive_count()
            + self.shatters.len()
    }

    /// Collision-layer code of every record, in container order
    pub fn layer_codes(&self) -> impl Iterator<Item = u64> + '_ {
        let convex = self.convex_meshes.iter().map(|m| u64::from(m.collision_layer));
        let triangle = self.triangle_meshes.iter().map(|m| u64::from(m.collision_layer));
        let boxes = self.primitive_boxes.iter().map(|p| p.collision_layer);
        let capsules = self.primitive_capsules.iter().map(|p| p.collision_layer);
        let spheres = self.primitive_spheres.iter().map(|p| p.collision_layer);
        let shatters = self.shatters.iter().map(|s| u64::from(s.collision_layer));
        convex
            .chain(triangle)
            .chain(boxes)
            .chain(capsules)
            .chain(spheres)
            .chain(shatters)
    }

    /// True when at least one record sits on a layer the filter keeps
    pub fn is_collidable(&self, filter: &LayerFilter) -> bool {
        self.layer_codes().any(|code| filter.is_collidable(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_codes_round_trip() {
        for code in 0..10 {
            let data_type = DataType::from_code(code).unwrap();
            assert_eq!(data_type.code(), code);
        }
        assert_eq!(DataType::from_code(10), None);
        assert_eq!(DataType::from_code(999), None);
    }

    #[test]
    fn test_collision_type_keeps_unknown_codes() {
        assert_eq!(CollisionType::from_code(2), CollisionType::Rigidbody);
        assert_eq!(
            CollisionType::from_code(0x7FFF_FFFF),
            CollisionType::BackwardCompatible
        );
        assert_eq!(CollisionType::from_code(77), CollisionType::Other(77));
        assert_eq!(CollisionType::Other(77).code(), 77);
    }

    #[test]
    fn test_index_width_selection() {
        assert_eq!(IndexWidth::from_flags(SerialFlags::empty()), IndexWidth::U32);
        assert_eq!(
            IndexWidth::from_flags(SerialFlags::EIGHT_BIT_INDICES),
            IndexWidth::U8
        );
        assert_eq!(
            IndexWidth::from_flags(SerialFlags::SIXTEEN_BIT_INDICES),
            IndexWidth::U16
        );
        assert_eq!(
            IndexWidth::from_flags(
                SerialFlags::EIGHT_BIT_INDICES | SerialFlags::SIXTEEN_BIT_INDICES
            ),
            IndexWidth::U8
        );
        assert_eq!(
            IndexWidth::from_flags(SerialFlags::GRB_DATA | SerialFlags::FACE_REMAP),
            IndexWidth::U32
        );
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(PrimitiveKind::from_tag(b"BOX"), Some(PrimitiveKind::Box));
        assert_eq!(PrimitiveKind::from_tag(b"CAP"), Some(PrimitiveKind::Capsule));
        assert_eq!(PrimitiveKind::from_tag(b"SPH"), Some(PrimitiveKind::Sphere));
        assert_eq!(PrimitiveKind::from_tag(b"box"), None);
        assert_eq!(PrimitiveKind::Capsule.tag(), b"CAP");
    }

    #[test]
    fn test_layer_codes_and_collidability() {
        let mut container = Container::new(DataType::ConvexMeshAndPrimitive, CollisionType::Static);
        container.convex_meshes.push(ConvexMesh {
            collision_layer: 3,
            ..Default::default()
        });
        container.primitive_spheres.push(PrimitiveSphere {
            collision_layer: 15,
            ..Default::default()
        });
        assert_eq!(container.layer_codes().collect::<Vec<_>>(), vec![3, 15]);
        assert_eq!(container.record_count(), 2);

        let mut filter = LayerFilter::default();
        assert!(container.is_collidable(&filter));
        filter.exclude(3u64);
        assert!(container.is_collidable(&filter));
        filter.exclude(15u64);
        assert!(!container.is_collidable(&filter));
    }

    #[test]
    fn test_empty_container_is_not_collidable() {
        let container = Container::new(DataType::ShatterLinked, CollisionType::ShatterLinked);
        assert!(!container.is_collidable(&LayerFilter::default()));
    }

    #[test]
    fn test_triangles_iterator() {
        let mesh = TriangleMesh {
            triangle_count: 2,
            triangle_data: vec![0, 1, 2, 2, 1, 3],
            ..Default::default()
        };
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [2, 1, 3]]);
    }
}
