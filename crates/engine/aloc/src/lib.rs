//! Decoder for Glacier ALOC physics collision containers.
//!
//! An ALOC file holds the collision geometry of one asset: convex hulls,
//! cooked triangle meshes, primitive shapes (box, capsule, sphere) or a
//! shatter-linked set, each tagged with an engine collision layer.
//!
//! Decoding is synchronous and works on a buffer already held in memory;
//! callers own file I/O and decide how to parallelize across files.
//!
//! # Key functions
//!
//! - [`decode`]: decode a whole container
//! - [`classify`]: map a collision-layer code to a [`CollisionLayer`]
//! - [`is_collidable`]: test a layer code against a [`LayerFilter`]

pub mod bits;
pub mod cursor;
pub mod decode;
mod error;
pub mod layer;
mod types;

pub use cursor::ByteCursor;
pub use decode::{decode, ContainerDecoder};
pub use error::{DecodeError, Result};
pub use layer::{classify, is_collidable, CollisionLayer, LayerFilter, LayerFilterError};
pub use types::{
    Aabb, CollisionType, ConvexMesh, Container, DataType, IndexWidth, MidphaseInfo,
    PrimitiveBox, PrimitiveCapsule, PrimitiveKind, PrimitiveSphere, SerialFlags, Shatter,
    TriangleMesh, UnimplementedSection,
};

// Re-export glam for convenience
pub use glam;
