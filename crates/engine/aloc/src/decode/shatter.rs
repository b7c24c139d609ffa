//! Shatter-linked section
//!
//! Only the leading count is understood. The per-shatter layout has not
//! been recovered, so no [`Shatter`] records are produced and the container
//! is marked with [`UnimplementedSection::Shatter`](crate::UnimplementedSection).

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::Shatter;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShatterSection {
    pub declared_count: u32,
    pub shatters: Vec<Shatter>,
}

// TODO: decode per-shatter records once a sample with a non-zero count is available
pub fn decode_shatter_section(cursor: &mut ByteCursor<'_>) -> Result<ShatterSection> {
    let declared_count = cursor.u32_le()?;
    if declared_count > 0 {
        warn!(
            declared_count,
            offset = cursor.position(),
            "shatter records are not decoded, returning an empty shatter list"
        );
    }
    Ok(ShatterSection {
        declared_count,
        shatters: Vec::new(),
    })
}
