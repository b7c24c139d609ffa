//! Packed bitfield helpers
//!
//! The convex hull header stores the GRB flag and the edge count in one
//! 32-bit word: bit 15 is the flag, bits 0-14 the count. Every decode of that
//! word goes through [`unpack_grb_edges`].

/// Bit carrying the "has GRB adjacency data" flag in the convex edge word
pub const GRB_FLAG_BIT: u32 = 15;

/// Mask for the 15-bit edge count in the convex edge word
pub const EDGE_COUNT_MASK: u32 = 0x7FFF;

/// Test a single bit of `word`
#[inline]
pub const fn extract_flag(word: u32, bit: u32) -> bool {
    (word >> bit) & 1 == 1
}

/// Keep only the bits of `word` selected by `mask`
#[inline]
pub const fn extract_count(word: u32, mask: u32) -> u32 {
    word & mask
}

/// Split the convex edge word into `(has_grb_data, edge_count)`
#[inline]
pub const fn unpack_grb_edges(word: u32) -> (bool, u32) {
    (
        extract_flag(word, GRB_FLAG_BIT),
        extract_count(word, EDGE_COUNT_MASK),
    )
}
