//! Sequential byte cursor for ALOC data
//!
//! All reads are bounds-checked and advance the position by exactly the
//! width consumed. Running past the end of the buffer yields
//! [`DecodeError::UnexpectedEndOfData`], which the decoders treat as the
//! signal for truncated or corrupt input.

use crate::error::{DecodeError, Result};
use glam::{Quat, Vec3};

/// Bounds-checked little/big-endian reader over a borrowed buffer
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current absolute offset
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total buffer length
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True for a zero-length buffer
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move to an absolute offset. Seeking to the end is allowed, past it is not.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(DecodeError::UnexpectedEndOfData {
                offset,
                requested: 0,
                len: self.data.len(),
            });
        }
        self.position = offset;
        Ok(())
    }

    /// Advance by `n` bytes without interpreting them
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Skip `count` elements of `width` bytes each.
    ///
    /// The size saturates, so an absurd count read from a corrupt file fails
    /// as a truncation instead of wrapping around.
    pub fn skip_elements(&mut self, count: usize, width: usize) -> Result<()> {
        self.skip(count.saturating_mul(width))
    }

    /// Read `n` raw bytes
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read up to `n` bytes, returning fewer when the buffer runs out.
    ///
    /// This is the only non-failing read; callers compare the returned length
    /// against what they asked for.
    pub fn bytes_up_to(&mut self, n: usize) -> &'a [u8] {
        let end = self.position.saturating_add(n).min(self.data.len());
        let start = self.position.min(end);
        self.position = end;
        &self.data[start..end]
    }

    /// Read a fixed-length ASCII field (not null-terminated)
    pub fn ascii(&mut self, n: usize) -> Result<String> {
        let raw = self.take(n)?;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u32_be(&mut self) -> Result<u32> {
        self.array().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn i32_le(&mut self) -> Result<i32> {
        self.array().map(i32::from_le_bytes)
    }

    #[inline]
    pub fn i32_be(&mut self) -> Result<i32> {
        self.array().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    /// Read a single IEEE-754 little-endian float
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32> {
        self.array().map(f32::from_le_bytes)
    }

    /// Read `N` consecutive floats
    pub fn f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut out = [0.0f32; N];
        for value in out.iter_mut() {
            *value = self.f32_le()?;
        }
        Ok(out)
    }

    /// Read three floats as a vector
    pub fn vec3(&mut self) -> Result<Vec3> {
        self.f32_array::<3>().map(Vec3::from_array)
    }

    /// Read four floats as an `(x, y, z, w)` quaternion, stored as-is
    pub fn quat(&mut self) -> Result<Quat> {
        self.f32_array::<4>().map(Quat::from_array)
    }

    /// Read a signed 32-bit count as a length.
    ///
    /// Negative counts map to `usize::MAX` so the following skip reports the
    /// stream as truncated.
    pub fn signed_count(&mut self) -> Result<usize> {
        self.i32_le().map(signed_len)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(DecodeError::UnexpectedEndOfData {
                offset: self.position,
                requested: n,
                len: self.data.len(),
            })?;
        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }
}

/// Convert a signed on-disk count to a length; negative values saturate.
#[inline]
pub fn signed_len(value: i32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
