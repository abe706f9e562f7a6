//! Bounds-checked input cursor untuk decoder
//!
//! Setiap read memajukan offset. Read di luar batas buffer menghasilkan
//! decode error dengan offset, tidak pernah panic.

use crate::error::{Error, Result};

/// Cursor baca di atas byte slice (zero-copy)
pub struct InputCursor<'a> {
    buffer: &'a [u8],
    read_pos: usize,
}

impl<'a> InputCursor<'a> {
    #[inline(always)]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            read_pos: 0,
        }
    }

    /// Offset baca saat ini
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.read_pos
    }

    /// Sisa byte yang belum dibaca
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }

    /// Ambil `len` byte berikutnya sebagai slice
    #[inline(always)]
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::decode(
                self.read_pos,
                format!(
                    "Unexpected end of buffer: needed {} bytes, {} available",
                    len,
                    self.remaining()
                ),
            ));
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.buffer[start..self.read_pos])
    }

    #[inline(always)]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_be_bytes)
    }

    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_be_bytes)
    }

    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_array().map(f64::from_be_bytes)
    }

    /// Panjang 48-bit: u16 high lalu u32 low
    #[inline(always)]
    pub fn read_u48(&mut self) -> Result<u64> {
        let high = u64::from(self.read_u16()?);
        let low = u64::from(self.read_u32()?);
        Ok((high << 32) | low)
    }
}
