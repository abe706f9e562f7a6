//! Growable output buffer untuk encoder
//!
//! Buffer di-alokasi sekali di awal dengan kapasitas besar. Jika write
//! melebihi kapasitas, buffer digandakan (isi lama di-copy) sebelum lanjut.

use crate::error::{Error, Result};

/// Kapasitas awal default: 64 KiB
pub const DEFAULT_INITIAL_CAPACITY: usize = 64 * 1024;

/// Output buffer dengan write cursor
pub struct OutputBuffer {
    buffer: Vec<u8>,
    write_pos: usize,
}

impl OutputBuffer {
    /// Membuat buffer dengan kapasitas awal tertentu (minimal 1 byte)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Pastikan masih ada ruang untuk `additional` byte
    #[inline(always)]
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .write_pos
            .checked_add(additional)
            .ok_or(Error::BufferGrowth {
                requested: usize::MAX,
            })?;
        if needed <= self.buffer.len() {
            return Ok(());
        }
        self.grow(needed)
    }

    #[cold]
    fn grow(&mut self, needed: usize) -> Result<()> {
        let mut capacity = self.buffer.len();
        while capacity < needed {
            capacity = capacity
                .checked_mul(2)
                .ok_or(Error::BufferGrowth { requested: needed })?;
        }

        let mut grown = Vec::new();
        grown
            .try_reserve_exact(capacity)
            .map_err(|_| Error::BufferGrowth {
                requested: capacity,
            })?;
        grown.extend_from_slice(&self.buffer[..self.write_pos]);
        grown.resize(capacity, 0);

        log::trace!(
            "output buffer grown {} -> {} bytes",
            self.buffer.len(),
            capacity
        );
        self.buffer = grown;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.reserve(1)?;
        self.buffer[self.write_pos] = v;
        self.write_pos += 1;
        Ok(())
    }

    #[inline(always)]
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    #[inline(always)]
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    #[inline(always)]
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    #[inline(always)]
    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    #[inline(always)]
    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.write_bytes(&v.to_be_bytes())
    }

    /// Copy slice mentah ke buffer
    #[inline(always)]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?;
        self.buffer[self.write_pos..self.write_pos + bytes.len()].copy_from_slice(bytes);
        self.write_pos += bytes.len();
        Ok(())
    }

    /// Jumlah byte yang sudah ditulis
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.write_pos
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.write_pos == 0
    }

    /// Kapasitas buffer saat ini
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.write_pos]
    }

    /// Ambil hasil encode, buang kapasitas yang tidak terpakai
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buffer.truncate(self.write_pos);
        self.buffer
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }
}
