//! Wire Format: header 8 byte + satu encoded value
//!
//! Layout:
//! ┌──────────────────────────────────────────────────────────┐
//! │ Magic 0xD3 'J' 'R' 'b' (4) │ Version (1) │ Reserved (1)  │
//! │ Static dictionary size, u16 big-endian (2)               │
//! ├──────────────────────────────────────────────────────────┤
//! │ Value (tag byte + extra bytes, rekursif)                 │
//! └──────────────────────────────────────────────────────────┘
//!
//! Semua integer multi-byte big-endian.

/// Magic bytes di awal setiap buffer
pub const MAGIC: [u8; 4] = [0xD3, b'J', b'R', b'b'];
pub const VERSION: u8 = 1;
pub const HEADER_SIZE: usize = 8;

/// Offset field di dalam header
pub const VERSION_OFFSET: usize = 4;
pub const RESERVED_OFFSET: usize = 5;
pub const DICTIONARY_SIZE_OFFSET: usize = 6;

/// Batas format untuk static dictionary (index 11-bit)
pub const MAX_STATIC_DICTIONARY: usize = 2048;
/// Jumlah slot dynamic dictionary (index 7-bit)
pub const DYNAMIC_DICTIONARY_SLOTS: usize = 128;
/// Panjang maksimum (byte) string yang boleh masuk dynamic dictionary
pub const MAX_DYNAMIC_STRING_LEN: usize = 128;

/// Panjang terbesar yang muat di field 48-bit
pub const MAX_LENGTH: u64 = 0xFFFF_FFFF_FFFF;
pub const MAX_INLINE_LENGTH: u64 = 0b111;
pub const MAX_U16_LENGTH: u64 = 0xFFFF;

/// Kedalaman nesting maksimum array / object / data, sama di encoder dan decoder
pub const MAX_DEPTH: usize = 256;

/// Range integer 1-byte: tag 0x80..=0xBF
pub const INLINE_INT_MIN: i64 = -16;
pub const INLINE_INT_MAX: i64 = 47;
/// Range integer 11-bit: tag 0xC8..=0xCF
pub const SHORT_INT_BIAS: i64 = 1008;
pub const SHORT_INT_MAX: i64 = SHORT_INT_BIAS + 0x7FF;

// Tag ranges
pub const TAG_DYNAMIC_MAX: u8 = 0b0111_1111;
pub const TAG_INLINE_INT: u8 = 0b1000_0000;
pub const TAG_INLINE_INT_MAX: u8 = 0b1011_1111;
pub const TAG_STATIC_REF: u8 = 0b1100_0000;
pub const TAG_SHORT_INT: u8 = 0b1100_1000;
pub const TAG_INLINE_CONTAINER: u8 = 0b1101_0000;
pub const TAG_INLINE_CONTAINER_MAX: u8 = 0b1110_1111;
pub const TAG_U16_CONTAINER: u8 = 0b1111_0000;
pub const TAG_U48_CONTAINER: u8 = 0b1111_0100;

// Tag tunggal
pub const TAG_INT32: u8 = 0b1111_1000;
pub const TAG_FLOAT32: u8 = 0b1111_1001;
pub const TAG_FLOAT64: u8 = 0b1111_1010;
pub const TAG_RESERVED_FB: u8 = 0b1111_1011;
pub const TAG_NULL: u8 = 0b1111_1100;
pub const TAG_FALSE: u8 = 0b1111_1101;
pub const TAG_TRUE: u8 = 0b1111_1110;
pub const TAG_RESERVED_FF: u8 = 0b1111_1111;

/// Jenis container; nilai enum = offset di dalam keluarga tag
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Array = 0,
    Object = 1,
    String = 2,
    Data = 3,
}

impl ContainerKind {
    #[inline(always)]
    pub fn from_u8(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::Array,
            1 => Self::Object,
            2 => Self::String,
            _ => Self::Data,
        }
    }

    /// Tag untuk panjang inline 0..=7
    #[inline(always)]
    pub fn inline_tag(self, length: u8) -> u8 {
        TAG_INLINE_CONTAINER + ((self as u8) << 3) + (length & 0b111)
    }

    #[inline(always)]
    pub fn u16_tag(self) -> u8 {
        TAG_U16_CONTAINER + self as u8
    }

    #[inline(always)]
    pub fn u48_tag(self) -> u8 {
        TAG_U48_CONTAINER + self as u8
    }
}

/// Header 8 byte di depan setiap buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,
    pub static_dictionary_size: u16,
}

impl Header {
    pub fn new(static_dictionary_size: u16) -> Self {
        Self {
            version: VERSION,
            static_dictionary_size,
        }
    }

    /// Serialize header ke 8 byte
    #[inline(always)]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let size = self.static_dictionary_size.to_be_bytes();
        [
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            MAGIC[3],
            self.version,
            0,
            size[0],
            size[1],
        ]
    }
}

/// Apakah string boleh masuk dynamic dictionary
#[inline(always)]
pub fn is_dynamic_eligible(s: &str) -> bool {
    !s.is_empty() && s.len() <= MAX_DYNAMIC_STRING_LEN
}
