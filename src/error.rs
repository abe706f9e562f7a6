//! Error types untuk encoder dan decoder
//!
//! Semua kegagalan bersifat sinkron dan terminal: tidak ada retry,
//! tidak ada partial value yang dikembalikan ke caller.

use thiserror::Error;

/// Result type alias untuk operasi codec
pub type Result<T> = std::result::Result<T, Error>;

/// Semua error yang bisa muncul dari codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════════
    /// Static dictionary melebihi batas format
    #[error("Static dictionary exceeds maximum length ({max}): got {len} entries")]
    StaticDictionaryTooLarge { len: usize, max: usize },

    // ═══════════════════════════════════════════════════════════════
    // Decoding
    // ═══════════════════════════════════════════════════════════════
    /// Buffer tidak valid; `offset` menunjuk byte tempat masalah terdeteksi
    #[error("{reason} at offset {offset}")]
    Decode { offset: usize, reason: String },

    // ═══════════════════════════════════════════════════════════════
    // Encoding
    // ═══════════════════════════════════════════════════════════════
    /// Panjang container tidak muat di field 48-bit
    #[error("Length exceeds what can be stored in a 48 bit value: {length}")]
    LengthOverflow { length: u64 },

    /// Value lebih dalam dari batas nesting
    #[error("Maximum nesting depth exceeded ({max})")]
    DepthExceeded { max: usize },

    /// Output buffer gagal diperbesar
    #[error("Failed to grow output buffer to {requested} bytes")]
    BufferGrowth { requested: usize },
}

impl Error {
    /// Shortcut untuk membuat decode error
    pub(crate) fn decode(offset: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset dari decode error, `None` untuk jenis error lain
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Decode { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Apakah error berasal dari decoder
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
