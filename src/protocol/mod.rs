//! Protocol Layer: tag-based binary encoding untuk JSON values
//!
//! Prinsip desain:
//! - Byte-exact: header 8 byte + tag table yang sama persis di kedua sisi
//! - Dictionary sync: encoder dan decoder mengisi dynamic dictionary
//!   dalam urutan identik
//! - Bounds-checked: setiap read divalidasi, error selalu membawa offset

mod decoder;
mod encoder;
pub mod format;

pub use decoder::{DecodeOptions, Decoder};
pub use encoder::{EncodeOptions, Encoder};
pub use format::{ContainerKind, Header, HEADER_SIZE};
