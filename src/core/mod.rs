//! Core module: state milik satu sesi encode/decode
//!
//! Prinsip desain:
//! - Per-call: buffer, cursor, dan dynamic dictionary dibuat fresh tiap sesi
//! - Bounds-checked: tidak ada read di luar buffer, tidak ada panic
//! - Shareable: hanya `StaticDictionary` yang boleh dipakai lintas sesi

mod buffer;
mod cursor;
mod dictionary;

pub use buffer::{OutputBuffer, DEFAULT_INITIAL_CAPACITY};
pub use cursor::InputCursor;
pub use dictionary::{DynamicDictionary, DynamicIndex, StaticDictionary};
