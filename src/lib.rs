//! jrb - Binary Codec untuk JSON Values
//!
//! Arsitektur:
//! - Wire Format: header 8 byte + tag byte yang meng-encode tipe dan panjang
//! - Static Dictionary: daftar string dari caller, di-share encoder/decoder
//! - Dynamic Dictionary: ring buffer 128 slot, dipelajari per sesi
//! - Session: setiap encode/decode memiliki buffer dan dictionary sendiri
//!
//! ```
//! use jrb::{decode, encode, StaticDictionary, Value};
//!
//! let dict = StaticDictionary::new(["id", "name"]).unwrap();
//! let value: Value = [("id", Value::from(7)), ("name", Value::from("hermes"))]
//!     .into_iter()
//!     .collect();
//!
//! let bytes = encode(&value, Some(&dict)).unwrap();
//! assert_eq!(decode(&bytes, Some(&dict)).unwrap(), value);
//! ```

pub mod core;
pub mod error;
mod json;
pub mod protocol;
pub mod value;

pub use crate::core::StaticDictionary;
pub use error::{Error, Result};
pub use protocol::{DecodeOptions, Decoder, EncodeOptions, Encoder};
pub use value::{Map, Value};

/// Encode value dengan static dictionary opsional
pub fn encode(value: &Value, static_dictionary: Option<&StaticDictionary>) -> Result<Vec<u8>> {
    encode_with(
        value,
        EncodeOptions {
            static_dictionary,
            ..EncodeOptions::default()
        },
    )
}

/// Encode value dengan opsi lengkap
pub fn encode_with(value: &Value, options: EncodeOptions<'_>) -> Result<Vec<u8>> {
    Encoder::new(options).encode(value)
}

/// Decode satu value; static dictionary harus sama dengan milik encoder
pub fn decode(bytes: &[u8], static_dictionary: Option<&StaticDictionary>) -> Result<Value> {
    decode_with(bytes, DecodeOptions { static_dictionary })
}

/// Decode satu value dengan opsi lengkap
pub fn decode_with(bytes: &[u8], options: DecodeOptions<'_>) -> Result<Value> {
    Decoder::new(bytes, options)?.decode()
}
