//! Encoder: Value -> bytes
//!
//! Satu `Encoder` = satu sesi. Output buffer dan dynamic dictionary
//! dibuat fresh dan dibuang setelah `encode` selesai.

use crate::core::{DynamicIndex, OutputBuffer, StaticDictionary, DEFAULT_INITIAL_CAPACITY};
use crate::error::{Error, Result};
use crate::protocol::format::{
    ContainerKind, Header, INLINE_INT_MAX, INLINE_INT_MIN, MAX_DEPTH, MAX_INLINE_LENGTH,
    MAX_LENGTH, MAX_U16_LENGTH, SHORT_INT_BIAS, SHORT_INT_MAX, TAG_FALSE, TAG_FLOAT32,
    TAG_FLOAT64, TAG_INLINE_INT, TAG_INT32, TAG_NULL, TAG_SHORT_INT, TAG_STATIC_REF, TAG_TRUE,
};
use crate::value::{split_data_uri, Map, Value};

/// Opsi untuk satu sesi encode
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions<'d> {
    /// Static dictionary yang juga harus disuplai ke decoder
    pub static_dictionary: Option<&'d StaticDictionary>,
    /// Kapasitas awal output buffer
    pub initial_capacity: usize,
    /// Encode string `data:<mt>,<base64>` sebagai binary payload
    pub pack_data_uris: bool,
    /// Pakai tag integer 11-bit / 32-bit dan float32 bila exact
    pub compact_numbers: bool,
}

impl Default for EncodeOptions<'_> {
    fn default() -> Self {
        Self {
            static_dictionary: None,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            pack_data_uris: false,
            compact_numbers: false,
        }
    }
}

impl<'d> EncodeOptions<'d> {
    pub fn with_static_dictionary(mut self, dictionary: &'d StaticDictionary) -> Self {
        self.static_dictionary = Some(dictionary);
        self
    }
}

/// Sesi encoder
pub struct Encoder<'d> {
    out: OutputBuffer,
    static_dictionary: Option<&'d StaticDictionary>,
    dynamic: DynamicIndex,
    pack_data_uris: bool,
    compact_numbers: bool,
    // Jumlah array / object / data yang sedang dibuka
    depth: usize,
}

impl<'d> Encoder<'d> {
    /// Membuat encoder untuk satu sesi
    pub fn new(options: EncodeOptions<'d>) -> Self {
        Self {
            out: OutputBuffer::with_capacity(options.initial_capacity),
            static_dictionary: options.static_dictionary,
            dynamic: DynamicIndex::new(),
            pack_data_uris: options.pack_data_uris,
            compact_numbers: options.compact_numbers,
            depth: 0,
        }
    }

    /// Encode header + value, consume sesi
    pub fn encode(mut self, value: &Value) -> Result<Vec<u8>> {
        let size = self.static_dictionary.map_or(0, StaticDictionary::len);
        // StaticDictionary::new sudah menolak > 2048 entry
        let header = Header::new(size as u16);
        self.out.write_bytes(&header.to_bytes())?;

        self.encode_value(value)?;

        log::debug!(
            "encoded {} bytes ({} dynamic dictionary inserts, {} static entries)",
            self.out.len(),
            self.dynamic.dictionary().inserted(),
            size
        );
        Ok(self.out.into_bytes())
    }

    fn encode_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.out.write_u8(TAG_NULL),
            Value::Bool(b) => self.out.write_u8(if *b { TAG_TRUE } else { TAG_FALSE }),
            Value::Number(n) => self.encode_number(*n),
            Value::String(s) => self.encode_string(s),
            Value::Array(items) => self.encode_array(items),
            Value::Object(map) => self.encode_object(map),
            Value::Data {
                media_type,
                payload,
            } => self.encode_data(media_type, payload),
        }
    }

    fn encode_number(&mut self, n: f64) -> Result<()> {
        // Negative zero tidak punya representasi integer
        let integral = n.fract() == 0.0 && !(n == 0.0 && n.is_sign_negative());

        if integral && n >= INLINE_INT_MIN as f64 && n <= INLINE_INT_MAX as f64 {
            let v = n as i64;
            return self
                .out
                .write_u8(TAG_INLINE_INT + (v - INLINE_INT_MIN) as u8);
        }

        if self.compact_numbers {
            if integral && n >= SHORT_INT_BIAS as f64 && n <= SHORT_INT_MAX as f64 {
                let v = (n as i64 - SHORT_INT_BIAS) as u16;
                self.out.write_u8(TAG_SHORT_INT | (v >> 8) as u8)?;
                return self.out.write_u8((v & 0xFF) as u8);
            }
            if integral && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
                self.out.write_u8(TAG_INT32)?;
                return self.out.write_i32(n as i32);
            }
            let narrow = n as f32;
            if n.is_finite() && f64::from(narrow) == n {
                self.out.write_u8(TAG_FLOAT32)?;
                return self.out.write_f32(narrow);
            }
        }

        self.out.write_u8(TAG_FLOAT64)?;
        self.out.write_f64(n)
    }

    fn encode_string(&mut self, s: &str) -> Result<()> {
        if s.is_empty() {
            return self.write_kind_and_length(ContainerKind::String, 0);
        }

        if let Some(slot) = self.dynamic.lookup(s) {
            return self.out.write_u8(slot);
        }

        if let Some(index) = self.static_dictionary.and_then(|d| d.position(s)) {
            return self.out.write_u16(u16::from(TAG_STATIC_REF) << 8 | index);
        }

        if self.pack_data_uris {
            if let Some((media_type, payload)) = split_data_uri(s) {
                return self.encode_data(media_type, &payload);
            }
        }

        self.write_kind_and_length(ContainerKind::String, s.len() as u64)?;
        self.out.write_bytes(s.as_bytes())?;
        self.dynamic.observe(s);
        Ok(())
    }

    fn encode_data(&mut self, media_type: &str, payload: &[u8]) -> Result<()> {
        self.enter()?;
        self.write_kind_and_length(ContainerKind::Data, payload.len() as u64)?;
        self.encode_string(media_type)?;
        self.out.write_bytes(payload)?;
        self.depth -= 1;
        Ok(())
    }

    fn encode_array(&mut self, items: &[Value]) -> Result<()> {
        self.enter()?;
        self.write_kind_and_length(ContainerKind::Array, items.len() as u64)?;
        for item in items {
            self.encode_value(item)?;
        }
        self.depth -= 1;
        Ok(())
    }

    fn encode_object(&mut self, map: &Map) -> Result<()> {
        self.enter()?;
        self.write_kind_and_length(ContainerKind::Object, map.len() as u64)?;
        for (key, value) in map {
            self.encode_string(key)?;
            self.encode_value(value)?;
        }
        self.depth -= 1;
        Ok(())
    }

    /// Buka satu level nesting; decoder menolak lebih dari `MAX_DEPTH`
    #[inline(always)]
    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::DepthExceeded { max: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    /// Tulis tag + panjang: inline (0..=7), u16, atau 48-bit
    pub(crate) fn write_kind_and_length(&mut self, kind: ContainerKind, length: u64) -> Result<()> {
        if length <= MAX_INLINE_LENGTH {
            self.out.write_u8(kind.inline_tag(length as u8))
        } else if length <= MAX_U16_LENGTH {
            self.out.write_u8(kind.u16_tag())?;
            self.out.write_u16(length as u16)
        } else if length <= MAX_LENGTH {
            self.out.write_u8(kind.u48_tag())?;
            self.out.write_u16((length >> 32) as u16)?;
            self.out.write_u32((length & 0xFFFF_FFFF) as u32)
        } else {
            Err(Error::LengthOverflow { length })
        }
    }

    #[cfg(test)]
    fn written(&self) -> &[u8] {
        self.out.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::format::HEADER_SIZE;

    fn body(value: &Value) -> Vec<u8> {
        let bytes = Encoder::new(EncodeOptions::default()).encode(value).unwrap();
        bytes[HEADER_SIZE..].to_vec()
    }

    fn body_with(value: &Value, options: EncodeOptions) -> Vec<u8> {
        let bytes = Encoder::new(options).encode(value).unwrap();
        bytes[HEADER_SIZE..].to_vec()
    }

    #[test]
    fn test_header_written() {
        let dict = StaticDictionary::new(["a", "b", "c"]).unwrap();
        let options = EncodeOptions::default().with_static_dictionary(&dict);
        let bytes = Encoder::new(options).encode(&Value::Null).unwrap();
        assert_eq!(bytes, vec![0xD3, b'J', b'R', b'b', 1, 0, 0, 3, TAG_NULL]);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(body(&Value::Null), vec![0xFC]);
        assert_eq!(body(&Value::Bool(false)), vec![0xFD]);
        assert_eq!(body(&Value::Bool(true)), vec![0xFE]);
    }

    #[test]
    fn test_inline_integer_bounds() {
        assert_eq!(body(&Value::Number(-16.0)), vec![0x80]);
        assert_eq!(body(&Value::Number(0.0)), vec![0x90]);
        assert_eq!(body(&Value::Number(1.0)), vec![0x91]);
        assert_eq!(body(&Value::Number(47.0)), vec![0xBF]);

        let mut expected = vec![TAG_FLOAT64];
        expected.extend_from_slice(&48.0f64.to_be_bytes());
        assert_eq!(body(&Value::Number(48.0)), expected);

        let mut expected = vec![TAG_FLOAT64];
        expected.extend_from_slice(&(-17.0f64).to_be_bytes());
        assert_eq!(body(&Value::Number(-17.0)), expected);
    }

    #[test]
    fn test_non_integers_use_float64() {
        for n in [0.5, -0.0, f64::NAN, f64::INFINITY, 1e300] {
            let out = body(&Value::Number(n));
            assert_eq!(out.len(), 9);
            assert_eq!(out[0], TAG_FLOAT64);
            assert_eq!(
                f64::from_be_bytes(out[1..].try_into().unwrap()).to_bits(),
                n.to_bits()
            );
        }
    }

    #[test]
    fn test_compact_numbers() {
        let options = EncodeOptions {
            compact_numbers: true,
            ..EncodeOptions::default()
        };
        assert_eq!(body_with(&Value::Number(1008.0), options), vec![0xC8, 0x00]);
        assert_eq!(body_with(&Value::Number(3055.0), options), vec![0xCF, 0xFF]);
        assert_eq!(
            body_with(&Value::Number(3056.0), options),
            vec![TAG_INT32, 0, 0, 0x0B, 0xF0]
        );
        assert_eq!(
            body_with(&Value::Number(-100.0), options),
            vec![TAG_INT32, 0xFF, 0xFF, 0xFF, 0x9C]
        );
        let mut expected = vec![TAG_FLOAT32];
        expected.extend_from_slice(&0.5f32.to_be_bytes());
        assert_eq!(body_with(&Value::Number(0.5), options), expected);
        assert_eq!(body_with(&Value::Number(0.1), options)[0], TAG_FLOAT64);
        // Inline range tetap menang
        assert_eq!(body_with(&Value::Number(5.0), options), vec![0x95]);
    }

    #[test]
    fn test_string_literal_then_dynamic_hit() {
        let value = Value::Array(vec!["ab".into(), "ab".into(), "".into()]);
        assert_eq!(body(&value), vec![0xD3, 0xE2, b'a', b'b', 0x00, 0xE0]);
    }

    #[test]
    fn test_static_reference() {
        let entries: Vec<String> = (0..2048).map(|i| format!("k{i}")).collect();
        let dict = StaticDictionary::new(entries).unwrap();
        let options = EncodeOptions::default().with_static_dictionary(&dict);

        assert_eq!(body_with(&"k0".into(), options), vec![0xC0, 0x00]);
        assert_eq!(body_with(&"k300".into(), options), vec![0xC1, 0x2C]);
        assert_eq!(body_with(&"k2047".into(), options), vec![0xC7, 0xFF]);
    }

    #[test]
    fn test_static_hit_is_not_learned() {
        let dict = StaticDictionary::new(["x"]).unwrap();
        let options = EncodeOptions::default().with_static_dictionary(&dict);
        let value = Value::Array(vec!["x".into(), "y".into(), "y".into()]);
        // "x" tidak masuk dynamic dictionary, jadi "y" mendapat slot 0
        assert_eq!(
            body_with(&value, options),
            vec![0xD3, 0xC0, 0x00, 0xE1, b'y', 0x00]
        );
    }

    #[test]
    fn test_long_string_is_not_learned() {
        let long = "z".repeat(129);
        let value = Value::Array(vec![long.clone().into(), long.into()]);
        let out = body(&value);
        // Dua literal u16-length, tanpa dictionary hit
        assert_eq!(out.len(), 1 + 2 * (3 + 129));
        assert_eq!(out[1], 0xF2);
        assert_eq!(out[1 + 3 + 129], 0xF2);
    }

    #[test]
    fn test_object_pairs_in_insertion_order() {
        let value: Value = [("b", Value::Null), ("a", Value::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(body(&value), vec![0xDA, 0xE1, b'b', 0xFC, 0xE1, b'a', 0xFE]);
    }

    #[test]
    fn test_explicit_data_value() {
        let value = Value::Data {
            media_type: "text/plain".into(),
            payload: vec![1, 2, 3],
        };
        let mut expected = vec![0xEB, 0xF2, 0x00, 0x0A];
        expected.extend_from_slice(b"text/plain");
        expected.extend_from_slice(&[1, 2, 3]);
        assert_eq!(body(&value), expected);
    }

    #[test]
    fn test_pack_data_uris() {
        let options = EncodeOptions {
            pack_data_uris: true,
            ..EncodeOptions::default()
        };
        let value: Value = "data:a/b,AQID".into();
        assert_eq!(
            body_with(&value, options),
            vec![0xEB, 0xE3, b'a', b'/', b'b', 1, 2, 3]
        );

        // Non-kanonik: fallback ke plain string
        let value: Value = "data:a/b,AQI".into();
        assert_eq!(&body_with(&value, options)[..3], &[0xF2, 0x00, 12]);
    }

    #[test]
    fn test_write_kind_and_length_thresholds() {
        let cases: [(u64, &[u8]); 8] = [
            (0, &[0xD0]),
            (7, &[0xD7]),
            (8, &[0xF0, 0x00, 0x08]),
            (65535, &[0xF0, 0xFF, 0xFF]),
            (65536, &[0xF4, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00]),
            ((1 << 32) + 5, &[0xF4, 0x00, 0x01, 0x00, 0x00, 0x00, 0x05]),
            (MAX_LENGTH, &[0xF4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]),
            (MAX_LENGTH - 1, &[0xF4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]),
        ];
        for (length, expected) in cases {
            let mut encoder = Encoder::new(EncodeOptions::default());
            encoder
                .write_kind_and_length(ContainerKind::Array, length)
                .unwrap();
            assert_eq!(encoder.written(), expected, "length {length}");
        }
    }

    #[test]
    fn test_length_overflow() {
        let mut encoder = Encoder::new(EncodeOptions::default());
        let err = encoder
            .write_kind_and_length(ContainerKind::Object, MAX_LENGTH + 1)
            .unwrap_err();
        assert_eq!(err, Error::LengthOverflow { length: 1 << 48 });
    }

    #[test]
    fn test_small_initial_capacity_grows() {
        let options = EncodeOptions {
            initial_capacity: 4,
            ..EncodeOptions::default()
        };
        let value = Value::String("x".repeat(1000));
        let bytes = Encoder::new(options).encode(&value).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 3 + 1000);
    }

    fn nested(depth: usize) -> Value {
        let mut value = Value::Null;
        for i in 0..depth {
            value = if i % 2 == 0 {
                Value::Array(vec![value])
            } else {
                [("k", value)].into_iter().collect()
            };
        }
        value
    }

    #[test]
    fn test_max_depth() {
        let out = body(&nested(MAX_DEPTH));
        // Key "k" literal sekali, lalu referensi dynamic 1 byte
        assert_eq!(&out[..6], &[0xD9, 0xE1, b'k', 0xD1, 0xD9, 0x00]);
        assert_eq!(out.len(), MAX_DEPTH + MAX_DEPTH / 2 + 2);

        let err = Encoder::new(EncodeOptions::default())
            .encode(&nested(MAX_DEPTH + 1))
            .unwrap_err();
        assert_eq!(err, Error::DepthExceeded { max: MAX_DEPTH });
    }
}
