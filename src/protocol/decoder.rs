//! Decoder: bytes -> Value
//!
//! Validasi header dulu, lalu satu recursive descent untuk tepat satu value.
//! Trailing bytes setelah value diabaikan: buffer boleh berupa prefix
//! dari stream yang lebih besar.

use crate::core::{DynamicDictionary, InputCursor, StaticDictionary};
use crate::error::{Error, Result};
use crate::protocol::format::{
    ContainerKind, DICTIONARY_SIZE_OFFSET, INLINE_INT_MIN, MAGIC, MAX_DEPTH,
    MAX_STATIC_DICTIONARY, RESERVED_OFFSET, SHORT_INT_BIAS, TAG_DYNAMIC_MAX, TAG_FALSE,
    TAG_FLOAT32, TAG_FLOAT64, TAG_INLINE_CONTAINER, TAG_INLINE_CONTAINER_MAX, TAG_INLINE_INT,
    TAG_INLINE_INT_MAX, TAG_INT32, TAG_NULL, TAG_RESERVED_FB, TAG_RESERVED_FF, TAG_SHORT_INT,
    TAG_STATIC_REF, TAG_TRUE, TAG_U16_CONTAINER, TAG_U48_CONTAINER, VERSION, VERSION_OFFSET,
};
use crate::value::{data_uri, Map, Value};

/// Opsi untuk satu sesi decode
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions<'d> {
    /// Harus sama dengan static dictionary yang dipakai encoder
    pub static_dictionary: Option<&'d StaticDictionary>,
}

impl<'d> DecodeOptions<'d> {
    pub fn with_static_dictionary(mut self, dictionary: &'d StaticDictionary) -> Self {
        self.static_dictionary = Some(dictionary);
        self
    }
}

/// Sesi decoder
pub struct Decoder<'a, 'd> {
    cursor: InputCursor<'a>,
    // Sudah dipotong ke ukuran yang dideklarasikan header
    static_entries: &'d [String],
    dynamic: DynamicDictionary,
    // Jumlah array / object / data yang sedang dibuka
    depth: usize,
}

impl<'a, 'd> Decoder<'a, 'd> {
    /// Membuat decoder dan validasi header
    ///
    /// Gagal dengan offset field yang bermasalah: magic, version,
    /// reserved byte, atau ukuran static dictionary.
    pub fn new(bytes: &'a [u8], options: DecodeOptions<'d>) -> Result<Self> {
        let mut cursor = InputCursor::new(bytes);
        let supplied: &'d [String] = match options.static_dictionary {
            Some(dictionary) => dictionary.entries(),
            None => &[],
        };

        let magic = cursor.read_slice(MAGIC.len()).map_err(|_| {
            Error::decode(0, "Expected binary format header \\211 J R b")
        })?;
        if magic != MAGIC {
            log::debug!("rejecting buffer with magic {:02x?}", magic);
            return Err(Error::decode(0, "Expected binary format header \\211 J R b"));
        }

        let version = cursor.read_u8()?;
        if version != VERSION {
            return Err(Error::decode(
                VERSION_OFFSET,
                format!("Expected binary format version {VERSION}, but encountered {version}"),
            ));
        }

        let reserved = cursor.read_u8()?;
        if reserved != 0 {
            return Err(Error::decode(
                RESERVED_OFFSET,
                format!("Expected all-zero reserved byte, but encountered {reserved}"),
            ));
        }

        let declared = usize::from(cursor.read_u16()?);
        if declared > MAX_STATIC_DICTIONARY {
            return Err(Error::decode(
                DICTIONARY_SIZE_OFFSET,
                format!(
                    "Expected a maximum of {MAX_STATIC_DICTIONARY} dictionary entries, but encountered {declared}"
                ),
            ));
        }
        if declared > supplied.len() {
            log::debug!(
                "header requires {} static entries, caller supplied {}",
                declared,
                supplied.len()
            );
            return Err(Error::decode(
                DICTIONARY_SIZE_OFFSET,
                format!(
                    "The file requires {} static dictionary entries, but only {} were supplied",
                    declared,
                    supplied.len()
                ),
            ));
        }

        Ok(Self {
            cursor,
            static_entries: &supplied[..declared],
            dynamic: DynamicDictionary::new(),
            depth: 0,
        })
    }

    /// Decode tepat satu value setelah header, consume sesi
    pub fn decode(mut self) -> Result<Value> {
        let value = self.decode_value()?;
        log::debug!(
            "decoded value ending at offset {} ({} trailing bytes, {} dynamic dictionary inserts)",
            self.cursor.offset(),
            self.cursor.remaining(),
            self.dynamic.inserted()
        );
        Ok(value)
    }

    /// Offset baca saat ini
    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    fn decode_value(&mut self) -> Result<Value> {
        let at = self.cursor.offset();
        let b = self.cursor.read_u8()?;

        match b {
            0x00..=TAG_DYNAMIC_MAX => self
                .dynamic
                .get(b)
                .map(|s| Value::String(s.to_owned()))
                .ok_or_else(|| {
                    Error::decode(at, format!("Dynamic dictionary slot {b} is empty"))
                }),
            TAG_INLINE_INT..=TAG_INLINE_INT_MAX => Ok(Value::Number(
                (i64::from(b - TAG_INLINE_INT) + INLINE_INT_MIN) as f64,
            )),
            TAG_STATIC_REF..=0xC7 => {
                let index = (usize::from(b & 0b111) << 8) | usize::from(self.cursor.read_u8()?);
                self.static_entries
                    .get(index)
                    .map(|s| Value::String(s.clone()))
                    .ok_or_else(|| {
                        Error::decode(
                            at,
                            format!(
                                "Static dictionary index {} out of range ({} entries)",
                                index,
                                self.static_entries.len()
                            ),
                        )
                    })
            }
            TAG_SHORT_INT..=0xCF => {
                let v = (i64::from(b & 0b111) << 8) | i64::from(self.cursor.read_u8()?);
                Ok(Value::Number((v + SHORT_INT_BIAS) as f64))
            }
            TAG_INLINE_CONTAINER..=TAG_INLINE_CONTAINER_MAX => {
                let kind = (b - TAG_INLINE_CONTAINER) >> 3;
                self.decode_container(kind, u64::from(b & 0b111), at)
            }
            TAG_U16_CONTAINER..=0xF3 => {
                let length = u64::from(self.cursor.read_u16()?);
                self.decode_container(b, length, at)
            }
            TAG_U48_CONTAINER..=0xF7 => {
                let length = self.cursor.read_u48()?;
                self.decode_container(b, length, at)
            }
            TAG_INT32 => Ok(Value::Number(f64::from(self.cursor.read_i32()?))),
            TAG_FLOAT32 => Ok(Value::Number(f64::from(self.cursor.read_f32()?))),
            TAG_FLOAT64 => Ok(Value::Number(self.cursor.read_f64()?)),
            TAG_NULL => Ok(Value::Null),
            TAG_FALSE => Ok(Value::Bool(false)),
            TAG_TRUE => Ok(Value::Bool(true)),
            TAG_RESERVED_FB | TAG_RESERVED_FF => Err(Error::decode(
                at,
                format!("Reserved byte encountered: {:04b} {:04b}", b >> 4, b & 0xF),
            )),
        }
    }

    /// Dispatch container berdasarkan 2 bit terbawah `kind`
    fn decode_container(&mut self, kind: u8, length: u64, at: usize) -> Result<Value> {
        let kind = ContainerKind::from_u8(kind);
        if kind != ContainerKind::String && self.depth >= MAX_DEPTH {
            return Err(Error::decode(at, "Maximum nesting depth exceeded"));
        }

        // Setiap elemen butuh minimal 1 byte, setiap pair minimal 2
        let min_bytes = match kind {
            ContainerKind::Object => length.saturating_mul(2),
            _ => length,
        };
        if min_bytes > self.cursor.remaining() as u64 {
            return Err(Error::decode(
                self.cursor.offset(),
                format!(
                    "Declared {:?} length {} exceeds the {} remaining bytes",
                    kind,
                    length,
                    self.cursor.remaining()
                ),
            ));
        }
        // min_bytes <= remaining, jadi muat di usize
        let length = length as usize;

        if kind == ContainerKind::String {
            return self.decode_string(length).map(Value::String);
        }

        self.depth += 1;
        let value = match kind {
            ContainerKind::Array => self.decode_array(length),
            ContainerKind::Object => self.decode_object(length),
            _ => self.decode_data(length),
        }?;
        self.depth -= 1;
        Ok(value)
    }

    fn decode_array(&mut self, length: usize) -> Result<Value> {
        let mut items = Vec::with_capacity(length);
        for _ in 0..length {
            items.push(self.decode_value()?);
        }
        Ok(Value::Array(items))
    }

    fn decode_object(&mut self, length: usize) -> Result<Value> {
        let mut map = Map::with_capacity(length);
        for _ in 0..length {
            let key = self.decode_str_value("Expected a field name")?;
            let value = self.decode_value()?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }

    fn decode_string(&mut self, length: usize) -> Result<String> {
        let at = self.cursor.offset();
        let bytes = self.cursor.read_slice(length)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::decode(at + e.valid_up_to(), "Invalid UTF-8 in string"))?;
        self.dynamic.observe(s);
        Ok(s.to_owned())
    }

    fn decode_data(&mut self, length: usize) -> Result<Value> {
        let media_type = self.decode_str_value("Expected a mediatype string")?;
        let payload = self.cursor.read_slice(length)?;
        Ok(Value::String(data_uri(&media_type, payload)))
    }

    /// Decode value yang wajib berupa string (field name, media type)
    fn decode_str_value(&mut self, reason: &str) -> Result<String> {
        let at = self.cursor.offset();
        match self.decode_value()? {
            Value::String(s) => Ok(s),
            _ => Err(Error::decode(at, reason)),
        }
    }
}
