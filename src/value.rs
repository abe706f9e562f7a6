//! Value model: JSON-like tree yang di-encode oleh codec
//!
//! Tujuh varian, tertutup. Object memakai `IndexMap` supaya urutan
//! insertion tetap terjaga dan key selalu unik.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;

/// Object map dengan urutan insertion
pub type Map = IndexMap<String, Value>;

/// Prefix untuk data URI
pub const DATA_URI_PREFIX: &str = "data:";

/// JSON-like value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    /// Binary payload dengan media type, tampil sebagai `data:` URI
    Data { media_type: String, payload: Vec<u8> },
}

impl Value {
    /// Render data value sebagai `data:<media_type>,<base64>`
    ///
    /// Returns `None` untuk varian selain `Data`.
    pub fn to_data_uri(&self) -> Option<String> {
        match self {
            Value::Data {
                media_type,
                payload,
            } => Some(data_uri(media_type, payload)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Lookup field object, `None` jika bukan object atau key tidak ada
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }
}

/// Susun data URI dari media type dan payload mentah
pub(crate) fn data_uri(media_type: &str, payload: &[u8]) -> String {
    let encoded = STANDARD.encode(payload);
    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + media_type.len() + 1 + encoded.len());
    uri.push_str(DATA_URI_PREFIX);
    uri.push_str(media_type);
    uri.push(',');
    uri.push_str(&encoded);
    uri
}

/// Pecah `data:<mt>,<b64>` menjadi media type dan payload
///
/// Hanya menerima base64 kanonik (encode ulang menghasilkan teks identik),
/// karena decoder akan me-render ulang URI dari payload mentah.
pub(crate) fn split_data_uri(s: &str) -> Option<(&str, Vec<u8>)> {
    let rest = s.strip_prefix(DATA_URI_PREFIX)?;
    let (media_type, encoded) = rest.split_once(',')?;
    let payload = STANDARD.decode(encoded).ok()?;
    if STANDARD.encode(&payload) != encoded {
        return None;
    }
    Some((media_type, payload))
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
