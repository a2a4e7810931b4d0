//! In-memory value tree passed to `serialize` and produced by `deserialize`.

use crate::encoding;
use crate::error::BcsError;
use crate::u256::U256;
use std::collections::BTreeMap;
use std::fmt;

/// A dynamically typed BCS value.
///
/// Enum values carry their variant name explicitly; the wire index is
/// looked up from the enum's declaration order.
///
/// `Bytes(b)` and a `Vector` of `U8` items holding the same bytes compare
/// equal, since both encode the same `vector<u8>`.
#[derive(Clone, Debug)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Bool(bool),
    String(String),
    Address(Vec<u8>),
    Bytes(Vec<u8>),
    Vector(Vec<Value>),
    Struct(BTreeMap<String, Value>),
    Enum {
        variant: String,
        payload: Option<Box<Value>>,
    },
}

fn bytes_eq_items(bytes: &[u8], items: &[Value]) -> bool {
    bytes.len() == items.len()
        && bytes
            .iter()
            .zip(items)
            .all(|(b, item)| matches!(item, Value::U8(v) if v == b))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::U128(a), Value::U128(b)) => a == b,
            (Value::U256(a), Value::U256(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Address(a), Value::Address(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => a == b,
            (Value::Bytes(bytes), Value::Vector(items)) | (Value::Vector(items), Value::Bytes(bytes)) => {
                bytes_eq_items(bytes, items)
            }
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (
                Value::Enum { variant: va, payload: pa },
                Value::Enum { variant: vb, payload: pb },
            ) => va == vb && pa == pb,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Address from a hex string, with or without `0x`.
    pub fn address(hex_str: &str) -> Result<Self, BcsError> {
        Ok(Value::Address(encoding::from_hex(hex_str)?))
    }

    pub fn struct_of<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn vector(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Vector(items.into_iter().collect())
    }

    pub fn variant(name: impl Into<String>, payload: Value) -> Self {
        Value::Enum {
            variant: name.into(),
            payload: Some(Box::new(payload)),
        }
    }

    pub fn unit_variant(name: impl Into<String>) -> Self {
        Value::Enum {
            variant: name.into(),
            payload: None,
        }
    }

    pub fn none() -> Self {
        Self::unit_variant("none")
    }

    pub fn some(value: Value) -> Self {
        Self::variant("some", value)
    }

    /// Name of the value kind, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::U256(_) => "u256",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Address(_) => "address",
            Value::Bytes(_) => "bytes",
            Value::Vector(_) => "vector",
            Value::Struct(_) => "struct",
            Value::Enum { .. } => "enum",
        }
    }

    /// Integer view of any integer variant or decimal/hex string.
    pub fn as_uint(&self) -> Result<U256, BcsError> {
        match self {
            Value::U8(v) => Ok(U256::from(*v)),
            Value::U16(v) => Ok(U256::from(*v)),
            Value::U32(v) => Ok(U256::from(*v)),
            Value::U64(v) => Ok(U256::from(*v)),
            Value::U128(v) => Ok(U256::from(*v)),
            Value::U256(v) => Ok(*v),
            Value::String(s) => s.parse(),
            other => Err(BcsError::TypeMismatch {
                expected: "integer".to_string(),
                found: other.kind(),
            }),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes of an address or byte vector.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Address(b) | Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Owned bytes of an address, a byte vector or a vector of `u8` values.
    pub fn to_byte_vec(&self) -> Option<Vec<u8>> {
        match self {
            Value::Address(b) | Value::Bytes(b) => Some(b.clone()),
            Value::Vector(items) => items
                .iter()
                .map(|item| match item {
                    Value::U8(b) => Some(*b),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Hex string (no prefix) of an address value.
    pub fn as_address_hex(&self) -> Option<String> {
        match self {
            Value::Address(b) => Some(encoding::to_hex(b)),
            _ => None,
        }
    }

    pub fn as_vec(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    /// Field of a struct value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        match self {
            Value::Struct(fields) => fields.get(field),
            _ => None,
        }
    }

    /// Variant name and payload of an enum value.
    pub fn as_variant(&self) -> Option<(&str, Option<&Value>)> {
        match self {
            Value::Enum { variant, payload } => Some((variant, payload.as_deref())),
            _ => None,
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        Value::U128(v)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::U256(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Vector(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::U8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::U32(v) => write!(f, "{}", v),
            Value::U64(v) => write!(f, "{}", v),
            Value::U128(v) => write!(f, "{}", v),
            Value::U256(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Address(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Bytes(b) => write!(f, "[0x{}]", hex::encode(b)),
            Value::Vector(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Struct(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                f.write_str("}")
            }
            Value::Enum { variant, payload: Some(payload) } => write!(f, "{}({})", variant, payload),
            Value::Enum { variant, payload: None } => f.write_str(variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_uint_accepts_strings_and_widths() {
        assert_eq!(Value::from(200u8).as_uint().unwrap(), U256::from(200u8));
        assert_eq!(Value::from("1000").as_uint().unwrap(), U256::from(1000u64));
        assert!(Value::from(true).as_uint().is_err());
        assert!(Value::from("ten").as_uint().is_err());
    }

    #[test]
    fn test_address_helper() {
        let value = Value::address("0x0005").unwrap();
        assert_eq!(value.as_bytes(), Some(&[0u8, 5][..]));
        assert_eq!(value.as_address_hex().unwrap(), "0005");
    }

    #[test]
    fn test_to_byte_vec() {
        assert_eq!(Value::from(vec![1u8, 2]).to_byte_vec(), Some(vec![1, 2]));
        assert_eq!(Value::Bytes(vec![3]).to_byte_vec(), Some(vec![3]));
        assert_eq!(Value::from(vec![1u16]).to_byte_vec(), None);
        assert_eq!(Value::Bool(true).to_byte_vec(), None);
    }

    #[test]
    fn test_bytes_equal_u8_vector() {
        let items = Value::vector([Value::U8(1), Value::U8(2)]);
        assert_eq!(Value::Bytes(vec![1, 2]), items);
        assert_eq!(items, Value::Bytes(vec![1, 2]));
        assert_ne!(Value::Bytes(vec![1, 2]), Value::vector([Value::U8(1)]));
        assert_ne!(Value::Bytes(vec![1]), Value::vector([Value::U16(1)]));
        assert_ne!(Value::Bytes(vec![1]), Value::Address(vec![1]));
        assert_eq!(
            Value::struct_of([("data", Value::Bytes(vec![7]))]),
            Value::struct_of([("data", Value::vector([Value::U8(7)]))])
        );
    }

    #[test]
    fn test_struct_and_enum_accessors() {
        let value = Value::struct_of([("id", Value::from(1u64)), ("flag", Value::some(true.into()))]);
        assert_eq!(value.get("id"), Some(&Value::U64(1)));
        let (variant, payload) = value.get("flag").unwrap().as_variant().unwrap();
        assert_eq!(variant, "some");
        assert_eq!(payload, Some(&Value::Bool(true)));
    }

    #[test]
    fn test_display() {
        let value = Value::vector([Value::from(1u8), Value::none()]);
        assert_eq!(value.to_string(), "[1, none]");
    }
}
