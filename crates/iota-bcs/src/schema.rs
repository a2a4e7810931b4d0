//! Schema definitions held by the registry and the resolved nodes the codec walks.

use crate::encoding::Encoding;
use crate::error::BcsError;
use crate::type_ref::TypeRef;
use crate::u256::U256;
use std::fmt;
use std::sync::Arc;

/// Fixed-width unsigned integer primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UintType {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

impl UintType {
    pub const fn byte_len(&self) -> usize {
        match self {
            UintType::U8 => 1,
            UintType::U16 => 2,
            UintType::U32 => 4,
            UintType::U64 => 8,
            UintType::U128 => 16,
            UintType::U256 => 32,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            UintType::U8 => "u8",
            UintType::U16 => "u16",
            UintType::U32 => "u32",
            UintType::U64 => "u64",
            UintType::U128 => "u128",
            UintType::U256 => "u256",
        }
    }

    pub fn max(&self) -> U256 {
        U256::max_for_bits(self.byte_len() as u32 * 8)
    }

    /// Fails with `IntegerRange` when `value` does not fit this width.
    pub fn check_range(&self, value: &U256) -> Result<(), BcsError> {
        if value.bit_len() > self.byte_len() as u32 * 8 {
            return Err(BcsError::IntegerRange {
                type_name: self.name(),
                value: value.to_string(),
                max: self.max().to_string(),
            });
        }
        Ok(())
    }
}

/// Leaf types with a fixed encoding rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Uint(UintType),
    Bool,
    /// ULEB128 length + UTF-8 bytes.
    String,
    /// Fixed-width raw bytes.
    Address { length: usize },
    /// ULEB128 length + raw bytes.
    Bytes,
    /// ULEB128 length + raw bytes, presented as an encoded string.
    EncodedString(Encoding),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Uint(ty) => f.write_str(ty.name()),
            Primitive::Bool => f.write_str("bool"),
            Primitive::String => f.write_str("string"),
            Primitive::Address { length } => write!(f, "address[{}]", length),
            Primitive::Bytes => f.write_str("bytes"),
            Primitive::EncodedString(encoding) => write!(f, "{}-string", encoding),
        }
    }
}

/// A registered type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeSchema {
    Primitive(Primitive),
    Struct {
        params: Vec<String>,
        fields: Vec<(String, TypeRef)>,
    },
    Enum {
        params: Vec<String>,
        variants: Vec<(String, Option<TypeRef>)>,
    },
    /// Exactly `length` elements with no length prefix.
    FixedArray { element: TypeRef, length: usize },
    /// Renaming of another type; no wire effect.
    Alias(TypeRef),
}

impl TypeSchema {
    /// Declared generic parameter names.
    pub fn params(&self) -> &[String] {
        match self {
            TypeSchema::Struct { params, .. } | TypeSchema::Enum { params, .. } => params,
            _ => &[],
        }
    }
}

/// A fully instantiated type, ready for encode/decode.
///
/// Identical sub-types are shared, so a schema that mentions the same
/// instantiation many times is resolved once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    Primitive(Primitive),
    Vector(Arc<Resolved>),
    FixedArray {
        element: Arc<Resolved>,
        length: usize,
    },
    Struct {
        name: String,
        fields: Vec<(String, Arc<Resolved>)>,
    },
    Enum {
        name: String,
        variants: Vec<(String, Option<Arc<Resolved>>)>,
    },
}

impl Resolved {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Resolved::Primitive(p) => p.to_string(),
            Resolved::Vector(inner) => format!("vector<{}>", inner.describe()),
            Resolved::FixedArray { element, length } => format!("[{}; {}]", element.describe(), length),
            Resolved::Struct { name, .. } => format!("struct {}", name),
            Resolved::Enum { name, .. } => format!("enum {}", name),
        }
    }

    /// `true` for `vector<u8>` and `[u8; N]`.
    pub fn is_byte_sequence(&self) -> bool {
        let element = match self {
            Resolved::Vector(inner) => inner,
            Resolved::FixedArray { element, .. } => element,
            _ => return false,
        };
        **element == Resolved::Primitive(Primitive::Uint(UintType::U8))
    }

    pub fn variant_index(&self, variant: &str) -> Option<usize> {
        match self {
            Resolved::Enum { variants, .. } => variants.iter().position(|(name, _)| name == variant),
            _ => None,
        }
    }
}
