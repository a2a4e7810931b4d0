//! Named type registry and the `Bcs` entry point.

use crate::codec;
use crate::config::CodecConfig;
use crate::encoding::Encoding;
use crate::error::BcsError;
use crate::reader::BcsReader;
use crate::schema::{Primitive, Resolved, TypeSchema, UintType};
use crate::type_ref::{TypeArg, TypeRef};
use crate::value::Value;
use crate::writer::BcsWriter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const U8: &str = "u8";
pub const U16: &str = "u16";
pub const U32: &str = "u32";
pub const U64: &str = "u64";
pub const U128: &str = "u128";
pub const U256: &str = "u256";
pub const BOOL: &str = "bool";
pub const STRING: &str = "string";
pub const ADDRESS: &str = "address";
pub const BYTES: &str = "bytes";
pub const HEX: &str = "hex-string";
pub const BASE58: &str = "base58-string";
pub const BASE64: &str = "base64-string";

/// Schema-driven BCS codec.
///
/// Holds a [`CodecConfig`] and a table of named type definitions. The table
/// can be extended at any time; definitions are read under a shared lock, so
/// a `Bcs` can be shared across threads behind an `Arc`.
pub struct Bcs {
    config: CodecConfig,
    types: RwLock<HashMap<String, TypeSchema>>,
}

impl Default for Bcs {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl std::fmt::Debug for Bcs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bcs")
            .field("config", &self.config)
            .field("types", &self.types.read().len())
            .finish()
    }
}

impl Bcs {
    pub fn new(config: CodecConfig) -> Self {
        let bcs = Self {
            config,
            types: RwLock::new(HashMap::new()),
        };
        if bcs.config.with_primitives {
            bcs.register_primitives();
        }
        bcs
    }

    pub fn iota_move() -> Self {
        Self::new(CodecConfig::iota_move())
    }

    pub fn rust() -> Self {
        Self::new(CodecConfig::rust())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn register_primitives(&self) {
        let mut types = self.types.write();
        for ty in [
            UintType::U8,
            UintType::U16,
            UintType::U32,
            UintType::U64,
            UintType::U128,
            UintType::U256,
        ] {
            types.insert(ty.name().to_string(), TypeSchema::Primitive(Primitive::Uint(ty)));
        }
        types.insert(BOOL.into(), TypeSchema::Primitive(Primitive::Bool));
        types.insert(STRING.into(), TypeSchema::Primitive(Primitive::String));
        types.insert(
            ADDRESS.into(),
            TypeSchema::Primitive(Primitive::Address {
                length: self.config.address_length,
            }),
        );
        types.insert(BYTES.into(), TypeSchema::Primitive(Primitive::Bytes));
        types.insert(HEX.into(), TypeSchema::Primitive(Primitive::EncodedString(Encoding::Hex)));
        types.insert(
            BASE58.into(),
            TypeSchema::Primitive(Primitive::EncodedString(Encoding::Base58)),
        );
        types.insert(
            BASE64.into(),
            TypeSchema::Primitive(Primitive::EncodedString(Encoding::Base64)),
        );
        types.insert(
            "Option".into(),
            TypeSchema::Enum {
                params: vec!["T".into()],
                variants: vec![("none".into(), None), ("some".into(), Some(TypeRef::named("T")))],
            },
        );
        if self.config.is_rust() {
            types.insert("String".into(), TypeSchema::Alias(TypeRef::named(STRING)));
        }
    }

    /// Parse a type argument with the configured generic separators.
    pub fn parse_type(&self, ty: impl Into<TypeArg>) -> Result<TypeRef, BcsError> {
        ty.into()
            .into_type_ref(self.config.generic_separators, self.config.max_depth)
    }

    pub fn has_type(&self, name: &str) -> bool {
        name == self.config.vector_type || self.types.read().contains_key(name)
    }

    /// Register `name` as another name for `target`. The target must resolve.
    pub fn register_alias(&self, name: &str, target: impl Into<TypeArg>) -> Result<&Self, BcsError> {
        let target = self.parse_type(target)?;
        self.resolve(&target)?;
        debug!(name, target = %target, "registering alias");
        self.types.write().insert(name.to_string(), TypeSchema::Alias(target));
        Ok(self)
    }

    /// Register a struct. `name` may declare generic parameters (`Coin<T>`);
    /// fields are encoded in the given order.
    pub fn register_struct<K, T>(
        &self,
        name: &str,
        fields: impl IntoIterator<Item = (K, T)>,
    ) -> Result<&Self, BcsError>
    where
        K: Into<String>,
        T: Into<TypeArg>,
    {
        let (base, params) = self.parse_declaration(name)?;
        let fields = fields
            .into_iter()
            .map(|(field, ty)| Ok((field.into(), self.parse_type(ty)?)))
            .collect::<Result<Vec<(String, TypeRef)>, BcsError>>()?;
        debug!(name = %base, fields = fields.len(), "registering struct");
        self.types.write().insert(base, TypeSchema::Struct { params, fields });
        Ok(self)
    }

    /// Register an enum. Variant order defines the wire index.
    pub fn register_enum<K, T>(
        &self,
        name: &str,
        variants: impl IntoIterator<Item = (K, Option<T>)>,
    ) -> Result<&Self, BcsError>
    where
        K: Into<String>,
        T: Into<TypeArg>,
    {
        let (base, params) = self.parse_declaration(name)?;
        let variants = variants
            .into_iter()
            .map(|(variant, ty)| Ok((variant.into(), ty.map(|t| self.parse_type(t)).transpose()?)))
            .collect::<Result<Vec<(String, Option<TypeRef>)>, BcsError>>()?;

        let mut types = self.types.write();
        if let Some(TypeSchema::Enum { variants: previous, .. }) = types.get(&base) {
            let old: Vec<&str> = previous.iter().map(|(v, _)| v.as_str()).collect();
            let new: Vec<&str> = variants.iter().map(|(v, _)| v.as_str()).collect();
            if old != new {
                warn!(name = %base, ?old, ?new, "enum re-registered with a different variant order");
            }
        }
        debug!(name = %base, variants = variants.len(), "registering enum");
        types.insert(base, TypeSchema::Enum { params, variants });
        Ok(self)
    }

    /// Register a fixed-width address type.
    pub fn register_address_type(&self, name: &str, length: usize) -> Result<&Self, BcsError> {
        debug!(name, length, "registering address type");
        self.types
            .write()
            .insert(name.to_string(), TypeSchema::Primitive(Primitive::Address { length }));
        Ok(self)
    }

    /// Register a fixed-length array such as `[u8; 64]`. The elements are
    /// written back to back with no length prefix.
    pub fn register_fixed_array(
        &self,
        name: &str,
        element: impl Into<TypeArg>,
        length: usize,
    ) -> Result<&Self, BcsError> {
        let element = self.parse_type(element)?;
        self.resolve(&element)?;
        debug!(name, element = %element, length, "registering fixed array");
        self.types
            .write()
            .insert(name.to_string(), TypeSchema::FixedArray { element, length });
        Ok(self)
    }

    fn parse_declaration(&self, name: &str) -> Result<(String, Vec<String>), BcsError> {
        let decl = self.parse_type(name)?;
        let params = decl
            .params
            .iter()
            .map(|p| {
                if p.is_generic() {
                    Err(BcsError::TypeParse(format!(
                        "generic parameter '{}' of '{}' must be a plain name",
                        p, decl.name
                    )))
                } else {
                    Ok(p.name.clone())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((decl.name, params))
    }

    /// Resolve a type expression into a fully instantiated node.
    pub fn resolve(&self, ty: impl Into<TypeArg>) -> Result<Resolved, BcsError> {
        let ty = self.parse_type(ty)?;
        let types = self.types.read();
        let mut resolver = Resolver {
            config: &self.config,
            types: &*types,
            memo: HashMap::new(),
            visited: 0,
        };
        let (root, _) = resolver.resolve(&ty, 0)?;
        Ok((*root).clone())
    }

    /// Serialize `value` as `ty` into a fresh writer.
    pub fn serialize(&self, ty: impl Into<TypeArg>, value: &Value) -> Result<BcsWriter, BcsError> {
        let resolved = self.resolve(ty)?;
        let mut writer = BcsWriter::with_max_size(self.config.max_writer_size);
        codec::encode(&mut writer, &resolved, value)?;
        Ok(writer)
    }

    /// Decode a value of type `ty` from the start of `bytes`.
    /// Bytes left over after the value are ignored.
    pub fn deserialize(&self, ty: impl Into<TypeArg>, bytes: &[u8]) -> Result<Value, BcsError> {
        let resolved = self.resolve(ty)?;
        codec::decode(&mut BcsReader::new(bytes), &resolved)
    }

    /// Like [`Bcs::deserialize`] but fails with `TrailingBytes` unless the
    /// whole buffer is consumed.
    pub fn deserialize_exact(&self, ty: impl Into<TypeArg>, bytes: &[u8]) -> Result<Value, BcsError> {
        let resolved = self.resolve(ty)?;
        let mut reader = BcsReader::new(bytes);
        let value = codec::decode(&mut reader, &resolved)?;
        if !reader.is_empty() {
            return Err(BcsError::TrailingBytes(reader.remaining()));
        }
        Ok(value)
    }

    /// Decode from hex, base64 or base58 text.
    pub fn deserialize_encoded(
        &self,
        ty: impl Into<TypeArg>,
        data: &str,
        encoding: Encoding,
    ) -> Result<Value, BcsError> {
        let bytes = encoding.decode(data)?;
        self.deserialize(ty, &bytes)
    }
}

/// One resolution pass over a locked type table.
///
/// Each distinct instantiation is expanded once and shared afterwards. The
/// memo keeps the height of every resolved subtree so a shared node still
/// counts against `max_depth` at the depth where it is reused.
struct Resolver<'a> {
    config: &'a CodecConfig,
    types: &'a HashMap<String, TypeSchema>,
    memo: HashMap<TypeRef, (Arc<Resolved>, usize)>,
    visited: usize,
}

impl Resolver<'_> {
    fn resolve(&mut self, ty: &TypeRef, depth: usize) -> Result<(Arc<Resolved>, usize), BcsError> {
        let max_depth = self.config.max_depth;
        if depth > max_depth {
            return Err(BcsError::RecursionLimit(max_depth));
        }
        if let Some((node, height)) = self.memo.get(ty) {
            if depth + height > max_depth {
                return Err(BcsError::RecursionLimit(max_depth));
            }
            return Ok((Arc::clone(node), *height));
        }

        self.visited += ty.size();
        if self.visited > self.config.max_nodes {
            return Err(BcsError::ResolutionBudget(self.config.max_nodes));
        }

        let (node, height) = self.expand(ty, depth)?;
        self.memo.insert(ty.clone(), (Arc::clone(&node), height));
        Ok((node, height))
    }

    fn expand(&mut self, ty: &TypeRef, depth: usize) -> Result<(Arc<Resolved>, usize), BcsError> {
        if ty.name == self.config.vector_type {
            if ty.params.len() != 1 {
                return Err(BcsError::GenericArity {
                    name: ty.name.clone(),
                    expected: 1,
                    actual: ty.params.len(),
                });
            }
            let (inner, height) = self.resolve(&ty.params[0], depth + 1)?;
            return Ok((Arc::new(Resolved::Vector(inner)), height + 1));
        }

        let types = self.types;
        let schema = types
            .get(&ty.name)
            .ok_or_else(|| BcsError::UnknownType(ty.to_string()))?;
        let params = schema.params();
        if params.len() != ty.params.len() {
            return Err(BcsError::GenericArity {
                name: ty.name.clone(),
                expected: params.len(),
                actual: ty.params.len(),
            });
        }
        let env: HashMap<String, TypeRef> = params
            .iter()
            .cloned()
            .zip(ty.params.iter().cloned())
            .collect();

        match schema {
            TypeSchema::Primitive(primitive) => Ok((Arc::new(Resolved::Primitive(*primitive)), 0)),
            TypeSchema::Alias(target) => {
                let (node, height) = self.resolve(target, depth + 1)?;
                Ok((node, height + 1))
            }
            TypeSchema::FixedArray { element, length } => {
                let (element, height) = self.resolve(element, depth + 1)?;
                Ok((
                    Arc::new(Resolved::FixedArray {
                        element,
                        length: *length,
                    }),
                    height + 1,
                ))
            }
            TypeSchema::Struct { fields, .. } => {
                let mut height = 0;
                let mut resolved = Vec::with_capacity(fields.len());
                for (name, field_ty) in fields {
                    let (field, field_height) = self.resolve(&field_ty.substitute(&env), depth + 1)?;
                    height = height.max(field_height + 1);
                    resolved.push((name.clone(), field));
                }
                Ok((
                    Arc::new(Resolved::Struct {
                        name: ty.to_string(),
                        fields: resolved,
                    }),
                    height,
                ))
            }
            TypeSchema::Enum { variants, .. } => {
                let mut height = 0;
                let mut resolved = Vec::with_capacity(variants.len());
                for (name, payload) in variants {
                    let payload = match payload {
                        Some(payload) => {
                            let (node, payload_height) =
                                self.resolve(&payload.substitute(&env), depth + 1)?;
                            height = height.max(payload_height + 1);
                            Some(node)
                        }
                        None => None,
                    };
                    resolved.push((name.clone(), payload));
                }
                Ok((
                    Arc::new(Resolved::Enum {
                        name: ty.to_string(),
                        variants: resolved,
                    }),
                    height,
                ))
            }
        }
    }
}
