//! JSON views of BCS values.
//!
//! Integers up to `u32` become JSON numbers, wider integers become decimal
//! strings, addresses are unprefixed hex, structs are objects and enum values
//! are single-key objects `{ "variant": payload }` with `null` for unit variants.

use crate::error::BcsError;
use crate::reader::BcsReader;
use crate::registry::Bcs;
use crate::schema::{Primitive, Resolved, UintType};
use crate::type_ref::TypeArg;
use crate::u256::U256;
use crate::value::Value;
use crate::writer::BcsWriter;
use crate::{codec, encoding};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(ty: &Resolved, json: &Json) -> BcsError {
    BcsError::TypeMismatch {
        expected: ty.describe(),
        found: json_kind(json),
    }
}

fn uint_value(ty: UintType, value: U256) -> Result<Value, BcsError> {
    ty.check_range(&value)?;
    let narrow = |v: U256| u64::try_from(v).unwrap_or_default();
    Ok(match ty {
        UintType::U8 => Value::U8(narrow(value) as u8),
        UintType::U16 => Value::U16(narrow(value) as u16),
        UintType::U32 => Value::U32(narrow(value) as u32),
        UintType::U64 => Value::U64(narrow(value)),
        UintType::U128 => Value::U128(u128::try_from(value).unwrap_or_default()),
        UintType::U256 => Value::U256(value),
    })
}

/// Build a [`Value`] of type `ty` from its JSON form.
pub fn from_json(ty: &Resolved, json: &Json) -> Result<Value, BcsError> {
    match ty {
        Resolved::Primitive(primitive) => primitive_from_json(ty, *primitive, json),
        Resolved::Vector(inner) => match json {
            Json::Array(items) => Ok(Value::Vector(
                items
                    .iter()
                    .map(|item| from_json(inner, item))
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(mismatch(ty, other)),
        },
        Resolved::FixedArray { element, length } => {
            let value = match json {
                Json::String(s) if ty.is_byte_sequence() => Value::Bytes(encoding::from_hex(s)?),
                Json::Array(items) => Value::Vector(
                    items
                        .iter()
                        .map(|item| from_json(element, item))
                        .collect::<Result<_, _>>()?,
                ),
                other => return Err(mismatch(ty, other)),
            };
            let actual = match &value {
                Value::Bytes(b) => b.len(),
                Value::Vector(items) => items.len(),
                _ => 0,
            };
            if actual != *length {
                return Err(BcsError::FixedArrayLength {
                    expected: *length,
                    actual,
                });
            }
            Ok(value)
        }
        Resolved::Struct { name, fields } => {
            let Json::Object(object) = json else {
                return Err(mismatch(ty, json));
            };
            let mut values = BTreeMap::new();
            for (field, field_ty) in fields {
                let field_json = object.get(field).ok_or_else(|| BcsError::MissingField {
                    type_name: name.clone(),
                    field: field.clone(),
                })?;
                values.insert(field.clone(), from_json(field_ty, field_json)?);
            }
            Ok(Value::Struct(values))
        }
        Resolved::Enum { name, variants } => {
            let Some((variant, payload)) = json.as_object().and_then(|o| o.iter().next()) else {
                return Err(mismatch(ty, json));
            };
            let index = ty.variant_index(variant).ok_or_else(|| BcsError::UnknownVariant {
                type_name: name.clone(),
                variant: variant.clone(),
            })?;
            let payload = match &variants[index].1 {
                Some(payload_ty) => Some(Box::new(from_json(payload_ty, payload)?)),
                None => None,
            };
            Ok(Value::Enum {
                variant: variant.clone(),
                payload,
            })
        }
    }
}

fn primitive_from_json(ty: &Resolved, primitive: Primitive, json: &Json) -> Result<Value, BcsError> {
    match (primitive, json) {
        (Primitive::Uint(uint), Json::Number(n)) => {
            let n = n.as_u64().ok_or_else(|| BcsError::TypeMismatch {
                expected: uint.name().to_string(),
                found: "non-integer number",
            })?;
            uint_value(uint, U256::from(n))
        }
        (Primitive::Uint(uint), Json::String(s)) => uint_value(uint, s.parse()?),
        (Primitive::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (Primitive::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (Primitive::Address { .. }, Json::String(s)) => Value::address(s),
        (Primitive::Bytes, Json::String(s)) => Ok(Value::Bytes(encoding::from_hex(s)?)),
        (Primitive::Bytes, Json::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_u64()
                    .and_then(|b| u8::try_from(b).ok())
                    .ok_or_else(|| mismatch(ty, item))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Value::Bytes),
        (Primitive::EncodedString(_), Json::String(s)) => Ok(Value::String(s.clone())),
        (_, other) => Err(mismatch(ty, other)),
    }
}

/// Render a [`Value`] of type `ty` as JSON.
pub fn to_json(ty: &Resolved, value: &Value) -> Result<Json, BcsError> {
    let value_mismatch = || BcsError::TypeMismatch {
        expected: ty.describe(),
        found: value.kind(),
    };
    Ok(match (ty, value) {
        (Resolved::Primitive(Primitive::Uint(uint)), _) => {
            let n = value.as_uint()?;
            match uint {
                UintType::U8 | UintType::U16 | UintType::U32 => {
                    Json::from(u64::try_from(n).map_err(|_| value_mismatch())?)
                }
                _ => Json::String(n.to_string()),
            }
        }
        (Resolved::Primitive(_), Value::Bool(b)) => Json::Bool(*b),
        (Resolved::Primitive(_), Value::String(s)) => Json::String(s.clone()),
        (Resolved::Primitive(_), Value::Address(b)) => Json::String(encoding::to_hex(b)),
        (Resolved::Primitive(Primitive::EncodedString(enc)), Value::Bytes(b)) => {
            Json::String(enc.encode(b))
        }
        (Resolved::Primitive(_), Value::Bytes(b)) => Json::Array(b.iter().map(|x| Json::from(*x)).collect()),
        (Resolved::Vector(_), Value::Bytes(b)) => Json::Array(b.iter().map(|x| Json::from(*x)).collect()),
        (Resolved::Vector(inner), Value::Vector(items)) => Json::Array(
            items
                .iter()
                .map(|item| to_json(inner, item))
                .collect::<Result<_, _>>()?,
        ),
        (Resolved::FixedArray { .. }, Value::Bytes(b)) => Json::String(encoding::to_hex(b)),
        (Resolved::FixedArray { element, .. }, Value::Vector(items)) => Json::Array(
            items
                .iter()
                .map(|item| to_json(element, item))
                .collect::<Result<_, _>>()?,
        ),
        (Resolved::Struct { fields, name }, Value::Struct(values)) => {
            let mut object = Map::new();
            for (field, field_ty) in fields {
                let field_value = values.get(field).ok_or_else(|| BcsError::MissingField {
                    type_name: name.clone(),
                    field: field.clone(),
                })?;
                object.insert(field.clone(), to_json(field_ty, field_value)?);
            }
            Json::Object(object)
        }
        (Resolved::Enum { name, variants }, Value::Enum { variant, payload }) => {
            let index = ty.variant_index(variant).ok_or_else(|| BcsError::UnknownVariant {
                type_name: name.clone(),
                variant: variant.clone(),
            })?;
            let payload = match (&variants[index].1, payload) {
                (Some(payload_ty), Some(payload)) => to_json(payload_ty, payload)?,
                _ => Json::Null,
            };
            let mut object = Map::new();
            object.insert(variant.clone(), payload);
            Json::Object(object)
        }
        _ => return Err(value_mismatch()),
    })
}

impl Bcs {
    /// Serialize a JSON value as `ty`.
    pub fn serialize_json(&self, ty: impl Into<TypeArg>, json: &Json) -> Result<BcsWriter, BcsError> {
        let resolved = self.resolve(ty)?;
        let value = from_json(&resolved, json)?;
        let mut writer = BcsWriter::with_max_size(self.config().max_writer_size);
        codec::encode(&mut writer, &resolved, &value)?;
        Ok(writer)
    }

    /// Decode `bytes` as `ty` and render the result as JSON.
    pub fn deserialize_json(&self, ty: impl Into<TypeArg>, bytes: &[u8]) -> Result<Json, BcsError> {
        let resolved = self.resolve(ty)?;
        let value = codec::decode(&mut BcsReader::new(bytes), &resolved)?;
        to_json(&resolved, &value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_struct_json_roundtrip() {
        let bcs = Bcs::iota_move();
        bcs.register_struct("Beep", [("id", "address"), ("value", "u64")]).unwrap();
        let input = json!({
            "id": "0x00000000000000000000000045aacd9ed90a5a8e211502ac3fa898a3819f23b2",
            "value": 10000000
        });
        let bytes = bcs.serialize_json("Beep", &input).unwrap().into_bytes();
        let output = bcs.deserialize_json("Beep", &bytes).unwrap();
        assert_eq!(
            output,
            json!({
                "id": "00000000000000000000000045aacd9ed90a5a8e211502ac3fa898a3819f23b2",
                "value": "10000000"
            })
        );
    }

    #[test]
    fn test_enum_json() {
        let bcs = Bcs::iota_move();
        bcs.register_enum("Enum", [("with_value", Some("u8")), ("no_value", None)])
            .unwrap();
        let bytes = bcs.serialize_json("Enum", &json!({"no_value": null})).unwrap().into_bytes();
        assert_eq!(bytes, vec![1]);
        assert_eq!(bcs.deserialize_json("Enum", &bytes).unwrap(), json!({"no_value": null}));

        let bytes = bcs.serialize_json("Enum", &json!({"with_value": 7})).unwrap().into_bytes();
        assert_eq!(bytes, vec![0, 7]);
    }

    #[test]
    fn test_integer_json_forms() {
        let bcs = Bcs::iota_move();
        let a = bcs.serialize_json("u64", &json!(1000)).unwrap().into_bytes();
        let b = bcs.serialize_json("u64", &json!("1000")).unwrap().into_bytes();
        assert_eq!(a, b);
        assert!(matches!(
            bcs.serialize_json("u8", &json!(256)),
            Err(BcsError::IntegerRange { .. })
        ));
        assert!(bcs.serialize_json("u8", &json!(-1)).is_err());
        assert!(bcs.serialize_json("u8", &json!(1.5)).is_err());
    }

    #[test]
    fn test_enum_requires_object() {
        let bcs = Bcs::iota_move();
        let err = bcs.serialize_json("Option<u8>", &json!("some")).unwrap_err();
        assert!(matches!(err, BcsError::TypeMismatch { found: "string", .. }));
    }
}
