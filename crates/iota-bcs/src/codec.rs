//! Walks a [`Resolved`] type alongside a [`Value`] to produce or consume BCS bytes.
//!
//! Structs are their fields in declaration order with no tags, enums are a
//! ULEB128 variant index followed by the payload, vectors are a ULEB128 length
//! followed by the elements.

use crate::encoding;
use crate::error::BcsError;
use crate::reader::BcsReader;
use crate::schema::{Primitive, Resolved, UintType};
use crate::value::Value;
use crate::writer::BcsWriter;
use std::collections::BTreeMap;

fn mismatch(ty: &Resolved, value: &Value) -> BcsError {
    BcsError::TypeMismatch {
        expected: ty.describe(),
        found: value.kind(),
    }
}

/// Encode `value` as `ty`.
pub fn encode(writer: &mut BcsWriter, ty: &Resolved, value: &Value) -> Result<(), BcsError> {
    match ty {
        Resolved::Primitive(primitive) => encode_primitive(writer, ty, *primitive, value),
        Resolved::Vector(inner) => match value {
            Value::Bytes(bytes) if **inner == Resolved::Primitive(Primitive::Uint(UintType::U8)) => {
                writer.write_vec_bytes(bytes)?;
                Ok(())
            }
            Value::Vector(items) => {
                writer.write_vec(items, |w, item| encode(w, inner, item))?;
                Ok(())
            }
            other => Err(mismatch(ty, other)),
        },
        Resolved::FixedArray { element, length } => match value {
            Value::Bytes(bytes) if ty.is_byte_sequence() => {
                check_fixed_length(*length, bytes.len())?;
                writer.write_bytes(bytes)?;
                Ok(())
            }
            Value::Vector(items) => {
                check_fixed_length(*length, items.len())?;
                for item in items {
                    encode(writer, element, item)?;
                }
                Ok(())
            }
            other => Err(mismatch(ty, other)),
        },
        Resolved::Struct { name, fields } => {
            let Value::Struct(values) = value else {
                return Err(mismatch(ty, value));
            };
            for (field, field_ty) in fields {
                let field_value = values.get(field).ok_or_else(|| BcsError::MissingField {
                    type_name: name.clone(),
                    field: field.clone(),
                })?;
                encode(writer, field_ty, field_value)?;
            }
            Ok(())
        }
        Resolved::Enum { name, variants } => {
            let Value::Enum { variant, payload } = value else {
                return Err(mismatch(ty, value));
            };
            let index = variants
                .iter()
                .position(|(v, _)| v == variant)
                .ok_or_else(|| BcsError::UnknownVariant {
                    type_name: name.clone(),
                    variant: variant.clone(),
                })?;
            writer.write_uleb128(index as u64)?;
            if let Some(payload_ty) = &variants[index].1 {
                let payload = payload.as_deref().ok_or_else(|| BcsError::TypeMismatch {
                    expected: format!("{} payload for {}::{}", payload_ty.describe(), name, variant),
                    found: "unit variant",
                })?;
                encode(writer, payload_ty, payload)?;
            }
            Ok(())
        }
    }
}

fn encode_primitive(
    writer: &mut BcsWriter,
    ty: &Resolved,
    primitive: Primitive,
    value: &Value,
) -> Result<(), BcsError> {
    match (primitive, value) {
        (Primitive::Uint(uint), _) => {
            writer.write_uint(uint, &value.as_uint()?)?;
        }
        (Primitive::Bool, Value::Bool(b)) => {
            writer.write_bool(*b)?;
        }
        (Primitive::String, Value::String(s)) => {
            writer.write_str(s)?;
        }
        (Primitive::Address { length }, Value::Address(bytes)) => {
            write_address(writer, length, bytes)?;
        }
        (Primitive::Address { length }, Value::String(s)) => {
            write_address(writer, length, &encoding::from_hex(s)?)?;
        }
        (Primitive::Bytes, Value::Bytes(b)) => {
            writer.write_vec_bytes(b)?;
        }
        (Primitive::EncodedString(enc), Value::String(s)) => {
            writer.write_vec_bytes(&enc.decode(s)?)?;
        }
        (Primitive::EncodedString(_), Value::Bytes(b)) => {
            writer.write_vec_bytes(b)?;
        }
        _ => return Err(mismatch(ty, value)),
    }
    Ok(())
}

fn check_fixed_length(expected: usize, actual: usize) -> Result<(), BcsError> {
    if expected != actual {
        return Err(BcsError::FixedArrayLength { expected, actual });
    }
    Ok(())
}

fn write_address(writer: &mut BcsWriter, length: usize, bytes: &[u8]) -> Result<(), BcsError> {
    if bytes.len() != length {
        return Err(BcsError::AddressLength {
            expected: length,
            actual: bytes.len(),
        });
    }
    writer.write_bytes(bytes)?;
    Ok(())
}

/// Decode one value of type `ty`, leaving the reader just past it.
pub fn decode(reader: &mut BcsReader<'_>, ty: &Resolved) -> Result<Value, BcsError> {
    match ty {
        Resolved::Primitive(primitive) => decode_primitive(reader, *primitive),
        Resolved::Vector(inner) => Ok(Value::Vector(reader.read_vec(|r, _| decode(r, inner))?)),
        Resolved::FixedArray { length, .. } if ty.is_byte_sequence() => {
            Ok(Value::Bytes(reader.read_bytes(*length)?.to_vec()))
        }
        Resolved::FixedArray { element, length } => Ok(Value::Vector(
            (0..*length)
                .map(|_| decode(reader, element))
                .collect::<Result<_, _>>()?,
        )),
        Resolved::Struct { fields, .. } => {
            let mut values = BTreeMap::new();
            for (field, field_ty) in fields {
                values.insert(field.clone(), decode(reader, field_ty)?);
            }
            Ok(Value::Struct(values))
        }
        Resolved::Enum { name, variants } => {
            let index = reader.read_uleb128()?;
            let (variant, payload_ty) =
                variants
                    .get(index as usize)
                    .ok_or_else(|| BcsError::EnumTagOutOfRange {
                        type_name: name.clone(),
                        index,
                        variants: variants.len(),
                    })?;
            let payload = match payload_ty {
                Some(payload_ty) => Some(Box::new(decode(reader, payload_ty)?)),
                None => None,
            };
            Ok(Value::Enum {
                variant: variant.clone(),
                payload,
            })
        }
    }
}

fn decode_primitive(reader: &mut BcsReader<'_>, primitive: Primitive) -> Result<Value, BcsError> {
    Ok(match primitive {
        Primitive::Uint(UintType::U8) => Value::U8(reader.read_u8()?),
        Primitive::Uint(UintType::U16) => Value::U16(reader.read_u16()?),
        Primitive::Uint(UintType::U32) => Value::U32(reader.read_u32()?),
        Primitive::Uint(UintType::U64) => Value::U64(reader.read_u64()?),
        Primitive::Uint(UintType::U128) => Value::U128(reader.read_u128()?),
        Primitive::Uint(UintType::U256) => Value::U256(reader.read_u256()?),
        Primitive::Bool => Value::Bool(reader.read_bool()?),
        Primitive::String => Value::String(reader.read_string()?),
        Primitive::Address { length } => Value::Address(reader.read_bytes(length)?.to_vec()),
        Primitive::Bytes => Value::Bytes(reader.read_vec_bytes()?),
        Primitive::EncodedString(enc) => Value::String(enc.encode(&reader.read_vec_bytes()?)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use std::sync::Arc;

    fn u8_vec() -> Resolved {
        Resolved::Vector(Arc::new(Resolved::Primitive(Primitive::Uint(UintType::U8))))
    }

    fn roundtrip(ty: &Resolved, value: &Value) -> Value {
        let mut writer = BcsWriter::new();
        encode(&mut writer, ty, value).unwrap();
        decode(&mut BcsReader::new(writer.as_bytes()), ty).unwrap()
    }

    #[test]
    fn test_bytes_value_for_u8_vector() {
        let mut writer = BcsWriter::new();
        encode(&mut writer, &u8_vec(), &Value::Bytes(vec![1, 2, 3])).unwrap();
        assert_eq!(writer.as_bytes(), &[3, 1, 2, 3]);
        let decoded = decode(&mut BcsReader::new(writer.as_bytes()), &u8_vec()).unwrap();
        assert_eq!(decoded, Value::Bytes(vec![1, 2, 3]));
        assert_eq!(decoded, Value::from(vec![1u8, 2, 3]));
    }

    #[test]
    fn test_fixed_array_has_no_length_prefix() {
        let ty = Resolved::FixedArray {
            element: Arc::new(Resolved::Primitive(Primitive::Uint(UintType::U16))),
            length: 2,
        };
        let mut writer = BcsWriter::new();
        encode(&mut writer, &ty, &Value::from(vec![1u16, 2])).unwrap();
        assert_eq!(writer.as_bytes(), &[1, 0, 2, 0]);
        assert_eq!(roundtrip(&ty, &Value::from(vec![1u16, 2])), Value::from(vec![1u16, 2]));
        let err = encode(&mut BcsWriter::new(), &ty, &Value::from(vec![1u16])).unwrap_err();
        assert_eq!(err, BcsError::FixedArrayLength { expected: 2, actual: 1 });
    }

    #[test]
    fn test_address_from_hex_string() {
        let ty = Resolved::Primitive(Primitive::Address { length: 2 });
        let mut writer = BcsWriter::new();
        encode(&mut writer, &ty, &Value::from("0x0a0b")).unwrap();
        assert_eq!(writer.as_bytes(), &[0x0a, 0x0b]);
    }

    #[test]
    fn test_address_length_mismatch() {
        let ty = Resolved::Primitive(Primitive::Address { length: 32 });
        let err = encode(&mut BcsWriter::new(), &ty, &Value::Address(vec![1; 20])).unwrap_err();
        assert_eq!(err, BcsError::AddressLength { expected: 32, actual: 20 });
    }

    #[test]
    fn test_encoded_string() {
        let ty = Resolved::Primitive(Primitive::EncodedString(Encoding::Hex));
        let value = roundtrip(&ty, &Value::from("c0ffee"));
        assert_eq!(value, Value::from("c0ffee"));
    }

    #[test]
    fn test_type_mismatch() {
        let ty = Resolved::Primitive(Primitive::Bool);
        let err = encode(&mut BcsWriter::new(), &ty, &Value::from(1u8)).unwrap_err();
        assert_eq!(
            err,
            BcsError::TypeMismatch {
                expected: "bool".into(),
                found: "u8"
            }
        );
    }

    #[test]
    fn test_enum_payload_required() {
        let ty = Resolved::Enum {
            name: "E".into(),
            variants: vec![("a".into(), Some(Arc::new(Resolved::Primitive(Primitive::Bool))))],
        };
        let err = encode(&mut BcsWriter::new(), &ty, &Value::unit_variant("a")).unwrap_err();
        assert!(matches!(err, BcsError::TypeMismatch { found: "unit variant", .. }));
    }

    #[test]
    fn test_enum_tag_out_of_range() {
        let ty = Resolved::Enum {
            name: "E".into(),
            variants: vec![("a".into(), None), ("b".into(), None)],
        };
        let err = decode(&mut BcsReader::new(&[2]), &ty).unwrap_err();
        assert_eq!(
            err,
            BcsError::EnumTagOutOfRange {
                type_name: "E".into(),
                index: 2,
                variants: 2
            }
        );
    }
}
