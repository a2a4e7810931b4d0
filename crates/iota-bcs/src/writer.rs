//! Cursor-based BCS encoder.

use crate::encoding::Encoding;
use crate::error::BcsError;
use crate::schema::UintType;
use crate::u256::U256;
use crate::uleb;

/// Default growth limit for a writer.
pub const DEFAULT_MAX_SIZE: usize = 1024 * 1024;

/// Append-only BCS writer.
///
/// A writer is meant for one serialization; create a fresh one per call.
#[derive(Debug, Clone)]
pub struct BcsWriter {
    data: Vec<u8>,
    max_size: usize,
}

impl Default for BcsWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            data: Vec::new(),
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure_capacity(&self, additional: usize) -> Result<(), BcsError> {
        if self.data.len() + additional > self.max_size {
            return Err(BcsError::BufferOverflow { max: self.max_size });
        }
        Ok(())
    }

    /// Append raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BcsError> {
        self.ensure_capacity(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(self)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<&mut Self, BcsError> {
        self.write_bytes(&[value])
    }

    pub fn write_u16(&mut self, value: u16) -> Result<&mut Self, BcsError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<&mut Self, BcsError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<&mut Self, BcsError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u128(&mut self, value: u128) -> Result<&mut Self, BcsError> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u256(&mut self, value: &U256) -> Result<&mut Self, BcsError> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Write `value` as an unsigned integer of the given width, rejecting
    /// values that do not fit.
    pub fn write_uint(&mut self, ty: UintType, value: &U256) -> Result<&mut Self, BcsError> {
        ty.check_range(value)?;
        self.write_bytes(&value.to_le_bytes_truncated(ty.byte_len()))
    }

    pub fn write_uleb128(&mut self, value: u64) -> Result<&mut Self, BcsError> {
        self.write_bytes(&uleb::encode(value))
    }

    pub fn write_bool(&mut self, value: bool) -> Result<&mut Self, BcsError> {
        self.write_u8(value as u8)
    }

    /// Length-prefixed byte vector.
    pub fn write_vec_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BcsError> {
        self.write_uleb128(bytes.len() as u64)?;
        self.write_bytes(bytes)
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<&mut Self, BcsError> {
        self.write_vec_bytes(value.as_bytes())
    }

    /// Length-prefixed sequence; `write_item` encodes each element.
    pub fn write_vec<T, F>(&mut self, items: &[T], mut write_item: F) -> Result<&mut Self, BcsError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), BcsError>,
    {
        self.write_uleb128(items.len() as u64)?;
        for item in items {
            write_item(self, item)?;
        }
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Render the buffer in the given encoding.
    pub fn encode(&self, encoding: Encoding) -> String {
        encoding.encode(&self.data)
    }

    pub fn to_hex(&self) -> String {
        self.encode(Encoding::Hex)
    }

    pub fn to_base64(&self) -> String {
        self.encode(Encoding::Base64)
    }

    pub fn to_base58(&self) -> String {
        self.encode(Encoding::Base58)
    }
}
