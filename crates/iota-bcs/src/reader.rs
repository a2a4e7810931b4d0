//! Cursor-based BCS decoder.

use crate::error::BcsError;
use crate::schema::UintType;
use crate::u256::U256;
use crate::uleb;

/// Sequential reader over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct BcsReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move the cursor to an absolute position within the buffer.
    pub fn shift(&mut self, position: usize) -> Result<&mut Self, BcsError> {
        if position > self.data.len() {
            return Err(BcsError::UnexpectedEndOfBuffer {
                needed: position - self.position,
                remaining: self.remaining(),
            });
        }
        self.position = position;
        Ok(self)
    }

    /// Take the next `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], BcsError> {
        if len > self.remaining() {
            return Err(BcsError::UnexpectedEndOfBuffer {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BcsError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, BcsError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, BcsError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, BcsError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, BcsError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u128(&mut self) -> Result<u128, BcsError> {
        Ok(u128::from_le_bytes(self.read_array()?))
    }

    pub fn read_u256(&mut self) -> Result<U256, BcsError> {
        Ok(U256::from_le_bytes(self.read_array()?))
    }

    /// Read an unsigned integer of the given width, widened to `U256`.
    pub fn read_uint(&mut self, ty: UintType) -> Result<U256, BcsError> {
        let bytes = self.read_bytes(ty.byte_len())?;
        let mut le = [0u8; 32];
        le[..bytes.len()].copy_from_slice(bytes);
        Ok(U256::from_le_bytes(le))
    }

    pub fn read_uleb128(&mut self) -> Result<u32, BcsError> {
        let (value, consumed) = uleb::decode(&self.data[self.position..])?;
        self.position += consumed;
        Ok(value)
    }

    pub fn read_bool(&mut self) -> Result<bool, BcsError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::InvalidBooleanByte(other)),
        }
    }

    /// Length-prefixed byte vector.
    pub fn read_vec_bytes(&mut self) -> Result<Vec<u8>, BcsError> {
        let len = self.read_uleb128()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, BcsError> {
        Ok(String::from_utf8(self.read_vec_bytes()?)?)
    }

    /// Length-prefixed sequence; `read_item` decodes each element.
    pub fn read_vec<T, F>(&mut self, mut read_item: F) -> Result<Vec<T>, BcsError>
    where
        F: FnMut(&mut Self, usize) -> Result<T, BcsError>,
    {
        let len = self.read_uleb128()? as usize;
        // Every element takes at least one byte, so cap the preallocation.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for i in 0..len {
            items.push(read_item(self, i)?);
        }
        Ok(items)
    }
}
