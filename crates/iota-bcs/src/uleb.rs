//! ULEB128 lengths and enum tags.
//!
//! BCS restricts ULEB128 values to `u32` and requires the minimal encoding.

use crate::error::BcsError;

/// Longest canonical encoding of a `u32`.
pub const MAX_ULEB128_LEN: usize = 5;

/// Minimal ULEB128 encoding of `value`.
pub fn encode(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ULEB128_LEN);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// Decode a ULEB128 value from the front of `data`.
///
/// Returns the value and the number of bytes consumed. Overlong encodings
/// (a trailing zero group) and values above `u32::MAX` are rejected.
pub fn decode(data: &[u8]) -> Result<(u32, usize), BcsError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate().take(MAX_ULEB128_LEN) {
        value |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            if i > 0 && byte == 0 {
                return Err(BcsError::MalformedUleb128);
            }
            let value = u32::try_from(value).map_err(|_| BcsError::MalformedUleb128)?;
            return Ok((value, i + 1));
        }
    }
    if data.len() < MAX_ULEB128_LEN {
        return Err(BcsError::UnexpectedEndOfBuffer {
            needed: data.len() + 1,
            remaining: data.len(),
        });
    }
    Err(BcsError::MalformedUleb128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_minimal() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(encode(u32::MAX as u64), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(&[0x00]).unwrap(), (0, 1));
        assert_eq!(decode(&[0xac, 0x02, 0xff]).unwrap(), (300, 2));
        assert_eq!(decode(&[0xff, 0xff, 0xff, 0xff, 0x0f]).unwrap(), (u32::MAX, 5));
    }

    #[test]
    fn test_decode_rejects_overlong() {
        assert_eq!(decode(&[0x80, 0x00]), Err(BcsError::MalformedUleb128));
        assert_eq!(decode(&[0xff, 0x80, 0x00]), Err(BcsError::MalformedUleb128));
    }

    #[test]
    fn test_decode_rejects_u32_overflow() {
        assert_eq!(
            decode(&[0xff, 0xff, 0xff, 0xff, 0x10]),
            Err(BcsError::MalformedUleb128)
        );
        assert_eq!(
            decode(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]),
            Err(BcsError::MalformedUleb128)
        );
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode(&[0x80]),
            Err(BcsError::UnexpectedEndOfBuffer { .. })
        ));
        assert!(matches!(
            decode(&[]),
            Err(BcsError::UnexpectedEndOfBuffer { .. })
        ));
    }
}
