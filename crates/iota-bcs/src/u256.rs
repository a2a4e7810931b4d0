use crate::error::BcsError;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;
use std::str::FromStr;

/// 256-bit unsigned integer as carried by the BCS `u256` primitive.
///
/// Stored as 4 x u64 in little-endian limb order, which is also the wire order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u64; 4]); // [low, mid_low, mid_high, high]

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in (0..4).rev() {
            match self.0[i].cmp(&other.0[i]) {
                std::cmp::Ordering::Equal => continue,
                ord => return ord,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl U256 {
    pub const ZERO: Self = Self([0, 0, 0, 0]);
    pub const ONE: Self = Self([1, 0, 0, 0]);
    pub const MAX: Self = Self([u64::MAX, u64::MAX, u64::MAX, u64::MAX]);

    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    pub const fn from_u128(val: u128) -> Self {
        Self([val as u64, (val >> 64) as u64, 0, 0])
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return (i as u32 + 1) * 64 - self.0[i].leading_zeros();
            }
        }
        0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&l| l == 0)
    }

    /// Value of `2^bits - 1`, the upper bound of a `bits`-wide unsigned integer.
    pub fn max_for_bits(bits: u32) -> Self {
        if bits >= 256 {
            return Self::MAX;
        }
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let low = i as u32 * 64;
            if bits >= low + 64 {
                *limb = u64::MAX;
            } else if bits > low {
                *limb = (1u64 << (bits - low)) - 1;
            }
        }
        Self(limbs)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&self.0[i].to_le_bytes());
        }
        bytes
    }

    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let mut limb_bytes = [0u8; 8];
            limb_bytes.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *limb = u64::from_le_bytes(limb_bytes);
        }
        Self(limbs)
    }

    /// Truncating little-endian write of the low `width` bytes.
    pub fn to_le_bytes_truncated(&self, width: usize) -> Vec<u8> {
        self.to_le_bytes()[..width.min(32)].to_vec()
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.to_le_bytes())
    }

    /// Convert an arbitrary-precision integer, failing when it needs more than 256 bits.
    pub fn try_from_biguint(value: &BigUint) -> Option<Self> {
        if value.bits() > 256 {
            return None;
        }
        let le = value.to_bytes_le();
        let mut bytes = [0u8; 32];
        bytes[..le.len()].copy_from_slice(&le);
        Some(Self::from_le_bytes(bytes))
    }

    /// Parse from a decimal string of any length; values wider than 256 bits
    /// are reported as `IntegerRange` against `u256`.
    pub fn from_decimal_str(s: &str) -> Result<Self, BcsError> {
        let digits = s.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BcsError::TypeMismatch {
                expected: "decimal integer string".to_string(),
                found: "string",
            });
        }
        let big = BigUint::parse_bytes(digits.as_bytes(), 10).unwrap_or_else(BigUint::zero);
        Self::try_from_biguint(&big).ok_or_else(|| BcsError::IntegerRange {
            type_name: "u256",
            value: digits.to_string(),
            max: Self::MAX.to_string(),
        })
    }
}

impl From<u8> for U256 {
    fn from(val: u8) -> Self {
        Self::from_u128(val as u128)
    }
}

impl From<u16> for U256 {
    fn from(val: u16) -> Self {
        Self::from_u128(val as u128)
    }
}

impl From<u32> for U256 {
    fn from(val: u32) -> Self {
        Self::from_u128(val as u128)
    }
}

impl From<u64> for U256 {
    fn from(val: u64) -> Self {
        Self::from_u128(val as u128)
    }
}

impl From<u128> for U256 {
    fn from(val: u128) -> Self {
        Self::from_u128(val)
    }
}

impl TryFrom<U256> for u64 {
    type Error = BcsError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[1] != 0 || value.0[2] != 0 || value.0[3] != 0 {
            Err(BcsError::IntegerRange {
                type_name: "u64",
                value: value.to_string(),
                max: u64::MAX.to_string(),
            })
        } else {
            Ok(value.0[0])
        }
    }
}

impl TryFrom<U256> for u128 {
    type Error = BcsError;

    fn try_from(value: U256) -> Result<Self, Self::Error> {
        if value.0[2] != 0 || value.0[3] != 0 {
            Err(BcsError::IntegerRange {
                type_name: "u128",
                value: value.to_string(),
                max: u128::MAX.to_string(),
            })
        } else {
            Ok((value.0[1] as u128) << 64 | value.0[0] as u128)
        }
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

impl fmt::LowerHex for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut be = self.to_le_bytes();
        be.reverse();
        write!(f, "0x{}", hex::encode(be))
    }
}

impl FromStr for U256 {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let mut bytes = crate::encoding::from_hex(hex_digits)?;
            while bytes.len() > 32 && bytes[0] == 0 {
                bytes.remove(0);
            }
            if bytes.len() > 32 {
                return Err(BcsError::IntegerRange {
                    type_name: "u256",
                    value: s.to_string(),
                    max: Self::MAX.to_string(),
                });
            }
            bytes.reverse();
            let mut le = [0u8; 32];
            le[..bytes.len()].copy_from_slice(&bytes);
            Ok(Self::from_le_bytes(le))
        } else {
            Self::from_decimal_str(s)
        }
    }
}
