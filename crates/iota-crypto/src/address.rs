use crate::error::CryptoError;
use crate::hash::blake2b256;
use std::fmt;
use std::str::FromStr;

/// Address width in bytes.
pub const IOTA_ADDRESS_LENGTH: usize = iota_bcs::IOTA_ADDRESS_LENGTH;

/// 32-byte account address.
/// Display format: `0x` followed by 64 lowercase hex characters.
///
/// # Derivation
/// `address = blake2b256(address_bytes)` where the address bytes depend on
/// the key type (see `PublicKey::to_address`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IotaAddress([u8; IOTA_ADDRESS_LENGTH]);

impl IotaAddress {
    pub const ZERO: Self = Self([0u8; IOTA_ADDRESS_LENGTH]);

    pub const fn from_bytes(bytes: [u8; IOTA_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; IOTA_ADDRESS_LENGTH] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; IOTA_ADDRESS_LENGTH] = slice
            .try_into()
            .map_err(|_| CryptoError::InvalidAddress(format!("expected 32 bytes, got {}", slice.len())))?;
        Ok(Self(bytes))
    }

    /// Hash arbitrary address bytes into an address.
    pub fn derive(address_bytes: &[u8]) -> Self {
        Self(blake2b256(address_bytes))
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }

    /// Hex without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for IotaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for IotaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IotaAddress(0x{})", hex::encode(self.0))
    }
}

impl FromStr for IotaAddress {
    type Err = CryptoError;

    /// Accepts short forms such as `0x2` and left-pads them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_address(s);
        if !is_valid_address(&normalized) {
            return Err(CryptoError::InvalidAddress(s.to_string()));
        }
        let bytes = hex::decode(&normalized[2..])
            .map_err(|e| CryptoError::InvalidAddress(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for IotaAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lowercase, strip any `0x` prefix, left-pad to 64 hex characters and
/// re-add the prefix.
pub fn normalize_address(value: &str) -> String {
    let lower = value.trim().to_ascii_lowercase();
    let digits = lower.strip_prefix("0x").unwrap_or(&lower);
    format!("0x{:0>width$}", digits, width = IOTA_ADDRESS_LENGTH * 2)
}

/// `true` for `0x` followed by exactly 64 hex characters.
pub fn is_valid_address(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .map(|digits| {
            digits.len() == IOTA_ADDRESS_LENGTH * 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0x2"),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(normalize_address("0xABC"), normalize_address("abc"));
    }

    #[test]
    fn test_is_valid_address() {
        assert!(is_valid_address(&normalize_address("0x1")));
        assert!(!is_valid_address("0x1"));
        assert!(!is_valid_address(&format!("0x{}", "g".repeat(64))));
        assert!(!is_valid_address(&"0".repeat(64)));
    }

    #[test]
    fn test_display_and_parse_roundtrip() {
        let addr = IotaAddress::from_bytes([0xab; 32]);
        let parsed: IotaAddress = addr.to_string().parse().unwrap();
        assert_eq!(addr, parsed);
        assert_eq!(addr.to_string().len(), 66);
    }

    #[test]
    fn test_parse_short_form() {
        let addr: IotaAddress = "0x5".parse().unwrap();
        assert_eq!(addr.as_bytes()[31], 5);
        assert!(IotaAddress::ZERO.is_zero());
        assert!("0xzz".parse::<IotaAddress>().is_err());
        assert!(format!("0x{}", "1".repeat(66)).parse::<IotaAddress>().is_err());
    }
}
