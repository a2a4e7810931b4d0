//! Codec configuration: naming flavour, address width and resource limits.

use crate::encoding::Encoding;

/// Default on-chain address width in bytes.
pub const IOTA_ADDRESS_LENGTH: usize = 32;

/// Codec-level configuration.
/// Fixed for the lifetime of a [`crate::Bcs`] instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecConfig {
    /// Name of the built-in sequence type: `vector` for Move, `Vec` for Rust.
    pub vector_type: String,
    /// Width in bytes of the predefined `address` type.
    pub address_length: usize,
    pub address_encoding: Encoding,
    /// Opening and closing characters around generic arguments.
    pub generic_separators: (char, char),
    /// Deepest nesting allowed when parsing or resolving a type.
    pub max_depth: usize,
    /// Upper bound on type names visited while resolving one type.
    pub max_nodes: usize,
    /// Largest buffer a single `serialize` call may produce.
    pub max_writer_size: usize,
    /// Register the predefined primitives and `Option<T>`.
    pub with_primitives: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::iota_move()
    }
}

impl CodecConfig {
    /// Move-flavoured configuration used for on-chain types.
    pub fn iota_move() -> Self {
        Self {
            vector_type: "vector".to_string(),
            address_length: IOTA_ADDRESS_LENGTH,
            address_encoding: Encoding::Hex,
            generic_separators: ('<', '>'),
            max_depth: 64,
            max_nodes: 10_000,
            max_writer_size: 1024 * 1024,
            with_primitives: true,
        }
    }

    /// Rust-flavoured configuration: `Vec<T>` and `String`.
    pub fn rust() -> Self {
        let mut config = Self::iota_move();
        config.vector_type = "Vec".to_string();
        config
    }

    /// Bare configuration with no predefined types.
    pub fn empty() -> Self {
        let mut config = Self::iota_move();
        config.with_primitives = false;
        config
    }

    pub fn with_address_length(mut self, length: usize) -> Self {
        self.address_length = length;
        self
    }

    pub fn is_rust(&self) -> bool {
        self.vector_type == "Vec"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iota_move_config() {
        let config = CodecConfig::iota_move();
        assert_eq!(config.vector_type, "vector");
        assert_eq!(config.address_length, 32);
        assert_eq!(config.generic_separators, ('<', '>'));
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.max_nodes, 10_000);
        assert!(config.with_primitives);
        assert!(!config.is_rust());
    }

    #[test]
    fn test_rust_config() {
        let config = CodecConfig::rust();
        assert_eq!(config.vector_type, "Vec");
        assert!(config.is_rust());
    }

    #[test]
    fn test_empty_config() {
        assert!(!CodecConfig::empty().with_primitives);
        assert_eq!(CodecConfig::default(), CodecConfig::iota_move());
    }

    #[test]
    fn test_address_length_override() {
        assert_eq!(CodecConfig::default().with_address_length(20).address_length, 20);
    }
}
