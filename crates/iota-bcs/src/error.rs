use thiserror::Error;

/// Errors that can occur while registering, resolving, encoding or decoding BCS types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BcsError {
    #[error("Unsupported type: {0}")]
    UnknownType(String),

    #[error("Generic arity mismatch for {name}: expected {expected} type argument(s), got {actual}")]
    GenericArity {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid type expression: {0}")]
    TypeParse(String),

    #[error("Type resolution exceeded the maximum depth of {0}")]
    RecursionLimit(usize),

    #[error("Type resolution exceeded the budget of {0} type nodes")]
    ResolutionBudget(usize),

    #[error("Invalid {type_name} value: {value}. Expected value in range 0-{max}")]
    IntegerRange {
        type_name: &'static str,
        value: String,
        max: String,
    },

    #[error("Malformed ULEB128 encoding")]
    MalformedUleb128,

    #[error("Invalid boolean byte: {0:#04x}")]
    InvalidBooleanByte(u8),

    #[error("Invalid address length: expected {expected}, got {actual}")]
    AddressLength { expected: usize, actual: usize },

    #[error("Invalid fixed array length: expected {expected}, got {actual}")]
    FixedArrayLength { expected: usize, actual: usize },

    #[error("Struct {type_name} requires field {field}")]
    MissingField { type_name: String, field: String },

    #[error("Unknown value {index} for enum {type_name} with {variants} variant(s)")]
    EnumTagOutOfRange {
        type_name: String,
        index: u32,
        variants: usize,
    },

    #[error("Enum {type_name} has no variant {variant}")]
    UnknownVariant { type_name: String, variant: String },

    #[error("Unexpected end of buffer: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEndOfBuffer { needed: usize, remaining: usize },

    #[error("Trailing bytes after value: {0}")]
    TrailingBytes(usize),

    #[error("Type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },

    #[error("Writer exceeded maximum size of {max} bytes")]
    BufferOverflow { max: usize },

    #[error("Invalid {encoding} data: {reason}")]
    InvalidEncoding {
        encoding: &'static str,
        reason: String,
    },

    #[error("Invalid UTF-8 string")]
    InvalidUtf8,
}

impl From<std::string::FromUtf8Error> for BcsError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        BcsError::InvalidUtf8
    }
}

impl From<hex::FromHexError> for BcsError {
    fn from(e: hex::FromHexError) -> Self {
        BcsError::InvalidEncoding {
            encoding: "hex",
            reason: e.to_string(),
        }
    }
}

impl From<base64::DecodeError> for BcsError {
    fn from(e: base64::DecodeError) -> Self {
        BcsError::InvalidEncoding {
            encoding: "base64",
            reason: e.to_string(),
        }
    }
}

impl From<bs58::decode::Error> for BcsError {
    fn from(e: bs58::decode::Error) -> Self {
        BcsError::InvalidEncoding {
            encoding: "base58",
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_range_message() {
        let err = BcsError::IntegerRange {
            type_name: "u8",
            value: "256".to_string(),
            max: "255".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid u8 value: 256. Expected value in range 0-255"
        );
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: BcsError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, BcsError::InvalidEncoding { encoding: "hex", .. }));
    }
}
