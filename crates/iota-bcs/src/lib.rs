//! IOTA BCS - schema-driven Binary Canonical Serialization.
//!
//! This crate provides:
//! - A type registry for structs, enums, aliases and generics (`Bcs`)
//! - Little-endian writer and reader with ULEB128 length prefixes
//! - A codec engine that walks a registered schema alongside a `Value` tree
//! - U256, hex/base64/base58 encodings and codec presets

pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod type_ref;
pub mod u256;
pub mod uleb;
pub mod value;
pub mod writer;

#[cfg(feature = "serde")]
pub mod json;

pub use config::{CodecConfig, IOTA_ADDRESS_LENGTH};
pub use encoding::Encoding;
pub use error::BcsError;
pub use reader::BcsReader;
pub use registry::Bcs;
pub use schema::{Primitive, Resolved, TypeSchema, UintType};
pub use type_ref::{TypeArg, TypeRef, MAX_TYPE_NESTING};
pub use u256::U256;
pub use value::Value;
pub use writer::BcsWriter;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bcs, BcsError, BcsReader, BcsWriter, CodecConfig, Encoding, TypeRef, Value, U256,
    };
}
