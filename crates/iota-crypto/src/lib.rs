//! IOTA Crypto - keys, addresses and signatures on top of `iota-bcs`.
//!
//! This crate provides:
//! - Ed25519, Secp256k1 and Secp256r1 keypairs with bech32 `iotaprivkey` import/export
//! - Scheme-tagged public keys and Blake2b-256 address derivation
//! - Intent-scoped signing and verification of transactions and personal messages
//! - Serialized signature parsing, including the MultiSig envelope
//! - Weighted threshold MultiSig keys, partial signature combination and signing

pub mod address;
pub mod ed25519;
pub mod error;
pub mod hash;
pub mod intent;
pub mod keypair;
pub mod multisig;
pub mod public_key;
pub mod scheme;
pub mod secp256k1;
pub mod secp256r1;
pub mod signature;
pub mod verify;

pub use address::{is_valid_address, normalize_address, IotaAddress, IOTA_ADDRESS_LENGTH};
pub use ed25519::Ed25519Keypair;
pub use error::CryptoError;
pub use hash::blake2b256;
pub use intent::{intent_digest, message_with_intent, personal_message_bytes, IntentScope};
pub use keypair::{
    decode_iota_private_key, encode_iota_private_key, Keypair, ParsedKeypair, SignatureWithBytes,
    Signer, IOTA_PRIVATE_KEY_PREFIX,
};
pub use multisig::{MultiSigPublicKey, MultiSigSigner, MAX_SIGNER_IN_MULTISIG};
pub use public_key::{PublicKey, SignatureVerifier};
pub use scheme::{SignatureScheme, SIGNATURE_LENGTH};
pub use secp256k1::Secp256k1Keypair;
pub use secp256r1::Secp256r1Keypair;
pub use signature::{
    parse_serialized_signature, register_signature_types, to_serialized_signature,
    CompressedSignature, MultiSigSignature, ParsedSignature, PubkeyWeightPair, SignatureInput,
};
pub use verify::{
    verify_personal_message_signature, verify_signature, verify_transaction_signature,
    SignerPublicKey,
};
