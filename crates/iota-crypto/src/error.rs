use iota_bcs::BcsError;
use thiserror::Error;

/// Errors that can occur in key, signature and multisig operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CryptoError {
    #[error("Invalid public key length for {scheme}: expected {expected}, got {actual}")]
    InvalidKeyLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("Unsupported signature scheme flag: {0:#04x}")]
    UnknownSignatureScheme(u8),

    #[error("Unknown signature scheme name: {0}")]
    UnknownSchemeName(String),

    #[error("Expected a {expected} key or signature, got {actual}")]
    SchemeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid private key encoding: {0}")]
    PrivateKeyEncoding(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid threshold")]
    InvalidThreshold,

    #[error("Invalid weight")]
    InvalidWeight,

    #[error("Multisig does not support duplicate public keys")]
    DuplicatePublicKey,

    #[error("Unreachable threshold")]
    UnreachableThreshold,

    #[error("Max number of signers in a multisig is 10")]
    TooManySigners(usize),

    #[error("Min number of signers in a multisig is 1")]
    TooFewSigners,

    #[error("Received signature from unknown public key")]
    UnknownSigner,

    #[error("Received multiple signatures from the same public key")]
    DuplicateSigner,

    #[error("MultiSig is not supported inside MultiSig")]
    NestedMultiSig,

    #[error("Can't create MultiSigSigner with duplicate signers")]
    DuplicateSigners,

    #[error("Signer {0} is not part of the MultiSig public key")]
    SignerNotInMultiSig(String),

    #[error("Combined weight of signers is less than threshold")]
    InsufficientWeight,

    #[error("Signature is not valid for the provided data")]
    SignatureNotValid,

    #[error(transparent)]
    Bcs(#[from] BcsError),
}

impl From<ed25519_dalek::SignatureError> for CryptoError {
    fn from(_: ed25519_dalek::SignatureError) -> Self {
        CryptoError::InvalidSignature
    }
}

impl From<bech32::DecodeError> for CryptoError {
    fn from(e: bech32::DecodeError) -> Self {
        CryptoError::PrivateKeyEncoding(e.to_string())
    }
}
