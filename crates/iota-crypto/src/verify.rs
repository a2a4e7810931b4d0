//! Verify a serialized signature and recover the key that produced it.

use crate::address::IotaAddress;
use crate::error::CryptoError;
use crate::multisig::MultiSigPublicKey;
use crate::public_key::{PublicKey, SignatureVerifier};
use crate::scheme::SignatureScheme;
use crate::signature::{parse_serialized_signature, ParsedSignature, SignatureInput};
use tracing::debug;

/// The key recovered from a serialized signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignerPublicKey {
    Single(PublicKey),
    MultiSig(MultiSigPublicKey),
}

impl SignerPublicKey {
    /// The public key carried inside a parsed signature. zkLogin and passkey
    /// signatures carry none this crate can reconstruct.
    pub fn from_parsed(parsed: &ParsedSignature) -> Result<Self, CryptoError> {
        match parsed {
            ParsedSignature::Single { public_key, .. } => Ok(SignerPublicKey::Single(public_key.clone())),
            ParsedSignature::MultiSig(multisig) => Ok(SignerPublicKey::MultiSig(MultiSigPublicKey::new(
                multisig.pk_map.clone(),
                multisig.threshold,
            )?)),
            other => Err(CryptoError::SchemeMismatch {
                expected: "single-signer or MultiSig",
                actual: other.scheme().name(),
            }),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SignerPublicKey::Single(pk) => pk.scheme(),
            SignerPublicKey::MultiSig(_) => SignatureScheme::MultiSig,
        }
    }

    pub fn to_address(&self) -> IotaAddress {
        match self {
            SignerPublicKey::Single(pk) => pk.to_address(),
            SignerPublicKey::MultiSig(pk) => pk.to_address(),
        }
    }
}

impl SignatureVerifier for SignerPublicKey {
    fn verify<'a>(&self, data: &[u8], signature: impl Into<SignatureInput<'a>>) -> bool {
        match self {
            SignerPublicKey::Single(pk) => pk.verify(data, signature),
            SignerPublicKey::MultiSig(pk) => pk.verify(data, signature),
        }
    }
}

fn recover(
    signature: &str,
    check: impl FnOnce(&SignerPublicKey) -> bool,
) -> Result<SignerPublicKey, CryptoError> {
    let parsed = parse_serialized_signature(signature).map_err(|e| {
        debug!(error = %e, "cannot parse signature");
        CryptoError::SignatureNotValid
    })?;
    let public_key = SignerPublicKey::from_parsed(&parsed).map_err(|e| {
        debug!(error = %e, "signature carries no usable public key");
        CryptoError::SignatureNotValid
    })?;
    if !check(&public_key) {
        return Err(CryptoError::SignatureNotValid);
    }
    Ok(public_key)
}

/// Verify `signature` over the digest `bytes` and return the signer's key.
pub fn verify_signature(bytes: &[u8], signature: &str) -> Result<SignerPublicKey, CryptoError> {
    recover(signature, |pk| pk.verify(bytes, signature))
}

/// Verify a personal-message signature and return the signer's key.
pub fn verify_personal_message_signature(
    message: &[u8],
    signature: &str,
) -> Result<SignerPublicKey, CryptoError> {
    recover(signature, |pk| pk.verify_personal_message(message, signature))
}

/// Verify a transaction signature and return the signer's key.
pub fn verify_transaction_signature(
    tx_bytes: &[u8],
    signature: &str,
) -> Result<SignerPublicKey, CryptoError> {
    recover(signature, |pk| pk.verify_transaction(tx_bytes, signature))
}
