use crate::error::CryptoError;
use crate::keypair::{encode_iota_private_key, Signer, PRIVATE_KEY_SIZE};
use crate::public_key::PublicKey;
use crate::scheme::SignatureScheme;
use ed25519_dalek::{Signer as _, Verifier as _};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 signing keypair. The dalek signing key wipes itself on drop.
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Ed25519Keypair {
    pub fn generate() -> Self {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    pub fn from_seed(seed: &[u8; PRIVATE_KEY_SIZE]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Build from a 32-byte secret key.
    pub fn from_secret_key(secret: &[u8]) -> Result<Self, CryptoError> {
        let seed: &[u8; PRIVATE_KEY_SIZE] =
            secret.try_into().map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self::from_seed(seed))
    }

    /// Secret key bytes, wiped when the returned buffer drops.
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Bech32 `iotaprivkey` encoding of the secret key.
    pub fn secret_key(&self) -> Result<String, CryptoError> {
        encode_iota_private_key(&self.secret_key_bytes()[..], SignatureScheme::Ed25519)
    }
}

impl Signer for Ed25519Keypair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Ed25519
    }

    fn public_key(&self) -> PublicKey {
        PublicKey::from_trusted(
            SignatureScheme::Ed25519,
            self.signing_key.verifying_key().to_bytes().to_vec(),
        )
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.signing_key.sign(data).to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair({})", self.address())
    }
}

/// Verify an Ed25519 signature over `data`.
pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let key: &[u8; 32] = public_key.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
    let key = ed25519_dalek::VerifyingKey::from_bytes(key)?;
    let signature = ed25519_dalek::Signature::from_slice(signature)?;
    key.verify(data, &signature)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iota_bcs::encoding::{from_base64, to_base64};

    #[test]
    fn test_known_secret_key() {
        let secret = from_base64("mdqVWeFekT7pqy5T49+tV12jO0m+ESW7ki4zSU9JiCg=").unwrap();
        let keypair = Ed25519Keypair::from_secret_key(&secret).unwrap();
        assert_eq!(
            keypair.public_key().to_base64(),
            "Gy9JCW4+Xb0Pz6nAwM2S2as7IVRLNNXdSmXZi4eLmSI="
        );
        assert_eq!(to_base64(&keypair.secret_key_bytes()[..]), to_base64(&secret));
    }

    #[test]
    fn test_from_seed() {
        let keypair = Ed25519Keypair::from_seed(&[8u8; 32]);
        assert_eq!(
            keypair.public_key().to_base64(),
            "E5j2LG0aRXxRumpLXz29L2n8qTIWIY3ImX5Ba9F9k8o="
        );
    }

    #[test]
    fn test_wrong_secret_length() {
        assert_eq!(
            Ed25519Keypair::from_secret_key(&[1u8; 31]).unwrap_err(),
            CryptoError::InvalidPrivateKey
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Ed25519Keypair::generate();
        let signature = keypair.sign(b"hello world");
        assert_eq!(signature.len(), 64);
        let public_key = keypair.public_key();
        assert!(verify(public_key.as_bytes(), b"hello world", &signature).is_ok());
        assert!(verify(public_key.as_bytes(), b"hello worle", &signature).is_err());
    }

    #[test]
    fn test_clone_keeps_key() {
        let keypair = Ed25519Keypair::generate();
        assert_eq!(keypair.clone().public_key(), keypair.public_key());
    }
}
