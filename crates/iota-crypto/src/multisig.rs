//! Weighted threshold multisig keys, signature combination and the
//! multisig signer.

use crate::address::IotaAddress;
use crate::error::CryptoError;
use crate::hash::blake2b256;
use crate::intent::{personal_message_bytes, IntentScope};
use crate::keypair::{Keypair, SignatureWithBytes, Signer};
use crate::public_key::{PublicKey, SignatureVerifier};
use crate::scheme::SignatureScheme;
use crate::signature::{
    multisig_public_key_from_value, multisig_public_key_value, parse_serialized_signature,
    signature_registry, CompressedSignature, MultiSigSignature, ParsedSignature, PubkeyWeightPair,
    SignatureInput, MULTISIG_PUBLIC_KEY_TYPE,
};
use iota_bcs::encoding::{from_base64, to_base64};
use iota_bcs::BcsError;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const MAX_SIGNER_IN_MULTISIG: usize = 10;
pub const MIN_SIGNER_IN_MULTISIG: usize = 1;

/// An ordered list of weighted member keys plus a threshold.
///
/// Every constructor validates the members and threshold; an instance is
/// immutable afterwards. Member order is part of the key: it fixes the
/// bitmap positions and the address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiSigPublicKey {
    pk_map: Vec<PubkeyWeightPair>,
    threshold: u16,
    raw_bytes: Vec<u8>,
}

fn range_error(type_name: &'static str, value: u32, max: u32) -> CryptoError {
    CryptoError::Bcs(BcsError::IntegerRange {
        type_name,
        value: value.to_string(),
        max: max.to_string(),
    })
}

impl MultiSigPublicKey {
    /// Build from `(key, weight)` pairs. Weights must fit a `u8` and the
    /// threshold a `u16`.
    pub fn from_public_keys(
        public_keys: impl IntoIterator<Item = (PublicKey, u32)>,
        threshold: u32,
    ) -> Result<Self, CryptoError> {
        let pk_map = public_keys
            .into_iter()
            .map(|(public_key, weight)| {
                let weight = u8::try_from(weight).map_err(|_| range_error("u8", weight, u8::MAX as u32))?;
                Ok(PubkeyWeightPair { public_key, weight })
            })
            .collect::<Result<Vec<_>, CryptoError>>()?;
        let threshold =
            u16::try_from(threshold).map_err(|_| range_error("u16", threshold, u16::MAX as u32))?;
        Self::new(pk_map, threshold)
    }

    /// Validate and encode a member list.
    pub fn new(pk_map: Vec<PubkeyWeightPair>, threshold: u16) -> Result<Self, CryptoError> {
        if threshold < 1 {
            return Err(CryptoError::InvalidThreshold);
        }
        let mut seen = HashSet::with_capacity(pk_map.len());
        for pair in &pk_map {
            if !seen.insert(&pair.public_key) {
                return Err(CryptoError::DuplicatePublicKey);
            }
            if pair.weight < 1 {
                return Err(CryptoError::InvalidWeight);
            }
        }
        let total_weight: u32 = pk_map.iter().map(|p| p.weight as u32).sum();
        if threshold as u32 > total_weight {
            return Err(CryptoError::UnreachableThreshold);
        }
        if pk_map.len() > MAX_SIGNER_IN_MULTISIG {
            return Err(CryptoError::TooManySigners(pk_map.len()));
        }
        if pk_map.len() < MIN_SIGNER_IN_MULTISIG {
            return Err(CryptoError::TooFewSigners);
        }

        let value = multisig_public_key_value(&pk_map, threshold)?;
        let raw_bytes = signature_registry()?
            .serialize(MULTISIG_PUBLIC_KEY_TYPE, &value)?
            .into_bytes();
        Ok(Self {
            pk_map,
            threshold,
            raw_bytes,
        })
    }

    /// Decode the BCS `MultiSigPublicKey` form.
    pub fn from_raw_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let value = signature_registry()?.deserialize_exact(MULTISIG_PUBLIC_KEY_TYPE, bytes)?;
        let (pk_map, threshold) = multisig_public_key_from_value(&value)?;
        Self::new(pk_map, threshold)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_raw_bytes(&from_base64(encoded)?)
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn public_keys(&self) -> &[PubkeyWeightPair] {
        &self.pk_map
    }

    pub fn flag(&self) -> u8 {
        SignatureScheme::MultiSig.flag()
    }

    pub fn to_raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.raw_bytes)
    }

    /// `0x03 || BCS(MultiSigPublicKey)`.
    pub fn to_iota_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.raw_bytes.len() + 1);
        out.push(self.flag());
        out.extend_from_slice(&self.raw_bytes);
        out
    }

    /// `blake2b256(0x03 || threshold_le || (flag || key || weight)*)`.
    pub fn to_address(&self) -> IotaAddress {
        let mut preimage = Vec::with_capacity(3 + self.pk_map.len() * 35);
        preimage.push(self.flag());
        preimage.extend_from_slice(&self.threshold.to_le_bytes());
        for pair in &self.pk_map {
            preimage.extend_from_slice(&pair.public_key.to_iota_bytes());
            preimage.push(pair.weight);
        }
        IotaAddress::from_bytes(blake2b256(&preimage))
    }

    fn index_of(&self, public_key: &PublicKey) -> Option<usize> {
        self.pk_map.iter().position(|p| &p.public_key == public_key)
    }

    /// Combine member signatures into one serialized MultiSig signature.
    ///
    /// Each bit of the bitmap marks the member that produced a signature;
    /// the signatures keep the order they were supplied in. Verification pairs
    /// them with the set bits in ascending order, so partials supplied out of
    /// member order produce a signature that parses but does not verify.
    pub fn combine_partial_signatures<S: AsRef<str>>(
        &self,
        signatures: &[S],
    ) -> Result<String, CryptoError> {
        let mut bitmap: u16 = 0;
        let mut sigs = Vec::with_capacity(signatures.len());
        let mut order = Vec::with_capacity(signatures.len());
        for serialized in signatures {
            let (scheme, signature, public_key) = match parse_serialized_signature(serialized.as_ref())? {
                ParsedSignature::Single {
                    scheme,
                    signature,
                    public_key,
                } => (scheme, signature, public_key),
                ParsedSignature::MultiSig(_) => return Err(CryptoError::NestedMultiSig),
                other => {
                    return Err(CryptoError::SchemeMismatch {
                        expected: "single-signer",
                        actual: other.scheme().name(),
                    })
                }
            };
            let index = self.index_of(&public_key).ok_or(CryptoError::UnknownSigner)?;
            if bitmap & (1 << index) != 0 {
                return Err(CryptoError::DuplicateSigner);
            }
            bitmap |= 1 << index;
            order.push(index);
            sigs.push(CompressedSignature::new(scheme, &signature)?);
        }
        if !order.windows(2).all(|w| w[0] < w[1]) {
            warn!("partial signatures combined out of member order will not verify");
        }

        MultiSigSignature {
            sigs,
            bitmap,
            pk_map: self.pk_map.clone(),
            threshold: self.threshold,
        }
        .to_serialized()
    }

    /// A signer over `signers`, which must all be members.
    pub fn get_signer(&self, signers: Vec<Keypair>) -> Result<MultiSigSigner, CryptoError> {
        MultiSigSigner::new(self.clone(), signers)
    }

    fn verify_multisig(&self, data: &[u8], multisig: &MultiSigSignature) -> bool {
        if multisig.pk_map != self.pk_map || multisig.threshold != self.threshold {
            debug!("multisig signature carries a different public key");
            return false;
        }
        let indices = multisig.signer_indices();
        if indices.len() != multisig.sigs.len() {
            debug!(
                bits = indices.len(),
                sigs = multisig.sigs.len(),
                "bitmap does not match the number of signatures"
            );
            return false;
        }

        let mut weight: u32 = 0;
        for (signature, index) in multisig.sigs.iter().zip(indices) {
            let Some(member) = self.pk_map.get(index) else {
                debug!(index, "bitmap names a member that does not exist");
                return false;
            };
            if member.public_key.scheme() != signature.scheme()
                || !member.public_key.verify_raw(data, signature.as_bytes())
            {
                debug!(index, "member signature failed to verify");
                return false;
            }
            weight += member.weight as u32;
        }
        weight >= self.threshold as u32
    }
}

impl SignatureVerifier for MultiSigPublicKey {
    /// Only serialized MultiSig signatures are accepted.
    fn verify<'a>(&self, data: &[u8], signature: impl Into<SignatureInput<'a>>) -> bool {
        let SignatureInput::Serialized(serialized) = signature.into() else {
            debug!("multisig verification needs a serialized signature");
            return false;
        };
        match parse_serialized_signature(serialized) {
            Ok(ParsedSignature::MultiSig(multisig)) => self.verify_multisig(data, &multisig),
            Ok(other) => {
                debug!(scheme = %other.scheme(), "not a multisig signature");
                false
            }
            Err(e) => {
                debug!(error = %e, "unparseable serialized signature");
                false
            }
        }
    }
}

/// Signs with a subset of members whose combined weight meets the
/// threshold, producing MultiSig signatures.
#[derive(Debug, Clone)]
pub struct MultiSigSigner {
    public_key: MultiSigPublicKey,
    signers: Vec<Keypair>,
}

impl MultiSigSigner {
    pub fn new(public_key: MultiSigPublicKey, signers: Vec<Keypair>) -> Result<Self, CryptoError> {
        let mut seen = HashSet::with_capacity(signers.len());
        let mut combined_weight: u32 = 0;
        let mut ordered = Vec::with_capacity(signers.len());
        for signer in signers {
            let address = signer.address();
            if !seen.insert(address) {
                return Err(CryptoError::DuplicateSigners);
            }
            let index = public_key
                .pk_map
                .iter()
                .position(|p| p.public_key.to_address() == address)
                .ok_or_else(|| CryptoError::SignerNotInMultiSig(address.to_string()))?;
            combined_weight += public_key.pk_map[index].weight as u32;
            ordered.push((index, signer));
        }
        if combined_weight < public_key.threshold as u32 {
            return Err(CryptoError::InsufficientWeight);
        }
        ordered.sort_by_key(|(index, _)| *index);
        Ok(Self {
            public_key,
            signers: ordered.into_iter().map(|(_, signer)| signer).collect(),
        })
    }

    pub fn scheme(&self) -> SignatureScheme {
        SignatureScheme::MultiSig
    }

    pub fn public_key(&self) -> &MultiSigPublicKey {
        &self.public_key
    }

    pub fn address(&self) -> IotaAddress {
        self.public_key.to_address()
    }

    pub fn sign_with_intent(
        &self,
        bytes: &[u8],
        scope: IntentScope,
    ) -> Result<SignatureWithBytes, CryptoError> {
        let partials: Vec<String> = self
            .signers
            .iter()
            .map(|signer| signer.sign_with_intent(bytes, scope).signature)
            .collect();
        Ok(SignatureWithBytes {
            bytes: to_base64(bytes),
            signature: self.public_key.combine_partial_signatures(partials.as_slice())?,
        })
    }

    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> Result<SignatureWithBytes, CryptoError> {
        self.sign_with_intent(tx_bytes, IntentScope::TransactionData)
    }

    pub fn sign_personal_message(&self, message: &[u8]) -> Result<SignatureWithBytes, CryptoError> {
        let signed =
            self.sign_with_intent(&personal_message_bytes(message), IntentScope::PersonalMessage)?;
        Ok(SignatureWithBytes {
            bytes: to_base64(message),
            signature: signed.signature,
        })
    }
}
