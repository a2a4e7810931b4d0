//! Serialized signatures: the flag-tagged envelope and the MultiSig payload.
//!
//! A single-signer signature serializes as `flag || signature || public key`.
//! A MultiSig signature is the MultiSig flag followed by the BCS encoding of
//! [`MultiSigSignature`]. zkLogin and passkey payloads are carried opaquely.

use crate::error::CryptoError;
use crate::public_key::PublicKey;
use crate::scheme::{SignatureScheme, SIGNATURE_LENGTH};
use iota_bcs::encoding::{from_base64, to_base64};
use iota_bcs::registry::{U16, U8};
use iota_bcs::{Bcs, BcsError, Value};
use once_cell::sync::Lazy;

/// Signature bytes handed to a verifier: either the raw 64-byte signature or
/// a base64 serialized signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureInput<'a> {
    Raw(&'a [u8]),
    Serialized(&'a str),
}

impl<'a> From<&'a str> for SignatureInput<'a> {
    fn from(s: &'a str) -> Self {
        SignatureInput::Serialized(s)
    }
}

impl<'a> From<&'a String> for SignatureInput<'a> {
    fn from(s: &'a String) -> Self {
        SignatureInput::Serialized(s)
    }
}

impl<'a> From<&'a [u8]> for SignatureInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        SignatureInput::Raw(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for SignatureInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        SignatureInput::Raw(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for SignatureInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        SignatureInput::Raw(bytes)
    }
}

pub const MULTISIG_TYPE: &str = "MultiSig";
pub const MULTISIG_PUBLIC_KEY_TYPE: &str = "MultiSigPublicKey";

/// Register the MultiSig wire types on `bcs`.
pub fn register_signature_types(bcs: &Bcs) -> Result<(), BcsError> {
    bcs.register_fixed_array("Bytes32", U8, 32)?
        .register_fixed_array("Bytes33", U8, 33)?
        .register_fixed_array("Bytes64", U8, SIGNATURE_LENGTH)?;
    bcs.register_enum(
        "CompressedSignature",
        [
            ("ED25519", Some("Bytes64")),
            ("Secp256k1", Some("Bytes64")),
            ("Secp256r1", Some("Bytes64")),
            ("ZkLogin", Some("vector<u8>")),
        ],
    )?;
    bcs.register_enum(
        "PublicKey",
        [
            ("ED25519", Some("Bytes32")),
            ("Secp256k1", Some("Bytes33")),
            ("Secp256r1", Some("Bytes33")),
            ("ZkLogin", Some("vector<u8>")),
        ],
    )?;
    bcs.register_struct("MultiSigPkMap", [("pubKey", "PublicKey"), ("weight", U8)])?;
    bcs.register_struct(
        MULTISIG_PUBLIC_KEY_TYPE,
        [("pk_map", "vector<MultiSigPkMap>"), ("threshold", U16)],
    )?;
    bcs.register_struct(
        MULTISIG_TYPE,
        [
            ("sigs", "vector<CompressedSignature>"),
            ("bitmap", U16),
            ("multisig_pk", MULTISIG_PUBLIC_KEY_TYPE),
        ],
    )?;
    Ok(())
}

static SIGNATURE_REGISTRY: Lazy<Result<Bcs, BcsError>> = Lazy::new(|| {
    let bcs = Bcs::iota_move();
    register_signature_types(&bcs).map(|_| bcs)
});

/// Process-wide Move-flavoured registry holding the signature types.
/// Built on first use.
pub fn signature_registry() -> Result<&'static Bcs, BcsError> {
    SIGNATURE_REGISTRY.as_ref().map_err(Clone::clone)
}

/// One member signature inside a MultiSig, without its public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompressedSignature {
    Ed25519([u8; SIGNATURE_LENGTH]),
    Secp256k1([u8; SIGNATURE_LENGTH]),
    Secp256r1([u8; SIGNATURE_LENGTH]),
    ZkLogin(Vec<u8>),
}

impl CompressedSignature {
    pub fn new(scheme: SignatureScheme, bytes: &[u8]) -> Result<Self, CryptoError> {
        let fixed = || -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
            bytes.try_into().map_err(|_| CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            })
        };
        match scheme {
            SignatureScheme::Ed25519 => Ok(CompressedSignature::Ed25519(fixed()?)),
            SignatureScheme::Secp256k1 => Ok(CompressedSignature::Secp256k1(fixed()?)),
            SignatureScheme::Secp256r1 => Ok(CompressedSignature::Secp256r1(fixed()?)),
            SignatureScheme::ZkLogin => Ok(CompressedSignature::ZkLogin(bytes.to_vec())),
            other => Err(CryptoError::SchemeMismatch {
                expected: "MultiSig member",
                actual: other.name(),
            }),
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            CompressedSignature::Ed25519(_) => SignatureScheme::Ed25519,
            CompressedSignature::Secp256k1(_) => SignatureScheme::Secp256k1,
            CompressedSignature::Secp256r1(_) => SignatureScheme::Secp256r1,
            CompressedSignature::ZkLogin(_) => SignatureScheme::ZkLogin,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CompressedSignature::Ed25519(b)
            | CompressedSignature::Secp256k1(b)
            | CompressedSignature::Secp256r1(b) => b,
            CompressedSignature::ZkLogin(b) => b,
        }
    }

    fn to_value(&self) -> Value {
        Value::variant(self.scheme().name(), Value::Bytes(self.as_bytes().to_vec()))
    }

    fn from_value(value: &Value) -> Result<Self, CryptoError> {
        let (scheme, bytes) = variant_bytes(value)?;
        Self::new(scheme, &bytes)
    }
}

/// A weighted member of a MultiSig public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PubkeyWeightPair {
    pub public_key: PublicKey,
    pub weight: u8,
}

impl PubkeyWeightPair {
    fn to_value(&self) -> Result<Value, CryptoError> {
        let scheme = self.public_key.scheme();
        if !matches!(
            scheme,
            SignatureScheme::Ed25519
                | SignatureScheme::Secp256k1
                | SignatureScheme::Secp256r1
                | SignatureScheme::ZkLogin
        ) {
            return Err(CryptoError::SchemeMismatch {
                expected: "MultiSig member",
                actual: scheme.name(),
            });
        }
        Ok(Value::struct_of([
            (
                "pubKey",
                Value::variant(scheme.name(), Value::Bytes(self.public_key.to_raw_bytes())),
            ),
            ("weight", Value::U8(self.weight)),
        ]))
    }

    fn from_value(value: &Value) -> Result<Self, CryptoError> {
        let (scheme, bytes) = variant_bytes(field(value, "pubKey")?)?;
        Ok(Self {
            public_key: PublicKey::new(scheme, bytes)?,
            weight: uint_field(value, "weight")? as u8,
        })
    }
}

/// BCS value of a MultiSig public key.
pub(crate) fn multisig_public_key_value(
    pk_map: &[PubkeyWeightPair],
    threshold: u16,
) -> Result<Value, CryptoError> {
    Ok(Value::struct_of([
        (
            "pk_map",
            Value::Vector(
                pk_map
                    .iter()
                    .map(PubkeyWeightPair::to_value)
                    .collect::<Result<_, _>>()?,
            ),
        ),
        ("threshold", Value::U16(threshold)),
    ]))
}

pub(crate) fn multisig_public_key_from_value(
    value: &Value,
) -> Result<(Vec<PubkeyWeightPair>, u16), CryptoError> {
    let pk_map = field(value, "pk_map")?
        .as_vec()
        .ok_or(CryptoError::InvalidSignature)?
        .iter()
        .map(PubkeyWeightPair::from_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((pk_map, uint_field(value, "threshold")? as u16))
}

/// Decoded MultiSig signature payload.
///
/// `sigs[i]` belongs to the member at the i-th set bit of `bitmap`,
/// counting from the least significant bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiSigSignature {
    pub sigs: Vec<CompressedSignature>,
    pub bitmap: u16,
    pub pk_map: Vec<PubkeyWeightPair>,
    pub threshold: u16,
}

impl MultiSigSignature {
    /// Decode the BCS payload that follows the MultiSig flag.
    pub fn from_bcs_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let value = signature_registry()?.deserialize_exact(MULTISIG_TYPE, bytes)?;
        let sigs = field(&value, "sigs")?
            .as_vec()
            .ok_or(CryptoError::InvalidSignature)?
            .iter()
            .map(CompressedSignature::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        let (pk_map, threshold) = multisig_public_key_from_value(field(&value, "multisig_pk")?)?;
        Ok(Self {
            sigs,
            bitmap: uint_field(&value, "bitmap")? as u16,
            pk_map,
            threshold,
        })
    }

    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let value = Value::struct_of([
            (
                "sigs",
                Value::vector(self.sigs.iter().map(CompressedSignature::to_value)),
            ),
            ("bitmap", Value::U16(self.bitmap)),
            (
                "multisig_pk",
                multisig_public_key_value(&self.pk_map, self.threshold)?,
            ),
        ]);
        Ok(signature_registry()?
            .serialize(MULTISIG_TYPE, &value)?
            .into_bytes())
    }

    /// Base64 of `0x03 || BCS(MultiSig)`.
    pub fn to_serialized(&self) -> Result<String, CryptoError> {
        let mut bytes = vec![SignatureScheme::MultiSig.flag()];
        bytes.extend(self.to_bcs_bytes()?);
        Ok(to_base64(&bytes))
    }

    /// Member indices named by the bitmap, ascending.
    pub fn signer_indices(&self) -> Vec<usize> {
        (0..16).filter(|i| self.bitmap & (1 << i) != 0).collect()
    }
}

/// Any serialized signature, split by scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedSignature {
    Single {
        scheme: SignatureScheme,
        signature: Vec<u8>,
        public_key: PublicKey,
    },
    MultiSig(MultiSigSignature),
    ZkLogin(Vec<u8>),
    Passkey(Vec<u8>),
}

impl ParsedSignature {
    /// Split a serialized signature by its leading flag byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (flag, payload) = bytes.split_first().ok_or(CryptoError::InvalidSignature)?;
        let scheme = SignatureScheme::from_flag(*flag)?;
        match scheme {
            SignatureScheme::MultiSig => {
                Ok(ParsedSignature::MultiSig(MultiSigSignature::from_bcs_bytes(payload)?))
            }
            SignatureScheme::ZkLogin => Ok(ParsedSignature::ZkLogin(payload.to_vec())),
            SignatureScheme::Passkey => Ok(ParsedSignature::Passkey(payload.to_vec())),
            single => {
                let key_length = single.public_key_length().unwrap_or_default();
                let expected = SIGNATURE_LENGTH + key_length;
                if payload.len() != expected {
                    return Err(CryptoError::InvalidSignatureLength {
                        expected: expected + 1,
                        actual: bytes.len(),
                    });
                }
                let (signature, public_key) = payload.split_at(SIGNATURE_LENGTH);
                Ok(ParsedSignature::Single {
                    scheme: single,
                    signature: signature.to_vec(),
                    public_key: PublicKey::new(single, public_key)?,
                })
            }
        }
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            ParsedSignature::Single { scheme, .. } => *scheme,
            ParsedSignature::MultiSig(_) => SignatureScheme::MultiSig,
            ParsedSignature::ZkLogin(_) => SignatureScheme::ZkLogin,
            ParsedSignature::Passkey(_) => SignatureScheme::Passkey,
        }
    }

    /// Serialize back to the exact envelope bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![self.scheme().flag()];
        match self {
            ParsedSignature::Single {
                signature,
                public_key,
                ..
            } => {
                out.extend_from_slice(signature);
                out.extend_from_slice(public_key.as_bytes());
            }
            ParsedSignature::MultiSig(multisig) => out.extend(multisig.to_bcs_bytes()?),
            ParsedSignature::ZkLogin(payload) | ParsedSignature::Passkey(payload) => {
                out.extend_from_slice(payload)
            }
        }
        Ok(out)
    }

    pub fn to_serialized(&self) -> Result<String, CryptoError> {
        Ok(to_base64(&self.to_bytes()?))
    }
}

/// Parse a base64 serialized signature.
pub fn parse_serialized_signature(serialized: &str) -> Result<ParsedSignature, CryptoError> {
    ParsedSignature::from_bytes(&from_base64(serialized)?)
}

/// Base64 of `flag || signature || public key`.
pub fn to_serialized_signature(signature: &[u8], public_key: &PublicKey) -> String {
    let mut bytes = Vec::with_capacity(1 + signature.len() + public_key.as_bytes().len());
    bytes.push(public_key.flag());
    bytes.extend_from_slice(signature);
    bytes.extend_from_slice(public_key.as_bytes());
    to_base64(&bytes)
}

fn field<'v>(value: &'v Value, name: &str) -> Result<&'v Value, CryptoError> {
    value.get(name).ok_or(CryptoError::InvalidSignature)
}

fn uint_field(value: &Value, name: &str) -> Result<u64, CryptoError> {
    Ok(u64::try_from(field(value, name)?.as_uint()?)?)
}

fn variant_bytes(value: &Value) -> Result<(SignatureScheme, Vec<u8>), CryptoError> {
    let (variant, payload) = value.as_variant().ok_or(CryptoError::InvalidSignature)?;
    let scheme: SignatureScheme = variant.parse()?;
    let bytes = payload
        .and_then(Value::to_byte_vec)
        .ok_or(CryptoError::InvalidSignature)?;
    Ok((scheme, bytes))
}
