//! Command definitions and implementations.
//!
//! Every command returns a JSON document; `main` decides how to print it.

use clap::{Parser, Subcommand, ValueEnum};
use iota_bcs::{Bcs, Encoding};
use iota_crypto::{
    parse_serialized_signature, verify_personal_message_signature, verify_transaction_signature,
    Keypair, MultiSigPublicKey, ParsedSignature, PublicKey, SignatureScheme, Signer,
    SignerPublicKey,
};
use serde_json::{json, Value as Json};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::KeytoolConfig;

/// Main CLI.
#[derive(Parser, Debug)]
#[command(name = "iota-keytool")]
#[command(about = "IOTA keys, addresses, signatures and BCS encoding")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, value_name = "FILE", env = "IOTA_KEYTOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, overrides the config file
    #[arg(short, long, global = true, env = "IOTA_KEYTOOL_LOG")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// What a signature covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IntentArg {
    Transaction,
    PersonalMessage,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new keypair
    Generate {
        /// ed25519, secp256k1 or secp256r1
        #[arg(short, long, default_value = "ed25519")]
        scheme: SignatureScheme,
    },
    /// Show the public key and address of a bech32 private key
    Show {
        /// `iotaprivkey1...`
        private_key: String,
    },
    /// Derive the address of a flagged base64 public key
    Address {
        public_key: String,
    },
    /// Derive a multisig address
    MultisigAddress {
        /// Member as `<flagged base64 public key>:<weight>`, repeatable
        #[arg(short, long = "member", required = true)]
        members: Vec<String>,
        #[arg(short, long)]
        threshold: u32,
    },
    /// Sign a transaction or personal message
    Sign {
        private_key: String,
        data: String,
        #[arg(short, long, value_enum, default_value = "transaction")]
        intent: IntentArg,
        /// Encoding of `data`; UTF-8 text when omitted
        #[arg(short, long)]
        encoding: Option<Encoding>,
    },
    /// Decode a serialized signature
    ParseSignature {
        signature: String,
    },
    /// Combine single-signer signatures into a multisig signature
    Combine {
        #[arg(short, long = "member", required = true)]
        members: Vec<String>,
        #[arg(short, long)]
        threshold: u32,
        /// Serialized member signatures
        #[arg(required = true)]
        signatures: Vec<String>,
    },
    /// Verify a serialized signature and recover its signer
    Verify {
        data: String,
        signature: String,
        #[arg(short, long, value_enum, default_value = "transaction")]
        intent: IntentArg,
        /// Encoding of `data`; UTF-8 text when omitted
        #[arg(short, long)]
        encoding: Option<Encoding>,
    },
    /// Serialize a JSON value as a registered type
    Encode {
        /// Type expression, e.g. `vector<u64>` or `Coin<address>`
        type_name: String,
        json: String,
        /// Output encoding; defaults to the configured one
        #[arg(short, long)]
        encoding: Option<Encoding>,
    },
    /// Deserialize encoded bytes as a registered type
    Decode {
        type_name: String,
        data: String,
        /// Input encoding; defaults to the configured one
        #[arg(short, long)]
        encoding: Option<Encoding>,
    },
}

/// Execute a command against the configured registry.
pub fn execute(command: Commands, config: &KeytoolConfig, bcs: &Bcs) -> anyhow::Result<Json> {
    match command {
        Commands::Generate { scheme } => {
            let keypair = Keypair::generate(scheme)?;
            info!(scheme = %scheme, address = %keypair.address(), "generated keypair");
            Ok(describe_keypair(&keypair, true)?)
        }
        Commands::Show { private_key } => {
            let keypair = Keypair::from_bech32(&private_key)?;
            Ok(describe_keypair(&keypair, false)?)
        }
        Commands::Address { public_key } => {
            let public_key = PublicKey::from_iota_public_key(&public_key)?;
            Ok(describe_public_key(&public_key))
        }
        Commands::MultisigAddress { members, threshold } => {
            let multisig = multisig_from_args(&members, threshold)?;
            Ok(describe_multisig(&multisig))
        }
        Commands::Sign {
            private_key,
            data,
            intent,
            encoding,
        } => {
            let keypair = Keypair::from_bech32(&private_key)?;
            let bytes = decode_data(&data, encoding)?;
            let signed = match intent {
                IntentArg::Transaction => keypair.sign_transaction(&bytes),
                IntentArg::PersonalMessage => keypair.sign_personal_message(&bytes),
            };
            Ok(json!({
                "address": keypair.address().to_string(),
                "bytes": signed.bytes,
                "signature": signed.signature,
            }))
        }
        Commands::ParseSignature { signature } => {
            Ok(describe_signature(&parse_serialized_signature(&signature)?)?)
        }
        Commands::Combine {
            members,
            threshold,
            signatures,
        } => {
            let multisig = multisig_from_args(&members, threshold)?;
            let combined = multisig.combine_partial_signatures(&signatures)?;
            info!(signatures = signatures.len(), "combined partial signatures");
            Ok(json!({
                "address": multisig.to_address().to_string(),
                "signature": combined,
            }))
        }
        Commands::Verify {
            data,
            signature,
            intent,
            encoding,
        } => {
            let bytes = decode_data(&data, encoding)?;
            let result = match intent {
                IntentArg::Transaction => verify_transaction_signature(&bytes, &signature),
                IntentArg::PersonalMessage => verify_personal_message_signature(&bytes, &signature),
            };
            Ok(match result {
                Ok(signer) => json!({
                    "valid": true,
                    "scheme": signer.scheme().name(),
                    "address": signer.to_address().to_string(),
                }),
                Err(e) => {
                    debug!(error = %e, "verification failed");
                    json!({ "valid": false })
                }
            })
        }
        Commands::Encode {
            type_name,
            json,
            encoding,
        } => {
            let value: Json = serde_json::from_str(&json)
                .map_err(|e| anyhow::anyhow!("Invalid JSON input: {}", e))?;
            let encoding = encoding.unwrap_or(config.output_encoding);
            let writer = bcs.serialize_json(type_name.as_str(), &value)?;
            Ok(json!({
                "type": type_name,
                "encoding": encoding.name(),
                "bytes": writer.encode(encoding),
            }))
        }
        Commands::Decode {
            type_name,
            data,
            encoding,
        } => {
            let encoding = encoding.unwrap_or(config.output_encoding);
            let bytes = encoding.decode(&data)?;
            Ok(bcs.deserialize_json(type_name.as_str(), &bytes)?)
        }
    }
}

fn decode_data(data: &str, encoding: Option<Encoding>) -> anyhow::Result<Vec<u8>> {
    match encoding {
        Some(encoding) => Ok(encoding.decode(data)?),
        None => Ok(data.as_bytes().to_vec()),
    }
}

/// Parse `<flagged base64 public key>:<weight>`.
fn parse_member(member: &str) -> anyhow::Result<(PublicKey, u32)> {
    let Some((public_key, weight)) = member.rsplit_once(':') else {
        anyhow::bail!("Member '{}' must look like <public key>:<weight>", member);
    };
    let weight = weight
        .parse::<u32>()
        .map_err(|e| anyhow::anyhow!("Invalid weight in member '{}': {}", member, e))?;
    Ok((PublicKey::from_iota_public_key(public_key)?, weight))
}

fn multisig_from_args(members: &[String], threshold: u32) -> anyhow::Result<MultiSigPublicKey> {
    let members = members
        .iter()
        .map(|m| parse_member(m))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(MultiSigPublicKey::from_public_keys(members, threshold)?)
}

fn describe_keypair(keypair: &Keypair, with_secret: bool) -> anyhow::Result<Json> {
    let public_key = keypair.public_key();
    let mut out = json!({
        "scheme": keypair.scheme().name(),
        "publicKey": public_key.to_iota_public_key(),
        "address": keypair.address().to_string(),
    });
    if with_secret {
        out["privateKey"] = Json::String(keypair.to_bech32()?);
    }
    Ok(out)
}

fn describe_public_key(public_key: &PublicKey) -> Json {
    json!({
        "scheme": public_key.scheme().name(),
        "publicKey": public_key.to_iota_public_key(),
        "address": public_key.to_address().to_string(),
    })
}

fn describe_multisig(multisig: &MultiSigPublicKey) -> Json {
    json!({
        "address": multisig.to_address().to_string(),
        "multisigPublicKey": multisig.to_base64(),
        "threshold": multisig.threshold(),
        "members": multisig
            .public_keys()
            .iter()
            .map(|pair| json!({
                "publicKey": pair.public_key.to_iota_public_key(),
                "weight": pair.weight,
                "address": pair.public_key.to_address().to_string(),
            }))
            .collect::<Vec<_>>(),
    })
}

fn describe_signature(parsed: &ParsedSignature) -> anyhow::Result<Json> {
    Ok(match parsed {
        ParsedSignature::Single {
            scheme,
            signature,
            public_key,
        } => json!({
            "scheme": scheme.name(),
            "signature": hex::encode(signature),
            "publicKey": public_key.to_iota_public_key(),
            "address": public_key.to_address().to_string(),
        }),
        ParsedSignature::MultiSig(multisig) => {
            let signer = SignerPublicKey::from_parsed(parsed)?;
            json!({
                "scheme": SignatureScheme::MultiSig.name(),
                "address": signer.to_address().to_string(),
                "bitmap": multisig.bitmap,
                "threshold": multisig.threshold,
                "signers": multisig.signer_indices(),
                "signatures": multisig
                    .sigs
                    .iter()
                    .map(|sig| json!({
                        "scheme": sig.scheme().name(),
                        "signature": hex::encode(sig.as_bytes()),
                    }))
                    .collect::<Vec<_>>(),
            })
        }
        ParsedSignature::ZkLogin(bytes) | ParsedSignature::Passkey(bytes) => json!({
            "scheme": parsed.scheme().name(),
            "length": bytes.len(),
        }),
    })
}
