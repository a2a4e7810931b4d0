//! Intent messages: every signed payload is prefixed with what it is for.

use crate::hash::blake2b256;
use iota_bcs::uleb;

/// What a signed payload represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IntentScope {
    TransactionData = 0,
    TransactionEffects = 1,
    CheckpointSummary = 2,
    PersonalMessage = 3,
}

/// Intent version and app id; both zero for IOTA payloads.
const INTENT_VERSION: u8 = 0;
const APP_ID: u8 = 0;

/// `[scope, version, app_id] || message`.
pub fn message_with_intent(scope: IntentScope, message: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(message.len() + 3);
    out.extend_from_slice(&[scope as u8, INTENT_VERSION, APP_ID]);
    out.extend_from_slice(message);
    out
}

/// The 32-byte digest that keys actually sign.
pub fn intent_digest(scope: IntentScope, message: &[u8]) -> [u8; 32] {
    blake2b256(&message_with_intent(scope, message))
}

/// A personal message as signed: the BCS `vector<u8>` encoding of its bytes.
pub fn personal_message_bytes(message: &[u8]) -> Vec<u8> {
    let mut out = uleb::encode(message.len() as u64);
    out.extend_from_slice(message);
    out
}
