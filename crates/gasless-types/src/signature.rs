//! Wire signature format expected by the relayer, and the codec that builds
//! it from a raw 65-byte recoverable signature.

use crate::utils::without_0x_prefix;
use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

/// Length of a recoverable ECDSA signature: r (32) || s (32) || v (1).
pub const SIGNATURE_LENGTH: usize = 65;

/// Errors that occur while decomposing a raw signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
	#[error("Malformed signature: expected 65 bytes, got {0}")]
	InvalidLength(usize),
	#[error("Malformed signature: invalid hex ({0})")]
	InvalidHex(String),
	#[error("Malformed signature: invalid recovery value {0}")]
	InvalidRecoveryId(u8),
}

/// Signature scheme tag understood by the relayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SignatureType {
	Illegal = 0,
	Invalid = 1,
	EIP712 = 2,
	EthSign = 3,
}

/// A signature split into its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
	/// Recovery value, always 27 or 28.
	pub v: u8,
	pub r: B256,
	pub s: B256,
	pub signature_type: SignatureType,
}

/// Splits a raw 65-byte signature into (v, r, s) and tags it as EIP-712.
///
/// A trailing recovery byte of 0/1 is normalized to 27/28; 27/28 are kept.
/// Any other length or recovery value is rejected.
pub fn encode_signature(raw: &[u8]) -> Result<Signature, SignatureError> {
	if raw.len() != SIGNATURE_LENGTH {
		return Err(SignatureError::InvalidLength(raw.len()));
	}

	let v = match raw[64] {
		v @ (0 | 1) => v + 27,
		v @ (27 | 28) => v,
		other => return Err(SignatureError::InvalidRecoveryId(other)),
	};

	Ok(Signature {
		v,
		r: B256::from_slice(&raw[..32]),
		s: B256::from_slice(&raw[32..64]),
		signature_type: SignatureType::EIP712,
	})
}

/// Same as [`encode_signature`] for a hex string, with or without `0x`.
pub fn encode_signature_hex(raw: &str) -> Result<Signature, SignatureError> {
	let bytes = hex::decode(without_0x_prefix(raw))
		.map_err(|e| SignatureError::InvalidHex(e.to_string()))?;
	encode_signature(&bytes)
}
