//! Submission request and response types.

use crate::{AuthorizationPayload, Signature};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authorization payload with its signature attached.
///
/// Serializes as the original payload with an added `signature` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedAuthorization {
	#[serde(flatten)]
	pub payload: AuthorizationPayload,
	pub signature: Signature,
}

impl SignedAuthorization {
	/// Attaches `signature` to `payload`, replacing any `signature` field the
	/// relayer may already have put there.
	pub fn new(mut payload: AuthorizationPayload, signature: Signature) -> Self {
		payload.fields.remove("signature");
		Self { payload, signature }
	}
}

/// Body of the submit call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
	pub chain_id: u64,
	pub approval: SignedAuthorization,
	pub trade: SignedAuthorization,
}

/// Relayer acknowledgement of a submitted trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
	/// Handle used to query the trade status.
	pub trade_hash: String,
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}
