//! Quote types returned by the relayer's quote endpoint.
//!
//! Only the fields the pipeline reads are typed. Everything else the relayer
//! sends is kept in a flattened map so it can be echoed back verbatim on
//! submission.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A self-describing structured-signing request (EIP-712 typed data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDescriptor {
	/// Domain separator fields (name, version, chainId, verifyingContract, ...).
	pub domain: Map<String, Value>,
	/// Struct definitions, keyed by type name.
	pub types: Map<String, Value>,
	/// Name of the struct being signed.
	pub primary_type: String,
	/// The struct instance being signed.
	pub message: Map<String, Value>,
	/// Any additional fields the relayer attached.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// A relayer payload that must be authorized by the taker.
///
/// Each payload carries its typed data under `eip712` and is signed exactly
/// once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationPayload {
	/// Typed data to sign.
	pub eip712: TypedDataDescriptor,
	/// Relayer-specific fields (e.g. `type`, `hash`), preserved verbatim.
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl AuthorizationPayload {
	/// The relayer's payload type tag, e.g. `"permit"` or
	/// `"settler_metatransaction"`.
	pub fn kind(&self) -> Option<&str> {
		self.fields.get("type").and_then(Value::as_str)
	}
}

/// Transaction the relayer will broadcast on the taker's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTransaction {
	pub to: Address,
	pub data: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub gas_price: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

/// A gasless swap quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
	/// Token approval authorization.
	pub approval: AuthorizationPayload,
	/// Trade authorization.
	pub trade: AuthorizationPayload,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction: Option<QuoteTransaction>,
	/// Remaining relayer fields (`buyAmount`, `fees`, `issues`, ...).
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl Quote {
	/// The quoted buy amount in base units, if the relayer returned one.
	pub fn buy_amount(&self) -> Option<&str> {
		self.fields.get("buyAmount").and_then(Value::as_str)
	}
}
