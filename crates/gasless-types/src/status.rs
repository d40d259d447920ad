//! Trade status types returned by the relayer's status endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Settlement state reported by the relayer.
///
/// Values the pipeline does not know map to `Unknown`; they are treated as
/// non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatusKind {
	Pending,
	Submitted,
	Succeeded,
	Confirmed,
	Failed,
	#[serde(other)]
	Unknown,
}

impl TradeStatusKind {
	/// Only a confirmed trade ends the wait.
	pub fn is_terminal(self) -> bool {
		matches!(self, TradeStatusKind::Confirmed)
	}
}

impl fmt::Display for TradeStatusKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			TradeStatusKind::Pending => "pending",
			TradeStatusKind::Submitted => "submitted",
			TradeStatusKind::Succeeded => "succeeded",
			TradeStatusKind::Confirmed => "confirmed",
			TradeStatusKind::Failed => "failed",
			TradeStatusKind::Unknown => "unknown",
		};
		f.write_str(s)
	}
}

/// One observation of a trade's status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStatus {
	pub status: TradeStatusKind,
	/// Remaining relayer fields (`transactions`, `reason`, ...).
	#[serde(flatten)]
	pub fields: Map<String, Value>,
}

impl TradeStatus {
	pub fn is_terminal(&self) -> bool {
		self.status.is_terminal()
	}
}

/// Outcome of a trade that reached confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
	pub trade_hash: String,
	/// The confirming status observation.
	pub status: TradeStatus,
	/// Number of status requests issued, including the confirming one.
	pub polls: u32,
}
