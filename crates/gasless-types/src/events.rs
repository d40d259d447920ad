//! Events published while a trade moves through the pipeline.

use crate::TradeStatusKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a single trade run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeState {
	Idle,
	QuoteRequested,
	AuthorizationsSigned,
	Submitted,
	Polling,
	Confirmed,
	Failed,
}

impl TradeState {
	/// Returns true once no further transition is possible.
	pub fn is_final(self) -> bool {
		matches!(self, TradeState::Confirmed | TradeState::Failed)
	}
}

impl fmt::Display for TradeState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

/// Event published on the trade event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeEvent {
	/// The pipeline moved between states.
	StateChanged { from: TradeState, to: TradeState },
	/// The relayer accepted the trade.
	Submitted { trade_hash: String },
	/// A status poll completed. `status` is `None` when the poll failed.
	StatusObserved {
		trade_hash: String,
		attempt: u32,
		status: Option<TradeStatusKind>,
	},
}
