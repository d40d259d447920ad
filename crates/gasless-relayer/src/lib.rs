//! Relayer access module for the gasless trading system.
//!
//! Covers the three relayer calls of a gasless trade: fetching a quote,
//! submitting the signed approval and trade, and reading the trade status.
//! The transport sits behind [`RelayerInterface`]; [`RelayerService`] adds the
//! chain binding and logging shared by every implementation.

use async_trait::async_trait;
use gasless_types::{
	truncate_id, Quote, SignedAuthorization, SubmissionRequest, SubmissionResult, TradeRequest,
	TradeStatus,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod zeroex;
}

/// Errors that can occur while talking to the relayer.
#[derive(Debug, Error)]
pub enum RelayerError {
	/// Credentials or endpoint configuration are unusable.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// The relayer answered a quote or status request with a non-2xx status.
	#[error("Upstream error: {status} {status_text}")]
	Upstream { status: u16, status_text: String },
	/// The relayer refused the submission.
	#[error("Submission rejected: {status} {status_text}: {body}")]
	SubmissionRejected {
		status: u16,
		status_text: String,
		body: serde_json::Value,
	},
	/// The relayer has no route for the requested pair and amount.
	#[error("No liquidity available for the requested trade")]
	LiquidityUnavailable,
	/// A 2xx response did not have the expected shape.
	#[error("Malformed response: {0}")]
	MalformedResponse(String),
	/// The request could not be sent or the response could not be read.
	#[error("Network error: {0}")]
	Network(String),
}

/// Trait defining the interface for relayer implementations.
#[async_trait]
pub trait RelayerInterface: Send + Sync {
	/// Chain identifier sent with every request.
	fn chain_id(&self) -> u64;

	/// Requests a quote for `request`. Issues exactly one request.
	async fn get_quote(&self, request: &TradeRequest) -> Result<Quote, RelayerError>;

	/// Submits signed authorizations for relayed execution. Never retried.
	async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, RelayerError>;

	/// Fetches the current status of a submitted trade.
	async fn get_status(&self, trade_hash: &str) -> Result<TradeStatus, RelayerError>;
}

/// Service that manages relayer access.
pub struct RelayerService {
	implementation: Box<dyn RelayerInterface>,
}

impl RelayerService {
	/// Creates a new RelayerService with the specified implementation.
	pub fn new(implementation: Box<dyn RelayerInterface>) -> Self {
		Self { implementation }
	}

	pub fn chain_id(&self) -> u64 {
		self.implementation.chain_id()
	}

	/// Requests a quote for the trade.
	pub async fn quote(&self, request: &TradeRequest) -> Result<Quote, RelayerError> {
		self.implementation.get_quote(request).await
	}

	/// Submits the signed approval and trade, bound to the relayer's chain.
	///
	/// Returns an error if the relayer accepted the call without a trade hash.
	pub async fn submit(
		&self,
		approval: SignedAuthorization,
		trade: SignedAuthorization,
	) -> Result<SubmissionResult, RelayerError> {
		let request = SubmissionRequest {
			chain_id: self.chain_id(),
			approval,
			trade,
		};
		let result = self.implementation.submit(&request).await?;
		if result.trade_hash.trim().is_empty() {
			return Err(RelayerError::MalformedResponse(
				"submission response has an empty tradeHash".into(),
			));
		}
		tracing::info!(trade_hash = %truncate_id(&result.trade_hash), "Trade submitted");
		Ok(result)
	}

	/// Fetches the status of a submitted trade.
	pub async fn status(&self, trade_hash: &str) -> Result<TradeStatus, RelayerError> {
		self.implementation.get_status(trade_hash).await
	}
}
