//! Core orchestration for the gasless trading system.
//!
//! Drives one gasless swap through its four stages: request a quote from the
//! relayer, sign the quote's approval and trade payloads, submit the signed
//! package, and wait for the relayer to report the trade as confirmed. Every
//! stage failure surfaces to the caller as a [`TradeError`].

pub mod builder;
pub mod engine;
pub mod monitoring;
pub mod signing;
pub mod state;

#[cfg(test)]
mod test_support;

pub use builder::{BuilderError, TradeEngineBuilder};
pub use engine::{event_bus::EventBus, TradeEngine};
pub use monitoring::{PollError, PollOutcome, StatusPoller};
pub use signing::{AuthorizationSigner, SignedAuthorizations, SigningError};
pub use state::{StateError, TradeStateMachine};

use gasless_relayer::RelayerError;
use gasless_types::TradeRequestError;
use thiserror::Error;

/// Errors that end a trade run.
#[derive(Debug, Error)]
pub enum TradeError {
	/// Missing or unusable configuration. Raised before any request is sent.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// The trade request itself is unusable.
	#[error("Invalid trade request: {0}")]
	InvalidRequest(#[from] TradeRequestError),
	/// The quote endpoint answered with a non-success status.
	#[error("Upstream error: {status} {status_text}")]
	Upstream { status: u16, status_text: String },
	/// The relayer refused the signed trade.
	#[error("Submission rejected: {status} {status_text}: {body}")]
	SubmissionRejected {
		status: u16,
		status_text: String,
		body: serde_json::Value,
	},
	#[error("{0}")]
	MalformedSignature(String),
	#[error("Signing failed: {0}")]
	SigningFailure(String),
	#[error("Malformed response: {0}")]
	MalformedResponse(String),
	#[error("No liquidity available for the requested trade")]
	LiquidityUnavailable,
	#[error("Network error: {0}")]
	Network(String),
	/// Waiting for confirmation ended without one.
	#[error("Polling error: {0}")]
	Polling(#[from] PollError),
	#[error("Invalid state transition: {0}")]
	InvalidTransition(#[from] StateError),
}

impl From<RelayerError> for TradeError {
	fn from(err: RelayerError) -> Self {
		match err {
			RelayerError::Configuration(msg) => TradeError::Configuration(msg),
			RelayerError::Upstream {
				status,
				status_text,
			} => TradeError::Upstream {
				status,
				status_text,
			},
			RelayerError::SubmissionRejected {
				status,
				status_text,
				body,
			} => TradeError::SubmissionRejected {
				status,
				status_text,
				body,
			},
			RelayerError::LiquidityUnavailable => TradeError::LiquidityUnavailable,
			RelayerError::MalformedResponse(msg) => TradeError::MalformedResponse(msg),
			RelayerError::Network(msg) => TradeError::Network(msg),
		}
	}
}

impl From<SigningError> for TradeError {
	fn from(err: SigningError) -> Self {
		match err {
			SigningError::SigningFailure(msg) => TradeError::SigningFailure(msg),
			SigningError::MalformedSignature(err) => TradeError::MalformedSignature(err.to_string()),
		}
	}
}

impl From<BuilderError> for TradeError {
	fn from(err: BuilderError) -> Self {
		match err {
			BuilderError::Config(msg) => TradeError::Configuration(msg),
		}
	}
}
