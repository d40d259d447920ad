//! Account management module for the gasless trading system.
//!
//! Provides the signing capability the pipeline depends on: given a typed-data
//! descriptor from a relayer quote, produce the raw 65-byte signature of the
//! taker's account. The pipeline treats the signing algorithm as a black box
//! behind [`AccountInterface`], so tests can substitute a deterministic signer.

use async_trait::async_trait;
use gasless_types::{Address, TypedDataDescriptor};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when the typed data cannot be interpreted.
	#[error("Invalid typed data: {0}")]
	InvalidTypedData(String),
}

/// Trait defining the interface for account implementations.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	/// Retrieves the address associated with this account.
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs EIP-712 typed data and returns the raw `r || s || v` signature.
	///
	/// Signing the same descriptor twice yields the same bytes.
	async fn sign_typed_data(
		&self,
		typed_data: &TypedDataDescriptor,
	) -> Result<Vec<u8>, AccountError>;
}

/// Service that manages account operations.
///
/// Wraps the configured account implementation.
pub struct AccountService {
	implementation: Box<dyn AccountInterface>,
}

impl AccountService {
	/// Creates a new AccountService with the specified implementation.
	pub fn new(implementation: Box<dyn AccountInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address associated with the managed account.
	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.implementation.address().await
	}

	/// Signs typed data with the managed account.
	pub async fn sign_typed_data(
		&self,
		typed_data: &TypedDataDescriptor,
	) -> Result<Vec<u8>, AccountError> {
		tracing::debug!(primary_type = %typed_data.primary_type, "Signing typed data");
		self.implementation.sign_typed_data(typed_data).await
	}
}
