//! Signing of a quote's authorization payloads.
//!
//! Each payload's typed data goes through the account's signing capability,
//! the raw signature is split into the relayer's wire format, and the result
//! is attached to a copy of the payload.

use gasless_account::AccountService;
use gasless_types::{
	encode_signature, AuthorizationPayload, Quote, SignatureError, SignedAuthorization,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SigningError {
	/// The signing capability refused or failed.
	#[error("Signing failed: {0}")]
	SigningFailure(String),
	/// The signing capability returned bytes that are not a valid signature.
	#[error(transparent)]
	MalformedSignature(#[from] SignatureError),
}

/// The two authorizations a gasless trade needs.
#[derive(Debug, Clone)]
pub struct SignedAuthorizations {
	pub approval: SignedAuthorization,
	pub trade: SignedAuthorization,
}

pub struct AuthorizationSigner {
	account: Arc<AccountService>,
}

impl AuthorizationSigner {
	pub fn new(account: Arc<AccountService>) -> Self {
		Self { account }
	}

	/// Signs the approval, then the trade.
	///
	/// Stops at the first failure; nothing is submitted with a partial set.
	#[instrument(skip_all)]
	pub async fn sign(&self, quote: &Quote) -> Result<SignedAuthorizations, SigningError> {
		let approval = self.sign_payload(&quote.approval).await?;
		let trade = self.sign_payload(&quote.trade).await?;
		tracing::info!("Signed approval and trade");
		Ok(SignedAuthorizations { approval, trade })
	}

	async fn sign_payload(
		&self,
		payload: &AuthorizationPayload,
	) -> Result<SignedAuthorization, SigningError> {
		let raw = self
			.account
			.sign_typed_data(&payload.eip712)
			.await
			.map_err(|e| SigningError::SigningFailure(e.to_string()))?;
		let signature = encode_signature(&raw)?;
		Ok(SignedAuthorization::new(payload.clone(), signature))
	}
}
