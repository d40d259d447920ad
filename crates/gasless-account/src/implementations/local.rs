//! Local private-key account.
//!
//! Signs EIP-712 typed data with an in-memory secp256k1 key taken from the
//! configuration.

use crate::{AccountError, AccountInterface};
use alloy_dyn_abi::TypedData;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use gasless_config::AccountConfig;
use gasless_types::{with_0x_prefix, Address, SecretString, TypedDataDescriptor};

/// Account backed by a local private key.
pub struct LocalAccount {
	signer: PrivateKeySigner,
}

impl LocalAccount {
	/// Creates an account from a hex-encoded private key.
	pub fn new(private_key: &SecretString) -> Result<Self, AccountError> {
		let signer = private_key
			.with_exposed(|key| with_0x_prefix(key.trim()).parse::<PrivateKeySigner>())
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		Ok(Self { signer })
	}
}

/// Converts the relayer's descriptor into alloy's dynamic typed data.
fn to_typed_data(descriptor: &TypedDataDescriptor) -> Result<TypedData, AccountError> {
	let value = serde_json::to_value(descriptor)
		.map_err(|e| AccountError::InvalidTypedData(e.to_string()))?;
	serde_json::from_value(value).map_err(|e| AccountError::InvalidTypedData(e.to_string()))
}

#[async_trait]
impl AccountInterface for LocalAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_typed_data(
		&self,
		typed_data: &TypedDataDescriptor,
	) -> Result<Vec<u8>, AccountError> {
		let hash = to_typed_data(typed_data)?
			.eip712_signing_hash()
			.map_err(|e| AccountError::InvalidTypedData(e.to_string()))?;

		let signature = self
			.signer
			.sign_hash(&hash)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		Ok(signature.as_bytes().to_vec())
	}
}

/// Factory function to create the local account from configuration.
pub fn create_account(config: &AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError> {
	Ok(Box::new(LocalAccount::new(&config.private_key)?))
}
