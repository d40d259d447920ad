//! Builder for constructing trade engines.
//!
//! Composes a [`TradeEngine`] from a validated configuration and factory
//! functions for the account and relayer implementations. Every factory runs
//! before the engine exists, so missing credentials surface here rather than
//! mid-trade.

use crate::engine::{event_bus::EventBus, TradeEngine};
use gasless_account::{
	implementations::local::create_account, AccountError, AccountInterface, AccountService,
};
use gasless_config::{AccountConfig, Config, RelayerConfig};
use gasless_relayer::{
	implementations::zeroex::create_relayer, RelayerError, RelayerInterface, RelayerService,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Builder for constructing a TradeEngine with pluggable implementations.
pub struct TradeEngineBuilder {
	config: Config,
}

impl TradeEngineBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the engine with the local account and the 0x relayer.
	pub fn build_default(self) -> Result<TradeEngine, BuilderError> {
		self.build(create_account, create_relayer)
	}

	/// Builds the engine using the given factories.
	pub fn build<AF, RF>(
		self,
		account_factory: AF,
		relayer_factory: RF,
	) -> Result<TradeEngine, BuilderError>
	where
		AF: FnOnce(&AccountConfig) -> Result<Box<dyn AccountInterface>, AccountError>,
		RF: FnOnce(&RelayerConfig) -> Result<Box<dyn RelayerInterface>, RelayerError>,
	{
		let account = account_factory(&self.config.account).map_err(|e| {
			tracing::error!(component = "account", error = %e, "Failed to create account");
			BuilderError::Config(format!("Failed to create account: {}", e))
		})?;
		tracing::info!(component = "account", "Loaded");

		let relayer = relayer_factory(&self.config.relayer).map_err(|e| {
			tracing::error!(component = "relayer", error = %e, "Failed to create relayer");
			BuilderError::Config(format!("Failed to create relayer: {}", e))
		})?;
		tracing::info!(
			component = "relayer",
			base_url = %self.config.relayer.base_url,
			chain_id = relayer.chain_id(),
			"Loaded"
		);

		Ok(TradeEngine::new(
			self.config.polling,
			Arc::new(AccountService::new(account)),
			Arc::new(RelayerService::new(relayer)),
			EventBus::default(),
		))
	}
}
