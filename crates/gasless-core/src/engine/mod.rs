//! Trade engine that runs one gasless swap end to end.
//!
//! The stages run strictly in sequence: quote, sign, submit, poll. A failing
//! stage ends the run; nothing is rolled back and only status polling is
//! retried.

pub mod event_bus;

use crate::monitoring::StatusPoller;
use crate::signing::AuthorizationSigner;
use crate::state::TradeStateMachine;
use crate::TradeError;
use event_bus::EventBus;
use gasless_account::AccountService;
use gasless_config::PollingConfig;
use gasless_relayer::RelayerService;
use gasless_types::{truncate_id, Address, TradeEvent, TradeReceipt, TradeRequest, TradeState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Orchestrates the quote, sign, submit and poll stages of a trade.
pub struct TradeEngine {
	/// Account service for address and signing operations.
	account: Arc<AccountService>,
	/// Relayer service for quote, submission and status calls.
	relayer: Arc<RelayerService>,
	signer: AuthorizationSigner,
	poller: StatusPoller,
	/// Event bus for pipeline observers.
	event_bus: EventBus,
}

impl TradeEngine {
	/// Creates a new trade engine with the given services.
	pub fn new(
		polling: PollingConfig,
		account: Arc<AccountService>,
		relayer: Arc<RelayerService>,
		event_bus: EventBus,
	) -> Self {
		let signer = AuthorizationSigner::new(account.clone());
		let poller = StatusPoller::new(relayer.clone(), polling, event_bus.clone());

		Self {
			account,
			relayer,
			signer,
			poller,
			event_bus,
		}
	}

	/// Bus carrying this engine's pipeline events.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Address of the signing account, the default taker.
	pub async fn account_address(&self) -> Result<Address, TradeError> {
		self.account
			.get_address()
			.await
			.map_err(|e| TradeError::Configuration(e.to_string()))
	}

	/// Runs the trade until it is confirmed or a stage fails.
	///
	/// Returns once the relayer reports the trade as confirmed. Cancelling
	/// `cancel` only interrupts the wait for confirmation; the trade may
	/// already be submitted by then.
	#[instrument(skip_all, fields(
		sell_token = %request.sell_token,
		buy_token = %request.buy_token,
		sell_amount = %request.sell_amount
	))]
	pub async fn execute(
		&self,
		request: &TradeRequest,
		cancel: &CancellationToken,
	) -> Result<TradeReceipt, TradeError> {
		let mut machine = TradeStateMachine::new(self.event_bus.clone());

		match self.run(request, cancel, &mut machine).await {
			Ok(receipt) => Ok(receipt),
			Err(e) => {
				tracing::error!(state = %machine.state(), error = %e, "Trade failed");
				machine.fail();
				Err(e)
			},
		}
	}

	async fn run(
		&self,
		request: &TradeRequest,
		cancel: &CancellationToken,
		machine: &mut TradeStateMachine,
	) -> Result<TradeReceipt, TradeError> {
		request.validate()?;

		let quote = self.relayer.quote(request).await?;
		machine.transition(TradeState::QuoteRequested)?;
		tracing::info!(buy_amount = ?quote.buy_amount(), "Quote received");

		let signed = self.signer.sign(&quote).await?;
		machine.transition(TradeState::AuthorizationsSigned)?;

		let submission = self.relayer.submit(signed.approval, signed.trade).await?;
		let trade_hash = submission.trade_hash;
		machine.transition(TradeState::Submitted)?;
		self.event_bus
			.publish(TradeEvent::Submitted {
				trade_hash: trade_hash.clone(),
			})
			.ok();

		machine.transition(TradeState::Polling)?;
		let outcome = self.poller.poll_until_terminal(&trade_hash, cancel).await?;
		machine.transition(TradeState::Confirmed)?;

		tracing::info!(
			trade_hash = %truncate_id(&trade_hash),
			polls = outcome.polls,
			"Trade complete"
		);
		Ok(TradeReceipt {
			trade_hash,
			status: outcome.status,
			polls: outcome.polls,
		})
	}
}
