//! Status polling for submitted trades.
//!
//! Polls the relayer's status endpoint until the trade is confirmed. Failed
//! polls are logged and retried with exponential backoff; the wait is bounded
//! by a deadline, an optional attempt cap and a cancellation token.

use crate::engine::event_bus::EventBus;
use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use gasless_config::PollingConfig;
use gasless_relayer::RelayerService;
use gasless_types::{truncate_id, TradeEvent, TradeStatus, TradeStatusKind};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
	#[error("cancelled after {polls} polls")]
	Cancelled { polls: u32 },
	#[error("not confirmed within {timeout:?} ({polls} polls)")]
	Timeout { timeout: Duration, polls: u32 },
	#[error("not confirmed after {polls} polls")]
	AttemptsExhausted { polls: u32 },
}

/// A confirmed status and the number of polls it took.
#[derive(Debug, Clone)]
pub struct PollOutcome {
	pub status: TradeStatus,
	pub polls: u32,
}

pub struct StatusPoller {
	relayer: Arc<RelayerService>,
	config: PollingConfig,
	event_bus: EventBus,
}

impl StatusPoller {
	pub fn new(relayer: Arc<RelayerService>, config: PollingConfig, event_bus: EventBus) -> Self {
		Self {
			relayer,
			config,
			event_bus,
		}
	}

	fn error_backoff(&self) -> ExponentialBackoff {
		ExponentialBackoffBuilder::new()
			.with_initial_interval(self.config.interval())
			.with_max_interval(self.config.max_interval())
			.with_multiplier(2.0)
			.with_randomization_factor(0.0)
			.with_max_elapsed_time(None)
			.build()
	}

	/// Polls until the relayer reports the trade as confirmed.
	///
	/// The first request goes out one interval after the call. At least one
	/// request is issued even when the deadline is shorter than the interval.
	#[instrument(skip_all, fields(trade_hash = %truncate_id(trade_hash)))]
	pub async fn poll_until_terminal(
		&self,
		trade_hash: &str,
		cancel: &CancellationToken,
	) -> Result<PollOutcome, PollError> {
		let timeout = self.config.timeout();
		let deadline = Instant::now() + timeout;
		let mut backoff = self.error_backoff();
		let mut delay = self.config.interval();
		let mut polls: u32 = 0;

		loop {
			let wake_at = (Instant::now() + delay).min(deadline);
			tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(PollError::Cancelled { polls }),
				_ = tokio::time::sleep_until(wake_at) => {}
			}

			if polls > 0 && Instant::now() >= deadline {
				tracing::warn!(polls, "Status polling timed out");
				return Err(PollError::Timeout { timeout, polls });
			}

			polls += 1;
			let result = tokio::select! {
				biased;
				_ = cancel.cancelled() => return Err(PollError::Cancelled { polls }),
				result = self.relayer.status(trade_hash) => result,
			};

			match result {
				Ok(status) => {
					self.observe(trade_hash, polls, Some(status.status));
					if status.is_terminal() {
						tracing::info!(attempt = polls, status = %status.status, "Trade confirmed");
						return Ok(PollOutcome { status, polls });
					}
					if status.status == TradeStatusKind::Failed {
						tracing::warn!(attempt = polls, "Relayer reports failure, waiting for confirmation");
					} else {
						tracing::debug!(attempt = polls, status = %status.status, "Trade not yet confirmed");
					}
					backoff.reset();
					delay = self.config.interval();
				},
				Err(e) => {
					self.observe(trade_hash, polls, None);
					delay = backoff
						.next_backoff()
						.unwrap_or_else(|| self.config.max_interval());
					tracing::warn!(
						attempt = polls,
						error = %e,
						retry_in_ms = delay.as_millis() as u64,
						"Status poll failed"
					);
				},
			}

			if self.config.max_attempts.is_some_and(|max| polls >= max) {
				tracing::warn!(polls, "Status polling gave up");
				return Err(PollError::AttemptsExhausted { polls });
			}
		}
	}

	fn observe(&self, trade_hash: &str, attempt: u32, status: Option<TradeStatusKind>) {
		self.event_bus
			.publish(TradeEvent::StatusObserved {
				trade_hash: trade_hash.to_string(),
				attempt,
				status,
			})
			.ok();
	}
}
