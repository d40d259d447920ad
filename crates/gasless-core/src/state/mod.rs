//! Trade lifecycle state machine.
//!
//! A run moves Idle -> QuoteRequested -> AuthorizationsSigned -> Submitted ->
//! Polling -> Confirmed, and may drop to Failed from any non-final state.
//! Every accepted transition is published on the event bus.

use crate::engine::event_bus::EventBus;
use gasless_types::{TradeEvent, TradeState};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
	#[error("cannot move from {from} to {to}")]
	InvalidTransition { from: TradeState, to: TradeState },
}

/// Tracks the state of a single trade run.
pub struct TradeStateMachine {
	state: TradeState,
	event_bus: EventBus,
}

impl TradeStateMachine {
	pub fn new(event_bus: EventBus) -> Self {
		Self {
			state: TradeState::Idle,
			event_bus,
		}
	}

	pub fn state(&self) -> TradeState {
		self.state
	}

	/// Moves to `to` if the lifecycle allows it.
	pub fn transition(&mut self, to: TradeState) -> Result<(), StateError> {
		let from = self.state;
		if !Self::is_valid_transition(from, to) {
			return Err(StateError::InvalidTransition { from, to });
		}

		self.state = to;
		tracing::debug!(%from, %to, "Trade state changed");
		self.event_bus
			.publish(TradeEvent::StateChanged { from, to })
			.ok();
		Ok(())
	}

	/// Marks the run as failed. No-op once the run is final.
	pub fn fail(&mut self) {
		if !self.state.is_final() {
			self.transition(TradeState::Failed).ok();
		}
	}

	fn is_valid_transition(from: TradeState, to: TradeState) -> bool {
		// Static transition table - each state maps to allowed next states
		static TRANSITIONS: LazyLock<HashMap<TradeState, HashSet<TradeState>>> =
			LazyLock::new(|| {
				use TradeState::*;
				HashMap::from([
					(Idle, HashSet::from([QuoteRequested, Failed])),
					(QuoteRequested, HashSet::from([AuthorizationsSigned, Failed])),
					(AuthorizationsSigned, HashSet::from([Submitted, Failed])),
					(Submitted, HashSet::from([Polling, Failed])),
					(Polling, HashSet::from([Confirmed, Failed])),
					(Confirmed, HashSet::new()), // terminal
					(Failed, HashSet::new()),    // terminal
				])
			});

		TRANSITIONS
			.get(&from)
			.is_some_and(|allowed| allowed.contains(&to))
	}
}
