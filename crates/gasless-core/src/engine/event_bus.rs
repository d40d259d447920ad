//! In-process event bus for trade pipeline events.
//!
//! A thin wrapper over a tokio broadcast channel. Publishing never blocks the
//! pipeline; slow subscribers lag and lose the oldest events.

use gasless_types::TradeEvent;
use tokio::sync::broadcast;

/// Default number of buffered events per subscriber.
pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<TradeEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Subscribes to events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<TradeEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Fails only when nobody is subscribed; callers usually ignore that.
	pub fn publish(
		&self,
		event: TradeEvent,
	) -> Result<(), broadcast::error::SendError<TradeEvent>> {
		self.sender.send(event).map(|_| ())
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}
