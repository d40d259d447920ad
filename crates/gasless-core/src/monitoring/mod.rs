//! Monitoring of submitted trades.

pub mod status;

pub use status::{PollError, PollOutcome, StatusPoller};
