//! Common types module for the gasless trading system.
//!
//! This module defines the data model shared by every stage of the gasless
//! trade pipeline: the caller's trade request, the relayer's quote and its
//! typed-data payloads, the wire signature format, and the submission and
//! status responses.

/// Pipeline events for observers of a trade run.
pub mod events;
/// Quote types returned by the relayer.
pub mod quote;
/// Secure string type for credentials.
pub mod secret_string;
/// Wire signature format and the codec producing it.
pub mod signature;
/// Trade status types returned while polling.
pub mod status;
/// Submission request and response types.
pub mod submission;
/// The caller's trade request.
pub mod trade;
/// Utility functions for common string conversions.
pub mod utils;

// Re-export all types for convenient access
pub use alloy_primitives::{Address, U256};
pub use events::*;
pub use quote::*;
pub use secret_string::SecretString;
pub use signature::*;
pub use status::*;
pub use submission::*;
pub use trade::*;
pub use utils::{truncate_id, with_0x_prefix, without_0x_prefix};
