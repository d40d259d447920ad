//! The caller's trade request.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that make a trade request unusable before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TradeRequestError {
	#[error("Sell amount must be greater than zero")]
	ZeroSellAmount,
	#[error("Sell and buy token are the same: {0:#x}")]
	SameToken(Address),
}

/// Parameters of a single gasless swap.
///
/// Immutable input to the pipeline. `sell_amount` is expressed in base units
/// of the sell token and travels as a decimal string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
	/// Token the taker sells.
	pub sell_token: Address,
	/// Token the taker buys.
	pub buy_token: Address,
	/// Amount of `sell_token` to sell, in base units.
	#[serde(with = "decimal_u256")]
	pub sell_amount: U256,
	/// Address on whose behalf the trade executes.
	pub taker: Address,
}

impl TradeRequest {
	/// Checks the request for values the relayer would reject anyway.
	pub fn validate(&self) -> Result<(), TradeRequestError> {
		if self.sell_amount.is_zero() {
			return Err(TradeRequestError::ZeroSellAmount);
		}
		if self.sell_token == self.buy_token {
			return Err(TradeRequestError::SameToken(self.sell_token));
		}
		Ok(())
	}
}

/// Serializes a `U256` as a base-10 string, the format used by relayer query
/// parameters and bodies.
pub mod decimal_u256 {
	use alloy_primitives::U256;
	use serde::{de::Error, Deserialize, Deserializer, Serializer};

	pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		U256::from_str_radix(&s, 10).map_err(D::Error::custom)
	}
}
