//! Fakes shared by the pipeline tests.

use async_trait::async_trait;
use gasless_account::{AccountError, AccountInterface};
use gasless_relayer::{RelayerError, RelayerInterface};
use gasless_types::{
	Address, Quote, SubmissionRequest, SubmissionResult, TradeRequest, TradeStatus,
	TradeStatusKind, TypedDataDescriptor, U256,
};
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SELL_TOKEN: &str = "0x2416092f143378750bb29b79ed961ab195cceea5";
pub const BUY_TOKEN: &str = "0xdfc7c877a950e49d2610114102175a06c2e3167a";
pub const TAKER: &str = "0x8a6bfcae15e729fd1440574108437dea281a9b3e";

pub fn trade_request() -> TradeRequest {
	TradeRequest {
		sell_token: SELL_TOKEN.parse().unwrap(),
		buy_token: BUY_TOKEN.parse().unwrap(),
		sell_amount: U256::from_str("846925725410518").unwrap(),
		taker: TAKER.parse().unwrap(),
	}
}

/// Typed data that a real local signer can hash.
pub fn eip712(primary_type: &str) -> Value {
	json!({
		"types": {
			"EIP712Domain": [
				{ "name": "name", "type": "string" },
				{ "name": "chainId", "type": "uint256" }
			],
			primary_type: [
				{ "name": "owner", "type": "address" },
				{ "name": "nonce", "type": "uint256" }
			]
		},
		"domain": { "name": "Permit2", "chainId": 34443 },
		"primaryType": primary_type,
		"message": { "owner": TAKER, "nonce": "1" }
	})
}

pub fn quote_body() -> Value {
	json!({
		"liquidityAvailable": true,
		"buyAmount": "1000",
		"approval": { "type": "permit", "hash": "0x01", "eip712": eip712("Permit") },
		"trade": { "type": "settler_metatransaction", "hash": "0x02", "eip712": eip712("MetaTransaction") }
	})
}

pub fn quote() -> Quote {
	serde_json::from_value(quote_body()).unwrap()
}

fn status(kind: &str) -> TradeStatus {
	serde_json::from_value(json!({ "status": kind })).unwrap()
}

/// Signer returning a fixed signature, or a fixed error.
pub struct FakeAccount {
	pub signature: Result<Vec<u8>, String>,
	pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeAccount {
	pub fn with_recovery_byte(v: u8) -> Self {
		let mut signature = vec![0x11; 32];
		signature.extend([0x22; 32]);
		signature.push(v);
		Self {
			signature: Ok(signature),
			calls: Arc::default(),
		}
	}

	pub fn with_signature(signature: Vec<u8>) -> Self {
		Self {
			signature: Ok(signature),
			calls: Arc::default(),
		}
	}

	pub fn failing(message: &str) -> Self {
		Self {
			signature: Err(message.to_string()),
			calls: Arc::default(),
		}
	}
}

#[async_trait]
impl AccountInterface for FakeAccount {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(TAKER.parse().unwrap())
	}

	async fn sign_typed_data(
		&self,
		typed_data: &TypedDataDescriptor,
	) -> Result<Vec<u8>, AccountError> {
		self.calls.lock().unwrap().push(typed_data.primary_type.clone());
		self.signature.clone().map_err(AccountError::SigningFailed)
	}
}

/// Call counters and captured submissions of a [`FakeRelayer`].
#[derive(Default)]
pub struct RelayerCalls {
	pub quotes: AtomicUsize,
	pub submissions: Mutex<Vec<SubmissionRequest>>,
	pub status_polls: AtomicUsize,
}

impl RelayerCalls {
	pub fn quotes(&self) -> usize {
		self.quotes.load(Ordering::SeqCst)
	}

	pub fn submissions(&self) -> usize {
		self.submissions.lock().unwrap().len()
	}

	pub fn status_polls(&self) -> usize {
		self.status_polls.load(Ordering::SeqCst)
	}
}

/// Relayer replaying scripted responses.
///
/// Once the status script is exhausted every further poll reports `pending`.
pub struct FakeRelayer {
	pub quote: Option<Quote>,
	pub trade_hash: String,
	pub statuses: Mutex<VecDeque<Result<TradeStatus, RelayerError>>>,
	pub calls: Arc<RelayerCalls>,
}

impl FakeRelayer {
	pub fn new(statuses: &[&str]) -> Self {
		Self {
			quote: Some(quote()),
			trade_hash: "0xabc123".into(),
			statuses: Mutex::new(statuses.iter().map(|kind| Ok(status(kind))).collect()),
			calls: Arc::default(),
		}
	}

	pub fn with_status_script(statuses: Vec<Result<TradeStatus, RelayerError>>) -> Self {
		Self {
			statuses: Mutex::new(statuses.into()),
			..Self::new(&[])
		}
	}

	pub fn status(kind: &str) -> Result<TradeStatus, RelayerError> {
		Ok(status(kind))
	}

	pub fn unavailable() -> Result<TradeStatus, RelayerError> {
		Err(RelayerError::Upstream {
			status: 503,
			status_text: "Service Unavailable".into(),
		})
	}
}

#[async_trait]
impl RelayerInterface for FakeRelayer {
	fn chain_id(&self) -> u64 {
		34443
	}

	async fn get_quote(&self, _request: &TradeRequest) -> Result<Quote, RelayerError> {
		self.calls.quotes.fetch_add(1, Ordering::SeqCst);
		self.quote.clone().ok_or(RelayerError::Upstream {
			status: 400,
			status_text: "Bad Request".into(),
		})
	}

	async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, RelayerError> {
		self.calls.submissions.lock().unwrap().push(request.clone());
		Ok(SubmissionResult {
			trade_hash: self.trade_hash.clone(),
			fields: Map::new(),
		})
	}

	async fn get_status(&self, _trade_hash: &str) -> Result<TradeStatus, RelayerError> {
		self.calls.status_polls.fetch_add(1, Ordering::SeqCst);
		self.statuses
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| Ok(status(&TradeStatusKind::Pending.to_string())))
	}
}
