//! 0x Gasless API client.
//!
//! For more information on the HTTP API, consult:
//! <https://0x.org/docs/api#tag/Gasless>

use crate::{RelayerError, RelayerInterface};
use async_trait::async_trait;
use gasless_config::RelayerConfig;
use gasless_types::{
	truncate_id, Quote, SecretString, SubmissionRequest, SubmissionResult, TradeRequest,
	TradeStatus,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

const API_KEY_HEADER: &str = "0x-api-key";
const API_VERSION_HEADER: &str = "0x-version";

/// Relayer implementation backed by the 0x Gasless HTTP API.
#[derive(Debug)]
pub struct ZeroExRelayer {
	client: Client,
	base_url: Url,
	api_key: SecretString,
	api_version: String,
	chain_id: u64,
}

impl ZeroExRelayer {
	/// Creates a client from configuration.
	///
	/// Fails before any request is made when the API key is missing.
	pub fn new(config: &RelayerConfig) -> Result<Self, RelayerError> {
		let client = Client::builder()
			.timeout(config.request_timeout())
			.build()
			.map_err(|e| RelayerError::Configuration(format!("HTTP client: {}", e)))?;
		Self::with_client(config, client)
	}

	/// Creates a client from configuration using a caller-provided HTTP client.
	pub fn with_client(config: &RelayerConfig, client: Client) -> Result<Self, RelayerError> {
		if config.api_key.is_blank() {
			return Err(RelayerError::Configuration(
				"relayer API key is required".into(),
			));
		}
		let base_url = Url::parse(&config.base_url).map_err(|e| {
			RelayerError::Configuration(format!("Invalid base URL '{}': {}", config.base_url, e))
		})?;

		Ok(Self {
			client,
			base_url,
			api_key: config.api_key.clone(),
			api_version: config.api_version.clone(),
			chain_id: config.chain_id,
		})
	}

	/// Appends `segments` to the base URL, keeping any path prefix it has.
	fn endpoint(&self, segments: &[&str]) -> Result<Url, RelayerError> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| {
				RelayerError::Configuration(format!("Base URL '{}' cannot have a path", self.base_url))
			})?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	fn quote_url(&self, request: &TradeRequest) -> Result<Url, RelayerError> {
		let mut url = self.endpoint(&["gasless", "quote"])?;
		url.query_pairs_mut()
			.append_pair("chainId", &self.chain_id.to_string())
			.append_pair("sellToken", &format!("{:#x}", request.sell_token))
			.append_pair("buyToken", &format!("{:#x}", request.buy_token))
			.append_pair("sellAmount", &request.sell_amount.to_string())
			.append_pair("taker", &format!("{:#x}", request.taker));
		Ok(url)
	}

	fn status_url(&self, trade_hash: &str) -> Result<Url, RelayerError> {
		let mut url = self.endpoint(&["gasless", "status", trade_hash])?;
		url.query_pairs_mut()
			.append_pair("chainId", &self.chain_id.to_string());
		Ok(url)
	}

	/// Attaches the authentication and versioning headers.
	fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
		self.api_key.with_exposed(|key| {
			builder
				.header(API_KEY_HEADER, key)
				.header(API_VERSION_HEADER, &self.api_version)
		})
	}

	async fn send(&self, builder: RequestBuilder) -> Result<Response, RelayerError> {
		self.authorized(builder)
			.send()
			.await
			.map_err(|e| RelayerError::Network(e.to_string()))
	}
}

fn status_text(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or_default().to_string()
}

/// Reads an error body, falling back to the raw text when it is not JSON.
async fn error_body(response: Response) -> Value {
	match response.text().await {
		Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
		Err(e) => Value::String(format!("<unreadable body: {}>", e)),
	}
}

async fn json_body(response: Response, what: &str) -> Result<Value, RelayerError> {
	response
		.json()
		.await
		.map_err(|e| RelayerError::MalformedResponse(format!("{} body: {}", what, e)))
}

#[async_trait]
impl RelayerInterface for ZeroExRelayer {
	fn chain_id(&self) -> u64 {
		self.chain_id
	}

	async fn get_quote(&self, request: &TradeRequest) -> Result<Quote, RelayerError> {
		let url = self.quote_url(request)?;
		let response = self.send(self.client.get(url)).await?;

		let status = response.status();
		if !status.is_success() {
			tracing::warn!(status = status.as_u16(), "Quote request failed");
			return Err(RelayerError::Upstream {
				status: status.as_u16(),
				status_text: status_text(status),
			});
		}

		let body = json_body(response, "quote").await?;
		if body.get("liquidityAvailable") == Some(&Value::Bool(false)) {
			return Err(RelayerError::LiquidityUnavailable);
		}
		serde_json::from_value(body)
			.map_err(|e| RelayerError::MalformedResponse(format!("quote: {}", e)))
	}

	async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResult, RelayerError> {
		let url = self.endpoint(&["gasless", "submit"])?;
		let response = self.send(self.client.post(url).json(request)).await?;

		let status = response.status();
		if !status.is_success() {
			let body = error_body(response).await;
			tracing::error!(
				status = status.as_u16(),
				body = %body,
				"Submission rejected"
			);
			return Err(RelayerError::SubmissionRejected {
				status: status.as_u16(),
				status_text: status_text(status),
				body,
			});
		}

		tracing::info!(status = status.as_u16(), "Submission accepted");
		let body = json_body(response, "submission").await?;
		serde_json::from_value(body)
			.map_err(|e| RelayerError::MalformedResponse(format!("submission: {}", e)))
	}

	async fn get_status(&self, trade_hash: &str) -> Result<TradeStatus, RelayerError> {
		let url = self.status_url(trade_hash)?;
		let response = self.send(self.client.get(url)).await?;

		let status = response.status();
		if !status.is_success() {
			tracing::debug!(
				trade_hash = %truncate_id(trade_hash),
				status = status.as_u16(),
				"Status request failed"
			);
			return Err(RelayerError::Upstream {
				status: status.as_u16(),
				status_text: status_text(status),
			});
		}

		let body = json_body(response, "status").await?;
		serde_json::from_value(body)
			.map_err(|e| RelayerError::MalformedResponse(format!("status: {}", e)))
	}
}

/// Factory function to create the 0x relayer from configuration.
pub fn create_relayer(config: &RelayerConfig) -> Result<Box<dyn RelayerInterface>, RelayerError> {
	Ok(Box::new(ZeroExRelayer::new(config)?))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::RelayerService;
	use gasless_config::Config;
	use gasless_types::{
		AuthorizationPayload, Signature, SignatureType, SignedAuthorization, TradeStatusKind,
		U256,
	};
	use httpmock::prelude::*;
	use serde_json::json;
	use std::str::FromStr;

	const SELL_TOKEN: &str = "0x2416092f143378750bb29b79ed961ab195cceea5";
	const BUY_TOKEN: &str = "0xdfc7c877a950e49d2610114102175a06c2e3167a";
	const TAKER: &str = "0x8a6bfcae15e729fd1440574108437dea281a9b3e";

	fn relayer(server: &MockServer) -> ZeroExRelayer {
		ZeroExRelayer::new(&Config::for_testing(&server.base_url()).relayer).unwrap()
	}

	fn trade_request() -> TradeRequest {
		TradeRequest {
			sell_token: SELL_TOKEN.parse().unwrap(),
			buy_token: BUY_TOKEN.parse().unwrap(),
			sell_amount: U256::from_str("846925725410518").unwrap(),
			taker: TAKER.parse().unwrap(),
		}
	}

	fn eip712(primary_type: &str) -> Value {
		json!({
			"types": { "EIP712Domain": [] },
			"domain": { "name": "Permit2", "chainId": 34443 },
			"primaryType": primary_type,
			"message": {}
		})
	}

	fn quote_body() -> Value {
		json!({
			"liquidityAvailable": true,
			"buyAmount": "1000",
			"approval": { "type": "permit", "hash": "0x01", "eip712": eip712("Permit") },
			"trade": { "type": "settler_metatransaction", "hash": "0x02", "eip712": eip712("MetaTransaction") }
		})
	}

	fn signed(primary_type: &str) -> SignedAuthorization {
		let payload: AuthorizationPayload =
			serde_json::from_value(json!({ "type": "permit", "eip712": eip712(primary_type) }))
				.unwrap();
		SignedAuthorization::new(
			payload,
			Signature {
				v: 28,
				r: Default::default(),
				s: Default::default(),
				signature_type: SignatureType::EIP712,
			},
		)
	}

	#[test]
	fn test_missing_api_key_fails_fast() {
		let mut config = Config::for_testing("http://127.0.0.1:1").relayer;
		config.api_key = SecretString::from("");

		let result = ZeroExRelayer::new(&config);
		assert!(matches!(result, Err(RelayerError::Configuration(_))));
	}

	#[tokio::test]
	async fn test_quote_sends_unmodified_parameters() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/gasless/quote")
					.query_param("chainId", "34443")
					.query_param("sellToken", SELL_TOKEN)
					.query_param("buyToken", BUY_TOKEN)
					.query_param("sellAmount", "846925725410518")
					.query_param("taker", TAKER)
					.header("0x-api-key", "test-api-key")
					.header("0x-version", "v2");
				then.status(200).json_body(quote_body());
			})
			.await;

		let quote = relayer(&server).get_quote(&trade_request()).await.unwrap();

		mock.assert_async().await;
		assert_eq!(quote.approval.eip712.primary_type, "Permit");
		assert_eq!(quote.trade.kind(), Some("settler_metatransaction"));
		assert_eq!(quote.buy_amount(), Some("1000"));
	}

	#[tokio::test]
	async fn test_quote_non_success_is_upstream_error() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/gasless/quote");
				then.status(400).json_body(json!({ "name": "INPUT_INVALID" }));
			})
			.await;

		let err = relayer(&server)
			.get_quote(&trade_request())
			.await
			.unwrap_err();

		assert_eq!(mock.hits_async().await, 1);
		match err {
			RelayerError::Upstream {
				status,
				status_text,
			} => {
				assert_eq!(status, 400);
				assert_eq!(status_text, "Bad Request");
			},
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_quote_without_liquidity() {
		let server = MockServer::start_async().await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/gasless/quote");
				then.status(200)
					.json_body(json!({ "liquidityAvailable": false, "zid": "0x1" }));
			})
			.await;

		let err = relayer(&server)
			.get_quote(&trade_request())
			.await
			.unwrap_err();
		assert!(matches!(err, RelayerError::LiquidityUnavailable));
	}

	#[tokio::test]
	async fn test_quote_missing_authorization_is_malformed() {
		let server = MockServer::start_async().await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/gasless/quote");
				then.status(200)
					.json_body(json!({ "trade": { "eip712": eip712("MetaTransaction") } }));
			})
			.await;

		let err = relayer(&server)
			.get_quote(&trade_request())
			.await
			.unwrap_err();
		assert!(matches!(err, RelayerError::MalformedResponse(_)));
	}

	#[tokio::test]
	async fn test_submit_posts_chain_and_authorizations() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(POST)
					.path("/gasless/submit")
					.header("0x-api-key", "test-api-key")
					.header("content-type", "application/json")
					.json_body_partial(r#"{ "chainId": 34443, "approval": { "signature": { "v": 28, "signatureType": 2 } } }"#);
				then.status(201)
					.json_body(json!({ "tradeHash": "0xabc123", "type": "settler_metatransaction" }));
			})
			.await;

		let service = RelayerService::new(Box::new(relayer(&server)));
		let result = service
			.submit(signed("Permit"), signed("MetaTransaction"))
			.await
			.unwrap();

		mock.assert_async().await;
		assert_eq!(result.trade_hash, "0xabc123");
	}

	#[tokio::test]
	async fn test_submit_rejection_captures_body() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(POST).path("/gasless/submit");
				then.status(500)
					.json_body(json!({ "reason": "insufficient_liquidity" }));
			})
			.await;

		let service = RelayerService::new(Box::new(relayer(&server)));
		let err = service
			.submit(signed("Permit"), signed("MetaTransaction"))
			.await
			.unwrap_err();

		// Rejections are never retried
		assert_eq!(mock.hits_async().await, 1);
		match err {
			RelayerError::SubmissionRejected {
				status,
				status_text,
				body,
			} => {
				assert_eq!(status, 500);
				assert_eq!(status_text, "Internal Server Error");
				assert_eq!(body, json!({ "reason": "insufficient_liquidity" }));
			},
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_submit_rejection_with_text_body() {
		let server = MockServer::start_async().await;
		server
			.mock_async(|when, then| {
				when.method(POST).path("/gasless/submit");
				then.status(502).body("bad gateway");
			})
			.await;

		let err = relayer(&server)
			.submit(&SubmissionRequest {
				chain_id: 34443,
				approval: signed("Permit"),
				trade: signed("MetaTransaction"),
			})
			.await
			.unwrap_err();

		assert!(matches!(
			err,
			RelayerError::SubmissionRejected { body: Value::String(ref text), .. } if text == "bad gateway"
		));
	}

	#[tokio::test]
	async fn test_empty_trade_hash_is_malformed() {
		let server = MockServer::start_async().await;
		server
			.mock_async(|when, then| {
				when.method(POST).path("/gasless/submit");
				then.status(200).json_body(json!({ "tradeHash": "" }));
			})
			.await;

		let service = RelayerService::new(Box::new(relayer(&server)));
		let err = service
			.submit(signed("Permit"), signed("MetaTransaction"))
			.await
			.unwrap_err();
		assert!(matches!(err, RelayerError::MalformedResponse(_)));
	}

	#[tokio::test]
	async fn test_status_is_keyed_by_trade_hash() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET)
					.path("/gasless/status/0xabc123")
					.query_param("chainId", "34443")
					.header("0x-version", "v2");
				then.status(200).json_body(json!({
					"status": "confirmed",
					"transactions": [{ "hash": "0xdef", "timestamp": 1 }]
				}));
			})
			.await;

		let status = relayer(&server).get_status("0xabc123").await.unwrap();

		mock.assert_async().await;
		assert_eq!(status.status, TradeStatusKind::Confirmed);
		assert!(status.fields.contains_key("transactions"));
	}

	#[tokio::test]
	async fn test_base_url_path_prefix_is_kept() {
		let server = MockServer::start_async().await;
		let quote = server
			.mock_async(|when, then| {
				when.method(GET).path("/zeroex/gasless/quote");
				then.status(200).json_body(quote_body());
			})
			.await;
		let status = server
			.mock_async(|when, then| {
				when.method(GET).path("/zeroex/gasless/status/0xabc123");
				then.status(200).json_body(json!({ "status": "pending" }));
			})
			.await;

		for base_url in [server.url("/zeroex"), server.url("/zeroex/")] {
			let relayer = ZeroExRelayer::new(&Config::for_testing(&base_url).relayer).unwrap();
			relayer.get_quote(&trade_request()).await.unwrap();
			relayer.get_status("0xabc123").await.unwrap();
		}

		assert_eq!(quote.hits_async().await, 2);
		assert_eq!(status.hits_async().await, 2);
	}

	#[tokio::test]
	async fn test_status_error_response() {
		let server = MockServer::start_async().await;
		server
			.mock_async(|when, then| {
				when.method(GET).path("/gasless/status/0xabc123");
				then.status(503);
			})
			.await;

		let err = relayer(&server).get_status("0xabc123").await.unwrap_err();
		assert!(matches!(err, RelayerError::Upstream { status: 503, .. }));
	}
}
