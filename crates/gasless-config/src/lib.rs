//! Configuration module for the gasless trading system.
//!
//! Configuration is read once from a TOML file, with `${VAR}` and
//! `${VAR:-default}` placeholders resolved from the process environment, and
//! validated into an immutable [`Config`] before any network call is made.
//! Components receive the sections they need explicitly.

use gasless_types::SecretString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Chain identifier of the Mode network.
pub const MODE_CHAIN_ID: u64 = 34443;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, not the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Signing account.
	pub account: AccountConfig,
	/// Relayer API access.
	pub relayer: RelayerConfig,
	/// Status polling behaviour.
	#[serde(default)]
	pub polling: PollingConfig,
}

/// Signing account configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Hex-encoded secp256k1 private key, with or without `0x`.
	pub private_key: SecretString,
}

/// Relayer API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayerConfig {
	/// Base URL of the relayer API.
	#[serde(default = "default_base_url")]
	pub base_url: String,
	/// Value of the `0x-api-key` header.
	pub api_key: SecretString,
	/// Value of the `0x-version` header.
	#[serde(default = "default_api_version")]
	pub api_version: String,
	/// Chain the trades execute on.
	#[serde(default = "default_chain_id")]
	pub chain_id: u64,
	/// Per-request timeout in seconds.
	#[serde(default = "default_request_timeout")]
	pub request_timeout_seconds: u64,
}

impl RelayerConfig {
	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_seconds)
	}
}

fn default_base_url() -> String {
	"https://api.0x.org".to_string()
}

fn default_api_version() -> String {
	"v2".to_string()
}

fn default_chain_id() -> u64 {
	MODE_CHAIN_ID
}

fn default_request_timeout() -> u64 {
	30
}

/// Status polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
	/// Delay between status requests while the relayer answers successfully.
	#[serde(default = "default_interval_ms")]
	pub interval_ms: u64,
	/// Upper bound of the delay after consecutive failed status requests.
	#[serde(default = "default_max_interval_ms")]
	pub max_interval_ms: u64,
	/// Overall deadline for the trade to be confirmed.
	#[serde(default = "default_poll_timeout")]
	pub timeout_seconds: u64,
	/// Optional cap on the number of status requests.
	#[serde(default)]
	pub max_attempts: Option<u32>,
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			interval_ms: default_interval_ms(),
			max_interval_ms: default_max_interval_ms(),
			timeout_seconds: default_poll_timeout(),
			max_attempts: None,
		}
	}
}

impl PollingConfig {
	pub fn interval(&self) -> Duration {
		Duration::from_millis(self.interval_ms)
	}

	pub fn max_interval(&self) -> Duration {
		Duration::from_millis(self.max_interval_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

fn default_interval_ms() -> u64 {
	5_000
}

fn default_max_interval_ms() -> u64 {
	60_000
}

fn default_poll_timeout() -> u64 {
	600 // 10 minutes
}

/// Replaces `${VAR}` with the value of the environment variable `VAR`, or
/// with `default` for `${VAR:-default}` when `VAR` is unset.
///
/// Input is limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut resolved = String::with_capacity(input.len());
	let mut last_end = 0;
	for cap in re.captures_iter(input) {
		let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match (std::env::var(name.as_str()), cap.get(2)) {
			(Ok(value), _) => value,
			(Err(_), Some(default)) => default.as_str().to_string(),
			(Err(_), None) => {
				return Err(ConfigError::Validation(format!(
					"Environment variable '{}' not found",
					name.as_str()
				)))
			},
		};
		resolved.push_str(&input[last_end..whole.start()]);
		resolved.push_str(&value);
		last_end = whole.end();
	}
	resolved.push_str(&input[last_end..]);

	Ok(resolved)
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}

	/// Checks that credentials are present and polling bounds are sane.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.relayer.api_key.is_blank() {
			return Err(ConfigError::Validation(
				"relayer.api_key is required".into(),
			));
		}
		if self.account.private_key.is_blank() {
			return Err(ConfigError::Validation(
				"account.private_key is required".into(),
			));
		}
		let key_is_hex = self.account.private_key.with_exposed(|key| {
			let digits = gasless_types::without_0x_prefix(key.trim());
			digits.len() == 64 && digits.chars().all(|c| c.is_ascii_hexdigit())
		});
		if !key_is_hex {
			return Err(ConfigError::Validation(
				"account.private_key must be 32 bytes of hex".into(),
			));
		}

		url::Url::parse(&self.relayer.base_url).map_err(|e| {
			ConfigError::Validation(format!(
				"Invalid relayer.base_url '{}': {}",
				self.relayer.base_url, e
			))
		})?;
		if self.relayer.api_version.is_empty() {
			return Err(ConfigError::Validation(
				"relayer.api_version cannot be empty".into(),
			));
		}
		if self.relayer.request_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"relayer.request_timeout_seconds must be greater than 0".into(),
			));
		}

		if self.polling.interval_ms == 0 {
			return Err(ConfigError::Validation(
				"polling.interval_ms must be greater than 0".into(),
			));
		}
		if self.polling.max_interval_ms < self.polling.interval_ms {
			return Err(ConfigError::Validation(
				"polling.max_interval_ms cannot be lower than polling.interval_ms".into(),
			));
		}
		if self.polling.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"polling.timeout_seconds must be greater than 0".into(),
			));
		}
		if self.polling.timeout() <= self.polling.interval() {
			return Err(ConfigError::Validation(
				"polling.timeout_seconds must exceed polling.interval_ms".into(),
			));
		}
		if self.polling.max_attempts == Some(0) {
			return Err(ConfigError::Validation(
				"polling.max_attempts must be greater than 0".into(),
			));
		}

		Ok(())
	}

	/// Builds a validated configuration pointing at `base_url`, for tests.
	#[cfg(any(test, feature = "testing"))]
	pub fn for_testing(base_url: &str) -> Self {
		Self {
			account: AccountConfig {
				private_key: SecretString::from(
					"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
				),
			},
			relayer: RelayerConfig {
				base_url: base_url.to_string(),
				api_key: SecretString::from("test-api-key"),
				api_version: default_api_version(),
				chain_id: MODE_CHAIN_ID,
				request_timeout_seconds: 5,
			},
			polling: PollingConfig {
				interval_ms: 10,
				max_interval_ms: 40,
				timeout_seconds: 5,
				max_attempts: None,
			},
		}
	}
}

/// Parses a TOML string, resolving environment placeholders and validating
/// the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
