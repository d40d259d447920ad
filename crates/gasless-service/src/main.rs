//! Main entry point for the gasless trade service.
//!
//! Runs a single gasless swap: loads configuration, builds the trade engine,
//! and waits until the relayer confirms the trade. Ctrl-C stops the wait.

use clap::Parser;
use gasless_config::Config;
use gasless_core::{EventBus, TradeEngineBuilder};
use gasless_types::{truncate_id, Address, TradeEvent, TradeRequest, U256};
use std::path::PathBuf;
use tokio::{sync::broadcast::error::RecvError, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Command-line arguments for the gasless trade service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/gasless.toml")]
	config: PathBuf,

	/// Token to sell
	#[arg(long)]
	sell_token: Address,

	/// Token to buy
	#[arg(long)]
	buy_token: Address,

	/// Amount to sell, in base units of the sell token
	#[arg(long)]
	sell_amount: U256,

	/// Trade on behalf of this address (defaults to the configured account)
	#[arg(long)]
	taker: Option<Address>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	if let Ok(path) = dotenvy::dotenv() {
		tracing::debug!(path = %path.display(), "Loaded environment file");
	}

	let config = Config::from_file(&args.config).await?;
	tracing::info!(
		config = %args.config.display(),
		chain_id = config.relayer.chain_id,
		"Loaded configuration"
	);

	let engine = TradeEngineBuilder::new(config).build_default()?;
	let taker = match args.taker {
		Some(taker) => taker,
		None => engine.account_address().await?,
	};
	let request = TradeRequest {
		sell_token: args.sell_token,
		buy_token: args.buy_token,
		sell_amount: args.sell_amount,
		taker,
	};

	let events = spawn_event_logger(engine.event_bus());

	let cancel = CancellationToken::new();
	let trigger = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			tracing::info!("Interrupt received, stopping");
			trigger.cancel();
		}
	});

	let receipt = engine.execute(&request, &cancel).await?;
	println!("{}", serde_json::to_string_pretty(&receipt)?);

	drop(engine);
	if let Ok(logged) = events.await {
		tracing::debug!(logged, "Trade event listener stopped");
	}

	tracing::info!("Stopped");
	Ok(())
}

/// Logs pipeline events until the bus closes. Resolves to the number logged.
fn spawn_event_logger(bus: &EventBus) -> JoinHandle<usize> {
	let mut events = bus.subscribe();
	tokio::spawn(async move {
		let mut logged = 0;
		loop {
			match events.recv().await {
				Ok(event) => {
					log_event(&event);
					logged += 1;
				},
				Err(RecvError::Lagged(skipped)) => {
					tracing::debug!(skipped, "Trade event listener lagged");
				},
				Err(RecvError::Closed) => break,
			}
		}
		logged
	})
}

/// Reports pipeline progress while the trade runs.
fn log_event(event: &TradeEvent) {
	match event {
		TradeEvent::StateChanged { from, to } => {
			tracing::info!(%from, %to, "Trade state changed");
		},
		TradeEvent::Submitted { trade_hash } => {
			tracing::info!(trade_hash = %truncate_id(trade_hash), "Waiting for confirmation");
		},
		TradeEvent::StatusObserved {
			attempt,
			status: Some(status),
			..
		} => {
			tracing::info!(attempt, %status, "Trade status");
		},
		TradeEvent::StatusObserved { attempt, status: None, .. } => {
			tracing::info!(attempt, "Trade status unavailable");
		},
	}
}
