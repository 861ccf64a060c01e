use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use engine::executor::{DEFAULT_BAR_LIMIT, DEFAULT_TIMEFRAME};
use engine::{AlpacaClient, TradeExecutor};
use strategy::{DetectorConfig, StrategyKind, StrategyRegistry};

#[derive(Parser)]
#[command(name = "signalbot", about = "Trading bot CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a trading strategy.
    Trade {
        #[arg(long, value_parser = ["ma", "rsi_bb", "breakout", "ema", "combo"])]
        strategy: String,

        /// Symbol to trade, e.g. BTC/USD.
        #[arg(long)]
        symbol: String,

        /// Capital to commit; order quantity is amount / last close.
        #[arg(long)]
        amount: f64,

        /// Bar timeframe requested from the data API.
        #[arg(long, default_value = DEFAULT_TIMEFRAME)]
        timeframe: String,

        /// Number of bars to evaluate.
        #[arg(long, default_value_t = DEFAULT_BAR_LIMIT)]
        limit: usize,
    },
    /// Show open positions.
    Positions,
    /// Close a position.
    Close {
        #[arg(long)]
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env()?;
    info!(base_url = %cfg.base_url, "SignalBot starting");

    let detectors = DetectorConfig::load_or_default(cfg.strategy_config_path.as_deref())?;
    let registry = StrategyRegistry::new(detectors);

    // ── Broker ────────────────────────────────────────────────────────────────
    let client = Arc::new(AlpacaClient::from_config(&cfg)?);
    let executor = TradeExecutor::new(client, registry);

    match cli.command {
        Commands::Trade {
            strategy,
            symbol,
            amount,
            timeframe,
            limit,
        } => {
            let kind: StrategyKind = strategy.parse()?;
            let report = executor
                .with_market(timeframe, limit)
                .run_strategy(kind, &symbol, amount)
                .await
                .with_context(|| format!("{kind} strategy failed for {symbol}"))?;
            match report {
                Some(report) => {
                    println!(
                        "Submitted {} order for {} {}",
                        report.order.side, report.order.quantity, report.order.symbol
                    );
                    if let Some(stop) = report.signal.stop {
                        println!("Suggested stop loss: {stop:.2}");
                    }
                    if let Some(target) = report.signal.target {
                        println!("Suggested take profit: {target:.2}");
                    }
                }
                None => println!("No trading signal generated"),
            }
        }
        Commands::Positions => {
            for position in executor.show_positions().await? {
                println!("{position}");
            }
        }
        Commands::Close { symbol } => {
            executor
                .close_position(&symbol)
                .await
                .with_context(|| format!("Error closing position in {symbol}"))?;
            println!("Closed position in {symbol}");
        }
    }

    Ok(())
}
