pub mod alpaca;
pub mod executor;

pub use alpaca::AlpacaClient;
pub use executor::{ExecutionReport, TradeExecutor};
