use async_trait::async_trait;

use crate::{Bar, Order, OrderAck, Position, Result};

/// Abstraction over the brokerage connection.
///
/// `AlpacaClient` in `crates/engine` implements this against the REST API.
/// Signal generation never touches this trait; only `TradeExecutor` holds a
/// `dyn ExchangeClient`.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Fetch the most recent `limit` bars for `symbol`, oldest first.
    async fn fetch_bars(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Bar>>;

    /// Submit an order and return the broker's acknowledgement.
    async fn submit_order(&self, order: &Order) -> Result<OrderAck>;

    /// Liquidate the open position in `symbol`.
    async fn close_position(&self, symbol: &str) -> Result<()>;

    /// Query currently open positions.
    async fn open_positions(&self) -> Result<Vec<Position>>;
}
