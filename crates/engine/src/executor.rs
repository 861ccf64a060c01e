use std::sync::Arc;

use tracing::{error, info, warn};

use common::{Error, ExchangeClient, Order, OrderAck, Position, Result, TradeSignal};
use strategy::{StrategyKind, StrategyRegistry};

pub const DEFAULT_TIMEFRAME: &str = "15Min";
pub const DEFAULT_BAR_LIMIT: usize = 200;

/// What happened when a signal was turned into an order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub signal: TradeSignal,
    pub order: Order,
    pub ack: OrderAck,
    /// Close the order quantity was sized from.
    pub last_close: f64,
}

/// Fetches bars, asks a strategy for a signal and turns it into an order.
///
/// This is the ONLY component that calls `ExchangeClient::submit_order`.
/// Broker failures are logged and returned here; they never reach the
/// signal code.
pub struct TradeExecutor {
    client: Arc<dyn ExchangeClient>,
    registry: StrategyRegistry,
    timeframe: String,
    bar_limit: usize,
}

impl TradeExecutor {
    pub fn new(client: Arc<dyn ExchangeClient>, registry: StrategyRegistry) -> Self {
        Self {
            client,
            registry,
            timeframe: DEFAULT_TIMEFRAME.to_string(),
            bar_limit: DEFAULT_BAR_LIMIT,
        }
    }

    pub fn with_market(mut self, timeframe: impl Into<String>, bar_limit: usize) -> Self {
        self.timeframe = timeframe.into();
        self.bar_limit = bar_limit;
        self
    }

    /// Run one strategy against the latest bars for `symbol`, spending
    /// `capital` on a market order if it signals.
    ///
    /// Returns `Ok(None)` when the strategy has nothing to say.
    pub async fn run_strategy(
        &self,
        kind: StrategyKind,
        symbol: &str,
        capital: f64,
    ) -> Result<Option<ExecutionReport>> {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(Error::InvalidOrder(format!(
                "capital must be a positive amount, got {capital}"
            )));
        }

        let bars = self
            .client
            .fetch_bars(symbol, &self.timeframe, self.bar_limit)
            .await
            .inspect_err(|e| error!(symbol, error = %e, "Failed to fetch bars"))?;
        info!(symbol, bars = bars.len(), timeframe = %self.timeframe, "Fetched bars");

        let Some(signal) = self.registry.evaluate(kind, &bars) else {
            info!(symbol, strategy = %kind, "No trading signal generated");
            return Ok(None);
        };

        let last_close = bars.last().map(|b| b.close).unwrap_or(f64::NAN);
        if !last_close.is_finite() || last_close <= 0.0 {
            return Err(Error::InvalidOrder(format!(
                "cannot size order from last close {last_close}"
            )));
        }

        let quantity = capital / last_close;
        let order = Order::market(symbol, signal.action.into(), quantity);
        let ack = self
            .client
            .submit_order(&order)
            .await
            .inspect_err(|e| error!(symbol, error = %e, "Order submission failed"))?;

        info!(
            symbol,
            side = %order.side,
            qty = quantity,
            order_id = %ack.order_id,
            status = %ack.status,
            "Submitted order"
        );
        if let Some(stop) = signal.stop {
            info!(symbol, "Suggested stop loss: {stop:.2}");
        }
        if let Some(target) = signal.target {
            info!(symbol, "Suggested take profit: {target:.2}");
        }

        Ok(Some(ExecutionReport {
            signal,
            order,
            ack,
            last_close,
        }))
    }

    pub async fn close_position(&self, symbol: &str) -> Result<()> {
        match self.client.close_position(symbol).await {
            Ok(()) => {
                info!(symbol, "Closed position");
                Ok(())
            }
            Err(e) => {
                warn!(symbol, error = %e, "Error closing position");
                Err(e)
            }
        }
    }

    pub async fn show_positions(&self) -> Result<Vec<Position>> {
        let positions = self
            .client
            .open_positions()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list positions"))?;
        for p in &positions {
            info!(
                symbol = %p.symbol,
                qty = p.quantity,
                side = %p.side,
                unrealized_pl = p.unrealized_pl,
                "Open position"
            );
        }
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use common::{Action, Bar, OrderSide, TimeInForce};
    use tokio::sync::Mutex;

    /// In-memory broker recording every call.
    #[derive(Default)]
    struct MockExchange {
        bars: Vec<Bar>,
        fail_orders: bool,
        orders: Mutex<Vec<Order>>,
        closed: Mutex<Vec<String>>,
        requests: Mutex<Vec<(String, String, usize)>>,
    }

    #[async_trait]
    impl ExchangeClient for MockExchange {
        async fn fetch_bars(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Bar>> {
            self.requests
                .lock()
                .await
                .push((symbol.to_string(), timeframe.to_string(), limit));
            Ok(self.bars.clone())
        }

        async fn submit_order(&self, order: &Order) -> Result<OrderAck> {
            if self.fail_orders {
                return Err(Error::Exchange("HTTP 403 Forbidden: insufficient balance".into()));
            }
            self.orders.lock().await.push(order.clone());
            Ok(OrderAck {
                order_id: "ord-1".into(),
                client_order_id: order.client_order_id.clone(),
                symbol: order.symbol.clone(),
                status: "accepted".into(),
            })
        }

        async fn close_position(&self, symbol: &str) -> Result<()> {
            if symbol == "UNKNOWN" {
                return Err(Error::Exchange("HTTP 404 Not Found: position does not exist".into()));
            }
            self.closed.lock().await.push(symbol.to_string());
            Ok(())
        }

        async fn open_positions(&self) -> Result<Vec<Position>> {
            Ok(vec![Position {
                symbol: "BTCUSD".into(),
                quantity: 0.5,
                side: "long".into(),
                unrealized_pl: 12.0,
            }])
        }
    }

    /// A quiet day followed by a bar closing at 102 above its 101 high.
    fn breakout_bars() -> Vec<Bar> {
        let day_one = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut bars: Vec<Bar> = (0..20)
            .map(|i| Bar::new(day_one + Duration::minutes(15 * i), 101.0, 99.0, 100.0))
            .collect();
        let day_two = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        bars.push(Bar::new(day_two, 102.5, 100.5, 102.0));
        bars
    }

    fn executor(mock: Arc<MockExchange>) -> TradeExecutor {
        TradeExecutor::new(mock, StrategyRegistry::default())
    }

    #[tokio::test]
    async fn signal_becomes_sized_market_order() {
        let mock = Arc::new(MockExchange {
            bars: breakout_bars(),
            ..Default::default()
        });
        let report = executor(mock.clone())
            .run_strategy(StrategyKind::Breakout, "BTC/USD", 1020.0)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.signal.action, Action::Buy);
        assert_eq!(report.last_close, 102.0);
        assert!((report.order.quantity - 10.0).abs() < 1e-12);
        assert_eq!(report.order.side, OrderSide::Buy);
        assert_eq!(report.order.time_in_force, TimeInForce::Gtc);
        assert_eq!(report.ack.status, "accepted");

        let orders = mock.orders.lock().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].symbol, "BTC/USD");
    }

    #[tokio::test]
    async fn default_market_request_is_200_bars_of_15_minutes() {
        let mock = Arc::new(MockExchange::default());
        executor(mock.clone())
            .run_strategy(StrategyKind::Combined, "ETH/USD", 100.0)
            .await
            .unwrap();
        let requests = mock.requests.lock().await;
        assert_eq!(requests[0], ("ETH/USD".to_string(), "15Min".to_string(), 200));
    }

    #[tokio::test]
    async fn custom_market_settings_are_forwarded() {
        let mock = Arc::new(MockExchange::default());
        executor(mock.clone())
            .with_market("1Hour", 120)
            .run_strategy(StrategyKind::EmaPullback, "ETH/USD", 100.0)
            .await
            .unwrap();
        let requests = mock.requests.lock().await;
        assert_eq!(requests[0].1, "1Hour");
        assert_eq!(requests[0].2, 120);
    }

    #[tokio::test]
    async fn no_signal_places_no_order() {
        let mock = Arc::new(MockExchange {
            bars: breakout_bars()[..20].to_vec(),
            ..Default::default()
        });
        let report = executor(mock.clone())
            .run_strategy(StrategyKind::Combined, "BTC/USD", 500.0)
            .await
            .unwrap();
        assert!(report.is_none());
        assert!(mock.orders.lock().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_capital_is_rejected_before_fetching() {
        let mock = Arc::new(MockExchange {
            bars: breakout_bars(),
            ..Default::default()
        });
        for capital in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = executor(mock.clone())
                .run_strategy(StrategyKind::Breakout, "BTC/USD", capital)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidOrder(_)));
        }
        assert!(mock.requests.lock().await.is_empty());
        assert!(mock.orders.lock().await.is_empty());
    }

    #[tokio::test]
    async fn broker_rejection_is_returned() {
        let mock = Arc::new(MockExchange {
            bars: breakout_bars(),
            fail_orders: true,
            ..Default::default()
        });
        let err = executor(mock)
            .run_strategy(StrategyKind::Breakout, "BTC/USD", 1000.0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Exchange(msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn close_position_reports_outcome() {
        let mock = Arc::new(MockExchange::default());
        let exec = executor(mock.clone());
        exec.close_position("BTC/USD").await.unwrap();
        assert!(exec.close_position("UNKNOWN").await.is_err());
        assert_eq!(*mock.closed.lock().await, vec!["BTC/USD".to_string()]);
    }

    #[tokio::test]
    async fn show_positions_lists_broker_positions() {
        let positions = executor(Arc::new(MockExchange::default()))
            .show_positions()
            .await
            .unwrap();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].to_string(), "BTCUSD qty=0.5 side=long unrealized_pl=12");
    }
}
