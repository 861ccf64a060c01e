use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC bar of a fixed timeframe for a single instrument.
///
/// A window of bars is always handed to detectors as `&[Bar]`, oldest first,
/// with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    /// Some feeds omit the open; nothing in the signal path reads it.
    #[serde(default)]
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(timestamp: DateTime<Utc>, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open: None,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    /// UTC calendar date of the bar, used for day-level grouping.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Direction of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
        }
    }
}

/// Output of every detector and of the combined vote.
///
/// `stop` and `target` are suggestions for the caller; they are `None` when
/// the detector has no level to offer, never a NaN placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub action: Action,
    pub stop: Option<f64>,
    pub target: Option<f64>,
}

impl TradeSignal {
    pub fn new(action: Action, stop: Option<f64>, target: Option<f64>) -> Self {
        Self {
            action,
            stop,
            target,
        }
    }
}

/// Side of an order sent to the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl From<Action> for OrderSide {
    fn from(action: Action) -> Self {
        match action {
            Action::Buy => OrderSide::Buy,
            Action::Sell => OrderSide::Sell,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// How long an order stays working at the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    Gtc,
}

/// A market order to be submitted to the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub time_in_force: TimeInForce,
}

impl Order {
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: f64) -> Self {
        Self {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            side,
            quantity,
            time_in_force: TimeInForce::Gtc,
        }
    }
}

/// Broker acknowledgement of an accepted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
}

/// An open position as reported by the broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub side: String,
    pub unrealized_pl: f64,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} qty={} side={} unrealized_pl={}",
            self.symbol, self.quantity, self.side, self.unrealized_pl
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bar_date_uses_utc_calendar_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 23, 45, 0).unwrap();
        let bar = Bar::new(ts, 10.0, 9.0, 9.5);
        assert_eq!(bar.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn bar_deserializes_without_open_or_volume() {
        let json = r#"{"timestamp":"2024-03-01T10:00:00Z","high":2.0,"low":1.0,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.open, None);
        assert_eq!(bar.volume, 0.0);
    }

    #[test]
    fn action_maps_to_order_side() {
        assert_eq!(OrderSide::from(Action::Buy), OrderSide::Buy);
        assert_eq!(OrderSide::from(Action::Sell), OrderSide::Sell);
    }

    #[test]
    fn market_order_defaults_to_gtc_with_fresh_id() {
        let a = Order::market("BTC/USD", OrderSide::Buy, 0.5);
        let b = Order::market("BTC/USD", OrderSide::Buy, 0.5);
        assert_eq!(a.time_in_force, TimeInForce::Gtc);
        assert_ne!(a.client_order_id, b.client_order_id);
    }

    #[test]
    fn time_in_force_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TimeInForce::Gtc).unwrap(), "\"gtc\"");
    }
}
