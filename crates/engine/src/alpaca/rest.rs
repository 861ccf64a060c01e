use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{Bar, Config, Error, ExchangeClient, Order, OrderAck, Position, Result, TimeInForce};

/// REST API client for Alpaca. Market data comes from the data host, trading
/// calls go to the (paper or live) trading host.
pub struct AlpacaClient {
    api_key: String,
    secret_key: String,
    base_url: String,
    data_url: String,
    http: Client,
}

impl AlpacaClient {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
        data_url: impl Into<String>,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            base_url: trim_slash(base_url.into()),
            data_url: trim_slash(data_url.into()),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.api_key, &cfg.secret_key, &cfg.base_url, &cfg.data_url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("APCA-API-KEY-ID", &self.api_key)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
    }

    async fn send(&self, req: RequestBuilder) -> Result<String> {
        let resp = self
            .authed(req)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl ExchangeClient for AlpacaClient {
    async fn fetch_bars(&self, symbol: &str, timeframe: &str, limit: usize) -> Result<Vec<Bar>> {
        let step = timeframe_duration(timeframe)?;
        let start = lookback_start(Utc::now(), step, limit)?;
        let url = format!("{}/v1beta3/crypto/us/bars", self.data_url);
        let limit = limit.to_string();
        let start = start.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

        debug!(symbol, timeframe, limit = %limit, "Fetching bars from Alpaca");
        let req = self.http.get(&url).query(&[
            ("symbols", symbol),
            ("timeframe", timeframe),
            ("limit", limit.as_str()),
            ("start", start.as_str()),
            ("sort", "desc"),
        ]);
        let body = self.send(req).await?;
        parse_bars(&body, symbol)
    }

    async fn submit_order(&self, order: &Order) -> Result<OrderAck> {
        let request = OrderRequest {
            symbol: &order.symbol,
            qty: format_qty(order.quantity),
            side: order.side.to_string(),
            order_type: "market",
            time_in_force: order.time_in_force,
            client_order_id: &order.client_order_id,
        };

        debug!(symbol = %order.symbol, side = %order.side, qty = %request.qty, "Submitting order to Alpaca");
        let url = format!("{}/v2/orders", self.base_url);
        let body = self.send(self.http.post(&url).json(&request)).await?;
        parse_order_ack(&body)
    }

    async fn close_position(&self, symbol: &str) -> Result<()> {
        let url = format!("{}/v2/positions/{}", self.base_url, position_symbol(symbol));
        debug!(symbol, "Closing position on Alpaca");
        self.send(self.http.delete(&url)).await?;
        Ok(())
    }

    async fn open_positions(&self) -> Result<Vec<Position>> {
        let url = format!("{}/v2/positions", self.base_url);
        let body = self.send(self.http.get(&url)).await?;
        parse_positions(&body)
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Position endpoints take crypto pairs without the slash ("BTC/USD" -> "BTCUSD").
fn position_symbol(symbol: &str) -> String {
    symbol.replace('/', "")
}

/// Alpaca accepts fractional quantities as decimal strings.
fn format_qty(qty: f64) -> String {
    let s = format!("{qty:.9}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Length of one bar for an Alpaca timeframe string such as "15Min" or "1Day".
fn timeframe_duration(timeframe: &str) -> Result<Duration> {
    let invalid = || Error::Config(format!("Invalid timeframe '{timeframe}'"));
    let split = timeframe
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(timeframe.len());
    let (amount, unit) = timeframe.split_at(split);
    let amount: i32 = if amount.is_empty() {
        1
    } else {
        amount.parse().map_err(|_| invalid())?
    };
    let unit = match unit {
        "Min" | "T" => Duration::minutes(1),
        "Hour" | "H" => Duration::hours(1),
        "Day" | "D" => Duration::days(1),
        "Week" | "W" => Duration::weeks(1),
        _ => return Err(invalid()),
    };
    if amount <= 0 {
        return Err(invalid());
    }
    unit.checked_mul(amount).ok_or_else(invalid)
}

/// Earliest timestamp that still covers `limit` bars of `step` (plus one spare).
fn lookback_start(now: DateTime<Utc>, step: Duration, limit: usize) -> Result<DateTime<Utc>> {
    i32::try_from(limit)
        .ok()
        .and_then(|n| n.checked_add(1))
        .and_then(|n| step.checked_mul(n))
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| Error::Config(format!("Bar limit {limit} is out of range")))
}

fn parse_bars(body: &str, symbol: &str) -> Result<Vec<Bar>> {
    let resp: BarsResponse = serde_json::from_str(body)?;
    let mut bars: Vec<Bar> = resp
        .bars
        .into_iter()
        .filter(|(s, _)| s == symbol)
        .flat_map(|(_, bars)| bars)
        .map(Bar::from)
        .collect();
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
    Ok(bars)
}

fn parse_order_ack(body: &str) -> Result<OrderAck> {
    let resp: OrderResponse = serde_json::from_str(body)?;
    Ok(OrderAck {
        order_id: resp.id,
        client_order_id: resp.client_order_id,
        symbol: resp.symbol,
        status: resp.status,
    })
}

fn parse_positions(body: &str) -> Result<Vec<Position>> {
    let resp: Vec<PositionResponse> = serde_json::from_str(body)?;
    resp.into_iter()
        .map(|p| {
            Ok(Position {
                quantity: parse_decimal(&p.qty, "qty")?,
                unrealized_pl: parse_decimal(&p.unrealized_pl, "unrealized_pl")?,
                symbol: p.symbol,
                side: p.side,
            })
        })
        .collect()
}

fn parse_decimal(value: &str, field: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| Error::Exchange(format!("bad {field} '{value}': {e}")))
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OrderRequest<'a> {
    symbol: &'a str,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: TimeInForce,
    client_order_id: &'a str,
}

#[derive(Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: HashMap<String, Vec<BarDetail>>,
}

#[derive(Deserialize)]
struct BarDetail {
    t: DateTime<Utc>,
    #[serde(default)]
    o: Option<f64>,
    h: f64,
    l: f64,
    c: f64,
    #[serde(default)]
    v: f64,
}

impl From<BarDetail> for Bar {
    fn from(b: BarDetail) -> Self {
        Bar {
            timestamp: b.t,
            open: b.o,
            high: b.h,
            low: b.l,
            close: b.c,
            volume: b.v,
        }
    }
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    client_order_id: String,
    symbol: String,
    status: String,
}

#[derive(Deserialize)]
struct PositionResponse {
    symbol: String,
    qty: String,
    side: String,
    unrealized_pl: String,
}
