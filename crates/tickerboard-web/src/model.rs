use serde::{Deserialize, Serialize};
use tickerboard_yahoo::{DailyClose, QuoteMetadata};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Response shapes
//
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Snapshot of one ticker: latest close against the previous close, plus upstream fundamentals.
///
/// ```json
/// {
///     "symbol": "HII",
///     "name": "Huntington Ingalls Industries, Inc.",
///     "lastPrice": 309.0,
///     "previousPrice": 300.0,
///     "change": 9.0,
///     "changePct": 3.0,
///     "volume": 512300,
///     "volumeAvg": 498000,
///     "marketCap": 11830000000,
///     "peRatio": 16.2,
///     "eps": 18.7
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub last_price: f64,
    pub previous_price: f64,
    pub change: f64,
    /// `null` when the previous close is zero.
    pub change_pct: Option<f64>,
    pub volume: u64,
    pub volume_avg: u64,
    pub market_cap: u64,
    pub pe_ratio: f64,
    pub eps: f64,
}

impl StockQuote {
    /// Missing metadata falls back to an empty name or zero.
    pub fn assemble(symbol: &str, meta: QuoteMetadata, last_price: f64) -> Self {
        let previous_price = meta.previous_close.unwrap_or(0.0);
        let change = last_price - previous_price;

        StockQuote {
            symbol: symbol.to_string(),
            name: meta.long_name.unwrap_or_default(),
            last_price,
            previous_price,
            change,
            change_pct: change_pct(change, previous_price),
            volume: whole(meta.volume),
            volume_avg: whole(meta.average_volume),
            market_cap: whole(meta.market_cap),
            pe_ratio: meta.forward_pe.unwrap_or(0.0),
            eps: meta.forward_eps.unwrap_or(0.0),
        }
    }
}

/// Percentage change against `previous_price`; undefined (None) for a zero baseline.
pub fn change_pct(change: f64, previous_price: f64) -> Option<f64> {
    if previous_price == 0.0 {
        None
    } else {
        Some(change / previous_price * 100.0)
    }
}

// counts and capitalisations; negative or NaN input saturates to 0
fn whole(value: Option<f64>) -> u64 {
    value.map(|v| v as u64).unwrap_or(0)
}

/// Daily closes over the trailing month; `dates[i]` is the trading day of `prices[i]`.
///
/// ```json
/// {
///     "dates": ["2024-06-10", "2024-06-11"],
///     "prices": [309.0, 311.5]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, utoipa::ToSchema)]
pub struct PriceHistory {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
}

impl From<Vec<DailyClose>> for PriceHistory {
    fn from(closes: Vec<DailyClose>) -> Self {
        let (dates, prices) = closes
            .into_iter()
            .map(|cell| (cell.date.format("%Y-%m-%d").to_string(), cell.close))
            .unzip();
        PriceHistory { dates, prices }
    }
}

/// Body of every non-2xx response.
#[derive(Serialize, Deserialize, Debug, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
