use crate::error::UpstreamError;
use async_trait::async_trait;
use chrono::NaiveDate;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Capability set of an upstream market-data provider
//
////////////////////////////////////////////////////////////////////////////////////////////////////

const MAX_SYMBOL_LEN: usize = 12;

/// Ticker symbols are 1-12 characters of `A-Z a-z 0-9 . - ^ =`, which covers share classes
/// (`BRK-B`), indices (`^GSPC`) and currency pairs (`EURUSD=X`).
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
}

/// Trailing window of daily bars to request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    OneDay,
    OneMonth,
}

impl Period {
    /// Range string understood by the Yahoo chart API.
    pub fn range(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::OneMonth => "1mo",
        }
    }
}

/// Quote metadata for a single symbol; any field the provider omits is `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteMetadata {
    pub long_name: Option<String>,
    pub previous_close: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub forward_pe: Option<f64>,
    pub forward_eps: Option<f64>,
}

/// One trading day's close, dated in the exchange's local calendar.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

#[async_trait]
pub trait MarketData: Send + Sync {
    async fn quote_metadata(&self, symbol: &str) -> Result<QuoteMetadata, UpstreamError>;

    /// Daily closes over `period`, oldest first.
    async fn daily_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<DailyClose>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_shapes() {
        for ok in ["HII", "BRK.B", "BRK-B", "^GSPC", "EURUSD=X", "7203.T"] {
            assert!(is_valid_symbol(ok), "{ok}");
        }
        for bad in ["", "HII/../x", "A B", "TOOLONGTICKER1", "<script>"] {
            assert!(!is_valid_symbol(bad), "{bad}");
        }
    }

    #[test]
    fn period_ranges() {
        assert_eq!(Period::OneDay.range(), "1d");
        assert_eq!(Period::OneMonth.range(), "1mo");
    }
}
