pub mod api;
pub mod chart;
pub mod error;
pub mod quote_summary;
pub mod yahoo;

pub use crate::api::{is_valid_symbol, DailyClose, MarketData, Period, QuoteMetadata};
pub use crate::error::UpstreamError;
pub use crate::yahoo::{Endpoints, YahooConfig, YahooFinance};
