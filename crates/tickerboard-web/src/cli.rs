use crate::watchlist::{Watchlist, DEFAULT_TICKERS};
use clap::{Parser, ValueEnum};
use tracing::Level;

/// Serve watchlist quotes and price history as JSON for the dashboard.
///
/// Every flag can also be set through the environment (or a `.env` file).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Interface to bind the listener to
    #[arg(long, env = "TICKERBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "TICKERBOARD_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Comma-separated ticker symbols reported by /api/stocks, in output order
    #[arg(long, env = "TICKERBOARD_TICKERS", default_value = DEFAULT_TICKERS)]
    pub tickers: Watchlist,

    /// Time limit per upstream call, in seconds
    #[arg(long, env = "TICKERBOARD_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Sets the level of tracing
    #[arg(long, env = "TICKERBOARD_TRACE", default_value = "info", ignore_case = true)]
    pub trace: TraceLevel,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<TraceLevel> for Level {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Trace => Level::TRACE,
            TraceLevel::Debug => Level::DEBUG,
            TraceLevel::Info => Level::INFO,
            TraceLevel::Warn => Level::WARN,
            TraceLevel::Error => Level::ERROR,
        }
    }
}
