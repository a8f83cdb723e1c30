use std::str::FromStr;
use tickerboard_yahoo::is_valid_symbol;

/// Reference watchlist: US defence contractors.
pub const DEFAULT_TICKERS: &str = "HII,GD,TXT,LDOS,KTOS,MRCY,CW,HEI,RCAT,PLTR";

/// Ticker symbols are 1-12 characters of `A-Z a-z 0-9 . - ^ =`.
pub fn is_valid_ticker(ticker: &str) -> bool {
    is_valid_symbol(ticker)
}

/// The fixed, ordered set of tickers reported by `/api/stocks`.
///
/// Built once at startup and handed to the app as shared data; it has no mutation interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Watchlist(Vec<String>);

impl Watchlist {
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Watchlist(tickers.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        DEFAULT_TICKERS
            .parse()
            .expect("default watchlist is well-formed")
    }
}

impl FromStr for Watchlist {
    type Err = String;

    /// Parse a comma-separated list, e.g. `"HII, GD,TXT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tickers = s
            .split(',')
            .map(str::trim)
            .filter(|ticker| !ticker.is_empty())
            .map(|ticker| {
                if is_valid_ticker(ticker) {
                    Ok(ticker.to_uppercase())
                } else {
                    Err(format!("invalid ticker symbol {ticker:?}"))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if tickers.is_empty() {
            return Err("watchlist must contain at least one ticker".to_string());
        }
        Ok(Watchlist(tickers))
    }
}
