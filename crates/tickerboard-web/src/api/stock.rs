use crate::error::ApiError;
use crate::model::{ErrorBody, PriceHistory, StockQuote};
use crate::watchlist::{is_valid_ticker, Watchlist};
use actix_web::{get, web, HttpResponse};
use futures::future::try_join_all;
use tickerboard_yahoo::{MarketData, Period};
use tracing::{debug, error};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Quotes for every ticker on the watchlist
///
/// ```json
/// [
///     {
///         "symbol": "HII",
///         "name": "Huntington Ingalls Industries, Inc.",
///         "lastPrice": 309.0,
///         "previousPrice": 300.0,
///         "change": 9.0,
///         "changePct": 3.0,
///         ...
///     },
///     ...
/// ]
/// ```
#[utoipa::path(
    get,
    path = "/api/stocks",
    responses(
        (
            status = 200, description = "One quote per watchlist ticker, in watchlist order",
            body = [StockQuote], content_type = "application/json",
            example = json!([
                {
                    "symbol": "HII",
                    "name": "Huntington Ingalls Industries, Inc.",
                    "lastPrice": 309.0,
                    "previousPrice": 300.0,
                    "change": 9.0,
                    "changePct": 3.0,
                    "volume": 512300,
                    "volumeAvg": 498000,
                    "marketCap": 11830000000u64,
                    "peRatio": 16.2,
                    "eps": 18.7
                }
            ])
        ),
        (status = 502, description = "Upstream provider failed for at least one ticker", body = ErrorBody),
        (status = 504, description = "Upstream provider timed out", body = ErrorBody)
    )
)]
#[get("/api/stocks")]
pub async fn stocks(
    watchlist: web::Data<Watchlist>,
    upstream: web::Data<dyn MarketData>,
) -> Result<HttpResponse, ApiError> {
    let time = std::time::Instant::now();

    // try_join_all keeps input order, whatever order the fetches finish in
    let quotes = try_join_all(
        watchlist
            .iter()
            .map(|symbol| fetch_quote(upstream.get_ref(), symbol)),
    )
    .await?;

    debug!(
        "{} quotes assembled. Elapsed time: {} ms",
        quotes.len(),
        time.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().json(quotes))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Quote for a single ticker, watchlist or not
#[utoipa::path(
    get,
    path = "/api/stock/{ticker}",
    responses(
        (status = 200, description = "Quote for the requested ticker", body = StockQuote, content_type = "application/json"),
        (status = 400, description = "Malformed ticker symbol", body = ErrorBody),
        (status = 404, description = "Ticker unknown to the upstream provider", body = ErrorBody),
        (status = 502, description = "Upstream provider failed", body = ErrorBody),
        (status = 504, description = "Upstream provider timed out", body = ErrorBody)
    ),
    params(
        ("ticker" = String, Path, description = "Stock ticker symbol")
    )
)]
#[get("/api/stock/{ticker}")]
pub async fn quote(
    path: web::Path<String>,
    upstream: web::Data<dyn MarketData>,
) -> Result<HttpResponse, ApiError> {
    let ticker = validate(path.into_inner())?;
    let quote = fetch_quote(upstream.get_ref(), &ticker).await?;
    Ok(HttpResponse::Ok().json(quote))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Daily closes over the trailing month
///
/// ```json
/// {
///     "dates": ["2024-06-10", "2024-06-11", ...],
///     "prices": [309.0, 311.5, ...]
/// }
/// ```
#[utoipa::path(
    get,
    path = "/api/stock/{ticker}/history",
    responses(
        (
            status = 200, description = "Parallel, chronologically ordered dates and close prices; empty for a symbol with no recent trades",
            body = PriceHistory, content_type = "application/json",
            example = json!({
                "dates": ["2024-06-10", "2024-06-11"],
                "prices": [309.0, 311.5]
            })
        ),
        (status = 400, description = "Malformed ticker symbol", body = ErrorBody),
        (status = 404, description = "Ticker unknown to the upstream provider", body = ErrorBody),
        (status = 502, description = "Upstream provider failed", body = ErrorBody),
        (status = 504, description = "Upstream provider timed out", body = ErrorBody)
    ),
    params(
        ("ticker" = String, Path, description = "Stock ticker symbol")
    )
)]
#[get("/api/stock/{ticker}/history")]
pub async fn history(
    path: web::Path<String>,
    upstream: web::Data<dyn MarketData>,
) -> Result<HttpResponse, ApiError> {
    let ticker = validate(path.into_inner())?;
    let closes = upstream
        .daily_history(&ticker, Period::OneMonth)
        .await
        .map_err(|e| {
            error!("[{ticker}] history fetching failed: {e}");
            e
        })?;

    Ok(HttpResponse::Ok().json(PriceHistory::from(closes)))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Tickers are reported upper-cased, the way the upstream is queried.
fn validate(ticker: String) -> Result<String, ApiError> {
    if is_valid_ticker(&ticker) {
        Ok(ticker.to_uppercase())
    } else {
        Err(ApiError::InvalidTicker(ticker))
    }
}

/// Metadata and the one-day series are fetched together; the last close of the latter is the
/// quote's last price.
pub(crate) async fn fetch_quote(
    upstream: &dyn MarketData,
    symbol: &str,
) -> Result<StockQuote, ApiError> {
    let (meta, day) = futures::try_join!(
        upstream.quote_metadata(symbol),
        upstream.daily_history(symbol, Period::OneDay)
    )
    .map_err(|e| {
        error!("[{symbol}] quote fetching failed: {e}");
        e
    })?;

    let last = day.last().ok_or_else(|| {
        error!("[{symbol}] one-day history was empty");
        ApiError::EmptyHistory(symbol.to_string())
    })?;

    Ok(StockQuote::assemble(symbol, meta, last.close))
}
