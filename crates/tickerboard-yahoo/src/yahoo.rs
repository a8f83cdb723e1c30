use crate::api::{is_valid_symbol, DailyClose, MarketData, Period, QuoteMetadata};
use crate::chart::{self, PriceHistory};
use crate::error::UpstreamError;
use crate::quote_summary::{self, QuoteSummary};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

/// Yahoo rejects requests without a browser-like agent.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Base URLs of the four Yahoo endpoints the client talks to.
#[derive(Clone, Debug)]
pub struct Endpoints {
    pub chart: String,
    pub summary: String,
    /// Only visited for the session cookies it sets.
    pub cookie: String,
    pub crumb: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            chart: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            summary: "https://query2.finance.yahoo.com/v10/finance/quoteSummary".to_string(),
            cookie: "https://fc.yahoo.com".to_string(),
            crumb: "https://query1.finance.yahoo.com/v1/test/getcrumb".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct YahooConfig {
    pub user_agent: String,
    /// Applied to every upstream request, connect through body.
    pub timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for YahooConfig {
    fn default() -> Self {
        YahooConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            endpoints: Endpoints::default(),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Yahoo Finance client
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct YahooFinance {
    client: Client,
    endpoints: Endpoints,
    crumb: RwLock<Option<String>>,
}

impl YahooFinance {
    pub fn new(config: YahooConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(YahooFinance {
            client,
            endpoints: config.endpoints,
            crumb: RwLock::new(None),
        })
    }

    /// The quoteSummary endpoint needs a session crumb tied to the cookies set by `fc.yahoo.com`.
    async fn crumb(&self, symbol: &str) -> Result<String, UpstreamError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut slot = self.crumb.write().await;
        if let Some(crumb) = slot.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404, the cookies are all we want from it
        trace!("Opening Yahoo Finance session");
        self.client
            .get(&self.endpoints.cookie)
            .send()
            .await
            .map_err(|e| UpstreamError::from_request(symbol, e))?;

        let crumb = self
            .client
            .get(&self.endpoints.crumb)
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(|e| {
                error!("failed to obtain Yahoo Finance crumb: {e}");
                UpstreamError::from_request(symbol, e)
            })?
            .text()
            .await
            .map_err(|e| UpstreamError::from_request(symbol, e))?;

        if crumb.is_empty() || crumb.contains('<') {
            return Err(UpstreamError::Provider(
                "Yahoo Finance returned an unusable crumb".to_string(),
            ));
        }

        debug!("Yahoo Finance session established");
        *slot = Some(crumb.clone());
        Ok(crumb)
    }

    /// Forget `rejected`, unless another request has already replaced it with a fresh crumb.
    async fn discard_crumb(&self, rejected: &str) {
        let mut slot = self.crumb.write().await;
        if slot.as_deref() == Some(rejected) {
            slot.take();
        }
    }

    /// Returns the response together with the crumb it was sent with.
    async fn summary_request(&self, symbol: &str) -> Result<(Response, String), UpstreamError> {
        let crumb = self.crumb(symbol).await?;
        let response = self
            .client
            .get(format!("{}/{symbol}", self.endpoints.summary))
            .query(&[("modules", quote_summary::MODULES), ("crumb", crumb.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!("[{symbol}] quote summary fetching error: {e}");
                UpstreamError::from_request(symbol, e)
            })?;
        Ok((response, crumb))
    }

    fn url(&self, ticker: &str, range: &str) -> String {
        format!(
            "{}/{ticker}?range={range}&interval=1d&includePrePost=false",
            self.endpoints.chart
        )
    }
}

fn checked_symbol(symbol: &str) -> Result<String, UpstreamError> {
    if is_valid_symbol(symbol) {
        Ok(symbol.to_uppercase())
    } else {
        Err(UpstreamError::InvalidSymbol(symbol.to_string()))
    }
}

/// Check the status, then pull the whole body.
async fn read_body(symbol: &str, response: Response) -> Result<Vec<u8>, UpstreamError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(UpstreamError::NotFound(symbol.to_string()));
    }
    if !status.is_success() {
        error!("[{symbol}] upstream responded with {status}");
        return Err(UpstreamError::Status {
            symbol: symbol.to_string(),
            status,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::from_request(symbol, e))?;
    Ok(bytes.to_vec())
}

#[async_trait]
impl MarketData for YahooFinance {
    async fn quote_metadata(&self, symbol: &str) -> Result<QuoteMetadata, UpstreamError> {
        let time = std::time::Instant::now();
        let symbol = checked_symbol(symbol)?;

        trace!("Fetching quote metadata for [{symbol}] from Yahoo Finance");
        let (mut response, crumb) = self.summary_request(&symbol).await?;

        // crumbs expire with the session; renew once
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("[{symbol}] crumb rejected, renewing the Yahoo Finance session");
            self.discard_crumb(&crumb).await;
            response = self.summary_request(&symbol).await?.0;
        }

        let body = read_body(&symbol, response).await?;
        let de = serde_json::from_slice::<QuoteSummary>(&body).map_err(|e| {
            error!("[{symbol}] quote summary deserialization error: {e}");
            e
        })?;

        let metadata = quote_summary::metadata(&symbol, de)?;
        debug!(
            "[{symbol}] quote metadata fetched. Elapsed time: {} ms",
            time.elapsed().as_millis()
        );
        Ok(metadata)
    }

    async fn daily_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<DailyClose>, UpstreamError> {
        let time = std::time::Instant::now();
        let symbol = checked_symbol(symbol)?;
        let url = self.url(&symbol, period.range());

        trace!("Fetching price data for [{symbol}] from Yahoo Finance");
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("[{symbol}] price fetching error: {e}\nURL: {url}");
            UpstreamError::from_request(&symbol, e)
        })?;
        let body = read_body(&symbol, response).await?;

        // error check the deserialization
        trace!("Deserializing price data for [{symbol}] from Yahoo Finance");
        let de = serde_json::from_slice::<PriceHistory>(&body).map_err(|e| {
            error!("[{symbol}] deserialization error: {e}\nURL: {url}");
            e
        })?;

        let closes = chart::closes(&symbol, de)?;
        debug!(
            "[{symbol}] {} daily closes fetched over {}. Elapsed time: {} ms",
            closes.len(),
            period.range(),
            time.elapsed().as_millis()
        );
        Ok(closes)
    }
}
