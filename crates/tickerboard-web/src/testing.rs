//! In-memory upstream and request helpers for handler tests.

use crate::watchlist::Watchlist;
use actix_web::http::{header::HeaderMap, StatusCode};
use actix_web::web::{self, Bytes};
use actix_web::{test, App};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tickerboard_yahoo::{DailyClose, MarketData, Period, QuoteMetadata, UpstreamError};

/// Unknown symbols answer `NotFound`, like Yahoo does.
#[derive(Default)]
pub struct FakeMarket {
    metadata: HashMap<String, QuoteMetadata>,
    histories: HashMap<(String, Period), Vec<DailyClose>>,
    failures: HashMap<String, fn() -> UpstreamError>,
    delays: HashMap<String, u64>,
}

impl FakeMarket {
    /// Register metadata and a one-day series closing at `last_price`.
    pub fn quote(mut self, symbol: &str, meta: QuoteMetadata, last_price: f64) -> Self {
        self.metadata.insert(symbol.to_string(), meta);
        self.histories.insert(
            (symbol.to_string(), Period::OneDay),
            vec![close(2024, 6, 10, last_price)],
        );
        self
    }

    pub fn history(mut self, symbol: &str, period: Period, closes: Vec<DailyClose>) -> Self {
        self.histories.insert((symbol.to_string(), period), closes);
        self
    }

    pub fn fail(mut self, symbol: &str, error: fn() -> UpstreamError) -> Self {
        self.failures.insert(symbol.to_string(), error);
        self
    }

    pub fn delay(mut self, symbol: &str, millis: u64) -> Self {
        self.delays.insert(symbol.to_string(), millis);
        self
    }

    async fn lookup(&self, symbol: &str) -> Result<(), UpstreamError> {
        if let Some(millis) = self.delays.get(symbol) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }
        match self.failures.get(symbol) {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn quote_metadata(&self, symbol: &str) -> Result<QuoteMetadata, UpstreamError> {
        self.lookup(symbol).await?;
        self.metadata
            .get(symbol)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(symbol.to_string()))
    }

    async fn daily_history(
        &self,
        symbol: &str,
        period: Period,
    ) -> Result<Vec<DailyClose>, UpstreamError> {
        self.lookup(symbol).await?;
        self.histories
            .get(&(symbol.to_string(), period))
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(symbol.to_string()))
    }
}

pub fn close(year: i32, month: u32, day: u32, close: f64) -> DailyClose {
    DailyClose {
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        close,
    }
}

/// Wire the app the way `main` does, minus the listener, and send it one request.
pub async fn call(
    market: FakeMarket,
    tickers: &[&str],
    request: test::TestRequest,
) -> (StatusCode, HeaderMap, Bytes) {
    let upstream: Arc<dyn MarketData> = Arc::new(market);
    let app = test::init_service(
        App::new()
            .wrap(crate::cors())
            .app_data(web::Data::new(Watchlist::new(tickers.iter().copied())))
            .app_data(web::Data::from(upstream))
            .configure(crate::routes),
    )
    .await;

    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body = test::read_body(response).await;
    (status, headers, body)
}

/// GET `uri` and decode the JSON body.
pub async fn get(market: FakeMarket, tickers: &[&str], uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = call(market, tickers, test::TestRequest::get().uri(uri)).await;
    (status, serde_json::from_slice(&body).expect("JSON body"))
}
