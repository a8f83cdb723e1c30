use crate::api::QuoteMetadata;
use crate::chart::ProviderError;
use crate::error::UpstreamError;
use serde::{Deserialize, Deserializer};

/// Modules requested from quoteSummary; together they cover every [`QuoteMetadata`] field.
pub const MODULES: &str = "price,summaryDetail,defaultKeyStatistics";

pub fn metadata(symbol: &str, summary: QuoteSummary) -> Result<QuoteMetadata, UpstreamError> {
    if let Some(e) = summary.quote_summary.error {
        return Err(e.into_upstream(symbol));
    }

    let modules = summary
        .quote_summary
        .result
        .and_then(|mut result| (!result.is_empty()).then(|| result.swap_remove(0)))
        .ok_or_else(|| UpstreamError::NotFound(symbol.to_string()))?;

    let price = modules.price.unwrap_or_default();
    let detail = modules.summary_detail.unwrap_or_default();
    let stats = modules.default_key_statistics.unwrap_or_default();

    Ok(QuoteMetadata {
        long_name: price.long_name,
        previous_close: detail.previous_close,
        volume: detail.volume,
        average_volume: detail.average_volume,
        market_cap: detail.market_cap,
        forward_pe: detail.forward_pe,
        forward_eps: stats.forward_eps,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
////////////////////////////////////////////////////////////////////////////////////////////////////

// Input: Yahoo Finance, v10 quoteSummary
#[derive(Deserialize, Debug)]
pub struct QuoteSummary {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: SummaryResponse,
}

#[derive(Deserialize, Debug)]
pub struct SummaryResponse {
    pub result: Option<Vec<Modules>>,
    pub error: Option<ProviderError>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Modules {
    pub price: Option<Price>,
    pub summary_detail: Option<SummaryDetail>,
    pub default_key_statistics: Option<KeyStatistics>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub long_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(default, deserialize_with = "de_raw")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub volume: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub average_volume: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub market_cap: Option<f64>,
    #[serde(rename = "forwardPE", default, deserialize_with = "de_raw")]
    pub forward_pe: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatistics {
    #[serde(default, deserialize_with = "de_raw")]
    pub forward_eps: Option<f64>,
}

/// Numbers arrive as `{"raw": 1.5, "fmt": "1.50"}`; an empty object, a null, or a non-numeric
/// `raw` (Yahoo sends `"Infinity"` for some ratios) all read as absent.
pub fn de_raw<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Raw {
        raw: Option<serde_json::Value>,
    }

    let raw: Option<Raw> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .and_then(|cell| cell.raw)
        .and_then(|value| value.as_f64()))
}
