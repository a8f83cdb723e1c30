use crate::api::DailyClose;
use crate::error::UpstreamError;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{error, trace};

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Transformation
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

/// Flatten a chart response into daily closes.
///
/// Bars whose close is null (e.g. the current, still-open session) are dropped together with their
/// timestamp, so every returned date carries exactly one close. Bars landing on the same exchange
/// date collapse into one, keeping the latest close. A result without timestamps is an
/// empty series rather than an error.
pub fn closes(symbol: &str, history: PriceHistory) -> Result<Vec<DailyClose>, UpstreamError> {
    if let Some(e) = history.chart.error {
        return Err(e.into_upstream(symbol));
    }

    let base = match history.chart.result {
        Some(mut result) if !result.is_empty() => result.swap_remove(0),
        Some(_) => return Ok(vec![]),
        None => {
            error!("[{symbol}] contained no \"chart.result\" object");
            return Err(UpstreamError::Provider(format!(
                "chart response for {symbol} contained no result"
            )));
        }
    };

    let offset = base.meta.gmtoffset;
    let closes = base
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.close)
        .unwrap_or_default();

    trace!("Transforming {} price bars for [{symbol}]", base.timestamp.len());
    let mut bars: Vec<(i64, f64)> = base
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(timestamp, close)| close.map(|close| (*timestamp, close)))
        .collect();
    bars.sort_by_key(|(timestamp, _)| *timestamp);

    let mut data = bars
        .into_iter()
        .map(|(timestamp, close)| {
            DateTime::from_timestamp(timestamp + offset, 0)
                .map(|time| DailyClose {
                    date: time.date_naive(),
                    close,
                })
                .ok_or_else(|| {
                    UpstreamError::Provider(format!("invalid timestamp {timestamp} for {symbol}"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // a live intraday bar can share the date of the day's bar; the later close wins
    data.dedup_by(|later, earlier| {
        let same_day = later.date == earlier.date;
        if same_day {
            earlier.close = later.close;
        }
        same_day
    });
    Ok(data)
}

///////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////////

// Input: Yahoo Finance, v8 chart
#[derive(Deserialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
    pub error: Option<ProviderError>,
}

#[derive(Deserialize, Debug)]
pub struct PriceCategories {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct Meta {
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
pub struct Quote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Error object Yahoo embeds in both chart and quoteSummary payloads.
#[derive(Deserialize, Debug)]
pub struct ProviderError {
    pub code: String,
    pub description: Option<String>,
}

impl ProviderError {
    pub(crate) fn into_upstream(self, symbol: &str) -> UpstreamError {
        if self.code.eq_ignore_ascii_case("Not Found") {
            UpstreamError::NotFound(symbol.to_string())
        } else {
            UpstreamError::Provider(format!(
                "{}: {}",
                self.code,
                self.description.unwrap_or_default()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(json: &str) -> PriceHistory {
        serde_json::from_str(json).expect("fixture parses")
    }

    #[test]
    fn closes_are_dated_in_exchange_time() {
        // 2024-06-10 13:30 UTC is 09:30 in New York
        let history = parse(
            r#"{"chart":{"result":[{
                "meta":{"currency":"USD","symbol":"HII","gmtoffset":-14400},
                "timestamp":[1718026200],
                "indicators":{"quote":[{"open":[301.0],"close":[309.0],"volume":[1000]}]}
            }],"error":null}}"#,
        );

        let data = closes("HII", history).unwrap();
        assert_eq!(
            data,
            vec![DailyClose {
                date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                close: 309.0
            }]
        );
    }

    #[test]
    fn null_closes_drop_their_dates() {
        let history = parse(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":0},
                "timestamp":[1717977600,1718064000,1718150400],
                "indicators":{"quote":[{"close":[10.5,null,11.25]}],"adjclose":[{"adjclose":[10.5,null,11.25]}]}
            }],"error":null}}"#,
        );

        let data = closes("GD", history).unwrap();
        let dates: Vec<String> = data.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-10", "2024-06-12"]);
        assert_eq!(data[1].close, 11.25);
    }

    #[test]
    fn missing_timestamps_mean_no_data() {
        let history = parse(
            r#"{"chart":{"result":[{"meta":{"gmtoffset":-14400},"indicators":{"quote":[{}]}}],"error":null}}"#,
        );
        assert!(closes("ZZZZ", history).unwrap().is_empty());
    }

    #[test]
    fn output_is_chronological() {
        let history = parse(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":0},
                "timestamp":[1718150400,1717977600],
                "indicators":{"quote":[{"close":[2.0,1.0]}]}
            }],"error":null}}"#,
        );
        let data = closes("TXT", history).unwrap();
        assert!(data.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(data[0].close, 1.0);
    }

    #[test]
    fn live_bar_merges_into_its_trading_day() {
        // 2024-06-09 09:30, 2024-06-10 09:30 and 2024-06-10 15:55 in New York
        let history = parse(
            r#"{"chart":{"result":[{
                "meta":{"gmtoffset":-14400},
                "timestamp":[1717939800,1718026200,1718049300],
                "indicators":{"quote":[{"close":[300.0,305.0,309.5]}]}
            }],"error":null}}"#,
        );

        let data = closes("HII", history).unwrap();
        let dates: Vec<String> = data.iter().map(|c| c.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-06-09", "2024-06-10"]);
        assert_eq!(data[0].close, 300.0);
        assert_eq!(data[1].close, 309.5);
    }

    #[test]
    fn not_found_error_maps_to_not_found() {
        let history = parse(
            r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#,
        );
        assert!(matches!(
            closes("NOPE", history),
            Err(UpstreamError::NotFound(symbol)) if symbol == "NOPE"
        ));
    }

    #[test]
    fn other_provider_errors_are_kept() {
        let history = parse(
            r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#,
        );
        match closes("HII", history) {
            Err(UpstreamError::Provider(message)) => assert!(message.contains("Bad Request")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
