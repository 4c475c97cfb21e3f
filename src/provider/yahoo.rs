// =============================================================================
// Yahoo Finance REST client: chart history and company summary
// =============================================================================
//
// Two public, unauthenticated endpoints are used:
//   - /v8/finance/chart/{symbol}           OHLCV history for a range/interval
//   - /v10/finance/quoteSummary/{symbol}   name, sector, valuation figures
//
// Chart timestamps are UNIX seconds; `meta.gmtoffset` gives the exchange's UTC
// offset so bars can be stamped in exchange-local time.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{FixedOffset, TimeZone};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::market_data::{CompanyProfile, PriceBar};
use crate::provider::MarketDataProvider;
use crate::types::{Interval, Period};

/// Modules requested from quoteSummary.
const SUMMARY_MODULES: &str = "price,assetProfile,summaryDetail";

/// Yahoo Finance client. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct YahooClient {
    chart_base_url: String,
    summary_base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        debug!(
            chart = %config.chart_base_url,
            summary = %config.summary_base_url,
            "YahooClient initialised"
        );

        Ok(Self {
            chart_base_url: config.chart_base_url.trim_end_matches('/').to_string(),
            summary_base_url: config.summary_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    // -------------------------------------------------------------------------
    // Endpoints
    // -------------------------------------------------------------------------

    /// GET /v8/finance/chart/{symbol}?range=..&interval=..
    #[instrument(skip(self), name = "yahoo::get_chart")]
    pub async fn get_chart(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.chart_base_url, symbol, period, interval
        );

        let body = self.get_json(&url).await?;
        let bars = parse_chart(&body)?;

        debug!(symbol, %period, %interval, count = bars.len(), "chart fetched");
        Ok(bars)
    }

    /// GET /v10/finance/quoteSummary/{symbol}?modules=..
    #[instrument(skip(self), name = "yahoo::get_summary")]
    pub async fn get_summary(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}",
            self.summary_base_url, symbol, SUMMARY_MODULES
        );

        let body = self.get_json(&url).await?;
        let profile = parse_summary(symbol, &body)?;

        debug!(symbol, name = %profile.name, "summary fetched");
        Ok(profile)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NoData);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, url, "Yahoo request failed");
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<Value>().await?)
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        self.get_chart(symbol, period, interval).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
        self.get_summary(symbol).await
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("chart_base_url", &self.chart_base_url)
            .field("summary_base_url", &self.summary_base_url)
            .finish()
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Parse a chart response into bars.
///
/// Entries where any of open/high/low/close is null are skipped (Yahoo emits
/// those for halted or not-yet-printed slots). A missing volume counts as 0.
pub fn parse_chart(body: &Value) -> Result<Vec<PriceBar>, ProviderError> {
    let chart = body
        .get("chart")
        .ok_or_else(|| ProviderError::Malformed("missing 'chart' object".into()))?;

    if let Some(err) = chart.get("error").filter(|e| !e.is_null()) {
        debug!(error = %err, "chart endpoint reported an error");
        return Err(ProviderError::NoData);
    }

    let result = chart
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or(ProviderError::NoData)?;

    // No trading in the requested range: Yahoo omits the timestamp array.
    let Some(timestamps) = result.get("timestamp").and_then(Value::as_array) else {
        return Err(ProviderError::NoData);
    };

    let offset_secs = result["meta"]["gmtoffset"].as_i64().unwrap_or(0);
    let tz = i32::try_from(offset_secs)
        .ok()
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ProviderError::Malformed(format!("bad gmtoffset {offset_secs}")))?;

    let quote = &result["indicators"]["quote"][0];
    let opens = quote_column(quote, "open")?;
    let highs = quote_column(quote, "high")?;
    let lows = quote_column(quote, "low")?;
    let closes = quote_column(quote, "close")?;
    let volumes = quote.get("volume").and_then(Value::as_array);

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let fields = (
            ts.as_i64().and_then(|t| tz.timestamp_opt(t, 0).single()),
            opens.get(i).and_then(Value::as_f64),
            highs.get(i).and_then(Value::as_f64),
            lows.get(i).and_then(Value::as_f64),
            closes.get(i).and_then(Value::as_f64),
        );
        let (Some(timestamp), Some(open), Some(high), Some(low), Some(close)) = fields else {
            skipped += 1;
            continue;
        };
        let volume = volumes
            .and_then(|v| v.get(i))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        bars.push(PriceBar::new(timestamp, open, high, low, close, volume));
    }

    if skipped > 0 {
        debug!(skipped, "skipped incomplete chart entries");
    }
    if bars.is_empty() {
        return Err(ProviderError::NoData);
    }

    Ok(bars)
}

/// Parse a quoteSummary response into a [`CompanyProfile`].
pub fn parse_summary(symbol: &str, body: &Value) -> Result<CompanyProfile, ProviderError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| ProviderError::Malformed("missing 'quoteSummary' object".into()))?;

    if let Some(err) = summary.get("error").filter(|e| !e.is_null()) {
        debug!(error = %err, "quoteSummary endpoint reported an error");
        return Err(ProviderError::NoData);
    }

    let result = summary
        .get("result")
        .and_then(Value::as_array)
        .and_then(|r| r.first())
        .ok_or(ProviderError::NoData)?;

    let price = &result["price"];
    let asset = &result["assetProfile"];
    let detail = &result["summaryDetail"];

    let name = non_empty_str(&price["longName"])
        .or_else(|| non_empty_str(&price["shortName"]))
        .unwrap_or_else(|| symbol.to_string());

    Ok(CompanyProfile {
        symbol: symbol.to_string(),
        name,
        sector: non_empty_str(&asset["sector"]),
        industry: non_empty_str(&asset["industry"]),
        market_cap: raw_f64(&price["marketCap"]),
        pe_ratio: raw_f64(&detail["trailingPE"]),
        dividend_yield: raw_f64(&detail["dividendYield"]),
    })
}

fn quote_column<'a>(quote: &'a Value, name: &str) -> Result<&'a Vec<Value>, ProviderError> {
    quote
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Malformed(format!("quote is missing '{name}'")))
}

/// Yahoo wraps numbers as `{ "raw": 1.23, "fmt": "1.23" }`; accept bare
/// numbers too.
fn raw_f64(val: &Value) -> Option<f64> {
    val.get("raw")
        .and_then(Value::as_f64)
        .or_else(|| val.as_f64())
        .filter(|v| v.is_finite())
}

fn non_empty_str(val: &Value) -> Option<String> {
    val.as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
