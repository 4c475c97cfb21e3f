// =============================================================================
// Dashboard Service: series cache & fetch orchestration
// =============================================================================
//
// Request flow for an enriched series:
//   1. Key = (symbol, period, interval), validated before anything else.
//   2. Cache hit  => hand back the stored series untouched.
//   3. Cache miss => fetch bars (bounded by a timeout), run the indicators,
//      publish the complete series into the cache, return it.
//   4. Provider failure or no bars => empty series plus the reason. Failures
//      are never cached, so the next request tries the provider again.
//
// Company profiles always go to the provider.
// =============================================================================

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, EvictionPolicy, SeriesCache};
use crate::comparison::{validate_target_price, AlertAck, PriceComparison};
use crate::error::{ProviderError, ValidationError};
use crate::indicators::IndicatorParams;
use crate::market_data::{CompanyProfile, EnrichedSeries, PriceSeries};
use crate::provider::MarketDataProvider;
use crate::types::{normalize_symbol, AlertDirection, Interval, Period, SeriesKey};

/// Series used by the "analyze target price" tool.
const ANALYZE_PERIOD: Period = Period::OneMonth;
const ANALYZE_INTERVAL: Interval = Interval::OneDay;

/// Series used by the price alert tool.
const ALERT_PERIOD: Period = Period::OneDay;
const ALERT_INTERVAL: Interval = Interval::OneDay;

// =============================================================================
// Outcomes
// =============================================================================

/// Result of an enriched-series request.
#[derive(Debug, Clone)]
pub enum SeriesOutcome {
    /// Served from the cache without touching the provider.
    Cached(Arc<EnrichedSeries>),
    /// Fetched, enriched and cached by this request.
    Fetched(Arc<EnrichedSeries>),
    /// Nothing to show; the reason says why.
    Empty {
        series: Arc<EnrichedSeries>,
        reason: ProviderError,
    },
}

impl SeriesOutcome {
    /// The series to render. Empty when the provider produced nothing.
    pub fn series(&self) -> &Arc<EnrichedSeries> {
        match self {
            Self::Cached(s) | Self::Fetched(s) => s,
            Self::Empty { series, .. } => series,
        }
    }

    pub fn reason(&self) -> Option<&ProviderError> {
        match self {
            Self::Empty { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Cached(_) => "cached",
            Self::Fetched(_) => "fetched",
            Self::Empty { .. } => "empty",
        }
    }
}

/// Result of a company profile request.
#[derive(Debug, Clone)]
pub enum ProfileOutcome {
    Found(CompanyProfile),
    Absent(ProviderError),
}

impl ProfileOutcome {
    pub fn profile(&self) -> Option<&CompanyProfile> {
        match self {
            Self::Found(p) => Some(p),
            Self::Absent(_) => None,
        }
    }
}

/// Result of a manual comparison: either the computed value or the reason
/// no current price was available.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome<T> {
    Ready(T),
    NoData { reason: String, code: &'static str },
}

impl<T> ComparisonOutcome<T> {
    fn no_data(err: &ProviderError) -> Self {
        Self::NoData {
            reason: err.to_string(),
            code: err.code(),
        }
    }
}

// =============================================================================
// DashboardService
// =============================================================================

pub struct DashboardService {
    provider: Arc<dyn MarketDataProvider>,
    cache: SeriesCache,
    params: IndicatorParams,
    symbols: Vec<String>,
    timeout: Duration,
}

impl DashboardService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        symbols: Vec<String>,
        params: IndicatorParams,
        eviction: EvictionPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache: SeriesCache::new(eviction),
            params,
            symbols,
            timeout,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // ── Enriched series ─────────────────────────────────────────────────

    /// Validate raw request strings, then serve the enriched series.
    pub async fn get_series(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<SeriesOutcome, ValidationError> {
        let key = SeriesKey::parse(symbol, period, interval, &self.symbols)?;
        Ok(self.get_enriched_series(&key).await)
    }

    /// Serve `key` from the cache, or fetch, enrich and cache it.
    pub async fn get_enriched_series(&self, key: &SeriesKey) -> SeriesOutcome {
        if let Some(series) = self.cache.get(key) {
            debug!(%key, bars = series.len(), "series cache hit");
            return SeriesOutcome::Cached(series);
        }

        info!(%key, "series cache miss, fetching from provider");

        let fetched = self
            .bounded(self.provider.fetch_bars(&key.symbol, key.period, key.interval))
            .await;

        let bars = match fetched {
            Ok(bars) if !bars.is_empty() => bars,
            Ok(_) => return self.empty(key, ProviderError::NoData),
            Err(e) => return self.empty(key, e),
        };

        let series = Arc::new(EnrichedSeries::build(
            key.clone(),
            PriceSeries::from_bars(bars),
            self.params,
        ));
        self.cache.insert(key.clone(), Arc::clone(&series));

        info!(%key, bars = series.len(), "series enriched and cached");
        SeriesOutcome::Fetched(series)
    }

    fn empty(&self, key: &SeriesKey, reason: ProviderError) -> SeriesOutcome {
        warn!(%key, error = %reason, "no series available");
        SeriesOutcome::Empty {
            series: Arc::new(EnrichedSeries::empty(key.clone(), self.params)),
            reason,
        }
    }

    // ── Company profile ─────────────────────────────────────────────────

    pub async fn get_company_profile(&self, symbol: &str) -> Result<ProfileOutcome, ValidationError> {
        let symbol = normalize_symbol(symbol, &self.symbols)?;

        match self.bounded(self.provider.fetch_profile(&symbol)).await {
            Ok(profile) => Ok(ProfileOutcome::Found(profile)),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "company profile unavailable");
                Ok(ProfileOutcome::Absent(e))
            }
        }
    }

    // ── Manual comparisons ──────────────────────────────────────────────

    /// Compare `target_price` with the latest daily close of the past month.
    pub async fn analyze_price(
        &self,
        symbol: &str,
        target_price: f64,
    ) -> Result<ComparisonOutcome<PriceComparison>, ValidationError> {
        let target = validate_target_price(target_price)?;
        let key = SeriesKey::new(
            normalize_symbol(symbol, &self.symbols)?,
            ANALYZE_PERIOD,
            ANALYZE_INTERVAL,
        );

        let current = match self.latest_close(&key).await {
            Ok(c) => c,
            Err(e) => return Ok(ComparisonOutcome::no_data(&e)),
        };

        Ok(match PriceComparison::new(key.symbol.as_str(), current, target) {
            Some(cmp) => {
                info!(symbol = %cmp.symbol, diff = cmp.percent_diff, side = %cmp.side, "target price analysed");
                ComparisonOutcome::Ready(cmp)
            }
            None => ComparisonOutcome::no_data(&ProviderError::NoData),
        })
    }

    /// Acknowledge a one-shot price alert against the latest close.
    pub async fn set_price_alert(
        &self,
        symbol: &str,
        target_price: f64,
        direction: AlertDirection,
    ) -> Result<ComparisonOutcome<AlertAck>, ValidationError> {
        let target = validate_target_price(target_price)?;
        let key = SeriesKey::new(
            normalize_symbol(symbol, &self.symbols)?,
            ALERT_PERIOD,
            ALERT_INTERVAL,
        );

        let current = match self.latest_close(&key).await {
            Ok(c) => c,
            Err(e) => return Ok(ComparisonOutcome::no_data(&e)),
        };

        Ok(match AlertAck::new(key.symbol.as_str(), current, target, direction) {
            Some(ack) => {
                info!(symbol = %ack.symbol, target, direction = %direction, "price alert acknowledged");
                ComparisonOutcome::Ready(ack)
            }
            None => ComparisonOutcome::no_data(&ProviderError::NoData),
        })
    }

    async fn latest_close(&self, key: &SeriesKey) -> Result<f64, ProviderError> {
        let outcome = self.get_enriched_series(key).await;
        if let Some(reason) = outcome.reason() {
            return Err(reason.clone());
        }
        outcome.series().latest_close().ok_or(ProviderError::NoData)
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// Bound a provider call by the configured timeout.
    async fn bounded<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_secs())),
        }
    }
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("symbols", &self.symbols)
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .finish()
    }
}
