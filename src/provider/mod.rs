// =============================================================================
// Market data provider seam
// =============================================================================
//
// The dashboard never talks to a vendor directly: everything goes through
// `MarketDataProvider`, so the orchestrator can be exercised with an
// in-memory provider and the vendor can be swapped without touching it.
// =============================================================================

pub mod yahoo;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::market_data::{CompanyProfile, PriceBar};
use crate::types::{Interval, Period};

pub use yahoo::YahooClient;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Historical bars for `symbol` over `period` at `interval`.
    async fn fetch_bars(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, ProviderError>;

    /// Descriptive company information for `symbol`.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError>;
}

#[cfg(test)]
pub mod testing {
    //! Scripted provider for orchestrator and router tests.

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::{FixedOffset, TimeZone};

    use super::*;

    pub struct ScriptedProvider {
        pub closes: Vec<f64>,
        pub failing: AtomicBool,
        pub delay: Option<Duration>,
        pub bar_calls: AtomicUsize,
        pub profile_calls: AtomicUsize,
    }

    impl ScriptedProvider {
        pub fn with_closes(closes: Vec<f64>) -> Self {
            Self {
                closes,
                failing: AtomicBool::new(false),
                delay: None,
                bar_calls: AtomicUsize::new(0),
                profile_calls: AtomicUsize::new(0),
            }
        }

        pub fn ramp(n: usize) -> Self {
            Self::with_closes((1..=n).map(|x| 100.0 + x as f64).collect())
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn bar_calls(&self) -> usize {
            self.bar_calls.load(Ordering::SeqCst)
        }

        pub fn profile_calls(&self) -> usize {
            self.profile_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        async fn fetch_bars(
            &self,
            _symbol: &str,
            _period: Period,
            _interval: Interval,
        ) -> Result<Vec<PriceBar>, ProviderError> {
            self.bar_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(ProviderError::Network("connection refused".into()));
            }

            let tz = FixedOffset::west_opt(5 * 3600).expect("valid offset");
            Ok(self
                .closes
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let ts = tz
                        .timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0)
                        .single()
                        .expect("valid timestamp");
                    PriceBar::new(ts, c, c + 0.5, c - 0.5, c, 10_000.0)
                })
                .collect())
        }

        async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, ProviderError> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(ProviderError::Network("connection refused".into()));
            }
            Ok(CompanyProfile {
                sector: Some("Technology".into()),
                market_cap: Some(3.0e12),
                ..CompanyProfile::bare(symbol)
            })
        }
    }
}
