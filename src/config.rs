// =============================================================================
// Dashboard Configuration
// =============================================================================
//
// Every tunable lives here. All fields carry serde defaults so a partial (or
// empty) JSON file loads cleanly and new fields never break old files.
// Environment variables override the file for the values most often changed
// per deployment.
// =============================================================================

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::EvictionPolicy;
use crate::indicators::IndicatorParams;
use crate::types::{Interval, Period};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbols() -> Vec<String> {
    vec![
        "AAPL".to_string(),
        "GOOGL".to_string(),
        "MSFT".to_string(),
        "AMZN".to_string(),
        "TSLA".to_string(),
    ]
}

fn default_bind_addr() -> String {
    "0.0.0.0:8050".to_string()
}

fn default_chart_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_summary_base_url() -> String {
    "https://query2.finance.yahoo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("stock-dashboard/", env!("CARGO_PKG_VERSION")).to_string()
}

// =============================================================================
// ProviderConfig
// =============================================================================

/// Where and how to reach the market data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_chart_base_url")]
    pub chart_base_url: String,

    #[serde(default = "default_summary_base_url")]
    pub summary_base_url: String,

    /// Upper bound on a single provider call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            chart_base_url: default_chart_base_url(),
            summary_base_url: default_summary_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// CacheConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Defaults to keeping every series for the lifetime of the process.
    #[serde(default)]
    pub eviction: EvictionPolicy,
}

// =============================================================================
// DashboardConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Tickers offered in the symbol selector. Requests for anything else are
    /// rejected.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    #[serde(default)]
    pub default_period: Period,

    #[serde(default)]
    pub default_interval: Interval,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub indicators: IndicatorParams,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            default_period: Period::default(),
            default_interval: Interval::default(),
            bind_addr: default_bind_addr(),
            provider: ProviderConfig::default(),
            cache: CacheConfig::default(),
            indicators: IndicatorParams::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dashboard config from {}", path.display()))?;
        config
            .indicators
            .validate()
            .with_context(|| format!("invalid indicator settings in {}", path.display()))?;

        info!(
            path = %path.display(),
            symbols = ?config.symbols,
            eviction = ?config.cache.eviction,
            "dashboard config loaded"
        );

        Ok(config)
    }

    /// Apply `DASHBOARD_SYMBOLS` / `DASHBOARD_BIND_ADDR` when they are set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("DASHBOARD_SYMBOLS").ok().as_deref(),
            std::env::var("DASHBOARD_BIND_ADDR").ok().as_deref(),
        );
    }

    fn apply_overrides(&mut self, symbols: Option<&str>, bind_addr: Option<&str>) {
        if let Some(syms) = symbols {
            let parsed: Vec<String> = syms
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.symbols = parsed;
            }
        }
        if let Some(addr) = bind_addr.map(str::trim).filter(|a| !a.is_empty()) {
            self.bind_addr = addr.to_string();
        }

        // Tickers are matched upper-case everywhere.
        for s in &mut self.symbols {
            *s = s.trim().to_uppercase();
        }
        let mut seen = HashSet::new();
        self.symbols.retain(|s| !s.is_empty() && seen.insert(s.clone()));
        if self.symbols.is_empty() {
            self.symbols = default_symbols();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.symbols, vec!["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"]);
        assert_eq!(cfg.default_period, Period::OneYear);
        assert_eq!(cfg.default_interval, Interval::OneDay);
        assert_eq!(cfg.provider.timeout_secs, 10);
        assert_eq!(cfg.cache.eviction, EvictionPolicy::None);
        assert_eq!(cfg.indicators, IndicatorParams::default());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: DashboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbols.len(), 5);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8050");
        assert_eq!(cfg.cache.eviction, EvictionPolicy::None);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "symbols": ["NVDA"],
            "default_period": "3mo",
            "provider": { "timeout_secs": 3 },
            "cache": { "eviction": { "ttl": { "secs": 300 } } }
        }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbols, vec!["NVDA"]);
        assert_eq!(cfg.default_period, Period::ThreeMonths);
        assert_eq!(cfg.default_interval, Interval::OneDay);
        assert_eq!(cfg.provider.timeout_secs, 3);
        assert_eq!(cfg.provider.chart_base_url, default_chart_base_url());
        assert_eq!(cfg.cache.eviction, EvictionPolicy::Ttl { secs: 300 });
    }

    #[test]
    fn overrides_replace_symbols_and_addr() {
        let mut cfg = DashboardConfig::default();
        cfg.apply_overrides(Some(" nvda, amd ,,"), Some("127.0.0.1:9000"));
        assert_eq!(cfg.symbols, vec!["NVDA", "AMD"]);
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn empty_override_keeps_file_values() {
        let mut cfg = DashboardConfig::default();
        cfg.symbols = vec!["meta".into()];
        cfg.apply_overrides(Some(" , "), None);
        assert_eq!(cfg.symbols, vec!["META"]);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8050");
    }

    #[test]
    fn overrides_drop_repeated_symbols() {
        let mut cfg = DashboardConfig::default();
        cfg.apply_overrides(Some("AAPL,MSFT,aapl, msft ,TSLA"), None);
        assert_eq!(cfg.symbols, vec!["AAPL", "MSFT", "TSLA"]);

        let mut cfg = DashboardConfig::default();
        cfg.symbols = vec!["AAPL".into(), "MSFT".into(), "AAPL".into()];
        cfg.apply_overrides(None, None);
        assert_eq!(cfg.symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn load_rejects_zero_indicator_span() {
        let path = std::env::temp_dir().join(format!(
            "dashboard_config_zero_span_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "indicators": { "macd_signal": 0 } }"#).unwrap();

        let result = DashboardConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("macd_signal"));
    }

    #[test]
    fn load_accepts_valid_file() {
        let path = std::env::temp_dir().join(format!(
            "dashboard_config_valid_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "indicators": { "rsi_period": 7 } }"#).unwrap();

        let result = DashboardConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap().indicators.rsi_period, 7);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(DashboardConfig::load("/nonexistent/dashboard_config.json").is_err());
    }
}
