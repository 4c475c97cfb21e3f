// =============================================================================
// Central Application State: Stock Dashboard
// =============================================================================
//
// Ties the configuration, the series orchestrator and the provider error log
// together for the HTTP handlers. Shared across tasks as `Arc<AppState>`.
//
// Thread safety:
//   - The service owns its cache and manages its own interior mutability.
//   - parking_lot::RwLock for the recent error ring.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::provider::MarketDataProvider;
use crate::service::DashboardService;

// =============================================================================
// Error Record
// =============================================================================

/// A provider failure kept for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error code (e.g. `provider_timeout`).
    pub code: Option<String>,
    /// ISO 8601 timestamp.
    pub at: String,
}

// =============================================================================
// AppState
// =============================================================================

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

pub struct AppState {
    pub config: DashboardConfig,
    pub service: DashboardService,
    pub recent_errors: RwLock<Vec<ErrorRecord>>,
    /// Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build the orchestrator from `config` on top of `provider`.
    pub fn new(config: DashboardConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        let service = DashboardService::new(
            provider,
            config.symbols.clone(),
            config.indicators,
            config.cache.eviction,
            Duration::from_secs(config.provider.timeout_secs),
        );

        Self {
            config,
            service,
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    // ── Error Logging ───────────────────────────────────────────────────

    /// Record an error. The ring buffer is capped at [`MAX_RECENT_ERRORS`];
    /// oldest entries are evicted when the limit is reached.
    pub fn push_error(&self, msg: String, code: Option<String>) {
        let record = ErrorRecord {
            message: msg,
            code,
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::ScriptedProvider;

    #[test]
    fn error_ring_is_capped() {
        let state = AppState::new(
            DashboardConfig::default(),
            Arc::new(ScriptedProvider::ramp(1)),
        );
        for i in 0..(MAX_RECENT_ERRORS + 5) {
            state.push_error(format!("failure {i}"), Some("no_data".into()));
        }

        let errors = state.recent_errors();
        assert_eq!(errors.len(), MAX_RECENT_ERRORS);
        assert_eq!(errors[0].message, "failure 5");
        assert_eq!(
            errors.last().map(|e| e.message.as_str()),
            Some("failure 54")
        );
    }

    #[test]
    fn service_uses_configured_symbols() {
        let mut config = DashboardConfig::default();
        config.symbols = vec!["NVDA".into()];
        let state = AppState::new(config, Arc::new(ScriptedProvider::ramp(1)));
        assert_eq!(state.service.symbols(), ["NVDA".to_string()]);
    }
}
