// =============================================================================
// Enriched series: bars plus index-aligned indicator columns
// =============================================================================
//
// Every derived column has exactly one entry per bar. Once built the value is
// never mutated; the cache hands out shared references to it.
// =============================================================================

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::indicators::{
    calculate_macd, calculate_rsi, calculate_sma, rsi_zone, IndicatorParams, RsiZone,
};
use crate::market_data::{PriceBar, PriceSeries};
use crate::types::SeriesKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    pub key: SeriesKey,
    pub params: IndicatorParams,
    pub bars: Vec<PriceBar>,
    pub sma_fast: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<f64>,
    pub signal_line: Vec<f64>,
}

impl EnrichedSeries {
    /// Run every indicator over `series` and assemble the result.
    pub fn build(key: SeriesKey, series: PriceSeries, params: IndicatorParams) -> Self {
        let closes = series.closes();
        let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);

        Self {
            sma_fast: calculate_sma(&closes, params.sma_fast),
            sma_slow: calculate_sma(&closes, params.sma_slow),
            rsi: calculate_rsi(&closes, params.rsi_period),
            macd: macd.macd,
            signal_line: macd.signal,
            bars: series.into_bars(),
            key,
            params,
        }
    }

    /// The "no data" value: no bars and no derived entries.
    pub fn empty(key: SeriesKey, params: IndicatorParams) -> Self {
        Self {
            key,
            params,
            bars: Vec::new(),
            sma_fast: Vec::new(),
            sma_slow: Vec::new(),
            rsi: Vec::new(),
            macd: Vec::new(),
            signal_line: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Snapshot of the most recent bar and its indicator readings.
    pub fn latest(&self) -> Option<LatestReading> {
        let idx = self.bars.len().checked_sub(1)?;
        let bar = &self.bars[idx];
        let rsi = self.rsi.get(idx).copied().flatten();

        Some(LatestReading {
            timestamp: bar.timestamp,
            close: bar.close,
            sma_fast: self.sma_fast.get(idx).copied().flatten(),
            sma_slow: self.sma_slow.get(idx).copied().flatten(),
            rsi,
            rsi_zone: rsi.map(rsi_zone),
            macd: self.macd.get(idx).copied(),
            signal_line: self.signal_line.get(idx).copied(),
        })
    }
}

/// Readings at the last bar of an enriched series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestReading {
    pub timestamp: DateTime<FixedOffset>,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_fast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma_slow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi_zone: Option<RsiZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_line: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Interval, Period};
    use chrono::TimeZone;

    fn key() -> SeriesKey {
        SeriesKey::new("AAPL", Period::OneYear, Interval::OneDay)
    }

    fn series_of(closes: &[f64]) -> PriceSeries {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let ts = tz.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap();
                PriceBar::new(ts, c, c, c, c, 1_000.0)
            })
            .collect();
        PriceSeries::from_bars(bars)
    }

    #[test]
    fn every_column_is_aligned() {
        let closes: Vec<f64> = (0..75).map(|i| 100.0 + (i as f64 * 0.4).cos() * 3.0).collect();
        let enriched = EnrichedSeries::build(key(), series_of(&closes), IndicatorParams::default());
        let n = closes.len();
        assert_eq!(enriched.len(), n);
        assert_eq!(enriched.sma_fast.len(), n);
        assert_eq!(enriched.sma_slow.len(), n);
        assert_eq!(enriched.rsi.len(), n);
        assert_eq!(enriched.macd.len(), n);
        assert_eq!(enriched.signal_line.len(), n);

        assert!(enriched.sma_fast[..19].iter().all(Option::is_none));
        assert!(enriched.sma_fast[19].is_some());
        assert!(enriched.sma_slow[..49].iter().all(Option::is_none));
        assert!(enriched.sma_slow[49].is_some());
        assert!(enriched.rsi[..14].iter().all(Option::is_none));
        assert_eq!(enriched.macd[0], 0.0);
    }

    #[test]
    fn short_history_leaves_indicators_undefined() {
        let enriched = EnrichedSeries::build(key(), series_of(&[10.0, 11.0, 12.0]), IndicatorParams::default());
        assert_eq!(enriched.len(), 3);
        assert!(enriched.sma_fast.iter().all(Option::is_none));
        assert!(enriched.rsi.iter().all(Option::is_none));
        assert_eq!(enriched.macd.len(), 3);
    }

    #[test]
    fn empty_input_gives_empty_columns() {
        let enriched = EnrichedSeries::build(key(), PriceSeries::default(), IndicatorParams::default());
        assert!(enriched.is_empty());
        assert!(enriched.macd.is_empty());
        assert!(enriched.latest().is_none());
        assert_eq!(enriched, EnrichedSeries::empty(key(), IndicatorParams::default()));
    }

    #[test]
    fn latest_reading_reports_last_bar() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let enriched = EnrichedSeries::build(key(), series_of(&closes), IndicatorParams::default());
        let latest = enriched.latest().unwrap();
        assert_eq!(latest.close, 30.0);
        assert_eq!(enriched.latest_close(), Some(30.0));
        assert!((latest.sma_fast.unwrap() - 20.5).abs() < 1e-12);
        assert!(latest.sma_slow.is_none());
        assert_eq!(latest.rsi, Some(100.0));
        assert_eq!(latest.rsi_zone, Some(RsiZone::Overbought));
    }
}
