// =============================================================================
// Shared types used across the dashboard service
// =============================================================================
//
// Request parameters arrive as free-form strings from the browser. They are
// parsed into closed enumerations here, before anything talks to the market
// data provider.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// History span requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
        Self::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedPeriod(s.to_string()))
    }
}

/// Bar granularity requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
}

impl Interval {
    pub const ALL: [Interval; 4] = [
        Self::OneDay,
        Self::OneHour,
        Self::FifteenMinutes,
        Self::FiveMinutes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneHour => "1h",
            Self::FifteenMinutes => "15m",
            Self::FiveMinutes => "5m",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interval {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| ValidationError::UnsupportedInterval(s.to_string()))
    }
}

/// Normalise a user-entered ticker and check it against the configured list.
pub fn normalize_symbol(raw: &str, allowed: &[String]) -> Result<String, ValidationError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() || !allowed.iter().any(|s| s.eq_ignore_ascii_case(&symbol)) {
        return Err(ValidationError::UnknownSymbol(raw.trim().to_string()));
    }
    Ok(symbol)
}

/// Validated cache key: one enriched series exists per distinct key.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub period: Period,
    pub interval: Interval,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, period: Period, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            interval,
        }
    }

    /// Parse raw request strings. Nothing reaches the provider unless this
    /// succeeds.
    pub fn parse(
        symbol: &str,
        period: &str,
        interval: &str,
        allowed_symbols: &[String],
    ) -> Result<Self, ValidationError> {
        let symbol = normalize_symbol(symbol, allowed_symbols)?;
        Ok(Self {
            symbol,
            period: period.parse()?,
            interval: interval.parse()?,
        })
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.symbol, self.period, self.interval)
    }
}

/// Direction a one-shot price alert watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Above,
    Below,
}

impl std::fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

/// Where a target price sits relative to the latest close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSide {
    Above,
    Below,
}

impl std::fmt::Display for PriceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<String> {
        vec!["AAPL".into(), "MSFT".into()]
    }

    #[test]
    fn period_parses_every_wire_form() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
        assert!(matches!(
            "2y".parse::<Period>(),
            Err(ValidationError::UnsupportedPeriod(_))
        ));
    }

    #[test]
    fn interval_rejects_unknown() {
        assert_eq!(" 15m ".parse::<Interval>().unwrap(), Interval::FifteenMinutes);
        assert!(matches!(
            "1m".parse::<Interval>(),
            Err(ValidationError::UnsupportedInterval(_))
        ));
    }

    #[test]
    fn symbol_is_normalised() {
        assert_eq!(normalize_symbol(" aapl ", &symbols()).unwrap(), "AAPL");
        assert!(matches!(
            normalize_symbol("TSLA", &symbols()),
            Err(ValidationError::UnknownSymbol(_))
        ));
        assert!(normalize_symbol("", &symbols()).is_err());
    }

    #[test]
    fn series_key_parse_and_display() {
        let key = SeriesKey::parse("msft", "3mo", "1h", &symbols()).unwrap();
        assert_eq!(key, SeriesKey::new("MSFT", Period::ThreeMonths, Interval::OneHour));
        assert_eq!(key.to_string(), "MSFT_3mo_1h");
    }

    #[test]
    fn defaults_are_one_year_daily() {
        assert_eq!(Period::default(), Period::OneYear);
        assert_eq!(Interval::default(), Interval::OneDay);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Period::OneMonth).unwrap();
        assert_eq!(json, "\"1mo\"");
        let iv: Interval = serde_json::from_str("\"5m\"").unwrap();
        assert_eq!(iv, Interval::FiveMinutes);
        let dir: AlertDirection = serde_json::from_str("\"below\"").unwrap();
        assert_eq!(dir, AlertDirection::Below);
    }
}
