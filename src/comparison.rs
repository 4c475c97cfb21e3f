// =============================================================================
// Manual price comparisons: "analyze target" and one-shot alerts
// =============================================================================
//
// Both tools compare a user-entered price with the latest close of a freshly
// requested series:
//
//   percent_diff = (target - close) / close * 100
//
// Nothing is persisted; an alert is an acknowledgement, not a subscription.
// =============================================================================

use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{AlertDirection, PriceSide};

/// Reject anything that is not a finite, strictly positive price.
pub fn validate_target_price(target: f64) -> Result<f64, ValidationError> {
    if target.is_finite() && target > 0.0 {
        Ok(target)
    } else {
        Err(ValidationError::InvalidTargetPrice(target))
    }
}

/// Percentage distance of `target` from `current`. `None` when `current` is
/// not a usable price.
pub fn percent_diff(target: f64, current: f64) -> Option<f64> {
    if !current.is_finite() || current <= 0.0 {
        return None;
    }
    let diff = (target - current) / current * 100.0;
    diff.is_finite().then_some(diff)
}

/// Result of the "analyze target price" tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceComparison {
    pub symbol: String,
    pub current_price: f64,
    pub target_price: f64,
    pub percent_diff: f64,
    /// A target equal to the current price is reported as below.
    pub side: PriceSide,
}

impl PriceComparison {
    pub fn new(symbol: impl Into<String>, current_price: f64, target_price: f64) -> Option<Self> {
        let diff = percent_diff(target_price, current_price)?;
        let side = if diff > 0.0 {
            PriceSide::Above
        } else {
            PriceSide::Below
        };

        Some(Self {
            symbol: symbol.into(),
            current_price,
            target_price,
            percent_diff: diff,
            side,
        })
    }
}

/// Acknowledgement returned when a user sets a price alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertAck {
    pub symbol: String,
    pub current_price: f64,
    pub target_price: f64,
    pub direction: AlertDirection,
    pub percent_diff: f64,
    /// The current price already satisfies the alert condition.
    pub already_met: bool,
}

impl AlertAck {
    pub fn new(
        symbol: impl Into<String>,
        current_price: f64,
        target_price: f64,
        direction: AlertDirection,
    ) -> Option<Self> {
        let diff = percent_diff(target_price, current_price)?;
        let already_met = match direction {
            AlertDirection::Above => current_price >= target_price,
            AlertDirection::Below => current_price <= target_price,
        };

        Some(Self {
            symbol: symbol.into(),
            current_price,
            target_price,
            direction,
            percent_diff: diff,
            already_met,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_above_current() {
        let cmp = PriceComparison::new("AAPL", 100.0, 150.0).unwrap();
        assert!((cmp.percent_diff - 50.0).abs() < 1e-12);
        assert_eq!(cmp.side, PriceSide::Above);
    }

    #[test]
    fn target_below_current() {
        let cmp = PriceComparison::new("AAPL", 200.0, 150.0).unwrap();
        assert!((cmp.percent_diff + 25.0).abs() < 1e-12);
        assert_eq!(cmp.side, PriceSide::Below);
    }

    #[test]
    fn equal_price_counts_as_below() {
        let cmp = PriceComparison::new("AAPL", 100.0, 100.0).unwrap();
        assert_eq!(cmp.percent_diff, 0.0);
        assert_eq!(cmp.side, PriceSide::Below);
    }

    #[test]
    fn unusable_current_price() {
        assert!(percent_diff(10.0, 0.0).is_none());
        assert!(percent_diff(10.0, -1.0).is_none());
        assert!(percent_diff(10.0, f64::NAN).is_none());
        assert!(PriceComparison::new("AAPL", 0.0, 10.0).is_none());
    }

    #[test]
    fn target_validation() {
        assert_eq!(validate_target_price(12.5), Ok(12.5));
        assert!(validate_target_price(0.0).is_err());
        assert!(validate_target_price(-3.0).is_err());
        assert!(validate_target_price(f64::INFINITY).is_err());
    }

    #[test]
    fn alert_already_met() {
        let ack = AlertAck::new("TSLA", 250.0, 240.0, AlertDirection::Above).unwrap();
        assert!(ack.already_met);
        let ack = AlertAck::new("TSLA", 250.0, 240.0, AlertDirection::Below).unwrap();
        assert!(!ack.already_met);
        assert!((ack.percent_diff + 4.0).abs() < 1e-12);
    }
}
