use serde::{Deserialize, Serialize};

/// Company descriptors shown next to the charts. Missing fields are rendered
/// as "N/A" by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    /// Long company name; falls back to the ticker when the provider has none.
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Fraction, not percent (0.005 == 0.5 %).
    pub dividend_yield: Option<f64>,
}

impl CompanyProfile {
    /// A profile that carries nothing but the ticker.
    pub fn bare(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            sector: None,
            industry: None,
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
        }
    }
}
