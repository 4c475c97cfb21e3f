pub mod bar;
pub mod enriched;
pub mod profile;

// Re-exports for convenient access (e.g. `use crate::market_data::PriceBar`).
pub use bar::{PriceBar, PriceSeries};
pub use enriched::{EnrichedSeries, LatestReading};
pub use profile::CompanyProfile;
