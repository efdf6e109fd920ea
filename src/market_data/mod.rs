pub mod yahoo;

use anyhow::Result;

use crate::types::PriceSeries;

pub use yahoo::YahooClient;

/// Anything that can hand the engine a price series and an FX quote.
pub trait MarketDataSource {
    /// Hourly OHLCV series for `ticker`, oldest first.
    async fn fetch_series(&self, ticker: &str) -> Result<PriceSeries>;

    /// Most recent close of `ticker` (used for the USD/IDR quote).
    async fn fetch_latest_close(&self, ticker: &str) -> Result<f64>;
}

/// Pick the FX rate handed to the engine.
///
/// Falls back to `fallback` when the quote is missing, non-finite, or below
/// `min_plausible`.
pub fn resolve_fx_rate(quote: Option<f64>, fallback: f64, min_plausible: f64) -> f64 {
    match quote {
        Some(rate) if rate.is_finite() && rate >= min_plausible => rate,
        _ => fallback,
    }
}
