// =============================================================================
// Shared types used across the Market Sniper engine
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar open time, UNIX seconds.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PricePoint {
    fn is_usable(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0) && self.volume.is_finite()
    }
}

/// Chronologically ascending OHLCV series with unique timestamps.
///
/// Construction normalises whatever the data source handed us: rows are
/// sorted by timestamp, a duplicated timestamp keeps the last row seen, and
/// rows with non-finite values or non-positive prices are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        let total = points.len();
        let mut usable: Vec<PricePoint> = points.into_iter().filter(PricePoint::is_usable).collect();
        let dropped = total - usable.len();
        if dropped > 0 {
            warn!(dropped, total, "dropped unusable price rows");
        }

        // Stable sort keeps arrival order among equal timestamps, so the
        // dedup below retains the most recent row for each timestamp.
        usable.sort_by_key(|p| p.timestamp);
        let mut points: Vec<PricePoint> = Vec::with_capacity(usable.len());
        for p in usable {
            match points.last_mut() {
                Some(last) if last.timestamp == p.timestamp => *last = p,
                _ => points.push(p),
            }
        }

        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Multiply open/high/low/close by `multiplier`. Volume is untouched.
    pub fn scaled(&self, multiplier: f64) -> Self {
        let points = self
            .points
            .iter()
            .map(|p| PricePoint {
                open: p.open * multiplier,
                high: p.high * multiplier,
                low: p.low * multiplier,
                close: p.close * multiplier,
                ..*p
            })
            .collect();
        Self { points }
    }
}
