// =============================================================================
// Indicator Frame — every indicator column aligned to the price series
// =============================================================================
//
// The frame is recomputed on every evaluation and never persisted.  Only the
// most recent row is consumed downstream; earlier rows exist to seed the
// rolling and exponential calculations.

use crate::runtime_config::EngineParams;
use crate::types::PriceSeries;

use super::bollinger::calculate_bollinger;
use super::macd::calculate_macd;
use super::rsi::{calculate_rsi, calculate_stoch_rsi};

/// Per-timestamp derived values, one entry per price point.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub close: Vec<f64>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub sma20: Vec<f64>,
    pub std20: Vec<f64>,
    pub bollinger_upper: Vec<f64>,
    pub bollinger_lower: Vec<f64>,
    pub rsi: Vec<f64>,
    pub stoch_rsi_k: Vec<f64>,
    pub stoch_rsi_d: Vec<f64>,
}

/// One row of the frame. Any field may be NaN while its indicator warms up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub sma20: f64,
    pub std20: f64,
    pub bollinger_upper: f64,
    pub bollinger_lower: f64,
    pub rsi: f64,
    pub stoch_rsi_k: f64,
    pub stoch_rsi_d: f64,
}

impl IndicatorFrame {
    pub fn compute(series: &PriceSeries, params: &EngineParams) -> Self {
        let close = series.closes();

        let macd = calculate_macd(&close, params.macd_fast, params.macd_slow, params.macd_signal);
        let bb = calculate_bollinger(&close, params.bollinger_period, params.bollinger_std);
        let rsi = calculate_rsi(&close, params.rsi_period);
        let stoch = calculate_stoch_rsi(
            &rsi,
            params.stoch_period,
            params.stoch_smooth_k,
            params.stoch_smooth_d,
        );

        Self {
            close,
            ema_fast: macd.ema_fast,
            ema_slow: macd.ema_slow,
            macd: macd.macd,
            macd_signal: macd.signal,
            sma20: bb.middle,
            std20: bb.std_dev,
            bollinger_upper: bb.upper,
            bollinger_lower: bb.lower,
            rsi,
            stoch_rsi_k: stoch.k,
            stoch_rsi_d: stoch.d,
        }
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn row(&self, i: usize) -> Option<IndicatorRow> {
        if i >= self.len() {
            return None;
        }
        Some(IndicatorRow {
            close: self.close[i],
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            sma20: self.sma20[i],
            std20: self.std20[i],
            bollinger_upper: self.bollinger_upper[i],
            bollinger_lower: self.bollinger_lower[i],
            rsi: self.rsi[i],
            stoch_rsi_k: self.stoch_rsi_k[i],
            stoch_rsi_d: self.stoch_rsi_d[i],
        })
    }

    /// The most recent row, `None` for an empty series.
    pub fn latest(&self) -> Option<IndicatorRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PricePoint;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint {
                    timestamp: i as i64 * 3600,
                    open: c,
                    high: c * 1.01,
                    low: c * 0.99,
                    close: c,
                    volume: 10.0,
                })
                .collect(),
        )
    }

    #[test]
    fn empty_series_has_no_latest_row() {
        let frame = IndicatorFrame::compute(&PriceSeries::default(), &EngineParams::default());
        assert!(frame.latest().is_none());
    }

    #[test]
    fn single_point_degrades_to_nan() {
        let frame = IndicatorFrame::compute(&series(&[100.0]), &EngineParams::default());
        let row = frame.latest().unwrap();
        assert_eq!(row.close, 100.0);
        assert!(row.macd.is_nan());
        assert!(row.sma20.is_nan());
        assert!(row.stoch_rsi_k.is_nan());
    }

    #[test]
    fn latest_row_is_complete_after_warm_up() {
        let closes: Vec<f64> = (0..34)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 4.0)
            .collect();
        let frame = IndicatorFrame::compute(&series(&closes), &EngineParams::default());
        let row = frame.latest().unwrap();
        for (name, v) in [
            ("macd", row.macd),
            ("macd_signal", row.macd_signal),
            ("bollinger_upper", row.bollinger_upper),
            ("rsi", row.rsi),
            ("stoch_rsi_k", row.stoch_rsi_k),
            ("stoch_rsi_d", row.stoch_rsi_d),
        ] {
            assert!(v.is_finite(), "{name} not warmed up: {v}");
        }
    }

    #[test]
    fn constant_series_collapses_bands() {
        let frame = IndicatorFrame::compute(&series(&[50.0; 40]), &EngineParams::default());
        let row = frame.latest().unwrap();
        assert_eq!(row.bollinger_upper, 50.0);
        assert_eq!(row.bollinger_lower, 50.0);
        assert_eq!(row.sma20, 50.0);
        assert_eq!(row.rsi, 100.0);
        assert!(row.stoch_rsi_k.is_nan());
    }
}
