// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   ema_fast = EMA(close, fast)
//   ema_slow = EMA(close, slow)
//   macd     = ema_fast - ema_slow
//   signal   = EMA(macd, signal_span)
//
// The signal line only starts counting observations once the MACD line
// itself is defined, so with (12, 26, 9) the first full row is index 33.
// =============================================================================

use super::ema::calculate_ema;

/// MACD columns aligned with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&macd, signal_span);

    MacdSeries {
        ema_fast,
        ema_slow,
        macd,
        signal,
    }
}
