// =============================================================================
// Relative Strength Index (RSI) and Stochastic RSI
// =============================================================================
//
// RSI uses simple (not Wilder) averages of gains and losses:
//
// Step 1 — delta_t = close_t - close_{t-1}.  The first delta is undefined and
//          contributes 0 to both gain and loss.
// Step 2 — gain = rolling mean of max(delta, 0)
//          loss = rolling mean of max(-delta, 0)
// Step 3 — RS  = gain / loss
//          RSI = 100 - 100 / (1 + RS),  and RSI = 100 when loss == 0.
//
// Stochastic RSI places RSI inside its own trailing range:
//
//   stoch = (rsi - min(rsi, n)) / (max(rsi, n) - min(rsi, n))
//   %K    = SMA(stoch, smooth_k) * 100
//   %D    = SMA(%K, smooth_d)
//
// A flat RSI range (max == min) has no defined position and yields NaN,
// which downstream classifiers read as neutral.
// =============================================================================

use super::rolling::{rolling_max, rolling_mean, rolling_min};

/// Compute the RSI series aligned with `closes`.
///
/// With the first delta treated as zero, the first defined value sits at
/// index `period - 1`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        let delta = if i == 0 { 0.0 } else { close - closes[i - 1] };
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&gain, &loss)| rsi_from_averages(gain, loss))
        .collect()
}

/// Stochastic RSI %K / %D columns aligned with the RSI input.
#[derive(Debug, Clone)]
pub struct StochRsiSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn calculate_stoch_rsi(
    rsi: &[f64],
    period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> StochRsiSeries {
    let lowest = rolling_min(rsi, period);
    let highest = rolling_max(rsi, period);

    let stoch: Vec<f64> = rsi
        .iter()
        .zip(lowest.iter().zip(highest.iter()))
        .map(|(&value, (&lo, &hi))| {
            let range = hi - lo;
            if range == 0.0 {
                f64::NAN
            } else {
                (value - lo) / range
            }
        })
        .collect();

    let k: Vec<f64> = rolling_mean(&stoch, smooth_k)
        .into_iter()
        .map(|v| v * 100.0)
        .collect();
    let d = rolling_mean(&k, smooth_d);

    StochRsiSeries { k, d }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value.
///
/// - Either average undefined => NaN (window not yet full).
/// - Average loss of zero => 100.0, including a perfectly flat window.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_gain.is_nan() || avg_loss.is_nan() {
        return f64::NAN;
    }
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    // ---- calculate_rsi ---------------------------------------------------

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_first_value_at_period_minus_one() {
        let rsi = calculate_rsi(&zigzag(30), 14);
        assert!(rsi[12].is_nan());
        assert!(rsi[13].is_finite());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        for &v in &rsi[13..] {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        for &v in &rsi[13..] {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_is_100() {
        let rsi = calculate_rsi(&[100.0; 30], 14);
        for &v in &rsi[13..] {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_known_value() {
        // Deltas over the last 3 closes: +2, -1, +1 => gain 1.0, loss 1/3.
        let rsi = calculate_rsi(&[10.0, 12.0, 11.0, 12.0], 3);
        let expected = 100.0 - 100.0 / (1.0 + 3.0);
        assert!((rsi[3] - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        let rsi = calculate_rsi(&zigzag(80), 14);
        for &v in rsi.iter().filter(|v| v.is_finite()) {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    // ---- calculate_stoch_rsi ---------------------------------------------

    #[test]
    fn stoch_rsi_warm_up() {
        let rsi = calculate_rsi(&zigzag(40), 14);
        let s = calculate_stoch_rsi(&rsi, 14, 3, 3);
        // rsi from 13, stoch from 26, %K from 28, %D from 30
        assert!(s.k[27].is_nan());
        assert!(s.k[28].is_finite());
        assert!(s.d[29].is_nan());
        assert!(s.d[30].is_finite());
    }

    #[test]
    fn stoch_rsi_bounded() {
        let rsi = calculate_rsi(&zigzag(120), 14);
        let s = calculate_stoch_rsi(&rsi, 14, 3, 3);
        for &v in s.k.iter().chain(s.d.iter()).filter(|v| v.is_finite()) {
            assert!((-1e-9..=100.0 + 1e-9).contains(&v), "stoch {v} out of range");
        }
    }

    #[test]
    fn stoch_rsi_flat_range_is_nan() {
        let rsi = calculate_rsi(&[100.0; 40], 14);
        let s = calculate_stoch_rsi(&rsi, 14, 3, 3);
        assert!(s.k.iter().all(|v| v.is_nan()));
        assert!(s.d.iter().all(|v| v.is_nan()));
    }
}
