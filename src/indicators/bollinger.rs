// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the rolling *sample* standard
// deviation of the closes over the same window.

use super::rolling::{rolling_mean, rolling_std};

/// Bollinger columns aligned with the input closes.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub middle: Vec<f64>,
    pub std_dev: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Positions before the first full `period` window are NaN.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerSeries {
    let middle = rolling_mean(closes, period);
    let std_dev = rolling_std(closes, period);

    let upper = middle
        .iter()
        .zip(std_dev.iter())
        .map(|(m, s)| m + num_std * s)
        .collect();
    let lower = middle
        .iter()
        .zip(std_dev.iter())
        .map(|(m, s)| m - num_std * s)
        .collect();

    BollingerSeries {
        middle,
        std_dev,
        upper,
        lower,
    }
}
