// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Recursive form without bias adjustment:
//   alpha = 2 / (span + 1)
//   EMA_0 = x_0
//   EMA_t = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// The recursion is seeded with the first observation (not an SMA), and the
// output stays NaN until `span` observations have been accumulated.  The
// output is aligned 1:1 with the input so it can sit in an indicator frame.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// # Edge cases
/// - `span == 0` => all NaN
/// - Leading NaN inputs are skipped; the recursion seeds on the first finite
///   value.
/// - An interior NaN input does not count as an observation; the previous
///   EMA is carried forward.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;
    let mut observations = 0usize;

    for (i, &x) in values.iter().enumerate() {
        if x.is_finite() {
            let ema = match prev {
                Some(p) => alpha * x + (1.0 - alpha) * p,
                None => x,
            };
            prev = Some(ema);
            observations += 1;
        }

        if observations >= span {
            if let Some(ema) = prev {
                result[i] = ema;
            }
        }
    }

    result
}
