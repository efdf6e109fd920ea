// =============================================================================
// Volume Profile — Point of Control (POC)
// =============================================================================
//
// The close range [min, max] is split into `bins` equal-width right-closed
// bins (a, b]; the minimum close lands in the first bin, so a close sitting
// on an interior edge belongs to the bin below it.  Volume is summed per bin
// and the POC is the midpoint of the heaviest bin.  Ties go to the lowest
// (cheapest) bin.

use crate::types::PricePoint;

/// Estimate the Point of Control of `points`.
///
/// Returns `None` when there is nothing to profile (empty input or zero
/// bins).  A window whose closes are all equal has its POC at that close.
pub fn point_of_control(points: &[PricePoint], bins: usize) -> Option<f64> {
    if points.is_empty() || bins == 0 {
        return None;
    }

    let lo = points.iter().map(|p| p.close).fold(f64::INFINITY, f64::min);
    let hi = points.iter().map(|p| p.close).fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if range <= 0.0 {
        return Some(lo);
    }

    let width = range / bins as f64;
    let mut volume = vec![0.0_f64; bins];
    for p in points {
        let upper_edge = ((p.close - lo) / width).ceil() as usize;
        let idx = upper_edge.saturating_sub(1).min(bins - 1);
        volume[idx] += p.volume;
    }

    let mut best = 0;
    for (i, &v) in volume.iter().enumerate().skip(1) {
        if v > volume[best] {
            best = i;
        }
    }

    Some(lo + (best as f64 + 0.5) * width)
}
