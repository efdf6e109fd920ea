// =============================================================================
// Fibonacci Levels — retracement / extension levels of the window's range
// =============================================================================
//
//   high = max(High), low = min(Low), diff = high - low
//
//   MOONBAG        = high + 0.618 * diff
//   RESISTANCE     = high
//   GOLDEN POCKET  = high - 0.618 * diff
//   FLOOR          = low
//   BEAR TRAP      = high - 1.272 * diff     (extended)
//   CRASH BOTTOM   = high - 1.618 * diff     (extended)
// =============================================================================

use crate::types::PricePoint;

const GOLDEN_RATIO: f64 = 0.618;
const BEAR_TRAP_RATIO: f64 = 1.272;
const CRASH_RATIO: f64 = 1.618;

/// Named price level, in display order from the top of the map down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FibLevel {
    Moonbag,
    Resistance,
    GoldenPocket,
    Floor,
    BearTrap,
    CrashBottom,
}

impl FibLevel {
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Moonbag => "[TARGET] TP 2 / Sell everything.",
            Self::Resistance => "[GUTS TEST] Breakout = Moonbag.",
            Self::GoldenPocket => "[BUY ZONE] Bounce = Buy.",
            Self::Floor => "[DANGER] Last line of defence.",
            Self::BearTrap => "[SPECULATIVE] Dead-cat bounce zone.",
            Self::CrashBottom => "[CAPITULATION] Panic bottom, nothing below.",
        }
    }
}

impl std::fmt::Display for FibLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moonbag => write!(f, "MOONBAG (1.618)"),
            Self::Resistance => write!(f, "RESISTANCE (High)"),
            Self::GoldenPocket => write!(f, "GOLDEN POCKET (0.618)"),
            Self::Floor => write!(f, "FLOOR (Low)"),
            Self::BearTrap => write!(f, "BEAR TRAP (-0.272)"),
            Self::CrashBottom => write!(f, "CRASH BOTTOM (-0.618)"),
        }
    }
}

/// Price levels of one series window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevels {
    pub moonbag: f64,
    pub resistance: f64,
    pub golden_pocket: f64,
    pub floor: f64,
    pub bear_trap: Option<f64>,
    pub crash_bottom: Option<f64>,
}

impl FibonacciLevels {
    pub fn get(&self, level: FibLevel) -> Option<f64> {
        match level {
            FibLevel::Moonbag => Some(self.moonbag),
            FibLevel::Resistance => Some(self.resistance),
            FibLevel::GoldenPocket => Some(self.golden_pocket),
            FibLevel::Floor => Some(self.floor),
            FibLevel::BearTrap => self.bear_trap,
            FibLevel::CrashBottom => self.crash_bottom,
        }
    }

    /// Present levels, highest first.
    pub fn iter(&self) -> impl Iterator<Item = (FibLevel, f64)> + '_ {
        [
            FibLevel::Moonbag,
            FibLevel::Resistance,
            FibLevel::GoldenPocket,
            FibLevel::Floor,
            FibLevel::BearTrap,
            FibLevel::CrashBottom,
        ]
        .into_iter()
        .filter_map(|level| self.get(level).map(|price| (level, price)))
    }
}

/// Compute the levels over the whole window.
///
/// Returns `None` for an empty window: no levels, no decision.
pub fn calculate_fibonacci(points: &[PricePoint], extended: bool) -> Option<FibonacciLevels> {
    if points.is_empty() {
        return None;
    }

    let high = points.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);
    let low = points.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let diff = high - low;

    Some(FibonacciLevels {
        moonbag: high + GOLDEN_RATIO * diff,
        resistance: high,
        golden_pocket: high - GOLDEN_RATIO * diff,
        floor: low,
        bear_trap: extended.then(|| high - BEAR_TRAP_RATIO * diff),
        crash_bottom: extended.then(|| high - CRASH_RATIO * diff),
    })
}
