// =============================================================================
// Signal Evaluator — classify each indicator's latest value
// =============================================================================
//
// Produces one tagged SignalState per indicator from the latest indicator
// row, the POC and the Fibonacci levels.  NaN inputs never escape as NaN:
// every comparison below is arranged so that an undefined value falls through
// to the neutral / no-signal branch.
// =============================================================================

use crate::indicators::IndicatorRow;
use crate::levels::FibonacciLevels;
use crate::runtime_config::EngineParams;

/// Discrete state of one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLabel {
    Bullish,
    Bearish,
    Neutral,
    Wait,
    Alert,
    BuyZone,
    SellZone,
    Inside,
    Breakdown,
    Strong,
    Weak,
    Above,
    Below,
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
            Self::Wait => "WAIT",
            Self::Alert => "ALERT",
            Self::BuyZone => "BUY ZONE",
            Self::SellZone => "SELL ZONE",
            Self::Inside => "INSIDE",
            Self::Breakdown => "BREAKDOWN",
            Self::Strong => "STRONG",
            Self::Weak => "WEAK",
            Self::Above => "ABOVE",
            Self::Below => "BELOW",
        };
        f.write_str(s)
    }
}

/// Label plus a short human-readable reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalState {
    pub label: SignalLabel,
    pub reason: String,
}

impl SignalState {
    pub fn new(label: SignalLabel, reason: impl Into<String>) -> Self {
        Self {
            label,
            reason: reason.into(),
        }
    }

    pub fn is(&self, label: SignalLabel) -> bool {
        self.label == label
    }
}

/// The full battery of signals for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSet {
    pub stoch: SignalState,
    pub macd: SignalState,
    pub volume_profile: SignalState,
    pub bollinger: SignalState,
    pub fibonacci: SignalState,
}

// =============================================================================
// Per-indicator classifiers
// =============================================================================

/// Stochastic RSI cross.
pub fn stoch_signal(k: f64, d: f64, params: &EngineParams) -> SignalState {
    if k < params.stoch_oversold && k > d {
        SignalState::new(SignalLabel::Bullish, "Golden Cross")
    } else if k > params.stoch_overbought && k < d {
        SignalState::new(SignalLabel::Bearish, "Death Cross")
    } else if k < params.stoch_oversold {
        SignalState::new(SignalLabel::Wait, "Oversold")
    } else if k.is_nan() {
        SignalState::new(SignalLabel::Neutral, "n/a")
    } else {
        SignalState::new(SignalLabel::Neutral, format!("{k:.1}"))
    }
}

pub fn macd_signal(macd: f64, signal: f64) -> SignalState {
    if macd.is_nan() || signal.is_nan() {
        SignalState::new(SignalLabel::Neutral, "Warming up")
    } else if macd > signal {
        SignalState::new(SignalLabel::Bullish, "Uptrend")
    } else {
        SignalState::new(SignalLabel::Bearish, "Downtrend")
    }
}

pub fn volume_profile_signal(close: f64, poc: Option<f64>) -> SignalState {
    match poc {
        None => SignalState::new(SignalLabel::Neutral, "No POC"),
        Some(poc) if close > poc => SignalState::new(SignalLabel::Strong, "Above POC"),
        Some(_) => SignalState::new(SignalLabel::Weak, "Below POC"),
    }
}

/// Bollinger band position.
///
/// A zero-width band (flat window) carries no information and reads INSIDE,
/// as does a band that has not warmed up.
pub fn bollinger_signal(close: f64, upper: f64, lower: f64) -> SignalState {
    let usable = upper.is_finite() && lower.is_finite() && upper > lower;
    if usable && close <= lower {
        SignalState::new(SignalLabel::BuyZone, "Lower Band")
    } else if usable && close >= upper {
        SignalState::new(SignalLabel::SellZone, "Upper Band")
    } else {
        SignalState::new(SignalLabel::Inside, "Normal")
    }
}

/// Proximity of the close to the Fibonacci map.
pub fn fibonacci_signal(close: f64, levels: &FibonacciLevels, params: &EngineParams) -> SignalState {
    let tolerance = close * params.fib_tolerance_pct;
    let distance = close - levels.golden_pocket;

    if close < levels.floor {
        SignalState::new(SignalLabel::Breakdown, "New Low")
    } else if distance.abs() < tolerance {
        SignalState::new(SignalLabel::Alert, "Testing Golden Pocket")
    } else if distance > 0.0 {
        SignalState::new(SignalLabel::Above, "Above Support")
    } else {
        SignalState::new(SignalLabel::Below, "Discount Area")
    }
}

/// Classify every indicator for the latest row.
pub fn evaluate_signals(
    row: &IndicatorRow,
    poc: Option<f64>,
    levels: &FibonacciLevels,
    params: &EngineParams,
) -> SignalSet {
    SignalSet {
        stoch: stoch_signal(row.stoch_rsi_k, row.stoch_rsi_d, params),
        macd: macd_signal(row.macd, row.macd_signal),
        volume_profile: volume_profile_signal(row.close, poc),
        bollinger: bollinger_signal(row.close, row.bollinger_upper, row.bollinger_lower),
        fibonacci: fibonacci_signal(row.close, levels, params),
    }
}
