// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the
// decision engine.  Every series is aligned with its input and carries NaN
// where a window has not warmed up yet, so a short series degrades the
// affected indicator instead of failing the evaluation.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rolling;
pub mod rsi;

pub use frame::{IndicatorFrame, IndicatorRow};
