// =============================================================================
// Signals Module
// =============================================================================
//
// Turns raw indicator values into discrete, exhaustively matchable states
// consumed by the decision engine.

pub mod evaluator;

pub use evaluator::{evaluate_signals, SignalLabel, SignalSet, SignalState};
