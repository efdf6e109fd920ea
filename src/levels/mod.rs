// =============================================================================
// Price Levels Module
// =============================================================================
//
// Support / resistance levels derived from the whole window:
// - Fibonacci retracement and extension levels
// - Volume-profile Point of Control

pub mod fibonacci;
pub mod volume_profile;

pub use fibonacci::{calculate_fibonacci, FibonacciLevels};
pub use volume_profile::point_of_control;
