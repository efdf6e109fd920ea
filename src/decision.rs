// =============================================================================
// Decision — the single verdict of one evaluation
// =============================================================================
//
// Exactly one Decision is produced per evaluation.  The label is a closed
// enum so the notification filter and callers can match on it without
// comparing display strings.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Every verdict the rule chain can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionLabel {
    BuyLong,
    BuyScalp,
    SellTakeProfit,
    SpeculativeBuy,
    FreeFall,
    Watchlist,
    CutLoss,
    WaitHold,
}

impl DecisionLabel {
    pub const ALL: [DecisionLabel; 8] = [
        Self::BuyLong,
        Self::BuyScalp,
        Self::SellTakeProfit,
        Self::SpeculativeBuy,
        Self::FreeFall,
        Self::Watchlist,
        Self::CutLoss,
        Self::WaitHold,
    ];
}

impl Default for DecisionLabel {
    fn default() -> Self {
        Self::WaitHold
    }
}

impl std::fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BuyLong => write!(f, "BUY / LONG"),
            Self::BuyScalp => write!(f, "BUY / SCALP"),
            Self::SellTakeProfit => write!(f, "SELL / TAKE PROFIT"),
            Self::SpeculativeBuy => write!(f, "SPECULATIVE BUY"),
            Self::FreeFall => write!(f, "FREE FALL / WAIT"),
            Self::Watchlist => write!(f, "WATCHLIST / NEAR BOTTOM"),
            Self::CutLoss => write!(f, "CUT LOSS / STOP BUY"),
            Self::WaitHold => write!(f, "WAIT / HOLD"),
        }
    }
}

/// Verdict label plus the validation message explaining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub label: DecisionLabel,
    pub validation: String,
}

impl Decision {
    pub fn new(label: DecisionLabel, validation: impl Into<String>) -> Self {
        Self {
            label,
            validation: validation.into(),
        }
    }

    /// Sentinel used when there is nothing to evaluate.
    pub fn no_data() -> Self {
        Self::new(DecisionLabel::WaitHold, "No price data available.")
    }
}
