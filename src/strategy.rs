// =============================================================================
// Decision Engine — The Brain of the Sniper
// =============================================================================
//
// An ordered priority list of (predicate, outcome) rules evaluated top-down;
// the first rule that matches wins.  Rule conditions overlap, so the order is
// part of the contract:
//
//   1. Golden-pocket rebound      Stoch BULLISH, close <= GP + tol, above floor
//   2. Lower-band bounce          BB BUY ZONE + Stoch BULLISH, above floor
//   3. Resistance rejection       Stoch BEARISH, close >= resistance - tol
//   4a. Bear-trap re-entry        below floor, close <= bear trap + tol,
//                                 Stoch BULLISH or %K capitulated
//   4b. Free fall                 below floor, anything else
//   5. Near-floor watch           floor < close <= floor * 1.015
//   6. Support broken             close < GP - 2 tol, above floor
//   -  default                    WAIT / HOLD
//
// Tolerance is 0.2% of the current close.  Rule 4a only exists when the
// extended Fibonacci levels are enabled (it needs the bear-trap level).
// =============================================================================

use tracing::debug;

use crate::decision::{Decision, DecisionLabel};
use crate::levels::FibonacciLevels;
use crate::runtime_config::EngineParams;
use crate::signals::{SignalLabel, SignalSet};

// =============================================================================
// Decision context
// =============================================================================

/// Everything the rule chain looks at, precomputed once per evaluation.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub close: f64,
    pub signals: &'a SignalSet,
    pub golden_pocket: f64,
    pub resistance: f64,
    pub floor: f64,
    pub bear_trap: Option<f64>,
    pub stoch_k: f64,
    pub tolerance: f64,
    pub near_floor_ratio: f64,
    pub capitulation_k: f64,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        close: f64,
        signals: &'a SignalSet,
        levels: &FibonacciLevels,
        stoch_k: f64,
        params: &EngineParams,
    ) -> Self {
        Self {
            close,
            signals,
            golden_pocket: levels.golden_pocket,
            resistance: levels.resistance,
            floor: levels.floor,
            bear_trap: levels.bear_trap,
            stoch_k,
            tolerance: close * params.decision_tolerance_pct,
            near_floor_ratio: params.near_floor_ratio,
            capitulation_k: params.stoch_capitulation,
        }
    }

    fn stoch_is(&self, label: SignalLabel) -> bool {
        self.signals.stoch.is(label)
    }

    fn above_floor(&self) -> bool {
        self.close > self.floor
    }
}

// =============================================================================
// Rules
// =============================================================================

/// One entry of the priority list.
pub struct Rule {
    pub name: &'static str,
    pub outcome: DecisionLabel,
    pub validation: &'static str,
    applies: fn(&DecisionContext<'_>) -> bool,
}

impl Rule {
    pub fn applies(&self, ctx: &DecisionContext<'_>) -> bool {
        (self.applies)(ctx)
    }

    fn decision(&self) -> Decision {
        Decision::new(self.outcome, self.validation)
    }
}

fn golden_pocket_rebound(ctx: &DecisionContext<'_>) -> bool {
    ctx.stoch_is(SignalLabel::Bullish)
        && ctx.close <= ctx.golden_pocket + ctx.tolerance
        && ctx.above_floor()
}

fn lower_band_bounce(ctx: &DecisionContext<'_>) -> bool {
    ctx.signals.bollinger.is(SignalLabel::BuyZone)
        && ctx.stoch_is(SignalLabel::Bullish)
        && ctx.above_floor()
}

fn resistance_rejection(ctx: &DecisionContext<'_>) -> bool {
    ctx.stoch_is(SignalLabel::Bearish) && ctx.close >= ctx.resistance - ctx.tolerance
}

fn bear_trap_reentry(ctx: &DecisionContext<'_>) -> bool {
    let Some(bear_trap) = ctx.bear_trap else {
        return false;
    };
    ctx.close < ctx.floor
        && ctx.close <= bear_trap + ctx.tolerance
        && (ctx.stoch_is(SignalLabel::Bullish) || ctx.stoch_k < ctx.capitulation_k)
}

fn free_fall(ctx: &DecisionContext<'_>) -> bool {
    ctx.close < ctx.floor
}

fn near_floor_watch(ctx: &DecisionContext<'_>) -> bool {
    ctx.above_floor() && ctx.close <= ctx.floor * ctx.near_floor_ratio
}

fn support_broken(ctx: &DecisionContext<'_>) -> bool {
    ctx.close < ctx.golden_pocket - 2.0 * ctx.tolerance && ctx.above_floor()
}

/// The priority list, strongest confirmation first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "golden_pocket_rebound",
        outcome: DecisionLabel::BuyLong,
        validation: "VALIDATED: Golden Pocket rebound + Stoch cross up.",
        applies: golden_pocket_rebound,
    },
    Rule {
        name: "lower_band_bounce",
        outcome: DecisionLabel::BuyScalp,
        validation: "VALIDATED: Lower Bollinger band bounce + momentum.",
        applies: lower_band_bounce,
    },
    Rule {
        name: "resistance_rejection",
        outcome: DecisionLabel::SellTakeProfit,
        validation: "VALIDATED: Resistance rejection + Stoch cross down.",
        applies: resistance_rejection,
    },
    Rule {
        name: "bear_trap_reentry",
        outcome: DecisionLabel::SpeculativeBuy,
        validation: "HIGH RISK: Bear trap reached, catching the knife for a dead-cat bounce.",
        applies: bear_trap_reentry,
    },
    Rule {
        name: "free_fall",
        outcome: DecisionLabel::FreeFall,
        validation: "DANGER: Floor broken, price discovery with no support found.",
        applies: free_fall,
    },
    Rule {
        name: "near_floor_watch",
        outcome: DecisionLabel::Watchlist,
        validation: "WATCH: Price approaching the floor, strong support nearby.",
        applies: near_floor_watch,
    },
    Rule {
        name: "support_broken",
        outcome: DecisionLabel::CutLoss,
        validation: "INVALID: Golden Pocket support broken.",
        applies: support_broken,
    },
];

const DEFAULT_VALIDATION: &str = "Market sideways.";

// =============================================================================
// Decision Engine
// =============================================================================

pub struct DecisionEngine;

impl DecisionEngine {
    /// First rule whose predicate holds, if any.
    pub fn matching_rule(ctx: &DecisionContext<'_>) -> Option<&'static Rule> {
        RULES.iter().find(|rule| rule.applies(ctx))
    }

    /// Pick exactly one decision for the context.
    pub fn decide(ctx: &DecisionContext<'_>) -> Decision {
        match Self::matching_rule(ctx) {
            Some(rule) => {
                debug!(rule = rule.name, outcome = %rule.outcome, close = ctx.close, "decision rule matched");
                rule.decision()
            }
            None => Decision::new(DecisionLabel::WaitHold, DEFAULT_VALIDATION),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalState;

    fn signals(stoch: SignalLabel, bollinger: SignalLabel) -> SignalSet {
        SignalSet {
            stoch: SignalState::new(stoch, ""),
            macd: SignalState::new(SignalLabel::Bearish, ""),
            volume_profile: SignalState::new(SignalLabel::Weak, ""),
            bollinger: SignalState::new(bollinger, ""),
            fibonacci: SignalState::new(SignalLabel::Above, ""),
        }
    }

    /// high = 100, low = 50 => GP 69.1, bear trap 36.4.
    fn ctx(close: f64, signals: &SignalSet, stoch_k: f64) -> DecisionContext<'_> {
        DecisionContext {
            close,
            signals,
            golden_pocket: 69.1,
            resistance: 100.0,
            floor: 50.0,
            bear_trap: Some(36.4),
            stoch_k,
            tolerance: close * 0.002,
            near_floor_ratio: 1.015,
            capitulation_k: 10.0,
        }
    }

    fn decide(close: f64, s: &SignalSet, stoch_k: f64) -> DecisionLabel {
        DecisionEngine::decide(&ctx(close, s, stoch_k)).label
    }

    #[test]
    fn rule_order_is_stable() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "golden_pocket_rebound",
                "lower_band_bounce",
                "resistance_rejection",
                "bear_trap_reentry",
                "free_fall",
                "near_floor_watch",
                "support_broken",
            ]
        );
    }

    #[test]
    fn golden_pocket_rebound_buys_long() {
        let s = signals(SignalLabel::Bullish, SignalLabel::Inside);
        assert_eq!(decide(69.2, &s, 15.0), DecisionLabel::BuyLong);
    }

    #[test]
    fn golden_pocket_outranks_lower_band() {
        let s = signals(SignalLabel::Bullish, SignalLabel::BuyZone);
        assert_eq!(decide(65.0, &s, 15.0), DecisionLabel::BuyLong);
    }

    #[test]
    fn lower_band_bounce_scalps_above_golden_pocket() {
        let s = signals(SignalLabel::Bullish, SignalLabel::BuyZone);
        assert_eq!(decide(80.0, &s, 15.0), DecisionLabel::BuyScalp);
    }

    #[test]
    fn resistance_rejection_takes_profit() {
        let s = signals(SignalLabel::Bearish, SignalLabel::SellZone);
        // tolerance = 99.9 * 0.002 = 0.1998 => 99.9 >= 99.8002
        assert_eq!(decide(99.9, &s, 85.0), DecisionLabel::SellTakeProfit);
        assert_eq!(decide(95.0, &s, 85.0), DecisionLabel::WaitHold);
    }

    #[test]
    fn below_floor_without_bounce_is_free_fall() {
        let s = signals(SignalLabel::Neutral, SignalLabel::BuyZone);
        assert_eq!(decide(48.0, &s, 45.0), DecisionLabel::FreeFall);
    }

    #[test]
    fn bear_trap_with_capitulated_stoch_is_speculative() {
        let s = signals(SignalLabel::Wait, SignalLabel::BuyZone);
        assert_eq!(decide(36.0, &s, 5.0), DecisionLabel::SpeculativeBuy);
        // Same price, %K not capitulated.
        assert_eq!(decide(36.0, &s, 12.0), DecisionLabel::FreeFall);
    }

    #[test]
    fn bear_trap_with_bullish_stoch_is_speculative() {
        let s = signals(SignalLabel::Bullish, SignalLabel::Inside);
        assert_eq!(decide(36.45, &s, 15.0), DecisionLabel::SpeculativeBuy);
    }

    #[test]
    fn bear_trap_branch_needs_extended_levels() {
        let s = signals(SignalLabel::Bullish, SignalLabel::Inside);
        let mut c = ctx(36.0, &s, 5.0);
        c.bear_trap = None;
        assert_eq!(DecisionEngine::decide(&c).label, DecisionLabel::FreeFall);
    }

    #[test]
    fn near_floor_goes_on_watchlist() {
        let s = signals(SignalLabel::Neutral, SignalLabel::Inside);
        assert_eq!(decide(50.5, &s, 50.0), DecisionLabel::Watchlist);
        // Exactly at the floor is neither below it nor inside the band above.
        assert_eq!(decide(50.0, &s, 50.0), DecisionLabel::WaitHold);
    }

    #[test]
    fn near_floor_band_includes_its_upper_edge() {
        let s = signals(SignalLabel::Neutral, SignalLabel::Inside);
        // floor * 1.015, computed the same way the rule does (50.75).
        let edge = 50.0 * 1.015;
        assert_eq!(decide(edge, &s, 50.0), DecisionLabel::Watchlist);
        assert_eq!(decide(50.76, &s, 50.0), DecisionLabel::CutLoss);
    }

    #[test]
    fn support_broken_cuts_loss() {
        let s = signals(SignalLabel::Neutral, SignalLabel::Inside);
        assert_eq!(decide(60.0, &s, 50.0), DecisionLabel::CutLoss);
    }

    #[test]
    fn bullish_stoch_below_golden_pocket_still_buys() {
        // Rule 1 fires before rule 6 could cut the loss.
        let s = signals(SignalLabel::Bullish, SignalLabel::Inside);
        assert_eq!(decide(60.0, &s, 15.0), DecisionLabel::BuyLong);
    }

    #[test]
    fn sideways_defaults_to_wait_hold() {
        let s = signals(SignalLabel::Neutral, SignalLabel::Inside);
        let decision = DecisionEngine::decide(&ctx(80.0, &s, 50.0));
        assert_eq!(decision.label, DecisionLabel::WaitHold);
        assert_eq!(decision.validation, "Market sideways.");
        assert!(DecisionEngine::matching_rule(&ctx(80.0, &s, 50.0)).is_none());
    }

    #[test]
    fn nan_stoch_k_never_triggers_capitulation() {
        let s = signals(SignalLabel::Neutral, SignalLabel::Inside);
        assert_eq!(decide(36.0, &s, f64::NAN), DecisionLabel::FreeFall);
    }

    #[test]
    fn decision_is_pure() {
        let s = signals(SignalLabel::Bullish, SignalLabel::BuyZone);
        let c = ctx(69.0, &s, 12.0);
        let first = DecisionEngine::decide(&c);
        for _ in 0..10 {
            assert_eq!(DecisionEngine::decide(&c), first);
        }
    }

    #[test]
    fn each_rule_in_isolation() {
        let bullish = signals(SignalLabel::Bullish, SignalLabel::BuyZone);
        let neutral = signals(SignalLabel::Neutral, SignalLabel::Inside);
        let rule = |name: &str| RULES.iter().find(|r| r.name == name).unwrap();

        assert!(rule("golden_pocket_rebound").applies(&ctx(69.0, &bullish, 15.0)));
        assert!(!rule("golden_pocket_rebound").applies(&ctx(49.0, &bullish, 15.0)));
        assert!(rule("lower_band_bounce").applies(&ctx(90.0, &bullish, 15.0)));
        assert!(!rule("lower_band_bounce").applies(&ctx(90.0, &neutral, 15.0)));
        assert!(rule("free_fall").applies(&ctx(49.0, &neutral, 50.0)));
        assert!(!rule("near_floor_watch").applies(&ctx(51.0, &neutral, 50.0)));
        assert!(rule("support_broken").applies(&ctx(68.0, &neutral, 50.0)));
        assert!(!rule("support_broken").applies(&ctx(69.0, &neutral, 50.0)));
    }
}
