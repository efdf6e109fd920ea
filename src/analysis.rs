// =============================================================================
// Analysis Pipeline — series in, decision + report out
// =============================================================================
//
// Pipeline:
//   1. Compute the indicator frame and take its latest row
//   2. Estimate the volume-profile POC
//   3. Compute the Fibonacci levels
//   4. Classify every indicator into a signal state
//   5. Run the decision rule chain
//   6. Render the report
//
// Pure: no I/O, no clock.  An empty series maps to the WAIT / HOLD sentinel
// with no report.
// =============================================================================

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::decision::Decision;
use crate::indicators::{IndicatorFrame, IndicatorRow};
use crate::levels::{calculate_fibonacci, point_of_control, FibonacciLevels};
use crate::report::{render_report, ReportInput};
use crate::runtime_config::EngineParams;
use crate::signals::{evaluate_signals, SignalSet};
use crate::strategy::{DecisionContext, DecisionEngine};
use crate::types::PriceSeries;

/// Intermediate values of a successful evaluation.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub latest: IndicatorRow,
    pub poc: Option<f64>,
    pub levels: FibonacciLevels,
    pub signals: SignalSet,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: Decision,
    /// `None` when the series was empty.
    pub report: Option<String>,
    pub snapshot: Option<Snapshot>,
}

impl Evaluation {
    fn no_data() -> Self {
        Self {
            decision: Decision::no_data(),
            report: None,
            snapshot: None,
        }
    }
}

/// Display-only context for the report.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub asset_name: &'a str,
    pub timestamp: DateTime<FixedOffset>,
    pub timezone_label: &'a str,
    pub fx_rate: f64,
}

/// Run the full engine over `series`.
pub fn evaluate(series: &PriceSeries, params: &EngineParams, ctx: &ReportContext<'_>) -> Evaluation {
    if series.is_empty() {
        return Evaluation::no_data();
    }

    let frame = IndicatorFrame::compute(series, params);
    let (Some(latest), Some(levels)) = (
        frame.latest(),
        calculate_fibonacci(series.points(), params.extended_levels),
    ) else {
        return Evaluation::no_data();
    };

    let poc = point_of_control(series.points(), params.poc_bins);
    let signals = evaluate_signals(&latest, poc, &levels, params);

    let decision_ctx = DecisionContext::new(latest.close, &signals, &levels, latest.stoch_rsi_k, params);
    let decision = DecisionEngine::decide(&decision_ctx);

    debug!(
        asset = ctx.asset_name,
        close = latest.close,
        stoch_k = latest.stoch_rsi_k,
        decision = %decision.label,
        "evaluation complete"
    );

    let report = render_report(&ReportInput {
        asset_name: ctx.asset_name,
        timestamp: ctx.timestamp,
        timezone_label: ctx.timezone_label,
        close: latest.close,
        fx_rate: ctx.fx_rate,
        display_markup: params.display_markup,
        poc,
        signals: &signals,
        decision: &decision,
        levels: &levels,
    });

    Evaluation {
        decision,
        report: Some(report),
        snapshot: Some(Snapshot {
            latest,
            poc,
            levels,
            signals,
        }),
    }
}
