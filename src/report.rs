// =============================================================================
// Report Formatter — plain-text analysis report
// =============================================================================
//
// Deterministic template: the timestamp is an input, so identical inputs
// render byte-identical reports.  Currency conventions:
//   USD  "$1,234.56"      comma thousands, 2 decimals
//   IDR  "Rp 20.740.608"  dot thousands, no decimals
//
// The display markup (local exchange spread) only touches rendered IDR
// prices; the decision never sees it.
// =============================================================================

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset};

use crate::decision::Decision;
use crate::levels::FibonacciLevels;
use crate::signals::{SignalSet, SignalState};

const HEAVY_RULE: &str = "============================================================";
const LIGHT_RULE: &str = "------------------------------------------------------------";

/// Everything the report shows.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub asset_name: &'a str,
    pub timestamp: DateTime<FixedOffset>,
    pub timezone_label: &'a str,
    pub close: f64,
    pub fx_rate: f64,
    pub display_markup: f64,
    pub poc: Option<f64>,
    pub signals: &'a SignalSet,
    pub decision: &'a Decision,
    pub levels: &'a FibonacciLevels,
}

// =============================================================================
// Currency formatting
// =============================================================================

/// Insert `sep` every three digits of an unsigned integer string.
fn group_thousands(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// `$1,234.56`
pub fn fmt_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${sign}{}.{frac_part}", group_thousands(int_part, ','))
}

/// `Rp 1.234.567`
pub fn fmt_idr(value: f64) -> String {
    let fixed = format!("{:.0}", value.abs());
    let sign = if value < 0.0 && fixed != "0" { "-" } else { "" };
    format!("Rp {sign}{}", group_thousands(&fixed, '.'))
}

// =============================================================================
// Rendering
// =============================================================================

fn signal_line(out: &mut String, index: usize, name: &str, state: &SignalState, suffix: &str) {
    let _ = writeln!(
        out,
        "{index}. {name:<11} [{}] : {}{suffix}",
        state.label, state.reason
    );
}

/// Render the full multi-line report.
pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();
    let name = input.asset_name;
    let idr = input.close * input.fx_rate;

    let _ = writeln!(out, "{name} SNIPER AUTOMATION");
    let _ = writeln!(
        out,
        "Time: {} {}",
        input.timestamp.format("%d %b %Y | %H:%M"),
        input.timezone_label
    );
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out);

    let _ = writeln!(out, "PRICE UPDATE ({name})");
    let _ = writeln!(out, "USD/IDR RATE  : {}", fmt_idr(input.fx_rate));
    let _ = writeln!(out, "{LIGHT_RULE}");
    let _ = writeln!(out, "PRICE USD     : {}", fmt_usd(input.close));
    let _ = writeln!(out, "PRICE IDR     : {}", fmt_idr(idr));
    let _ = writeln!(
        out,
        "   (Est. local exchange: {})",
        fmt_idr(idr * input.display_markup)
    );
    let _ = writeln!(out, "{LIGHT_RULE}");
    let _ = writeln!(out);

    let poc_suffix = match input.poc {
        Some(poc) => format!(" (Area {})", fmt_usd(poc)),
        None => String::new(),
    };
    let s = input.signals;
    let _ = writeln!(out, "ANALYSIS RESULTS (5 METHODS)");
    signal_line(&mut out, 1, "Stoch RSI", &s.stoch, "");
    signal_line(&mut out, 2, "MACD", &s.macd, "");
    signal_line(&mut out, 3, "VPVR POC", &s.volume_profile, &poc_suffix);
    signal_line(&mut out, 4, "Bollinger", &s.bollinger, "");
    signal_line(&mut out, 5, "Fibonacci", &s.fibonacci, "");
    let _ = writeln!(out);

    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out, "ENSEMBLE DECISION : [ {} ]", input.decision.label);
    let _ = writeln!(out, "VALIDATED BY      : {}", input.decision.validation);
    let _ = writeln!(out, "{HEAVY_RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "NEAREST LEVEL MAP");

    for (level, usd) in input.levels.iter() {
        let local = usd * input.fx_rate * input.display_markup;
        let _ = writeln!(out);
        let _ = writeln!(out, "LEVEL: {level}");
        let _ = writeln!(out, "   - USD : {}", fmt_usd(usd));
        let _ = writeln!(out, "   - IDR : {}", fmt_idr(local));
        let _ = writeln!(out, "   -> {}", level.hint());
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionLabel;
    use crate::levels::calculate_fibonacci;
    use crate::levels::fibonacci::FibLevel;
    use crate::signals::SignalLabel;
    use crate::types::PricePoint;
    use chrono::TimeZone;

    fn parse_usd(text: &str) -> f64 {
        text.trim_start_matches('$').replace(',', "").parse().unwrap()
    }

    fn parse_idr(text: &str) -> f64 {
        text.trim_start_matches("Rp ").replace('.', "").parse().unwrap()
    }

    fn field<'r>(report: &'r str, prefix: &str) -> &'r str {
        report
            .lines()
            .find_map(|line| line.strip_prefix(prefix))
            .unwrap_or_else(|| panic!("missing line {prefix:?}"))
            .trim()
    }

    fn fixture() -> (SignalSet, Decision, FibonacciLevels) {
        let signals = SignalSet {
            stoch: SignalState::new(SignalLabel::Bullish, "Golden Cross"),
            macd: SignalState::new(SignalLabel::Bearish, "Downtrend"),
            volume_profile: SignalState::new(SignalLabel::Strong, "Above POC"),
            bollinger: SignalState::new(SignalLabel::Inside, "Normal"),
            fibonacci: SignalState::new(SignalLabel::Alert, "Testing Golden Pocket"),
        };
        let decision = Decision::new(DecisionLabel::BuyLong, "VALIDATED: test.");
        let bar = PricePoint {
            timestamp: 0,
            open: 60_000.0,
            high: 71_234.5,
            low: 58_000.25,
            close: 65_000.0,
            volume: 1.0,
        };
        let levels = calculate_fibonacci(&[bar], true).unwrap();
        (signals, decision, levels)
    }

    fn render(close: f64, fx_rate: f64) -> String {
        let (signals, decision, levels) = fixture();
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let input = ReportInput {
            asset_name: "BITCOIN (BTC)",
            timestamp: offset.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap(),
            timezone_label: "WIB",
            close,
            fx_rate,
            display_markup: 1.015,
            poc: Some(64_321.987),
            signals: &signals,
            decision: &decision,
            levels: &levels,
        };
        render_report(&input)
    }

    // ---- currency --------------------------------------------------------

    #[test]
    fn usd_formatting() {
        assert_eq!(fmt_usd(0.0), "$0.00");
        assert_eq!(fmt_usd(999.994), "$999.99");
        assert_eq!(fmt_usd(1234.5), "$1,234.50");
        assert_eq!(fmt_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(fmt_usd(-1234.5), "$-1,234.50");
    }

    #[test]
    fn idr_formatting() {
        assert_eq!(fmt_idr(16_800.0), "Rp 16.800");
        assert_eq!(fmt_idr(999.4), "Rp 999");
        assert_eq!(fmt_idr(1_092_000_000.2), "Rp 1.092.000.000");
        assert_eq!(fmt_idr(12.0), "Rp 12");
    }

    // ---- report ----------------------------------------------------------

    #[test]
    fn report_is_deterministic() {
        assert_eq!(render(65_000.0, 16_800.0), render(65_000.0, 16_800.0));
    }

    #[test]
    fn report_header_and_decision() {
        let report = render(65_000.0, 16_800.0);
        assert!(report.starts_with("BITCOIN (BTC) SNIPER AUTOMATION\n"));
        assert!(report.contains("Time: 18 Oct 2026 | 14:05 WIB"));
        assert!(report.contains("ENSEMBLE DECISION : [ BUY / LONG ]"));
        assert!(report.contains("1. Stoch RSI   [BULLISH] : Golden Cross"));
        assert!(report.contains("3. VPVR POC    [STRONG] : Above POC (Area $64,321.99)"));
        assert!(report.contains("5. Fibonacci   [ALERT] : Testing Golden Pocket"));
    }

    #[test]
    fn report_lists_every_level_with_hint() {
        let report = render(65_000.0, 16_800.0);
        for level in [
            FibLevel::Moonbag,
            FibLevel::Resistance,
            FibLevel::GoldenPocket,
            FibLevel::Floor,
            FibLevel::BearTrap,
            FibLevel::CrashBottom,
        ] {
            assert!(report.contains(&format!("LEVEL: {level}")), "missing {level}");
            assert!(report.contains(level.hint()));
        }
    }

    #[test]
    fn report_numbers_round_trip_to_display_precision() {
        let close = 65_432.127;
        let fx = 16_245.4;
        let report = render(close, fx);

        let usd = parse_usd(field(&report, "PRICE USD     :"));
        assert!((usd - (close * 100.0).round() / 100.0).abs() < 1e-9);

        let idr = parse_idr(field(&report, "PRICE IDR     :"));
        assert_eq!(idr, (close * fx).round());

        let rate = parse_idr(field(&report, "USD/IDR RATE  :"));
        assert_eq!(rate, fx.round());

        let (_, _, levels) = fixture();
        let resistance_usd = report
            .lines()
            .skip_while(|l| !l.starts_with("LEVEL: RESISTANCE"))
            .nth(1)
            .and_then(|l| l.strip_prefix("   - USD : "))
            .map(parse_usd)
            .unwrap();
        assert!((resistance_usd - (levels.resistance * 100.0).round() / 100.0).abs() < 1e-9);
    }

    #[test]
    fn markup_only_touches_local_estimate() {
        let report = render(100.0, 16_000.0);
        assert!(report.contains("PRICE IDR     : Rp 1.600.000"));
        assert!(report.contains("(Est. local exchange: Rp 1.624.000)"));
    }
}
