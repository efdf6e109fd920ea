// =============================================================================
// Batch Scanner — one pass over every configured asset
// =============================================================================
//
// For each asset:
//   1. Fetch the hourly series and apply the asset's price multiplier
//   2. Evaluate it against the shared FX rate and the report clock
//   3. Notify when the decision is in `notify_on`, then pause
//
// A failing asset is logged and counted; the scan always moves on to the
// next one.  The FX rate is resolved once per scan.
// =============================================================================

use chrono::{DateTime, FixedOffset, Offset, Utc};
use tracing::{debug, error, info, warn};

use crate::analysis::{evaluate, ReportContext};
use crate::decision::DecisionLabel;
use crate::market_data::{resolve_fx_rate, MarketDataSource};
use crate::notify::Notifier;
use crate::runtime_config::{AssetConfig, RuntimeConfig};

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub evaluated: usize,
    pub notified: usize,
    pub failures: usize,
    pub results: Vec<(String, DecisionLabel)>,
}

/// Report clock in the configured display offset.  An out-of-range offset
/// falls back to UTC.
fn report_clock(now: DateTime<Utc>, offset_hours: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(offset_hours.saturating_mul(3600)).unwrap_or_else(|| {
        warn!(offset_hours, "invalid report offset, using UTC");
        Utc.fix()
    });
    now.with_timezone(&offset)
}

async fn current_fx_rate<S: MarketDataSource>(source: &S, config: &RuntimeConfig) -> f64 {
    let md = &config.market_data;
    let quote = match source.fetch_latest_close(&md.fx_ticker).await {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!(ticker = %md.fx_ticker, error = %e, "FX quote unavailable");
            None
        }
    };
    let rate = resolve_fx_rate(quote, md.fx_fallback, md.fx_min_plausible);
    if quote != Some(rate) {
        warn!(fallback = rate, "using fallback FX rate");
    }
    rate
}

/// Scan every configured asset once.
pub async fn run_scan<S, N>(source: &S, notifier: &N, config: &RuntimeConfig) -> ScanSummary
where
    S: MarketDataSource,
    N: Notifier,
{
    let mut summary = ScanSummary::default();
    let fx_rate = current_fx_rate(source, config).await;
    info!(fx_rate, assets = config.assets.len(), "scan started");

    for asset in &config.assets {
        match scan_asset(source, notifier, config, asset, fx_rate).await {
            Ok(outcome) => {
                summary.evaluated += 1;
                summary.results.push((asset.name.clone(), outcome.label));
                if outcome.notified {
                    summary.notified += 1;
                    if config.notify_delay_ms > 0 {
                        tokio::time::sleep(tokio::time::Duration::from_millis(config.notify_delay_ms)).await;
                    }
                }
            }
            Err(e) => {
                summary.failures += 1;
                error!(asset = %asset.name, ticker = %asset.ticker, error = %e, "asset scan failed");
            }
        }
    }

    info!(
        evaluated = summary.evaluated,
        notified = summary.notified,
        failures = summary.failures,
        "scan complete"
    );
    summary
}

struct AssetOutcome {
    label: DecisionLabel,
    notified: bool,
}

async fn scan_asset<S, N>(
    source: &S,
    notifier: &N,
    config: &RuntimeConfig,
    asset: &AssetConfig,
    fx_rate: f64,
) -> anyhow::Result<AssetOutcome>
where
    S: MarketDataSource,
    N: Notifier,
{
    let series = source.fetch_series(&asset.ticker).await?.scaled(asset.price_multiplier);

    let ctx = ReportContext {
        asset_name: &asset.name,
        timestamp: report_clock(Utc::now(), config.report.utc_offset_hours),
        timezone_label: &config.report.timezone_label,
        fx_rate,
    };
    let evaluation = evaluate(&series, &config.engine, &ctx);
    let label = evaluation.decision.label;

    if let (Some(snap), Some(bar)) = (&evaluation.snapshot, series.last()) {
        debug!(
            asset = %asset.name,
            last_bar = bar.timestamp,
            rsi = snap.latest.rsi,
            stoch_k = snap.latest.stoch_rsi_k,
            stoch_d = snap.latest.stoch_rsi_d,
            poc = ?snap.poc,
            golden_pocket = snap.levels.golden_pocket,
            floor = snap.levels.floor,
            stoch = %snap.signals.stoch.label,
            macd = %snap.signals.macd.label,
            bollinger = %snap.signals.bollinger.label,
            "indicator snapshot"
        );
    }

    info!(
        asset = %asset.name,
        bars = series.len(),
        decision = %label,
        validation = %evaluation.decision.validation,
        "asset evaluated"
    );

    let notified = match evaluation.report {
        Some(report) if config.should_notify(label) => {
            notifier.send(&report).await?;
            info!(asset = %asset.name, decision = %label, "notification sent");
            true
        }
        _ => false,
    };

    Ok(AssetOutcome { label, notified })
}
