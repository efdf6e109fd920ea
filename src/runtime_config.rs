// =============================================================================
// Runtime Configuration — engine tunables, asset list and adapter settings
// =============================================================================
//
// Every tunable parameter of the sniper lives here and is passed by reference
// into the engine at evaluation time; nothing in the core reads globals.
//
// All fields carry `#[serde(default)]` so that a partial (or empty) JSON file
// still loads, and adding new fields never breaks an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decision::DecisionLabel;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_multiplier() -> f64 {
    1.0
}

fn default_assets() -> Vec<AssetConfig> {
    vec![
        AssetConfig::new("GOLD (PAXG)", "PAXG-USD", 0.990_489_68),
        AssetConfig::new("BITCOIN (BTC)", "BTC-USD", 1.0),
        AssetConfig::new("ETHEREUM (ETH)", "ETH-USD", 1.0),
        AssetConfig::new("SOLANA (SOL)", "SOL-USD", 1.0),
        AssetConfig::new("RIPPLE (XRP)", "XRP-USD", 1.0),
    ]
}

fn default_notify_on() -> Vec<DecisionLabel> {
    DecisionLabel::ALL
        .iter()
        .copied()
        .filter(|label| *label != DecisionLabel::WaitHold)
        .collect()
}

fn default_notify_delay_ms() -> u64 {
    2_000
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_interval() -> String {
    "1h".to_string()
}

fn default_range() -> String {
    "1mo".to_string()
}

fn default_fx_ticker() -> String {
    "IDR=X".to_string()
}

fn default_fx_fallback() -> f64 {
    16_800.0
}

fn default_fx_min_plausible() -> f64 {
    10_000.0
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_utc_offset_hours() -> i32 {
    7
}

fn default_timezone_label() -> String {
    "WIB".to_string()
}

// =============================================================================
// AssetConfig
// =============================================================================

/// One entry of the batch scan: display name, data-source ticker and a price
/// calibration factor applied to OHLC after fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    pub ticker: String,
    #[serde(default = "default_multiplier")]
    pub price_multiplier: f64,
}

impl AssetConfig {
    pub fn new(name: impl Into<String>, ticker: impl Into<String>, price_multiplier: f64) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            price_multiplier,
        }
    }
}

/// Parse an asset override of the form `NAME=TICKER,NAME=TICKER`.
///
/// Entries without `=` use the ticker as the display name. Blank entries are
/// skipped. Overrides always use a multiplier of 1.0 unless the ticker
/// matches an asset from `known`, whose multiplier is kept.
pub fn parse_asset_overrides(raw: &str, known: &[AssetConfig]) -> Vec<AssetConfig> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (name, ticker) = match entry.split_once('=') {
                Some((name, ticker)) => (name.trim(), ticker.trim()),
                None => (entry, entry),
            };
            if ticker.is_empty() {
                return None;
            }
            let ticker = ticker.to_uppercase();
            let multiplier = known
                .iter()
                .find(|a| a.ticker == ticker)
                .map(|a| a.price_multiplier)
                .unwrap_or(1.0);
            let name = if name.is_empty() { ticker.as_str() } else { name };
            Some(AssetConfig::new(name, ticker.clone(), multiplier))
        })
        .collect()
}

// =============================================================================
// EngineParams
// =============================================================================

/// Window sizes, tolerances and thresholds of the indicator & decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    pub bollinger_period: usize,
    pub bollinger_std: f64,

    pub rsi_period: usize,
    pub stoch_period: usize,
    pub stoch_smooth_k: usize,
    pub stoch_smooth_d: usize,

    /// Stoch %K below this is oversold.
    pub stoch_oversold: f64,
    /// Stoch %K above this is overbought.
    pub stoch_overbought: f64,
    /// %K below this counts as capitulation for the speculative re-entry.
    pub stoch_capitulation: f64,

    pub poc_bins: usize,

    /// Fraction of close used by the Fibonacci proximity signal (0.3%).
    pub fib_tolerance_pct: f64,
    /// Fraction of close used by the decision rules (0.2%).
    pub decision_tolerance_pct: f64,
    /// Close within `floor * near_floor_ratio` is on the watchlist.
    pub near_floor_ratio: f64,

    /// Enables the bear-trap / crash-bottom levels and the speculative
    /// re-entry branch below the floor.
    pub extended_levels: bool,

    /// Local exchange markup, applied to displayed IDR prices only.
    pub display_markup: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std: 2.0,
            rsi_period: 14,
            stoch_period: 14,
            stoch_smooth_k: 3,
            stoch_smooth_d: 3,
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
            stoch_capitulation: 10.0,
            poc_bins: 50,
            fib_tolerance_pct: 0.003,
            decision_tolerance_pct: 0.002,
            near_floor_ratio: 1.015,
            extended_levels: true,
            display_markup: 1.015,
        }
    }
}

// =============================================================================
// MarketDataConfig
// =============================================================================

/// Settings of the chart-API adapter and the FX fallback policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bar size requested from the data source.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Look-back window requested from the data source.
    #[serde(default = "default_range")]
    pub range: String,

    /// Ticker quoting USD→IDR.
    #[serde(default = "default_fx_ticker")]
    pub fx_ticker: String,

    /// Rate used when the FX quote is unavailable or implausible.
    #[serde(default = "default_fx_fallback")]
    pub fx_fallback: f64,

    /// Quotes below this are treated as implausible.
    #[serde(default = "default_fx_min_plausible")]
    pub fx_min_plausible: f64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            interval: default_interval(),
            range: default_range(),
            fx_ticker: default_fx_ticker(),
            fx_fallback: default_fx_fallback(),
            fx_min_plausible: default_fx_min_plausible(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// ReportConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Fixed offset the report timestamp is rendered in.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            timezone_label: default_timezone_label(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration of the sniper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Assets scanned in order.
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetConfig>,

    /// Decisions that trigger a notification.
    #[serde(default = "default_notify_on")]
    pub notify_on: Vec<DecisionLabel>,

    /// Pause after each notification, respecting the endpoint's rate limit.
    #[serde(default = "default_notify_delay_ms")]
    pub notify_delay_ms: u64,

    #[serde(default)]
    pub engine: EngineParams,

    #[serde(default)]
    pub market_data: MarketDataConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            notify_on: default_notify_on(),
            notify_delay_ms: default_notify_delay_ms(),
            engine: EngineParams::default(),
            market_data: MarketDataConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            assets = config.assets.len(),
            extended_levels = config.engine.extended_levels,
            "runtime config loaded"
        );

        Ok(config)
    }

    pub fn should_notify(&self, label: DecisionLabel) -> bool {
        self.notify_on.contains(&label)
    }
}
