// =============================================================================
// Market Sniper — Main Entry Point
// =============================================================================
//
// One scan per invocation: fetch every configured asset, evaluate it, and
// push actionable reports to Telegram.  Scheduling is left to cron.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod decision;
mod indicators;
mod levels;
mod market_data;
mod notify;
mod report;
mod runtime_config;
mod scanner;
mod signals;
mod strategy;
mod types;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::market_data::YahooClient;
use crate::notify::TelegramClient;
use crate::runtime_config::{parse_asset_overrides, RuntimeConfig};

const DEFAULT_CONFIG_PATH: &str = "sniper_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Market Sniper — Starting Scan                     ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("SNIPER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override assets from env if available.
    if let Ok(raw) = std::env::var("SNIPER_ASSETS") {
        let assets = parse_asset_overrides(&raw, &config.assets);
        if assets.is_empty() {
            warn!(raw = %raw, "SNIPER_ASSETS has no usable entries, keeping configured assets");
        } else {
            config.assets = assets;
        }
    }

    let names: Vec<&str> = config.assets.iter().map(|a| a.name.as_str()).collect();
    info!(assets = ?names, extended_levels = config.engine.extended_levels, "Configured assets");

    // ── 2. Build adapters ────────────────────────────────────────────────
    let token = std::env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN is not set")?;
    let chat_id = std::env::var("TELEGRAM_CHAT_ID").context("TELEGRAM_CHAT_ID is not set")?;
    let notifier = TelegramClient::new(token, chat_id, config.market_data.timeout_secs)?;
    let source = YahooClient::new(&config.market_data)?;

    // ── 3. Scan ──────────────────────────────────────────────────────────
    let summary = scanner::run_scan(&source, &notifier, &config).await;

    for (asset, label) in &summary.results {
        info!(asset = %asset, decision = %label, "result");
    }

    if summary.failures > 0 {
        warn!(failures = summary.failures, "Scan finished with failures");
    }

    info!("Market Sniper scan complete.");
    Ok(())
}
