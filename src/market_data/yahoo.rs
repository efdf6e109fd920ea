// =============================================================================
// Yahoo Finance Chart Client — hourly OHLCV and FX quotes
// =============================================================================
//
// GET {base_url}/v8/finance/chart/{ticker}?interval=1h&range=1mo
//
// The chart payload carries parallel arrays (timestamp, open, high, low,
// close, volume).  Any bar with a null field is dropped, matching how the
// series is consumed downstream.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::runtime_config::MarketDataConfig;
use crate::types::{PricePoint, PriceSeries};

use super::MarketDataSource;

/// Chart endpoint rejects requests without a browser-like agent.
const BROWSER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Decode a chart payload into bars, dropping incomplete rows.
fn parse_chart(body: &str) -> Result<Vec<PricePoint>> {
    let resp: ChartResponse = serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = resp.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("chart API returned error: {err}");
    }

    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("chart response has no result")?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let points = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            Some(PricePoint {
                timestamp,
                open: at(&quote.open, i)?,
                high: at(&quote.high, i)?,
                low: at(&quote.low, i)?,
                close: at(&quote.close, i)?,
                volume: at(&quote.volume, i)?,
            })
        })
        .collect();

    Ok(points)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Chart API client.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    interval: String,
    range: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build chart HTTP client")?;

        debug!(base_url = %config.base_url, interval = %config.interval, range = %config.range, "YahooClient initialised");

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            interval: config.interval.clone(),
            range: config.range.clone(),
            client,
        })
    }

    async fn fetch_points(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);

        let resp = self
            .client
            .get(&url)
            .query(&[("interval", self.interval.as_str()), ("range", self.range.as_str())])
            .send()
            .await
            .with_context(|| format!("GET chart for {ticker} failed"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read chart body for {ticker}"))?;

        if !status.is_success() {
            anyhow::bail!("chart API returned {} for {}: {}", status, ticker, body);
        }

        parse_chart(&body).with_context(|| format!("bad chart payload for {ticker}"))
    }
}

impl MarketDataSource for YahooClient {
    #[instrument(skip(self), name = "yahoo::fetch_series")]
    async fn fetch_series(&self, ticker: &str) -> Result<PriceSeries> {
        let points = self.fetch_points(ticker).await?;
        let series = PriceSeries::new(points);
        debug!(ticker, bars = series.len(), "series fetched");
        Ok(series)
    }

    #[instrument(skip(self), name = "yahoo::fetch_latest_close")]
    async fn fetch_latest_close(&self, ticker: &str) -> Result<f64> {
        let points = self.fetch_points(ticker).await?;
        points
            .iter()
            .rev()
            .map(|p| p.close)
            .find(|c| c.is_finite())
            .with_context(|| format!("no close available for {ticker}"))
    }
}
