//! BlockVista CLI - Command line access to indicators, screening and holdings.
//!
//! Reads market data from local files and prints JSON `ApiResponse` envelopes
//! on stdout. Logs go to stderr and are controlled with `RUST_LOG`.

use anyhow::Context;
use blockvista_core::holdings::holdings_from_csv_path;
use blockvista_core::{
    compute_overlays, option_chain, parse_watchlist, rsi_zones, value_holdings, ApiResponse,
    CandleRecord, IndicatorKind, InstrumentIndex, PriceSeries, Quote, ScreenCriterion,
    ScreenRequest, SectorMap, Settings,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "blockvista")]
#[command(about = "BlockVista terminal CLI - indicators, screener and holdings")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to BLOCKVISTA_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute chart indicators over a candle file
    Indicators {
        /// JSON array of candles
        #[arg(short, long)]
        candles: PathBuf,
        /// SMA period
        #[arg(long)]
        sma: Option<usize>,
        /// EMA period
        #[arg(long)]
        ema: Option<usize>,
        /// RSI period
        #[arg(long)]
        rsi: Option<usize>,
    },
    /// Screen a batch of quotes
    Screen {
        /// JSON array of quotes
        #[arg(short, long)]
        quotes: PathBuf,
        /// High Volume minimum, overriding the configured one
        #[arg(long)]
        min_volume: Option<u64>,
        /// Apply the High Volume criterion with the configured minimum
        #[arg(long)]
        high_volume: bool,
        /// Keep gainers only
        #[arg(long)]
        gainers: bool,
        /// Keep losers only
        #[arg(long)]
        losers: bool,
        /// Sector allow-list entry (repeatable)
        #[arg(long = "sector")]
        sectors: Vec<String>,
        /// Symbol,Sector CSV used to tag quotes
        #[arg(long)]
        sectors_csv: Option<PathBuf>,
        /// Leaderboard size
        #[arg(long)]
        top: Option<usize>,
    },
    /// Value a holdings CSV against current prices
    Holdings {
        /// Symbol,Qty,AvgPrice CSV
        #[arg(long)]
        holdings: PathBuf,
        /// JSON object of symbol -> last price
        #[arg(long)]
        prices: PathBuf,
    },
    /// List the option chain for an underlying
    Chain {
        /// Instrument dump CSV
        #[arg(short, long)]
        instruments: PathBuf,
        /// Underlying symbol, e.g. NIFTY
        #[arg(short, long)]
        underlying: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: NaiveDate,
    },
    /// Show quotes for a comma-separated watchlist
    Watch {
        /// Symbols, e.g. "RELIANCE,TCS"
        #[arg(short, long)]
        symbols: String,
        /// JSON array of quotes
        #[arg(short, long)]
        quotes: PathBuf,
        /// Instrument dump CSV used to resolve tokens
        #[arg(short, long)]
        instruments: Option<PathBuf>,
    },
    /// Print the effective settings
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from_path(path),
        None => Settings::load(),
    }
    .context("failed to load settings")?;

    let result = match cli.command {
        Commands::Indicators {
            candles,
            sma,
            ema,
            rsi,
        } => handle_indicators(&settings, &candles, sma, ema, rsi),
        Commands::Screen {
            quotes,
            min_volume,
            high_volume,
            gainers,
            losers,
            sectors,
            sectors_csv,
            top,
        } => {
            let mut criteria = Vec::new();
            if high_volume || min_volume.is_some() {
                criteria.push(ScreenCriterion::HighVolume {
                    min_volume: min_volume.unwrap_or(settings.screener.min_volume),
                });
            }
            if gainers {
                criteria.push(ScreenCriterion::TopGainers);
            }
            if losers {
                criteria.push(ScreenCriterion::TopLosers);
            }
            handle_screen(&settings, &quotes, criteria, sectors, sectors_csv, top)
        }
        Commands::Holdings { holdings, prices } => handle_holdings(&holdings, &prices),
        Commands::Chain {
            instruments,
            underlying,
            expiry,
        } => handle_chain(&instruments, &underlying, expiry),
        Commands::Watch {
            symbols,
            quotes,
            instruments,
        } => handle_watch(&settings, &symbols, &quotes, instruments.as_deref()),
        Commands::Config => Ok(json!(settings)),
    };

    let output = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data))?,
        Err(e) => {
            tracing::error!("{}", e);
            serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string()))?
        }
    };

    println!("{}", output);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> blockvista_core::Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn handle_indicators(
    settings: &Settings,
    candles: &Path,
    sma: Option<usize>,
    ema: Option<usize>,
    rsi: Option<usize>,
) -> blockvista_core::Result<Value> {
    let records: Vec<CandleRecord> = read_json(candles)?;
    let series = PriceSeries::from_records(records)?;

    let mut kinds: Vec<IndicatorKind> = Vec::new();
    kinds.extend(sma.map(IndicatorKind::Sma));
    kinds.extend(ema.map(IndicatorKind::Ema));
    kinds.extend(rsi.map(IndicatorKind::Rsi));
    if kinds.is_empty() {
        kinds.extend(settings.indicator_kinds());
    }

    let overlays = compute_overlays(&series, &kinds)?;
    let zones = overlays
        .iter()
        .find(|o| matches!(o.kind, IndicatorKind::Rsi(_)))
        .map(|o| {
            rsi_zones(
                &o.values,
                settings.indicators.oversold,
                settings.indicators.overbought,
            )
        });

    tracing::info!(
        "Computed {} indicators over {} candles",
        overlays.len(),
        series.len()
    );

    Ok(json!({
        "timestamps": series.timestamps(),
        "close": series.closes(),
        "overlays": overlays,
        "rsi_zones": zones,
    }))
}

fn handle_screen(
    settings: &Settings,
    quotes: &Path,
    criteria: Vec<ScreenCriterion>,
    sectors: Vec<String>,
    sectors_csv: Option<PathBuf>,
    top: Option<usize>,
) -> blockvista_core::Result<Value> {
    let mut quotes: Vec<Quote> = read_json(quotes)?;

    if let Some(path) = sectors_csv.or_else(|| settings.screener.sectors_file.clone()) {
        quotes = SectorMap::from_csv_path(path)?.tag(&quotes);
    }

    let mut request = ScreenRequest::new(criteria)
        .with_leaderboard_size(top.unwrap_or(settings.screener.leaderboard_size));
    if !sectors.is_empty() {
        request = request.with_sectors(sectors);
    }

    let outcome = request.run(&quotes);
    tracing::info!(
        "Screened {} quotes, {} matched",
        quotes.len(),
        outcome.matches.len()
    );

    Ok(json!({
        "criteria": request.criteria.iter().map(|c| c.label()).collect::<Vec<_>>(),
        "matches": outcome.matches,
        "match_count": outcome.matches.len(),
        "top_gainers": outcome.top_gainers,
    }))
}

fn handle_holdings(holdings: &Path, prices: &Path) -> blockvista_core::Result<Value> {
    let holdings = holdings_from_csv_path(holdings)?;
    let prices: HashMap<String, f64> = read_json(prices)?;

    let valuation = value_holdings(&holdings, &prices);
    let allocation: Vec<Value> = valuation
        .allocation()
        .into_iter()
        .map(|(symbol, weight)| json!({ "symbol": symbol, "weight": weight }))
        .collect();

    Ok(json!({
        "positions": valuation.positions,
        "unpriced": valuation.unpriced,
        "total_cost": valuation.total_cost,
        "total_value": valuation.total_value,
        "total_pnl": valuation.total_pnl,
        "allocation": allocation,
    }))
}

fn handle_chain(
    instruments: &Path,
    underlying: &str,
    expiry: NaiveDate,
) -> blockvista_core::Result<Value> {
    let index = InstrumentIndex::from_csv_reader(fs::File::open(instruments)?)?;
    let chain = option_chain(index.instruments(), underlying, expiry);

    if chain.is_empty() {
        tracing::info!("No options found for {} expiring {}", underlying, expiry);
    }

    Ok(json!({
        "underlying": underlying.to_uppercase(),
        "expiry": expiry,
        "calls": chain.calls,
        "puts": chain.puts,
    }))
}

fn handle_watch(
    settings: &Settings,
    symbols: &str,
    quotes: &Path,
    instruments: Option<&Path>,
) -> blockvista_core::Result<Value> {
    let watchlist = parse_watchlist(symbols);
    let quotes: Vec<Quote> = read_json(quotes)?;
    let index = match instruments {
        Some(path) => Some(InstrumentIndex::from_csv_reader(fs::File::open(path)?)?),
        None => None,
    };

    let mut rows = Vec::new();
    let mut missing = Vec::new();
    for symbol in &watchlist {
        match quotes.iter().find(|q| q.symbol.eq_ignore_ascii_case(symbol)) {
            Some(quote) => {
                let token = index
                    .as_ref()
                    .and_then(|idx| idx.token(symbol, &settings.screener.exchange));
                rows.push(json!({ "token": token, "quote": quote }));
            }
            None => {
                tracing::warn!("No quote for {}", symbol);
                missing.push(symbol.clone());
            }
        }
    }

    Ok(json!({
        "quotes": rows,
        "missing": missing,
    }))
}
