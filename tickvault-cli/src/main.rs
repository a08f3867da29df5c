//! TickVault CLI — batch download of historical prices into CSV datasets.
//!
//! Commands:
//! - `crypto` — chunked intraday history for every symbol in a JSON ticker list
//! - `stocks` — period-bounded history for every ticker in a text list

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickvault_core::batch::{run_crypto, run_stocks, BatchSummary};
use tickvault_core::policy::IntervalPolicy;
use tickvault_core::provider::StdoutProgress;
use tickvault_core::source::{CryptoSource, StockSource};
use tickvault_core::yahoo::YahooChart;

#[derive(Parser)]
#[command(
    name = "tickvault",
    about = "TickVault CLI — windowed historical price downloads into CSV datasets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download chunked intraday history for every symbol in a JSON ticker list.
    Crypto {
        /// Path to the JSON ticker list, e.g. ["BTC-USD", "ETH-USD"].
        #[arg(long, default_value = "cryptos.json")]
        tickers: PathBuf,

        /// Root directory for the per-symbol datasets.
        #[arg(long, default_value = "data")]
        out: PathBuf,

        /// TOML file overriding the interval policy defaults.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Download period-bounded history for every ticker in a text list.
    Stocks {
        /// Path to the newline-delimited ticker list.
        #[arg(long, default_value = "stocks.txt")]
        tickers: PathBuf,

        /// Root directory for the per-ticker datasets.
        #[arg(long, default_value = "data")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crypto {
            tickers,
            out,
            policy,
        } => run_crypto_cmd(tickers, out, policy),
        Commands::Stocks { tickers, out } => run_stocks_cmd(tickers, out),
    }
}

fn run_crypto_cmd(tickers: PathBuf, out: PathBuf, policy: Option<PathBuf>) -> Result<()> {
    let policy = match policy {
        Some(path) => IntervalPolicy::from_file(&path)
            .with_context(|| format!("loading policy overrides from {}", path.display()))?,
        None => IntervalPolicy::default(),
    };

    let provider = YahooChart::new();
    let source = CryptoSource::default();

    let summary = run_crypto(&provider, &source, &policy, &tickers, &out, &StdoutProgress)?;
    finish(summary)
}

fn run_stocks_cmd(tickers: PathBuf, out: PathBuf) -> Result<()> {
    let provider = YahooChart::new();
    let source = StockSource::default();

    let summary = run_stocks(&provider, &source, &tickers, &out, &StdoutProgress)?;
    finish(summary)
}

fn finish(summary: BatchSummary) -> Result<()> {
    if !summary.all_succeeded() {
        for (symbol, interval, err) in &summary.errors {
            eprintln!("Error for {symbol} {interval}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}
