use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use level_scanner::{
    config::{ProviderConfig, ScanConfig, load_config_path},
    logging::init_logging,
    pipeline::{FetchRequest, fetch_series, run_scans},
    sink::{ConsoleSink, EmailSink, FileSink, ReportSink},
    symbols::{load_symbols, merge_symbols},
};
use market_data_ingestor::{
    io::sink::{DataSink, JsonFileSink},
    models::{bar_series::BarSeries, request_params::ProviderParams},
    providers::{DataProvider, alpaca_rest::AlpacaProvider, json_file::JsonFileProvider},
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(version, about = "Daily scan for matching highs and lows")]
struct Cli {
    /// Scan configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of closed daily bars to scan
    #[arg(long)]
    lookback: Option<usize>,

    /// Comma-separated symbols, replaces the config list (e.g. "AAPL,MSFT")
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// File with one symbol per line
    #[arg(long, value_name = "FILE")]
    symbols_file: Option<PathBuf>,

    /// Read bars from a JSON bar file instead of Alpaca
    #[arg(long, value_name = "FILE")]
    bars: Option<PathBuf>,

    /// Also write the downloaded bars to a JSON bar file
    #[arg(long, value_name = "FILE")]
    save_bars: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Add the round-number group to the report
    #[arg(long)]
    round_numbers: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Scan as if today were this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,
}

fn resolve_config(cli: &Cli) -> Result<ScanConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if let Some(lookback) = cli.lookback {
        config.lookback = lookback;
    }
    if !cli.symbols.is_empty() {
        config.symbols = cli.symbols.clone();
    }
    if let Some(file) = &cli.symbols_file {
        config.symbols_file = Some(file.clone());
    }
    if let Some(path) = &cli.bars {
        config.provider = ProviderConfig::Json { path: path.clone() };
    }
    if let Some(output) = &cli.output {
        config.report.output = Some(output.clone());
    }
    config.report.round_numbers |= cli.round_numbers;

    config.validate().context("invalid scan settings")?;
    Ok(config)
}

fn resolve_symbols(config: &ScanConfig) -> Vec<String> {
    let from_file = match &config.symbols_file {
        Some(path) => match load_symbols(path) {
            Ok(symbols) => {
                info!(count = symbols.len(), file = %path.display(), "loaded symbols from file");
                symbols
            }
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    merge_symbols([config.symbols.clone(), from_file])
}

fn build_provider(config: &ProviderConfig) -> Result<Box<dyn DataProvider>> {
    Ok(match config {
        ProviderConfig::Json { path } => Box::new(JsonFileProvider::new(path)),
        ProviderConfig::Alpaca { .. } => {
            Box::new(AlpacaProvider::new().context("failed to set up the Alpaca provider")?)
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config = resolve_config(&cli)?;
    let symbols = resolve_symbols(&config);
    if symbols.is_empty() {
        bail!("no symbols to scan; pass --symbols or --symbols-file, or list them in the config");
    }
    info!("downloading data for {} symbols", symbols.len());

    // Set up mail first so a missing password fails before the download.
    let email = match config.report.email.as_ref().filter(|e| e.is_enabled()) {
        Some(settings) => {
            Some(EmailSink::from_config(settings).context("failed to set up email delivery")?)
        }
        None => None,
    };

    let provider = build_provider(&config.provider)?;
    let request = FetchRequest {
        symbols: &symbols,
        lookback: config.lookback,
        today: cli.as_of.unwrap_or_else(|| Utc::now().date_naive()),
        batch_size: config.provider.batch_size(),
        provider_params: config
            .provider
            .alpaca_params()
            .map(ProviderParams::Alpaca)
            .unwrap_or_default(),
    };
    let set = fetch_series(provider.as_ref(), &request)
        .await
        .context("failed to download bars")?;

    if let Some(path) = &cli.save_bars {
        let series: Vec<BarSeries> = set.iter().cloned().collect();
        let path = JsonFileSink::new(path)
            .write(&series)
            .await
            .context("failed to save bars")?;
        info!(path = %path.display(), "bars saved");
    }

    let report = run_scans(&set, config.lookback, config.report.round_numbers)?;

    if let Some(sink) = &email {
        let recipients = sink.deliver(&report).await?;
        info!(recipients, "email sent");
    }
    if let Some(path) = &config.report.output {
        let path = FileSink::new(path).deliver(&report).await?;
        info!(path = %path.display(), "report written");
    }
    if email.is_none() && config.report.output.is_none() {
        ConsoleSink.deliver(&report).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.toml");
        std::fs::write(&path, "lookback = 8\nsymbols = [\"aapl\"]\n[report]\nround_numbers = false\n").unwrap();

        let cli = Cli::try_parse_from([
            "daily-scan",
            "--config",
            path.to_str().unwrap(),
            "--lookback",
            "10",
            "--symbols",
            "msft,nflx",
            "--bars",
            "fixture.json",
            "--round-numbers",
            "--as-of",
            "2024-03-11",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.lookback, 10);
        assert_eq!(resolve_symbols(&config), vec!["MSFT", "NFLX"]);
        assert_eq!(
            config.provider,
            ProviderConfig::Json {
                path: PathBuf::from("fixture.json")
            }
        );
        assert!(config.report.round_numbers);
        assert_eq!(cli.as_of, NaiveDate::from_ymd_opt(2024, 3, 11));
    }

    #[test]
    fn zero_lookback_flag_is_rejected() {
        let cli = Cli::try_parse_from(["daily-scan", "--lookback", "0"]).unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn missing_symbol_file_falls_back_to_inline_list() {
        let config = ScanConfig {
            symbols: vec!["goog".into()],
            symbols_file: Some(PathBuf::from("/no/such/symbols.txt")),
            ..Default::default()
        };
        assert_eq!(resolve_symbols(&config), vec!["GOOG"]);
    }
}
