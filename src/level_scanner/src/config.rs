//! Scan configuration loaded from TOML.
//!
//! ```toml
//! lookback = 5
//! symbols = ["AAPL", "MSFT"]
//! symbols_file = "symbols.txt"
//!
//! [provider]
//! kind = "alpaca"
//! feed = "iex"
//! adjustment = "split"
//!
//! [report]
//! round_numbers = true
//! output = "reports/latest.txt"
//!
//! [report.email]
//! sender = "scanner@example.com"
//! recipients = ["me@example.com"]
//! ```
//!
//! Every field is optional. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use market_data_ingestor::providers::alpaca_rest::{
    AlpacaBarsParams,
    params::{Adjustment, Feed},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_LOOKBACK: usize = 5;

/// Symbols requested from the provider per call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("can't read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("lookback must be at least 1 bar, got {0}")]
    InvalidLookback(usize),

    #[error("batch_size must be at least 1")]
    InvalidBatchSize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScanConfig {
    /// Number of closed daily bars scanned per symbol.
    pub lookback: usize,
    /// Inline symbol list, merged with `symbols_file`.
    pub symbols: Vec<String>,
    pub symbols_file: Option<PathBuf>,
    pub provider: ProviderConfig,
    pub report: ReportConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            symbols: Vec::new(),
            symbols_file: None,
            provider: ProviderConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Where bars come from.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ProviderConfig {
    Alpaca {
        #[serde(default)]
        feed: Option<Feed>,
        #[serde(default)]
        adjustment: Option<Adjustment>,
        #[serde(default)]
        batch_size: Option<usize>,
    },
    /// Offline bar file as written by `--save-bars`.
    Json { path: PathBuf },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::Alpaca {
            feed: None,
            adjustment: None,
            batch_size: None,
        }
    }
}

impl ProviderConfig {
    pub fn batch_size(&self) -> usize {
        match self {
            Self::Alpaca {
                batch_size: Some(n),
                ..
            } => *n,
            _ => DEFAULT_BATCH_SIZE,
        }
    }

    /// Alpaca request options, if this is the Alpaca provider.
    pub fn alpaca_params(&self) -> Option<AlpacaBarsParams> {
        match self {
            Self::Alpaca {
                feed, adjustment, ..
            } => Some(AlpacaBarsParams {
                feed: feed.clone(),
                adjustment: adjustment.clone(),
                ..Default::default()
            }),
            Self::Json { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ReportConfig {
    /// Adds the "Round Number Signals" group.
    pub round_numbers: bool,
    /// Report file. `None` prints to stdout unless the report is emailed.
    pub output: Option<PathBuf>,
    pub email: Option<EmailConfig>,
}

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

/// `[report.email]`: STARTTLS SMTP delivery. The password is read from the
/// environment, never from the file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    pub sender: String,
    /// Entries may hold several comma-separated addresses.
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP login. Defaults to `sender`.
    #[serde(default)]
    pub username: Option<String>,
}

impl EmailConfig {
    pub fn recipient_addresses(&self) -> impl Iterator<Item = &str> + '_ {
        self.recipients
            .iter()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// An empty recipient list means the report goes to the console instead.
    pub fn is_enabled(&self) -> bool {
        self.recipient_addresses().next().is_some()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sender)
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback == 0 {
            return Err(ConfigError::InvalidLookback(self.lookback));
        }
        if self.provider.batch_size() == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        Ok(())
    }
}

/// Parses and validates a TOML config.
pub fn load_config_str(text: &str) -> Result<ScanConfig, ConfigError> {
    let config: ScanConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Reads a config file. A relative `symbols_file` or JSON provider path is
/// resolved against the config file's directory.
pub fn load_config_path(path: impl AsRef<Path>) -> Result<ScanConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = load_config_str(&text)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if let Some(file) = config.symbols_file.as_mut() {
        *file = base.join(&*file);
    }
    if let ProviderConfig::Json { path: bars } = &mut config.provider {
        *bars = base.join(&*bars);
    }
    if let Some(output) = config.report.output.as_mut() {
        *output = base.join(&*output);
    }
    Ok(config)
}
