use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, ResultExt, Snafu};

use crate::{models::bar_series::BarSeries, providers::json_file::BarFile};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while converting the canonical `BarSeries` model into the destination format.
    #[snafu(display("Data conversion error: {source}"))]
    Conversion {
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error.
    #[snafu(display("I/O error writing {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait DataSink {
    /// The type of output returned after a successful write operation.
    ///
    /// A file sink returns the path it wrote; other sinks may return a count.
    type Output;

    /// Writes a slice of `BarSeries` to the destination.
    async fn write(&self, data: &[BarSeries]) -> Result<Self::Output, SinkError>;
}

/// Writes series as a JSON bar file readable by
/// [`JsonFileProvider`](crate::providers::json_file::JsonFileProvider).
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSink for JsonFileSink {
    type Output = PathBuf;

    async fn write(&self, data: &[BarSeries]) -> Result<PathBuf, SinkError> {
        let file: BarFile = data
            .iter()
            .map(|s| (s.symbol.clone(), s.bars.clone()))
            .collect();
        let json = serde_json::to_string_pretty(&file).context(ConversionSnafu)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(IoSnafu { path: parent.to_path_buf() })?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .context(IoSnafu { path: self.path.clone() })?;

        Ok(self.path.clone())
    }
}
