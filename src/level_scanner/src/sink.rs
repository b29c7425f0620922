//! Report delivery.

use std::path::PathBuf;

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    address::AddressError,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::{MissingEnvVarError, get_env_var};
use snafu::{Backtrace, ResultExt, Snafu};
use tokio::io::AsyncWriteExt;

use crate::{config::EmailConfig, report::ScanReport};

pub const EMAIL_SUBJECT: &str = "Today's Alerts";
pub const EMAIL_SENDER_NAME: &str = "Daily Scan";
pub const SMTP_PASSWORD_VAR: &str = "SMTP_PASSWORD";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReportSinkError {
    #[snafu(display("failed to write report to stdout: {source}"))]
    Stdout {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("failed to write report to {}: {source}", path.display()))]
    File {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("SMTP password not set: {source}"))]
    MissingPassword {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    #[snafu(display("invalid email address {address:?}: {source}"))]
    InvalidAddress {
        address: String,
        source: AddressError,
        backtrace: Backtrace,
    },

    #[snafu(display("no email recipients configured"))]
    NoRecipients { backtrace: Backtrace },

    #[snafu(display("failed to build email: {source}"))]
    BuildMessage {
        source: lettre::error::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("failed to send email via SMTP: {source}"))]
    Smtp {
        source: lettre::transport::smtp::Error,
        backtrace: Backtrace,
    },
}

#[async_trait]
pub trait ReportSink {
    /// What a successful delivery returns.
    type Output;

    async fn deliver(&self, report: &ScanReport) -> Result<Self::Output, ReportSinkError>;
}

/// Prints the report to stdout. Returns the number of bytes written.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl ReportSink for ConsoleSink {
    type Output = usize;

    async fn deliver(&self, report: &ScanReport) -> Result<usize, ReportSinkError> {
        let text = report.to_string();
        let mut stdout = tokio::io::stdout();
        stdout.write_all(text.as_bytes()).await.context(StdoutSnafu)?;
        stdout.flush().await.context(StdoutSnafu)?;
        Ok(text.len())
    }
}

/// Writes the report to a file, creating parent directories. Returns the path.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ReportSink for FileSink {
    type Output = PathBuf;

    async fn deliver(&self, report: &ScanReport) -> Result<PathBuf, ReportSinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context(FileSnafu { path: parent.to_path_buf() })?;
        }
        tokio::fs::write(&self.path, report.to_string())
            .await
            .context(FileSnafu { path: self.path.clone() })?;
        Ok(self.path.clone())
    }
}

/// Mails the report as plain text over STARTTLS SMTP. Returns the number of
/// recipients.
#[derive(Debug)]
pub struct EmailSink {
    from: Mailbox,
    to: Vec<Mailbox>,
    host: String,
    port: u16,
    username: String,
    password: SecretString,
}

fn parse_address(raw: &str) -> Result<Address, ReportSinkError> {
    raw.parse().context(InvalidAddressSnafu { address: raw })
}

impl EmailSink {
    /// Reads the SMTP password from the `SMTP_PASSWORD` environment variable.
    pub fn from_config(config: &EmailConfig) -> Result<Self, ReportSinkError> {
        let password = SecretString::new(
            get_env_var(SMTP_PASSWORD_VAR)
                .context(MissingPasswordSnafu)?
                .into(),
        );
        Self::with_password(config, password)
    }

    pub fn with_password(
        config: &EmailConfig,
        password: SecretString,
    ) -> Result<Self, ReportSinkError> {
        let from = Mailbox::new(
            Some(EMAIL_SENDER_NAME.to_string()),
            parse_address(config.sender.trim())?,
        );
        let to = config
            .recipient_addresses()
            .map(|raw| parse_address(raw).map(|address| Mailbox::new(None, address)))
            .collect::<Result<Vec<_>, _>>()?;
        if to.is_empty() {
            return NoRecipientsSnafu.fail();
        }

        Ok(Self {
            from,
            to,
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.username().to_string(),
            password,
        })
    }

    /// Builds the message without sending it.
    pub fn message(&self, report: &ScanReport) -> Result<Message, ReportSinkError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .subject(EMAIL_SUBJECT)
            .header(ContentType::TEXT_PLAIN);
        self.to
            .iter()
            .fold(builder, |b, to| b.to(to.clone()))
            .body(report.to_string())
            .context(BuildMessageSnafu)
    }
}

#[async_trait]
impl ReportSink for EmailSink {
    type Output = usize;

    async fn deliver(&self, report: &ScanReport) -> Result<usize, ReportSinkError> {
        let message = self.message(report)?;
        let credentials = Credentials::new(
            self.username.clone(),
            self.password.expose_secret().to_string(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .context(SmtpSnafu)?
            .port(self.port)
            .credentials(credentials)
            .build();

        mailer.send(message).await.context(SmtpSnafu)?;
        Ok(self.to.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT},
        match_set::MatchSet,
        report::SignalGroup,
    };

    fn email_config(recipients: &[&str]) -> EmailConfig {
        EmailConfig {
            sender: "scanner@example.com".to_string(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            username: None,
        }
    }

    fn report() -> ScanReport {
        ScanReport {
            groups: vec![SignalGroup::new(
                "All Signals",
                [("AAPL", 185.5)].into_iter().collect(),
                MatchSet::new(),
            )],
        }
    }

    #[tokio::test]
    async fn file_sink_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/today.txt");

        let written = FileSink::new(&path).deliver(&report()).await.unwrap();
        assert_eq!(written, path);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("All Signals\n"));
        assert!(text.contains("  AAPL  185.50"));
    }

    #[tokio::test]
    async fn console_sink_counts_bytes() {
        let report = report();
        let n = ConsoleSink.deliver(&report).await.unwrap();
        assert_eq!(n, report.to_string().len());
    }

    #[tokio::test]
    async fn file_sink_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        // a directory can't be overwritten as a file
        let err = FileSink::new(dir.path()).deliver(&report()).await.unwrap_err();
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn email_message_carries_the_report() {
        let sink = EmailSink::with_password(
            &email_config(&["a@example.com, b@example.com", "c@example.com"]),
            SecretString::new("hunter2".into()),
        )
        .unwrap();

        let message = sink.message(&report()).unwrap();
        assert_eq!(message.envelope().to().len(), 3);
        assert_eq!(
            message.envelope().from().map(|a| a.to_string()),
            Some("scanner@example.com".to_string())
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Today's Alerts"));
        assert!(raw.contains("Daily Scan"));
        assert!(raw.contains("c@example.com"));
        assert!(raw.contains("All Signals"));
        assert!(raw.contains("  AAPL  185.50"));
        assert!(raw.contains("Signal Total: 1   Highs: 1   Lows: 0"));
    }

    #[test]
    fn email_needs_valid_addresses() {
        let err = EmailSink::with_password(
            &email_config(&["not-an-address"]),
            SecretString::new("x".into()),
        )
        .unwrap_err();
        assert!(matches!(err, ReportSinkError::InvalidAddress { ref address, .. } if address == "not-an-address"));

        let err = EmailSink::with_password(&email_config(&[" , "]), SecretString::new("x".into()))
            .unwrap_err();
        assert!(matches!(err, ReportSinkError::NoRecipients { .. }));
    }
}
