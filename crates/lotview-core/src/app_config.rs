use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which source an inventory load starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Live JSON endpoint first, CSV on failure.
    Live,
    /// CSV only.
    Csv,
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Live => write!(f, "live"),
            SourceMode::Csv => write!(f, "csv"),
        }
    }
}

/// Where the CSV export lives: a local file or an HTTP(S) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvLocation {
    Path(PathBuf),
    Url(String),
}

impl CsvLocation {
    /// Treats `http://` and `https://` prefixes as URLs, anything else as a
    /// filesystem path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            CsvLocation::Url(trimmed.to_string())
        } else {
            CsvLocation::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for CsvLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvLocation::Path(path) => write!(f, "{}", path.display()),
            CsvLocation::Url(url) => write!(f, "{url}"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub source_mode: SourceMode,
    pub api_url: Option<String>,
    pub csv_source: CsvLocation,
    pub refresh_url: Option<String>,
    pub refresh_secret: Option<String>,
    pub dealer_name: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl AppConfig {
    /// Whether client-facing errors may carry upstream failure details.
    /// Production responses keep them in the logs only.
    #[must_use]
    pub fn exposes_error_details(&self) -> bool {
        self.env != Environment::Production
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("source_mode", &self.source_mode)
            .field("api_url", &self.api_url)
            .field("csv_source", &self.csv_source)
            .field("refresh_url", &self.refresh_url)
            .field(
                "refresh_secret",
                &self.refresh_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("dealer_name", &self.dealer_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}
