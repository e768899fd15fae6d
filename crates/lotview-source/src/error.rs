use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error for {context}: {source}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("expected JSON from {url} but got content type \"{content_type}\"")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("inventory API reported an error: {message}")]
    Api { message: String },

    #[error("both sources failed (live: {live}; csv: {csv})")]
    BothSourcesFailed {
        live: Box<SourceError>,
        csv: Box<SourceError>,
    },

    #[error("no inventory source configured")]
    NoSourceConfigured,

    #[error("refresh trigger URL is not configured")]
    RefreshNotConfigured,
}
