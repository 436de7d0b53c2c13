//! Error types for the sweep pipeline and the JSON envelope the binary prints.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = SweepError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid configuration: missing api key")]
    MissingApiKey,

    #[error("request to places endpoint failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("places endpoint returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("places API returned status {status}{}", detail_suffix(.message))]
    Api {
        status: String,
        message: Option<String>,
    },

    #[error("malformed places response: {0}")]
    MalformedResponse(String),

    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
}

fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl SweepError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::MissingApiKey => "config",
            Self::Network(_) => "network",
            Self::HttpStatus { .. } => "http-status",
            Self::Api { .. } => "api",
            Self::MalformedResponse(_) => "malformed-response",
            Self::Io { .. } => "io",
            Self::Csv(_) => "csv",
        }
    }

    /// Process exit code for this failure class.
    pub fn code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::MissingApiKey => 2,
            Self::Network(_) | Self::HttpStatus { .. } => 3,
            Self::Api { .. } => 4,
            Self::MalformedResponse(_) => 5,
            Self::Io { .. } | Self::Csv(_) => 6,
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::Api { status, .. } => status == "OVER_QUERY_LIMIT" || status == "UNKNOWN_ERROR",
            _ => false,
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingApiKey => Some(
                "pass --api-key or set GOOGLE_MAPS_API_KEY (a .env file works too)".into(),
            ),
            Self::Config(_) => Some("check the config file and command-line flags".into()),
            Self::Api { status, .. } if status == "REQUEST_DENIED" => {
                Some("the API key was rejected; check that the Places API is enabled for it".into())
            }
            Self::Api { status, .. } if status == "INVALID_REQUEST" => {
                Some("a page token may have been used too early; raise --token-delay-ms".into())
            }
            Self::Network(_) | Self::HttpStatus { .. } => {
                Some("the sweep is not resumable; rerun once the endpoint is reachable".into())
            }
            _ => None,
        }
    }
}

/// Error payload surfaced by the binary as `{"error": {...}}` on stderr.
#[derive(Debug, Clone, Serialize)]
pub struct CliError {
    pub code: i32,
    pub kind: String,
    pub message: String,
    pub hint: Option<String>,
    pub retryable: bool,
}

impl CliError {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "error": self })
    }
}

impl From<SweepError> for CliError {
    fn from(err: SweepError) -> Self {
        Self {
            code: err.code(),
            kind: err.kind().to_string(),
            message: err.to_string(),
            hint: err.hint(),
            retryable: err.retryable(),
        }
    }
}
