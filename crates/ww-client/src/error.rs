use reqwest::StatusCode;

/// Error type for talking to the tracking server.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("Server URL cannot be used as a base: {0}")]
    NotABase(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Error type for loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
