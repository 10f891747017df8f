use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response. Displays as the server's `detail` message alone.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("server returned a non-JSON response: {snippet}...")]
    NonJson { snippet: String },
    #[error("response decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{message}")]
    Rejected { message: String },
    #[error("invalid API base URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required fields: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
    #[error("a submission is already in progress")]
    Busy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate the platform configuration directory")]
    NoConfigDir,
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("invalid value {value:?} for {what}")]
pub struct ParseValueError {
    pub what: &'static str,
    pub value: String,
}
