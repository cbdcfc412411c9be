// Error types for the crank client.
// Classifies option-encoding, transport, API, and redirect-resolution failures.

use reqwest::StatusCode;
use thiserror::Error;

use crate::client::ResponseMeta;

#[derive(Error, Debug)]
pub enum CrankError {
    #[error("invalid list options: {0}")]
    InvalidOption(#[from] serde_urlencoded::ser::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
        meta: ResponseMeta,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected status code: {status}")]
    UnexpectedStatus { status: String, meta: ResponseMeta },

    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("missing GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("authorization token contains invalid header characters")]
    InvalidToken,
}

pub type Result<T> = std::result::Result<T, CrankError>;
