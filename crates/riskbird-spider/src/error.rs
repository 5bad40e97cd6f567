use thiserror::Error;

/// Every way a stage of the lookup can fail.
///
/// Stages return these instead of swallowing the failure, so the orchestrator can tell
/// "no data" apart from "request failed" before it degrades to skipping the company.
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("failed to load configuration: {0}")]
    Config(String),

    #[error("failed to resolve company \"{company}\": {reason}")]
    Resolution { company: String, reason: String },

    #[error("failed to fetch lookup token for \"{company}\": {reason}")]
    Token { company: String, reason: String },

    #[error("failed to list investments for {token}: {reason}")]
    Listing { token: String, reason: String },

    #[error("malformed funder ratio \"{0}\"")]
    Ratio(String),

    #[error("file error at \"{path}\": {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpiderError {
    pub(crate) fn file_io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        SpiderError::FileIo {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn resolution(company: &str, reason: impl ToString) -> Self {
        SpiderError::Resolution {
            company: company.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn token(company: &str, reason: impl ToString) -> Self {
        SpiderError::Token {
            company: company.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn listing(token: &str, reason: impl ToString) -> Self {
        SpiderError::Listing {
            token: token.to_string(),
            reason: reason.to_string(),
        }
    }
}
