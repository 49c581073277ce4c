//! Error types for mailcow-accounts

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The mailcow API answered, but refused the request.
    #[error("mailcow API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),

    /// A mailbox lookup failed. The original error is kept as `source`.
    #[error("Lookup of {email} failed: {source}")]
    Lookup {
        email: String,
        #[source]
        source: Box<Error>,
    },

    /// The mailbox was created but the ACL could not be applied.
    #[error("ACL assignment for {email} failed (rolled back: {rolled_back}): {source}")]
    PartialProvision {
        email: String,
        rolled_back: bool,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// The error that caused a `Lookup` or `PartialProvision` failure.
    #[must_use]
    pub fn wrapped(&self) -> Option<&Self> {
        match self {
            Self::Lookup { source, .. } | Self::PartialProvision { source, .. } => {
                Some(source.as_ref())
            }
            _ => None,
        }
    }

    /// Whether the remote service rejected the request, as opposed to
    /// the request never completing.
    #[must_use]
    pub fn is_api_rejection(&self) -> bool {
        match self {
            Self::Api { .. } => true,
            Self::Lookup { source, .. } | Self::PartialProvision { source, .. } => {
                source.is_api_rejection()
            }
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
