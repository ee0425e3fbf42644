//! Catalog client errors.

use sld_common::StyleError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Catalog returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Invalid catalog configuration: {0}")]
    Config(String),

    /// The document could not be serialized before upload.
    #[error(transparent)]
    Style(#[from] StyleError),
}

impl CatalogError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CatalogError::Status { code, .. } => Some(*code),
            CatalogError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
