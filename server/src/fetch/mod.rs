pub mod musicbrainz;

use async_trait::async_trait;
use reqwest::{header::InvalidHeaderValue, StatusCode};
use thiserror::Error;

use musicbrainz::Release;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{status} for url: {url}")]
    Status { status: StatusCode, url: url::Url },
    #[error("Error while decoding JSON at path {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Invalid search url: {0}")]
    Url(#[from] url::ParseError),
    #[error("Invalid user agent: {0}")]
    UserAgent(#[from] InvalidHeaderValue),
}

impl FetchError {
    /// Whether the remote answered with a non-success status code.
    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

/// Searches a release catalog for releases that happened on an exact date.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    async fn search_by_date(&self, date: &str, limit: u32) -> Result<Vec<Release>, FetchError>;
}
