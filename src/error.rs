use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Config file not found: {}. Fill in the sample next to it and save it under that name.", .path.display())]
    ConfigMissing { path: PathBuf },
    #[error("Config file {} is not valid JSON: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },
    #[error("Credential can't be used as a header value: {0}")]
    InvalidHeader(String),

    #[error("Unrecognized {filter} filter: {value:?}")]
    InvalidFilter { filter: &'static str, value: String },
    #[error("Page size must be greater than 0, got {0}")]
    InvalidPageSize(u32),

    #[error("Failed to fetch page {page}: {status} - {body}")]
    FetchFailed { page: u64, status: u16, body: String },
    #[error("Page {page} is not a tracker page: {source}")]
    MalformedPage {
        page: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
