// src/error.rs
//! Errors for the parts of a run that are allowed to fail: loading/saving the
//! tracker file, reading configuration, and building the HTTP client.
//! Extraction misses are never errors; they come back as `None`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tracker data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize tracker data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid tournament config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
