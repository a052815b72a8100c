//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `canasta-diff`. It uses the `thiserror` library to create an `Error` enum
//! covering all anticipated failure modes, providing clear and descriptive
//! error messages.
//!
//! The comparison engine itself raises no domain errors: it is a pure
//! transformation and degrades gracefully on malformed input. All variants
//! here belong to the surrounding I/O concerns:
//!
//! - Cache directory creation failures (fatal).
//! - Network transport and HTTP-status failures (fatal for that fetch).
//! - Network timeouts (fatal for that fetch, reported distinctly).
//! - YAML parse failures of fetched content (fatal, with the source
//!   location included in the message).
//!
//! Corrupted local cache entries are not an error at all: the fetcher
//! discards them silently and refetches.

use thiserror::Error;

/// Main error type for canasta-diff operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred with a cache operation, such as failing to create
    /// the cache directory.
    #[error("Cache operation error: {message}")]
    Cache { message: String },

    /// An error occurred during a network operation (transport failure or
    /// non-success HTTP status).
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// A network request exceeded the fetch timeout.
    #[error("Request timed out while fetching {url}")]
    Timeout { url: String },

    /// Fetched content could not be parsed as YAML.
    ///
    /// Includes the `repo/ref/path` location of the offending document.
    #[error("Invalid YAML in {location}: {source}")]
    InvalidYaml {
        location: String,
        source: serde_yaml::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML serialization error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
