//! Error types for the gleaner library.
//!
//! This module provides a single error type covering every failure mode in the
//! pipeline:
//! - Network fetches and non-success HTTP responses
//! - Missing abstract containers on detail pages
//! - Translation service responses with no content
//! - Database operations
//! - Cache and filesystem access
//! - Configuration loading

use thiserror::Error;

/// Errors that can occur while running the gleaner pipeline.
///
/// Record-scoped failures ([`GleanerError::AbstractNotFound`] and fetch
/// failures on a single detail page) are caught by the listing client, which
/// skips the affected record. Everything else propagates out of the pipeline
/// and aborts the run.
#[derive(Error, Debug)]
pub enum GleanerError {
  /// A page fetch returned a non-success status code.
  ///
  /// Carries the requested URL and the status the server answered with, so
  /// the scheduler logs show exactly which page failed.
  #[error("Failed to fetch {url}: status code {status}")]
  Fetch {
    /// The URL that was requested.
    url:    String,
    /// The non-success status code the server returned.
    status: reqwest::StatusCode,
  },

  /// A paper's detail page had no abstract container.
  ///
  /// Carries the paper identifier whose page was malformed or missing.
  #[error("No abstract found for paper {0}")]
  AbstractNotFound(String),

  /// The translation service responded without any generated content.
  ///
  /// The pipeline tolerates this per record: the paper proceeds without a
  /// translated abstract and nothing is written to the translation cache.
  #[error("Translation service returned no content")]
  EmptyCompletion,

  /// A required configuration value was missing or unparseable.
  #[error("Invalid configuration: {0}")]
  Config(String),

  /// A network request failed.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The response body cannot be read or decoded
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// Failed to parse a URL.
  ///
  /// This occurs when joining a listing or detail path onto the base URL, or
  /// when deriving a cache filename from a malformed URL key.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// Serializing or deserializing the category list or a service payload
  /// failed.
  #[error(transparent)]
  Serialization(#[from] serde_json::Error),

  /// A SQLite operation failed.
  ///
  /// This wraps errors from the `rusqlite` crate, covering:
  /// - SQL syntax errors
  /// - Constraint violations
  /// - Type conversion errors
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  ///
  /// This wraps errors from the `tokio-rusqlite` crate, covering
  /// async-specific failures in database operations.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A file system operation failed.
  ///
  /// This occurs when:
  /// - Creating the cache or database directories fails
  /// - Reading or writing a cache entry fails
  /// - Permission errors occur
  #[error(transparent)]
  Path(#[from] std::io::Error),
}
