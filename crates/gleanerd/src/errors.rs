//! Error types for the gleanerd CLI and daemon.
//!
//! This module wraps the failure modes of running the CLI (user interaction,
//! the underlying pipeline library, file system operations, and daemon
//! process management) into a single error type. Library and IO errors use
//! the `transparent` pattern so their original messages reach the user.

use thiserror::Error;

/// Errors that can occur during CLI and daemon operations.
#[derive(Error, Debug)]
pub enum GleanerdErrors {
  /// Errors from user interaction dialogs
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Errors from the underlying gleaner library
  #[error(transparent)]
  Gleaner(#[from] gleaner::GleanerError),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// Daemon process management errors
  #[error("Daemon error: {0}")]
  Daemon(String),
}
