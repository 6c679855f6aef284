//! A library for harvesting recently listed arXiv papers, enriching them with
//! machine translations and a keyword-guessed research field, and persisting
//! the results into a local SQLite store.
//!
//! The crate is built around a strictly sequential batch pipeline: scrape the
//! category listing, fetch each paper's abstract, translate and classify, then
//! insert-or-skip into the database and log a small descriptive report. All
//! remote responses pass through an on-disk [`ResponseCache`], so repeated runs
//! against the same listing are cheap.
//!
//! # Example
//! ```rust,no_run
//! use gleaner::{pipeline, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!   let config = Config::from_env()?;
//!   let papers = pipeline::run(&config).await?;
//!   println!("Processed {} papers", papers.len());
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;
#[cfg(test)] use tracing_test::traced_test;

pub mod analysis;
pub mod cache;
pub mod clients;
pub mod config;
pub mod database;
pub mod errors;
pub mod paper;
pub mod pipeline;
pub mod report;
pub mod translator;
#[cfg(test)] mod tests;

pub use cache::ResponseCache;
pub use clients::ArxivClient;
pub use config::{Config, TranslatorConfig};
pub use database::Database;
pub use errors::GleanerError;
pub use paper::{ListingEntry, Paper};
pub use translator::Translator;
