//! Client implementations for the pages the pipeline consumes.
//!
//! The one supported source is arXiv's HTML site: the category listing page
//! that enumerates recent submissions and the per-paper detail page carrying
//! the full abstract. All client fetches are routed through the shared
//! [`ResponseCache`].
//!
//! # Examples
//!
//! ```no_run
//! use gleaner::{ArxivClient, ResponseCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new(ResponseCache::pages(".cache"));
//! let papers = client.fetch_papers_by_category("list/cs/recent", 10).await?;
//!
//! println!("Fetched {} papers", papers.len());
//! # Ok(())
//! # }
//! ```

pub mod arxiv;

pub use arxiv::{extract_abstract, parse_listing, ArxivClient};

use super::*;
