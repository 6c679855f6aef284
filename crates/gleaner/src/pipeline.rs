//! The batch pipeline: fetch, transform, persist, report.
//!
//! One [`run`] is one complete ETL cycle, executed strictly in sequence:
//! open the database (idempotent schema setup), scrape the category listing
//! and each paper's abstract, translate and classify, insert-or-skip the
//! batch, and log the descriptive report. The caller, normally the gleanerd
//! scheduler, sees only "run once, success or raised failure" and applies
//! its own retry policy around it.

use super::*;

/// Runs one full pipeline cycle and returns the finished batch.
///
/// Record-scoped faults (malformed listing entries, failed abstract fetches,
/// translations without content) shrink the batch; anything else, from the
/// listing fetch to translator transport to the database, aborts the run.
pub async fn run(config: &Config) -> Result<Vec<Paper>, GleanerError> {
  info!("Starting pipeline run");

  let db = Database::open(&config.database_path).await?;

  // Extract
  let client = ArxivClient::new(ResponseCache::pages(&config.cache_dir));
  let mut papers =
    client.fetch_papers_by_category(&config.category_path, config.max_results).await?;
  info!("Fetched {} papers from {}", papers.len(), config.category_path);

  // Transform
  let translator =
    Translator::new(ResponseCache::translations(&config.cache_dir), config.translator.clone());
  translator.translate_all(&mut papers).await?;
  analysis::analyze_all(&mut papers);

  // Load
  db.insert_papers(&papers).await?;

  // Report
  report::generate(&papers);

  Ok(papers)
}
