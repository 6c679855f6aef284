//! Descriptive statistics over a finished batch.
//!
//! The report consumes the record set read-only and mirrors the run's outcome
//! into the logs: how many papers landed in each guessed field, and the
//! average abstract length per field and per category. A paper contributes
//! one observation per category it carries, so a multi-category paper weighs
//! into several rows; papers with no guessed field are left out of the field
//! groupings.

use std::collections::BTreeMap;

use super::*;

/// Aggregated statistics for one batch of papers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
  /// Observations per guessed field, most frequent first.
  pub papers_by_field:          Vec<(String, usize)>,
  /// Mean word count per guessed field, rounded to one decimal, in field
  /// order.
  pub average_words_by_field:   Vec<(String, f64)>,
  /// Mean word count per category, rounded to one decimal, in category
  /// order.
  pub average_words_by_category: Vec<(String, f64)>,
}

/// Computes the batch statistics.
pub fn summarize(papers: &[Paper]) -> ReportSummary {
  let mut field_counts: BTreeMap<&str, usize> = BTreeMap::new();
  // (word total, observation count) per group key.
  let mut field_words: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
  let mut category_words: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

  for paper in papers {
    for category in &paper.categories {
      let entry = category_words.entry(category.as_str()).or_insert((0, 0));
      entry.0 += paper.word_count;
      entry.1 += 1;

      if let Some(field) = paper.guessed_field.as_deref() {
        *field_counts.entry(field).or_insert(0) += 1;
        let entry = field_words.entry(field).or_insert((0, 0));
        entry.0 += paper.word_count;
        entry.1 += 1;
      }
    }
  }

  let mut papers_by_field: Vec<(String, usize)> =
    field_counts.into_iter().map(|(field, count)| (field.to_string(), count)).collect();
  papers_by_field.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

  ReportSummary {
    papers_by_field,
    average_words_by_field: field_words
      .into_iter()
      .map(|(field, totals)| (field.to_string(), mean(totals)))
      .collect(),
    average_words_by_category: category_words
      .into_iter()
      .map(|(category, totals)| (category.to_string(), mean(totals)))
      .collect(),
  }
}

/// Mean of a (total, count) pair, rounded to one decimal.
fn mean((total, count): (usize, usize)) -> f64 {
  (total as f64 / count as f64 * 10.0).round() / 10.0
}

/// Logs the batch statistics.
pub fn generate(papers: &[Paper]) {
  let summary = summarize(papers);

  info!("Distribution by field:");
  for (field, count) in &summary.papers_by_field {
    info!("  {field}: {count}");
  }

  info!("Average word count per field:");
  for (field, average) in &summary.average_words_by_field {
    info!("  {field}: {average}");
  }

  info!("Average word count per category:");
  for (category, average) in &summary.average_words_by_category {
    info!("  {category}: {average}");
  }
}
