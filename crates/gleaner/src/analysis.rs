//! Keyword-scored field classification and word counting.
//!
//! The classifier is a fixed table, not a model: each research field owns a
//! short keyword list, an abstract is tokenized case-insensitively into word
//! tokens, and the field whose keywords occur most often wins. Word counts for
//! the original and translated abstracts use the same tokenization rule with
//! no stopword filtering.
//!
//! # Examples
//!
//! ```
//! use gleaner::analysis;
//!
//! let field = analysis::guess_field("deep neural network training");
//! assert_eq!(field, Some("machine learning"));
//!
//! assert_eq!(analysis::count_words("A simple test of word counting."), 6);
//! ```

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::*;

/// The research fields and their keyword lists, scored in this order. Only a
/// strictly higher score replaces the current best, so the earlier field wins
/// a tie.
static RESEARCH_FIELDS: &[(&str, &[&str])] = &[
  ("machine learning", &["learning", "neural", "deep", "representation", "model", "training"]),
  ("natural language processing", &["language", "text", "translation", "linguistic", "bert",
    "gpt"]),
  ("computer vision", &["image", "vision", "video", "object", "segmentation", "detection"]),
  ("robotics", &["robot", "navigation", "control", "sensor", "manipulation"]),
  ("theory", &["proof", "theorem", "complexity", "algorithm", "approximation"]),
  ("physics", &["quantum", "relativity", "particle", "spin", "cosmology"]),
  ("biology", &["protein", "gene", "cell", "biological", "genome"]),
  ("mathematics", &["algebra", "topology", "geometry", "combinatorics", "analysis"]),
];

lazy_static! {
  /// A word token is a maximal run of word characters.
  static ref WORD_TOKEN: Regex = Regex::new(r"\w+").unwrap();
}

/// Count of word tokens in `text`.
pub fn count_words(text: &str) -> usize { WORD_TOKEN.find_iter(text).count() }

/// Returns the best-scoring research field for `text`, or `None` when no
/// keyword from any field occurs at all.
pub fn guess_field(text: &str) -> Option<&'static str> {
  let text = text.to_lowercase();
  let mut frequencies: HashMap<&str, usize> = HashMap::new();
  for token in WORD_TOKEN.find_iter(&text) {
    *frequencies.entry(token.as_str()).or_insert(0) += 1;
  }

  let mut best_field = None;
  let mut best_score = 0;
  for (field, keywords) in RESEARCH_FIELDS {
    let score: usize =
      keywords.iter().map(|keyword| frequencies.get(keyword).copied().unwrap_or(0)).sum();
    if score > best_score {
      best_field = Some(*field);
      best_score = score;
    }
  }
  best_field
}

/// Recomputes the enrichment fields of one paper from its current text.
///
/// Both word counts and the guessed field are derived afresh; a paper without
/// a translated abstract keeps `word_count_translated` at 0.
pub fn analyze(paper: &mut Paper) {
  debug!("Analyzing paper: {}", paper.id);
  if paper.abstract_text.is_empty() {
    return;
  }

  paper.word_count = count_words(&paper.abstract_text);
  paper.word_count_translated =
    paper.abstract_translated.as_deref().map(count_words).unwrap_or(0);
  paper.guessed_field = guess_field(&paper.abstract_text).map(str::to_owned);

  debug!(
    "Guessed field for {}: {:?} (word count: {})",
    paper.id, paper.guessed_field, paper.word_count
  );
}

/// Runs [`analyze`] over every paper in the batch.
pub fn analyze_all(papers: &mut [Paper]) {
  for paper in papers.iter_mut() {
    analyze(paper);
  }
  info!("Analyzed {} papers", papers.len());
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_classifier_prefers_highest_score() {
    // machine learning scores 3 (neural, deep, training) against
    // computer vision's 2 (image, segmentation).
    let field = guess_field("deep neural network training with image segmentation");
    assert_eq!(field, Some("machine learning"));
  }

  #[test]
  fn test_classifier_counts_repeated_keywords() {
    let field = guess_field("image image image versus one robot");
    assert_eq!(field, Some("computer vision"));
  }

  #[test]
  fn test_classifier_without_any_keyword_hit() {
    assert_eq!(guess_field("completely unrelated prose about gardening"), None);
    assert_eq!(guess_field(""), None);
  }

  #[test]
  fn test_classifier_is_case_insensitive() {
    assert_eq!(guess_field("Quantum SPIN and Particle physics"), Some("physics"));
  }

  #[test]
  fn test_word_count() {
    assert_eq!(count_words("A simple test of word counting."), 6);
    assert_eq!(count_words(""), 0);
    assert_eq!(count_words("one, two; three."), 3);
  }

  #[test]
  fn test_analyze_recomputes_counts_and_field() {
    let mut paper = sample_paper();
    paper.abstract_text = "Deep learning with neural training.".to_string();
    paper.abstract_translated = Some("Глибоке навчання з нейронним тренуванням.".to_string());

    analyze(&mut paper);

    assert_eq!(paper.word_count, 5);
    assert_eq!(paper.word_count_translated, 5);
    assert_eq!(paper.guessed_field.as_deref(), Some("machine learning"));
  }

  #[test]
  fn test_analyze_without_translation() {
    let mut paper = sample_paper();
    paper.abstract_text = "An object detection survey with many an image.".to_string();

    analyze(&mut paper);

    assert_eq!(paper.word_count_translated, 0);
    assert_eq!(paper.guessed_field.as_deref(), Some("computer vision"));
  }

  /// A minimal paper for analyzer tests.
  fn sample_paper() -> Paper {
    Paper {
      id:                    "2401.00000".to_string(),
      title:                 "Test".to_string(),
      authors:               "Someone".to_string(),
      categories:            vec!["cs.LG".to_string()],
      abstract_text:         String::new(),
      abstract_translated:   None,
      guessed_field:         None,
      word_count:            0,
      word_count_translated: 0,
    }
  }
}
