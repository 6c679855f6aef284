//! Paper records and the partial entries produced by the listing parser.
//!
//! A [`Paper`] is the unit of work for the whole pipeline: created by the
//! listing scrape with its identifying metadata and abstract, annotated in
//! place by the translator and the analyzer, and finally persisted and
//! reported. A [`ListingEntry`] is the intermediate form a listing pair parses
//! into before its abstract has been fetched.
//!
//! # Examples
//!
//! ```no_run
//! use gleaner::{Database, Paper};
//!
//! # async fn run(paper: Paper) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open("papers.db").await?;
//! if paper.save(&db).await? {
//!   println!("Stored {}", paper.id);
//! } else {
//!   println!("{} was already in the database", paper.id);
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// A harvested arXiv paper with its enrichment fields.
///
/// `word_count` and `word_count_translated` are always recomputed from the
/// current text by [`analysis::analyze`](crate::analysis::analyze), never set
/// by hand. `abstract_translated` and `guessed_field` stay `None` until the
/// translator and classifier fill them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
  /// The arXiv identifier exactly as shown on the listing page.
  pub id:                    String,
  /// The paper's title.
  pub title:                 String,
  /// The authors as a single free-text string, not decomposed.
  pub authors:               String,
  /// Subject tags in the order they appear on the page; non-empty for any
  /// record that survived parsing.
  pub categories:            Vec<String>,
  /// The abstract in its original language.
  pub abstract_text:         String,
  /// The machine-translated abstract, present only after translation
  /// succeeds.
  pub abstract_translated:   Option<String>,
  /// The best-scoring research field, or `None` when no keyword matched.
  pub guessed_field:         Option<String>,
  /// Word tokens in `abstract_text`; 0 until computed.
  pub word_count:            usize,
  /// Word tokens in `abstract_translated`; 0 until computed or if absent.
  pub word_count_translated: usize,
}

impl Paper {
  /// Save the paper to a database.
  ///
  /// Returns `true` if a row was inserted and `false` if a paper with the
  /// same identifier was already stored (the insert is skipped silently).
  pub async fn save(&self, db: &Database) -> Result<bool, GleanerError> {
    db.insert_paper(self).await
  }
}

/// The partial record parsed from one listing `<dt>`/`<dd>` pair.
///
/// Carries everything the listing page provides; the abstract is fetched
/// separately from the paper's detail page and supplied to [`into_paper`].
///
/// [`into_paper`]: ListingEntry::into_paper
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
  /// The arXiv identifier from the entry's abstract link.
  pub id:         String,
  /// The title with its listing label stripped.
  pub title:      String,
  /// The authors line with its listing label stripped.
  pub authors:    String,
  /// Subject tags in page order.
  pub categories: Vec<String>,
}

impl ListingEntry {
  /// Promote this entry to a full [`Paper`] once its abstract is available.
  ///
  /// Enrichment fields start empty: no translation, no guessed field, both
  /// word counts 0.
  pub fn into_paper(self, abstract_text: String) -> Paper {
    Paper {
      id: self.id,
      title: self.title,
      authors: self.authors,
      categories: self.categories,
      abstract_text,
      abstract_translated: None,
      guessed_field: None,
      word_count: 0,
      word_count_translated: 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_entry_promotion_defaults() {
    let entry = ListingEntry {
      id:         "2401.00001".to_string(),
      title:      "A Test Paper".to_string(),
      authors:    "Jane Doe, John Doe".to_string(),
      categories: vec!["Machine Learning (cs.LG)".to_string()],
    };

    let paper = entry.into_paper("An abstract.".to_string());

    assert_eq!(paper.id, "2401.00001");
    assert_eq!(paper.abstract_text, "An abstract.");
    assert!(paper.abstract_translated.is_none());
    assert!(paper.guessed_field.is_none());
    assert_eq!(paper.word_count, 0);
    assert_eq!(paper.word_count_translated, 0);
  }
}
