//! Offline end-to-end test of the pipeline stages, driven by fixed listing
//! and detail pages instead of the network.

use tempfile::tempdir;

use super::*;

/// A listing page with two well-formed entries.
const LISTING_PAGE: &str = r#"<html><body><dl>
  <dt><a title="Abstract" href="/abs/2401.11111">arXiv:2401.11111</a></dt>
  <dd>
    <div class="list-title mathjax">Title: Deep Training of Neural Models</div>
    <div class="list-authors">Authors: Ada Lovelace, Alan Turing</div>
    <div class="list-subjects">Subjects: Machine Learning (cs.LG); Artificial Intelligence (cs.AI)</div>
  </dd>
  <dt><a title="Abstract" href="/abs/2401.22222">arXiv:2401.22222</a></dt>
  <dd>
    <div class="list-title mathjax">Title: Gardening Notes</div>
    <div class="list-authors">Authors: Gregor Mendel</div>
    <div class="list-subjects">Subjects: Other (misc.GEN)</div>
  </dd>
</dl></body></html>"#;

/// Detail page for the first entry; its abstract hits machine-learning
/// keywords.
const DETAIL_PAGE_ONE: &str = r#"<html><body>
  <blockquote class="abstract mathjax">
    <span class="descriptor">Abstract:</span>
    Deep neural training with learning of a model representation.
  </blockquote>
</body></html>"#;

/// Detail page for the second entry; its abstract matches no field keywords.
const DETAIL_PAGE_TWO: &str = r#"<html><body>
  <blockquote class="abstract mathjax">
    <span class="descriptor">Abstract:</span>
    Notes about watering schedules and soil.
  </blockquote>
</body></html>"#;

#[traced_test]
#[tokio::test]
async fn test_offline_end_to_end() -> anyhow::Result<()> {
  let dir = tempdir()?;

  // Extract: listing entries plus per-entry abstracts from the fixed pages.
  let entries = clients::parse_listing(LISTING_PAGE, 10);
  assert_eq!(entries.len(), 2);

  let mut papers: Vec<Paper> = entries
    .into_iter()
    .zip([DETAIL_PAGE_ONE, DETAIL_PAGE_TWO])
    .map(|(entry, detail)| {
      let abstract_text = clients::extract_abstract(detail, &entry.id).unwrap();
      entry.into_paper(abstract_text)
    })
    .collect();

  for paper in &papers {
    assert!(!paper.id.is_empty());
    assert!(!paper.title.is_empty());
    assert!(!paper.authors.is_empty());
    assert!(!paper.categories.is_empty());
    assert!(!paper.abstract_text.is_empty());
  }

  // Transform: the first abstract has a cached translation from an earlier
  // run, the second stays untranslated.
  let translation_cache = ResponseCache::translations(dir.path());
  translation_cache
    .get_or_compute(&papers[0].abstract_text, || async {
      Ok("Глибоке нейронне тренування з навчанням.".to_string())
    })
    .await?;

  let translator = Translator::new(ResponseCache::translations(dir.path()), TranslatorConfig {
    api_key:         "test-key".to_string(),
    base_url:        "http://127.0.0.1:1".to_string(),
    model:           "test-model".to_string(),
    target_language: "Ukrainian".to_string(),
    temperature:     0.3,
  });
  papers[0].abstract_translated = translator.translate(&papers[0].abstract_text).await?;
  assert!(papers[0].abstract_translated.as_deref().is_some_and(|t| !t.is_empty()));

  analysis::analyze_all(&mut papers);

  assert_eq!(papers[0].guessed_field.as_deref(), Some("machine learning"));
  assert!(papers[0].word_count > 0);
  assert!(papers[0].word_count_translated > 0);

  assert_eq!(papers[1].guessed_field, None);
  assert!(papers[1].word_count > 0);
  assert_eq!(papers[1].word_count_translated, 0);

  // Load: the batch persists once; a second run inserts nothing new.
  let db = Database::open(dir.path().join("test.db")).await?;
  assert_eq!(db.insert_papers(&papers).await?, 2);
  assert_eq!(db.insert_papers(&papers).await?, 0);

  let stored = db.get_paper("arXiv:2401.11111").await?.expect("paper should be stored");
  assert_eq!(stored.title, "Deep Training of Neural Models");
  assert_eq!(stored.categories.len(), 2);

  // Report: one observation per (paper, category) pair.
  let summary = report::summarize(&papers);
  assert_eq!(summary.papers_by_field, vec![("machine learning".to_string(), 2)]);
  assert_eq!(summary.average_words_by_category.len(), 3);

  Ok(())
}
