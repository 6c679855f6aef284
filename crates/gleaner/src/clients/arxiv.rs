//! Client for scraping papers from arXiv's HTML listing and detail pages.
//!
//! A category listing page lays out one entry per `<dt>`/`<dd>` pair in
//! document order: the `<dt>` carries the identifier links, the `<dd>` the
//! title, authors, and subjects containers. [`parse_listing`] walks those
//! pairs into [`ListingEntry`] values, and [`ArxivClient::fetch_abstract`]
//! pulls the abstract text out of each paper's detail page. Every page fetch
//! goes through the [`ResponseCache`], so re-running against the same listing
//! touches the network only for pages not yet cached.
//!
//! # Examples
//!
//! ```no_run
//! use gleaner::{ArxivClient, ResponseCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArxivClient::new(ResponseCache::pages(".cache"));
//!
//! // Ten most recent computer science papers, abstracts included.
//! let papers = client.fetch_papers_by_category("list/cs/recent", 10).await?;
//! for paper in &papers {
//!   println!("{}: {}", paper.id, paper.title);
//! }
//! # Ok(())
//! # }
//! ```

use scraper::{ElementRef, Html, Selector};

use super::*;

/// Base URL of the arXiv website.
pub const ARXIV_BASE_URL: &str = "https://arxiv.org/";

/// Client for fetching papers from arXiv's HTML pages.
///
/// Holds the HTTP client reused across requests and the page cache every
/// fetch is wrapped in.
pub struct ArxivClient {
  /// Internal web client used to fetch pages.
  client:   reqwest::Client,
  /// Cache consulted before any network fetch.
  cache:    ResponseCache,
  /// The base URL listing and detail paths are joined onto.
  base_url: String,
}

impl ArxivClient {
  /// Creates a new arXiv client using the given page cache.
  pub fn new(cache: ResponseCache) -> Self {
    Self { client: reqwest::Client::new(), cache, base_url: ARXIV_BASE_URL.to_string() }
  }

  /// Fetches a page by URL through the cache.
  ///
  /// # Errors
  ///
  /// Returns [`GleanerError::Fetch`] with the URL and status code when the
  /// server answers with a non-success status, or a network error if the
  /// request itself fails. No timeout or retry beyond reqwest's defaults.
  pub async fn get_page(&self, url: &str) -> Result<String, GleanerError> {
    self
      .cache
      .get_or_compute(url, || async {
        info!("Fetching page: {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
          return Err(GleanerError::Fetch { url: url.to_string(), status });
        }
        Ok(response.text().await?)
      })
      .await
  }

  /// Fetches papers from the given category listing, abstracts included.
  ///
  /// Parses the listing into entries, then fetches each entry's abstract from
  /// its detail page. An entry whose abstract cannot be fetched (detail page
  /// failure or missing abstract container) is skipped with a warning rather
  /// than failing the batch, so the returned set can be smaller than the
  /// listing cap.
  ///
  /// # Arguments
  ///
  /// * `category_path` - Listing path relative to the arXiv base URL, e.g. `"list/cs/recent"`.
  /// * `max_results` - Cap on entries accepted from the listing, in document order.
  pub async fn fetch_papers_by_category(
    &self,
    category_path: &str,
    max_results: usize,
  ) -> Result<Vec<Paper>, GleanerError> {
    info!("Fetching listing page for {category_path}");
    let url = Url::parse(&self.base_url)?.join(category_path)?;
    let html = self.get_page(url.as_str()).await?;

    let entries = parse_listing(&html, max_results);
    debug!("Listing yielded {} entries", entries.len());

    let mut papers = Vec::with_capacity(entries.len());
    for entry in entries {
      match self.fetch_abstract(&entry.id).await {
        Ok(abstract_text) => papers.push(entry.into_paper(abstract_text)),
        Err(e) => warn!("Skipping paper {}: {e}", entry.id),
      }
    }
    Ok(papers)
  }

  /// Fetches the abstract of a paper given its identifier.
  ///
  /// # Errors
  ///
  /// Returns [`GleanerError::AbstractNotFound`] carrying the identifier when
  /// the detail page has no abstract container, or a fetch error when the
  /// page itself cannot be retrieved.
  pub async fn fetch_abstract(&self, id: &str) -> Result<String, GleanerError> {
    debug!("Fetching abstract for paper: {id}");
    let url = Url::parse(&self.base_url)?.join(&format!("abs/{id}"))?;
    let html = self.get_page(url.as_str()).await?;
    extract_abstract(&html, id)
  }
}

/// Parses a category listing document into partial paper entries.
///
/// Walks `<dt>`/`<dd>` pairs in document order and stops once `max_results`
/// entries have been accepted, however many pairs remain. A pair missing its
/// identifier link, title, authors, or subjects container is skipped
/// entirely: tolerated malformed markup, not an error. Empty input yields an
/// empty vector, as does `max_results == 0`.
pub fn parse_listing(html: &str, max_results: usize) -> Vec<ListingEntry> {
  let document = Html::parse_document(html);
  let dt_selector = Selector::parse("dt").unwrap();
  let dd_selector = Selector::parse("dd").unwrap();

  let mut entries = Vec::new();
  for (dt, dd) in document.select(&dt_selector).zip(document.select(&dd_selector)) {
    if entries.len() >= max_results {
      break;
    }
    if let Some(entry) = parse_entry(dt, dd) {
      entries.push(entry);
    }
  }
  entries
}

/// Parses one `<dt>`/`<dd>` pair, or `None` if any required container is
/// missing.
fn parse_entry(dt: ElementRef, dd: ElementRef) -> Option<ListingEntry> {
  let abstract_link = Selector::parse(r#"a[title="Abstract"]"#).unwrap();
  let title_selector = Selector::parse("div.list-title").unwrap();
  let authors_selector = Selector::parse("div.list-authors").unwrap();
  let subjects_selector = Selector::parse("div.list-subjects").unwrap();

  let id = element_text(dt.select(&abstract_link).next()?);
  debug!("Paper ID: {id}");

  let Some(title_div) = dd.select(&title_selector).next() else {
    warn!("Title not found for paper {id}");
    return None;
  };
  let title = element_text(title_div).replace("Title:", "").trim().to_string();

  let Some(authors_div) = dd.select(&authors_selector).next() else {
    warn!("Authors not found for paper {id}");
    return None;
  };
  let authors = element_text(authors_div).replace("Authors:", "").trim().to_string();

  let Some(subjects_div) = dd.select(&subjects_selector).next() else {
    warn!("Subjects not found for paper {id}");
    return None;
  };
  let subjects = element_text(subjects_div).replace("Subjects:", "");
  let categories: Vec<String> =
    subjects.split(';').map(|category| category.trim().to_string()).collect();

  Some(ListingEntry { id, title, authors, categories })
}

/// Extracts the abstract text from a paper's detail page.
///
/// # Errors
///
/// Returns [`GleanerError::AbstractNotFound`] carrying `id` when the document
/// has no abstract container.
pub fn extract_abstract(html: &str, id: &str) -> Result<String, GleanerError> {
  let document = Html::parse_document(html);
  let abstract_selector = Selector::parse("blockquote.abstract").unwrap();
  document
    .select(&abstract_selector)
    .next()
    .map(element_text)
    .ok_or_else(|| GleanerError::AbstractNotFound(id.to_string()))
}

/// Concatenated, trimmed text content of an element.
fn element_text(element: ElementRef) -> String {
  element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Renders one listing entry; `with_subjects` controls whether the
  /// subjects container is present.
  fn listing_entry(index: usize, with_subjects: bool) -> String {
    let subjects = if with_subjects {
      "<div class=\"list-subjects\">Subjects: Machine Learning (cs.LG); \
       Computation and Language (cs.CL)</div>"
    } else {
      ""
    };
    format!(
      r#"<dt><a title="Abstract" href="/abs/2401.{index:05}">arXiv:2401.{index:05}</a></dt>
      <dd>
        <div class="list-title mathjax">Title: Paper number {index}</div>
        <div class="list-authors">Authors: Author {index}</div>
        {subjects}
      </dd>"#
    )
  }

  /// Builds a listing document with `total` entries, of which the indices in
  /// `without_subjects` lack their subjects container.
  fn listing_page(total: usize, without_subjects: &[usize]) -> String {
    let mut body = String::from("<html><body><dl>");
    for index in 0..total {
      body.push_str(&listing_entry(index, !without_subjects.contains(&index)));
    }
    body.push_str("</dl></body></html>");
    body
  }

  #[test]
  fn test_listing_respects_result_cap() {
    let html = listing_page(15, &[]);
    let entries = parse_listing(&html, 10);

    assert_eq!(entries.len(), 10);
    // Document order is preserved.
    for (index, entry) in entries.iter().enumerate() {
      assert_eq!(entry.id, format!("arXiv:2401.{index:05}"));
    }
  }

  #[test]
  fn test_listing_skips_malformed_entries() {
    let html = listing_page(15, &[2, 7, 11]);
    let entries = parse_listing(&html, 15);

    assert_eq!(entries.len(), 12);
    assert!(entries.iter().all(|entry| !entry.categories.is_empty()));
  }

  #[test]
  fn test_listing_entry_fields() {
    let html = listing_page(1, &[]);
    let entries = parse_listing(&html, 10);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "arXiv:2401.00000");
    assert_eq!(entries[0].title, "Paper number 0");
    assert_eq!(entries[0].authors, "Author 0");
    assert_eq!(entries[0].categories, vec![
      "Machine Learning (cs.LG)".to_string(),
      "Computation and Language (cs.CL)".to_string()
    ]);
  }

  #[test]
  fn test_listing_edge_cases() {
    // Empty input yields nothing.
    assert!(parse_listing("", 10).is_empty());
    // A zero cap accepts nothing.
    assert!(parse_listing(&listing_page(5, &[]), 0).is_empty());
    // Fewer entries than the cap returns all valid ones.
    assert_eq!(parse_listing(&listing_page(3, &[]), 10).len(), 3);
  }

  #[test]
  fn test_extract_abstract() {
    let html = r#"<html><body>
      <blockquote class="abstract mathjax">
        <span class="descriptor">Abstract:</span>
        We study word counting in earnest.
      </blockquote>
    </body></html>"#;

    let text = extract_abstract(html, "2401.00000").unwrap();
    assert!(text.contains("We study word counting in earnest."));
  }

  #[test]
  fn test_extract_abstract_missing_container() {
    let result = extract_abstract("<html><body><p>nothing here</p></body></html>", "2401.00042");
    assert!(matches!(result, Err(GleanerError::AbstractNotFound(id)) if id == "2401.00042"));
  }
}
