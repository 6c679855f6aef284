//! SQLite persistence for harvested papers.
//!
//! The store is a single `papers` table keyed by the arXiv identifier.
//! Writes are insert-only: a record whose identifier is already present is
//! skipped silently, and no update or delete path exists. Schema setup is an
//! explicit, idempotent step performed by [`Database::open`], never a side
//! effect of anything else.

use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;

/// Database handle for gleaner.
pub struct Database {
  /// The underlying async SQLite connection.
  conn: Connection,
}

impl Database {
  /// Open or create a database at the specified path, creating parent
  /// directories and running the idempotent schema setup.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, GleanerError> {
    if let Some(parent) = path.as_ref().parent() {
      std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path.as_ref()).await?;

    // Initialize schema
    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    Ok(Self { conn })
  }

  /// Get default database path in user's data directory
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("gleaner").join("gleaner.db")
  }

  /// Insert a batch of papers, skipping any whose identifier is already
  /// stored.
  ///
  /// Each record is written in its own implicit transaction; there is no
  /// cross-record rollback. Returns the number of rows actually inserted.
  pub async fn insert_papers(&self, papers: &[Paper]) -> Result<usize, GleanerError> {
    info!("Inserting {} papers into the database", papers.len());

    // Serialize the category lists up front so the closure only touches
    // rusqlite.
    let rows = papers
      .iter()
      .map(|paper| -> Result<_, GleanerError> {
        Ok((
          paper.id.clone(),
          paper.title.clone(),
          paper.authors.clone(),
          serde_json::to_string(&paper.categories)?,
          paper.abstract_text.clone(),
          paper.abstract_translated.clone(),
          paper.guessed_field.clone(),
          paper.word_count as i64,
          paper.word_count_translated as i64,
        ))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let inserted = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT OR IGNORE INTO papers (
                        id, title, authors, categories, abstract,
                        abstract_translated, guessed_field,
                        word_count, word_count_translated
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;

        let mut inserted = 0;
        for row in &rows {
          inserted +=
            stmt.execute(params![row.0, row.1, row.2, row.3, row.4, row.5, row.6, row.7, row.8])?;
        }
        Ok(inserted)
      })
      .await?;

    info!("Inserted {} papers ({} duplicates skipped)", inserted, papers.len() - inserted);
    Ok(inserted)
  }

  /// Insert a single paper; `true` if a row was written, `false` if its
  /// identifier was already present.
  pub async fn insert_paper(&self, paper: &Paper) -> Result<bool, GleanerError> {
    Ok(self.insert_papers(std::slice::from_ref(paper)).await? == 1)
  }

  /// Get a paper by its identifier
  pub async fn get_paper(&self, id: &str) -> Result<Option<Paper>, GleanerError> {
    // Clone the value before moving into the async closure
    let id = id.to_string();

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, title, authors, categories, abstract,
                            abstract_translated, guessed_field,
                            word_count, word_count_translated
                     FROM papers
                     WHERE id = ?1",
        )?;

        let paper = stmt.query_row(params![id], |row| {
          Ok(Paper {
            id:                    row.get(0)?,
            title:                 row.get(1)?,
            authors:               row.get(2)?,
            categories:            serde_json::from_str(&row.get::<_, String>(3)?)
              .unwrap_or_default(),
            abstract_text:         row.get(4)?,
            abstract_translated:   row.get(5)?,
            guessed_field:         row.get(6)?,
            word_count:            row.get::<_, i64>(7)? as usize,
            word_count_translated: row.get::<_, i64>(8)? as usize,
          })
        });

        match paper {
          Ok(paper) => Ok(Some(paper)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(GleanerError::from)
  }

  /// Number of papers currently stored.
  pub async fn paper_count(&self) -> Result<usize, GleanerError> {
    self
      .conn
      .call(|conn| {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM papers", [], |row| row.get(0))?;
        Ok(count as usize)
      })
      .await
      .map_err(GleanerError::from)
  }
}
