//! On-disk cache for fetched pages and translated abstracts.
//!
//! Every remote interaction in the pipeline goes through a [`ResponseCache`]:
//! the page fetcher keys entries by URL and the translator keys them by the
//! raw input text. Entries are plain text files whose names are derived from
//! the key, they never expire, and a hit is returned verbatim without any
//! validation against the upstream resource.
//!
//! Keys are not content-hashed. A URL flattens to `host + path` with `/`
//! replaced by `-`, and a translation input keys on its first 15 characters,
//! so two distinct keys that flatten or truncate to the same filename share
//! one entry.
//!
//! # Examples
//!
//! ```
//! use gleaner::ResponseCache;
//!
//! # async fn example() -> Result<(), gleaner::GleanerError> {
//! let cache = ResponseCache::pages("/tmp/gleaner-cache");
//! let body = cache
//!   .get_or_compute("https://arxiv.org/list/cs/recent", || async {
//!     Ok("<html>...</html>".to_string())
//!   })
//!   .await?;
//! # Ok(())
//! # }
//! ```

use std::{fs, future::Future};

use super::*;

/// Number of leading characters a translation input contributes to its cache
/// filename.
const TEXT_KEY_LEN: usize = 15;

/// How a cache key is turned into a filename.
#[derive(Debug, Clone, Copy)]
enum KeyDerivation {
  /// `host + path` with `/` replaced by `-`, suffixed `.html`. Used for
  /// fetched pages.
  FlattenedUrl,
  /// The first [`TEXT_KEY_LEN`] characters of the key with `/` replaced by
  /// `-`, suffixed `.txt`. Used for translation inputs.
  TextPrefix,
}

/// A flat directory of text files keyed by a name derived from the request
/// key.
///
/// The two pipeline namespaces live under one root: pages at the root itself,
/// translations in a `translations/` subdirectory. Only a single process is
/// assumed to write a given cache directory; concurrent runs race on the
/// check-then-write and are not supported.
#[derive(Debug, Clone)]
pub struct ResponseCache {
  /// Directory holding this namespace's entries.
  dir:    PathBuf,
  /// Filename derivation for this namespace.
  naming: KeyDerivation,
}

impl ResponseCache {
  /// The page-fetch namespace, keyed by URL.
  pub fn pages(root: impl AsRef<Path>) -> Self {
    Self { dir: root.as_ref().to_path_buf(), naming: KeyDerivation::FlattenedUrl }
  }

  /// The translation namespace, keyed by input text.
  pub fn translations(root: impl AsRef<Path>) -> Self {
    Self { dir: root.as_ref().join("translations"), naming: KeyDerivation::TextPrefix }
  }

  /// Get default cache root in the user's cache directory.
  pub fn default_root() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join("gleaner")
  }

  /// Return the cached value for `key`, or run `compute`, persist its result,
  /// and return it.
  ///
  /// A hit returns the stored bytes verbatim. On a miss the full result of
  /// `compute` is written before being returned; if `compute` fails, nothing
  /// is cached and the error propagates unmodified.
  pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<String, GleanerError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, GleanerError>>, {
    let path = self.entry_path(key)?;
    if path.exists() {
      debug!("Cache hit for key: {key}");
      return Ok(fs::read_to_string(&path)?);
    }

    debug!("Cache miss for key: {key}");
    let value = compute().await?;
    fs::create_dir_all(&self.dir)?;
    fs::write(&path, &value)?;
    Ok(value)
  }

  /// Derive the on-disk path for `key` under this namespace.
  fn entry_path(&self, key: &str) -> Result<PathBuf, GleanerError> {
    let filename = match self.naming {
      KeyDerivation::FlattenedUrl => {
        let url = Url::parse(key)?;
        let host = url.host_str().unwrap_or_default();
        format!("{}{}.html", host, url.path()).replace('/', "-")
      },
      KeyDerivation::TextPrefix => {
        let prefix: String = key.chars().take(TEXT_KEY_LEN).collect();
        format!("{}.txt", prefix.replace('/', "-"))
      },
    };
    Ok(self.dir.join(filename))
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[tokio::test]
  async fn test_miss_computes_and_persists() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::pages(dir.path());

    let value = cache
      .get_or_compute("https://arxiv.org/list/cs/recent", || async {
        Ok("listing body".to_string())
      })
      .await
      .unwrap();

    assert_eq!(value, "listing body");
    assert!(dir.path().join("arxiv.org-list-cs-recent.html").exists());
  }

  #[tokio::test]
  async fn test_hit_skips_compute() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::pages(dir.path());
    let url = "https://arxiv.org/abs/2401.00001";

    let first =
      cache.get_or_compute(url, || async { Ok("first body".to_string()) }).await.unwrap();

    // The second compute would fail if it ran; the cached bytes come back
    // instead.
    let second = cache
      .get_or_compute(url, || async {
        Err(GleanerError::Config("compute ran on a cache hit".to_string()))
      })
      .await
      .unwrap();

    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_failed_compute_caches_nothing() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::pages(dir.path());
    let url = "https://arxiv.org/abs/2401.00002";

    let result = cache
      .get_or_compute(url, || async { Err(GleanerError::AbstractNotFound("x".to_string())) })
      .await;
    assert!(result.is_err());

    // Nothing was written, so the next compute runs.
    let value = cache.get_or_compute(url, || async { Ok("recovered".to_string()) }).await.unwrap();
    assert_eq!(value, "recovered");
  }

  #[tokio::test]
  async fn test_translation_keys_truncate_to_prefix() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::translations(dir.path());

    let text = "We present a new approach to something long.";
    cache.get_or_compute(text, || async { Ok("переклад".to_string()) }).await.unwrap();

    // The filename only carries the first 15 characters of the input.
    assert!(dir.path().join("translations").join("We present a ne.txt").exists());

    // A different input sharing the same prefix collides with the entry.
    let collider = "We present a new approach to something else entirely.";
    let value = cache
      .get_or_compute(collider, || async { Ok("should not run".to_string()) })
      .await
      .unwrap();
    assert_eq!(value, "переклад");
  }
}
