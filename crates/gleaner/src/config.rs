//! Runtime configuration for the pipeline.
//!
//! Everything the components need (cache root, database path, listing
//! category, result cap, translation service settings) is collected into one
//! [`Config`] built at process start and passed by reference. No component
//! reads the environment or holds a global client.

use std::env;

use super::*;

/// Default category listing to scrape.
pub const DEFAULT_CATEGORY_PATH: &str = "list/cs/recent";
/// Default cap on records accepted from one listing page.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default chat-completions endpoint root.
const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model used for translation.
const DEFAULT_CHAT_MODEL: &str = "gpt-4.1-nano";
/// Default language abstracts are translated into.
const DEFAULT_TARGET_LANGUAGE: &str = "Ukrainian";
/// Sampling temperature for translation requests.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Settings for the translation service client.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
  /// Bearer token for the chat-completions API.
  pub api_key:         String,
  /// Root of the chat-completions API, without the `/chat/completions`
  /// suffix.
  pub base_url:        String,
  /// Model identifier sent with every request.
  pub model:           String,
  /// Language the fixed system prompt asks for.
  pub target_language: String,
  /// Sampling temperature sent with every request.
  pub temperature:     f32,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct Config {
  /// Root directory of the response cache.
  pub cache_dir:     PathBuf,
  /// Path of the SQLite database file.
  pub database_path: PathBuf,
  /// Listing path scraped each run, relative to the arXiv base URL.
  pub category_path: String,
  /// Cap on records accepted from the listing page.
  pub max_results:   usize,
  /// Translation service settings.
  pub translator:    TranslatorConfig,
}

impl Config {
  /// Build a configuration from the environment.
  ///
  /// `OPENAI_API_KEY` is required. Everything else falls back to a default:
  /// `GLEANER_CACHE_DIR` (user cache dir), `GLEANER_DATABASE` (user data
  /// dir), `GLEANER_CATEGORY` (`list/cs/recent`), `GLEANER_MAX_RESULTS`
  /// (10), `OPENAI_BASE_URL`, `GLEANER_CHAT_MODEL`, and
  /// `GLEANER_TARGET_LANGUAGE`.
  pub fn from_env() -> Result<Self, GleanerError> {
    let api_key = env::var("OPENAI_API_KEY")
      .map_err(|_| GleanerError::Config("OPENAI_API_KEY must be set".to_string()))?;

    Ok(Self {
      cache_dir:     env::var("GLEANER_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| ResponseCache::default_root()),
      database_path: env::var("GLEANER_DATABASE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Database::default_path()),
      category_path: env::var("GLEANER_CATEGORY")
        .unwrap_or_else(|_| DEFAULT_CATEGORY_PATH.to_string()),
      max_results:   env::var("GLEANER_MAX_RESULTS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_MAX_RESULTS),
      translator:    TranslatorConfig {
        api_key,
        base_url: env::var("OPENAI_BASE_URL")
          .unwrap_or_else(|_| DEFAULT_CHAT_BASE_URL.to_string()),
        model: env::var("GLEANER_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
        target_language: env::var("GLEANER_TARGET_LANGUAGE")
          .unwrap_or_else(|_| DEFAULT_TARGET_LANGUAGE.to_string()),
        temperature: DEFAULT_TEMPERATURE,
      },
    })
  }
}
