//! Machine translation of abstracts through a chat-completions service.
//!
//! The translator sends each abstract to an OpenAI-style `chat/completions`
//! endpoint with a fixed system prompt asking for a translation into the
//! configured target language, strips common LaTeX emphasis wrappers from the
//! answer, and caches the cleaned result keyed by the raw input text. A
//! response with no generated content is tolerated: the paper simply proceeds
//! without a translated abstract, and nothing is cached so a later run can
//! retry.

use super::*;

lazy_static::lazy_static! {
  /// Matches `\textit{…}`, `\emph{…}`, and `\textbf{…}` wrappers; the inner
  /// text is kept.
  static ref LATEX_EMPHASIS: regex::Regex =
    regex::Regex::new(r"\\(?:textit|emph|textbf)\{([^}]+)\}").unwrap();
}

/// Request body for the chat-completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
  /// Model identifier.
  model:       String,
  /// System and user messages, in order.
  messages:    Vec<ChatMessage>,
  /// Sampling temperature.
  temperature: f32,
}

/// One message in a chat-completions request.
#[derive(Debug, Serialize)]
struct ChatMessage {
  /// `"system"` or `"user"`.
  role:    String,
  /// The message text.
  content: String,
}

/// Response body of the chat-completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
  /// Candidate completions; only the first is used.
  choices: Vec<ChatChoice>,
}

/// One candidate completion.
#[derive(Debug, Deserialize)]
struct ChatChoice {
  /// The generated message.
  message: ChatChoiceMessage,
}

/// The generated message of a completion.
#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
  /// Generated text, absent when the service produced nothing.
  content: Option<String>,
}

/// Client for the translation service, cache-wrapped on the raw input text.
pub struct Translator {
  /// Internal web client used to call the service.
  client: reqwest::Client,
  /// Cache consulted before any service call.
  cache:  ResponseCache,
  /// Endpoint, credentials, model, and prompt settings.
  config: TranslatorConfig,
}

impl Translator {
  /// Creates a new translator using the given translation cache.
  pub fn new(cache: ResponseCache, config: TranslatorConfig) -> Self {
    Self { client: reqwest::Client::new(), cache, config }
  }

  /// Translates `text` into the configured target language.
  ///
  /// Returns `Ok(None)` when the service responds without content; transport
  /// and API failures propagate. Successful translations are cleaned of
  /// LaTeX emphasis wrappers and served from the cache on repeat inputs.
  pub async fn translate(&self, text: &str) -> Result<Option<String>, GleanerError> {
    match self.cache.get_or_compute(text, || self.request_translation(text)).await {
      Ok(translated) => Ok(Some(translated)),
      Err(GleanerError::EmptyCompletion) => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Fills in `abstract_translated` for every paper in the batch, one
  /// sequential service call per uncached abstract.
  pub async fn translate_all(&self, papers: &mut [Paper]) -> Result<(), GleanerError> {
    for paper in papers.iter_mut() {
      let translated = self.translate(&paper.abstract_text).await?;
      debug!("Translated abstract for {}: {:?}", paper.id, translated);
      paper.abstract_translated = translated;
    }
    info!("Translated {} abstracts", papers.len());
    Ok(())
  }

  /// One uncached call to the chat-completions endpoint.
  async fn request_translation(&self, text: &str) -> Result<String, GleanerError> {
    let request = ChatRequest {
      model:       self.config.model.clone(),
      messages:    vec![
        ChatMessage {
          role:    "system".to_string(),
          content: format!(
            "You are a helpful translator that translates English to {}.",
            self.config.target_language
          ),
        },
        ChatMessage {
          role:    "user".to_string(),
          content: format!(
            "Translate the following abstract to {}:\n\n{}",
            self.config.target_language, text
          ),
        },
      ],
      temperature: self.config.temperature,
    };

    let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
    info!("Requesting translation of {} characters", text.len());

    let response = self
      .client
      .post(&url)
      .header("Authorization", format!("Bearer {}", self.config.api_key))
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(GleanerError::Fetch { url, status });
    }

    let completion: ChatResponse = response.json().await?;
    completion
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .filter(|content| !content.is_empty())
      .map(|content| clean_latex(&content))
      .ok_or(GleanerError::EmptyCompletion)
  }
}

/// Replaces LaTeX emphasis wrappers with their bare inner text.
pub fn clean_latex(text: &str) -> String { LATEX_EMPHASIS.replace_all(text, "$1").into_owned() }

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn test_clean_latex_strips_emphasis_wrappers() {
    assert_eq!(clean_latex(r"We study \textit{word} counting"), "We study word counting");
    assert_eq!(clean_latex(r"\emph{a} and \textbf{b}"), "a and b");
    assert_eq!(clean_latex("no markup at all"), "no markup at all");
  }

  #[tokio::test]
  async fn test_translate_serves_cached_text_without_network() {
    let dir = tempdir().unwrap();
    let cache = ResponseCache::translations(dir.path());
    let text = "An abstract that was translated on an earlier run.";

    // Seed the cache the way a successful earlier run would have.
    cache.get_or_compute(text, || async { Ok("Переклад анотації.".to_string()) }).await.unwrap();

    // The endpoint is unroutable, so any service call would fail: the value
    // must come from the cache.
    let translator = Translator::new(ResponseCache::translations(dir.path()), TranslatorConfig {
      api_key:         "test-key".to_string(),
      base_url:        "http://127.0.0.1:1".to_string(),
      model:           "test-model".to_string(),
      target_language: "Ukrainian".to_string(),
      temperature:     0.3,
    });

    let translated = translator.translate(text).await.unwrap();
    assert_eq!(translated.as_deref(), Some("Переклад анотації."));
  }
}
