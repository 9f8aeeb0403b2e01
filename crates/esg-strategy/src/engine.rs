use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use esg_core::{AiSettings, EsgError};

fn map_backend(provider: &str) -> Result<LLMBackend, EsgError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" | "gemini" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(EsgError::Upstream(format!("unknown provider: {other}"))),
    }
}

/// Send one chat turn and return the raw reply text.
///
/// The whole exchange is bounded by `settings.timeout_secs`; expiry is
/// reported as an upstream failure like any other.
pub async fn generate(
    settings: &AiSettings,
    system: &str,
    user_msg: &str,
) -> Result<String, EsgError> {
    let backend = map_backend(&settings.provider)?;

    let mut builder = LLMBuilder::new()
        .backend(backend)
        .model(&settings.model)
        .system(system);

    if !settings.api_key.is_empty() {
        builder = builder.api_key(&settings.api_key);
    }

    let llm = builder
        .build()
        .map_err(|e| EsgError::Upstream(format!("build LLM: {e}")))?;

    let messages = vec![ChatMessage::user().content(user_msg).build()];

    let limit = Duration::from_secs(settings.timeout_secs.max(1));
    let response = bounded(limit, llm.chat(&messages)).await?;

    match response.text() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(EsgError::Upstream("LLM returned empty text".to_string())),
        None => Err(EsgError::Upstream("LLM returned no text".to_string())),
    }
}

/// Await `call` for at most `limit`. Both expiry and a failed call are
/// upstream errors.
async fn bounded<T, E: Display>(
    limit: Duration,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, EsgError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| EsgError::Upstream(format!("no reply within {limit:?}")))?
        .map_err(|e| EsgError::Upstream(format!("chat: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_provider_is_upstream_error() {
        assert!(matches!(map_backend("acme-ai"), Err(EsgError::Upstream(_))));
        assert!(map_backend("gemini").is_ok());
    }

    #[tokio::test]
    async fn slow_reply_times_out_as_upstream_error() {
        let never = std::future::pending::<Result<String, String>>();
        let err = bounded(Duration::from_millis(20), never).await.unwrap_err();
        assert_eq!(err, EsgError::Upstream("no reply within 20ms".to_string()));
    }

    #[tokio::test]
    async fn failed_call_is_upstream_error() {
        let failing = async { Err::<String, _>("connection refused") };
        let err = bounded(Duration::from_secs(5), failing).await.unwrap_err();
        assert_eq!(err, EsgError::Upstream("chat: connection refused".to_string()));
    }

    #[tokio::test]
    async fn prompt_reply_passes_through() {
        let ready = async { Ok::<_, String>("{}".to_string()) };
        assert_eq!(bounded(Duration::from_secs(5), ready).await.unwrap(), "{}");
    }
}
