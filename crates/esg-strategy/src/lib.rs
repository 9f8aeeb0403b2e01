pub mod engine;
mod parse;
mod prompt;
pub mod template;

use std::sync::Arc;

use async_trait::async_trait;
use esg_core::{AiSettings, EsgData, EsgError, StrategyBundle, StrategyMode, StrategyTexts};

pub use parse::parse_strategy_output;

/// Something that can draft the three strategy variants for a record.
#[async_trait]
pub trait TextStrategySource: Send + Sync {
    fn mode(&self) -> StrategyMode;

    async fn generate(&self, data: &EsgData) -> Result<StrategyTexts, EsgError>;
}

/// Template-backed source. Pure formatting, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSource;

#[async_trait]
impl TextStrategySource for TemplateSource {
    fn mode(&self) -> StrategyMode {
        StrategyMode::Mock
    }

    async fn generate(&self, data: &EsgData) -> Result<StrategyTexts, EsgError> {
        Ok(template::render(data))
    }
}

/// Remote language-model source.
#[derive(Debug, Clone)]
pub struct LlmSource {
    settings: AiSettings,
}

impl LlmSource {
    pub fn new(settings: AiSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TextStrategySource for LlmSource {
    fn mode(&self) -> StrategyMode {
        StrategyMode::Ai
    }

    async fn generate(&self, data: &EsgData) -> Result<StrategyTexts, EsgError> {
        let system = prompt::system_prompt();
        let user_msg = prompt::user_message(data);

        tracing::info!(
            target: "esg_strategy",
            provider = %self.settings.provider,
            model = %self.settings.model,
            company = %data.company_name,
            "requesting strategies"
        );

        let raw = engine::generate(&self.settings, &system, &user_msg).await?;
        tracing::debug!(target: "esg_strategy", "raw LLM output:\n{raw}");

        let texts = parse::parse_strategy_output(&raw)?;
        tracing::info!(
            target: "esg_strategy",
            short = texts.short.len(),
            neutral = texts.neutral.len(),
            detailed = texts.detailed.len(),
            "parsed strategies"
        );
        Ok(texts)
    }
}

/// Pick the source for the given settings: the model when one is configured,
/// the template otherwise.
pub fn source_for(settings: &AiSettings) -> Arc<dyn TextStrategySource> {
    if esg_core::ai_configured(settings) {
        Arc::new(LlmSource::new(settings.clone()))
    } else {
        Arc::new(TemplateSource)
    }
}

/// Produces strategy bundles, falling back to the template whenever the
/// configured source fails.
#[derive(Clone)]
pub struct StrategyGenerator {
    source: Arc<dyn TextStrategySource>,
}

impl StrategyGenerator {
    pub fn new(source: Arc<dyn TextStrategySource>) -> Self {
        Self { source }
    }

    pub fn from_settings(settings: &AiSettings) -> Self {
        Self::new(source_for(settings))
    }

    /// Mode of the configured source. A given bundle may still report `Mock`
    /// if that source failed.
    pub fn configured_mode(&self) -> StrategyMode {
        self.source.mode()
    }

    /// Never fails; the returned `mode` says which source actually produced
    /// the texts.
    pub async fn generate(&self, data: &EsgData) -> StrategyBundle {
        let mode = self.source.mode();
        match self.source.generate(data).await {
            Ok(texts) => StrategyBundle { texts, mode },
            Err(e) => {
                tracing::warn!(
                    target: "esg_strategy",
                    error = %e,
                    "strategy source failed, falling back to template"
                );
                StrategyBundle {
                    texts: template::render(data),
                    mode: StrategyMode::Mock,
                }
            }
        }
    }
}

impl std::fmt::Debug for StrategyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyGenerator")
            .field("mode", &self.source.mode())
            .finish()
    }
}
