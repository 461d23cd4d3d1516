use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::{anthropic, ollama};
use scribe_core::prompt::GenerationRequest;

use crate::error::Error;

/// Upper bound for generated output; Anthropic requires an explicit cap.
const MAX_TOKENS: u64 = 8192;

/// Capability boundary for text generation.
///
/// One best-effort call per request: no retry, no client-side timeout, no
/// cancellation. Implementations map any provider failure to
/// [`Error::Backend`]; callers treat all failures uniformly.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error>;
}

/// Generation through the Anthropic API.
pub struct AnthropicGenerator {
    client: anthropic::Client,
}

impl AnthropicGenerator {
    pub fn new(api_key: &str) -> Result<Self, Error> {
        let client = anthropic::Client::builder()
            .api_key(api_key)
            .build()
            .map_err(|e| Error::ClientBuild(format!("{e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
        let agent = self
            .client
            .agent(&request.model)
            .preamble(&request.system)
            .temperature(request.temperature)
            .max_tokens(MAX_TOKENS)
            .build();

        agent
            .prompt(&request.prompt)
            .await
            .map_err(|e| Error::Backend(format!("{e}")))
    }
}

/// Generation through a local Ollama instance.
pub struct OllamaGenerator {
    client: ollama::Client,
}

impl OllamaGenerator {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        use rig::client::Nothing;

        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| Error::ClientBuild(format!("{e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
        let agent = self
            .client
            .agent(&request.model)
            .preamble(&request.system)
            .temperature(request.temperature)
            .build();

        agent
            .prompt(&request.prompt)
            .await
            .map_err(|e| Error::Backend(format!("{e}")))
    }
}

/// Records every request and outcome around another generator.
///
/// The persisted log format belongs to the logging sink; this wrapper only
/// emits entries.
pub struct AuditedGenerator<G> {
    inner: G,
}

impl<G> AuditedGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for AuditedGenerator<G> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
        log::info!(
            "generation request: model={} temperature={} prompt_chars={}",
            request.model,
            request.temperature,
            request.prompt.len()
        );

        let result = self.inner.generate(request).await;

        match &result {
            Ok(text) => log::debug!("generation response: {} chars", text.len()),
            Err(e) => log::warn!("generation failed: {e}"),
        }

        result
    }
}

/// Connection settings for backend construction.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Ollama base URL used for non-Anthropic models.
    pub ollama_url: String,
}

/// Map a model identifier to a concrete client.
///
/// Anthropic models are routed by name; any other identifier is assumed to
/// name a local Ollama model. Every client is wrapped in an
/// [`AuditedGenerator`].
pub fn select_backend(
    model: &str,
    options: &BackendOptions,
) -> Result<Box<dyn TextGenerator>, Error> {
    if model.starts_with("claude") {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| Error::ClientBuild("ANTHROPIC_API_KEY is not set".to_string()))?;
        Ok(Box::new(AuditedGenerator::new(AnthropicGenerator::new(
            &api_key,
        )?)))
    } else {
        Ok(Box::new(AuditedGenerator::new(OllamaGenerator::new(
            &options.ollama_url,
        )?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticGenerator {
        response: Result<String, Error>,
    }

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, Error> {
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::Backend(format!("{e}"))),
            }
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "test-model".to_string(),
            system: "system".to_string(),
            temperature: 0.3,
            prompt: "prompt".to_string(),
        }
    }

    #[tokio::test]
    async fn test_audit_wrapper_passes_success_through() {
        let audited = AuditedGenerator::new(StaticGenerator {
            response: Ok("generated".to_string()),
        });
        let text = audited.generate(&request()).await.unwrap();
        assert_eq!(text, "generated");
    }

    #[tokio::test]
    async fn test_audit_wrapper_passes_failure_through() {
        let audited = AuditedGenerator::new(StaticGenerator {
            response: Err(Error::Backend("boom".to_string())),
        });
        let err = audited.generate(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
