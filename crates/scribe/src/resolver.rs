use scribe_core::directive;
use scribe_core::fence::extract_fenced;
use scribe_core::prompt::{build_request, GenerationRequest, RequestDefaults};

use crate::backend::TextGenerator;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Fixed user-facing message attached to the range when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate text. Please try again.";

pub const REWRITE_PREAMBLE: &str = "\
You are a highly skilled coding assistant and senior software engineer. Your \
task is to provide concise, accurate, and efficient solutions to the user's \
coding requests. Respond with only the revised code. If your response is a \
new addition to the code, return your additions along with the original \
code. Ensure your answer is plain text without any Markdown formatting. \
Focus on best practices, code optimization, and maintainability in your \
solutions.";

/// Outcome of one resolution request. The selected range is either replaced
/// or left untouched with a message surfaced as a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Replace(String),
    Failed(String),
}

/// Rewrite defaults with the fixed system preamble baked in.
pub fn rewrite_defaults(model: String, temperature: f64) -> RequestDefaults {
    RequestDefaults {
        model,
        temperature,
        system: REWRITE_PREAMBLE.to_string(),
    }
}

/// Parse the selected text and assemble the generation request.
///
/// An absent prompt directive proceeds with an empty instruction instead of
/// failing fast.
pub fn build_rewrite_request(range_text: &str, defaults: &RequestDefaults) -> GenerationRequest {
    build_request(&directive::parse(range_text), defaults)
}

/// Run one generation call and post-process the response.
///
/// Never returns an error: a backend failure becomes a [`Resolution::Failed`]
/// with the fixed message, plus a log entry for operator visibility.
pub async fn resolve_rewrite(
    request: &GenerationRequest,
    backend: &dyn TextGenerator,
) -> Resolution {
    match backend.generate(request).await {
        Ok(text) => Resolution::Replace(extract_fenced(&text)),
        Err(e) => {
            log::error!("text generation failed: {e}");
            Resolution::Failed(GENERATION_FAILED_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    /// Echoes the user prompt back, the way a model that simply repeats its
    /// input would.
    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, Error> {
            Ok(request.prompt.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, Error> {
            Err(Error::Backend("connection refused".to_string()))
        }
    }

    struct FencedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for FencedGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, Error> {
            Ok(self.0.to_string())
        }
    }

    fn defaults() -> RequestDefaults {
        rewrite_defaults("test-model".to_string(), DEFAULT_TEMPERATURE)
    }

    #[test]
    fn test_request_carries_directive_overrides() {
        let request =
            build_rewrite_request("// model: other\n// temperature: 0.9\ncode", &defaults());
        assert_eq!(request.model, "other");
        assert_eq!(request.temperature, 0.9);
        assert_eq!(request.system, REWRITE_PREAMBLE);
    }

    #[tokio::test]
    async fn test_round_trip_through_echo_backend() {
        // The user prompt opens with the fenced context, so an echoing
        // backend round-trips the original selection text.
        let request = build_rewrite_request("//% reformat\nfn main() {}", &defaults());
        let resolution = resolve_rewrite(&request, &EchoGenerator).await;
        assert_eq!(resolution, Resolution::Replace("fn main() {}".to_string()));
    }

    #[tokio::test]
    async fn test_fenced_response_is_unwrapped() {
        let request = build_rewrite_request("//% fix\nbroken", &defaults());
        let backend = FencedGenerator("```rust\nfixed\n```");
        let resolution = resolve_rewrite(&request, &backend).await;
        assert_eq!(resolution, Resolution::Replace("fixed".to_string()));
    }

    #[tokio::test]
    async fn test_unfenced_response_passes_through() {
        let request = build_rewrite_request("//% fix\nbroken", &defaults());
        let backend = FencedGenerator("fixed without fences");
        let resolution = resolve_rewrite(&request, &backend).await;
        assert_eq!(
            resolution,
            Resolution::Replace("fixed without fences".to_string())
        );
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_failed_resolution() {
        let request = build_rewrite_request("//% fix\ncode", &defaults());
        let resolution = resolve_rewrite(&request, &FailingGenerator).await;
        assert_eq!(
            resolution,
            Resolution::Failed(GENERATION_FAILED_MESSAGE.to_string())
        );
    }
}
