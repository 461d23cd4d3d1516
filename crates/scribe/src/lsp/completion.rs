use std::sync::Arc;

use scribe_core::completion::parse_completion_list;
use scribe_core::position::{slice_range, TextPosition};
use scribe_core::prompt::GenerationRequest;

use super::types::{CompletionItem, CompletionParams};
use super::{decode_params, internal_error, JsonRpcError, ServerState};
use crate::backend::select_backend;

/// Lines preceding the cursor handed to the model as context.
const CONTEXT_LINES: u32 = 40;

/// Plain-text completion item kind.
const COMPLETION_ITEM_KIND_TEXT: i32 = 1;

const COMPLETION_PREAMBLE: &str = "\
You are a code completion engine. You receive the code immediately before \
the cursor and respond with completion suggestions.

Rules:
- Respond with ONLY a JSON array. No prose, no explanations.
- Each element is an object with a \"label\" field, an optional \"detail\" \
field, and an optional \"insertText\" field.
- Suggest at most five completions, ordered from most to least likely.
- Never repeat text that already appears before the cursor.";

/// Ask the backend for completion suggestions at the cursor.
///
/// Every failure mode (missing document, unavailable backend, generation
/// error, undecodable response) degrades to an empty list with a log entry.
pub async fn handle_completion(
    state: &Arc<ServerState>,
    params: Option<serde_json::Value>,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CompletionParams = decode_params(params)?;

    let prefix = {
        let documents = state.documents.read().await;
        match documents.text(&params.text_document.uri) {
            Some(text) => {
                let start =
                    TextPosition::new(params.position.line.saturating_sub(CONTEXT_LINES), 0);
                slice_range(text, start, params.position.into()).to_string()
            }
            None => {
                return serde_json::to_value(Vec::<CompletionItem>::new())
                    .map_err(internal_error)
            }
        }
    };

    let request = GenerationRequest {
        model: state.defaults.model.clone(),
        system: COMPLETION_PREAMBLE.to_string(),
        temperature: state.defaults.temperature,
        prompt: prefix,
    };

    let items: Vec<CompletionItem> = match select_backend(&request.model, &state.backend_options) {
        Ok(backend) => match backend.generate(&request).await {
            Ok(response) => match parse_completion_list(&response) {
                Ok(choices) => choices
                    .into_iter()
                    .map(|choice| CompletionItem {
                        label: choice.label,
                        kind: Some(COMPLETION_ITEM_KIND_TEXT),
                        detail: choice.detail,
                        insert_text: choice.insert_text,
                    })
                    .collect(),
                Err(e) => {
                    // Malformed model output means no suggestions, not an error.
                    log::warn!("completion response failed to decode: {e}");
                    Vec::new()
                }
            },
            Err(e) => {
                log::error!("completion generation failed: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            log::error!("backend unavailable: {e}");
            Vec::new()
        }
    };

    serde_json::to_value(items).map_err(internal_error)
}
