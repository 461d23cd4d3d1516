use std::collections::HashMap;
use std::sync::Arc;

use scribe_core::position::slice_range;
use serde_json::json;

use super::types::{
    CodeAction, CodeActionData, CodeActionParams, Diagnostic, TextEdit, WorkspaceEdit,
};
use super::{decode_params, internal_error, JsonRpcError, ServerState};
use crate::backend::select_backend;
use crate::resolver::{self, Resolution};

pub const REWRITE_ACTION_ID: &str = "scribe.rewrite";
const REWRITE_ACTION_TITLE: &str = "Scribe: rewrite selection";
const DIAGNOSTIC_SEVERITY_ERROR: i32 = 1;

/// Offer the rewrite action for the requested range.
///
/// The action is returned unresolved; the actual generation call happens in
/// [`handle_resolve`] only when the user invokes it.
pub async fn handle_code_action(
    state: &Arc<ServerState>,
    params: Option<serde_json::Value>,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CodeActionParams = decode_params(params)?;

    let documents = state.documents.read().await;
    if documents.text(&params.text_document.uri).is_none() {
        return serde_json::to_value(Vec::<CodeAction>::new()).map_err(internal_error);
    }

    let action = CodeAction {
        title: REWRITE_ACTION_TITLE.to_string(),
        kind: Some("quickfix".to_string()),
        is_preferred: Some(true),
        diagnostics: None,
        edit: None,
        data: Some(json!({
            "id": REWRITE_ACTION_ID,
            "documentUri": params.text_document.uri,
            "range": params.range,
        })),
    };

    serde_json::to_value(vec![action]).map_err(internal_error)
}

/// Resolve the rewrite action: parse the selection, call the backend, and
/// attach either a workspace edit or a failure diagnostic.
///
/// Failures never escape as errors; the action comes back without an edit
/// and with a diagnostic at the original range, which is also published for
/// the document.
pub async fn handle_resolve(
    state: &Arc<ServerState>,
    params: Option<serde_json::Value>,
) -> Result<serde_json::Value, JsonRpcError> {
    let mut action: CodeAction = decode_params(params)?;

    let data = match action.data.clone().map(serde_json::from_value::<CodeActionData>) {
        Some(Ok(data)) => data,
        // An action without our payload resolves to itself unchanged.
        _ => return serde_json::to_value(action).map_err(internal_error),
    };

    let range_text = {
        let documents = state.documents.read().await;
        match documents.text(&data.document_uri) {
            Some(text) => {
                slice_range(text, data.range.start.into(), data.range.end.into()).to_string()
            }
            None => return serde_json::to_value(action).map_err(internal_error),
        }
    };

    let request = resolver::build_rewrite_request(&range_text, &state.defaults);

    let resolution = match select_backend(&request.model, &state.backend_options) {
        Ok(backend) => resolver::resolve_rewrite(&request, backend.as_ref()).await,
        Err(e) => {
            log::error!("backend unavailable: {e}");
            Resolution::Failed(resolver::GENERATION_FAILED_MESSAGE.to_string())
        }
    };

    match resolution {
        Resolution::Replace(new_text) => {
            let edit = TextEdit {
                range: data.range,
                new_text,
            };
            action.edit = Some(WorkspaceEdit {
                changes: HashMap::from([(data.document_uri.clone(), vec![edit])]),
            });
        }
        Resolution::Failed(message) => {
            let diagnostic = Diagnostic {
                range: data.range,
                message,
                severity: Some(DIAGNOSTIC_SEVERITY_ERROR),
                source: Some("scribe".to_string()),
            };
            action.diagnostics = Some(vec![diagnostic.clone()]);
            super::publish_diagnostics(state, &data.document_uri, vec![diagnostic]).await;
        }
    }

    serde_json::to_value(action).map_err(internal_error)
}
