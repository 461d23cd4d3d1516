mod actions;
mod cli;
mod completion;
mod documents;
mod stdio;
mod types;

pub use cli::App;

use std::sync::Arc;

use scribe_core::prompt::RequestDefaults;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};

use crate::backend::BackendOptions;
use crate::prelude::*;
use documents::DocumentStore;
use types::*;

// JSON-RPC 2.0 types
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    method: String,
    params: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: String,
    id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcNotification {
    jsonrpc: String,
    method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<serde_json::Value>,
}

const TEXT_DOCUMENT_SYNC_INCREMENTAL: i32 = 2;

/// State shared by every in-flight request: the document mirror, the
/// injected generation defaults, and the outbound message channel.
pub struct ServerState {
    pub documents: RwLock<DocumentStore>,
    pub defaults: RequestDefaults,
    pub backend_options: BackendOptions,
    outbound: mpsc::Sender<String>,
}

impl ServerState {
    pub fn new(
        defaults: RequestDefaults,
        backend_options: BackendOptions,
        outbound: mpsc::Sender<String>,
    ) -> Self {
        Self {
            documents: RwLock::new(DocumentStore::default()),
            defaults,
            backend_options,
            outbound,
        }
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        cli::Commands::Stdio(options) => stdio::run_stdio(options, global).await,
    }
}

/// Handle one framed message. Returns `false` when the client asked the
/// server to exit.
///
/// Document-synchronization notifications apply inline so they stay ordered;
/// requests that call the generation backend run as independent spawned
/// tasks, so slow generations never block one another and completions are
/// unordered.
pub async fn process_message(state: &Arc<ServerState>, raw: &str) -> bool {
    let request: JsonRpcRequest = match serde_json::from_str(raw) {
        Ok(req) => req,
        Err(e) => {
            respond(
                state,
                None,
                Err(JsonRpcError {
                    code: -32700,
                    message: format!("Parse error: {e}"),
                    data: None,
                }),
            )
            .await;
            return true;
        }
    };

    match request.method.as_str() {
        "initialize" => respond(state, request.id, handle_initialize()).await,
        "initialized" => {}
        "shutdown" => respond(state, request.id, Ok(serde_json::Value::Null)).await,
        "exit" => return false,
        "$/cancelRequest" => {
            // No cancellation channel: an in-flight generation runs to
            // completion and the host discards its result.
        }
        "textDocument/didOpen" => {
            match decode_params::<DidOpenTextDocumentParams>(request.params) {
                Ok(params) => {
                    let mut documents = state.documents.write().await;
                    documents.open(params.text_document.uri, params.text_document.text);
                }
                Err(e) => log::warn!("ignoring malformed didOpen: {}", e.message),
            }
        }
        "textDocument/didChange" => {
            match decode_params::<DidChangeTextDocumentParams>(request.params) {
                Ok(params) => {
                    {
                        let mut documents = state.documents.write().await;
                        documents
                            .apply_changes(&params.text_document.uri, &params.content_changes);
                    }
                    // An edit supersedes any diagnostics published earlier.
                    publish_diagnostics(state, &params.text_document.uri, Vec::new()).await;
                }
                Err(e) => log::warn!("ignoring malformed didChange: {}", e.message),
            }
        }
        "textDocument/didClose" => {
            match decode_params::<DidCloseTextDocumentParams>(request.params) {
                Ok(params) => {
                    let mut documents = state.documents.write().await;
                    documents.close(&params.text_document.uri);
                }
                Err(e) => log::warn!("ignoring malformed didClose: {}", e.message),
            }
        }
        "textDocument/codeAction" => {
            let result = actions::handle_code_action(state, request.params).await;
            respond(state, request.id, result).await;
        }
        "codeAction/resolve" => {
            let task_state = Arc::clone(state);
            let id = request.id;
            let params = request.params;
            tokio::spawn(async move {
                let result = actions::handle_resolve(&task_state, params).await;
                respond(&task_state, id, result).await;
            });
        }
        "textDocument/completion" => {
            let task_state = Arc::clone(state);
            let id = request.id;
            let params = request.params;
            tokio::spawn(async move {
                let result = completion::handle_completion(&task_state, params).await;
                respond(&task_state, id, result).await;
            });
        }
        method => {
            // Unknown notifications are ignored; unknown requests get an
            // error response.
            if request.id.is_some() {
                respond(
                    state,
                    request.id,
                    Err(JsonRpcError {
                        code: -32601,
                        message: format!("Method not found: {method}"),
                        data: None,
                    }),
                )
                .await;
            }
        }
    }

    true
}

fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: TEXT_DOCUMENT_SYNC_INCREMENTAL,
            code_action_provider: CodeActionOptions {
                code_action_kinds: vec!["quickfix".to_string()],
                resolve_provider: true,
            },
            completion_provider: CompletionOptions {
                trigger_characters: Vec::new(),
            },
        },
        server_info: ServerInfo {
            name: "scribe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

pub(crate) fn decode_params<T: serde::de::DeserializeOwned>(
    params: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(params.unwrap_or(serde_json::Value::Null)).map_err(|e| JsonRpcError {
        code: -32602,
        message: format!("Invalid params: {e}"),
        data: None,
    })
}

pub(crate) fn internal_error(e: serde_json::Error) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    }
}

async fn respond(
    state: &ServerState,
    id: Option<serde_json::Value>,
    result: Result<serde_json::Value, JsonRpcError>,
) {
    let response = match result {
        Ok(value) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(value),
            error: None,
        },
        Err(error) => JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        },
    };

    match serde_json::to_string(&response) {
        Ok(json) => {
            let _ = state.outbound.send(json).await;
        }
        Err(e) => log::error!("failed to encode response: {e}"),
    }
}

async fn send_notification<P: Serialize>(state: &ServerState, method: &str, params: P) {
    let notification = JsonRpcNotification {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params: serde_json::to_value(params).ok(),
    };

    match serde_json::to_string(&notification) {
        Ok(json) => {
            let _ = state.outbound.send(json).await;
        }
        Err(e) => log::error!("failed to encode notification: {e}"),
    }
}

pub(crate) async fn publish_diagnostics(
    state: &ServerState,
    uri: &str,
    diagnostics: Vec<Diagnostic>,
) {
    send_notification(
        state,
        "textDocument/publishDiagnostics",
        PublishDiagnosticsParams {
            uri: uri.to_string(),
            diagnostics,
        },
    )
    .await;
}
