use serde::Deserialize;

use super::{internal_error, CallToolResult, Content, JsonRpcError};
use crate::docs::docs_data;
use crate::generate::{GenerationService, ModelBackend};

pub fn handle_spike_docs<B: ModelBackend>(
    arguments: Option<serde_json::Value>,
    service: &GenerationService<B>,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize, Default)]
    struct DocsArgs {
        section: Option<String>,
    }

    let args: DocsArgs = match arguments {
        Some(value) => serde_json::from_value(value).map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid arguments: {e}"),
            data: None,
        })?,
        None => DocsArgs::default(),
    };

    let output = docs_data(service.corpus(), args.section.as_deref()).map_err(|e| {
        JsonRpcError {
            code: -32602,
            message: e.to_string(),
            data: None,
        }
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: output.text }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(internal_error)
}
