use serde::Deserialize;
use spikecoder_core::generation::GenerationRequest;

use super::{internal_error, CallToolResult, Content, JsonRpcError};
use crate::generate::{GenerationService, ModelBackend, FAILURE_NOTICE};

pub async fn handle_generate_spike_code<B: ModelBackend>(
    arguments: Option<serde_json::Value>,
    service: &GenerationService<B>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct GenerateArgs {
        instruction: String,
        prior_code: Option<String>,
    }

    let args: GenerateArgs = serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid arguments: {e}"),
            data: None,
        })?;

    if global.verbose {
        anstream::eprintln!(
            "Calling generate_spike_code: instruction='{}', prior_code={} chars",
            args.instruction.chars().take(50).collect::<String>(),
            args.prior_code.as_deref().map_or(0, str::len)
        );
    }

    let request = GenerationRequest::new(args.instruction, args.prior_code.unwrap_or_default())
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid arguments: {e}"),
            data: None,
        })?;

    // Failures are reported as a tool error so the agent can retry.
    let result = match service.generate(request).await {
        Ok(result) => CallToolResult {
            content: vec![Content::Text {
                text: serde_json::to_string_pretty(&result).map_err(internal_error)?,
            }],
            is_error: None,
        },
        Err(_) => CallToolResult {
            content: vec![Content::Text {
                text: FAILURE_NOTICE.to_string(),
            }],
            is_error: Some(true),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}
