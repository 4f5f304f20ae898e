mod docs;
mod generate;

use crate::generate::{GenerationService, ModelBackend};
use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

fn internal_error(e: serde_json::Error) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    }
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "spikecoder".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "generate_spike_code".to_string(),
            description: "Generate a complete LEGO SPIKE Prime MicroPython script from a plain-language instruction. The model only uses APIs from the bundled SPIKE Prime reference. Pass the previously generated script as prior_code to refine it. Returns a JSON object with `code` and `explanation`. Requires the GEMINI_API_KEY environment variable.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "instruction": {
                        "type": "string",
                        "description": "What the robot should do (e.g., 'drive forward at 250 until an object is 15cm away, then spin 360 degrees')"
                    },
                    "prior_code": {
                        "type": "string",
                        "description": "The current script to build on (default: empty)"
                    }
                },
                "required": ["instruction"]
            }),
        },
        Tool {
            name: "spike_docs".to_string(),
            description: "Read the bundled SPIKE Prime Python API reference. Without arguments returns the whole reference; with `section` returns the first section whose title starts with that text (e.g., 'Motor Pair Module').".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "section": {
                        "type": "string",
                        "description": "Section title prefix (optional)"
                    }
                },
                "required": []
            }),
        },
    ];

    serde_json::to_value(ToolsList { tools }).map_err(internal_error)
}

pub async fn handle_tools_call<B: ModelBackend>(
    params: Option<serde_json::Value>,
    service: &GenerationService<B>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "generate_spike_code" => {
            generate::handle_generate_spike_code(params.arguments, service, global).await
        }
        "spike_docs" => docs::handle_spike_docs(params.arguments, service),
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}
