use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Input of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    instruction: String,
    prior_code: String,
}

impl GenerationRequest {
    /// Build a request, rejecting instructions that are blank after trimming.
    ///
    /// An empty `prior_code` means there is no existing script to build on.
    pub fn new(
        instruction: impl Into<String>,
        prior_code: impl Into<String>,
    ) -> Result<Self, String> {
        let instruction = instruction.into();
        if instruction.trim().is_empty() {
            return Err("Instruction must not be empty".to_string());
        }

        Ok(Self {
            instruction,
            prior_code: prior_code.into(),
        })
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn prior_code(&self) -> &str {
        &self.prior_code
    }
}

/// Output of a successful generation call. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationResult {
    pub code: String,
    pub explanation: String,
}

/// Why a generation call failed.
///
/// The string payloads are diagnostic detail for logs. Callers should treat
/// every variant as the same retriable failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Model response did not match the expected shape: {0}")]
    MalformedResponse(String),

    #[error("Model request failed: {0}")]
    UpstreamError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_blank_instruction() {
        assert!(GenerationRequest::new("", "").is_err());
        assert!(GenerationRequest::new(" \n\t ", "motor.run(port.A, 100)").is_err());
    }

    #[test]
    fn test_request_keeps_inputs_verbatim() {
        let request = GenerationRequest::new("  spin motor A  ", "").unwrap();
        assert_eq!(request.instruction(), "  spin motor A  ");
        assert_eq!(request.prior_code(), "");
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let turn = ConversationTurn::assistant("hi");
        let json = serde_json::to_string(&turn).unwrap();
        assert_eq!(json, r#"{"role":"assistant","text":"hi"}"#);
    }
}
