//! Wire format of the Gemini `generateContent` REST endpoint.
//!
//! Only the fields this project sends or reads are modelled. The HTTP call
//! itself lives in the shell crate.

use serde::{Deserialize, Serialize};

use crate::generation::ModelRequest;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// URL of the `generateContent` method for `model`.
pub fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Convert a packaged request into the Gemini request body.
pub fn to_wire(request: &ModelRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: Some(request.system_instruction.clone()),
            }],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(request.prompt.clone()),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: request.response_schema.clone(),
        },
    }
}

/// Concatenated text parts of the first candidate, if it has any.
pub fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;

    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    }
}

/// Human-readable summary of a failed call, for logs and error payloads.
pub fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("HTTP {status} {code}: {}", envelope.error.message),
            None => format!("HTTP {status}: {}", envelope.error.message),
        },
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::SPIKE_PRIME;
    use crate::generation::{build_model_request, GenerationRequest};

    fn model_request() -> ModelRequest {
        let request = GenerationRequest::new("Beep twice", "").unwrap();
        build_model_request(DEFAULT_MODEL, &request, &SPIKE_PRIME)
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:8080/v1beta/", "gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_wire_body_shape() {
        let request = model_request();
        let body = serde_json::to_value(to_wire(&request)).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            request.system_instruction.as_str()
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            request.prompt.as_str()
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_wire_body_is_deterministic() {
        let first = serde_json::to_string(&to_wire(&model_request())).unwrap();
        let second = serde_json::to_string(&to_wire(&model_request())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"code\":"},{"text":"\"x\"}"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(response_text(&response).as_deref(), Some(r#"{"code":"x"}"#));
    }

    #[test]
    fn test_response_text_missing() {
        let no_candidates: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response_text(&no_candidates), None);

        let no_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(response_text(&no_content), None);

        let no_text: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap();
        assert_eq!(response_text(&no_text), None);
    }

    #[test]
    fn test_describe_error() {
        let body =
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            describe_error(429, body),
            "HTTP 429 RESOURCE_EXHAUSTED: Quota exceeded"
        );
        assert_eq!(describe_error(502, ""), "HTTP 502");
        assert_eq!(describe_error(500, "oops\n"), "HTTP 500: oops");
    }
}
