use super::types::{GenerationError, GenerationResult};

/// Strictly decode raw model output into a [`GenerationResult`].
///
/// `None` or blank text is [`GenerationError::EmptyResponse`]. Anything that
/// is not a JSON object with exactly two non-blank string fields, `code` and
/// `explanation`, is [`GenerationError::MalformedResponse`]. The field values
/// are returned untouched.
pub fn decode_response(text: Option<&str>) -> Result<GenerationResult, GenerationError> {
    let text = match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(GenerationError::EmptyResponse),
    };

    let payload = strip_json_fence(text);

    // Derived struct deserialization also accepts a sequence in field order.
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    if !value.is_object() {
        return Err(GenerationError::MalformedResponse(
            "expected a JSON object".to_string(),
        ));
    }

    let result: GenerationResult = serde_json::from_value(value)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if result.code.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "field `code` is empty".to_string(),
        ));
    }
    if result.explanation.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "field `explanation` is empty".to_string(),
        ));
    }

    Ok(result)
}

/// Remove one surrounding markdown fence (```json or ```), if present.
fn strip_json_fence(text: &str) -> &str {
    let Some(rest) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };

    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => text,
    }
}
