use serde::Serialize;
use serde_json::json;

use super::types::GenerationRequest;
use crate::docs::DocumentationCorpus;

const PERSONA: &str = "\
You are an expert LEGO Education SPIKE Prime Python programmer.
You write correct, efficient, well-commented MicroPython for the SPIKE Prime Hub.

You MUST follow the API documentation below exactly.
Never use modules, functions or constants that the documentation does not describe.
Run concurrent work (for example two motors moving together) with async/await and the 'runloop' module, unless the request is a simple sequential script.";

const RULES: &str = "\
Rules:
1. Import every module you use ('hub', 'motor', 'motor_pair', 'color_sensor', 'distance_sensor', ...) the way the documentation shows.
2. For driving bases prefer 'motor_pair'. Use individual 'motor' calls when the user describes specific ports.
3. When reading a sensor, import its module (e.g. 'import force_sensor').
4. Interpret quantities in the units the API expects: degrees per second for velocity, millimeters for distance, degrees for rotation.
5. Put the Python script in the 'code' field and a short explanation in the 'explanation' field.
6. When the request is ambiguous, assume reasonable defaults (such as a standard wheel size) and say so in the explanation.
7. When several actions or sensors are involved, structure the script as an async main function started with runloop.run(main()).";

/// Provider-neutral request for one generation call.
///
/// This is a pure function of the model name, the user request and the
/// corpus, so identical inputs serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: String,
    pub prompt: String,
    pub response_schema: serde_json::Value,
}

/// Build the system instruction: persona, constraints, the full corpus and the rules.
pub fn build_system_instruction(corpus: &DocumentationCorpus) -> String {
    format!(
        "{PERSONA}\n\nDOCUMENTATION START:\n{}\nDOCUMENTATION END\n\n{RULES}\n",
        corpus.text()
    )
}

/// Build the user prompt from the prior code context and the new instruction.
pub fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        "Current Code Context (if any):\n{}\n\nUser Request:\n{}\n\nGenerate the full Python script to achieve this.",
        request.prior_code(),
        request.instruction()
    )
}

/// Schema constraining the model output to `{code, explanation}`.
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "code": {
                "type": "STRING",
                "description": "The complete, valid MicroPython code for SPIKE Prime."
            },
            "explanation": {
                "type": "STRING",
                "description": "A short explanation of what the code does and how to wire the robot."
            }
        },
        "required": ["code", "explanation"]
    })
}

/// Package a generation request for the given model.
pub fn build_model_request(
    model: &str,
    request: &GenerationRequest,
    corpus: &DocumentationCorpus,
) -> ModelRequest {
    ModelRequest {
        model: model.to_string(),
        system_instruction: build_system_instruction(corpus),
        prompt: build_prompt(request),
        response_schema: response_schema(),
    }
}
