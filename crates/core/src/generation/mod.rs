pub mod decode;
pub mod prompt;
pub mod types;

pub use decode::decode_response;
pub use prompt::{
    build_model_request, build_prompt, build_system_instruction, response_schema, ModelRequest,
};
pub use types::{ConversationTurn, GenerationError, GenerationRequest, GenerationResult, Role};
