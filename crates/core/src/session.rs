//! Conversation state for one interactive run.
//!
//! The session belongs to whatever front end drives the chat. It hands the
//! generation service a fresh [`GenerationRequest`] per submission and folds
//! the outcome back in. Nothing here performs I/O.

use crate::generation::{ConversationTurn, GenerationRequest, GenerationResult, Role};

pub const GREETING: &str = "Hello! I'm your LEGO SPIKE Prime coding assistant. I know the Python API inside out. How can I help you program your robot today?";

pub const FAILURE_REPLY: &str = "I encountered an error while processing your request. Please check your API key or try again.";

pub const SUGGESTED_TASK: &str = "My motors are plugged into C, D and E respectively, could you write something that makes it move forward at say 250 so relatviely slow, and make it spin 360 degrees after it detects an object 15cm ahead";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Instruction must not be empty")]
    EmptyInstruction,

    #[error("A generation request is already in progress")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    turns: Vec<ConversationTurn>,
    current_code: String,
    pending: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            turns: vec![ConversationTurn::assistant(GREETING)],
            current_code: String::new(),
            pending: false,
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recently accepted script, empty before the first success.
    pub fn current_code(&self) -> &str {
        &self.current_code
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The starter task to offer until the user has said anything.
    pub fn suggested_task(&self) -> Option<&'static str> {
        if self.turns.iter().any(|t| t.role == Role::User) {
            None
        } else {
            Some(SUGGESTED_TASK)
        }
    }

    /// Record a user submission and build the request for it.
    pub fn begin(&mut self, instruction: &str) -> Result<GenerationRequest, SessionError> {
        if self.pending {
            return Err(SessionError::Busy);
        }

        let request = GenerationRequest::new(instruction, self.current_code.clone())
            .map_err(|_| SessionError::EmptyInstruction)?;

        self.turns.push(ConversationTurn::user(instruction));
        self.pending = true;

        Ok(request)
    }

    /// Accept a successful result. The new code replaces the old one.
    pub fn complete(&mut self, result: GenerationResult) {
        self.turns.push(ConversationTurn::assistant(result.explanation));
        self.current_code = result.code;
        self.pending = false;
    }

    /// Record a failed call. The current code stays authoritative.
    pub fn fail(&mut self) {
        self.turns.push(ConversationTurn::assistant(FAILURE_REPLY));
        self.pending = false;
    }
}
