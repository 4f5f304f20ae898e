//! Core library for spikecoder
//!
//! This crate implements the **Functional Core** of the spikecoder application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The spikecoder project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`spikecoder_core`** (this crate): Pure transformation functions with zero I/O
//! - **`spikecoder`**: the model client, commands and servers (the Imperative Shell)
//!
//! Everything needed to turn a user request into a model request, and a model
//! reply into a [`generation::GenerationResult`], lives here. The shell only
//! moves bytes.
//!
//! # Module Organization
//!
//! - [`docs`]: The bundled SPIKE Prime API reference and section lookup
//! - [`generation`]: Request/result types, prompt construction and strict response decoding
//! - [`gemini`]: Wire format of the Gemini `generateContent` endpoint
//! - [`session`]: Conversation state for interactive front ends
//!
//! # Example Usage
//!
//! ```rust
//! use spikecoder_core::docs::SPIKE_PRIME;
//! use spikecoder_core::generation::{build_model_request, decode_response, GenerationRequest};
//!
//! let request = GenerationRequest::new("Run motor A at 100", "").unwrap();
//! let packaged = build_model_request("gemini-2.5-flash", &request, &SPIKE_PRIME);
//! assert!(packaged.system_instruction.contains(SPIKE_PRIME.text()));
//!
//! let result = decode_response(Some(
//!     r#"{"code":"motor.run(port.A,100)","explanation":"runs motor A"}"#,
//! ))
//! .unwrap();
//! assert_eq!(result.code, "motor.run(port.A,100)");
//! ```

pub mod docs;
pub mod gemini;
pub mod generation;
pub mod session;
