//! Concrete LLM-backed implementations of the engine's backend traits

pub mod json;
pub mod llm;
pub mod vision;

pub use llm::{LlmClient, LlmNarrativeBackend, LlmTextBackend};
pub use vision::VisionDocumentBackend;
