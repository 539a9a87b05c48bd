pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{GenerationParams, LlmMetadata, LlmProvider, LlmProviderError};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
