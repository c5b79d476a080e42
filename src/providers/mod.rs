//! Provider implementations for hosted LLM services.

pub mod openai;

pub use openai::OpenAIProvider;
