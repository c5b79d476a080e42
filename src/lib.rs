//! LEW (Life-Enhanced Wellbeing) estimator.
//!
//! Computes the LEW score from three bounded inputs and asks a hosted chat
//! model for motivational guidance on it. The page sequence lives in
//! [`page`]; the `lew` binary draws it in a terminal.

pub mod accumulator;
pub mod advice;
pub mod credentials;
pub mod error;
pub mod inputs;
pub mod page;
pub mod provider;
pub mod providers;
pub mod response;
pub mod score;
pub mod sse_stream;
pub mod types;

// Re-export core types for easy usage
pub use advice::{AdviceSettings, Advisor};
pub use credentials::{AdvisorConfig, CredentialSource};
pub use error::Error;
pub use inputs::{Inputs, Slider};
pub use page::{AdviceOutcome, Element, ErrorDetail, Page, Surface};
pub use provider::LLMProvider;
pub use providers::*;
pub use response::*;
pub use score::{lew_score, LewScore};
pub use sse_stream::SseEvent;
pub use types::*;
