//! Types for streaming responses.

use crate::types::{FinishReason, Usage};

/// Events that can be emitted during streaming.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A chunk of content was received.
    ContentDelta { delta: String },
    /// The stream has finished.
    Done {
        finish_reason: FinishReason,
        usage: Usage,
    },
    /// An error occurred during streaming.
    Error { error: String },
}
