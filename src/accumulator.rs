//! Folding streamed deltas into a complete response.

use crate::types::{FinishReason, StreamEvent, Usage};
use crate::{CompleteResponse, Error};

/// Accumulates streaming deltas into a complete response.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    content: String,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
    finished: bool,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one stream event.
    ///
    /// An `Error` event aborts accumulation; deltas arriving after `Done`
    /// are rejected.
    pub fn process_event(&mut self, event: StreamEvent) -> Result<(), Error> {
        match event {
            StreamEvent::ContentDelta { delta } => {
                if self.finished {
                    return Err(Error::streaming("content received after stream finished"));
                }
                self.content.push_str(&delta);
            }
            StreamEvent::Done {
                finish_reason,
                usage,
            } => {
                self.finish_reason = Some(finish_reason);
                self.usage = Some(usage);
                self.finished = true;
            }
            StreamEvent::Error { error } => return Err(Error::streaming(error)),
        }

        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finalize(self) -> CompleteResponse {
        CompleteResponse {
            content: self.content,
            finish_reason: self.finish_reason.unwrap_or(FinishReason::Stop),
            usage: self.usage.unwrap_or_default(),
        }
    }
}
