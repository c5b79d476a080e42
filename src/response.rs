//! Response handling for LLM generations.

use crate::accumulator::ResponseAccumulator;
use crate::{Error, FinishReason, StreamEvent, Usage};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use std::pin::Pin;

/// A complete, buffered response from an LLM provider.
#[derive(Debug, Clone)]
pub struct CompleteResponse {
    pub content: String,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

/// Response from an LLM generation that can be streamed or buffered.
/// All responses are internally streaming.
pub struct Response {
    stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, Error>> + Send>>,
}

impl Response {
    /// Create a new response from a stream of events.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<StreamEvent, Error>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Buffer the entire response by consuming the stream.
    pub async fn buffer(mut self) -> Result<CompleteResponse, Error> {
        let mut accumulator = ResponseAccumulator::new();

        while let Some(event) = self.stream.next().await {
            accumulator.process_event(event?)?;
            if accumulator.is_finished() {
                break;
            }
        }

        let complete = accumulator.finalize();
        tracing::debug!(
            finish_reason = ?complete.finish_reason,
            input_tokens = complete.usage.input_tokens,
            output_tokens = complete.usage.output_tokens,
            "response buffered"
        );
        Ok(complete)
    }

    /// Get just the text content (convenience method).
    pub async fn text(self) -> Result<String, Error> {
        Ok(self.buffer().await?.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done() -> Result<StreamEvent, Error> {
        Ok(StreamEvent::Done {
            finish_reason: FinishReason::Stop,
            usage: Usage::default(),
        })
    }

    #[tokio::test]
    async fn test_response_buffering() {
        let events = vec![
            Ok(StreamEvent::ContentDelta {
                delta: "Test ".to_string(),
            }),
            Ok(StreamEvent::ContentDelta {
                delta: "response".to_string(),
            }),
            done(),
        ];

        let response = Response::from_stream(futures_util::stream::iter(events));
        assert_eq!(response.text().await.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_stream_error_propagates() {
        let events = vec![
            Ok(StreamEvent::ContentDelta {
                delta: "partial".to_string(),
            }),
            Err(Error::streaming("connection dropped")),
        ];

        let response = Response::from_stream(futures_util::stream::iter(events));
        assert!(matches!(response.text().await, Err(Error::Streaming(_))));
    }
}
