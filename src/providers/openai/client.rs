use super::types::{ChatCompletionChunk, ChatCompletionRequest, ChatMessage, OpenAIError, StreamOptions};
use crate::provider::LLMProvider;
use crate::sse_stream::{SseEvent, SseStreamExt};
use crate::types::{FinishReason, InputItem};
use crate::{Error, LLMRequest, Response, StreamEvent};
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI Chat Completions provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self, Error> {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a new OpenAI provider against an OpenAI-compatible base URL.
    pub fn new_with_base_url(
        api_key: impl Into<SecretString>,
        base_url: impl Into<String>,
    ) -> Result<Self, Error> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Replace the HTTP client with one using `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    /// Convert a provider-neutral request to the Chat Completions format.
    fn convert_request(request: &LLMRequest) -> ChatCompletionRequest {
        let messages = request
            .messages
            .iter()
            .map(|item| match item {
                InputItem::Message(msg) => ChatMessage {
                    role: msg.role.as_str().to_string(),
                    content: msg.content.clone(),
                },
            })
            .collect();

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            stream: None,
            stream_options: None,
        }
    }

    /// Map a non-success HTTP status and body to an error.
    fn status_error(status: StatusCode, body: &str) -> Error {
        let message = serde_json::from_str::<OpenAIError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimit,
            _ => Error::provider("OpenAI", format!("API error ({status}): {message}")),
        }
    }
}

/// Turns streamed chunks into stream events.
///
/// The finish reason and the usage totals arrive in separate chunks when
/// `include_usage` is set, so `Done` is emitted once usage is seen or, for
/// servers that never send usage, at the `[DONE]` marker.
#[derive(Debug, Default)]
struct ChunkDecoder {
    finish_reason: Option<FinishReason>,
    done_sent: bool,
}

impl ChunkDecoder {
    fn decode(&mut self, event: &SseEvent) -> Vec<Result<StreamEvent, Error>> {
        if event.is_done() {
            return self.finish(None).into_iter().map(Ok).collect();
        }

        let chunk = match serde_json::from_str::<ChatCompletionChunk>(&event.data) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable stream chunk");
                return Vec::new();
            }
        };

        if let Some(error) = chunk.error {
            tracing::warn!(message = %error.message, "error inside chat completion stream");
            return vec![Ok(StreamEvent::Error {
                error: error.message,
            })];
        }

        let mut events = Vec::new();
        for choice in chunk.choices {
            if let Some(delta) = choice.delta.content.filter(|d| !d.is_empty()) {
                events.push(Ok(StreamEvent::ContentDelta { delta }));
            }
            if let Some(reason) = choice.finish_reason {
                self.finish_reason = Some(FinishReason::from_api(&reason));
            }
        }
        if let Some(usage) = chunk.usage {
            events.extend(self.finish(Some(usage.into())).map(Ok));
        }
        events
    }

    fn finish(&mut self, usage: Option<crate::Usage>) -> Option<StreamEvent> {
        if self.done_sent {
            return None;
        }
        self.done_sent = true;
        Some(StreamEvent::Done {
            finish_reason: self.finish_reason.take().unwrap_or(FinishReason::Stop),
            usage: usage.unwrap_or_default(),
        })
    }
}

#[async_trait::async_trait]
impl LLMProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    /// Generate a chat completion (internally always streams).
    async fn generate(&self, request: &LLMRequest) -> Result<Response, Error> {
        let mut body = Self::convert_request(request);
        body.stream = Some(true);
        body.stream_options = Some(StreamOptions {
            include_usage: true,
        });

        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(%url, model = %body.model, messages = body.messages.len(), "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            tracing::warn!(%status, "chat completion rejected");
            return Err(Self::status_error(status, &text));
        }

        let events = response
            .bytes_stream()
            .sse_events()
            .scan(ChunkDecoder::default(), |decoder, sse| {
                let out = match sse {
                    Ok(event) => decoder.decode(&event),
                    Err(e) => vec![Err(e)],
                };
                futures_util::future::ready(Some(out))
            })
            .flat_map(futures_util::stream::iter);

        Ok(Response::from_stream(events))
    }
}
