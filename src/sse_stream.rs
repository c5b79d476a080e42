//! Server-Sent Events decoding over a byte stream.

use crate::Error;
use futures_util::{Stream, StreamExt};
use memchr::memmem;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound on bytes held while waiting for an event terminator.
const MAX_BUFFER: usize = 1_000_000;

/// A single Server-Sent Events (SSE) event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
    pub id: Option<String>,
    pub retry: Option<u64>,
}

impl SseEvent {
    /// Create an event carrying only data.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    /// OpenAI-style end-of-stream marker.
    pub fn is_done(&self) -> bool {
        self.data.trim() == "[DONE]"
    }

    /// Parse one event block (the text between blank-line separators).
    ///
    /// Returns `None` for blocks that carry no `data` field, such as
    /// keep-alive comments.
    pub fn parse(block: &str) -> Option<Self> {
        let mut event = SseEvent::new(String::new());
        let mut data_lines: Vec<&str> = Vec::new();

        for line in block.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };

            match field {
                "event" => event.event_type = Some(value.to_string()),
                "data" => data_lines.push(value),
                "id" => event.id = Some(value.to_string()),
                "retry" => event.retry = value.parse().ok(),
                _ => {}
            }
        }

        if data_lines.is_empty() {
            return None;
        }
        event.data = data_lines.join("\n");
        Some(event)
    }
}

/// Adapter turning a stream of byte chunks into SSE events.
///
/// Events and multi-byte characters may be split across chunks; bytes are
/// buffered until a full event block is available.
pub struct SseStream<S> {
    inner: S,
    buffer: Vec<u8>,
    ready: VecDeque<SseEvent>,
}

impl<S> SseStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            ready: VecDeque::new(),
        }
    }

    /// Position and length of the first event terminator in `bytes`.
    fn find_terminator(bytes: &[u8]) -> Option<(usize, usize)> {
        match memmem::find(bytes, b"\n\n") {
            // A CRLF terminator only wins if it starts before the LF one.
            Some(pos) => {
                let window = &bytes[..(pos + 3).min(bytes.len())];
                match memmem::find(window, b"\r\n\r\n") {
                    Some(crlf) if crlf < pos => Some((crlf, 4)),
                    _ => Some((pos, 2)),
                }
            }
            None => memmem::find(bytes, b"\r\n\r\n").map(|pos| (pos, 4)),
        }
    }

    /// Move every complete event out of the buffer.
    fn drain_events(&mut self) -> Result<(), Error> {
        let mut consumed = 0;

        while let Some((pos, len)) = Self::find_terminator(&self.buffer[consumed..]) {
            let block = &self.buffer[consumed..consumed + pos];
            let text = std::str::from_utf8(block)
                .map_err(|e| Error::streaming(format!("Invalid UTF-8 in SSE event: {e}")))?;

            if let Some(event) = SseEvent::parse(text) {
                self.ready.push_back(event);
            }
            consumed += pos + len;
        }

        self.buffer.drain(..consumed);
        Ok(())
    }

    /// Parse whatever is left once the inner stream ends.
    fn flush_tail(&mut self) -> Option<SseEvent> {
        let tail = std::mem::take(&mut self.buffer);
        let text = std::str::from_utf8(&tail).ok()?.trim();
        if text.is_empty() {
            return None;
        }
        let event = SseEvent::parse(text);
        if event.is_none() {
            tracing::debug!(bytes = tail.len(), "discarding trailing SSE data");
        }
        event
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Item = Result<SseEvent, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    self.buffer.extend_from_slice(&chunk);
                    if let Err(e) = self.drain_events() {
                        return Poll::Ready(Some(Err(e)));
                    }
                    // Only an unterminated event counts against the limit.
                    if self.buffer.len() > MAX_BUFFER {
                        self.buffer.clear();
                        return Poll::Ready(Some(Err(Error::streaming(
                            "SSE buffer exceeded maximum size",
                        ))));
                    }
                }
                Some(Err(e)) => {
                    return Poll::Ready(Some(Err(Error::streaming(format!(
                        "Stream error: {}",
                        e.into()
                    )))));
                }
                None => return Poll::Ready(self.flush_tail().map(Ok)),
            }
        }
    }
}

/// Extension trait to add SSE parsing to byte streams.
pub trait SseStreamExt: Stream {
    /// Parse this byte stream as SSE events.
    fn sse_events(self) -> SseStream<Self>
    where
        Self: Sized,
    {
        SseStream::new(self)
    }
}

impl<S: Stream> SseStreamExt for S {}
