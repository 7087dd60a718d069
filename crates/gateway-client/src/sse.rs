//! Streaming response decoding.
//!
//! The provider encodes streamed completions as UTF-8 text with `data: <json>`
//! line framing, terminated by a `data: [DONE]` line. Network reads can split
//! the text anywhere, including mid-line and mid-character, so the decoder
//! buffers bytes and only processes fully-formed lines; a trailing partial
//! line is retained and prefixed to the next read.

use bytes::Bytes;
use futures::stream::Stream;
use gateway_core::{ChatChunk, GatewayError, GatewayResult, StreamEvent};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// Protocol-level end-of-stream marker.
const DONE_MARKER: &str = "[DONE]";

/// Incremental decoder for `data:`-framed stream bodies.
///
/// Pure and synchronous: feed it network reads in any segmentation and it
/// yields the same chunk sequence the whole payload would produce in one
/// read.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network read and collect the chunks completed by it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ChatChunk> {
        self.buffer.extend_from_slice(bytes);

        let mut chunks = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            if let Some(chunk) = decode_line(&line) {
                chunks.push(chunk);
            }
        }
        chunks
    }
}

/// Decode one complete line into a chunk, if it carries a non-empty delta.
///
/// Empty lines, the `[DONE]` terminator, non-`data:` lines (heartbeats,
/// comments) and malformed JSON are all skipped without aborting the stream.
fn decode_line(line: &str) -> Option<ChatChunk> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let data = trimmed.strip_prefix("data: ")?;
    if data == DONE_MARKER {
        return None;
    }

    match serde_json::from_str::<StreamEvent>(data) {
        Ok(event) => {
            let delta = event.delta_content();
            if delta.is_empty() {
                None
            } else {
                Some(ChatChunk::delta(delta))
            }
        }
        Err(e) => {
            debug!(error = %e, "Skipping malformed stream event");
            None
        }
    }
}

pin_project! {
    /// A lazy, single-pass stream of [`ChatChunk`]s.
    ///
    /// The underlying network read only advances when the caller polls for
    /// the next chunk. Dropping the stream at any point releases the
    /// connection; no further chunks are produced afterward.
    pub struct ChatStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = GatewayResult<ChatChunk>> + Send>>,
        done: bool,
    }
}

impl ChatStream {
    /// Create a chat stream over a response byte stream.
    pub(crate) fn new<S>(bytes: S) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(decode_chunks(bytes)),
            done: false,
        }
    }

    /// Drain the stream and concatenate all deltas.
    pub async fn collect_content(mut self) -> GatewayResult<String> {
        use futures::StreamExt;

        let mut content = String::new();
        while let Some(chunk) = self.next().await {
            content.push_str(&chunk?.delta);
        }
        Ok(content)
    }
}

impl Stream for ChatStream {
    type Item = GatewayResult<ChatChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                if chunk.done {
                    *this.done = true;
                }
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                *this.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Decode a response byte stream into chunks, ending with the terminal chunk
/// when the network stream completes.
fn decode_chunks<S>(stream: S) -> impl Stream<Item = GatewayResult<ChatChunk>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send,
{
    async_stream::stream! {
        use futures::StreamExt;

        let mut stream = std::pin::pin!(stream);
        let mut decoder = SseDecoder::new();

        while let Some(result) = stream.next().await {
            match result {
                Ok(bytes) => {
                    for chunk in decoder.feed(&bytes) {
                        yield Ok(chunk);
                    }
                }
                Err(e) => {
                    yield Err(GatewayError::streaming(e.to_string()));
                    return;
                }
            }
        }

        yield Ok(ChatChunk::done());
    }
}
