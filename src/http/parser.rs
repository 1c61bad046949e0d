use bytes::BytesMut;

use crate::http::request::RawRequest;

/// End-of-request marker.
pub const TERMINATOR: &[u8; 4] = b"\r\n\r\n";

/// Accumulates socket bytes until a full request is delimited.
///
/// The framer never touches the socket itself; the connection feeds it
/// whatever each read produced.
#[derive(Debug, Default)]
pub struct RequestFramer {
    buffer: BytesMut,
}

impl RequestFramer {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Appends freshly read bytes and returns the completed request, if any.
    ///
    /// Once the terminator has arrived, everything accumulated so far
    /// (terminator inclusive, plus any bytes that trailed it in the same read)
    /// becomes the request and the accumulator is reset. A zero-length chunk
    /// is a no-op.
    pub fn push(&mut self, chunk: &[u8]) -> Option<RawRequest> {
        if !chunk.is_empty() {
            self.buffer.extend_from_slice(chunk);
        }
        self.try_frame()
    }

    /// Frames a request from bytes already buffered.
    pub fn try_frame(&mut self) -> Option<RawRequest> {
        find_request_end(&self.buffer)?;
        let raw = self.buffer.split().freeze();
        Some(RawRequest::new(raw))
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Discards whatever is buffered.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Offset one past the first terminator, if present.
pub fn find_request_end(buf: &[u8]) -> Option<usize> {
    buf.windows(TERMINATOR.len())
        .position(|w| w == TERMINATOR)
        .map(|pos| pos + TERMINATOR.len())
}
