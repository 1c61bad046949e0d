use bytes::Bytes;

/// A complete request as delimited by the framer, terminator included.
///
/// Only the first line carries meaning. The header block is kept as-is for
/// logging and is never parsed field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    bytes: Bytes,
}

impl RawRequest {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The request line without its line ending.
    ///
    /// Invalid UTF-8 is replaced lossily; such a line can still be resolved,
    /// it just won't name a file that exists.
    ///
    /// ```
    /// # use getserver::http::request::RawRequest;
    /// let req = RawRequest::new(&b"GET /a.css HTTP/1.1\r\nHost: x\r\n\r\n"[..]);
    /// assert_eq!(req.request_line(), "GET /a.css HTTP/1.1");
    /// ```
    pub fn request_line(&self) -> String {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == b'\n')
            .unwrap_or(self.bytes.len());
        let line = &self.bytes[..end];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        String::from_utf8_lossy(line).into_owned()
    }
}
