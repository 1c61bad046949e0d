/// HTTP status codes the server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use getserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A formulated response, ready for the writer.
///
/// `text` always goes out first. For a binary response it holds only the
/// status line and headers (its content length already counts the payload),
/// and `payload` follows as a second, independent write. For a text response
/// `text` is the whole response and `payload` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// `None` for the empty response produced for an unusable request line.
    pub status: Option<StatusCode>,
    pub text: Vec<u8>,
    pub is_binary: bool,
    pub payload: Vec<u8>,
}

impl Response {
    /// Nothing to send; the connection is closed straight away.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.payload.is_empty()
    }

    /// Bytes that reach the wire across both writes.
    pub fn wire_len(&self) -> usize {
        self.text.len() + self.payload.len()
    }

    /// Status line and headers, blank line included.
    pub fn head(&self) -> &[u8] {
        let end = crate::http::parser::find_request_end(&self.text).unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// The text body following the head (always empty for binary responses).
    pub fn body(&self) -> &[u8] {
        &self.text[self.head().len()..]
    }

    /// Looks up a header by the exact name it was emitted with, accepting
    /// both `Name: value` and `Name : value` spellings.
    pub fn header(&self, name: &str) -> Option<&str> {
        let head = std::str::from_utf8(self.head()).ok()?;
        head.split("\r\n").skip(1).find_map(|line| {
            let rest = line.strip_prefix(name)?;
            let value = rest
                .strip_prefix(" : ")
                .or_else(|| rest.strip_prefix(": "))?;
            Some(value)
        })
    }
}

/// Builds the status line and header block of a response.
///
/// Two header spellings exist on the wire: the conventional `Name: value`
/// and the legacy spaced `Name : value`. Which one a header uses is part of
/// the server's observable output.
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    head: String,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            head: format!(
                "HTTP/1.1 {} {}\r\n",
                status.as_u16(),
                status.reason_phrase()
            ),
        }
    }

    /// Appends `name: value`.
    pub fn header(mut self, name: &str, value: impl std::fmt::Display) -> Self {
        self.head.push_str(&format!("{name}: {value}\r\n"));
        self
    }

    /// Appends `name : value`.
    pub fn spaced_header(mut self, name: &str, value: impl std::fmt::Display) -> Self {
        self.head.push_str(&format!("{name} : {value}\r\n"));
        self
    }

    /// Bytes emitted so far.
    pub fn len(&self) -> usize {
        self.head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty()
    }

    /// Closes the header block and appends a text body.
    pub fn text(self, body: &[u8]) -> Response {
        let mut text = self.head.into_bytes();
        text.extend_from_slice(b"\r\n");
        text.extend_from_slice(body);
        Response {
            status: Some(self.status),
            text,
            is_binary: false,
            payload: Vec::new(),
        }
    }

    /// Closes the header block; `payload` travels in its own write.
    pub fn binary(self, payload: Vec<u8>) -> Response {
        let mut text = self.head.into_bytes();
        text.extend_from_slice(b"\r\n");
        Response {
            status: Some(self.status),
            text,
            is_binary: true,
            payload,
        }
    }
}
