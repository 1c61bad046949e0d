//! Turns a resolved target into a wire-format response.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ContentConfig;
use crate::http::mime;
use crate::http::resolver::ResolvedTarget;
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Content length advertised by every 404, whatever the body actually
/// measures. Kept for wire compatibility with existing clients.
pub const NOT_FOUND_CONTENT_LENGTH: usize = 230;

pub const DEFAULT_SERVER_NAME: &str = "GetServer9000";

/// Wall-clock source for the `Date` header.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `Thu Jan  1 00:00:00 1970 UTC`
pub fn format_date(time: DateTime<Utc>) -> String {
    time.format("%a %b %e %H:%M:%S %Y UTC").to_string()
}

#[derive(Clone)]
pub struct Formulator {
    server_name: String,
    clock: Arc<dyn Clock>,
}

impl Default for Formulator {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_NAME, Arc::new(SystemClock))
    }
}

impl Formulator {
    pub fn new(server_name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            server_name: server_name.into(),
            clock,
        }
    }

    pub fn from_config(cfg: &ContentConfig) -> Self {
        Self::new(cfg.server_name.clone(), Arc::new(SystemClock))
    }

    /// Builds the response for `target`.
    ///
    /// The whole file is read into memory in one go. Any failure to read it
    /// (missing, a directory, no permission) produces the 404 page.
    pub async fn formulate(&self, target: &ResolvedTarget) -> Response {
        let (path, name) = match target {
            ResolvedTarget::File { path, name } => (path, name),
            ResolvedTarget::Invalid => return Response::empty(),
        };

        match tokio::fs::read(path).await {
            Ok(contents) => self.found(path, contents),
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "could not open requested file");
                self.not_found(name)
            }
        }
    }

    fn found(&self, path: &str, contents: Vec<u8>) -> Response {
        let kind = mime::classify(mime::extension_of(path));

        let mut builder = ResponseBuilder::new(StatusCode::Ok)
            .header("Date", self.date())
            .spaced_header("Server", &self.server_name);
        if let Some(content_type) = kind.content_type {
            builder = builder.spaced_header("Content - Type", content_type);
        }
        builder = builder.header("Connection", "Closed");

        // Counts the header lines written so far plus everything sent after
        // the head, but not the transfer headers or this line itself.
        let content_length = builder.len() + contents.len();

        if kind.binary {
            builder
                .header("Accept-Ranges", "bytes")
                .header("Content-Transfer-Encoding", "binary")
                .spaced_header("Content - Length", content_length)
                .binary(contents)
        } else {
            builder
                .spaced_header("Content - Length", content_length)
                .text(&contents)
        }
    }

    fn not_found(&self, name: &str) -> Response {
        let body = format!(
            "<!DOCTYPE HTML>\r\n\
             <html>\r\n\
             <head>\r\n\
             <title>404 Not Found</title>\r\n\
             </head>\r\n\
             <body>\r\n\
             <h1>Not Found</h1>\r\n\
             <p>The requested URL /{name} was not found on this server.</p>\r\n\
             </body>\r\n\
             </html>"
        );

        ResponseBuilder::new(StatusCode::NotFound)
            .header("Date", self.date())
            .spaced_header("Server", &self.server_name)
            .spaced_header("Content - Length", NOT_FOUND_CONTENT_LENGTH)
            .spaced_header("Connection", "Closed")
            .spaced_header("Content - Type", "text / html; charset = iso - 8859 - 1")
            .text(body.as_bytes())
    }

    fn date(&self) -> String {
        format_date(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_is_ctime_shaped() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_date(t), "Tue Mar  5 07:08:09 2024 UTC");
    }

    #[tokio::test]
    async fn invalid_target_formulates_nothing() {
        let response = Formulator::default().formulate(&ResolvedTarget::Invalid).await;
        assert!(response.is_empty());
        assert!(!response.is_binary);
        assert_eq!(response.status, None);
    }
}
