//! Fixed extension table.
//!
//! Content-type values keep the spaced spelling (`text / css`) the server has
//! always put on the wire.

/// How a file is labelled and transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentKind {
    /// `None` for extensions outside the table: no `Content-Type` header.
    pub content_type: Option<&'static str>,
    /// Sent as a separate payload write after the header block.
    pub binary: bool,
}

impl ContentKind {
    const fn text(content_type: &'static str) -> Self {
        Self {
            content_type: Some(content_type),
            binary: false,
        }
    }

    const fn binary(content_type: &'static str) -> Self {
        Self {
            content_type: Some(content_type),
            binary: true,
        }
    }

    const UNKNOWN: Self = Self {
        content_type: None,
        binary: false,
    };
}

/// Classifies a file by extension.
///
/// # Examples
/// ```
/// use getserver::http::mime::classify;
/// assert_eq!(classify(Some("css")).content_type, Some("text / css"));
/// assert!(classify(Some("png")).binary);
/// assert!(!classify(None).binary);
/// ```
pub fn classify(extension: Option<&str>) -> ContentKind {
    match extension {
        Some("html") => ContentKind::text("text / html"),
        Some("js") => ContentKind::text("text / javascript; charset=utf-8"),
        Some("css") => ContentKind::text("text / css"),
        Some("png" | "ico") => ContentKind::binary("image / png"),
        Some("jpg") => ContentKind::binary("image / jpeg"),
        Some("gif") => ContentKind::binary("image / gif"),
        _ => ContentKind::UNKNOWN,
    }
}

/// Extension of the last path segment, without the dot.
///
/// Deliberately the text after the *last* dot of the file name, not the
/// first dot anywhere in the path: `app.min.js` is `js`, and a dotted
/// directory such as `v1.2/readme` yields no extension.
pub fn extension_of(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}
