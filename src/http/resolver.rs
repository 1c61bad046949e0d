//! Maps a request line to a file under the document root.
//!
//! Pure string transformation: the filesystem is never consulted, `..`
//! segments are not normalised and percent-escapes are not decoded.

use crate::config::ContentConfig;

pub const DEFAULT_DOCUMENT_ROOT: &str = "html";
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// Outcome of resolving a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// `<document_root>/<name>`, where `name` is the target minus its first
    /// character.
    File { path: String, name: String },
    /// Fewer than two space-separated tokens on the request line.
    Invalid,
}

impl ResolvedTarget {
    pub fn path(&self) -> Option<&str> {
        match self {
            ResolvedTarget::File { path, .. } => Some(path),
            ResolvedTarget::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ResolvedTarget::Invalid)
    }
}

#[derive(Debug, Clone)]
pub struct Resolver {
    document_root: String,
    index_file: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT_ROOT, DEFAULT_INDEX_FILE)
    }
}

impl Resolver {
    pub fn new(document_root: impl Into<String>, index_file: impl Into<String>) -> Self {
        Self {
            document_root: document_root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn from_config(cfg: &ContentConfig) -> Self {
        Self::new(cfg.document_root.clone(), cfg.index_file.clone())
    }

    pub fn document_root(&self) -> &str {
        &self.document_root
    }

    /// Resolves `METHOD SP TARGET SP VERSION` to a file path.
    ///
    /// ```
    /// # use getserver::http::resolver::{Resolver, ResolvedTarget};
    /// let r = Resolver::default();
    /// assert_eq!(r.resolve("GET / HTTP/1.1").path(), Some("html/index.html"));
    /// assert_eq!(r.resolve("GET"), ResolvedTarget::Invalid);
    /// ```
    pub fn resolve(&self, request_line: &str) -> ResolvedTarget {
        // Runs of spaces separate tokens; empty pieces are not tokens.
        let mut tokens = request_line.split(' ').filter(|t| !t.is_empty());
        let _method = tokens.next();
        let Some(target) = tokens.next() else {
            return ResolvedTarget::Invalid;
        };

        // Exactly one leading character goes, whatever it is.
        let mut chars = target.chars();
        chars.next();
        let stripped = chars.as_str();

        let name = if stripped.is_empty() {
            self.index_file.as_str()
        } else {
            stripped
        };

        ResolvedTarget::File {
            path: format!("{}/{}", self.document_root, name),
            name: name.to_string(),
        }
    }
}
