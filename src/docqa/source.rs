//! Document acquisition for the Q&A agent.
//!
//! Accepts local paths, `file://` URIs, and `http(s)://` URLs. Content
//! type is resolved by extension first, then by the `Content-Type`
//! response header, branching only between plain/markdown text and PDF.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors while acquiring or decoding a document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),
}

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// An `http://` or `https://` URL.
    Url(String),
    /// A local file path (bare or from a `file://` URI).
    File(PathBuf),
}

impl DocumentSource {
    /// Classify a document reference from the command line.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Url(reference.to_string())
        } else if let Some(path) = reference.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(reference))
        }
    }
}

/// How to decode document bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Pdf,
}

/// Resolve a content kind from a file extension, if it is deciding.
fn kind_from_extension(ext: &str) -> Option<ContentKind> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(ContentKind::Pdf),
        "md" | "markdown" | "txt" | "text" => Some(ContentKind::Text),
        _ => None,
    }
}

/// Resolve a content kind from a `Content-Type` header value.
fn kind_from_header(content_type: &str) -> ContentKind {
    if content_type
        .to_ascii_lowercase()
        .contains("application/pdf")
    {
        ContentKind::Pdf
    } else {
        ContentKind::Text
    }
}

/// Extension-based kind for a path-like reference.
fn kind_from_path(path: &Path) -> Option<ContentKind> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(kind_from_extension)
}

/// Load a document as text.
pub async fn load(source: &DocumentSource, http: &reqwest::Client) -> Result<String, SourceError> {
    match source {
        DocumentSource::File(path) => load_file(path),
        DocumentSource::Url(url) => fetch_url(url, http).await,
    }
}

/// Read a local file, extracting text from PDFs.
fn load_file(path: &Path) -> Result<String, SourceError> {
    debug!("Reading document from {}", path.display());

    // Unknown extensions are read as text.
    match kind_from_path(path).unwrap_or(ContentKind::Text) {
        ContentKind::Pdf => {
            let bytes = std::fs::read(path).map_err(|e| SourceError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            extract_pdf(&bytes)
        }
        ContentKind::Text => std::fs::read_to_string(path).map_err(|e| SourceError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Fetch a document over HTTP, extracting text from PDFs.
async fn fetch_url(url: &str, http: &reqwest::Client) -> Result<String, SourceError> {
    debug!("Fetching document from {}", url);

    let response = http.get(url).send().await.map_err(|e| SourceError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !response.status().is_success() {
        return Err(SourceError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    // Extension decides when it can; otherwise fall back to the header.
    let kind = match url_extension_kind(url) {
        Some(kind) => kind,
        None => response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(kind_from_header)
            .unwrap_or(ContentKind::Text),
    };

    match kind {
        ContentKind::Pdf => {
            let bytes = response.bytes().await.map_err(|e| SourceError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            extract_pdf(&bytes)
        }
        ContentKind::Text => response.text().await.map_err(|e| SourceError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Extension-based kind for a URL, ignoring query and fragment.
fn url_extension_kind(url: &str) -> Option<ContentKind> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    kind_from_path(Path::new(path))
}

/// Extract plain text from PDF bytes.
fn extract_pdf(bytes: &[u8]) -> Result<String, SourceError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| SourceError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_classifies_sources() {
        assert_eq!(
            DocumentSource::parse("https://example.com/doc.md"),
            DocumentSource::Url("https://example.com/doc.md".to_string())
        );
        assert_eq!(
            DocumentSource::parse("http://example.com/doc"),
            DocumentSource::Url("http://example.com/doc".to_string())
        );
        assert_eq!(
            DocumentSource::parse("file:///tmp/notes.txt"),
            DocumentSource::File(PathBuf::from("/tmp/notes.txt"))
        );
        assert_eq!(
            DocumentSource::parse("./notes.md"),
            DocumentSource::File(PathBuf::from("./notes.md"))
        );
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(kind_from_extension("pdf"), Some(ContentKind::Pdf));
        assert_eq!(kind_from_extension("PDF"), Some(ContentKind::Pdf));
        assert_eq!(kind_from_extension("md"), Some(ContentKind::Text));
        assert_eq!(kind_from_extension("txt"), Some(ContentKind::Text));
        assert_eq!(kind_from_extension("html"), None);
    }

    #[test]
    fn test_kind_from_header() {
        assert_eq!(kind_from_header("application/pdf"), ContentKind::Pdf);
        assert_eq!(
            kind_from_header("text/plain; charset=utf-8"),
            ContentKind::Text
        );
        assert_eq!(kind_from_header("text/markdown"), ContentKind::Text);
    }

    #[test]
    fn test_url_extension_kind_ignores_query() {
        assert_eq!(
            url_extension_kind("https://example.com/report.pdf?dl=1"),
            Some(ContentKind::Pdf)
        );
        assert_eq!(url_extension_kind("https://example.com/page"), None);
        // Bare hostnames have no deciding extension.
        assert_eq!(url_extension_kind("https://example.com"), None);
    }

    #[test]
    fn test_load_file_reads_text() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        writeln!(file, "# Notes\n\nhello").unwrap();

        let text = load_file(file.path()).unwrap();
        assert!(text.contains("hello"));
    }

    #[test]
    fn test_load_file_missing_names_the_path() {
        let err = load_file(Path::new("/nonexistent/doc.txt")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to read file"));
        assert!(message.contains("/nonexistent/doc.txt"));
    }
}
