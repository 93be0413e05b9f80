//! Text Extractor — turns an uploaded PDF or DOCX into plain text.
//!
//! Extraction never fails the request. Every error is rendered as a short
//! message and returned in place of the text; that message contains no
//! resume markers, so the resume gate rejects it downstream.

use std::path::Path;

use bytes::Bytes;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format. Only PDF and DOCX are allowed.")]
    Unsupported,

    #[error("No extractable text found in PDF.")]
    EmptyPdf,

    #[error("No extractable text found in DOCX.")]
    EmptyDocx,

    #[error("Error extracting text: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error extracting text: {0}")]
    Pdf(String),

    #[error("Error extracting text: {0}")]
    Docx(String),
}

/// Formats the extractor understands, keyed off the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            DocumentKind::Pdf => ".pdf",
            DocumentKind::Docx => ".docx",
        }
    }
}

/// A file received from an upload form. Lives only for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    /// Writes the upload to a temp file whose suffix matches the declared filename,
    /// so extension-based dispatch still works. The file is removed when the
    /// returned handle is dropped. The declared filename is never used as a path.
    pub async fn spool(&self) -> std::io::Result<NamedTempFile> {
        let suffix = DocumentKind::from_path(Path::new(&self.filename))
            .map(DocumentKind::suffix)
            .unwrap_or(".upload");
        let file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(suffix)
            .tempfile()?;
        tokio::fs::write(file.path(), &self.bytes).await?;
        Ok(file)
    }
}

/// Returns the document's text, or a descriptive error message in its place.
pub async fn extract_text(path: &Path) -> String {
    match try_extract_text(path).await {
        Ok(text) => {
            debug!("Extracted {} chars from {}", text.len(), path.display());
            text
        }
        Err(e) => {
            warn!("Text extraction failed for {}: {e}", path.display());
            e.to_string()
        }
    }
}

async fn try_extract_text(path: &Path) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_path(path).ok_or(ExtractionError::Unsupported)?;
    let bytes = tokio::fs::read(path).await?;

    // Both parsers are synchronous and pdf-extract can panic on malformed input;
    // a panic surfaces here as a JoinError.
    tokio::task::spawn_blocking(move || match kind {
        DocumentKind::Pdf => pdf_text(&bytes),
        DocumentKind::Docx => docx_text(&bytes),
    })
    .await
    .map_err(|e| match kind {
        DocumentKind::Pdf => ExtractionError::Pdf(e.to_string()),
        DocumentKind::Docx => ExtractionError::Docx(e.to_string()),
    })?
}

fn pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    let text = non_blank_lines(raw.lines());
    if text.is_empty() {
        return Err(ExtractionError::EmptyPdf);
    }
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            for run in p.children {
                if let docx_rs::ParagraphChild::Run(run) = run {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    let text = non_blank_lines(paragraphs.iter().map(String::as_str));
    if text.is_empty() {
        return Err(ExtractionError::EmptyDocx);
    }
    Ok(text)
}

/// Trimmed, non-empty lines joined by newlines, with NUL characters removed.
fn non_blank_lines<'a>(lines: impl Iterator<Item = &'a str>) -> String {
    lines
        .map(|l| l.replace('\0', ""))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
