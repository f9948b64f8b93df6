//! Plain-text extraction for uploaded documents.
//!
//! - `.txt` and unknown extensions are read as strict UTF-8
//! - `.pdf` text is pulled page by page; a PDF with no extractable text
//!   (e.g. a scan) yields an empty string, not an error
//! - `.docx` paragraphs are joined line by line; a near-empty document yields
//!   [`DOCX_EMPTY_NOTICE`] instead of its raw text

use shared::error::ExtractionError;
use std::fs;
use std::panic;
use std::path::Path;

/// Returned for a Word document whose trimmed text is shorter than
/// [`DOCX_MIN_CHARS`].
pub const DOCX_EMPTY_NOTICE: &str = "Word document appears to be empty";

/// Minimum trimmed length for Word text to count as content.
pub const DOCX_MIN_CHARS: usize = 5;

/// Declared type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
    Docx,
    /// Anything else; read as text
    Other,
}

impl DocumentKind {
    /// Detect kind from the path extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("txt") => DocumentKind::Text,
            Some("pdf") => DocumentKind::Pdf,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::Other,
        }
    }
}

/// Extract text, choosing the parser from the file extension.
pub fn extract(path: &Path) -> Result<String, ExtractionError> {
    extract_as(path, DocumentKind::from_path(path))
}

/// Extract text treating the file as `kind` regardless of its name.
pub fn extract_as(path: &Path, kind: DocumentKind) -> Result<String, ExtractionError> {
    let bytes = fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = match kind {
        DocumentKind::Text | DocumentKind::Other => decode_utf8(path, bytes)?,
        DocumentKind::Pdf => extract_pdf(path, &bytes)?,
        DocumentKind::Docx => extract_docx(&bytes),
    };

    tracing::debug!(?path, ?kind, chars = text.chars().count(), "extracted document");
    Ok(text)
}

fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String, ExtractionError> {
    String::from_utf8(bytes).map_err(|_| ExtractionError::Encoding {
        path: path.to_path_buf(),
    })
}

fn extract_pdf(path: &Path, bytes: &[u8]) -> Result<String, ExtractionError> {
    // The parser panics on some malformed inputs.
    let parsed = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

    let pages = match parsed {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            return Err(ExtractionError::Malformed {
                path: path.to_path_buf(),
                format: "PDF",
                message: e.to_string(),
            })
        }
        Err(_) => {
            return Err(ExtractionError::Malformed {
                path: path.to_path_buf(),
                format: "PDF",
                message: "parser aborted".to_string(),
            })
        }
    };

    let text = join_pdf_pages(&pages);
    if text.is_empty() {
        tracing::warn!(?path, pages = pages.len(), "PDF contains no extractable text");
    }
    Ok(text)
}

/// One line break after each page; empty when no page has any text.
fn join_pdf_pages(pages: &[String]) -> String {
    if pages.iter().all(|p| p.trim().is_empty()) {
        return String::new();
    }
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

fn extract_docx(bytes: &[u8]) -> String {
    let docx = match docx_rs::read_docx(bytes) {
        Ok(docx) => docx,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse Word document");
            return format!("Word document could not be read: {}", e);
        }
    };

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            push_paragraph_children(&mut line, &paragraph.children);
            paragraphs.push(line);
        }
    }

    docx_text_or_notice(&paragraphs)
}

/// Text of runs, hyperlinks and tracked insertions in document order.
fn push_paragraph_children(line: &mut String, children: &[docx_rs::ParagraphChild]) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run(line, run),
            docx_rs::ParagraphChild::Hyperlink(link) => push_paragraph_children(line, &link.children),
            docx_rs::ParagraphChild::Insert(insert) => {
                for inserted in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = inserted {
                        push_run(line, run);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(line: &mut String, run: &docx_rs::Run) {
    for run_child in &run.children {
        match run_child {
            docx_rs::RunChild::Text(t) => line.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => line.push('\t'),
            docx_rs::RunChild::Break(_) | docx_rs::RunChild::CarriageReturn(_) => line.push('\n'),
            _ => {}
        }
    }
}

fn docx_text_or_notice(paragraphs: &[String]) -> String {
    let mut text = String::new();
    for p in paragraphs {
        text.push_str(p);
        text.push('\n');
    }
    if text.trim().chars().count() < DOCX_MIN_CHARS {
        DOCX_EMPTY_NOTICE.to_string()
    } else {
        text
    }
}
