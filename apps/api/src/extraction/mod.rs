//! Document text extraction for uploaded resumes.
//!
//! Dispatches on the file extension: PDF text layer (with OCR fallback for scanned
//! files), DOCX paragraphs, or OCR for images. Nothing here interprets the text;
//! that is the profile parser's job.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

pub mod docx;
pub mod ocr;
pub mod pdf;

pub use ocr::{OcrEngine, TesseractOcr};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type '{0}'")]
    UnsupportedFormat(String),

    #[error("document contains no extractable text")]
    Empty,

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Image,
}

impl DocumentFormat {
    /// Detects the format from the lowercase file extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "jpg" | "jpeg" | "png" => Ok(DocumentFormat::Image),
            _ => Err(ExtractionError::UnsupportedFormat(ext)),
        }
    }
}

/// Extracts plain text from uploaded documents.
#[derive(Clone)]
pub struct TextExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    pub async fn extract_text(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ExtractionError> {
        let format = DocumentFormat::from_file_name(file_name)?;
        info!("Extracting text from {file_name} ({format:?}, {} bytes)", bytes.len());

        let raw = match format {
            DocumentFormat::Pdf => {
                let text = pdf::extract(bytes.to_vec()).await?;
                if text.trim().is_empty() {
                    warn!("{file_name} has no text layer, falling back to OCR");
                    self.ocr.pdf_to_text(bytes).await?
                } else {
                    text
                }
            }
            DocumentFormat::Docx => docx::extract(bytes)?,
            DocumentFormat::Image => self.ocr.image_to_text(file_name, bytes).await?,
        };

        let text = normalize_text(&raw);
        if text.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}

/// Longest run of blank lines kept by `normalize_text`.
const MAX_BLANK_RUN: usize = 2;

/// CRLF → LF, trailing whitespace trimmed, runs of three or more blank lines
/// cut down to two.
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;
    for line in raw.replace("\r\n", "\n").replace('\r', "\n").lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > MAX_BLANK_RUN {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
