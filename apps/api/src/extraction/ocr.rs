use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::ExtractionError;

/// OCR seam. Production shells out to the `tesseract` CLI.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn image_to_text(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError>;

    /// OCR for PDFs without a text layer.
    async fn pdf_to_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Tesseract CLI wrapper. Scanned PDFs are rasterized page by page with
/// `pdftoppm` (poppler) before recognition.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    tesseract_path: String,
    rasterizer_path: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(tesseract_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            tesseract_path: tesseract_path.into(),
            rasterizer_path: "pdftoppm".to_string(),
            timeout,
        }
    }

    async fn run(&self, program: &str, args: &[&std::ffi::OsStr]) -> Result<Vec<u8>, ExtractionError> {
        debug!("Running {program} with {} args", args.len());
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| ExtractionError::Ocr(format!("{program} timed out after {:?}", self.timeout)))?
            .map_err(|e| ExtractionError::Ocr(format!("failed to start {program}: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }

    async fn recognize(&self, image: &Path) -> Result<String, ExtractionError> {
        let stdout = self
            .run(
                &self.tesseract_path,
                &[image.as_os_str(), "stdout".as_ref()],
            )
            .await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn image_to_text(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        let suffix = file_name
            .rsplit_once('.')
            .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
            .unwrap_or_else(|| ".png".to_string());
        let file = tempfile::Builder::new()
            .prefix("careerforge-ocr-")
            .suffix(&suffix)
            .tempfile()?;
        tokio::fs::write(file.path(), bytes).await?;
        self.recognize(file.path()).await
    }

    async fn pdf_to_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let dir = tempfile::tempdir()?;
        let pdf_path = dir.path().join("input.pdf");
        tokio::fs::write(&pdf_path, bytes).await?;

        let prefix = dir.path().join("page");
        self.run(
            &self.rasterizer_path,
            &[
                "-r".as_ref(),
                "300".as_ref(),
                "-png".as_ref(),
                pdf_path.as_os_str(),
                prefix.as_os_str(),
            ],
        )
        .await?;

        let mut pages = rendered_pages(dir.path()).await?;
        pages.sort();

        let mut text = String::new();
        for page in pages {
            text.push_str(&self.recognize(&page).await?);
            text.push('\n');
        }
        Ok(text)
    }
}

async fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "png") {
            pages.push(path);
        }
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_ocr_error() {
        let ocr = TesseractOcr::new("/nonexistent/tesseract-binary", Duration::from_secs(5));
        let err = ocr.image_to_text("scan.png", b"not an image").await.unwrap_err();
        assert!(matches!(err, ExtractionError::Ocr(msg) if msg.contains("failed to start")));
    }

    #[tokio::test]
    async fn test_rendered_pages_only_lists_png() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page-1.png"), b"").unwrap();
        std::fs::write(dir.path().join("input.pdf"), b"").unwrap();
        let pages = rendered_pages(dir.path()).await.unwrap();
        assert_eq!(pages.len(), 1);
    }
}
