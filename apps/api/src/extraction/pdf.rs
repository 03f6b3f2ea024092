use super::ExtractionError;

/// Reads the PDF text layer. Runs on the blocking pool; a panic inside the
/// parser surfaces as an extraction error rather than killing the request task.
pub async fn extract(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("parser crashed: {e}")))?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_a_pdf_error() {
        let err = extract(b"definitely not a pdf".to_vec()).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
