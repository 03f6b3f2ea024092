use std::io::{Cursor, Read};

use quick_xml::{events::Event, reader::Reader};

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a DOCX container, one line per `w:p`.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;
    paragraphs_from_xml(&xml)
}

/// Walks WordprocessingML, keeping `w:t` runs and turning tabs/breaks into whitespace.
pub fn paragraphs_from_xml(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "malformed XML at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => out.push('\n'),
                _ => (),
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => (),
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                out.push_str(&text);
            }
            _ => (),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Ada Lovelace</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Analyst </w:t></w:r><w:r><w:t>&amp; Engineer</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Rust</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_become_lines() {
        let text = paragraphs_from_xml(BODY).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Ada Lovelace", "Analyst & Engineer", "Skills:\tRust"]);
    }

    #[test]
    fn test_markup_outside_runs_is_ignored() {
        let xml = r#"<w:document><w:body><w:sectPr>layout</w:sectPr></w:body></w:document>"#;
        assert_eq!(paragraphs_from_xml(xml).unwrap(), "");
    }

    #[test]
    fn test_non_zip_bytes_rejected() {
        let err = extract(b"plain text pretending to be docx").unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }
}
