//! Raw text extraction from OOXML word-processing documents.
//!
//! Only the main document part is read. Headers, footers, comments and
//! tracked deletions are skipped.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{DocumentError, ExtractionError};
use crate::extract::TextExtractor;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word-processing document extractor.
///
/// Legacy binary `.doc` files are not zip packages and fail with
/// [`DocumentError::Archive`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new document extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract paragraph text from a `.docx` package.
    pub fn extract_text(&self, data: &[u8]) -> Result<String, DocumentError> {
        let mut archive =
            ZipArchive::new(Cursor::new(data)).map_err(|e| DocumentError::Archive(e.to_string()))?;

        let mut xml = String::new();
        match archive.by_name(DOCUMENT_PART) {
            Ok(mut part) => part
                .read_to_string(&mut xml)
                .map_err(|e| DocumentError::Archive(e.to_string()))?,
            Err(ZipError::FileNotFound) => return Err(DocumentError::MissingPart(DOCUMENT_PART)),
            Err(e) => return Err(DocumentError::Archive(e.to_string())),
        };

        debug!("Read {} bytes of document XML", xml.len());
        document_text(&xml)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.extract_text(data)?)
    }
}

/// Flatten `word/document.xml` into plain text, one line per paragraph.
fn document_text(xml: &str) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // Tab stops in paragraph properties share the element name.
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" if in_run => text.push('\n'),
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let chunk = e
                    .unescape()
                    .map_err(|err| DocumentError::Xml(err.to_string()))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DocumentError::Xml(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
      <w:r><w:t>PURCHASE ORDER</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t xml:space="preserve">PO number: </w:t></w:r>
      <w:r><w:t>4521</w:t></w:r>
    </w:p>
    <w:p/>
    <w:p>
      <w:r><w:t>Widget</w:t><w:tab/><w:t>10</w:t><w:br/><w:t>Bolts &amp; nuts</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for (name, content) in parts {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_document_text() {
        let text = document_text(BODY).unwrap();
        assert_eq!(
            text,
            "PURCHASE ORDER\nPO number: 4521\n\nWidget\t10\nBolts & nuts\n"
        );
    }

    #[test]
    fn test_extract_from_package() {
        let data = package(&[("[Content_Types].xml", "<Types/>"), (DOCUMENT_PART, BODY)]);
        let text = DocxExtractor::new().extract_text(&data).unwrap();
        assert!(text.contains("PO number: 4521"));
    }

    #[test]
    fn test_missing_document_part() {
        let data = package(&[("[Content_Types].xml", "<Types/>")]);
        let err = DocxExtractor::new().extract_text(&data).unwrap_err();
        assert!(matches!(err, DocumentError::MissingPart(DOCUMENT_PART)));
    }

    #[test]
    fn test_legacy_doc_bytes_are_rejected() {
        // OLE compound file signature, as found at the start of .doc files.
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0, 0, 0, 0];
        let err = DocxExtractor::new().extract(&data).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Document(DocumentError::Archive(_))
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let err = document_text("<w:document><w:body></w:p></w:document>").unwrap_err();
        assert!(matches!(err, DocumentError::Xml(_)));
    }
}
