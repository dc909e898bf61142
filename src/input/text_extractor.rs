//! Text extraction from uploaded document bytes

use crate::error::{Result, ResumeInsightError};
use crate::input::file_detector::FileType;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeInsightError::PdfExtraction(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

/// UTF-8 text; invalid byte sequences are dropped rather than replaced
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut text = String::with_capacity(bytes.len());
        for chunk in bytes.utf8_chunks() {
            text.push_str(chunk.valid());
        }
        Ok(text)
    }
}

/// Paragraph text of `word/document.xml`, one line per paragraph
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ResumeInsightError::DocxExtraction(format!("Not a DOCX archive: {}", e)))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| ResumeInsightError::DocxExtraction(format!("Missing word/document.xml: {}", e)))?
            .read_to_string(&mut xml)?;

        paragraphs_from_document_xml(&xml)
            .map_err(|e| ResumeInsightError::DocxExtraction(format!("Malformed document.xml: {}", e)))
    }
}

fn paragraphs_from_document_xml(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    paragraphs.push(std::mem::take(&mut current));
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if in_paragraph => current.push('\t'),
                b"w:br" | b"w:cr" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_paragraph && in_text => {
                current.push_str(&e.xml_content()?);
            }
            Event::GeneralRef(e) if in_paragraph && in_text => {
                if let Some(ch) = e.resolve_char_ref()? {
                    current.push(ch);
                } else {
                    let name = e.decode()?;
                    if let Some(value) = quick_xml::escape::resolve_predefined_entity(&name) {
                        current.push_str(value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Extract plain text from `bytes` according to the file `extension`
pub fn extract(bytes: &[u8], extension: &str) -> Result<String> {
    match FileType::from_extension(extension) {
        FileType::Text => PlainTextExtractor.extract(bytes),
        FileType::Docx => DocxExtractor.extract(bytes),
        FileType::Pdf => PdfExtractor.extract(bytes),
        FileType::Unknown => Err(ResumeInsightError::UnsupportedFormat(extension.to_string())),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::docx_bytes;
    use super::*;

    #[test]
    fn test_plain_text_drops_invalid_utf8() {
        let bytes = b"Java \xff\xfeDeveloper\n5 yrs";
        assert_eq!(extract(bytes, "txt").unwrap(), "Java Developer\n5 yrs");
    }

    #[test]
    fn test_docx_paragraphs() {
        let bytes = docx_bytes(
            "<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t xml:space=\"preserve\">Java </w:t></w:r><w:r><w:t>&amp; Spring</w:t></w:r></w:p>\
             <w:p><w:r><w:t>SQL</w:t><w:tab/><w:t>Git</w:t></w:r></w:p>",
        );

        let text = extract(&bytes, "DOCX").unwrap();
        assert_eq!(text, "Jane Doe\n\nJava & Spring\nSQL\tGit");
    }

    #[test]
    fn test_invalid_docx() {
        let err = extract(b"not a zip", "docx").unwrap_err();
        assert!(matches!(err, ResumeInsightError::DocxExtraction(_)));
    }

    #[test]
    fn test_invalid_pdf() {
        let err = extract(b"not a pdf", "pdf").unwrap_err();
        assert!(matches!(err, ResumeInsightError::PdfExtraction(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract(b"hello", "rtf").unwrap_err();
        assert!(matches!(err, ResumeInsightError::UnsupportedFormat(_)));
        assert_eq!(err.to_string(), "Unsupported file type: rtf");
    }
}
