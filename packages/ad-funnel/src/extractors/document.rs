//! Uploaded document text extraction: PDF and PowerPoint.

use regex::Regex;
use std::io::{Cursor, Read};
use std::sync::LazyLock;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{ExtractionError, ExtractionResult};
use crate::report::xml::unescape;
use crate::types::input::Document;

static RE_SLIDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("valid slide path pattern")
});
static RE_RUN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a:t(?:\s[^>]*)?>([^<]*)</a:t>").expect("valid text run pattern")
});

/// Document kinds text can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Pptx,
}

impl DocumentKind {
    /// Kind from the file extension, ignoring case.
    pub fn from_name(name: &str) -> ExtractionResult<Self> {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "pptx" => Ok(Self::Pptx),
            _ => Err(ExtractionError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// Reads text out of uploaded documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract_text(&self, document: &Document) -> ExtractionResult<String> {
        let kind = DocumentKind::from_name(&document.name)?;
        let name = document.name.clone();
        let bytes = document.bytes.clone();

        let text = tokio::task::spawn_blocking(move || match kind {
            DocumentKind::Pdf => pdf_text(&bytes),
            DocumentKind::Pptx => pptx_text(&bytes),
        })
        .await
        .map_err(|e| ExtractionError::Document {
            name: name.clone(),
            reason: format!("parser task failed: {}", e),
        })?
        .map_err(|reason| ExtractionError::Document {
            name: name.clone(),
            reason,
        })?;

        debug!(document = %name, kind = ?kind, chars = text.len(), "document text extracted");
        Ok(text)
    }
}

fn pdf_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string())
}

/// Slide text in slide order, one line per paragraph.
pub fn pptx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|path| {
            let number = RE_SLIDE.captures(path)?.get(1)?.as_str().parse().ok()?;
            Some((number, path.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    let mut lines = Vec::new();
    for (_, path) in slides {
        let mut xml = String::new();
        archive
            .by_name(&path)
            .map_err(|e| e.to_string())?
            .read_to_string(&mut xml)
            .map_err(|e| format!("{}: {}", path, e))?;
        lines.extend(slide_lines(&xml));
    }

    Ok(lines.join("\n"))
}

fn slide_lines(xml: &str) -> Vec<String> {
    xml.split("</a:p>")
        .map(|paragraph| {
            RE_RUN_TEXT
                .captures_iter(paragraph)
                .filter_map(|c| c.get(1))
                .map(|m| unescape(m.as_str()))
                .collect::<String>()
        })
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn slide(texts: &[&str]) -> String {
        let paragraphs: String = texts
            .iter()
            .map(|t| format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", t))
            .collect();
        format!(
            "<p:sld><p:cSld><p:spTree><p:sp><p:txBody>{}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>",
            paragraphs
        )
    }

    fn pptx(slides: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, xml) in slides {
            writer.start_file(*path, FileOptions::default()).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(DocumentKind::from_name("Guide.PDF").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_name("deck.pptx").unwrap(), DocumentKind::Pptx);
        assert!(matches!(
            DocumentKind::from_name("notes.docx"),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
        assert!(DocumentKind::from_name("README").is_err());
    }

    #[test]
    fn test_pptx_text_in_slide_order() {
        let bytes = pptx(&[
            ("ppt/slides/slide10.xml", slide(&["Ten"])),
            ("ppt/slides/slide2.xml", slide(&["Two &amp; more", "Second line"])),
            ("ppt/slides/slide1.xml", slide(&["One"])),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>".to_string()),
        ]);

        let text = pptx_text(&bytes).unwrap();
        assert_eq!(text, "One\nTwo & more\nSecond line\nTen");
    }

    #[test]
    fn test_pptx_rejects_non_zip() {
        assert!(pptx_text(b"not a zip").is_err());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_document_error() {
        let err = DocumentExtractor::new()
            .extract_text(&Document::new("guide.pdf", b"%PDF-garbage".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Document { .. }));
    }
}
