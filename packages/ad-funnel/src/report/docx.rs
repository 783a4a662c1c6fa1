//! Narrative transparency report as a WordprocessingML package.

use super::xml::escape;
use super::write_package;
use crate::error::ReportResult;
use crate::types::run::{Provenance, SourceText};

const NO_SUMMARY: &str = "N/A (No summary generated)";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="4F81BD"/><w:sz w:val="26"/></w:rPr></w:style></w:styles>"#;

/// Accumulates body paragraphs for one document.
#[derive(Debug, Default)]
struct DocumentBody {
    xml: String,
}

impl DocumentBody {
    fn heading(&mut self, text: &str, level: u8) {
        self.paragraph_with_style(text, Some(&format!("Heading{}", level)));
    }

    fn paragraph(&mut self, text: &str) {
        self.paragraph_with_style(text, None);
    }

    fn spacer(&mut self) {
        self.xml.push_str("<w:p/>");
    }

    fn paragraph_with_style(&mut self, text: &str, style: Option<&str>) {
        self.xml.push_str("<w:p>");
        if let Some(style) = style {
            self.xml.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style));
        }
        self.xml.push_str("<w:r>");
        for (index, line) in text.lines().enumerate() {
            if index > 0 {
                self.xml.push_str("<w:br/>");
            }
            self.xml.push_str(r#"<w:t xml:space="preserve">"#);
            self.xml.push_str(&escape(line));
            self.xml.push_str("</w:t>");
        }
        self.xml.push_str("</w:r></w:p>");
    }

    fn into_document(self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
            self.xml
        )
    }
}

/// One provenance section: where the text came from and what to show when
/// there is none.
struct Section<'a> {
    raw_heading: &'static str,
    summary_heading: &'static str,
    missing: &'static str,
    text: &'a SourceText,
}

fn sections(provenance: &Provenance) -> [Section<'_>; 3] {
    [
        Section {
            raw_heading: "Raw Extract from URL:",
            summary_heading: "AI Summarized (URL):",
            missing: "N/A (No URL provided or extraction failed)",
            text: &provenance.url,
        },
        Section {
            raw_heading: "Extract from Additional Upload:",
            summary_heading: "AI Summarized (Additional Upload):",
            missing: "N/A (No additional context file uploaded or extraction failed)",
            text: &provenance.additional_context,
        },
        Section {
            raw_heading: "Extract from Lead Magnet:",
            summary_heading: "AI Summarized (Lead Magnet):",
            missing: "N/A (No lead magnet file uploaded or extraction failed)",
            text: &provenance.lead_magnet,
        },
    ]
}

/// Body text of the transparency report, paragraph by paragraph.
///
/// Exposed so callers can preview the report without unpacking the DOCX.
pub fn report_paragraphs(company_name: &str, provenance: &Provenance) -> Vec<(Option<u8>, String)> {
    let mut paragraphs = vec![
        (Some(1), "AI Transparency Report".to_string()),
        (
            None,
            format!(
                "This document outlines the source text and AI-generated summaries used for creating ad copy for {}.",
                company_name
            ),
        ),
    ];

    for section in sections(provenance) {
        paragraphs.push((Some(2), section.raw_heading.to_string()));
        paragraphs.push((None, non_empty_or(&section.text.raw, section.missing)));
        paragraphs.push((Some(2), section.summary_heading.to_string()));
        paragraphs.push((None, non_empty_or(&section.text.summary, NO_SUMMARY)));
    }
    paragraphs
}

/// Serialize the transparency report to DOCX bytes.
pub fn transparency_report(company_name: &str, provenance: &Provenance) -> ReportResult<Vec<u8>> {
    let mut body = DocumentBody::default();
    for (level, text) in report_paragraphs(company_name, provenance) {
        match level {
            Some(level) => body.heading(&text, level),
            None => {
                body.paragraph(&text);
                body.spacer();
            }
        }
    }

    write_package(&[
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("word/document.xml", body.into_document()),
    ])
}

fn non_empty_or(text: &str, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn document_xml(bytes: Vec<u8>) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_empty_sources_use_fallbacks() {
        let paragraphs = report_paragraphs("Acme", &Provenance::default());
        let texts: Vec<&str> = paragraphs.iter().map(|(_, t)| t.as_str()).collect();

        assert_eq!(texts[0], "AI Transparency Report");
        assert!(texts[1].ends_with("creating ad copy for Acme."));
        assert!(texts.contains(&"N/A (No URL provided or extraction failed)"));
        assert!(texts.contains(&"N/A (No lead magnet file uploaded or extraction failed)"));
        assert_eq!(texts.iter().filter(|t| **t == NO_SUMMARY).count(), 3);
        assert_eq!(paragraphs.len(), 14);
    }

    #[test]
    fn test_docx_package_contains_escaped_text() {
        let provenance = Provenance {
            url: SourceText::new("R&D <labs>\nsecond line", "We do R&D."),
            ..Default::default()
        };

        let bytes = transparency_report("Fish & Chips", &provenance).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"word/styles.xml"));

        let xml = document_xml(bytes);
        assert!(xml.contains("ad copy for Fish &amp; Chips."));
        assert!(xml.contains("R&amp;D &lt;labs&gt;</w:t><w:br/>"));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains("Extract from Additional Upload:"));
    }
}
