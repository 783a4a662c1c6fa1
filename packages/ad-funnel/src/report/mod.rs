//! Export artifacts: the DOCX transparency report and the XLSX ad workbook.
//!
//! Both are written as minimal Office Open XML packages straight into a zip
//! container in memory.

pub mod docx;
pub mod xlsx;
pub mod xml;

pub use docx::{report_paragraphs, transparency_report};
pub use xlsx::{ad_workbook, workbook_sheets, SheetData};

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ReportResult;
use crate::types::run::{Artifact, GenerationRun, StatusLog};
use crate::utils::sanitize_filename;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn report_file_name(company_name: &str) -> String {
    format!("{}_ai_report.docx", sanitize_filename(company_name))
}

pub fn workbook_file_name(company_name: &str) -> String {
    format!("{}_lead.xlsx", sanitize_filename(company_name))
}

/// Build both artifacts for a finished run.
///
/// A serialization failure is reported on the log and leaves that artifact
/// absent; the other is still produced.
pub fn assemble(run: &GenerationRun, log: &mut StatusLog) -> (Option<Artifact>, Option<Artifact>) {
    let report = match transparency_report(&run.company_name, &run.provenance) {
        Ok(bytes) => Some(Artifact {
            file_name: report_file_name(&run.company_name),
            mime_type: DOCX_MIME,
            bytes,
        }),
        Err(e) => {
            log.error(None, format!("Failed to build transparency report: {}", e));
            None
        }
    };

    let workbook = match ad_workbook(run) {
        Ok(bytes) => Some(Artifact {
            file_name: workbook_file_name(&run.company_name),
            mime_type: XLSX_MIME,
            bytes,
        }),
        Err(e) => {
            log.error(None, format!("Failed to build ad workbook: {}", e));
            None
        }
    };

    (report, workbook)
}

/// Zip named parts into one deflated package.
pub(crate) fn write_package<N: AsRef<str>>(parts: &[(N, String)]) -> ReportResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        writer.start_file(name.as_ref(), options)?;
        writer.write_all(content.as_bytes())?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::run::Provenance;

    #[test]
    fn test_file_names() {
        assert_eq!(report_file_name("Acme Corp."), "Acme_Corp_ai_report.docx");
        assert_eq!(workbook_file_name("Acme Corp."), "Acme_Corp_lead.xlsx");
        assert_eq!(workbook_file_name("***"), "untitled_lead.xlsx");
    }

    #[test]
    fn test_assemble_produces_both_artifacts() {
        let run = GenerationRun::new("Acme", Provenance::default());
        let mut log = StatusLog::new();

        let (report, workbook) = assemble(&run, &mut log);

        let report = report.unwrap();
        assert_eq!(report.file_name, "Acme_ai_report.docx");
        assert_eq!(report.mime_type, DOCX_MIME);
        assert!(report.bytes.starts_with(b"PK"));
        assert_eq!(workbook.unwrap().mime_type, XLSX_MIME);
        assert_eq!(log.errors().count(), 0);
    }
}
