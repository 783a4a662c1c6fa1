//! Ad content workbook as a SpreadsheetML package.
//!
//! One sheet per channel with records, in channel order. Row 1 holds the
//! schema's field names; each record fills one row beneath it.

use super::write_package;
use super::xml::escape;
use crate::error::ReportResult;
use crate::types::channel::Channel;
use crate::types::run::GenerationRun;

/// Widest a column is auto-sized to.
const MAX_COLUMN_WIDTH: f64 = 50.0;

/// Style indices into `cellXfs` below.
const HEADER_STYLE: u32 = 1;
const BODY_STYLE: u32 = 2;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><color rgb="FFFFFFFF"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FF000000"/><bgColor rgb="FF000000"/></patternFill></fill></fills><borders count="2"><border><left/><right/><top/><bottom/><diagonal/></border><border><left style="thin"><color rgb="FF000000"/></left><right style="thin"><color rgb="FF000000"/></right><top style="thin"><color rgb="FF000000"/></top><bottom style="thin"><color rgb="FF000000"/></bottom><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="1" xfId="0" applyFont="1" applyFill="1" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center"/></xf><xf numFmtId="0" fontId="0" fillId="0" borderId="1" xfId="0" applyBorder="1" applyAlignment="1"><alignment horizontal="center" vertical="center" wrapText="1"/></xf></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#;

/// A sheet's content before serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Column widths: longest line in the column plus padding, capped.
    pub fn column_widths(&self) -> Vec<f64> {
        (0..self.headers.len())
            .map(|col| {
                let longest = std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().filter_map(|row| row.get(col)))
                    .flat_map(|value| value.split('\n'))
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0);
                ((longest + 2) as f64 * 1.2).min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.headers.is_empty() {
            xml.push_str("<cols>");
            for (index, width) in self.column_widths().iter().enumerate() {
                xml.push_str(&format!(
                    r#"<col min="{n}" max="{n}" width="{width:.2}" customWidth="1"/>"#,
                    n = index + 1
                ));
            }
            xml.push_str("</cols>");
        }

        xml.push_str("<sheetData>");
        if !self.headers.is_empty() {
            push_row(&mut xml, 1, &self.headers, HEADER_STYLE);
        }
        for (index, row) in self.rows.iter().enumerate() {
            push_row(&mut xml, index + 2, row, BODY_STYLE);
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

fn push_row(xml: &mut String, row_number: usize, values: &[String], style: u32) {
    xml.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, value) in values.iter().enumerate() {
        xml.push_str(&format!(
            r#"<c r="{}{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column_letter(col),
            row_number,
            style,
            escape(value)
        ));
    }
    xml.push_str("</row>");
}

/// Spreadsheet column name for a 0-based index (0 is "A", 26 is "AA").
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Sheets for every channel that produced records.
pub fn workbook_sheets(run: &GenerationRun) -> Vec<SheetData> {
    Channel::ALL
        .iter()
        .filter_map(|channel| {
            let records = run.channel(*channel);
            if records.is_empty() {
                return None;
            }
            let headers: Vec<String> = channel
                .schema()
                .fields
                .iter()
                .map(|f| f.to_string())
                .collect();
            let rows = records
                .iter()
                .map(|record| {
                    headers
                        .iter()
                        .map(|h| record.get(h).unwrap_or_default().to_string())
                        .collect()
                })
                .collect();
            Some(SheetData {
                name: channel.label().to_string(),
                headers,
                rows,
            })
        })
        .collect()
}

/// Serialize the ad content workbook to XLSX bytes.
pub fn ad_workbook(run: &GenerationRun) -> ReportResult<Vec<u8>> {
    let mut sheets = workbook_sheets(run);
    if sheets.is_empty() {
        sheets.push(SheetData {
            name: "Sheet".to_string(),
            headers: Vec::new(),
            rows: Vec::new(),
        });
    }

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut workbook_rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    let mut parts: Vec<(String, String)> = Vec::with_capacity(sheets.len() + 5);
    for (index, sheet) in sheets.iter().enumerate() {
        let n = index + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
            escape(&sheet.name)
        ));
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
        ));
        parts.push((format!("xl/worksheets/sheet{n}.xml"), sheet.to_xml()));
    }

    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    workbook_rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
        sheets.len() + 1
    ));

    let mut package = vec![
        ("[Content_Types].xml".to_string(), content_types),
        ("_rels/.rels".to_string(), PACKAGE_RELS.to_string()),
        ("xl/workbook.xml".to_string(), workbook),
        ("xl/_rels/workbook.xml.rels".to_string(), workbook_rels),
        ("xl/styles.xml".to_string(), STYLES.to_string()),
    ];
    package.extend(parts);
    write_package(&package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::types::record::{AdRecord, PlaceholderSlot};
    use crate::types::run::Provenance;
    use serde_json::json;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(6), "G");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_column_widths_use_longest_line_and_cap() {
        let sheet = SheetData {
            name: "Email".into(),
            headers: vec!["CTA".into(), "Body".into()],
            rows: vec![vec!["Book now".into(), "x".repeat(80)]],
        };
        let widths = sheet.column_widths();
        assert!((widths[0] - 12.0).abs() < 1e-9);
        assert_eq!(widths[1], 50.0);

        let multiline = SheetData {
            name: "Email".into(),
            headers: vec!["A".into()],
            rows: vec![vec!["four\nsix666".into()]],
        };
        assert!((multiline.column_widths()[0] - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_sheets_follow_channel_order_and_skip_empty() {
        let mut run = GenerationRun::new("Acme", Provenance::default());
        let display = Channel::GoogleDisplay.schema();
        let email = Channel::Email.schema();
        run.channels.insert(
            Channel::GoogleDisplay,
            vec![AdRecord::from_item(display, &json!({"Headline": "H", "Description": "D"})).unwrap()],
        );
        run.channels.insert(Channel::LinkedIn, Vec::new());
        run.channels.insert(
            Channel::Email,
            vec![AdRecord::placeholder(
                email,
                FailureKind::JsonParse,
                PlaceholderSlot { call: 1, stage: None, variant: 1, batch: 1 },
            )],
        );

        let sheets = workbook_sheets(&run);
        let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Email", "Google Display"]);
        assert_eq!(sheets[0].headers[0], "Ad Name");
        assert_eq!(sheets[0].rows[0][0], "JSONError_Email_Call_1");
        assert_eq!(sheets[1].rows[0], vec!["H".to_string(), "D".to_string()]);

        let bytes = ad_workbook(&run).unwrap();
        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Email" sheetId="1" r:id="rId1"/>"#));
        assert!(workbook.contains(r#"<sheet name="Google Display" sheetId="2" r:id="rId2"/>"#));

        let sheet = part(&bytes, "xl/worksheets/sheet2.xml");
        assert!(sheet.contains(r#"<c r="A1" s="1" t="inlineStr"><is><t xml:space="preserve">Headline</t></is></c>"#));
        assert!(sheet.contains(r#"<c r="B2" s="2" t="inlineStr"><is><t xml:space="preserve">D</t></is></c>"#));
    }

    #[test]
    fn test_empty_workbook_has_blank_sheet() {
        let run = GenerationRun::new("Acme", Provenance::default());
        let bytes = ad_workbook(&run).unwrap();
        let workbook = part(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"<sheet name="Sheet" sheetId="1" r:id="rId1"/>"#));
        assert!(part(&bytes, "xl/worksheets/sheet1.xml").contains("<sheetData></sheetData>"));
    }
}
