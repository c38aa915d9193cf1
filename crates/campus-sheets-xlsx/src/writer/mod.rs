//! XLSX writer

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{escape_xml_attr, XlsxStyleTable};
use campus_sheets_core::{CellAddress, CellValue, HyperlinkTarget, Workbook, Worksheet};

const HYPERLINK_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        if workbook.is_empty() {
            return Err(XlsxError::InvalidFormat(
                "a workbook needs at least one worksheet".into(),
            ));
        }

        let mut zip = zip::ZipWriter::new(writer);

        // Build a workbook-wide style table.
        let style_table = XlsxStyleTable::build(workbook);

        Self::write_content_types(&mut zip, workbook)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let external_links = Self::write_worksheet(&mut zip, sheet, i, &style_table)?;
            if !external_links.is_empty() {
                Self::write_worksheet_rels(&mut zip, i, &external_links)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews>
        <workbookView activeTab="{}"/>
    </bookViews>
    <sheets>"#,
            workbook.active_sheet()
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml_attr(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship
        let styles_rid = workbook.sheet_count() + 1;
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            styles_rid
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        let xml = style_table.to_styles_xml();
        zip.write_all(xml.as_bytes())?;
        Ok(())
    }

    /// Write one worksheet part, returning the external URIs its hyperlinks
    /// reference (in relationship id order)
    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<Vec<String>> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheetData>"#,
        );

        // Write cell data (sparse, row-major)
        let mut current_row: Option<u32> = None;
        for (row, col, cell) in sheet.iter_cells() {
            if current_row != Some(row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", row + 1));
                current_row = Some(row);
            }

            let cell_ref = CellAddress::new(row, col).to_a1_string();

            let xf_id = style_table.xf_id_for(index, cell.style_index);
            let style_attr = if xf_id != 0 {
                format!(" s=\"{}\"", xf_id)
            } else {
                String::new()
            };

            content.push_str("\n            ");
            content.push_str(&Self::cell_xml(&cell_ref, &style_attr, &cell.value));
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");

        let mut external_links = Vec::new();
        let mut links = sheet.hyperlinks().peekable();
        if links.peek().is_some() {
            content.push_str("\n    <hyperlinks>");
            for (row, col, link) in links {
                let mut attrs = format!(" ref=\"{}\"", CellAddress::new(row, col));
                match &link.target {
                    HyperlinkTarget::External(uri) => {
                        external_links.push(uri.clone());
                        attrs.push_str(&format!(" r:id=\"rId{}\"", external_links.len()));
                    }
                    HyperlinkTarget::Internal(location) => {
                        attrs.push_str(&format!(" location=\"{}\"", escape_xml_attr(location)));
                    }
                }
                if let Some(tooltip) = &link.tooltip {
                    attrs.push_str(&format!(" tooltip=\"{}\"", escape_xml_attr(tooltip)));
                }
                if let Some(display) = &link.display {
                    attrs.push_str(&format!(" display=\"{}\"", escape_xml_attr(display)));
                }
                content.push_str(&format!("\n        <hyperlink{}/>", attrs));
            }
            content.push_str("\n    </hyperlinks>");
        }

        content.push_str("\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(external_links)
    }

    fn cell_xml(cell_ref: &str, style_attr: &str, value: &CellValue) -> String {
        match value {
            CellValue::Number(n) if n.is_finite() => {
                format!("<c r=\"{}\"{}><v>{}</v></c>", cell_ref, style_attr, n)
            }
            CellValue::Number(_) => {
                format!("<c r=\"{}\"{} t=\"e\"><v>#NUM!</v></c>", cell_ref, style_attr)
            }
            CellValue::String(s) => format!(
                "<c r=\"{}\"{} t=\"inlineStr\"><is>{}</is></c>",
                cell_ref,
                style_attr,
                Self::text_element(s)
            ),
            CellValue::Boolean(b) => format!(
                "<c r=\"{}\"{} t=\"b\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                u8::from(*b)
            ),
            CellValue::Error(e) => format!(
                "<c r=\"{}\"{} t=\"e\"><v>{}</v></c>",
                cell_ref,
                style_attr,
                escape_xml_attr(e)
            ),
            CellValue::Formula { text, cached } => {
                let formula = format!("<f>{}</f>", escape_xml_attr(text));
                let (type_attr, cached_value) = match cached.as_deref() {
                    Some(CellValue::Number(n)) if n.is_finite() => ("", format!("<v>{}</v>", n)),
                    Some(CellValue::String(s)) => (
                        " t=\"str\"",
                        format!("<v>{}</v>", escape_xml_attr(&encode_excel_escapes(s))),
                    ),
                    Some(CellValue::Boolean(b)) => (" t=\"b\"", format!("<v>{}</v>", u8::from(*b))),
                    Some(CellValue::Error(e)) => (" t=\"e\"", format!("<v>{}</v>", escape_xml_attr(e))),
                    _ => ("", String::new()),
                };
                format!(
                    "<c r=\"{}\"{}{}>{}{}</c>",
                    cell_ref, style_attr, type_attr, formula, cached_value
                )
            }
            // Kept so style-only and blank-but-present cells survive
            CellValue::Empty => format!("<c r=\"{}\"{}/>", cell_ref, style_attr),
        }
    }

    /// `<t>` element for a string, preserving surrounding whitespace
    fn text_element(s: &str) -> String {
        let needs_preserve = s.starts_with(char::is_whitespace)
            || s.ends_with(char::is_whitespace)
            || s.contains('\n');
        let space_attr = if needs_preserve {
            " xml:space=\"preserve\""
        } else {
            ""
        };
        format!(
            "<t{}>{}</t>",
            space_attr,
            escape_xml_attr(&encode_excel_escapes(s))
        )
    }

    fn write_worksheet_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_index: usize,
        external_links: &[String],
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(
            format!("xl/worksheets/_rels/sheet{}.xml.rels", sheet_index + 1),
            options,
        )?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, uri) in external_links.iter().enumerate() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="{}" Target="{}" TargetMode="External"/>"#,
                i + 1,
                HYPERLINK_REL_TYPE,
                escape_xml_attr(uri)
            ));
        }
        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Encode characters XML cannot carry as Excel's `_xHHHH_` escapes
///
/// A literal `_xHHHH_` in the text gets its underscore escaped so the
/// reader does not decode it.
fn encode_excel_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.char_indices() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => out.push_str(&format!("_x{:04X}_", c as u32)),
            '_' if looks_like_escape(&s[i..]) => out.push_str("_x005F_"),
            c => out.push(c),
        }
    }
    out
}

fn looks_like_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}
