//! XLSX reader

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{attr_value, read_styles_xml};
use campus_sheets_core::style::Style;
use campus_sheets_core::{CellAddress, CellRange, CellValue, Hyperlink, Workbook, Worksheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// One `<hyperlink>` element before its relationship is resolved
struct PendingHyperlink {
    cell_ref: String,
    r_id: Option<String>,
    location: Option<String>,
    tooltip: Option<String>,
    display: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let cell_styles = Self::read_styles(&mut archive)?;
        let (sheet_info, active_tab) = Self::read_workbook_xml(&mut archive)?;
        let sheet_paths = Self::read_workbook_rels(&mut archive)?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheet_info {
            let Some(path) = sheet_paths.get(r_id) else {
                log::warn!("sheet '{}' has no worksheet part ({}), skipping", name, r_id);
                continue;
            };

            let mut worksheet = Worksheet::new(name.as_str());
            let hyperlinks = Self::read_worksheet(
                &mut archive,
                path,
                &mut worksheet,
                &shared_strings,
                &cell_styles,
            )?;
            if !hyperlinks.is_empty() {
                let targets = Self::read_worksheet_rels(&mut archive, path)?;
                Self::apply_hyperlinks(&mut worksheet, hyperlinks, &targets)?;
            }

            log::debug!(
                "read sheet '{}': {} cells, {} rows x {} columns",
                name,
                worksheet.cell_count(),
                worksheet.max_row(),
                worksheet.max_column()
            );
            workbook.add_existing_worksheet(worksheet)?;
        }

        if workbook.is_empty() {
            workbook.add_worksheet_with_name("Sheet1")?;
        }
        if active_tab < workbook.sheet_count() {
            workbook.set_active_sheet(active_tab)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Cell text keeps its surrounding whitespace
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs (<rPh>) repeat the text in another script
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<Vec<Style>> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(vec![Style::default()]),
        }
    }

    /// Read workbook.xml to get sheet names, rIds and the active tab
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, usize)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut active_tab = 0;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"sheet" => {
                        if let (Some(name), Some(r_id)) =
                            (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                        {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookView" => {
                        if let Some(tab) =
                            attr_value(&e, b"activeTab").and_then(|s| s.parse().ok())
                        {
                            active_tab = tab;
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, active_tab))
    }

    /// Read workbook.xml.rels to get sheet file paths
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<HashMap<String, String>> {
        let rels = Self::read_relationships(archive, "xl/_rels/workbook.xml.rels")?
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        Ok(rels
            .into_iter()
            .filter(|rel| rel.rel_type.ends_with("/worksheet"))
            .map(|rel| {
                // Target is relative to the xl/ folder unless absolute
                let full_path = match rel.target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{}", rel.target),
                };
                (rel.id, full_path)
            })
            .collect())
    }

    /// Read the hyperlink targets of a worksheet's relationships part
    fn read_worksheet_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        sheet_path: &str,
    ) -> XlsxResult<HashMap<String, String>> {
        let rels_path = match sheet_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", sheet_path),
        };

        Ok(Self::read_relationships(archive, &rels_path)?
            .unwrap_or_default()
            .into_iter()
            .filter(|rel| rel.rel_type.ends_with("/hyperlink"))
            .map(|rel| (rel.id, rel.target))
            .collect())
    }

    /// Parse a relationships part, `None` when the part does not exist
    fn read_relationships<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Option<Vec<Relationship>>> {
        let file = match archive.by_name(path) {
            Ok(f) => f,
            Err(_) => return Ok(None),
        };

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    if let (Some(id), Some(target), Some(rel_type)) = (
                        attr_value(&e, b"Id"),
                        attr_value(&e, b"Target"),
                        attr_value(&e, b"Type"),
                    ) {
                        rels.push(Relationship {
                            id,
                            target,
                            rel_type,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Some(rels))
    }

    /// Read a worksheet from the archive, returning its unresolved hyperlinks
    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        cell_styles: &[Style],
    ) -> XlsxResult<Vec<PendingHyperlink>> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let reader = BufReader::new(file);
        let mut xml_reader = Reader::from_reader(reader);
        // Cell text keeps its surrounding whitespace
        xml_reader.trim_text(false);

        let mut buf = Vec::new();
        let mut hyperlinks = Vec::new();

        let mut current: Option<CellAttrs> = None;
        // Position for cells that omit their `r` attribute
        let mut cursor = RowCursor::default();
        let mut current_value: Option<String> = None;
        let mut current_formula: Option<String> = None;
        let mut in_value = false;
        let mut in_formula = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => cursor.start_row(&e)?,
                    b"c" => {
                        current = Some(CellAttrs::parse(&e));
                        current_value = None;
                        current_formula = None;
                    }
                    b"v" if current.is_some() => in_value = true,
                    b"f" if current.is_some() => in_formula = true,
                    b"is" if current.is_some() => {
                        in_inline_str = true;
                        current_value = Some(String::new());
                    }
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"c" => {
                        if let Some(attrs) = current.take() {
                            let addr = cursor.place(&attrs)?;
                            Self::process_cell(
                                worksheet,
                                addr,
                                &attrs,
                                current_value.as_deref(),
                                current_formula.as_deref(),
                                shared_strings,
                                cell_styles,
                            )?;
                        }
                    }
                    b"v" => in_value = false,
                    b"f" => in_formula = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Ok(Event::Text(e)) => {
                    if in_value {
                        current_value
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                    } else if in_formula {
                        current_formula
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                    } else if in_inline_text {
                        current_value
                            .get_or_insert_with(String::new)
                            .push_str(&e.unescape()?);
                    }
                }
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"row" => cursor.start_row(&e)?,
                    b"c" => {
                        // Empty cell element (may still carry a style)
                        let attrs = CellAttrs::parse(&e);
                        let addr = cursor.place(&attrs)?;
                        Self::process_cell(
                            worksheet,
                            addr,
                            &attrs,
                            None,
                            None,
                            shared_strings,
                            cell_styles,
                        )?;
                    }
                    b"hyperlink" => {
                        if let Some(cell_ref) = attr_value(&e, b"ref") {
                            hyperlinks.push(PendingHyperlink {
                                cell_ref,
                                r_id: attr_value(&e, b"r:id"),
                                location: attr_value(&e, b"location"),
                                tooltip: attr_value(&e, b"tooltip"),
                                display: attr_value(&e, b"display"),
                            });
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(hyperlinks)
    }

    /// Process a cell and add it to the worksheet
    fn process_cell(
        worksheet: &mut Worksheet,
        addr: CellAddress,
        attrs: &CellAttrs,
        value: Option<&str>,
        formula: Option<&str>,
        shared_strings: &[String],
        styles: &[Style],
    ) -> XlsxResult<()> {
        let cell_type = attrs.cell_type.as_deref();

        let plain = match value {
            Some(v) => Self::typed_value(cell_type, v, shared_strings)?,
            None => CellValue::Empty,
        };

        let cell_value = match formula {
            Some(f) => CellValue::Formula {
                text: f.strip_prefix('=').unwrap_or(f).to_string(),
                cached: (!plain.is_empty()).then(|| Box::new(plain)),
            },
            None => plain,
        };

        worksheet.set_cell_value_at(addr.row, addr.col, cell_value)?;

        let style_idx = attrs.style.unwrap_or(0);
        let style = styles.get(style_idx as usize).ok_or_else(|| {
            XlsxError::Parse(format!("Style index {} out of bounds", style_idx))
        })?;
        worksheet.set_cell_style_at(addr.row, addr.col, style)?;

        Ok(())
    }

    fn typed_value(
        cell_type: Option<&str>,
        value: &str,
        shared_strings: &[String],
    ) -> XlsxResult<CellValue> {
        Ok(match cell_type {
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }
            Some("b") => {
                let v = value.trim();
                CellValue::Boolean(v == "1" || v.eq_ignore_ascii_case("true"))
            }
            Some("e") => CellValue::Error(value.trim().to_string()),
            Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(value)),
            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::String(value.to_string()),
            },
            // ISO 8601 dates ("d") and anything newer stay as text
            Some(_) => CellValue::String(value.to_string()),
        })
    }

    fn apply_hyperlinks(
        worksheet: &mut Worksheet,
        pending: Vec<PendingHyperlink>,
        targets: &HashMap<String, String>,
    ) -> XlsxResult<()> {
        // Ranges are clipped to the populated extent, but always cover their first cell
        let last_row = worksheet.max_row().saturating_sub(1);
        let last_col = worksheet.max_column().saturating_sub(1);

        for link in pending {
            let range = match CellRange::parse(&link.cell_ref) {
                Ok(range) => range,
                Err(e) => {
                    log::warn!("ignoring hyperlink on '{}': {}", link.cell_ref, e);
                    continue;
                }
            };

            let external = link.r_id.as_ref().and_then(|id| targets.get(id));
            let mut hyperlink = match (external, link.location) {
                (Some(uri), Some(fragment)) => Hyperlink::external(format!("{}#{}", uri, fragment)),
                (Some(uri), None) => Hyperlink::external(uri.as_str()),
                (None, Some(location)) => Hyperlink::internal(location),
                (None, None) => {
                    log::warn!(
                        "hyperlink on {} has no target (relationship {:?})",
                        link.cell_ref,
                        link.r_id
                    );
                    continue;
                }
            };
            hyperlink.tooltip = link.tooltip;
            hyperlink.display = link.display;

            let end_row = range.end.row.min(last_row.max(range.start.row));
            let end_col = range.end.col.min(last_col.max(range.start.col));
            for row in range.start.row..=end_row {
                for col in range.start.col..=end_col {
                    worksheet.set_hyperlink_at(row, col, hyperlink.clone())?;
                }
            }
        }
        Ok(())
    }
}

/// Tracks the current `<row>` and the next column within it
#[derive(Default)]
struct RowCursor {
    row: Option<u32>,
    next_col: u16,
}

impl RowCursor {
    /// Enter a `<row>`; without `r` it follows the previous row
    fn start_row(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        let row = match attr_value(e, b"r") {
            Some(r) => {
                let r: u32 = r
                    .trim()
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?;
                r.checked_sub(1)
                    .ok_or_else(|| XlsxError::Parse("Row number 0".into()))?
            }
            None => self.row.map_or(0, |row| row + 1),
        };
        self.row = Some(row);
        self.next_col = 0;
        Ok(())
    }

    /// Address of a cell; without `r` it sits right of the previous cell
    fn place(&mut self, attrs: &CellAttrs) -> XlsxResult<CellAddress> {
        let addr = match attrs.cell_ref.as_deref() {
            Some(cell_ref) => CellAddress::parse(cell_ref).map_err(|e| {
                XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
            })?,
            None => CellAddress::new(self.row.unwrap_or(0), self.next_col),
        };
        self.row = Some(addr.row);
        self.next_col = addr.col.saturating_add(1);
        Ok(addr)
    }
}

/// Attributes of a `<c>` element
struct CellAttrs {
    cell_ref: Option<String>,
    cell_type: Option<String>,
    style: Option<u32>,
}

impl CellAttrs {
    fn parse(e: &BytesStart<'_>) -> Self {
        Self {
            cell_ref: attr_value(e, b"r"),
            cell_type: attr_value(e, b"t"),
            style: attr_value(e, b"s").and_then(|s| s.parse().ok()),
        }
    }
}

struct Relationship {
    id: String,
    target: String,
    rel_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("hello_x000d_world"), "hello\rworld");
        assert_eq!(decode_excel_escapes("col1_x0009_col2"), "col1\tcol2");
        assert_eq!(
            decode_excel_escapes("line1_x000D__x000A_line2"),
            "line1\r\nline2"
        );
        assert_eq!(decode_excel_escapes("under_x005f_score"), "under_score");
        assert_eq!(decode_excel_escapes("plain text"), "plain text");
    }

    #[test]
    fn test_decode_excel_escapes_partial_sequence() {
        assert_eq!(decode_excel_escapes("_x00"), "_x00");
        assert_eq!(decode_excel_escapes("_x000d"), "_x000d");
        assert_eq!(decode_excel_escapes("St_xavier"), "St_xavier");
    }

    fn build_xlsx(sheet_xml: &str, shared_strings: Option<&str>, sheet_rels: Option<&str>) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default();

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Colleges" sheetId="1" r:id="rId1"/></sheets></workbook>"#).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#).unwrap();

            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();

            if let Some(sst) = shared_strings {
                zip.start_file("xl/sharedStrings.xml", options).unwrap();
                zip.write_all(sst.as_bytes()).unwrap();
            }
            if let Some(rels) = sheet_rels {
                zip.start_file("xl/worksheets/_rels/sheet1.xml.rels", options)
                    .unwrap();
                zip.write_all(rels.as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_read_empty_sheet() {
        let xlsx = build_xlsx(
            r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData></sheetData></worksheet>"#,
            None,
            None,
        );
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();

        assert_eq!(workbook.sheet_count(), 1);
        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.name(), "Colleges");
        assert_eq!(sheet.max_row(), 0);
    }

    #[test]
    fn test_read_values_and_whitespace() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
    <row r="2"><c r="A2" t="inlineStr"><is><t xml:space="preserve">   </t></is></c><c r="B2"><v>1701</v></c><c r="C2" t="b"><v>1</v></c></row>
    <row r="3"><c r="A3" t="str"><f>UPPER(B1)</f><v>BROWN &amp; CO</v></c><c r="B3" t="e"><v>#N/A</v></c><c r="D3"/></row>
  </sheetData>
</worksheet>"#;
        let sst = r#"<?xml version="1.0"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="2" uniqueCount="2">
  <si><t xml:space="preserve"> Yale </t></si>
  <si><r><t>Brown</t></r><r><t xml:space="preserve"> &amp; Co</t></r><rPh sb="0" eb="1"><t>ブラウン</t></rPh></si>
</sst>"#;
        let xlsx = build_xlsx(sheet, Some(sst), None);
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.get_value_at(0, 0), CellValue::string(" Yale "));
        assert_eq!(ws.get_value_at(0, 1), CellValue::string("Brown & Co"));
        assert_eq!(ws.get_value_at(1, 0), CellValue::string("   "));
        assert_eq!(ws.get_value_at(1, 1), CellValue::Number(1701.0));
        assert_eq!(ws.get_value_at(1, 2), CellValue::Boolean(true));
        assert_eq!(
            ws.get_value_at(2, 0),
            CellValue::Formula {
                text: "UPPER(B1)".into(),
                cached: Some(Box::new(CellValue::string("BROWN & CO"))),
            }
        );
        assert_eq!(ws.get_value_at(2, 1), CellValue::Error("#N/A".into()));
        assert!(ws.cell_at(2, 3).is_some());
        assert_eq!(ws.max_column(), 4);
        assert_eq!(ws.max_row(), 3);
    }

    #[test]
    fn test_read_hyperlinks() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheetData>
    <row r="1"><c r="A1" t="inlineStr"><is><t>Yale</t></is></c></row>
    <row r="2"><c r="A2" t="inlineStr"><is><t>Top</t></is></c></row>
  </sheetData>
  <hyperlinks>
    <hyperlink ref="A1" r:id="rId1" tooltip="Home page"/>
    <hyperlink ref="A2:B2" location="Colleges!A1" display="Top"/>
    <hyperlink ref="A3" r:id="rId9"/>
  </hyperlinks>
</worksheet>"#;
        let rels = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://www.yale.edu/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;
        let xlsx = build_xlsx(sheet, None, Some(rels));
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(
            ws.hyperlink_at(0, 0),
            Some(&Hyperlink::external("https://www.yale.edu/?a=1&b=2").with_tooltip("Home page"))
        );
        assert_eq!(
            ws.hyperlink_at(1, 0),
            Some(&Hyperlink::internal("Colleges!A1").with_display("Top"))
        );
        assert!(ws.hyperlink_at(2, 0).is_none());
    }

    #[test]
    fn test_whole_column_hyperlink_is_clipped() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="inlineStr"><is><t>College</t></is></c></row>
    <row r="2"><c r="A2" t="inlineStr"><is><t>Yale</t></is></c></row>
    <row r="3"><c r="A3" t="inlineStr"><is><t>MIT</t></is></c></row>
  </sheetData>
  <hyperlinks>
    <hyperlink ref="A2:A3" location="S!A1"/>
    <hyperlink ref="A1:A1048576" location="S!B1"/>
  </hyperlinks>
</worksheet>"#;
        let xlsx = build_xlsx(sheet, None, None);
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        // Later links win, so the whole-column link replaces the first one
        assert_eq!(ws.hyperlink_at(0, 0), Some(&Hyperlink::internal("S!B1")));
        assert_eq!(ws.hyperlink_at(2, 0), Some(&Hyperlink::internal("S!B1")));
        assert_eq!(ws.hyperlinks().count(), 3);
    }

    #[test]
    fn test_range_hyperlink_over_two_rows() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="2"><c r="A2" t="inlineStr"><is><t>Yale</t></is></c></row>
    <row r="3"><c r="A3" t="inlineStr"><is><t>MIT</t></is></c></row>
  </sheetData>
  <hyperlinks><hyperlink ref="A2:A3" location="S!A1"/></hyperlinks>
</worksheet>"#;
        let xlsx = build_xlsx(sheet, None, None);
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.hyperlink_at(1, 0), Some(&Hyperlink::internal("S!A1")));
        assert_eq!(ws.hyperlink_at(2, 0), Some(&Hyperlink::internal("S!A1")));
    }

    #[test]
    fn test_cells_without_reference_follow_position() {
        let sheet = r#"<?xml version="1.0"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="2"><c r="A2" t="inlineStr"><is><t>Yale</t></is></c></row>
    <row r="3"><c t="inlineStr"><is><t>MIT</t></is></c><c><v>7</v></c><c r="E3"><v>1</v></c><c/></row>
    <row><c t="inlineStr"><is><t>Brown</t></is></c></row>
  </sheetData>
</worksheet>"#;
        let xlsx = build_xlsx(sheet, None, None);
        let workbook = XlsxReader::read(Cursor::new(xlsx)).unwrap();
        let ws = workbook.worksheet(0).unwrap();

        assert_eq!(ws.get_value_at(1, 0), CellValue::string("Yale"));
        assert_eq!(ws.get_value_at(2, 0), CellValue::string("MIT"));
        assert_eq!(ws.get_value_at(2, 1), CellValue::Number(7.0));
        assert_eq!(ws.get_value_at(2, 4), CellValue::Number(1.0));
        assert_eq!(ws.get_value_at(3, 0), CellValue::string("Brown"));
        assert_eq!(ws.max_row(), 4);
    }

    #[test]
    fn test_missing_content_types_is_invalid() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(b"not a workbook").unwrap();
            zip.finish().unwrap();
        }
        assert!(matches!(
            XlsxReader::read(Cursor::new(buf)),
            Err(XlsxError::InvalidFormat(_))
        ));
    }
}
