//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use campus_sheets_core::style::{
    Color, FillStyle, FontStyle, NumberFormat, PatternType, Style, Underline,
};
use campus_sheets_core::Workbook;

// === Writing ===

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xfId.
    sheet_maps: Vec<HashMap<u32, u32>>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = vec![Style::default()];
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();
        style_to_xf.insert(Style::default(), 0);

        let mut sheet_maps = Vec::with_capacity(workbook.sheet_count());

        for sheet in workbook.worksheets() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet
                    .style_by_index(local_idx)
                    .cloned()
                    .unwrap_or_default();

                let xf_id = match style_to_xf.get(&style) {
                    Some(&id) => id,
                    None => {
                        let id = styles.len() as u32;
                        styles.push(style.clone());
                        style_to_xf.insert(style, id);
                        id
                    }
                };

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);
        }

        Self { styles, sheet_maps }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut font_ids: HashMap<FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = vec![FontStyle::default()];
        font_ids.insert(FontStyle::default(), 0);

        // Excel requires the first two fills to be: none and gray125
        let gray125 = FillStyle::pattern(PatternType::Gray125, Color::Auto, Color::Auto);
        let mut fills: Vec<FillStyle> = vec![FillStyle::None, gray125.clone()];
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        fill_ids.insert(FillStyle::None, 0);
        fill_ids.insert(gray125, 1);

        let mut numfmt_ids: HashMap<String, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut next_numfmt_id = NumberFormat::FIRST_CUSTOM_ID;

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = match font_ids.get(&style.font) {
                Some(&id) => id,
                None => {
                    let id = fonts.len() as u32;
                    fonts.push(style.font.clone());
                    font_ids.insert(style.font.clone(), id);
                    id
                }
            };

            let fill_id = match fill_ids.get(&style.fill) {
                Some(&id) => id,
                None => {
                    let id = fills.len() as u32;
                    fills.push(style.fill.clone());
                    fill_ids.insert(style.fill.clone(), id);
                    id
                }
            };

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => match numfmt_ids.get(code) {
                    Some(&id) => id,
                    None => {
                        let id = next_numfmt_id;
                        next_numfmt_id += 1;
                        numfmt_ids.insert(code.clone(), id);
                        numfmts.push((id, code.clone()));
                        id
                    }
                },
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml_attr(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len()));
        for fill in &fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        // Borders are not modelled; one empty border satisfies the schema
        xml.push_str(
            r#"
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for ids in &resolved {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(*ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

pub(crate) fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " auto=\"1\"".to_string(),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!(" rgb=\"{}\"", color.to_argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, .. } => match color.tint() {
            Some(tint) if tint != 0.0 => format!(" theme=\"{}\" tint=\"{}\"", index, tint),
            _ => format!(" theme=\"{}\"", index),
        },
    }
}

fn write_color(tag: &str, color: &Color) -> String {
    format!("<{}{}/>", tag, color_attrs(color))
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        other => s.push_str(&format!("<u val=\"{}\"/>", other.as_str())),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&write_color("color", &font.color));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape_xml_attr(&font.name)));
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
            write_color("fgColor", color)
        ),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => format!(
            "<fill><patternFill patternType=\"{}\">{}{}</patternFill></fill>",
            pattern.as_str(),
            write_color("fgColor", foreground),
            write_color("bgColor", background)
        ),
    }
}

fn write_xf(ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }

    format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"0\" xfId=\"0\"{}/>",
        ids.num_fmt_id, ids.font_id, ids.fill_id, attrs
    )
}

// === Reading ===

/// Read styles.xml into one [`Style`] per `cellXfs` entry
pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: HashMap<u32, String> = HashMap::new();
    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut cell_xfs: Vec<Style> = Vec::new();

    let mut current_font: Option<FontStyle> = None;
    let mut in_fill = false;
    let mut fill_pattern: Option<PatternType> = None;
    let mut fill_fg = Color::Auto;
    let mut fill_bg = Color::Auto;
    let mut in_cell_xfs = false;
    // Differential formats reuse <font>/<fill>; they are not cell styles
    let mut in_dxfs = false;

    loop {
        let event = xml_reader.read_event_into(&mut buf);
        let (element, is_empty) = match &event {
            Ok(Event::Start(e)) => (Some(e), false),
            Ok(Event::Empty(e)) => (Some(e), true),
            _ => (None, false),
        };

        if let Some(e) = element {
            match e.name().as_ref() {
                b"dxfs" if !is_empty => in_dxfs = true,
                _ if in_dxfs => {}
                b"cellXfs" if !is_empty => in_cell_xfs = true,
                b"numFmt" => {
                    if let (Some(id), Some(code)) = (
                        attr_value(e, b"numFmtId").and_then(|s| s.parse().ok()),
                        attr_value(e, b"formatCode"),
                    ) {
                        numfmts.insert(id, code);
                    }
                }
                b"font" => {
                    if is_empty {
                        fonts.push(FontStyle::default());
                    } else {
                        current_font = Some(FontStyle::default());
                    }
                }
                b"b" | b"i" | b"strike" | b"u" | b"sz" | b"name" | b"color" => {
                    if let Some(font) = current_font.as_mut() {
                        apply_font_element(font, e);
                    }
                }
                b"fill" => {
                    if is_empty {
                        fills.push(FillStyle::None);
                    } else {
                        in_fill = true;
                        fill_pattern = None;
                        fill_fg = Color::Auto;
                        fill_bg = Color::Auto;
                    }
                }
                b"patternFill" if in_fill => {
                    fill_pattern = Some(
                        attr_value(e, b"patternType")
                            .and_then(|s| PatternType::parse(&s))
                            .unwrap_or(PatternType::None),
                    );
                }
                b"fgColor" if in_fill => fill_fg = parse_color_attrs(e),
                b"bgColor" if in_fill => fill_bg = parse_color_attrs(e),
                b"xf" if in_cell_xfs => {
                    let id = |key: &[u8]| {
                        attr_value(e, key)
                            .and_then(|s| s.parse::<u32>().ok())
                            .unwrap_or(0)
                    };
                    cell_xfs.push(resolve_style(
                        id(b"numFmtId"),
                        id(b"fontId"),
                        id(b"fillId"),
                        &numfmts,
                        &fonts,
                        &fills,
                    ));
                }
                _ => {}
            }
        }

        match event {
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"dxfs" => in_dxfs = false,
                _ if in_dxfs => {}
                b"font" => {
                    if let Some(font) = current_font.take() {
                        fonts.push(font);
                    }
                }
                b"fill" if in_fill => {
                    fills.push(finalize_fill(fill_pattern, fill_fg, fill_bg));
                    in_fill = false;
                }
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(XlsxError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if cell_xfs.is_empty() {
        cell_xfs.push(Style::default());
    }
    Ok(cell_xfs)
}

fn apply_font_element(font: &mut FontStyle, e: &BytesStart<'_>) {
    // Boolean toggles may carry val="0" to switch the property off
    let flag = || attr_value(e, b"val").map_or(true, |v| v != "0" && v != "false");
    match e.name().as_ref() {
        b"b" => font.bold = flag(),
        b"i" => font.italic = flag(),
        b"strike" => font.strikethrough = flag(),
        b"u" => font.underline = Underline::parse(attr_value(e, b"val").as_deref()),
        b"sz" => {
            if let Some(size) = attr_value(e, b"val").and_then(|s| s.parse::<f64>().ok()) {
                font.size = size;
            }
        }
        b"name" => {
            if let Some(name) = attr_value(e, b"val") {
                font.name = name;
            }
        }
        b"color" => font.color = parse_color_attrs(e),
        _ => {}
    }
}

fn resolve_style(
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    numfmts: &HashMap<u32, String>,
    fonts: &[FontStyle],
    fills: &[FillStyle],
) -> Style {
    let number_format = match numfmts.get(&num_fmt_id) {
        Some(code) => NumberFormat::from_string(code.clone()),
        None => NumberFormat::from_id(num_fmt_id),
    };

    Style {
        font: fonts.get(font_id as usize).cloned().unwrap_or_default(),
        fill: fills.get(fill_id as usize).cloned().unwrap_or_default(),
        number_format,
    }
}

fn finalize_fill(pattern: Option<PatternType>, fg: Color, bg: Color) -> FillStyle {
    match pattern.unwrap_or(PatternType::None) {
        PatternType::None => FillStyle::None,
        PatternType::Solid => FillStyle::Solid { color: fg },
        p => FillStyle::Pattern {
            pattern: p,
            foreground: fg,
            background: bg,
        },
    }
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    if let Some(color) = attr_value(e, b"rgb").and_then(|rgb| Color::from_hex(&rgb)) {
        return color;
    }

    if let Some(index) = attr_value(e, b"theme").and_then(|s| s.parse::<u8>().ok()) {
        let tint = attr_value(e, b"tint")
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        return Color::theme(index, tint);
    }

    match attr_value(e, b"indexed").and_then(|s| s.parse::<u8>().ok()) {
        // 64 is the system foreground, i.e. automatic
        Some(64) | None => Color::Auto,
        Some(i) => Color::Indexed(i),
    }
}

pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.to_string()))
}
