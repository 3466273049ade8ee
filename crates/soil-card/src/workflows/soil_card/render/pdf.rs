//! Minimal PDF 1.4 writer for soil health cards.
//!
//! Uses the base-14 Helvetica family so no fonts are embedded. Text is
//! emitted in WinAnsi encoding; characters outside Latin-1 print as `?`.

use super::{DocumentRenderer, RenderError};
use crate::workflows::soil_card::document::{Block, Field, ReportDocument, Table};
use chrono::{NaiveDateTime, Utc};
use std::fmt::Write as _;

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const BODY_SIZE: f32 = 10.0;
const BODY_LEADING: f32 = 13.0;
const CELL_SIZE: f32 = 9.0;
const CELL_LEADING: f32 = 11.0;
const CELL_PADDING: f32 = 3.0;
const BLOCK_GAP: f32 = 8.0;

const BLACK: (u8, u8, u8) = (0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    const fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
            Self::Italic => "F3",
        }
    }

    const fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
            Self::Italic => "Helvetica-Oblique",
        }
    }

    const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Italic];
}

/// PDF backend. The creation timestamp defaults to the time of encoding.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    created_at: Option<NaiveDateTime>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `/CreationDate`, making output byte-for-byte reproducible.
    pub fn with_timestamp(created_at: NaiveDateTime) -> Self {
        Self {
            created_at: Some(created_at),
        }
    }
}

impl DocumentRenderer for PdfRenderer {
    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError> {
        let mut layout = Layout::new();
        for block in &document.blocks {
            layout.block(block);
        }
        let pages = layout.finish();

        let created_at = self
            .created_at
            .unwrap_or_else(|| Utc::now().naive_utc());
        assemble_file(&document.title, &pages, created_at)
            .map_err(|err| RenderError::Encode(err.to_string()))
    }
}

/// Top-down cursor over a sequence of page content streams.
struct Layout {
    pages: Vec<String>,
    current: String,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.pages.push(self.current);
        self.pages
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn fits(&self, height: f32) -> bool {
        self.y - height >= MARGIN
    }

    fn ensure(&mut self, height: f32) {
        if !self.fits(height) {
            self.new_page();
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Title { text, subtitle } => {
                self.centered(text, Font::Bold, 18.0, 24.0);
                self.y -= 4.0;
                self.centered(subtitle, Font::Regular, 13.0, 18.0);
                self.y -= 2.0 * BLOCK_GAP;
            }
            Block::Heading { text } => {
                self.ensure(2.0 * BLOCK_GAP + 16.0);
                self.y -= BLOCK_GAP;
                self.line(MARGIN, text, Font::Bold, 12.0, 16.0, BLACK);
            }
            Block::Fields { columns, fields } => self.fields(*columns, fields),
            Block::Table(table) => self.table(table),
            Block::Paragraph { text } => {
                for line in text.lines() {
                    for wrapped in wrap(line, Font::Regular, BODY_SIZE, CONTENT_WIDTH) {
                        self.line(MARGIN, &wrapped, Font::Regular, BODY_SIZE, BODY_LEADING, BLACK);
                    }
                }
                self.y -= BLOCK_GAP;
            }
            Block::Footer { text } => {
                self.y -= BLOCK_GAP;
                self.centered(text, Font::Italic, BODY_SIZE, BODY_LEADING);
            }
        }
    }

    fn fields(&mut self, columns: usize, fields: &[Field]) {
        let columns = columns.max(1);
        let column_width = CONTENT_WIDTH / columns as f32;

        for chunk in fields.chunks(columns) {
            let wrapped: Vec<Vec<String>> = chunk
                .iter()
                .map(|field| {
                    let text = format!("{}: {}", field.label, field.value);
                    wrap(&text, Font::Regular, BODY_SIZE, column_width - CELL_PADDING)
                })
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);

            // Line by line, so a value taller than a page continues overleaf.
            for line_index in 0..lines {
                self.ensure(BODY_LEADING);
                let baseline = self.y - BODY_SIZE;
                for (index, field_lines) in wrapped.iter().enumerate() {
                    if let Some(text) = field_lines.get(line_index) {
                        let x = MARGIN + index as f32 * column_width;
                        self.text(x, baseline, Font::Regular, BODY_SIZE, BLACK, text);
                    }
                }
                self.y -= BODY_LEADING;
            }
        }
        self.y -= BLOCK_GAP;
    }

    fn table(&mut self, table: &Table) {
        let widths: Vec<f32> = table
            .columns
            .iter()
            .map(|column| column.width * CONTENT_WIDTH)
            .collect();
        let header: Vec<&str> = table
            .columns
            .iter()
            .map(|column| column.header.as_str())
            .collect();

        self.ensure(row_height(&measure_row(&widths, &header, Font::Bold)));
        self.row(&widths, &header, Font::Bold, BLACK);

        for row in &table.rows {
            let cells: Vec<&str> = row.cells.iter().map(String::as_str).collect();
            let height = row_height(&measure_row(&widths, &cells, Font::Regular));
            if !self.fits(height) {
                self.new_page();
                self.row(&widths, &header, Font::Bold, BLACK);
            }
            let colour = row.tone.map(|tone| tone.rgb()).unwrap_or(BLACK);
            self.row(&widths, &cells, Font::Regular, colour);
        }
        self.y -= BLOCK_GAP;
    }

    fn row(&mut self, widths: &[f32], cells: &[&str], font: Font, colour: (u8, u8, u8)) {
        let wrapped = measure_row(widths, cells, font);
        let height = row_height(&wrapped);
        let top = self.y;
        let mut x = MARGIN;

        for (cell_lines, width) in wrapped.iter().zip(widths) {
            self.rect(x, top - height, *width, height);
            for (index, text) in cell_lines.iter().enumerate() {
                let baseline = top - CELL_PADDING - CELL_SIZE - index as f32 * CELL_LEADING + 1.0;
                self.text(x + CELL_PADDING, baseline, font, CELL_SIZE, colour, text);
            }
            x += width;
        }
        self.y -= height;
    }

    fn centered(&mut self, text: &str, font: Font, size: f32, leading: f32) {
        for line in wrap(text, font, size, CONTENT_WIDTH) {
            let width = text_width(&line, font, size);
            let x = MARGIN + ((CONTENT_WIDTH - width) / 2.0).max(0.0);
            self.line(x, &line, font, size, leading, BLACK);
        }
    }

    fn line(&mut self, x: f32, text: &str, font: Font, size: f32, leading: f32, colour: (u8, u8, u8)) {
        self.ensure(leading);
        let baseline = self.y - size;
        self.text(x, baseline, font, size, colour, text);
        self.y -= leading;
    }

    fn text(&mut self, x: f32, y: f32, font: Font, size: f32, colour: (u8, u8, u8), text: &str) {
        if text.is_empty() {
            return;
        }
        let (r, g, b) = colour;
        // Writing into a String cannot fail.
        let _ = writeln!(
            self.current,
            "BT /{} {size:.1} Tf {:.3} {:.3} {:.3} rg {x:.2} {y:.2} Td ({}) Tj ET",
            font.resource(),
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            escape_text(text),
        );
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let _ = writeln!(
            self.current,
            "0 0 0 RG 0.5 w {x:.2} {y:.2} {width:.2} {height:.2} re S"
        );
    }
}

fn measure_row(widths: &[f32], cells: &[&str], font: Font) -> Vec<Vec<String>> {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| wrap(cell, font, CELL_SIZE, width - 2.0 * CELL_PADDING))
        .collect()
}

fn row_height(wrapped: &[Vec<String>]) -> f32 {
    let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
    lines as f32 * CELL_LEADING + 2.0 * CELL_PADDING
}

/// Greedy word wrap; words wider than the line are split by character.
/// Always returns at least one (possibly empty) line.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, font, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, font, size) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                let mut extended = current.clone();
                extended.push(ch);
                if !current.is_empty() && text_width(&extended, font, size) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = extended;
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(glyph_width).sum();
    let scale = if font == Font::Bold { 1.06 } else { 1.0 };
    units as f32 * size * scale / 1000.0
}

// Helvetica advance widths for printable ASCII, from the standard AFM.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

fn glyph_width(ch: char) -> u32 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
    } else {
        556
    }
}

/// Escapes a string for a PDF literal in WinAnsi encoding.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(escaped, "\\{:03o}", ch as u32);
            }
            '\t' => escaped.push(' '),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn assemble_file(
    title: &str,
    pages: &[String],
    created_at: NaiveDateTime,
) -> Result<Vec<u8>, std::fmt::Error> {
    const FIRST_PAGE_OBJECT: usize = 7;

    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids = (0..pages.len())
        .map(|index| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * index))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{kids}] /Count {} >>",
        pages.len()
    ));

    for font in Font::ALL {
        objects.push(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            font.base_font()
        ));
    }

    objects.push(format!(
        "<< /Title ({}) /Producer (soil-card) /CreationDate (D:{}Z) >>",
        escape_text(title),
        created_at.format("%Y%m%d%H%M%S")
    ));

    for (index, content) in pages.iter().enumerate() {
        let content_object = FIRST_PAGE_OBJECT + 2 * index + 1;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
/Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {content_object} 0 R >>"
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n{body}\nendobj\n", index + 1)?;
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
    for offset in offsets {
        write!(out, "{offset:010} 00000 n \n")?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    )?;

    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::soil_card::document::CardBranding;
    use crate::workflows::soil_card::domain::SoilRecord;
    use crate::workflows::soil_card::recommendation::RecommendationSet;
    use chrono::NaiveDate;

    fn fixed_renderer() -> PdfRenderer {
        let stamp = NaiveDate::from_ymd_opt(2025, 1, 15)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp");
        PdfRenderer::with_timestamp(stamp)
    }

    fn blank_card() -> ReportDocument {
        ReportDocument::assemble(
            &SoilRecord::default(),
            &[],
            &RecommendationSet::default(),
            &CardBranding::default(),
        )
    }

    #[test]
    fn output_is_a_well_formed_pdf_shell() {
        let bytes = fixed_renderer().encode(&blank_card()).expect("pdf encodes");
        let text = String::from_utf8(bytes).expect("ascii output");

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("(SOIL HEALTH CARD) Tj"));
        assert!(text.contains("/CreationDate (D:20250115093000Z)"));
        assert!(text.contains("Developer: Achu Semy \\(SCA, Tseminyu, Nagaland\\)"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = fixed_renderer().encode(&blank_card()).expect("pdf encodes");
        let text = String::from_utf8(bytes).expect("ascii output");

        let xref_start = text.find("xref\n").expect("xref table");
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|line| line.ends_with(" n "))
            .map(|line| line[..10].parse().expect("offset"))
            .collect();
        assert!(!entries.is_empty());
        for (index, offset) in entries.iter().enumerate() {
            assert!(text[*offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn same_input_encodes_identically_with_pinned_timestamp() {
        let renderer = fixed_renderer();
        let document = blank_card();
        assert_eq!(
            renderer.encode(&document).expect("first"),
            renderer.encode(&document).expect("second")
        );
    }

    #[test]
    fn long_remarks_flow_onto_extra_pages() {
        let mut record = SoilRecord::default();
        record.remarks = Some(vec!["Observation line"; 120].join("\n"));
        let document = ReportDocument::assemble(
            &record,
            &[],
            &RecommendationSet::default(),
            &CardBranding::default(),
        );

        let bytes = fixed_renderer().encode(&document).expect("pdf encodes");
        let text = String::from_utf8(bytes).expect("ascii output");
        assert!(text.contains("/Count 2") || text.contains("/Count 3"));
    }

    #[test]
    fn oversized_field_values_continue_on_next_page() {
        let mut record = SoilRecord::default();
        record.metadata.address = Some(
            (0..600)
                .map(|plot| format!("plot{plot}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
        let document = ReportDocument::assemble(
            &record,
            &[],
            &RecommendationSet::default(),
            &CardBranding::default(),
        );

        let bytes = fixed_renderer().encode(&document).expect("pdf encodes");
        let text = String::from_utf8(bytes).expect("ascii output");

        assert!(text.contains("plot0 "));
        assert!(text.contains("plot599"));
        assert!(!text.contains("/Count 1 "));
        for line in text.lines().filter(|line| line.ends_with("Tj ET")) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let td = tokens
                .iter()
                .position(|token| *token == "Td")
                .expect("positioned text");
            let y: f32 = tokens[td - 1].parse().expect("baseline");
            assert!(y >= MARGIN, "text below bottom margin: {line}");
        }
    }

    #[test]
    fn wrap_splits_on_words_and_keeps_one_line_minimum() {
        let lines = wrap("Zinc Sulphate @ 25 kg/ha", Font::Regular, CELL_SIZE, 60.0);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|line| text_width(line, Font::Regular, CELL_SIZE) <= 60.0));
        assert_eq!(wrap("", Font::Regular, CELL_SIZE, 60.0), vec![String::new()]);
    }

    #[test]
    fn escaping_handles_delimiters_and_non_latin_text() {
        assert_eq!(escape_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_text("café"), "caf\\351");
        assert_eq!(escape_text("तिल"), "???");
    }
}
