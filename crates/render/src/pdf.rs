//! Block-to-PDF writer built on `lopdf`.
//!
//! Text uses the standard Type1 Helvetica faces with WinAnsi encoding, so no
//! font program is embedded. Line widths come from the faces' published
//! metrics, which is what a viewer uses to place the glyphs.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use gstinvoice_core::{InvoiceError, InvoiceResult};

use crate::layout::{Block, TABLE_COLUMN_WEIGHTS};
use crate::options::RenderOptions;
use crate::signature::{SignatureEncoding, SignatureImage};

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";
const SIGNATURE_XOBJECT: &[u8] = b"Sig";

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 8.0;
const LINE_SPACING: f32 = 1.2;
const CELL_PADDING: f32 = 3.0;

/// Helvetica advance widths for codes 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for codes 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Codes above 0x7E are measured as `n`.
const REGULAR_FALLBACK_WIDTH: u16 = 556;
const BOLD_FALLBACK_WIDTH: u16 = 611;

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn name(value: &[u8]) -> Object {
    Object::Name(value.to_vec())
}

/// Encode text for a WinAnsi font. Characters the encoding lacks become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => c as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => b'?',
    }
}

fn glyph_width(code: u8, bold: bool) -> u16 {
    let (widths, fallback) = if bold {
        (&HELVETICA_BOLD_WIDTHS, BOLD_FALLBACK_WIDTH)
    } else {
        (&HELVETICA_WIDTHS, REGULAR_FALLBACK_WIDTH)
    };
    match code {
        0x20..=0x7E => widths[usize::from(code - 0x20)],
        _ => fallback,
    }
}

/// Advance width of `text` in points, as the viewer will lay it out.
fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = win_ansi(text)
        .into_iter()
        .map(|code| u32::from(glyph_width(code, bold)))
        .sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap. The first line may be narrower than the rest; a single
/// word wider than a line is hard-broken.
pub fn wrap_text(text: &str, size: f32, bold: bool, first_width: f32, rest_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let limit = if lines.is_empty() { first_width } else { rest_width };
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, size, bold) <= limit {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        let limit = if lines.is_empty() { first_width } else { rest_width };
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if text_width(&piece, size, bold) > limit && piece.chars().count() > 1 {
                piece.pop();
                lines.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        current = piece;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays blocks out top to bottom, starting a new page when one is full.
pub struct PdfWriter<'a> {
    options: &'a RenderOptions,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    cursor: f32,
}

impl<'a> PdfWriter<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: options.page_size.height() - options.margin,
        }
    }

    /// Draw every block and serialize the finished document.
    pub fn render(mut self, blocks: &[Block], signature: &SignatureImage) -> InvoiceResult<Vec<u8>> {
        for block in blocks {
            self.draw(block);
        }
        self.finish(signature)
    }

    fn left(&self) -> f32 {
        self.options.margin
    }

    fn bottom(&self) -> f32 {
        self.options.margin
    }

    fn width(&self) -> f32 {
        self.options.content_width()
    }

    fn ensure_room(&mut self, height: f32) {
        let top = self.options.page_size.height() - self.options.margin;
        // A block taller than a whole page is drawn anyway rather than looping.
        if self.cursor - height < self.bottom() && self.cursor < top {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.ops));
        self.cursor = self.options.page_size.height() - self.options.margin;
    }

    fn draw(&mut self, block: &Block) {
        match block {
            Block::Title(text) => self.paragraph(text, TITLE_SIZE, true),
            Block::Text(text) => self.paragraph(text, BODY_SIZE, false),
            Block::Bold(text) => self.paragraph(text, BODY_SIZE, true),
            Block::Field { label, value } => self.field(label, value),
            Block::Spacer(height) => {
                self.cursor -= height;
            }
            Block::Table { headers, rows } => self.table(headers, rows),
            Block::Signature { width, height } => self.signature(*width, *height),
        }
    }

    fn show_text(&mut self, x: f32, baseline: f32, runs: &[(&[u8], f32, &str)]) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Td", vec![real(x), real(baseline)]));
        for (font, size, text) in runs {
            self.ops.push(Operation::new("Tf", vec![name(font), real(*size)]));
            self.ops.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ));
        }
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool) {
        let font = if bold { BOLD_FONT } else { REGULAR_FONT };
        let line_height = size * LINE_SPACING;
        let width = self.width();
        for line in wrap_text(text, size, bold, width, width) {
            self.ensure_room(line_height);
            self.cursor -= line_height;
            let (x, baseline) = (self.left(), self.cursor);
            self.show_text(x, baseline, &[(font, size, line.as_str())]);
        }
    }

    fn field(&mut self, label: &str, value: &str) {
        let line_height = BODY_SIZE * LINE_SPACING;
        let width = self.width();
        let first_width = width - text_width(label, BODY_SIZE, true) - text_width(" ", BODY_SIZE, false);
        let lines = wrap_text(value, BODY_SIZE, false, first_width, width);

        for (index, line) in lines.iter().enumerate() {
            self.ensure_room(line_height);
            self.cursor -= line_height;
            let (x, baseline) = (self.left(), self.cursor);
            if index == 0 {
                let value = format!(" {line}");
                self.show_text(
                    x,
                    baseline,
                    &[(BOLD_FONT, BODY_SIZE, label), (REGULAR_FONT, BODY_SIZE, value.as_str())],
                );
            } else {
                self.show_text(x, baseline, &[(REGULAR_FONT, BODY_SIZE, line.as_str())]);
            }
        }
    }

    fn column_widths(&self) -> Vec<f32> {
        let total: f32 = TABLE_COLUMN_WEIGHTS.iter().sum();
        let scale = self.width() / total;
        TABLE_COLUMN_WEIGHTS.iter().map(|w| w * scale).collect()
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) {
        let widths = self.column_widths();
        self.table_row(headers, &widths, true);
        for row in rows {
            let height = Self::row_height(row, &widths, false);
            if self.cursor - height < self.bottom() {
                self.new_page();
                self.table_row(headers, &widths, true);
            }
            self.table_row(row, &widths, false);
        }
    }

    fn wrap_cells(cells: &[String], widths: &[f32], bold: bool) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let inner = width - 2.0 * CELL_PADDING;
                wrap_text(cell, TABLE_SIZE, bold, inner, inner)
            })
            .collect()
    }

    fn row_height(cells: &[String], widths: &[f32], bold: bool) -> f32 {
        let lines = Self::wrap_cells(cells, widths, bold)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(1);
        lines as f32 * TABLE_SIZE * LINE_SPACING + 2.0 * CELL_PADDING
    }

    fn table_row(&mut self, cells: &[String], widths: &[f32], bold: bool) {
        let height = Self::row_height(cells, widths, bold);
        self.ensure_room(height);
        let top = self.cursor;
        let font = if bold { BOLD_FONT } else { REGULAR_FONT };
        let line_height = TABLE_SIZE * LINE_SPACING;

        let mut x = self.left();
        for (lines, width) in Self::wrap_cells(cells, widths, bold).iter().zip(widths) {
            self.ops.push(Operation::new(
                "re",
                vec![real(x), real(top - height), real(*width), real(height)],
            ));
            self.ops.push(Operation::new("S", vec![]));

            let mut baseline = top - CELL_PADDING;
            for line in lines {
                baseline -= line_height;
                self.show_text(x + CELL_PADDING, baseline, &[(font, TABLE_SIZE, line.as_str())]);
            }
            x += width;
        }
        self.cursor = top - height;
    }

    fn signature(&mut self, width: f32, height: f32) {
        self.ensure_room(height);
        self.cursor -= height;
        let (x, y) = (self.left(), self.cursor);
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        ));
        self.ops.push(Operation::new("Do", vec![name(SIGNATURE_XOBJECT)]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn finish(mut self, signature: &SignatureImage) -> InvoiceResult<Vec<u8>> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.ops));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let resources_id = add_resources(&mut doc, signature)?;

        let (width, height) = (self.options.page_size.width(), self.options.page_size.height());
        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }
                .encode()
                .map_err(|e| InvoiceError::render(format!("cannot encode page content: {e}")))?;
            let content_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), content)));

            let mut page = Dictionary::new();
            page.set("Type", name(b"Page"));
            page.set("Parent", Object::Reference(pages_id));
            page.set(
                "MediaBox",
                Object::Array(vec![real(0.0), real(0.0), real(width), real(height)]),
            );
            page.set("Resources", Object::Reference(resources_id));
            page.set("Contents", Object::Reference(content_id));
            kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
        }

        let page_count = kids.len();
        let mut pages = Dictionary::new();
        pages.set("Type", name(b"Pages"));
        pages.set("Count", Object::Integer(page_count as i64));
        pages.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", name(b"Catalog"));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| InvoiceError::render(format!("cannot serialize PDF: {e}")))?;

        debug!(pages = page_count, bytes = bytes.len(), "pdf serialized");
        Ok(bytes)
    }
}

fn font(base: &[u8]) -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", name(b"Font"));
    font.set("Subtype", name(b"Type1"));
    font.set("BaseFont", name(base));
    font.set("Encoding", name(b"WinAnsiEncoding"));
    font
}

fn image_dictionary(signature: &SignatureImage, color_space: &[u8]) -> Dictionary {
    let mut image = Dictionary::new();
    image.set("Type", name(b"XObject"));
    image.set("Subtype", name(b"Image"));
    image.set("Width", Object::Integer(i64::from(signature.width())));
    image.set("Height", Object::Integer(i64::from(signature.height())));
    image.set("ColorSpace", name(color_space));
    image.set("BitsPerComponent", Object::Integer(8));
    image
}

fn flate_stream(dict: Dictionary, samples: Vec<u8>) -> InvoiceResult<Object> {
    let mut stream = Stream::new(dict, samples);
    stream
        .compress()
        .map_err(|e| InvoiceError::render(format!("cannot compress signature samples: {e}")))?;
    Ok(Object::Stream(stream))
}

/// Signature XObject. Raster samples are Flate-compressed, with alpha as a
/// DeviceGray soft mask.
fn add_signature(doc: &mut Document, signature: &SignatureImage) -> InvoiceResult<ObjectId> {
    let object = match signature.encoding() {
        SignatureEncoding::Jpeg { data, color_space } => {
            let mut image = image_dictionary(signature, color_space.pdf_name());
            image.set("Filter", name(b"DCTDecode"));
            Object::Stream(Stream::new(image, data.clone()))
        }
        SignatureEncoding::Raster { rgb, alpha } => {
            let mut image = image_dictionary(signature, b"DeviceRGB");
            if let Some(alpha) = alpha {
                let mask = flate_stream(image_dictionary(signature, b"DeviceGray"), alpha.clone())?;
                image.set("SMask", Object::Reference(doc.add_object(mask)));
            }
            flate_stream(image, rgb.clone())?
        }
    };
    Ok(doc.add_object(object))
}

fn add_resources(doc: &mut Document, signature: &SignatureImage) -> InvoiceResult<ObjectId> {
    let regular_id = doc.add_object(Object::Dictionary(font(b"Helvetica")));
    let bold_id = doc.add_object(Object::Dictionary(font(b"Helvetica-Bold")));
    let image_id = add_signature(doc, signature)?;

    let mut fonts = Dictionary::new();
    fonts.set(REGULAR_FONT, Object::Reference(regular_id));
    fonts.set(BOLD_FONT, Object::Reference(bold_id));

    let mut xobjects = Dictionary::new();
    xobjects.set(SIGNATURE_XOBJECT, Object::Reference(image_id));

    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources.set("XObject", Object::Dictionary(xobjects));
    Ok(doc.add_object(Object::Dictionary(resources)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_replaces_characters_outside_latin1() {
        assert_eq!(win_ansi("Café"), b"Caf\xE9".to_vec());
        assert_eq!(win_ansi("₹ 10"), b"? 10".to_vec());
    }

    #[test]
    fn win_ansi_keeps_typographic_punctuation() {
        assert_eq!(win_ansi("Men’s"), b"Men\x92s".to_vec());
        assert_eq!(win_ansi("“Silk” – €5…"), b"\x93Silk\x94 \x96 \x805\x85".to_vec());
        assert_eq!(win_ansi("Šeš™"), b"\x8Ae\x9A\x99".to_vec());
    }

    #[test]
    fn widths_follow_glyph_metrics() {
        let close = |a: f32, b: f32| (a - b).abs() < 1e-3;
        assert!(close(text_width("Hello", 10.0, false), 22.78));
        assert!(close(text_width("Hello", 10.0, true), 24.45));
        assert!(text_width("WWWW", 10.0, false) > 3.0 * text_width("iiii", 10.0, false));
        assert!(close(text_width("€", 10.0, false), 5.56));
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text("Sold By:", 10.0, true, 540.0, 540.0), vec!["Sold By:"]);
    }

    #[test]
    fn wrap_breaks_long_descriptions_within_width() {
        let text = "SH-05-42 Varasiddhi Silks Women's Cotton Silk Saree With Blouse Piece";
        let lines = wrap_text(text, 8.0, false, 144.0, 144.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, 8.0, false) <= 144.0));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_hard_breaks_an_oversized_word() {
        let lines = wrap_text("ABCDEFGHIJ", 10.0, false, 20.0, 20.0);
        assert_eq!(lines, vec!["AB", "CD", "EF", "GHI", "J"]);
        assert!(lines.iter().all(|l| text_width(l, 10.0, false) <= 20.0));
    }

    #[test]
    fn uppercase_descriptions_wrap_within_the_cell() {
        let text = "WWW MMM WWW MMM WWW MMM";
        let lines = wrap_text(text, 8.0, false, 60.0, 60.0);
        assert!(lines.iter().all(|l| text_width(l, 8.0, false) <= 60.0), "{lines:?}");
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn empty_text_yields_one_empty_line() {
        assert_eq!(wrap_text("", 10.0, false, 100.0, 100.0), vec![String::new()]);
    }

    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, ..ProptestConfig::default() })]

        #[test]
        fn wrapped_lines_fit_and_keep_every_word(
            words in proptest::collection::vec("[A-Za-z0-9]{1,12}", 0..40),
            width in 100.0f32..540.0,
        ) {
            let text = words.join(" ");
            let lines = wrap_text(&text, 8.0, false, width, width);

            prop_assert!(lines.iter().all(|l| text_width(l, 8.0, false) <= width));
            prop_assert_eq!(lines.join(" ").trim().to_string(), text);
        }
    }
}
