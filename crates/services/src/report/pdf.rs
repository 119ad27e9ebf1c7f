//! `lopdf` implementation of the document collaborator.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use super::document::{Align, DocumentRenderer, DrawCommand, FontWeight, PageSize, TextStyle};
use crate::error::ReportError;

const MM_TO_PT: f32 = 72.0 / 25.4;
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Renders draw instructions into a PDF using the standard Helvetica faces.
#[derive(Debug, Clone, Copy)]
pub struct PdfDocumentRenderer {
    page: PageSize,
}

impl PdfDocumentRenderer {
    #[must_use]
    pub fn new(page: PageSize) -> Self {
        Self { page }
    }

    #[must_use]
    pub fn a4() -> Self {
        Self::new(PageSize::A4_PORTRAIT)
    }
}

impl Default for PdfDocumentRenderer {
    fn default() -> Self {
        Self::a4()
    }
}

impl DocumentRenderer for PdfDocumentRenderer {
    fn page_size(&self) -> PageSize {
        self.page
    }

    fn split_text(&self, text: &str, max_width: f32, style: TextStyle) -> Vec<String> {
        wrap_text(text, max_width, style)
    }

    fn render(&self, commands: &[DrawCommand]) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));

        let mut images = lopdf::Dictionary::new();
        let mut page_ops: Vec<Vec<Operation>> = vec![Vec::new()];
        for command in commands {
            match command {
                DrawCommand::PageBreak => page_ops.push(Vec::new()),
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    style,
                    align,
                } => {
                    let left = match align {
                        Align::Left => *x,
                        Align::Center => *x - text_width(text, *style) / 2.0,
                    };
                    let ops = current_page(&mut page_ops);
                    push_text(ops, self.page, left, *y, text, *style);
                }
                DrawCommand::Image {
                    x,
                    y,
                    width,
                    height,
                    image: raster,
                } => {
                    let decoded =
                        image::load_from_memory_with_format(raster.png(), image::ImageFormat::Png)?
                            .to_rgb8();
                    let (px_w, px_h) = decoded.dimensions();
                    let xobject = Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => i64::from(px_w),
                            "Height" => i64::from(px_h),
                            "ColorSpace" => "DeviceRGB",
                            "BitsPerComponent" => 8_i64,
                        },
                        decoded.into_raw(),
                    );
                    let name = format!("Im{}", images.len());
                    let image_id = doc.add_object(xobject);
                    images.set(name.as_bytes().to_vec(), image_id);
                    let ops = current_page(&mut page_ops);
                    push_image(ops, self.page, &name, *x, *y, *width, *height);
                }
            }
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
            "XObject" => images,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
        for operations in page_ops {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }
        let page_count = kids.len() as i64;
        let media_box: Vec<Object> = vec![
            0_i64.into(),
            0_i64.into(),
            to_pt(self.page.width).into(),
            to_pt(self.page.height).into(),
        ];

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        debug!(pages = page_count, bytes = bytes.len(), "rendered pdf");
        Ok(bytes)
    }
}

fn font_dictionary(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn current_page(pages: &mut Vec<Vec<Operation>>) -> &mut Vec<Operation> {
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    let last = pages.len() - 1;
    &mut pages[last]
}

fn push_text(ops: &mut Vec<Operation>, page: PageSize, x: f32, y: f32, text: &str, style: TextStyle) {
    let font = match style.weight {
        FontWeight::Regular => REGULAR_FONT,
        FontWeight::Bold => BOLD_FONT,
    };
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), to_pt_raw(style.size_pt).into()]));
    ops.push(Operation::new(
        "Td",
        vec![to_pt(x).into(), to_pt(page.height - y).into()],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn push_image(
    ops: &mut Vec<Operation>,
    page: PageSize,
    name: &str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            to_pt(width).into(),
            0_i64.into(),
            0_i64.into(),
            to_pt(height).into(),
            to_pt(x).into(),
            to_pt(page.height - y - height).into(),
        ],
    ));
    ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
    ops.push(Operation::new("Q", vec![]));
}

/// Millimetres to whole points.
fn to_pt(mm: f32) -> i64 {
    (mm * MM_TO_PT).round() as i64
}

fn to_pt_raw(pt: f32) -> i64 {
    pt.round() as i64
}

/// WinAnsi (CP1252) bytes for a standard-font string; unmapped characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(ch: char) -> u8 {
    match ch {
        '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => u32::from(ch) as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        // Control characters never reach the content stream.
        '\t' => b' ',
        _ => b'?',
    }
}

//
// ─── TEXT METRICS ──────────────────────────────────────────────────────────────
//

/// Approximate Helvetica advance width in 1/1000 em.
fn glyph_width(ch: char, weight: FontWeight) -> u32 {
    let base = match ch {
        ' ' | '.' | ',' | ':' | ';' | '!' | '\'' | '|' | 'i' | 'j' | 'l' | 'I' => 278,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' | '/' => 333,
        'm' | 'M' => 833,
        'w' | 'W' => 944,
        'A'..='Z' => 667,
        '0'..='9' | 'a'..='z' | '?' | '%' => 556,
        _ => 584,
    };
    match weight {
        FontWeight::Regular => base,
        FontWeight::Bold => base + base / 20,
    }
}

/// Width of `text` in millimetres.
#[must_use]
pub fn text_width(text: &str, style: TextStyle) -> f32 {
    let units: u32 = text.chars().map(|ch| glyph_width(ch, style.weight)).sum();
    units as f32 / 1000.0 * style.size_pt / MM_TO_PT
}

/// Greedy word wrap; words wider than a line are broken by character.
#[must_use]
pub fn wrap_text(text: &str, max_width: f32, style: TextStyle) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, style) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for ch in word.chars() {
            line.push(ch);
            if text_width(&line, style) > max_width && line.chars().count() > 1 {
                line.pop();
                lines.push(std::mem::replace(&mut line, ch.to_string()));
            }
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
