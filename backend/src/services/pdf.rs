//! PDF encoding of laid-out reports
//!
//! Draw instructions use top-down coordinates; PDF user space grows upwards,
//! so every y is flipped against the page height here.

use chrono::NaiveDate;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use shared::layout::{DrawInstruction, FontWeight, Page, ReportDocument, Rgb};

use super::assets::ImageAsset;

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");
const IMAGE_NAME: Name<'static> = Name(b"Im1");

const COMPRESSION_LEVEL: u8 = 6;

/// Sequential object id allocator
struct Refs(i32);

impl Refs {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

/// Encode a finished layout as PDF bytes.
///
/// `image` is embedded when the layout refers to it by name; image
/// instructions naming anything else are skipped.
pub fn encode_pdf(document: &ReportDocument, image: Option<&ImageAsset>) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut refs = Refs(0);

    let catalog_id = refs.next();
    let pages_id = refs.next();
    let regular_id = refs.next();
    let bold_id = refs.next();

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let image_id = image.map(|asset| {
        let id = refs.next();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&asset.rgb, COMPRESSION_LEVEL);
        let mut xobject = pdf.image_xobject(id, &compressed);
        xobject.filter(Filter::FlateDecode);
        xobject.width(asset.width as i32);
        xobject.height(asset.height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        id
    });

    let mut page_ids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let page_id = refs.next();
        let content_id = refs.next();
        page_ids.push(page_id);

        let raw = encode_page(page, document.page_height, image);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, COMPRESSION_LEVEL);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(Rect::new(0.0, 0.0, document.page_width, document.page_height))
            .parent(pages_id)
            .contents(content_id);

        let mut resources = pdf_page.resources();
        resources
            .fonts()
            .pair(REGULAR_FONT, regular_id)
            .pair(BOLD_FONT, bold_id);
        if let Some(id) = image_id {
            resources.x_objects().pair(IMAGE_NAME, id);
        }
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    tracing::debug!(pages = page_ids.len(), "Encoded report PDF");
    pdf.finish()
}

fn encode_page(page: &Page, page_height: f32, image: Option<&ImageAsset>) -> Vec<u8> {
    let mut content = Content::new();
    let flip = |y: f32| page_height - y;

    for instruction in &page.instructions {
        match instruction {
            DrawInstruction::FillRect { rect, color } => {
                content.save_state();
                set_fill(&mut content, *color);
                content.rect(rect.x, flip(rect.bottom()), rect.width, rect.height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawInstruction::StrokeRect {
                rect,
                color,
                line_width,
            } => {
                content.save_state();
                set_stroke(&mut content, *color);
                content.set_line_width(*line_width);
                content.rect(rect.x, flip(rect.bottom()), rect.width, rect.height);
                content.stroke();
                content.restore_state();
            }
            DrawInstruction::Line {
                from,
                to,
                color,
                line_width,
            } => {
                content.save_state();
                set_stroke(&mut content, *color);
                content.set_line_width(*line_width);
                content.move_to(from.0, flip(from.1));
                content.line_to(to.0, flip(to.1));
                content.stroke();
                content.restore_state();
            }
            DrawInstruction::Text {
                x,
                baseline,
                text,
                font_size,
                weight,
                color,
            } => {
                let font = match weight {
                    FontWeight::Regular => REGULAR_FONT,
                    FontWeight::Bold => BOLD_FONT,
                };
                let encoded = encode_win_ansi(text);
                content.save_state();
                set_fill(&mut content, *color);
                content
                    .begin_text()
                    .set_font(font, *font_size)
                    .next_line(*x, flip(*baseline))
                    .show(Str(&encoded))
                    .end_text();
                content.restore_state();
            }
            DrawInstruction::Image { asset, rect } => match image {
                Some(img) if img.name == *asset => {
                    content.save_state();
                    content.transform([rect.width, 0.0, 0.0, rect.height, rect.x, flip(rect.bottom())]);
                    content.x_object(IMAGE_NAME);
                    content.restore_state();
                }
                _ => tracing::debug!(asset = %asset, "Skipping unresolved image"),
            },
        }
    }

    content.finish()
}

fn set_fill(content: &mut Content, color: Rgb) {
    content.set_fill_rgb(color.0, color.1, color.2);
}

fn set_stroke(content: &mut Content, color: Rgb) {
    content.set_stroke_rgb(color.0, color.1, color.2);
}

/// Encode text for the standard 14 fonts' WinAnsi encoding.
///
/// Latin-1 maps directly; the handful of Windows-1252 extras are translated;
/// anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}

/// Suggested download name, `stock-ledger-<scope>-<YYYYMMDD>.<ext>`
pub fn report_filename(scope: Option<&str>, date: NaiveDate, extension: &str) -> String {
    let scope: String = scope
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("all")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("stock-ledger-{}-{}.{}", scope, date.format("%Y%m%d"), extension)
}
