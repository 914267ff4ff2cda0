//! Draw instructions emitted by the table renderer
//!
//! Coordinates are in points from the top-left corner of the page, y growing
//! downwards. Encoders that use a bottom-up origin flip them.

use serde::Serialize;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const HEADER_FILL: Rgb = Rgb(0.82, 0.86, 0.92);
    pub const BAND_FILL: Rgb = Rgb(0.95, 0.95, 0.95);
    pub const BORDER: Rgb = Rgb(0.55, 0.55, 0.55);
    pub const MUTED_TEXT: Rgb = Rgb(0.35, 0.35, 0.35);
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawInstruction {
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    StrokeRect {
        rect: Rect,
        color: Rgb,
        line_width: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgb,
        line_width: f32,
    },
    /// `x` is the left edge of the text run, `baseline` its baseline
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font_size: f32,
        weight: FontWeight,
        color: Rgb,
    },
    Image {
        asset: String,
        rect: Rect,
    },
}

/// One page of draw instructions, in paint order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based
    pub number: u32,
    pub instructions: Vec<DrawInstruction>,
}

impl Page {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }

    /// All text runs on the page, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|i| match i {
            DrawInstruction::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
