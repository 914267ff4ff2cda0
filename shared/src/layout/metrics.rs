//! Text measurement

/// Measures rendered text width in points
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

/// Advance widths of the standard Helvetica face, in 1/1000 em.
///
/// Indexed by `char as usize - 32` for printable ASCII.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

const FALLBACK_WIDTH: u16 = 556;

/// Metrics of the built-in Helvetica font used by the PDF encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn advance(c: char) -> u16 {
        let code = c as usize;
        if (32..127).contains(&code) {
            HELVETICA_WIDTHS[code - 32]
        } else {
            FALLBACK_WIDTH
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| Self::advance(c) as u32).sum();
        units as f32 * font_size / 1000.0
    }
}

/// Every character advances by the same fraction of the font size
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthMetrics {
    pub em_fraction: f32,
}

impl TextMeasure for FixedWidthMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * self.em_fraction * font_size
    }
}
