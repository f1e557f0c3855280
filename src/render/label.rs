//! Human-readable text around the bars, drawn with Spleen bitmap fonts

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use spleen_font::{PSF2Font, FONT_12X24, FONT_6X12};

use super::{Alignment, LabelLayout, TextRun};
use crate::error::RenderError;
use crate::pattern::WidthSequence;
use crate::symbology::Symbology;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelFont {
    /// 6x12
    #[default]
    Small,
    /// 12x24
    Large,
}

impl LabelFont {
    pub fn char_width(self) -> u32 {
        match self {
            LabelFont::Small => 6,
            LabelFont::Large => 12,
        }
    }

    pub fn char_height(self) -> u32 {
        match self {
            LabelFont::Small => 12,
            LabelFont::Large => 24,
        }
    }

    fn font_data(self) -> &'static [u8] {
        match self {
            LabelFont::Small => FONT_6X12,
            LabelFont::Large => FONT_12X24,
        }
    }

    pub fn text_width(self, text: &str) -> u32 {
        text.chars().count() as u32 * self.char_width()
    }
}

/// Text run centred under the symbol units `start_unit..end_unit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroup {
    pub text: String,
    pub start_unit: u32,
    pub end_unit: u32,
}

impl LabelGroup {
    fn new(text: &str, start_unit: u32, end_unit: u32) -> Self {
        Self { text: text.to_string(), start_unit, end_unit }
    }
}

/// Human-readable interpretation printed with the symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HumanReadable {
    /// One line, placed by `LabelPosition`.
    Line(String),
    /// Digit groups pinned to unit spans, as retail symbols print them.
    Groups(Vec<LabelGroup>),
}

impl HumanReadable {
    /// Digit groups for EAN-13 and UPC-A shaped symbols, one line otherwise.
    pub fn for_symbol(symbology: Symbology, text: &str, sequence: &WidthSequence) -> Self {
        let line = || HumanReadable::Line(text.to_string());
        if !text.bytes().all(|b| b.is_ascii_digit()) || sequence.symbol_units() != 95 {
            return line();
        }
        let q = sequence.quiet_zone_units();
        match symbology {
            Symbology::Ean13 | Symbology::Jan13 | Symbology::Isbn if text.len() == 13 => HumanReadable::Groups(vec![
                LabelGroup::new(&text[..1], 0, q),
                LabelGroup::new(&text[1..7], q + 3, q + 45),
                LabelGroup::new(&text[7..], q + 50, q + 92),
            ]),
            // number system and check digit sit in the quiet zones
            Symbology::UpcA if text.len() == 12 => HumanReadable::Groups(vec![
                LabelGroup::new(&text[..1], 0, q),
                LabelGroup::new(&text[1..6], q + 10, q + 45),
                LabelGroup::new(&text[6..11], q + 50, q + 85),
                LabelGroup::new(&text[11..], q + 95, q + 95 + q),
            ]),
            _ => line(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            HumanReadable::Line(line) => line.is_empty(),
            HumanReadable::Groups(groups) => groups.iter().all(|g| g.text.is_empty()),
        }
    }
}

impl From<&str> for HumanReadable {
    fn from(text: &str) -> Self {
        HumanReadable::Line(text.to_string())
    }
}

fn clipped_warning(text: &str, needed: u32, available: u32) {
    log::warn!("label {:?} needs {} px but only {} px are available, clipping", text, needed, available);
}

/// x for a run `width` wide aligned on `span`, kept inside the canvas when it fits.
fn aligned_x(alignment: Alignment, (span_x, span_width): (u32, u32), width: u32, canvas_width: u32) -> u32 {
    let x = match alignment {
        Alignment::Left => span_x,
        Alignment::Center => (span_x + span_width / 2).saturating_sub(width / 2),
        Alignment::Right => (span_x + span_width).saturating_sub(width),
    };
    x.min(canvas_width.saturating_sub(width))
}

/// Place one line over `span` (x, width) of a canvas `canvas_width` wide,
/// stepping down to the small font when it does not fit.
pub(crate) fn place_line(
    text: &str,
    preferred: LabelFont,
    alignment: Alignment,
    span: (u32, u32),
    canvas_width: u32,
) -> LabelLayout {
    let font = if preferred.text_width(text) > canvas_width {
        LabelFont::Small
    } else {
        preferred
    };
    let width = font.text_width(text);
    let clipped = width > canvas_width;
    if clipped {
        clipped_warning(text, width, canvas_width);
    }

    LabelLayout {
        runs: vec![TextRun { text: text.to_string(), x: aligned_x(alignment, span, width, canvas_width) }],
        font,
        y: 0,
        clipped,
    }
}

/// Centre each `(text, x0, x1)` run between its pixel edges.
pub(crate) fn place_groups(spans: &[(&str, u32, u32)], preferred: LabelFont, canvas_width: u32) -> LabelLayout {
    let fits = |font: LabelFont| spans.iter().all(|(text, x0, x1)| font.text_width(text) <= x1.saturating_sub(*x0));
    let font = if fits(preferred) { preferred } else { LabelFont::Small };

    let mut clipped = false;
    let runs = spans
        .iter()
        .map(|&(text, x0, x1)| {
            let width = font.text_width(text);
            let span_width = x1.saturating_sub(x0);
            if width > span_width {
                clipped_warning(text, width, span_width);
                clipped = true;
            }
            TextRun { text: text.to_string(), x: aligned_x(Alignment::Center, (x0, span_width), width, canvas_width) }
        })
        .collect();

    LabelLayout { runs, font, y: 0, clipped }
}

pub(crate) fn draw(canvas: &mut RgbaImage, label: &LabelLayout, color: Rgba<u8>) -> Result<(), RenderError> {
    let mut font = PSF2Font::new(label.font.font_data())
        .map_err(|_| RenderError::Font(format!("cannot load {:?} label font", label.font)))?;
    let (width, height) = canvas.dimensions();

    for run in &label.runs {
        let mut cursor_x = run.x;
        for ch in run.text.chars() {
            if cursor_x >= width {
                break;
            }
            let utf8 = ch.to_string();
            if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        let x = cursor_x + col_x as u32;
                        let y = label.y + row_y as u32;
                        if on && x < width && y < height {
                            canvas.put_pixel(x, y, color);
                        }
                    }
                }
            }
            cursor_x += label.font.char_width();
        }
    }
    Ok(())
}
