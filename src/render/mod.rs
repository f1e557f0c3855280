//! Barcode Renderer - WidthSequence to pixels
//!
//! Every edge is placed from its cumulative unit offset, so rounding in
//! fit-to-width mode never drifts along the symbol.

mod label;
mod svg;

pub use label::{HumanReadable, LabelFont, LabelGroup};
pub use svg::{render_svg, render_svg_labelled};

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use image::{imageops, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::pattern::{BarHeight, WidthSequence};

/// Largest edge, in pixels, of any rendered image.
pub const MAX_DIMENSION: u64 = 16_384;

const LABEL_GAP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scale {
    /// Pixels per unit.
    BarWidth(u32),
    /// Total image width in pixels, quiet zones included.
    FitWidth(u32),
}

impl Default for Scale {
    fn default() -> Self {
        Scale::BarWidth(2)
    }
}

/// Clockwise rotation of the finished image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = RenderError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Quarter),
            180 => Ok(Rotation::Half),
            270 => Ok(Rotation::ThreeQuarter),
            other => Err(RenderError::UnsupportedRotation(other)),
        }
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }

    /// `#rrggbb`, with the alpha pair only when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Where the human-readable line sits relative to the bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelPosition {
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl LabelPosition {
    pub fn is_top(self) -> bool {
        matches!(self, LabelPosition::TopLeft | LabelPosition::TopCenter | LabelPosition::TopRight)
    }

    pub fn alignment(self) -> Alignment {
        match self {
            LabelPosition::TopLeft | LabelPosition::BottomLeft => Alignment::Left,
            LabelPosition::TopCenter | LabelPosition::BottomCenter => Alignment::Center,
            LabelPosition::TopRight | LabelPosition::BottomRight => Alignment::Right,
        }
    }
}

/// Horizontal placement of the symbol inside a wider image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    /// Offset that leaves `slack` spare pixels distributed per alignment.
    fn offset(self, slack: u32) -> u32 {
        match self {
            Alignment::Left => 0,
            Alignment::Center => slack / 2,
            Alignment::Right => slack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    #[serde(default)]
    pub scale: Scale,
    #[serde(default = "default_height")]
    pub height_px: u32,
    /// Image width in pixels; the symbol is placed by `alignment` when wider.
    #[serde(default)]
    pub image_width: Option<u32>,
    #[serde(default)]
    pub alignment: Alignment,
    /// Width over height. Replaces `height_px` with `floor(image width / ratio)`.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_true")]
    pub include_label: bool,
    /// Alternate label text; replaces the encoded text when set.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_font: LabelFont,
    #[serde(default)]
    pub label_position: LabelPosition,
    /// Split EAN-13 and UPC-A text into digit groups under each half.
    #[serde(default = "default_true")]
    pub standard_label: bool,
    #[serde(default = "default_foreground")]
    pub foreground: Color,
    #[serde(default = "default_background")]
    pub background: Color,
    /// `None` lets the symbology decide (ITF-14 draws them).
    #[serde(default)]
    pub bearer_bars: Option<bool>,
}

fn default_height() -> u32 { 50 }
fn default_true() -> bool { true }
fn default_foreground() -> Color { Color::BLACK }
fn default_background() -> Color { Color::WHITE }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            height_px: default_height(),
            image_width: None,
            alignment: Alignment::default(),
            aspect_ratio: None,
            rotation: Rotation::None,
            include_label: true,
            label: None,
            label_font: LabelFont::default(),
            label_position: LabelPosition::default(),
            standard_label: true,
            foreground: Color::BLACK,
            background: Color::WHITE,
            bearer_bars: None,
        }
    }
}

impl RenderOptions {
    pub fn without_label(mut self) -> Self {
        self.include_label = false;
        self
    }
}

/// A finished raster; rows top to bottom, RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    image: RgbaImage,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut bytes = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Rectangle in unrotated canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One run of label text at its resolved x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextRun {
    pub text: String,
    pub x: u32,
}

/// Label placement resolved against the canvas width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LabelLayout {
    pub runs: Vec<TextRun>,
    pub font: LabelFont,
    pub y: u32,
    pub clipped: bool,
}

/// Unrotated geometry shared by raster and vector output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<Rect>,
    pub label: Option<LabelLayout>,
}

/// Pixel offset of cumulative unit `unit`.
fn unit_to_px(scale: Scale, unit: u32, total: u32) -> u64 {
    let unit = u64::from(unit);
    match scale {
        Scale::BarWidth(px) => unit * u64::from(px),
        Scale::FitWidth(width) => {
            let total = u64::from(total.max(1));
            (unit * u64::from(width) * 2 + total) / (2 * total)
        }
    }
}

fn bar_height(image_width: u32, options: &RenderOptions) -> Result<u64, RenderError> {
    match options.aspect_ratio {
        None => Ok(u64::from(options.height_px)),
        Some(ratio) if ratio.is_finite() && ratio > 0.0 => {
            let height = (f64::from(image_width) / ratio).floor();
            Ok(if height >= MAX_DIMENSION as f64 { MAX_DIMENSION + 1 } else { height as u64 })
        }
        Some(ratio) => Err(RenderError::InvalidAspectRatio(ratio.to_string())),
    }
}

pub(crate) fn layout(
    sequence: &WidthSequence,
    text: Option<&HumanReadable>,
    options: &RenderOptions,
) -> Result<Layout, RenderError> {
    let total = sequence.total_units();
    let symbol_width = unit_to_px(options.scale, total, total);
    let invalid = |width: u64, height: u64| RenderError::InvalidDimensions { width, height };
    let image_width = match options.image_width {
        Some(w) => u64::from(w),
        None => symbol_width,
    };
    let bars_height = bar_height(image_width.min(MAX_DIMENSION) as u32, options)?;

    if symbol_width == 0 || bars_height == 0 || image_width > MAX_DIMENSION || bars_height > MAX_DIMENSION {
        return Err(invalid(image_width, bars_height));
    }
    // every unit needs at least one pixel, every half bar at least one row
    if u64::from(total) > symbol_width || symbol_width > image_width {
        return Err(invalid(image_width, bars_height));
    }
    if sequence.has_half_height_bars() && bars_height < 2 {
        return Err(invalid(image_width, bars_height));
    }
    let width = image_width as u32;
    let symbol_width = symbol_width as u32;
    let bars_height = bars_height as u32;
    let offset = options.alignment.offset(width - symbol_width);
    let unit_x = |unit: u32| offset + unit_to_px(options.scale, unit, total) as u32;

    let bearer = if options.bearer_bars.unwrap_or(false) {
        (unit_to_px(options.scale, 2, total) as u32).max(1)
    } else {
        0
    };

    let readable = match (options.include_label, &options.label, text) {
        (false, _, _) => None,
        (true, Some(alternate), _) => Some(HumanReadable::Line(alternate.clone())),
        (true, None, Some(t)) => Some(t.clone()),
        (true, None, None) => None,
    };
    let mut placed = readable.filter(|r| !r.is_empty()).map(|r| match r {
        HumanReadable::Line(line) => label::place_line(
            &line,
            options.label_font,
            options.label_position.alignment(),
            (offset, symbol_width),
            width,
        ),
        HumanReadable::Groups(groups) => {
            let spans: Vec<(&str, u32, u32)> = groups
                .iter()
                .map(|g| (g.text.as_str(), unit_x(g.start_unit), unit_x(g.end_unit)))
                .collect();
            label::place_groups(&spans, options.label_font, width)
        }
    });
    let label_height = placed.as_ref().map_or(0, |l| l.font.char_height() + LABEL_GAP);

    let symbol_top = if options.label_position.is_top() { label_height } else { 0 };
    let bars_top = symbol_top + bearer;
    let bars_bottom = bars_top + bars_height;
    let symbol_bottom = bars_bottom + bearer;
    if let Some(l) = placed.as_mut() {
        l.y = if options.label_position.is_top() { 0 } else { symbol_bottom + LABEL_GAP };
    }

    let below = if options.label_position.is_top() { 0 } else { label_height };
    let height = u64::from(symbol_bottom) + u64::from(below);
    if height > MAX_DIMENSION {
        return Err(invalid(u64::from(width), height));
    }

    let mut rects = Vec::new();
    for (start, module) in sequence.positioned() {
        if !module.is_bar() {
            continue;
        }
        let x0 = unit_x(start);
        let x1 = unit_x(start + module.width);
        let (y, h) = match module.height {
            BarHeight::Full => (bars_top, bars_height),
            BarHeight::Half => {
                let half = bars_height / 2;
                (bars_bottom - half, half)
            }
        };
        rects.push(Rect { x: x0, y, width: x1 - x0, height: h });
    }

    if bearer > 0 {
        let side = bearer.min(symbol_width);
        let frame_height = symbol_bottom - symbol_top;
        rects.push(Rect { x: offset, y: symbol_top, width: symbol_width, height: bearer });
        rects.push(Rect { x: offset, y: bars_bottom, width: symbol_width, height: bearer });
        rects.push(Rect { x: offset, y: symbol_top, width: side, height: frame_height });
        rects.push(Rect { x: offset + symbol_width - side, y: symbol_top, width: side, height: frame_height });
    }

    Ok(Layout { width, height: height as u32, rects, label: placed })
}

/// Render without a human-readable text; only an alternate label is drawn.
pub fn render(sequence: &WidthSequence, options: &RenderOptions) -> Result<RenderedImage, RenderError> {
    render_labelled(sequence, None, options)
}

/// Render with `text` as the human-readable label.
pub fn render_labelled(
    sequence: &WidthSequence,
    text: Option<&HumanReadable>,
    options: &RenderOptions,
) -> Result<RenderedImage, RenderError> {
    let layout = layout(sequence, text, options)?;
    let foreground = options.foreground.to_rgba();
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, options.background.to_rgba());

    for rect in &layout.rects {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                canvas.put_pixel(x, y, foreground);
            }
        }
    }

    if let Some(placed) = &layout.label {
        label::draw(&mut canvas, placed, foreground)?;
    }

    let image = match options.rotation {
        Rotation::None => canvas,
        Rotation::Quarter => imageops::rotate90(&canvas),
        Rotation::Half => imageops::rotate180(&canvas),
        Rotation::ThreeQuarter => imageops::rotate270(&canvas),
    };

    log::debug!(
        "rendered {}x{} px ({} units, rotation {})",
        image.width(),
        image.height(),
        sequence.total_units(),
        options.rotation.degrees()
    );
    Ok(RenderedImage { image })
}
