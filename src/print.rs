//! Print Sizing - physical dimensions at a printer resolution
//!
//! Bars can only land on whole printer dots, so an X-dimension in
//! millimetres is resolved to an integer pixel width before rendering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{RenderedImage, Scale};

const MM_PER_INCH: f64 = 25.4;

/// Where the print resolution came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintAuthority {
    /// Engine default
    #[default]
    System,
    /// Render profile
    Profile,
    /// Caller override, range-checked
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    #[error("DPI must be between 72 and 1200, got {0}")]
    DpiOutOfRange(u32),

    #[error("X-dimension must be positive, got {0} mm")]
    InvalidXDimension(String),
}

pub const MIN_DPI: u32 = 72;
pub const MAX_DPI: u32 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintSpec {
    pub authority: PrintAuthority,
    pub dpi: u32,
}

impl Default for PrintSpec {
    fn default() -> Self {
        Self {
            authority: PrintAuthority::System,
            dpi: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Inch,
    Millimetre,
}

impl PrintSpec {
    pub fn from_profile(dpi: u32) -> Result<Self, PrintError> {
        Self::checked(PrintAuthority::Profile, dpi)
    }

    pub fn from_user(dpi: u32) -> Result<Self, PrintError> {
        Self::checked(PrintAuthority::User, dpi)
    }

    fn checked(authority: PrintAuthority, dpi: u32) -> Result<Self, PrintError> {
        if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
            return Err(PrintError::DpiOutOfRange(dpi));
        }
        Ok(Self { authority, dpi })
    }

    /// Bar-width scale closest to `x_dimension_mm`, at least one dot.
    pub fn scale_for_x_dimension(&self, x_dimension_mm: f64) -> Result<Scale, PrintError> {
        if !(x_dimension_mm.is_finite() && x_dimension_mm > 0.0) {
            return Err(PrintError::InvalidXDimension(x_dimension_mm.to_string()));
        }
        let dots = (x_dimension_mm / MM_PER_INCH * f64::from(self.dpi)).round();
        Ok(Scale::BarWidth((dots as u32).max(1)))
    }

    /// X-dimension actually printed by `scale` bar widths.
    pub fn x_dimension_mm(&self, px_per_unit: u32) -> f64 {
        f64::from(px_per_unit) / f64::from(self.dpi) * MM_PER_INCH
    }

    pub fn image_size(&self, image: &RenderedImage, unit: LengthUnit) -> ImageSize {
        let to_unit = |px: u32| {
            let inches = f64::from(px) / f64::from(self.dpi);
            match unit {
                LengthUnit::Inch => inches,
                LengthUnit::Millimetre => inches * MM_PER_INCH,
            }
        };
        ImageSize {
            width: to_unit(image.width()),
            height: to_unit(image.height()),
            unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{Module, WidthSequence};
    use crate::render::{render, RenderOptions};

    #[test]
    fn test_dpi_range() {
        assert!(PrintSpec::from_user(71).is_err());
        assert_eq!(PrintSpec::from_user(600).unwrap().authority, PrintAuthority::User);
        assert_eq!(PrintSpec::from_profile(1201), Err(PrintError::DpiOutOfRange(1201)));
    }

    #[test]
    fn test_x_dimension_rounds_to_dots() {
        let spec = PrintSpec::default();
        // 0.33 mm at 300 dpi is 3.9 dots
        assert_eq!(spec.scale_for_x_dimension(0.33).unwrap(), Scale::BarWidth(4));
        assert_eq!(spec.scale_for_x_dimension(0.01).unwrap(), Scale::BarWidth(1));
        assert!(spec.scale_for_x_dimension(0.0).is_err());
    }

    #[test]
    fn test_image_size() {
        let sequence = WidthSequence::from_checked(vec![Module::space(100), Module::bar(100), Module::space(100)], 100);
        let options = RenderOptions { scale: Scale::BarWidth(1), height_px: 150, ..RenderOptions::default() }.without_label();
        let image = render(&sequence, &options).unwrap();
        let size = PrintSpec::default().image_size(&image, LengthUnit::Inch);
        assert_eq!(size.width, 1.0);
        assert_eq!(size.height, 0.5);
    }
}
