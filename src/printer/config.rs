//! # Printer Configuration
//!
//! This module defines the printable area of the target printer and the
//! options handed to the print service with every job.
//!
//! ## Defaults
//!
//! | Property | Value |
//! |----------|-------|
//! | Paper width | 80mm |
//! | Print width | 72mm (576 dots) |
//! | Resolution | 203 DPI |
//! | Safety margin | 5mm below content |
//!
//! ## Usage
//!
//! ```
//! use cupom::printer::PrinterGeometry;
//!
//! let geometry = PrinterGeometry::THERMAL_80MM;
//! assert_eq!(geometry.width_dots(), 576);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// # Printer Geometry
///
/// Physical characteristics of the paper and print head.
///
/// ## Calculations
///
/// ```text
/// dots_per_mm = dpi / 25.4
/// width_dots  = ceil(printable_width_mm * dots_per_mm)
///
/// For an 80mm thermal roll:
///   dots_per_mm = 203 / 25.4 ≈ 8
///   width_dots  = ceil(72 * 7.99) = 576
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrinterGeometry {
    /// Roll width in millimeters
    pub paper_width_mm: f32,

    /// Printable width in millimeters
    pub printable_width_mm: f32,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Paper fed after the content, in millimeters
    pub safety_margin_mm: f32,

    /// Maximum rows per raster chunk (device buffer limits)
    pub max_chunk_rows: u16,

    /// Longest content accepted for one job, in millimeters
    pub max_length_mm: f32,
}

impl PrinterGeometry {
    /// 80mm thermal receipt roll, 72mm printable at 203 DPI.
    pub const THERMAL_80MM: Self = Self {
        paper_width_mm: 80.0,
        printable_width_mm: 72.0,
        dpi: 203,
        safety_margin_mm: 5.0,
        max_chunk_rows: 256,
        max_length_mm: 2000.0,
    };

    /// 58mm thermal receipt roll, 48mm printable at 203 DPI.
    pub const THERMAL_58MM: Self = Self {
        paper_width_mm: 58.0,
        printable_width_mm: 48.0,
        dpi: 203,
        safety_margin_mm: 5.0,
        max_chunk_rows: 256,
        max_length_mm: 2000.0,
    };

    /// Calculate dots per millimeter
    ///
    /// ## Example
    ///
    /// ```
    /// use cupom::printer::PrinterGeometry;
    ///
    /// let geometry = PrinterGeometry::THERMAL_80MM;
    /// assert!((geometry.dots_per_mm() - 8.0).abs() < 0.1);
    /// ```
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Printable width in dots
    #[inline]
    pub fn width_dots(&self) -> u32 {
        (self.printable_width_mm * self.dots_per_mm()).ceil() as u32
    }

    /// Convert millimeters to dots
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u32 {
        (mm * self.dots_per_mm()).round() as u32
    }

    /// Convert dots to millimeters
    #[inline]
    pub fn dots_to_mm(&self, dots: u32) -> f32 {
        dots as f32 / self.dots_per_mm()
    }

    /// Longest content accepted for one job, in dots
    #[inline]
    pub fn max_height_dots(&self) -> u32 {
        self.mm_to_dots(self.max_length_mm.max(0.0))
    }
}

impl Default for PrinterGeometry {
    fn default() -> Self {
        Self::THERMAL_80MM
    }
}

// ============================================================================
// PRINT OPTIONS
// ============================================================================

/// Margin handling requested from the print service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// Content starts at the paper edge
    #[default]
    None,
    /// Whatever the printer driver applies by default
    Default,
    /// The smallest margins the driver supports
    Minimum,
}

impl FromStr for MarginType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "default" => Ok(Self::Default),
            "minimum" | "min" => Ok(Self::Minimum),
            other => Err(format!(
                "Unknown margin type '{}'. Use 'none', 'default' or 'minimum'",
                other
            )),
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Default => "default",
            Self::Minimum => "minimum",
        };
        f.write_str(name)
    }
}

/// Options passed to the print service with each job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintOptions {
    /// Submit without any dialog or spooler chatter
    pub silent: bool,
    /// Keep background tones and fills
    pub print_background: bool,
    /// Margin handling
    pub margins: MarginType,
    /// Printer or queue name; `None` means the system default
    pub destination: Option<String>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            silent: true,
            print_background: true,
            margins: MarginType::None,
            destination: None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_80mm_width_dots() {
        let geometry = PrinterGeometry::THERMAL_80MM;
        assert_eq!(geometry.width_dots(), 576);
        assert_eq!(geometry.width_dots() % 8, 0);
    }

    #[test]
    fn test_58mm_width_dots() {
        let geometry = PrinterGeometry::THERMAL_58MM;
        // 48mm * 7.99 ≈ 383.6
        assert_eq!(geometry.width_dots(), 384);
    }

    #[test]
    fn test_mm_dots_conversion() {
        let geometry = PrinterGeometry::default();
        let dots = geometry.mm_to_dots(10.0);
        assert!((dots as i32 - 80).abs() < 2);
        let mm = geometry.dots_to_mm(80);
        assert!((mm - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_max_height_dots() {
        let geometry = PrinterGeometry::THERMAL_80MM;
        // 2000mm * 7.99 ≈ 15984
        assert_eq!(geometry.max_height_dots(), 15984);

        let negative = PrinterGeometry {
            max_length_mm: -1.0,
            ..geometry
        };
        assert_eq!(negative.max_height_dots(), 0);
    }

    #[test]
    fn test_margin_type_parse() {
        assert_eq!("none".parse::<MarginType>().unwrap(), MarginType::None);
        assert_eq!("Default".parse::<MarginType>().unwrap(), MarginType::Default);
        assert_eq!("min".parse::<MarginType>().unwrap(), MarginType::Minimum);
        assert!("printable".parse::<MarginType>().is_err());
    }

    #[test]
    fn test_default_options_are_silent_with_background() {
        let options = PrintOptions::default();
        assert!(options.silent);
        assert!(options.print_background);
        assert_eq!(options.margins, MarginType::None);
        assert!(options.destination.is_none());
    }
}
