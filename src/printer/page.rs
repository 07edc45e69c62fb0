//! # Page Sizing
//!
//! Converts the measured pixel size of rendered content into the physical
//! page size handed to the print service.
//!
//! ```text
//! height_mm = ceil(height_px / dots_per_mm) + safety_margin_mm
//! page      = printable_width_mm x height_mm, in micrometers
//! ```
//!
//! The width never depends on the content: receipts are always printed at
//! the full printable width of the roll.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::PrinterGeometry;

/// Micrometers per millimeter
pub const MICRONS_PER_MM: u32 = 1000;

/// Pixel dimensions of rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Measurement {
    pub width_px: u32,
    pub height_px: u32,
}

impl Measurement {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Physical page size in micrometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_um: u32,
    pub height_um: u32,
}

impl PageSize {
    /// Page size for content rendered at the geometry's resolution.
    ///
    /// ## Example
    ///
    /// ```
    /// use cupom::printer::{Measurement, PageSize, PrinterGeometry};
    ///
    /// let geometry = PrinterGeometry::THERMAL_80MM;
    /// // 800 dots ≈ 100.1mm, rounded up to 101mm, plus 5mm safety
    /// let page = PageSize::for_content(Measurement::new(576, 800), &geometry);
    /// assert_eq!(page.width_um, 72_000);
    /// assert_eq!(page.height_um, 106_000);
    /// ```
    pub fn for_content(measurement: Measurement, geometry: &PrinterGeometry) -> Self {
        let content_mm = geometry.dots_to_mm(measurement.height_px).ceil() as u32;
        let safety_mm = geometry.safety_margin_mm.max(0.0).ceil() as u32;
        Self {
            width_um: mm_to_microns(geometry.printable_width_mm),
            height_um: (content_mm + safety_mm) * MICRONS_PER_MM,
        }
    }

    /// Page size from PDF points (1/72 inch), rounded up to whole millimeters.
    pub fn from_points(width_pt: f32, height_pt: f32) -> Self {
        let to_mm = |pt: f32| (pt * 25.4 / 72.0).ceil() as u32;
        Self {
            width_um: to_mm(width_pt) * MICRONS_PER_MM,
            height_um: to_mm(height_pt) * MICRONS_PER_MM,
        }
    }

    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_um as f32 / MICRONS_PER_MM as f32
    }

    #[inline]
    pub fn height_mm(&self) -> f32 {
        self.height_um as f32 / MICRONS_PER_MM as f32
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm x {}mm", self.width_mm(), self.height_mm())
    }
}

fn mm_to_microns(mm: f32) -> u32 {
    (mm.max(0.0) * MICRONS_PER_MM as f32).round() as u32
}

// ============================================================================
// TESTS
// ============================================================================
