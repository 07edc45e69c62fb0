//! # Binary Conversion
//!
//! Thermal heads print black or nothing. This module turns the grayscale
//! receipt surface into packed 1-bit rows using either a hard threshold
//! (crisp text) or Bayer 8x8 ordered dithering (photos, logos, shaded
//! backgrounds).
//!
//! ## Bit Packing
//!
//! ```text
//! pixels:  ■ ■ □ □ ■ □ ■ □
//! byte:    1 1 0 0 1 0 1 0   = 0xCA
//! ```
//!
//! Bit 7 is the leftmost pixel. Rows are padded on the right with white.

use std::fmt;
use std::str::FromStr;

use image::GrayImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63; low values switch on first as intensity grows.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Luma at or above which a pixel counts as paper when backgrounds are off.
pub const BACKGROUND_CUTOFF: u8 = 200;

/// Threshold used by [`Dithering::Threshold`].
const HARD_THRESHOLD: f32 = 0.5;

/// How grayscale is reduced to black and white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dithering {
    /// Ordered Bayer 8x8 halftone
    #[default]
    Bayer,
    /// Single cutoff at 50% gray
    Threshold,
}

impl FromStr for Dithering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bayer" => Ok(Self::Bayer),
            "threshold" => Ok(Self::Threshold),
            other => Err(format!(
                "Unknown dithering '{}'. Use 'bayer' or 'threshold'",
                other
            )),
        }
    }
}

impl fmt::Display for Dithering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bayer => "bayer",
            Self::Threshold => "threshold",
        })
    }
}

/// Packed 1-bit raster, `width.div_ceil(8)` bytes per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Raster {
    #[inline]
    pub fn width_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Bytes of rows `start..end`.
    pub fn rows(&self, start: u32, end: u32) -> &[u8] {
        let wb = self.width_bytes();
        &self.data[start as usize * wb..end as usize * wb]
    }

    /// Number of black dots, mostly useful in tests.
    pub fn black_dots(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

/// Get the Bayer threshold for a pixel position, in (0, 1).
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Pack a row of boolean pixel values into bytes (MSB = leftmost).
///
/// ## Example
///
/// ```
/// use cupom::render::dither::pack_row;
///
/// let row = vec![true, true, false, false, true, false, true, false];
/// assert_eq!(pack_row(&row), vec![0xCA]);
///
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Convert a grayscale surface into a packed raster.
///
/// With `print_background` off, anything lighter than
/// [`BACKGROUND_CUTOFF`] is treated as bare paper.
pub fn to_raster(image: &GrayImage, mode: Dithering, print_background: bool) -> Raster {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let width_bytes = width.div_ceil(8);
    let mut data = vec![0u8; width_bytes * height];

    if width_bytes == 0 {
        return Raster {
            width: image.width(),
            height: image.height(),
            data,
        };
    }

    data.par_chunks_mut(width_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let pixels: Vec<bool> = (0..width)
                .map(|x| {
                    let luma = image.get_pixel(x as u32, y as u32)[0];
                    if !print_background && luma >= BACKGROUND_CUTOFF {
                        return false;
                    }
                    let intensity = 1.0 - luma as f32 / 255.0;
                    match mode {
                        Dithering::Bayer => intensity > threshold(x, y),
                        Dithering::Threshold => intensity > HARD_THRESHOLD,
                    }
                })
                .collect();
            row.copy_from_slice(&pack_row(&pixels));
        });

    Raster {
        width: image.width(),
        height: image.height(),
        data,
    }
}

// ============================================================================
// TESTS
// ============================================================================
