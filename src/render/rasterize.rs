//! # Rasterization
//!
//! Turns a [`Payload`] into grayscale page images and lays them out as a
//! single column at the printer's dot width.
//!
//! ```text
//!  PDF ──hayro──▶ PNG per page ─┐
//!                               ├─▶ grayscale pages ──▶ stacked column (576 wide)
//!  PNG/JPEG/... ──image─────────┘
//! ```
//!
//! Transparent pixels are composited over white paper.

use std::io::Cursor;
use std::sync::Arc;

use hayro::{Pdf, RenderSettings, render};
use hayro_interpret::InterpreterSettings;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::CupomError;
use crate::payload::{Payload, PayloadKind};

/// Options for rendering PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterizeOptions {
    /// Scale applied to the PDF's native 72 DPI page size.
    pub scale: f32,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self { scale: 4.0 }
    }
}

/// Rasterize every page of the payload into grayscale images.
pub fn rasterize(payload: &Payload, options: &RasterizeOptions) -> Result<Vec<GrayImage>, CupomError> {
    match payload.kind() {
        PayloadKind::Pdf => rasterize_pdf(payload.bytes(), options),
        PayloadKind::Image(format) => Ok(vec![decode_image(payload.bytes(), format)?]),
    }
}

/// Render each PDF page with hayro and decode it to grayscale.
fn rasterize_pdf(bytes: &[u8], options: &RasterizeOptions) -> Result<Vec<GrayImage>, CupomError> {
    if !(options.scale > 0.0) {
        return Err(CupomError::Render(format!(
            "render scale must be positive, got {}",
            options.scale
        )));
    }

    let data = Arc::new(bytes.to_vec());
    let pdf = Pdf::new(data).map_err(|e| CupomError::Render(format!("failed to parse PDF: {:?}", e)))?;

    let interpreter_settings = InterpreterSettings::default();
    let render_settings = RenderSettings {
        x_scale: options.scale,
        y_scale: options.scale,
        ..Default::default()
    };

    let mut encoded = Vec::new();
    for page in pdf.pages().iter() {
        let pixmap = render(page, &interpreter_settings, &render_settings);
        let png = pixmap.take_png();
        encoded.push(png);
    }

    if encoded.is_empty() {
        return Err(CupomError::Render("PDF has no pages".to_string()));
    }

    encoded
        .par_iter()
        .map(|png| decode_image(png, ImageFormat::Png))
        .collect()
}

/// Decode an encoded image and flatten it onto white paper.
pub fn decode_image(bytes: &[u8], format: ImageFormat) -> Result<GrayImage, CupomError> {
    let img = image::load(Cursor::new(bytes), format)?;
    Ok(flatten_onto_white(&img))
}

/// Convert to grayscale, compositing any alpha channel over white.
pub fn flatten_onto_white(img: &DynamicImage) -> GrayImage {
    if !img.color().has_alpha() {
        return img.to_luma8();
    }

    let la = img.to_luma_alpha8();
    let mut out = GrayImage::new(la.width(), la.height());
    for (x, y, pixel) in la.enumerate_pixels() {
        let [luma, alpha] = pixel.0;
        let a = alpha as f32 / 255.0;
        let value = luma as f32 * a + 255.0 * (1.0 - a);
        out.put_pixel(x, y, Luma([value.round() as u8]));
    }
    out
}

/// Scale every page to `width` and stack them top to bottom with no gap.
///
/// Fails when the column would be taller than `max_height` dots. The check
/// happens before any scaled page is allocated.
pub fn stack_pages(pages: &[GrayImage], width: u32, max_height: u32) -> Result<GrayImage, CupomError> {
    let pages: Vec<&GrayImage> = pages
        .iter()
        .filter(|page| page.width() > 0 && page.height() > 0)
        .collect();

    let mut heights = Vec::with_capacity(pages.len());
    let mut total_height: u64 = 0;
    for page in &pages {
        let height = scaled_height(page, width);
        total_height = total_height.saturating_add(height);
        if total_height > max_height as u64 {
            return Err(CupomError::Render(format!(
                "content is too long: more than {} dots at {} dots wide",
                max_height, width
            )));
        }
        heights.push(height as u32);
    }

    let scaled: Vec<GrayImage> = pages
        .par_iter()
        .zip(heights.par_iter())
        .map(|(page, &height)| fit_to_width(page, width, height))
        .collect();

    let mut column = GrayImage::from_pixel(width, total_height as u32, Luma([255]));

    let mut y = 0i64;
    for page in &scaled {
        imageops::overlay(&mut column, page, 0, y);
        y += page.height() as i64;
    }

    Ok(column)
}

/// Height of `page` once scaled to `width`, rounded, at least one row.
fn scaled_height(page: &GrayImage, width: u32) -> u64 {
    let numerator = page.height() as u128 * width as u128 * 2 + page.width() as u128;
    let scaled = numerator / (page.width() as u128 * 2);
    u64::try_from(scaled).unwrap_or(u64::MAX).max(1)
}

fn fit_to_width(page: &GrayImage, width: u32, height: u32) -> GrayImage {
    if page.width() == width && page.height() == height {
        return page.clone();
    }
    imageops::resize(page, width, height, FilterType::Lanczos3)
}

// ============================================================================
// TESTS
// ============================================================================
