//! # Print Payloads
//!
//! Decodes the data-URL (or bare base64) strings handed over by the UI and
//! classifies the bytes as a PDF document or a raster image.
//!
//! ```text
//! data:application/pdf;base64,JVBERi0xLjcK...
//! data:image/png;base64,iVBORw0KGgo...
//! iVBORw0KGgo...                      (bare base64)
//! ```
//!
//! The declared media type, when present, must agree with the magic bytes.
//! Anything that is neither a PDF nor a decodable image format is rejected
//! here, before a rendering surface or print job exists.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use crate::error::CupomError;

/// Magic bytes at the start of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// What the payload bytes contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Pdf,
    Image(ImageFormat),
}

impl PayloadKind {
    /// Human-readable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image(format) => format.extensions_str().first().copied().unwrap_or("image"),
        }
    }
}

/// A decoded, classified payload.
#[derive(Debug, Clone)]
pub struct Payload {
    kind: PayloadKind,
    bytes: Vec<u8>,
}

impl Payload {
    /// Decode a data URL or bare base64 string.
    ///
    /// ## Example
    ///
    /// ```
    /// use cupom::payload::{Payload, PayloadKind};
    ///
    /// // "%PDF-1.4" in base64
    /// let payload = Payload::from_data_url("data:application/pdf;base64,JVBERi0xLjQ=")?;
    /// assert_eq!(payload.kind(), PayloadKind::Pdf);
    /// # Ok::<(), cupom::CupomError>(())
    /// ```
    pub fn from_data_url(input: &str) -> Result<Self, CupomError> {
        let input = input.trim();
        let (media_type, data) = split_data_url(input)?;

        let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if cleaned.is_empty() {
            return Err(CupomError::Payload("payload is empty".to_string()));
        }

        let bytes = STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| CupomError::Payload(format!("invalid base64: {}", e)))?;

        let payload = Self::from_bytes(bytes)?;

        if let Some(media_type) = media_type {
            payload.check_media_type(media_type)?;
        }

        Ok(payload)
    }

    /// Classify raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CupomError> {
        let kind = detect_kind(&bytes)?;
        Ok(Self { kind, bytes })
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check_media_type(&self, media_type: &str) -> Result<(), CupomError> {
        let media_type = media_type.to_ascii_lowercase();
        let agrees = match self.kind {
            PayloadKind::Pdf => media_type == "application/pdf",
            PayloadKind::Image(format) => {
                media_type.starts_with("image/")
                    && ImageFormat::from_mime_type(&media_type).is_none_or(|declared| declared == format)
            }
        };

        if agrees {
            Ok(())
        } else {
            Err(CupomError::Payload(format!(
                "declared type '{}' does not match {} content",
                media_type,
                self.kind.name()
            )))
        }
    }
}

/// Split `data:<mime>;base64,<data>` into its media type and data.
///
/// Bare base64 (no `data:` prefix) yields no media type.
fn split_data_url(input: &str) -> Result<(Option<&str>, &str), CupomError> {
    let Some(rest) = input.strip_prefix("data:") else {
        return Ok((None, input));
    };

    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| CupomError::Payload("data URL has no ',' separator".to_string()))?;

    let mut params = header.split(';');
    let media_type = params.next().unwrap_or("").trim();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(CupomError::Payload(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    let media_type = if media_type.is_empty() {
        None
    } else {
        Some(media_type)
    };
    Ok((media_type, data))
}

fn detect_kind(bytes: &[u8]) -> Result<PayloadKind, CupomError> {
    if bytes.is_empty() {
        return Err(CupomError::Payload("payload is empty".to_string()));
    }
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(PayloadKind::Pdf);
    }
    match image::guess_format(bytes) {
        Ok(format) => Ok(PayloadKind::Image(format)),
        Err(_) => Err(CupomError::Payload(
            "content is neither a PDF nor a recognised image".to_string(),
        )),
    }
}

// ============================================================================
// TESTS
// ============================================================================
