//! # Raster Graphics (ESC GS S)
//!
//! ```text
//! ESC GS S m xL xH yL yH n [data...]
//!
//! m  = 1 (monochrome)
//! x  = width in bytes, little-endian
//! y  = height in rows, little-endian
//! n  = 0 (black)
//! ```
//!
//! Data is row-major, MSB = leftmost dot, 1 = black.

use super::commands::{ESC, GS, u16_le};

/// Build one raster graphics command.
///
/// ## Example
///
/// ```
/// use cupom::protocol::graphics;
///
/// let cmd = graphics::raster(576, 100, &vec![0xAA; 72 * 100]);
/// assert_eq!(&cmd[0..3], &[0x1B, 0x1D, 0x53]);
/// assert_eq!(cmd[4], 72);  // xL
/// assert_eq!(cmd[6], 100); // yL
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);

    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(9 + data.len());
    cmd.push(ESC);
    cmd.push(GS);
    cmd.push(b'S');
    cmd.push(1); // m = 1 (monochrome)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.push(0); // n = 0 (black)
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let cmd = raster(576, 300, &vec![0; 72 * 300]);
        assert_eq!(&cmd[..9], &[0x1B, 0x1D, b'S', 1, 72, 0, 0x2C, 0x01, 0]);
        assert_eq!(cmd.len(), 9 + 72 * 300);
    }

    #[test]
    fn test_raster_odd_width() {
        let cmd = raster(12, 1, &[0xFF, 0xF0]);
        assert_eq!(cmd[4], 2);
        assert_eq!(&cmd[9..], &[0xFF, 0xF0]);
    }
}
