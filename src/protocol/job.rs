//! # Raster Print Jobs
//!
//! Assembles the full byte stream for one receipt:
//!
//! ```text
//! ESC @                      init
//! ESC GS S ... (≤ N rows)    raster chunk 1
//! ESC GS S ... (≤ N rows)    raster chunk 2
//! ...
//! ESC J n                    safety feed
//! ESC d 2 | ESC d 3          feed + cut
//! ```

use crate::error::CupomError;
use crate::render::Raster;

use super::{commands, graphics};

/// Cutter behavior at the end of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cut {
    #[default]
    Full,
    Partial,
    None,
}

/// Encode a raster as a complete StarPRNT job.
pub fn encode(
    raster: &Raster,
    max_chunk_rows: u16,
    feed_mm: f32,
    cut: Cut,
) -> Result<Vec<u8>, CupomError> {
    let width_dots = u16::try_from(raster.width).map_err(|_| {
        CupomError::Transport(format!("raster width {} exceeds 65535 dots", raster.width))
    })?;
    let chunk_rows = max_chunk_rows.max(1) as u32;

    let mut data = commands::init();

    let mut start = 0;
    while start < raster.height {
        let end = (start + chunk_rows).min(raster.height);
        data.extend(graphics::raster(
            width_dots,
            (end - start) as u16,
            raster.rows(start, end),
        ));
        start = end;
    }

    data.extend(commands::feed_mm(feed_mm));
    match cut {
        Cut::Full => data.extend(commands::cut_full_feed()),
        Cut::Partial => data.extend(commands::cut_partial_feed()),
        Cut::None => {}
    }

    Ok(data)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(width: u32, height: u32) -> Raster {
        Raster {
            width,
            height,
            data: vec![0xFF; (width as usize).div_ceil(8) * height as usize],
        }
    }

    fn count_raster_commands(data: &[u8]) -> usize {
        data.windows(3).filter(|w| *w == [0x1B, 0x1D, b'S']).count()
    }

    #[test]
    fn test_chunking() {
        let data = encode(&raster(576, 600), 256, 5.0, Cut::Full).unwrap();
        // 256 + 256 + 88
        assert_eq!(count_raster_commands(&data), 3);
        assert_eq!(&data[..2], &[0x1B, 0x40]);
        assert_eq!(&data[data.len() - 3..], &[0x1B, b'd', 2]);
    }

    #[test]
    fn test_total_length() {
        let data = encode(&raster(576, 10), 256, 0.0, Cut::None).unwrap();
        assert_eq!(data.len(), 2 + 9 + 72 * 10);
    }

    #[test]
    fn test_empty_raster_still_feeds_and_cuts() {
        let data = encode(&raster(576, 0), 256, 5.0, Cut::Partial).unwrap();
        assert_eq!(count_raster_commands(&data), 0);
        assert_eq!(data, vec![0x1B, 0x40, 0x1B, b'J', 20, 0x1B, b'd', 3]);
    }
}
