//! # StarPRNT Protocol Commands
//!
//! Paper handling commands. Multi-byte integers are little-endian.

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used in combination with ESC for graphics commands (`ESC GS S`).
pub const GS: u8 = 0x1D;

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text and graphics settings.
///
/// ```
/// use cupom::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Feed to Cut Position, Then Full Cut (ESC d 2)
#[inline]
pub fn cut_full_feed() -> Vec<u8> {
    vec![ESC, b'd', 2]
}

/// # Feed to Cut Position, Then Partial Cut (ESC d 3)
///
/// Leaves a small hinge so the receipt does not drop.
#[inline]
pub fn cut_partial_feed() -> Vec<u8> {
    vec![ESC, b'd', 3]
}

/// # Micro Feed (ESC J n)
///
/// Feeds paper forward by n/4 millimeters.
///
/// ```
/// use cupom::protocol::commands;
///
/// assert_eq!(commands::feed_units(12), vec![0x1B, 0x4A, 12]);
/// ```
#[inline]
pub fn feed_units(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

/// Feed paper by millimeters.
///
/// Feeds longer than one command allows (63.75mm) are split.
///
/// ```
/// use cupom::protocol::commands;
///
/// assert_eq!(commands::feed_mm(5.0), vec![0x1B, 0x4A, 20]);
/// ```
pub fn feed_mm(mm: f32) -> Vec<u8> {
    let mut units = (mm * 4.0).round().max(0.0) as u32;
    let mut cmd = Vec::new();
    while units > 0 {
        let n = units.min(255);
        cmd.extend(feed_units(n as u8));
        units -= n;
    }
    cmd
}

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use cupom::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_commands() {
        assert_eq!(cut_full_feed(), vec![0x1B, 0x64, 2]);
        assert_eq!(cut_partial_feed(), vec![0x1B, 0x64, 3]);
    }

    #[test]
    fn test_feed_mm_zero() {
        assert!(feed_mm(0.0).is_empty());
        assert!(feed_mm(-3.0).is_empty());
    }

    #[test]
    fn test_feed_mm_long_is_split() {
        // 100mm = 400 units = 255 + 145
        assert_eq!(feed_mm(100.0), vec![ESC, b'J', 255, ESC, b'J', 145]);
    }
}
