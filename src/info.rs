//! Per-slot metadata bytes.
//!
//! Every slot owns one byte: `0` marks an empty slot, any other value marks
//! an occupied slot whose probe distance is the value minus one. A single
//! sentinel byte after the last slot is always [`SENTINEL`] so forward scans
//! stop without a bounds check.

/// Marks an empty slot.
pub(crate) const EMPTY: u8 = 0x00;

/// Occupied at probe distance zero.
pub(crate) const IDEAL: u8 = 0x01;

/// Value of the byte following the last slot.
pub(crate) const SENTINEL: u8 = IDEAL;

/// Largest storable value. An element that reaches it forces the next
/// insertion to grow the table.
pub(crate) const MAX: u8 = 0xFF;

/// Upper bound on the overflow slots appended after the last bucket.
pub(crate) const MAX_OVERFLOW_SLOTS: usize = MAX as usize;

#[inline(always)]
pub(crate) fn is_occupied(info: u8) -> bool {
    info != EMPTY
}

/// Probe distance of an occupied slot.
#[inline(always)]
pub(crate) fn distance(info: u8) -> usize {
    debug_assert!(is_occupied(info));
    info as usize - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding() {
        assert!(!is_occupied(EMPTY));
        assert!(is_occupied(IDEAL));
        assert!(is_occupied(SENTINEL));
        assert_eq!(distance(IDEAL), 0);
        assert_eq!(distance(MAX), 254);
    }
}
