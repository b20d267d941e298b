//! Digit encoder: decimal digit to segment mask.
//!
//! A [`SegmentMask`] is an 8-bit membership set; bit `i` set means segment
//! `i` is shown. The ten digit masks are a static table. Masks carry no
//! arithmetic meaning: the transition engine only needs their XOR difference
//! and the set bits of that difference.

use core::fmt;

use crate::error::{WatchError, WatchResult};
use crate::geometry::{SEGMENT_COUNT, SegmentId};

/// Set of shown segments, bit `i` = segment `i`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SegmentMask(u8);

impl SegmentMask {
    /// Nothing shown. This is also the digit 8 code.
    pub const EMPTY: SegmentMask = SegmentMask(0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `segment` is shown
    pub const fn contains(self, segment: SegmentId) -> bool {
        self.0 & segment.bit() != 0
    }

    /// Segments whose state differs between the two masks
    pub const fn changed(self, other: SegmentMask) -> SegmentMask {
        Self(self.0 ^ other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of set segments
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate set segments in ascending bit order
    pub fn segments(self) -> impl Iterator<Item = SegmentId> {
        SegmentId::ALL
            .into_iter()
            .filter(move |segment| self.contains(*segment))
    }
}

impl fmt::Debug for SegmentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentMask({:#010b})", self.0)
    }
}

const _: () = assert!(SEGMENT_COUNT == u8::BITS as usize);

/// Digit masks, indexed by digit
const DIGIT_MASKS: [SegmentMask; 10] = [
    SegmentMask(0b0000_1000),
    SegmentMask(0b0000_1011),
    SegmentMask(0b1000_0100),
    SegmentMask(0b1001_0000),
    SegmentMask(0b0101_0010),
    SegmentMask(0b0011_0000),
    SegmentMask(0b0010_0000),
    SegmentMask(0b1000_1010),
    SegmentMask(0b0000_0000),
    SegmentMask(0b0001_0000),
];

/// Mask for a decimal digit.
///
/// # Panics
///
/// Panics if `digit > 9`. Callers derive digits with `/ 10` and `% 10` of a
/// validated hour or minute, so an out-of-range digit is a bug upstream.
pub const fn encode(digit: u8) -> SegmentMask {
    assert!(digit <= 9, "digit out of range");
    DIGIT_MASKS[digit as usize]
}

/// Mask for a decimal digit, rejecting anything outside 0-9
pub fn try_encode(digit: u8) -> WatchResult<SegmentMask> {
    DIGIT_MASKS
        .get(digit as usize)
        .copied()
        .ok_or(WatchError::InvalidDigit { digit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_table() {
        let expected: [u8; 10] = [
            0b0000_1000,
            0b0000_1011,
            0b1000_0100,
            0b1001_0000,
            0b0101_0010,
            0b0011_0000,
            0b0010_0000,
            0b1000_1010,
            0b0000_0000,
            0b0001_0000,
        ];
        for (digit, bits) in expected.iter().enumerate() {
            assert_eq!(encode(digit as u8).bits(), *bits, "digit {}", digit);
        }
    }

    #[test]
    fn test_masks_are_distinct() {
        for a in 0..10u8 {
            for b in (a + 1)..10u8 {
                assert_ne!(encode(a), encode(b), "digits {} and {}", a, b);
            }
        }
    }

    #[test]
    fn test_try_encode_rejects_out_of_range() {
        assert_eq!(try_encode(9), Ok(encode(9)));
        assert_eq!(try_encode(10), Err(WatchError::InvalidDigit { digit: 10 }));
        assert_eq!(
            try_encode(u8::MAX),
            Err(WatchError::InvalidDigit { digit: u8::MAX })
        );
    }

    #[test]
    #[should_panic(expected = "digit out of range")]
    fn test_encode_panics_out_of_range() {
        let _ = encode(10);
    }

    #[test]
    fn test_changed_isolates_differing_bits() {
        let diff = encode(8).changed(encode(1));
        assert_eq!(diff.bits(), 0b0000_1011);
        assert_eq!(diff.count(), 3);

        let indices: heapless::Vec<usize, 8> = diff.segments().map(SegmentId::index).collect();
        assert_eq!(indices.as_slice(), &[0, 1, 3]);

        assert!(encode(4).changed(encode(4)).is_empty());
    }

    #[test]
    fn test_digit_one_is_a_vertical_stroke() {
        // Upper, centre and lower verticals
        let one = encode(1);
        for index in [0u8, 1, 3] {
            let segment = SegmentId::new(index).unwrap();
            assert!(one.contains(segment));
            assert!(segment.shape().visible.size.width < segment.shape().visible.size.height);
        }
    }
}
