//! Static geometry of the watch face.
//!
//! Every digit is drawn inside a 70x82 quadrant from eight rectangular
//! segments and two always-on points. Each segment has a *visible* rectangle
//! and a *collapsed* one: a zero-area line lying on the edge it slides out
//! from. Animations only ever interpolate between those two rectangles.
//!
//! All coordinates here are quadrant-local except [`CROSS_BARS`] and the
//! quadrant bounds, which are screen coordinates.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Number of segments in a digit
pub const SEGMENT_COUNT: usize = 8;

/// Number of static points in a digit
pub const POINT_COUNT: usize = 2;

/// Screen width in pixels
pub const SCREEN_WIDTH_PX: u32 = 144;

/// Screen height in pixels
pub const SCREEN_HEIGHT_PX: u32 = 168;

/// Width of a quadrant in pixels
pub const QUADRANT_WIDTH_PX: u32 = 70;

/// Height of a quadrant in pixels
pub const QUADRANT_HEIGHT_PX: u32 = 82;

const fn rect(x: i32, y: i32, width: u32, height: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}

/// Full screen rectangle
pub const SCREEN_BOUNDS: Rectangle = rect(0, 0, SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX);

/// Vertical and horizontal bars separating the quadrants (screen coordinates)
pub const CROSS_BARS: [Rectangle; 2] = [rect(70, 0, 4, 168), rect(0, 82, 144, 4)];

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// Identifier of a segment, 0 to 7.
///
/// Segment `i` is driven by bit `i` of a [`SegmentMask`](crate::digit::SegmentMask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u8);

impl SegmentId {
    /// All segments in bit order
    pub const ALL: [SegmentId; SEGMENT_COUNT] = [
        SegmentId(0),
        SegmentId(1),
        SegmentId(2),
        SegmentId(3),
        SegmentId(4),
        SegmentId(5),
        SegmentId(6),
        SegmentId(7),
    ];

    /// Segment for a bit position, `None` past 7
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < SEGMENT_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Single-bit mask value for this segment
    pub const fn bit(self) -> u8 {
        1 << self.0
    }

    /// Static shape of this segment
    pub fn shape(self) -> &'static SegmentShape {
        &SEGMENTS[self.0 as usize]
    }
}

/// Visible and collapsed rectangles of one segment (quadrant-local)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentShape {
    pub id: SegmentId,
    /// Rectangle while shown
    pub visible: Rectangle,
    /// Zero-area rectangle while hidden
    pub collapsed: Rectangle,
}

impl SegmentShape {
    /// Rectangle the segment rests at in the given state
    pub const fn resting(&self, shown: bool) -> Rectangle {
        if shown { self.visible } else { self.collapsed }
    }
}

/// Geometry table indexed by segment id
pub static SEGMENTS: [SegmentShape; SEGMENT_COUNT] = [
    SegmentShape {
        id: SegmentId(0),
        visible: rect(29, 0, 4, 29),
        collapsed: rect(29, 29, 4, 0),
    },
    SegmentShape {
        id: SegmentId(1),
        visible: rect(33, 53, 4, 29),
        collapsed: rect(33, 57, 4, 0),
    },
    SegmentShape {
        id: SegmentId(2),
        visible: rect(33, 53, 37, 4),
        collapsed: rect(37, 53, 0, 4),
    },
    SegmentShape {
        id: SegmentId(3),
        visible: rect(33, 25, 4, 32),
        collapsed: rect(33, 53, 4, 0),
    },
    SegmentShape {
        id: SegmentId(4),
        visible: rect(0, 53, 37, 4),
        collapsed: rect(33, 53, 0, 4),
    },
    SegmentShape {
        id: SegmentId(5),
        visible: rect(33, 25, 37, 4),
        collapsed: rect(37, 25, 0, 4),
    },
    SegmentShape {
        id: SegmentId(6),
        visible: rect(33, 0, 4, 29),
        collapsed: rect(33, 25, 4, 0),
    },
    SegmentShape {
        id: SegmentId(7),
        visible: rect(0, 25, 37, 4),
        collapsed: rect(33, 25, 0, 4),
    },
];

/// The two dots drawn in every quadrant
pub const POINTS: [Rectangle; POINT_COUNT] = [rect(33, 25, 4, 4), rect(33, 53, 4, 4)];

// ---------------------------------------------------------------------------
// Quadrants
// ---------------------------------------------------------------------------

/// Screen quarter showing one digit of HH:MM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuadrantPosition {
    /// Hour tens
    TopLeft,
    /// Hour units
    TopRight,
    /// Minute tens
    BottomLeft,
    /// Minute units
    BottomRight,
}

impl QuadrantPosition {
    /// Quadrants in digit order (HH then MM)
    pub const ALL: [QuadrantPosition; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Screen rectangle of this quadrant
    pub const fn bounds(self) -> Rectangle {
        match self {
            Self::TopLeft => rect(0, 0, QUADRANT_WIDTH_PX, QUADRANT_HEIGHT_PX),
            Self::TopRight => rect(74, 0, QUADRANT_WIDTH_PX, QUADRANT_HEIGHT_PX),
            Self::BottomLeft => rect(0, 86, QUADRANT_WIDTH_PX, QUADRANT_HEIGHT_PX),
            Self::BottomRight => rect(74, 86, QUADRANT_WIDTH_PX, QUADRANT_HEIGHT_PX),
        }
    }

    /// Position of this quadrant's digit within HH:MM
    pub const fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomLeft => 2,
            Self::BottomRight => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(outer: &Rectangle, inner: &Rectangle) -> bool {
        let outer_br = outer.top_left + outer.size;
        let inner_br = inner.top_left + inner.size;
        inner.top_left.x >= outer.top_left.x
            && inner.top_left.y >= outer.top_left.y
            && inner_br.x <= outer_br.x
            && inner_br.y <= outer_br.y
    }

    #[test]
    fn test_table_is_indexed_by_id() {
        for (i, shape) in SEGMENTS.iter().enumerate() {
            assert_eq!(shape.id.index(), i);
            assert_eq!(SegmentId::ALL[i].shape(), shape);
        }
    }

    #[test]
    fn test_collapsed_rectangles_have_zero_area() {
        for shape in &SEGMENTS {
            let size = shape.collapsed.size;
            assert_eq!(size.width * size.height, 0, "segment {:?}", shape.id);
            assert!(!shape.visible.is_zero_sized());
        }
    }

    #[test]
    fn test_segments_fit_inside_quadrant() {
        let local = rect(0, 0, QUADRANT_WIDTH_PX, QUADRANT_HEIGHT_PX);
        for shape in &SEGMENTS {
            assert!(contains(&local, &shape.visible), "segment {:?}", shape.id);
            assert!(contains(&local, &shape.collapsed), "segment {:?}", shape.id);
        }
        for point in &POINTS {
            assert!(contains(&local, point));
        }
    }

    #[test]
    fn test_quadrants_tile_screen_around_cross() {
        for position in QuadrantPosition::ALL {
            let bounds = position.bounds();
            assert!(contains(&SCREEN_BOUNDS, &bounds));
            for bar in &CROSS_BARS {
                assert!(bounds.intersection(bar).is_zero_sized());
            }
        }
    }

    #[test]
    fn test_segment_id_bounds() {
        assert_eq!(SegmentId::new(7).map(SegmentId::bit), Some(0b1000_0000));
        assert_eq!(SegmentId::new(8), None);
    }
}
