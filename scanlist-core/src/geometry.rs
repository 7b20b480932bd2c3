//! Hit testing for the scrollable pane's header strip.
//!
//! Pointer x is relative to the pane viewport; column widths are laid out
//! from the content origin, which sits `scroll_offset` pixels to the left of
//! the viewport when the pane is scrolled horizontally.

/// A pointer position relative to a pane's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Column strip layout at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGeometry {
    widths: Vec<u32>,
    scroll_offset: u32,
    header_height: i32,
}

impl HeaderGeometry {
    pub fn new(widths: Vec<u32>, scroll_offset: u32, header_height: i32) -> Self {
        Self {
            widths,
            scroll_offset,
            header_height,
        }
    }

    pub fn total_width(&self) -> u32 {
        self.widths.iter().sum()
    }

    pub fn in_header(&self, point: Point) -> bool {
        point.y >= 0 && point.y < self.header_height
    }

    fn content_x(&self, x: i32) -> i64 {
        x as i64 + self.scroll_offset as i64
    }

    /// Index of the column under viewport x, if any.
    pub fn column_at(&self, x: i32) -> Option<usize> {
        let cx = self.content_x(x);
        if cx < 0 {
            return None;
        }
        let mut start = 0i64;
        for (i, &w) in self.widths.iter().enumerate() {
            let end = start + w as i64;
            if cx < end {
                return Some(i);
            }
            start = end;
        }
        None
    }

    /// Insertion slot for viewport x: the slot before a column while the
    /// pointer is left of its midpoint, after it otherwise. Past the last
    /// column the slot is the end of the list.
    pub fn insert_index(&self, x: i32) -> usize {
        let cx = self.content_x(x);
        if cx < 0 {
            return 0;
        }
        let mut start = 0i64;
        for (i, &w) in self.widths.iter().enumerate() {
            let w = w as i64;
            if cx < start + w {
                // Compare doubled values to keep odd widths exact.
                return if 2 * cx < 2 * start + w { i } else { i + 1 };
            }
            start += w;
        }
        self.widths.len()
    }

    /// Viewport x of the left edge of slot `index`.
    pub fn slot_x(&self, index: usize) -> i32 {
        let before: u32 = self.widths.iter().take(index).sum();
        (before as i64 - self.scroll_offset as i64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(scroll: u32) -> HeaderGeometry {
        HeaderGeometry::new(vec![100, 100, 70], scroll, 30)
    }

    #[test]
    fn header_band() {
        let g = geometry(0);
        assert!(g.in_header(Point::new(5, 0)));
        assert!(g.in_header(Point::new(5, 29)));
        assert!(!g.in_header(Point::new(5, 30)));
        assert!(!g.in_header(Point::new(5, -1)));
    }

    #[test]
    fn column_hit_testing() {
        let g = geometry(0);
        assert_eq!(g.column_at(0), Some(0));
        assert_eq!(g.column_at(99), Some(0));
        assert_eq!(g.column_at(100), Some(1));
        assert_eq!(g.column_at(269), Some(2));
        assert_eq!(g.column_at(270), None);
        assert_eq!(g.column_at(-1), None);
    }

    #[test]
    fn hit_testing_compensates_scroll() {
        let g = geometry(150);
        assert_eq!(g.column_at(0), Some(1));
        assert_eq!(g.column_at(60), Some(2));
        assert_eq!(g.slot_x(2), 50);
        assert_eq!(g.slot_x(0), -150);
    }

    #[test]
    fn insert_index_uses_midpoints() {
        let g = geometry(0);
        assert_eq!(g.insert_index(10), 0);
        assert_eq!(g.insert_index(49), 0);
        assert_eq!(g.insert_index(50), 1);
        assert_eq!(g.insert_index(149), 1);
        assert_eq!(g.insert_index(150), 2);
        assert_eq!(g.insert_index(240), 3);
        assert_eq!(g.insert_index(500), 3);
        assert_eq!(g.insert_index(-20), 0);
    }

    #[test]
    fn empty_strip() {
        let g = HeaderGeometry::new(Vec::new(), 0, 30);
        assert_eq!(g.column_at(0), None);
        assert_eq!(g.insert_index(0), 0);
        assert_eq!(g.total_width(), 0);
    }
}
