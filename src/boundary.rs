//! 3×3 neighborhood sampling with reflect-without-edge-duplication.
//!
//! ```text
//!  a b c
//!  d e f
//!  g h i
//! ```
//!
//! A missing row or column beyond the plane edge is replaced by the one on
//! the opposite side of the center, never by the edge itself: at `y == 0` the
//! row above is row 1, at `x == width - 1` the right column is `width - 2`.
//! Every variant goes through these helpers at plane edges.

use imgref::ImgRef;

/// Index of the row above `y`.
#[inline(always)]
#[must_use]
pub const fn above(y: usize, height: usize) -> usize {
    debug_assert!(height >= 2);
    if y == 0 { 1 } else { y - 1 }
}

/// Index of the row below `y`.
#[inline(always)]
#[must_use]
pub const fn below(y: usize, height: usize) -> usize {
    debug_assert!(height >= 2);
    if y + 1 == height { y - 1 } else { y + 1 }
}

/// Index of the column left of `x`.
#[inline(always)]
#[must_use]
pub const fn left(x: usize, width: usize) -> usize {
    above(x, width)
}

/// Index of the column right of `x`.
#[inline(always)]
#[must_use]
pub const fn right(x: usize, width: usize) -> usize {
    below(x, width)
}

/// The nine samples around one output pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighborhood<T> {
    /// Above-left.
    pub a: T,
    /// Above.
    pub b: T,
    /// Above-right.
    pub c: T,
    /// Left.
    pub d: T,
    /// Center.
    pub e: T,
    /// Right.
    pub f: T,
    /// Below-left.
    pub g: T,
    /// Below.
    pub h: T,
    /// Below-right.
    pub i: T,
}

impl<T: Copy> Neighborhood<T> {
    /// Samples in row-major order `[a, b, c, d, e, f, g, h, i]`.
    #[must_use]
    pub fn to_array(&self) -> [T; 9] {
        [
            self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h, self.i,
        ]
    }
}

/// The source rows feeding one output row, with top/bottom reflection
/// already applied.
#[derive(Debug, Clone, Copy)]
pub struct RowWindow<'a, T> {
    /// Row above (row 1 when on the first row).
    pub above: &'a [T],
    /// Row being filtered.
    pub center: &'a [T],
    /// Row below (row `height - 2` when on the last row).
    pub below: &'a [T],
}

impl<'a, T: Copy> RowWindow<'a, T> {
    /// Picks the rows around `y` out of a strided buffer.
    ///
    /// # Panics
    /// Panics if a selected row extends past the end of `buf`.
    #[inline]
    #[must_use]
    pub fn new(buf: &'a [T], stride: usize, width: usize, height: usize, y: usize) -> Self {
        let row = |r: usize| &buf[r * stride..r * stride + width];
        Self {
            above: row(above(y, height)),
            center: row(y),
            below: row(below(y, height)),
        }
    }

    /// Plane width.
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> usize {
        self.center.len()
    }

    /// Neighborhood of column `x`, mirroring at the left and right edges.
    #[inline(always)]
    #[must_use]
    pub fn neighborhood(&self, x: usize) -> Neighborhood<T> {
        let width = self.width();
        let l = left(x, width);
        let r = right(x, width);
        Neighborhood {
            a: self.above[l],
            b: self.above[x],
            c: self.above[r],
            d: self.center[l],
            e: self.center[x],
            f: self.center[r],
            g: self.below[l],
            h: self.below[x],
            i: self.below[r],
        }
    }

    /// Neighborhood of an interior column (`0 < x < width - 1`), no mirroring.
    #[inline(always)]
    #[must_use]
    pub fn interior(&self, x: usize) -> Neighborhood<T> {
        Neighborhood {
            a: self.above[x - 1],
            b: self.above[x],
            c: self.above[x + 1],
            d: self.center[x - 1],
            e: self.center[x],
            f: self.center[x + 1],
            g: self.below[x - 1],
            h: self.below[x],
            i: self.below[x + 1],
        }
    }
}

/// Extracts the neighborhood of `(x, y)` from a plane.
///
/// # Panics
/// Panics if the plane is smaller than 2×2 or `(x, y)` is outside it.
#[must_use]
pub fn neighborhood<T: Copy>(plane: ImgRef<'_, T>, x: usize, y: usize) -> Neighborhood<T> {
    let (width, height) = (plane.width(), plane.height());
    assert!(width >= 2 && height >= 2, "plane must be at least 2x2");
    assert!(x < width && y < height, "({x}, {y}) outside {width}x{height}");
    RowWindow::new(plane.buf(), plane.stride(), width, height, y).neighborhood(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgref::Img;

    /// Sample value encodes its own coordinates: 10 * y + x.
    fn coordinate_plane(width: usize, height: usize) -> Vec<u16> {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (10 * y + x) as u16))
            .collect()
    }

    fn expected(x: usize, y: usize, width: usize, height: usize) -> [u16; 9] {
        let at = |cx: usize, cy: usize| (10 * cy + cx) as u16;
        let (u, dn) = (above(y, height), below(y, height));
        let (l, r) = (left(x, width), right(x, width));
        [
            at(l, u),
            at(x, u),
            at(r, u),
            at(l, y),
            at(x, y),
            at(r, y),
            at(l, dn),
            at(x, dn),
            at(r, dn),
        ]
    }

    #[test]
    fn test_mirror_indices() {
        assert_eq!(above(0, 5), 1);
        assert_eq!(above(3, 5), 2);
        assert_eq!(below(4, 5), 3);
        assert_eq!(below(2, 5), 3);
        assert_eq!(left(0, 3), 1);
        assert_eq!(right(2, 3), 1);
        assert_eq!(right(1, 3), 2);
    }

    #[test]
    fn test_corners() {
        let (w, h) = (5, 4);
        let buf = coordinate_plane(w, h);
        let plane = Img::new(&buf[..], w, h);

        // top-left mirrors to row 1 / column 1
        let n = neighborhood(plane, 0, 0);
        assert_eq!(n.to_array(), [11, 10, 11, 1, 0, 1, 11, 10, 11]);

        // top-right
        let n = neighborhood(plane, 4, 0);
        assert_eq!(n.to_array(), [13, 14, 13, 3, 4, 3, 13, 14, 13]);

        // bottom-left
        let n = neighborhood(plane, 0, 3);
        assert_eq!(n.to_array(), [21, 20, 21, 31, 30, 31, 21, 20, 21]);

        // bottom-right
        let n = neighborhood(plane, 4, 3);
        assert_eq!(n.to_array(), [23, 24, 23, 33, 34, 33, 23, 24, 23]);
    }

    #[test]
    fn test_every_position_matches_rule() {
        for (w, h) in [(3, 3), (4, 7), (9, 5), (17, 3)] {
            let buf = coordinate_plane(w, h);
            let plane = Img::new(&buf[..], w, h);
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(
                        neighborhood(plane, x, y).to_array(),
                        expected(x, y, w, h),
                        "{w}x{h} at ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_edges_never_duplicate_edge_sample() {
        let (w, h) = (6, 6);
        let buf = coordinate_plane(w, h);
        let plane = Img::new(&buf[..], w, h);
        for x in 0..w {
            let top = neighborhood(plane, x, 0);
            assert_ne!(top.b, top.e, "top edge at {x}");
            let bottom = neighborhood(plane, x, h - 1);
            assert_ne!(bottom.h, bottom.e, "bottom edge at {x}");
        }
        for y in 0..h {
            let l = neighborhood(plane, 0, y);
            assert_ne!(l.d, l.e, "left edge at {y}");
            let r = neighborhood(plane, w - 1, y);
            assert_ne!(r.f, r.e, "right edge at {y}");
        }
    }

    #[test]
    fn test_strided_plane() {
        let (w, h, stride) = (4, 3, 8);
        let mut buf = vec![999u16; stride * h];
        for y in 0..h {
            for x in 0..w {
                buf[y * stride + x] = (10 * y + x) as u16;
            }
        }
        let plane = Img::new_stride(&buf[..], w, h, stride);
        for y in 0..h {
            for x in 0..w {
                let n = neighborhood(plane, x, y);
                assert!(!n.to_array().contains(&999), "padding read at ({x}, {y})");
                assert_eq!(n.to_array(), expected(x, y, w, h));
            }
        }
    }

    #[test]
    fn test_interior_matches_neighborhood() {
        let (w, h) = (7, 3);
        let buf = coordinate_plane(w, h);
        let window = RowWindow::new(&buf, w, w, h, 1);
        for x in 1..w - 1 {
            assert_eq!(window.interior(x), window.neighborhood(x));
        }
    }
}
