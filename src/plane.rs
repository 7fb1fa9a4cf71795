//! Plane geometry and the row loop shared by every variant.

use crate::boundary::RowWindow;

/// Dimensions and strides (in samples) of one source/destination plane pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Samples per row.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Distance between source rows.
    pub src_stride: usize,
    /// Distance between destination rows.
    pub dst_stride: usize,
}

impl PlaneLayout {
    /// Layout of two tightly packed planes.
    #[must_use]
    pub const fn packed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            src_stride: width,
            dst_stride: width,
        }
    }

    /// Minimum buffer length for `height` rows of `width` at `stride`.
    #[inline]
    #[must_use]
    pub const fn required_len(&self, stride: usize) -> usize {
        (self.height - 1) * stride + self.width
    }

    fn check<T>(&self, src: &[T], dst: &[T]) {
        assert!(
            self.width >= 3 && self.height >= 3,
            "plane {}x{} is smaller than 3x3",
            self.width,
            self.height
        );
        assert!(
            self.src_stride >= self.width && self.dst_stride >= self.width,
            "stride shorter than width {}",
            self.width
        );
        assert!(
            src.len() >= self.required_len(self.src_stride),
            "source buffer too short: {} < {}",
            src.len(),
            self.required_len(self.src_stride)
        );
        assert!(
            dst.len() >= self.required_len(self.dst_stride),
            "destination buffer too short: {} < {}",
            dst.len(),
            self.required_len(self.dst_stride)
        );
    }
}

/// Calls `row` for every output row with its reflected source window and the
/// `width` destination samples it must fill. Destination padding is never
/// touched.
///
/// # Panics
/// Panics if the plane is smaller than 3×3 or a buffer is too short for the
/// layout.
#[inline(always)]
pub(crate) fn for_each_row<T: Copy>(
    layout: PlaneLayout,
    src: &[T],
    dst: &mut [T],
    mut row: impl FnMut(&RowWindow<'_, T>, &mut [T]),
) {
    layout.check(src, dst);
    for y in 0..layout.height {
        let window = RowWindow::new(src, layout.src_stride, layout.width, layout.height, y);
        let start = y * layout.dst_stride;
        row(&window, &mut dst[start..start + layout.width]);
    }
}
