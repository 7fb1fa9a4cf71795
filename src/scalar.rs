//! Scalar (one pixel at a time) plane filter.
//!
//! This is the reference every vector variant is measured against.

use crate::boundary::RowWindow;
use crate::config::KernelParams;
use crate::kernel::sharpen_pixel;
use crate::plane::{PlaneLayout, for_each_row};
use crate::sample::Sample;

/// Sharpens every sample of `src` into `dst`.
///
/// # Panics
/// Panics if the plane is smaller than 3×3 or a buffer is too short for
/// `layout`.
pub fn filter_plane<T: Sample>(params: &KernelParams, layout: PlaneLayout, src: &[T], dst: &mut [T]) {
    for_each_row(layout, src, dst, |window, out| filter_row(params, window, out));
}

/// Sharpens one row. Only the first and last columns need mirroring.
#[inline]
pub(crate) fn filter_row<T: Sample>(params: &KernelParams, window: &RowWindow<'_, T>, out: &mut [T]) {
    let last = window.width() - 1;
    let peak = params.peak;

    out[0] = T::finish(sharpen_pixel(&window.neighborhood(0), params), peak);
    for (x, o) in out.iter_mut().enumerate().take(last).skip(1) {
        *o = T::finish(sharpen_pixel(&window.interior(x), params), peak);
    }
    out[last] = T::finish(sharpen_pixel(&window.neighborhood(last), params), peak);
}
