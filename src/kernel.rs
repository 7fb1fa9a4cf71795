//! Scalar contrast adaptive sharpening kernel.
//!
//! ```text
//!  soft min/max (2x, unnormalized):     filter shape:
//!   a b c             b                   0 w 0
//!   d e f * 0.5  +  d e f * 0.5           w 1 w
//!   g h i             h                   0 w 0
//! ```
//!
//! The vector kernels in [`crate::simd`] perform the same operations in the
//! same order, so for a given neighborhood every variant produces the same
//! `f32`.

use num_traits::AsPrimitive;

use crate::boundary::Neighborhood;
use crate::config::KernelParams;
use crate::sample::Sample;

#[inline(always)]
fn min<W: PartialOrd>(a: W, b: W) -> W {
    if b < a { b } else { a }
}

#[inline(always)]
fn max<W: PartialOrd>(a: W, b: W) -> W {
    if b > a { b } else { a }
}

/// Sharpened value of the center sample, before rounding or clamping.
///
/// Soft min/max are summed in the sample's wide type; everything from the
/// amplitude onward is `f32`.
#[inline(always)]
#[must_use]
pub fn sharpen_pixel<T: Sample>(n: &Neighborhood<T>, params: &KernelParams) -> f32 {
    let [a, b, c, d, e, f, g, h, i] = n.to_array().map(T::widen);

    let mn = min(min(min(min(d, e), f), b), h);
    let mn2 = min(min(min(min(mn, a), c), g), i);
    let mn = mn + mn2;

    let mx = max(max(max(max(d, e), f), b), h);
    let mx2 = max(max(max(max(mx, a), c), g), i);
    let mx = mx + mx2;

    let (headroom, soft_max): (f32, f32) = if T::KIND.is_float() {
        let mn = mn.as_() + params.chroma_offset;
        let mx = mx.as_() + params.chroma_offset;
        (min(mn, params.signal_limit - mx), mx)
    } else {
        let limit = T::wide_limit(params.signal_limit);
        (min(mn, limit - mx).as_(), mx.as_())
    };

    let amp = amplitude(headroom, soft_max);
    let weight = amp * params.edge_weight_scale;
    let cross: f32 = (b + d + f + h).as_();
    let center: f32 = e.as_();
    (cross * weight + center) / (1.0 + 4.0 * weight)
}

/// `sqrt(clamp(headroom / soft_max, 0, 1))`, zero when `soft_max` is zero.
#[inline(always)]
#[must_use]
pub fn amplitude(headroom: f32, soft_max: f32) -> f32 {
    if soft_max == 0.0 {
        return 0.0;
    }
    (headroom / soft_max).max(0.0).min(1.0).sqrt()
}
