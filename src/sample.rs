//! Sample storage types.
//!
//! One kernel shape serves all three storage types. Integer samples widen to
//! `i32` for the soft min/max sums and round-and-clamp on the way out; float
//! samples stay `f32` throughout and are stored unclamped.

use core::ops::Sub;

use num_traits::{AsPrimitive, Zero};

use crate::dispatch::{PlaneFilters, PlaneFn};
use crate::format::SampleKind;

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
}

/// A plane sample type the sharpening kernels accept.
///
/// Implemented for `u8`, `u16` and `f32`; sealed.
pub trait Sample: private::Sealed + Copy + Default + Send + Sync + 'static {
    /// Storage kind this type corresponds to.
    const KIND: SampleKind;

    /// Intermediate type for the soft min/max sums (`i32` or `f32`).
    type Wide: Copy + PartialOrd + Zero + Sub<Output = Self::Wide> + AsPrimitive<f32>;

    /// Widens a sample without loss.
    fn widen(self) -> Self::Wide;

    /// Converts the (integral, for integer kinds) signal limit to the wide type.
    fn wide_limit(limit: f32) -> Self::Wide;

    /// Sample value as `f32`. Exact for every supported kind.
    #[inline(always)]
    fn to_f32(self) -> f32 {
        self.widen().as_()
    }

    /// Rounds half up and clamps to `[0, peak]` for integers; identity for floats.
    fn finish(value: f32, peak: i32) -> Self;

    /// Picks this kind's plane filter out of a dispatch table.
    fn plane_filter(filters: &PlaneFilters) -> PlaneFn<Self>;
}

impl Sample for u8 {
    const KIND: SampleKind = SampleKind::U8;
    type Wide = i32;

    #[inline(always)]
    fn widen(self) -> i32 {
        i32::from(self)
    }

    #[inline(always)]
    fn wide_limit(limit: f32) -> i32 {
        limit as i32
    }

    #[inline(always)]
    fn finish(value: f32, peak: i32) -> Self {
        ((value + 0.5) as i32).clamp(0, peak) as u8
    }

    fn plane_filter(filters: &PlaneFilters) -> PlaneFn<Self> {
        filters.u8
    }
}

impl Sample for u16 {
    const KIND: SampleKind = SampleKind::U16;
    type Wide = i32;

    #[inline(always)]
    fn widen(self) -> i32 {
        i32::from(self)
    }

    #[inline(always)]
    fn wide_limit(limit: f32) -> i32 {
        limit as i32
    }

    #[inline(always)]
    fn finish(value: f32, peak: i32) -> Self {
        ((value + 0.5) as i32).clamp(0, peak) as u16
    }

    fn plane_filter(filters: &PlaneFilters) -> PlaneFn<Self> {
        filters.u16
    }
}

impl Sample for f32 {
    const KIND: SampleKind = SampleKind::F32;
    type Wide = f32;

    #[inline(always)]
    fn widen(self) -> f32 {
        self
    }

    #[inline(always)]
    fn wide_limit(limit: f32) -> f32 {
        limit
    }

    #[inline(always)]
    fn finish(value: f32, _peak: i32) -> Self {
        value
    }

    fn plane_filter(filters: &PlaneFilters) -> PlaneFn<Self> {
        filters.f32
    }
}
