//! Vectorized plane filters using the `wide` crate.
//!
//! Each row is processed in batches of 4, 8 or 16 columns. The first batch
//! (which holds column 0) and the last, possibly partial, batch (which holds
//! column `width - 1`) are gathered through [`RowWindow::neighborhood`] so
//! they share the scalar edge mirroring. Every batch in between is loaded
//! straight from the three source rows. Nothing past `width` is read, so row
//! padding never leaks into the output.
//!
//! The per-lane arithmetic mirrors [`crate::kernel::sharpen_pixel`] operation
//! for operation. Uses runtime dispatch via multiversed for the best
//! instruction set available.

use core::ops::{Add, Div, Mul, Sub};

use multiversed::multiversed;
use wide::{CmpEq, f32x4, f32x8};

use crate::boundary::RowWindow;
use crate::config::KernelParams;
use crate::plane::{PlaneLayout, for_each_row};
use crate::sample::Sample;

/// A fixed-width vector of `f32` lanes.
pub(crate) trait Lanes:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    const LANES: usize;
    type Array: Copy + Default + AsRef<[f32]> + AsMut<[f32]>;

    fn splat(v: f32) -> Self;
    fn from_array(a: Self::Array) -> Self;
    fn to_array(self) -> Self::Array;
    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;
    fn sqrt(self) -> Self;
    /// `if_zero` in lanes where `self == 0`, `otherwise` elsewhere.
    fn zero_select(self, if_zero: Self, otherwise: Self) -> Self;
}

macro_rules! impl_lanes {
    ($ty:ty, $n:literal) => {
        impl Lanes for $ty {
            const LANES: usize = $n;
            type Array = [f32; $n];

            #[inline(always)]
            fn splat(v: f32) -> Self {
                <$ty>::splat(v)
            }
            #[inline(always)]
            fn from_array(a: [f32; $n]) -> Self {
                <$ty>::from(a)
            }
            #[inline(always)]
            fn to_array(self) -> [f32; $n] {
                self.into()
            }
            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                <$ty>::min(self, rhs)
            }
            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                <$ty>::max(self, rhs)
            }
            #[inline(always)]
            fn sqrt(self) -> Self {
                <$ty>::sqrt(self)
            }
            #[inline(always)]
            fn zero_select(self, if_zero: Self, otherwise: Self) -> Self {
                self.simd_eq(<$ty>::splat(0.0)).blend(if_zero, otherwise)
            }
        }
    };
}

impl_lanes!(f32x4, 4);
impl_lanes!(f32x8, 8);

/// Sixteen lanes as a pair of `f32x8` halves.
#[derive(Clone, Copy, Debug)]
pub(crate) struct F32x16(f32x8, f32x8);

macro_rules! impl_pair_op {
    ($tr:ident, $method:ident) => {
        impl $tr for F32x16 {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self(self.0.$method(rhs.0), self.1.$method(rhs.1))
            }
        }
    };
}

impl_pair_op!(Add, add);
impl_pair_op!(Sub, sub);
impl_pair_op!(Mul, mul);
impl_pair_op!(Div, div);

impl Lanes for F32x16 {
    const LANES: usize = 16;
    type Array = [f32; 16];

    #[inline(always)]
    fn splat(v: f32) -> Self {
        Self(f32x8::splat(v), f32x8::splat(v))
    }
    #[inline(always)]
    fn from_array(a: [f32; 16]) -> Self {
        let mut lo = [0.0f32; 8];
        let mut hi = [0.0f32; 8];
        lo.copy_from_slice(&a[..8]);
        hi.copy_from_slice(&a[8..]);
        Self(f32x8::from(lo), f32x8::from(hi))
    }
    #[inline(always)]
    fn to_array(self) -> [f32; 16] {
        let lo: [f32; 8] = self.0.into();
        let hi: [f32; 8] = self.1.into();
        let mut out = [0.0f32; 16];
        out[..8].copy_from_slice(&lo);
        out[8..].copy_from_slice(&hi);
        out
    }
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(Lanes::min(self.0, rhs.0), Lanes::min(self.1, rhs.1))
    }
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(Lanes::max(self.0, rhs.0), Lanes::max(self.1, rhs.1))
    }
    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(Lanes::sqrt(self.0), Lanes::sqrt(self.1))
    }
    #[inline(always)]
    fn zero_select(self, if_zero: Self, otherwise: Self) -> Self {
        Self(
            self.0.zero_select(if_zero.0, otherwise.0),
            self.1.zero_select(if_zero.1, otherwise.1),
        )
    }
}

/// The nine neighborhood taps of `L::LANES` adjacent columns.
#[derive(Clone, Copy)]
struct Taps<L> {
    a: L,
    b: L,
    c: L,
    d: L,
    e: L,
    f: L,
    g: L,
    h: L,
    i: L,
}

impl<L: Lanes> Taps<L> {
    #[inline(always)]
    fn from_arrays(taps: [L::Array; 9]) -> Self {
        let [a, b, c, d, e, f, g, h, i] = taps.map(L::from_array);
        Self {
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            h,
            i,
        }
    }

    /// Columns `x..x + LANES` with all neighbors inside the row.
    #[inline(always)]
    fn load<T: Sample>(window: &RowWindow<'_, T>, x: usize) -> Self {
        Self {
            a: load(window.above, x - 1),
            b: load(window.above, x),
            c: load(window.above, x + 1),
            d: load(window.center, x - 1),
            e: load(window.center, x),
            f: load(window.center, x + 1),
            g: load(window.below, x - 1),
            h: load(window.below, x),
            i: load(window.below, x + 1),
        }
    }

    /// Columns `x..x + count` through the mirroring accessor; unused lanes
    /// are zero.
    #[inline(always)]
    fn gather<T: Sample>(window: &RowWindow<'_, T>, x: usize, count: usize) -> Self {
        let mut taps = [L::Array::default(); 9];
        for lane in 0..count {
            let n = window.neighborhood(x + lane);
            for (tap, s) in taps.iter_mut().zip(n.to_array()) {
                tap.as_mut()[lane] = s.to_f32();
            }
        }
        Self::from_arrays(taps)
    }
}

#[inline(always)]
fn load<T: Sample, L: Lanes>(row: &[T], x: usize) -> L {
    let mut lanes = L::Array::default();
    for (dst, &s) in lanes.as_mut().iter_mut().zip(&row[x..x + L::LANES]) {
        *dst = s.to_f32();
    }
    L::from_array(lanes)
}

#[inline(always)]
fn store<T: Sample, L: Lanes>(result: L, out: &mut [T], peak: i32) {
    for (o, &v) in out.iter_mut().zip(result.to_array().as_ref()) {
        *o = T::finish(v, peak);
    }
}

/// Sharpens `L::LANES` columns at once.
#[inline(always)]
fn sharpen_lanes<L: Lanes>(t: &Taps<L>, params: &KernelParams, float: bool) -> L {
    let mn = t.d.min(t.e).min(t.f).min(t.b).min(t.h);
    let mn2 = mn.min(t.a).min(t.c).min(t.g).min(t.i);
    let mut mn = mn + mn2;

    let mx = t.d.max(t.e).max(t.f).max(t.b).max(t.h);
    let mx2 = mx.max(t.a).max(t.c).max(t.g).max(t.i);
    let mut mx = mx + mx2;

    if float {
        let offset = L::splat(params.chroma_offset);
        mn = mn + offset;
        mx = mx + offset;
    }

    let zero = L::splat(0.0);
    let one = L::splat(1.0);
    let headroom = mn.min(L::splat(params.signal_limit) - mx);
    // 0/0 lanes are discarded by the select
    let amp = mx
        .zero_select(zero, (headroom / mx).max(zero).min(one))
        .sqrt();
    let weight = amp * L::splat(params.edge_weight_scale);
    let cross = t.b + t.d + t.f + t.h;
    (cross * weight + t.e) / (one + L::splat(4.0) * weight)
}

#[inline(always)]
fn filter_row<T: Sample, L: Lanes>(params: &KernelParams, window: &RowWindow<'_, T>, out: &mut [T]) {
    let width = window.width();
    let float = T::KIND.is_float();
    let peak = params.peak;

    // Leading batch holds column 0 (and is the whole row when narrower).
    let head = width.min(L::LANES);
    let taps = Taps::<L>::gather(window, 0, head);
    store(sharpen_lanes(&taps, params, float), &mut out[..head], peak);

    let mut x = head;
    while x + L::LANES < width {
        let taps = Taps::<L>::load(window, x);
        store(sharpen_lanes(&taps, params, float), &mut out[x..x + L::LANES], peak);
        x += L::LANES;
    }

    // Trailing batch holds column width - 1.
    if x < width {
        let taps = Taps::<L>::gather(window, x, width - x);
        store(sharpen_lanes(&taps, params, float), &mut out[x..], peak);
    }
}

macro_rules! plane_filters {
    ($($name:ident: $t:ty, $lanes:ty;)*) => {$(
        #[multiversed]
        #[inline]
        pub fn $name(params: &KernelParams, layout: PlaneLayout, src: &[$t], dst: &mut [$t]) {
            for_each_row(layout, src, dst, |window, out| {
                filter_row::<$t, $lanes>(params, window, out)
            });
        }
    )*};
}

plane_filters! {
    filter_plane_x4_u8: u8, f32x4;
    filter_plane_x4_u16: u16, f32x4;
    filter_plane_x4_f32: f32, f32x4;
    filter_plane_x8_u8: u8, f32x8;
    filter_plane_x8_u16: u16, f32x8;
    filter_plane_x8_f32: f32, f32x8;
    filter_plane_x16_u8: u8, F32x16;
    filter_plane_x16_u16: u16, F32x16;
    filter_plane_x16_f32: f32, F32x16;
}
