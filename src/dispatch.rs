//! Implementation selection.
//!
//! Every [`Variant`] implements the same plane scan; they differ only in how
//! many columns are filtered per step. The choice is made once, when the
//! [`SessionConfig`](crate::SessionConfig) is built, from an explicit selector
//! and a [`CpuFlags`] value. Detection is never consulted implicitly, so
//! callers (and tests) can force any variant on any machine: the `wide`
//! vector types fall back to portable code where the instructions are
//! missing.

use bitflags::bitflags;

use crate::config::KernelParams;
use crate::error::CasError;
use crate::plane::PlaneLayout;
use crate::{scalar, simd};

bitflags! {
    /// SIMD capabilities that influence automatic variant selection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CpuFlags: u32 {
        /// x86 SSE2.
        const SSE2 = 1 << 0;
        /// x86 AVX2 with FMA.
        const AVX2 = 1 << 1;
        /// x86 AVX-512 F/BW/DQ/VL.
        const AVX512 = 1 << 2;
        /// ARM NEON.
        const NEON = 1 << 3;
    }
}

impl CpuFlags {
    /// Queries the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut flags = Self::empty();

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("sse2") {
                flags |= Self::SSE2;
            }
            if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
                flags |= Self::AVX2;
            }
            if is_x86_feature_detected!("avx512f")
                && is_x86_feature_detected!("avx512bw")
                && is_x86_feature_detected!("avx512dq")
                && is_x86_feature_detected!("avx512vl")
            {
                flags |= Self::AVX512;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                flags |= Self::NEON;
            }
        }

        flags
    }
}

/// A plane-scan implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// One pixel at a time (selector 1).
    Scalar,
    /// 4 columns per step, SSE2/NEON class (selector 2).
    X4,
    /// 8 columns per step, AVX2 class (selector 3).
    X8,
    /// 16 columns per step, AVX-512 class (selector 4).
    X16,
}

impl Variant {
    /// All variants, narrowest first.
    pub const ALL: [Self; 4] = [Self::Scalar, Self::X4, Self::X8, Self::X16];

    /// Maps a selector to a variant: 0 picks [`Variant::best_for`] `cpu`,
    /// 1-4 force scalar, X4, X8 and X16.
    ///
    /// # Errors
    /// Returns [`CasError::InvalidVariant`] for any other selector.
    pub fn select(selector: i64, cpu: CpuFlags) -> Result<Self, CasError> {
        match selector {
            0 => Ok(Self::best_for(cpu)),
            1 => Ok(Self::Scalar),
            2 => Ok(Self::X4),
            3 => Ok(Self::X8),
            4 => Ok(Self::X16),
            selector => Err(CasError::InvalidVariant { selector }),
        }
    }

    /// Widest variant the capabilities support.
    #[must_use]
    pub fn best_for(cpu: CpuFlags) -> Self {
        if cpu.contains(CpuFlags::AVX512) {
            Self::X16
        } else if cpu.contains(CpuFlags::AVX2) {
            Self::X8
        } else if cpu.intersects(CpuFlags::SSE2 | CpuFlags::NEON) {
            Self::X4
        } else {
            Self::Scalar
        }
    }

    /// Columns filtered per step.
    #[must_use]
    pub const fn lanes(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X16 => 16,
        }
    }

    /// Plane filters of this variant for every sample kind.
    #[must_use]
    pub fn filters(self) -> PlaneFilters {
        match self {
            Self::Scalar => PlaneFilters {
                u8: scalar::filter_plane::<u8>,
                u16: scalar::filter_plane::<u16>,
                f32: scalar::filter_plane::<f32>,
            },
            Self::X4 => PlaneFilters {
                u8: simd::filter_plane_x4_u8,
                u16: simd::filter_plane_x4_u16,
                f32: simd::filter_plane_x4_f32,
            },
            Self::X8 => PlaneFilters {
                u8: simd::filter_plane_x8_u8,
                u16: simd::filter_plane_x8_u16,
                f32: simd::filter_plane_x8_f32,
            },
            Self::X16 => PlaneFilters {
                u8: simd::filter_plane_x16_u8,
                u16: simd::filter_plane_x16_u16,
                f32: simd::filter_plane_x16_f32,
            },
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::X4 => f.write_str("x4"),
            Self::X8 => f.write_str("x8"),
            Self::X16 => f.write_str("x16"),
        }
    }
}

/// Filters a whole plane from `src` into `dst`.
pub type PlaneFn<T> = fn(&KernelParams, PlaneLayout, &[T], &mut [T]);

/// One variant's plane filters, one per sample kind.
#[derive(Clone, Copy)]
pub struct PlaneFilters {
    pub(crate) u8: PlaneFn<u8>,
    pub(crate) u16: PlaneFn<u16>,
    pub(crate) f32: PlaneFn<f32>,
}

impl std::fmt::Debug for PlaneFilters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaneFilters").finish_non_exhaustive()
    }
}
