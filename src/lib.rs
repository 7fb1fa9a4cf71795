//! Contrast Adaptive Sharpening (CAS) for planar video frames.
//!
//! Each output sample is the center of its 3×3 neighborhood pushed away
//! from the four edge-adjacent neighbors by a negative weight. The weight
//! shrinks where local contrast is already high or the signal is close to
//! its ceiling, so edges are sharpened without ringing into clipping.
//!
//! # Module Organization
//!
//! - [`config`] - Parameters, validation and the per-session resolved state
//! - [`kernel`] - The per-pixel sharpening formula
//! - [`boundary`] - Neighborhood sampling with edge reflection
//! - [`scalar`] - One pixel at a time plane filter
//! - [`dispatch`] - CPU capabilities and variant selection
//!
//! Vectorized 4/8/16-column variants are picked through [`Variant`] and
//! produce the same output as the scalar path.
//!
//! # Quick Start
//!
//! ```rust
//! use cas::{CasParams, ColorFamily, CpuFlags, FrameFormat, Img, SampleType, SessionConfig};
//!
//! let format = FrameFormat::new(ColorFamily::Gray, SampleType::Integer, 8, 3, 3);
//! let params = CasParams::new().with_sharpness(0.5);
//! let cas = SessionConfig::new(&format, &params, CpuFlags::detect()).unwrap();
//!
//! let src: [u8; 9] = [10, 20, 10, 20, 100, 20, 10, 20, 10];
//! let mut dst = [0u8; 9];
//! cas.process_plane(0, Img::new(&src[..], 3, 3), Img::new(&mut dst[..], 3, 3));
//! assert_eq!(dst[4], 114);
//! ```
//!
//! # Choosing a Variant
//!
//! | Selector | Variant |
//! |----------|---------|
//! | 0 | widest supported by the [`CpuFlags`] passed in |
//! | 1 | [`Variant::Scalar`] |
//! | 2 | [`Variant::X4`] (SSE2/NEON class) |
//! | 3 | [`Variant::X8`] (AVX2 class) |
//! | 4 | [`Variant::X16`] (AVX-512 class) |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod boundary;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod kernel;
pub mod plane;
mod process;
pub mod sample;
pub mod scalar;
mod simd;

pub use boundary::{Neighborhood, neighborhood};
pub use config::{CasParams, DEFAULT_SHARPNESS, KernelParams, SessionConfig};
pub use dispatch::{CpuFlags, Variant};
pub use error::CasError;
pub use format::{ColorFamily, FrameFormat, SampleKind, SampleType};
pub use imgref::{Img, ImgRef, ImgRefMut, ImgVec};
pub use kernel::sharpen_pixel;
pub use plane::PlaneLayout;
pub use sample::Sample;
