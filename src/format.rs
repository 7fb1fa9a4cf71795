//! Host frame description.
//!
//! The host pipeline owns frame allocation; this module only describes the
//! layout so the session can validate it up front and derive per-plane sizes.

use crate::error::CasError;

/// Colour family of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    /// Single luma plane.
    Gray,
    /// Luma plus two zero-centered chroma planes.
    Yuv,
    /// Three independent colour planes.
    Rgb,
}

/// How samples are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// Unsigned integer samples.
    Integer,
    /// IEEE float samples.
    Float,
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
        }
    }
}

/// Storage type of a plane's samples, as seen by the kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// `u8` storage (8 bit).
    U8,
    /// `u16` storage (9 to 16 bit).
    U16,
    /// `f32` storage.
    F32,
}

impl SampleKind {
    /// Returns true for floating point storage.
    #[inline]
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32)
    }
}

/// Layout of every frame the session will process.
///
/// `width`/`height` describe plane 0. Chroma planes (index > 0) of YUV
/// formats are shifted right by the subsampling amounts. A zero width or
/// height marks a variable-size clip, which is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    /// Colour family.
    pub color_family: ColorFamily,
    /// Integer or float samples.
    pub sample_type: SampleType,
    /// Significant bits per sample.
    pub bits_per_sample: u32,
    /// log2 horizontal chroma subsampling.
    pub subsampling_w: u32,
    /// log2 vertical chroma subsampling.
    pub subsampling_h: u32,
    /// Frame width in samples.
    pub width: usize,
    /// Frame height in samples.
    pub height: usize,
}

impl FrameFormat {
    /// 4:4:4-style format with no subsampling.
    #[must_use]
    pub fn new(
        color_family: ColorFamily,
        sample_type: SampleType,
        bits_per_sample: u32,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            color_family,
            sample_type,
            bits_per_sample,
            subsampling_w: 0,
            subsampling_h: 0,
            width,
            height,
        }
    }

    /// Sets chroma subsampling shifts.
    #[must_use]
    pub fn with_subsampling(mut self, subsampling_w: u32, subsampling_h: u32) -> Self {
        self.subsampling_w = subsampling_w;
        self.subsampling_h = subsampling_h;
        self
    }

    /// Number of planes in a frame.
    #[must_use]
    pub fn num_planes(&self) -> usize {
        match self.color_family {
            ColorFamily::Gray => 1,
            ColorFamily::Yuv | ColorFamily::Rgb => 3,
        }
    }

    /// Width and height of `plane`.
    #[must_use]
    pub fn plane_size(&self, plane: usize) -> (usize, usize) {
        if plane == 0 {
            (self.width, self.height)
        } else {
            (
                self.width >> self.subsampling_w,
                self.height >> self.subsampling_h,
            )
        }
    }

    /// Resolves the storage type, rejecting anything the kernels cannot handle.
    pub fn sample_kind(&self) -> Result<SampleKind, CasError> {
        if self.width == 0 || self.height == 0 {
            return Err(CasError::VariableFormat);
        }
        match (self.sample_type, self.bits_per_sample) {
            (SampleType::Integer, 8) => Ok(SampleKind::U8),
            (SampleType::Integer, 9..=16) => Ok(SampleKind::U16),
            (SampleType::Float, 32) => Ok(SampleKind::F32),
            (sample_type, bits_per_sample) => Err(CasError::UnsupportedFormat {
                sample_type,
                bits_per_sample,
            }),
        }
    }
}
