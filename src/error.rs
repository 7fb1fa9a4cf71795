//! Construction errors.

use crate::format::SampleType;

/// Error returned when a [`SessionConfig`](crate::SessionConfig) cannot be built.
///
/// Every variant is detected before any frame is processed. Plane processing
/// itself has no error path.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CasError {
    /// Sample format is not 8-16 bit integer or 32 bit float.
    UnsupportedFormat {
        /// Integer or float samples.
        sample_type: SampleType,
        /// Bits per sample reported by the host.
        bits_per_sample: u32,
    },
    /// Frame dimensions are not fixed for the whole clip.
    VariableFormat,
    /// A processed plane is narrower or shorter than 3 samples.
    PlaneTooSmall {
        /// Plane index.
        plane: usize,
        /// Plane width in samples.
        width: usize,
        /// Plane height in samples.
        height: usize,
    },
    /// A requested plane does not exist in the format.
    PlaneOutOfRange {
        /// Requested plane index.
        plane: usize,
        /// Number of planes in the format.
        num_planes: usize,
    },
    /// The same plane was requested more than once.
    DuplicatePlane {
        /// Repeated plane index.
        plane: usize,
    },
    /// Sharpness is outside `[0.0, 1.0]` (or NaN).
    SharpnessOutOfRange {
        /// Value provided.
        sharpness: f32,
    },
    /// Variant selector is not one of 0, 1, 2, 3 or 4.
    InvalidVariant {
        /// Value provided.
        selector: i64,
    },
}

impl std::fmt::Display for CasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat {
                sample_type,
                bits_per_sample,
            } => write!(
                f,
                "unsupported format {bits_per_sample} bit {sample_type}: only constant format 8-16 bit integer and 32 bit float input supported"
            ),
            Self::VariableFormat => {
                write!(f, "only constant format 8-16 bit integer and 32 bit float input supported")
            }
            Self::PlaneTooSmall {
                plane,
                width,
                height,
            } => write!(
                f,
                "plane {plane} is {width}x{height}: every processed plane's width and height must be greater than or equal to 3"
            ),
            Self::PlaneOutOfRange { plane, num_planes } => {
                write!(f, "plane index {plane} out of range (format has {num_planes} planes)")
            }
            Self::DuplicatePlane { plane } => write!(f, "plane {plane} specified twice"),
            Self::SharpnessOutOfRange { sharpness } => write!(
                f,
                "sharpness {sharpness} must be between 0.0 and 1.0 (inclusive)"
            ),
            Self::InvalidVariant { selector } => {
                write!(f, "opt {selector} must be 0, 1, 2, 3, or 4")
            }
        }
    }
}

impl std::error::Error for CasError {}
