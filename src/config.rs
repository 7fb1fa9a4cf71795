//! Session configuration.
//!
//! [`CasParams`] carries the user-facing knobs. [`SessionConfig::new`]
//! validates them against the host's [`FrameFormat`] and resolves the
//! coefficients every kernel variant reads. Nothing in a `SessionConfig`
//! changes after construction, so one instance can be shared by any number
//! of concurrent plane scans.

use crate::dispatch::{CpuFlags, PlaneFilters, Variant};
use crate::error::CasError;
use crate::format::{ColorFamily, FrameFormat, SampleKind};

/// Sharpness used when none is given.
pub const DEFAULT_SHARPNESS: f32 = 0.5;

/// Blend denominator at sharpness 0.
const WEIGHT_DENOM_SOFT: f32 = 16.0;
/// Blend denominator at sharpness 1.
const WEIGHT_DENOM_HARD: f32 = 5.0;

/// Float samples saturate at a soft max of 2 × 1.0.
const FLOAT_SIGNAL_LIMIT: f32 = 2.0;

/// Negative blend weight scale for a sharpness in `[0, 1]`.
///
/// Interpolates the denominator from 16 down to 5, then inverts and negates,
/// so stronger sharpening yields a larger negative weight.
#[inline]
#[must_use]
pub fn edge_weight_scale(sharpness: f32) -> f32 {
    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    -1.0 / lerp(WEIGHT_DENOM_SOFT, WEIGHT_DENOM_HARD, sharpness)
}

/// Coefficients of one plane scan, shared by every kernel variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    /// Negative weight scale from [`edge_weight_scale`].
    pub edge_weight_scale: f32,
    /// Ceiling of the soft max: `2^(bits+1) - 1` for integers, `2.0` for float.
    pub signal_limit: f32,
    /// Largest storable integer sample; `0` for float.
    pub peak: i32,
    /// Added to float soft min/max of zero-centered chroma planes.
    pub chroma_offset: f32,
}

impl KernelParams {
    /// Resolves the coefficients for one sample format.
    ///
    /// `bits_per_sample` is ignored for float. `chroma` only has an effect on
    /// float planes, since integer chroma is never zero-centered.
    #[must_use]
    pub fn new(sharpness: f32, bits_per_sample: u32, float: bool, chroma: bool) -> Self {
        let (signal_limit, peak) = if float {
            (FLOAT_SIGNAL_LIMIT, 0)
        } else {
            (
                ((2u32 << bits_per_sample) - 1) as f32,
                ((1u32 << bits_per_sample) - 1) as i32,
            )
        };
        Self {
            edge_weight_scale: edge_weight_scale(sharpness),
            signal_limit,
            peak,
            chroma_offset: if float && chroma { 1.0 } else { 0.0 },
        }
    }
}

/// User-facing filter parameters.
///
/// ```rust
/// use cas::CasParams;
///
/// let params = CasParams::new()
///     .with_sharpness(0.8)
///     .with_planes([0, 1, 2])
///     .with_opt(0);
/// assert_eq!(params.sharpness(), 0.8);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CasParams {
    sharpness: f32,
    planes: Option<Vec<usize>>,
    opt: i64,
}

impl Default for CasParams {
    fn default() -> Self {
        Self {
            sharpness: DEFAULT_SHARPNESS,
            planes: None,
            opt: 0,
        }
    }
}

impl CasParams {
    /// Creates parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sharpening strength, `0.0..=1.0`.
    #[must_use]
    pub fn with_sharpness(mut self, sharpness: f32) -> Self {
        self.sharpness = sharpness;
        self
    }

    /// Sets which planes to sharpen.
    ///
    /// An empty list means the default: every plane for RGB, plane 0 otherwise.
    #[must_use]
    pub fn with_planes(mut self, planes: impl IntoIterator<Item = usize>) -> Self {
        self.planes = Some(planes.into_iter().collect());
        self
    }

    /// Sets the implementation selector: 0 picks the best variant the CPU
    /// supports, 1-4 force scalar, 4-, 8- and 16-lane variants.
    #[must_use]
    pub fn with_opt(mut self, opt: i64) -> Self {
        self.opt = opt;
        self
    }

    /// Sharpening strength.
    #[must_use]
    pub fn sharpness(&self) -> f32 {
        self.sharpness
    }

    /// Requested planes, if any were set.
    #[must_use]
    pub fn planes(&self) -> Option<&[usize]> {
        self.planes.as_deref()
    }

    /// Implementation selector.
    #[must_use]
    pub fn opt(&self) -> i64 {
        self.opt
    }
}

/// Immutable state of one filter instance.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    format: FrameFormat,
    kind: SampleKind,
    sharpness: f32,
    params: KernelParams,
    process: [bool; 3],
    chroma: [bool; 3],
    variant: Variant,
    pub(crate) filters: PlaneFilters,
}

impl SessionConfig {
    /// Validates `params` against `format` and resolves the kernel
    /// coefficients, choosing the implementation from `cpu`.
    ///
    /// # Errors
    /// Returns an error if the format is unsupported or variable, a plane
    /// index is out of range or repeated, a processed plane is smaller than
    /// 3×3, sharpness is outside `[0, 1]` or the selector is not 0-4.
    pub fn new(format: &FrameFormat, params: &CasParams, cpu: CpuFlags) -> Result<Self, CasError> {
        let kind = format.sample_kind()?;
        let num_planes = format.num_planes();

        let mut process = [false; 3];
        match params.planes() {
            Some(planes) if !planes.is_empty() => {
                for &plane in planes {
                    if plane >= num_planes {
                        return Err(CasError::PlaneOutOfRange { plane, num_planes });
                    }
                    if process[plane] {
                        return Err(CasError::DuplicatePlane { plane });
                    }
                    process[plane] = true;
                }
            }
            _ => {
                let defaults = if format.color_family == ColorFamily::Rgb {
                    num_planes
                } else {
                    1
                };
                process[..defaults].fill(true);
            }
        }

        for plane in (0..num_planes).filter(|&p| process[p]) {
            let (width, height) = format.plane_size(plane);
            if width < 3 || height < 3 {
                return Err(CasError::PlaneTooSmall {
                    plane,
                    width,
                    height,
                });
            }
        }

        let sharpness = params.sharpness();
        if !(0.0..=1.0).contains(&sharpness) {
            return Err(CasError::SharpnessOutOfRange { sharpness });
        }

        let variant = Variant::select(params.opt(), cpu)?;

        let mut chroma = [false; 3];
        if format.color_family == ColorFamily::Yuv {
            chroma[1] = true;
            chroma[2] = true;
        }

        let config = Self {
            format: *format,
            kind,
            sharpness,
            params: KernelParams::new(sharpness, format.bits_per_sample, kind.is_float(), false),
            process,
            chroma,
            variant,
            filters: variant.filters(),
        };

        log::debug!(
            "cas: {variant} variant for {kind:?}, sharpness {sharpness} (weight scale {}), planes {:?}",
            config.params.edge_weight_scale,
            config.processed_planes().collect::<Vec<_>>()
        );

        Ok(config)
    }

    /// Same as [`SessionConfig::new`] with the capabilities of the running CPU.
    ///
    /// # Errors
    /// See [`SessionConfig::new`].
    pub fn with_detected_cpu(format: &FrameFormat, params: &CasParams) -> Result<Self, CasError> {
        Self::new(format, params, CpuFlags::detect())
    }

    /// Frame layout the session was built for.
    #[must_use]
    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    /// Storage type of every plane.
    #[must_use]
    pub fn sample_kind(&self) -> SampleKind {
        self.kind
    }

    /// User-facing sharpness.
    #[must_use]
    pub fn sharpness(&self) -> f32 {
        self.sharpness
    }

    /// Negative blend weight scale derived from sharpness.
    #[must_use]
    pub fn edge_weight_scale(&self) -> f32 {
        self.params.edge_weight_scale
    }

    /// Ceiling of the soft max.
    #[must_use]
    pub fn signal_limit(&self) -> f32 {
        self.params.signal_limit
    }

    /// Largest storable sample for integer kinds.
    #[must_use]
    pub fn peak(&self) -> Option<i32> {
        (!self.kind.is_float()).then_some(self.params.peak)
    }

    /// Whether `plane` is sharpened. Other planes are left to the host.
    #[must_use]
    pub fn processes(&self, plane: usize) -> bool {
        self.process.get(plane).copied().unwrap_or(false)
    }

    /// Indices of the planes that are sharpened.
    pub fn processed_planes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.format.num_planes()).filter(|&p| self.process[p])
    }

    /// Offset added to float soft min/max of `plane`.
    #[must_use]
    pub fn chroma_offset(&self, plane: usize) -> f32 {
        self.kernel_params(plane).chroma_offset
    }

    /// Implementation chosen at construction.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Kernel coefficients for `plane`.
    #[must_use]
    pub fn kernel_params(&self, plane: usize) -> KernelParams {
        let chroma = self.kind.is_float() && self.chroma.get(plane).copied().unwrap_or(false);
        KernelParams {
            chroma_offset: if chroma { 1.0 } else { 0.0 },
            ..self.params
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SampleType;

    fn yuv(sample_type: SampleType, bits: u32) -> FrameFormat {
        FrameFormat::new(ColorFamily::Yuv, sample_type, bits, 64, 48).with_subsampling(1, 1)
    }

    #[test]
    fn test_edge_weight_scale_endpoints() {
        assert_eq!(edge_weight_scale(0.0), -1.0 / 16.0);
        assert_eq!(edge_weight_scale(1.0), -1.0 / 5.0);
        assert!((edge_weight_scale(0.5) + 1.0 / 10.5).abs() < 1e-7);

        let mut last = 0.0;
        for i in 0..=10 {
            let w = edge_weight_scale(i as f32 / 10.0);
            assert!(w < last, "not decreasing at {i}: {w} >= {last}");
            last = w;
        }
    }

    #[test]
    fn test_integer_limits() {
        for (bits, limit, peak) in [(8, 511.0, 255), (10, 2047.0, 1023), (16, 131071.0, 65535)] {
            let p = KernelParams::new(0.5, bits, false, true);
            assert_eq!(p.signal_limit, limit, "{bits} bit");
            assert_eq!(p.peak, peak, "{bits} bit");
            assert_eq!(p.chroma_offset, 0.0, "{bits} bit integer chroma");
        }
    }

    #[test]
    fn test_float_limits() {
        let p = KernelParams::new(0.5, 32, true, false);
        assert_eq!(p.signal_limit, 2.0);
        assert_eq!(p.chroma_offset, 0.0);
        assert_eq!(KernelParams::new(0.5, 32, true, true).chroma_offset, 1.0);
    }

    #[test]
    fn test_default_planes() {
        let cfg = SessionConfig::new(
            &yuv(SampleType::Integer, 8),
            &CasParams::default(),
            CpuFlags::empty(),
        )
        .unwrap();
        assert_eq!(cfg.processed_planes().collect::<Vec<_>>(), vec![0]);

        let rgb = FrameFormat::new(ColorFamily::Rgb, SampleType::Integer, 8, 16, 16);
        let cfg = SessionConfig::new(&rgb, &CasParams::default(), CpuFlags::empty()).unwrap();
        assert_eq!(cfg.processed_planes().collect::<Vec<_>>(), vec![0, 1, 2]);

        let empty = CasParams::new().with_planes([]);
        let cfg = SessionConfig::new(&rgb, &empty, CpuFlags::empty()).unwrap();
        assert_eq!(cfg.processed_planes().count(), 3);
    }

    #[test]
    fn test_explicit_planes() {
        let params = CasParams::new().with_planes([2, 0]);
        let cfg = SessionConfig::new(&yuv(SampleType::Integer, 10), &params, CpuFlags::empty())
            .unwrap();
        assert!(cfg.processes(0));
        assert!(!cfg.processes(1));
        assert!(cfg.processes(2));
        assert!(!cfg.processes(7));
        assert_eq!(cfg.sample_kind(), SampleKind::U16);
        assert_eq!(cfg.peak(), Some(1023));
    }

    #[test]
    fn test_chroma_offset_only_float_yuv_chroma() {
        let all = CasParams::new().with_planes([0, 1, 2]);

        let cfg = SessionConfig::new(&yuv(SampleType::Float, 32), &all, CpuFlags::empty()).unwrap();
        assert_eq!(cfg.chroma_offset(0), 0.0);
        assert_eq!(cfg.chroma_offset(1), 1.0);
        assert_eq!(cfg.chroma_offset(2), 1.0);
        assert_eq!(cfg.peak(), None);

        let cfg = SessionConfig::new(&yuv(SampleType::Integer, 8), &all, CpuFlags::empty()).unwrap();
        assert_eq!(cfg.chroma_offset(1), 0.0);

        let rgb = FrameFormat::new(ColorFamily::Rgb, SampleType::Float, 32, 16, 16);
        let cfg = SessionConfig::new(&rgb, &all, CpuFlags::empty()).unwrap();
        assert_eq!(cfg.chroma_offset(1), 0.0);
        assert_eq!(cfg.chroma_offset(2), 0.0);
    }

    #[test]
    fn test_small_unprocessed_plane_allowed() {
        // 4x4 luma with 4:2:0 chroma gives 2x2 chroma planes.
        let format = FrameFormat::new(ColorFamily::Yuv, SampleType::Integer, 8, 4, 4)
            .with_subsampling(1, 1);
        assert!(SessionConfig::new(&format, &CasParams::default(), CpuFlags::empty()).is_ok());

        let chroma = CasParams::new().with_planes([1]);
        assert_eq!(
            SessionConfig::new(&format, &chroma, CpuFlags::empty()).unwrap_err(),
            CasError::PlaneTooSmall {
                plane: 1,
                width: 2,
                height: 2
            }
        );
    }
}
