//! Every forced variant must agree with the scalar path: within one code value
//! for integer kinds, within 1e-5 for float.

use cas::{
    CasParams, ColorFamily, CpuFlags, FrameFormat, Img, ImgVec, Sample, SampleType, SessionConfig,
    Variant,
};
use proptest::prelude::*;

fn session(format: &FrameFormat, sharpness: f32, planes: &[usize], opt: i64) -> SessionConfig {
    let params = CasParams::new()
        .with_sharpness(sharpness)
        .with_planes(planes.iter().copied())
        .with_opt(opt);
    SessionConfig::new(format, &params, CpuFlags::empty()).unwrap()
}

/// Runs `plane` through every variant, with the destination in a padded
/// buffer, and returns the packed results (scalar first).
fn run_all<T: Sample>(
    format: &FrameFormat,
    sharpness: f32,
    plane: usize,
    src: &ImgVec<T>,
    padding: usize,
) -> Vec<Vec<T>> {
    let (w, h) = (src.width(), src.height());
    let stride = w + padding;
    (1..=4)
        .map(|opt| {
            let cas = session(format, sharpness, &[plane], opt);
            let mut buf = vec![T::default(); stride * h];
            cas.process_plane(plane, src.as_ref(), Img::new_stride(&mut buf[..], w, h, stride));
            buf.chunks(stride).flat_map(|row| row[..w].to_vec()).collect()
        })
        .collect()
}

fn assert_close<T: Sample + core::fmt::Debug>(results: &[Vec<T>], tolerance: f32, w: usize) {
    let scalar = &results[0];
    for (variant, out) in Variant::ALL.iter().zip(results).skip(1) {
        for (i, (s, v)) in scalar.iter().zip(out).enumerate() {
            assert!(
                (s.to_f32() - v.to_f32()).abs() <= tolerance,
                "{} mismatch at ({}, {}): {:?} vs scalar {:?}",
                variant,
                i % w,
                i / w,
                v,
                s
            );
        }
    }
}

proptest! {
    #[test]
    fn prop_u8_variants_agree(
        w in 3usize..48,
        h in 3usize..8,
        sharpness in 0.0f32..=1.0,
        padding in 0usize..5,
        seed in any::<u64>(),
    ) {
        let format = FrameFormat::new(ColorFamily::Gray, SampleType::Integer, 8, w, h);
        let mut state = seed | 1;
        let data: Vec<u8> = (0..w * h)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state >> 56) as u8
            })
            .collect();
        let src = Img::new(data, w, h);
        assert_close(&run_all(&format, sharpness, 0, &src, padding), 1.0, w);
    }

    #[test]
    fn prop_u16_variants_agree(
        w in 3usize..40,
        h in 3usize..6,
        bits in 9u32..=16,
        sharpness in 0.0f32..=1.0,
        data in prop::collection::vec(any::<u16>(), 40 * 6),
    ) {
        let format = FrameFormat::new(ColorFamily::Gray, SampleType::Integer, bits, w, h);
        let peak = (1u32 << bits) - 1;
        let samples: Vec<u16> = data[..w * h].iter().map(|&v| (u32::from(v) & peak) as u16).collect();
        let src = Img::new(samples, w, h);
        assert_close(&run_all(&format, sharpness, 0, &src, 3), 1.0, w);
    }

    #[test]
    fn prop_f32_chroma_variants_agree(
        w in 3usize..40,
        h in 3usize..6,
        sharpness in 0.0f32..=1.0,
        data in prop::collection::vec(-0.5f32..0.5, 40 * 6),
    ) {
        let format = FrameFormat::new(ColorFamily::Yuv, SampleType::Float, 32, w, h);
        let src = Img::new(data[..w * h].to_vec(), w, h);
        assert_close(&run_all(&format, sharpness, 1, &src, 2), 1e-5, w);
    }
}

#[test]
fn test_narrow_planes_all_variants() {
    // Narrower than one 16-lane batch, so the head batch covers the row.
    for w in 3..=17 {
        let format = FrameFormat::new(ColorFamily::Gray, SampleType::Float, 32, w, 3);
        let data: Vec<f32> = (0..w * 3).map(|i| ((i * 37) % 11) as f32 / 10.0).collect();
        let src = Img::new(data, w, 3);
        assert_close(&run_all(&format, 0.9, 0, &src, 1), 1e-5, w);
    }
}
