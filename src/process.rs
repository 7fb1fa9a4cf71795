//! Frame processing.
//!
//! A [`SessionConfig`] is immutable after construction, so one config can
//! drive any number of frames from any number of threads.

use imgref::{Img, ImgRef, ImgRefMut};

use crate::config::SessionConfig;
use crate::plane::PlaneLayout;
use crate::sample::Sample;

impl SessionConfig {
    /// Sharpens plane `plane` of `src` into `dst`.
    ///
    /// Planes not selected for processing are left alone, `dst` included;
    /// the caller is expected to pass them through (see
    /// [`process_frame`](Self::process_frame)). Row padding in `dst` is never
    /// written.
    ///
    /// # Panics
    /// Panics if `T` does not match the session's sample type, `plane` is not
    /// a plane of the format, or either image's size differs from the
    /// plane's size.
    pub fn process_plane<T: Sample>(&self, plane: usize, src: ImgRef<'_, T>, mut dst: ImgRefMut<'_, T>) {
        assert_eq!(
            T::KIND,
            self.sample_kind(),
            "sample type does not match the session format"
        );
        let format = self.format();
        assert!(
            plane < format.num_planes(),
            "plane {plane} out of range for {} planes",
            format.num_planes()
        );

        if !self.processes(plane) {
            log::trace!("cas: plane {plane} not selected, skipping");
            return;
        }

        let (width, height) = format.plane_size(plane);
        assert_eq!(
            (src.width(), src.height()),
            (width, height),
            "source plane {plane} size"
        );
        assert_eq!(
            (dst.width(), dst.height()),
            (width, height),
            "destination plane {plane} size"
        );

        let layout = PlaneLayout {
            width,
            height,
            src_stride: src.stride(),
            dst_stride: dst.stride(),
        };
        log::trace!(
            "cas: plane {plane} {width}x{height} with {} filter",
            self.variant()
        );
        let filter = T::plane_filter(&self.filters);
        filter(&self.kernel_params(plane), layout, src.buf(), dst.buf_mut());
    }

    /// Sharpens every selected plane of a frame and copies the others from
    /// `src` unchanged.
    ///
    /// # Panics
    /// Panics if either slice does not hold exactly one image per plane of
    /// the format, or under the conditions of
    /// [`process_plane`](Self::process_plane).
    pub fn process_frame<T: Sample>(&self, src: &[ImgRef<'_, T>], dst: &mut [ImgRefMut<'_, T>]) {
        let num_planes = self.format().num_planes();
        assert_eq!(src.len(), num_planes, "source plane count");
        assert_eq!(dst.len(), num_planes, "destination plane count");

        for (plane, (&input, dst)) in src.iter().zip(dst.iter_mut()).enumerate() {
            let (width, height, stride) = (dst.width(), dst.height(), dst.stride());
            let out = Img::new_stride(&mut dst.buf_mut()[..], width, height, stride);
            if self.processes(plane) {
                self.process_plane(plane, input, out);
            } else {
                copy_plane(input, out);
            }
        }
    }
}

fn copy_plane<T: Copy>(src: ImgRef<'_, T>, mut dst: ImgRefMut<'_, T>) {
    assert_eq!(
        (src.width(), src.height()),
        (dst.width(), dst.height()),
        "pass-through plane size"
    );
    for (from, to) in src.rows().zip(dst.rows_mut()) {
        to.copy_from_slice(from);
    }
}
