// SPDX-License-Identifier: MPL-2.0
//! Movie tensor types for multi-frame image stacks.
//!
//! A movie is an in-memory array of samples whose last axis is the frame
//! axis. It is handed to a viewer by the caller, owned exclusively by that
//! viewer once loaded, and replaced wholesale on a new load — never mutated
//! in place and never read from or written to disk by this crate.

use ndarray::{Array2, Array3, Array4, Axis};

/// Boolean pixel mask selecting a 2-D region applied identically to every
/// frame during histogram construction.
pub type PixelMask = Array2<bool>;

/// An immutable-once-loaded multi-frame image stack.
///
/// Two layouts exist:
/// - `Gray`: 3-D `(rows, cols, frames)` grayscale samples, eligible for
///   contrast auto-ranging.
/// - `Colored`: 4-D `(rows, cols, channels, frames)` pre-colored samples;
///   contrast computation is bypassed entirely for these.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieTensor {
    Gray(Array3<f64>),
    Colored(Array4<f64>),
}

impl MovieTensor {
    /// Returns the number of frames (length of the last axis).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        match self {
            MovieTensor::Gray(data) => data.len_of(Axis(2)),
            MovieTensor::Colored(data) => data.len_of(Axis(3)),
        }
    }

    /// Returns true if the tensor holds no samples at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            MovieTensor::Gray(data) => data.is_empty(),
            MovieTensor::Colored(data) => data.is_empty(),
        }
    }

    /// Returns true for 3-D grayscale tensors.
    #[must_use]
    pub fn is_gray(&self) -> bool {
        matches!(self, MovieTensor::Gray(_))
    }

    /// Returns the grayscale data, if this is a 3-D tensor.
    #[must_use]
    pub fn gray(&self) -> Option<&Array3<f64>> {
        match self {
            MovieTensor::Gray(data) => Some(data),
            MovieTensor::Colored(_) => None,
        }
    }

    /// Returns the spatial shape `(rows, cols)`.
    #[must_use]
    pub fn spatial_dim(&self) -> (usize, usize) {
        match self {
            MovieTensor::Gray(data) => (data.len_of(Axis(0)), data.len_of(Axis(1))),
            MovieTensor::Colored(data) => (data.len_of(Axis(0)), data.len_of(Axis(1))),
        }
    }

    /// Returns the `(min, max)` of all finite samples, or `None` when no
    /// finite sample exists.
    #[must_use]
    pub fn value_span(&self) -> Option<(f64, f64)> {
        let samples: &[f64] = match self {
            MovieTensor::Gray(data) => data.as_slice_memory_order()?,
            MovieTensor::Colored(data) => data.as_slice_memory_order()?,
        };
        samples
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |span, v| match span {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Returns true if the mask shape matches this tensor's spatial shape.
    ///
    /// Mismatched masks are ignored by the histogram builder rather than
    /// rejected with an error.
    #[must_use]
    pub fn mask_fits(&self, mask: &PixelMask) -> bool {
        mask.dim() == self.spatial_dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn frame_count_uses_last_axis() {
        let gray = MovieTensor::Gray(Array3::zeros((4, 5, 7)));
        assert_eq!(gray.frame_count(), 7);

        let colored = MovieTensor::Colored(Array4::zeros((4, 5, 3, 9)));
        assert_eq!(colored.frame_count(), 9);
    }

    #[test]
    fn empty_tensor_is_detected() {
        let empty = MovieTensor::Gray(Array3::zeros((0, 0, 0)));
        assert!(empty.is_empty());
        assert_eq!(empty.frame_count(), 0);

        let non_empty = MovieTensor::Gray(Array3::zeros((2, 2, 1)));
        assert!(!non_empty.is_empty());
    }

    #[test]
    fn gray_accessor_distinguishes_layouts() {
        let gray = MovieTensor::Gray(Array3::zeros((2, 2, 3)));
        assert!(gray.is_gray());
        assert!(gray.gray().is_some());

        let colored = MovieTensor::Colored(Array4::zeros((2, 2, 3, 3)));
        assert!(!colored.is_gray());
        assert!(colored.gray().is_none());
    }

    #[test]
    fn value_span_covers_finite_samples_only() {
        let mut data = Array3::from_elem((2, 2, 2), 3.0);
        data[[0, 0, 0]] = -1.5;
        data[[1, 1, 1]] = f64::NAN;
        data[[0, 1, 0]] = f64::INFINITY;
        let tensor = MovieTensor::Gray(data);
        assert_eq!(tensor.value_span(), Some((-1.5, 3.0)));
    }

    #[test]
    fn value_span_of_unusable_data_is_none() {
        let empty = MovieTensor::Gray(Array3::zeros((0, 0, 0)));
        assert_eq!(empty.value_span(), None);

        let all_nan = MovieTensor::Gray(Array3::from_elem((2, 2, 1), f64::NAN));
        assert_eq!(all_nan.value_span(), None);
    }

    #[test]
    fn mask_fits_checks_spatial_shape_only() {
        let tensor = MovieTensor::Gray(Array3::zeros((4, 6, 100)));
        assert!(tensor.mask_fits(&PixelMask::from_elem((4, 6), true)));
        assert!(!tensor.mask_fits(&PixelMask::from_elem((6, 4), true)));
    }
}
