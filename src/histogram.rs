// SPDX-License-Identifier: MPL-2.0
//! Probability-mass histogram construction for movie tensors.
//!
//! The histogram is built once per tensor load and consumed by the contrast
//! engine's inverse-CDF auto-ranging. Long movies are first averaged down
//! along the frame axis so that construction cost is bounded independent of
//! movie length.
//!
//! Degenerate inputs (empty tensors, constant movies, all-NaN data) never
//! fail; they collapse to a flat 2-point placeholder that signals "no usable
//! spread" to the contrast engine.

use crate::config::defaults::{CONTRAST_BINNING, MAX_HISTOGRAM_BINS, MIN_NUMBINS};
use crate::tensor::PixelMask;
use ndarray::{Array2, Array3, Axis, Zip};

/// Probability mass histogram with its cumulative distribution.
///
/// Invariants: `values`, `pdf` and `cdf` have equal length >= 2; `values`
/// ascends (bin centers); `pdf` sums to 1; `cdf` is non-decreasing with a
/// final element of exactly 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    values: Vec<f64>,
    pdf: Vec<f64>,
    cdf: Vec<f64>,
}

impl Histogram {
    /// Returns the flat 2-point placeholder used when fewer than 2 distinct
    /// bins exist (constant or empty data).
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            values: vec![0.0, 1.0],
            pdf: vec![0.0, 1.0],
            cdf: vec![0.0, 1.0],
        }
    }

    /// Returns true if this histogram is the degenerate placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.values == [0.0, 1.0] && self.pdf == [0.0, 1.0]
    }

    /// Bin centers, ascending.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Probability mass per bin.
    #[must_use]
    pub fn pdf(&self) -> &[f64] {
        &self.pdf
    }

    /// Cumulative distribution, non-decreasing, ending at 1.
    #[must_use]
    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    /// Returns the `(lowest, highest)` bin centers.
    #[must_use]
    pub fn full_range(&self) -> (f64, f64) {
        (self.values[0], self.values[self.values.len() - 1])
    }

    /// Builds a histogram from a 3-D grayscale movie.
    ///
    /// Movies longer than `MIN_NUMBINS * CONTRAST_BINNING` frames are
    /// averaged into `CONTRAST_BINNING` frame groups first, ignoring
    /// non-finite samples. An optional mask restricts sampling to a 2-D
    /// region applied identically to every frame; a mask whose shape does
    /// not match the movie is ignored.
    #[must_use]
    pub fn from_movie(data: &Array3<f64>, mask: Option<&PixelMask>) -> Self {
        let mask = mask.filter(|m| m.dim() == (data.len_of(Axis(0)), data.len_of(Axis(1))));

        let frames = data.len_of(Axis(2));
        let samples = if frames > MIN_NUMBINS * CONTRAST_BINNING {
            let binned = downsample_frames(data);
            collect_samples(&binned, mask)
        } else {
            collect_samples(data, mask)
        };

        Self::from_samples(&samples)
    }

    /// Builds a histogram from raw samples using an automatic bin-count
    /// strategy (Freedman–Diaconis width with a square-root-rule fallback).
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.len() < 2 {
            return Self::placeholder();
        }
        sorted.sort_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let span = max - min;
        if span <= 0.0 {
            // All samples identical: fewer than 2 distinct bins.
            return Self::placeholder();
        }

        let n = sorted.len() as f64;
        let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);
        let width = 2.0 * iqr / n.cbrt();
        let bins = if width > 0.0 {
            (span / width).ceil() as usize
        } else {
            n.sqrt().ceil() as usize
        };
        let bins = bins.clamp(2, MAX_HISTOGRAM_BINS);

        let mut counts = vec![0u64; bins];
        for &v in &sorted {
            let idx = (((v - min) / span) * bins as f64) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        let bin_width = span / bins as f64;
        let values: Vec<f64> = (0..bins)
            .map(|i| min + (i as f64 + 0.5) * bin_width)
            .collect();
        let pdf: Vec<f64> = counts.iter().map(|&c| c as f64 / n).collect();

        let mut cdf = Vec::with_capacity(bins);
        let mut acc = 0.0;
        for &p in &pdf {
            acc += p;
            cdf.push(acc);
        }
        // Pin the tail against accumulated rounding error.
        cdf[bins - 1] = 1.0;

        Self { values, pdf, cdf }
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Averages the frame axis down into `CONTRAST_BINNING` groups,
/// ignoring non-finite samples. Pixels with no finite sample in a group
/// become NaN and are dropped during sample collection.
fn downsample_frames(data: &Array3<f64>) -> Array3<f64> {
    let (rows, cols) = (data.len_of(Axis(0)), data.len_of(Axis(1)));
    let frames = data.len_of(Axis(2));
    let chunk = frames.div_ceil(CONTRAST_BINNING);

    let groups: Vec<Array2<f64>> = data
        .axis_chunks_iter(Axis(2), chunk)
        .map(|block| {
            let mut sum = Array2::<f64>::zeros((rows, cols));
            let mut count = Array2::<f64>::zeros((rows, cols));
            for frame in block.axis_iter(Axis(2)) {
                Zip::from(&mut sum)
                    .and(&mut count)
                    .and(&frame)
                    .for_each(|s, c, &v| {
                        if v.is_finite() {
                            *s += v;
                            *c += 1.0;
                        }
                    });
            }
            Zip::from(&mut sum).and(&count).for_each(|s, &c| {
                *s = if c > 0.0 { *s / c } else { f64::NAN };
            });
            sum
        })
        .collect();

    let mut binned = Array3::zeros((rows, cols, groups.len()));
    for (g, group) in groups.iter().enumerate() {
        binned.index_axis_mut(Axis(2), g).assign(group);
    }
    binned
}

/// Collects finite samples, restricted to masked pixels when a mask is given.
fn collect_samples(data: &Array3<f64>, mask: Option<&PixelMask>) -> Vec<f64> {
    match mask {
        Some(mask) => {
            let mut samples = Vec::new();
            for frame in data.axis_iter(Axis(2)) {
                Zip::from(&frame).and(mask).for_each(|&v, &keep| {
                    if keep && v.is_finite() {
                        samples.push(v);
                    }
                });
            }
            samples
        }
        None => data.iter().copied().filter(|v| v.is_finite()).collect(),
    }
}

/// Linear-interpolated percentile of pre-sorted samples, `q` in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
