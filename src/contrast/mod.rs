// SPDX-License-Identifier: MPL-2.0
//! Contrast auto-ranging engine.
//!
//! Maps a requested saturation level (or an explicit user-given range) to a
//! concrete display range by inverting the cumulative distribution of the
//! movie's pixel values. Percentile clipping is robust to outlier pixels
//! (hot/dead sensor pixels, saturation artifacts) where min/max autoscaling
//! is not, and a hard domain bound keeps intrinsically constrained data
//! (e.g. a non-negative sensor) from producing nonsensical range edges.

mod levels;

pub use levels::ContrastLevels;

use crate::config::defaults::DEFAULT_CONTRAST_INDEX;
use crate::histogram::Histogram;

/// Hard physical bounds on displayable pixel values.
///
/// Each edge is finite or infinite; a finite edge overrides the computed
/// contrast edge on that side regardless of what the histogram inversion
/// produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastDomain {
    low: f64,
    high: f64,
}

impl ContrastDomain {
    /// A domain with no constraints on either side.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
        }
    }

    /// Builds a domain from explicit bounds; a pair that is not strictly
    /// ordered (including NaN edges) degrades to the unbounded domain.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        if low < high {
            Self { low, high }
        } else {
            Self::unbounded()
        }
    }

    /// Domain for sensors that cannot read below zero.
    #[must_use]
    pub fn non_negative() -> Self {
        Self {
            low: 0.0,
            high: f64::INFINITY,
        }
    }

    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }
}

impl Default for ContrastDomain {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Display intensity range. Invariant: `hi > lo` after every successful
/// update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRange {
    pub lo: f64,
    pub hi: f64,
}

impl PixelRange {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// How contrast should be initialized when a movie is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContrastRequest {
    /// Select a preset saturation level (1-based, clamped).
    Index(usize),
    /// Use an explicit display range.
    Range(f64, f64),
}

impl Default for ContrastRequest {
    fn default() -> Self {
        Self::Index(DEFAULT_CONTRAST_INDEX)
    }
}

/// Contrast state for one viewer: the active preset index, the committed
/// display range, and the domain constraint.
///
/// The preset index and the range are allowed to diverge: committing an
/// explicit range leaves the index untouched, and nothing ever reconciles
/// the two afterwards. Preset UI controls keep showing the last selected
/// index.
#[derive(Debug)]
pub struct ContrastEngine {
    levels: ContrastLevels,
    domain: ContrastDomain,
    index: usize,
    range: PixelRange,
}

impl ContrastEngine {
    #[must_use]
    pub fn new(domain: ContrastDomain) -> Self {
        Self {
            levels: ContrastLevels::default(),
            domain,
            index: DEFAULT_CONTRAST_INDEX,
            range: PixelRange { lo: 0.0, hi: 1.0 },
        }
    }

    /// Replaces the domain constraint. Takes effect on the next update.
    pub fn set_domain(&mut self, domain: ContrastDomain) {
        self.domain = domain;
    }

    #[must_use]
    pub fn domain(&self) -> ContrastDomain {
        self.domain
    }

    #[must_use]
    pub fn contrast_index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn pixel_range(&self) -> PixelRange {
        self.range
    }

    #[must_use]
    pub fn levels(&self) -> &ContrastLevels {
        &self.levels
    }

    /// Selects preset level `k` (1-based, clamped) and recomputes the display
    /// range by inverting the histogram's CDF at the level's tail fractions.
    ///
    /// Flat stretches of the CDF are skipped before inversion so that linear
    /// interpolation never spans zero-probability regions. Query points whose
    /// fractional bin position falls at or beyond the sampled ends use the
    /// full-range edge on that side, as does the degenerate placeholder
    /// histogram. Finite domain edges overwrite the computed edges last.
    ///
    /// Returns false (state unchanged) only when the resulting range would
    /// not satisfy `hi > lo`.
    pub fn set_by_index(&mut self, k: usize, histogram: &Histogram) -> bool {
        let k = k.clamp(1, self.levels.len());
        let saturation = self.levels.level(k);
        let (full_lo, full_hi) = histogram.full_range();

        let (mut lo, mut hi) = if histogram.is_placeholder() {
            (full_lo, full_hi)
        } else {
            invert_range(histogram, saturation)
        };

        if self.domain.low.is_finite() {
            lo = self.domain.low;
        }
        if self.domain.high.is_finite() {
            hi = self.domain.high;
        }
        if hi <= lo {
            return false;
        }

        self.index = k;
        self.range = PixelRange { lo, hi };
        true
    }

    /// Commits an explicit display range, leaving the preset index untouched.
    ///
    /// A pair that is not strictly increasing (or not finite) is silently
    /// rejected: such input originates from in-progress user edits, e.g. a
    /// half-typed number, and must leave state unchanged without an error.
    pub fn set_by_range(&mut self, lo: f64, hi: f64) -> bool {
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return false;
        }
        self.range = PixelRange { lo, hi };
        true
    }
}

/// Inverts the CDF at `saturation` and `1 - saturation`, returning the
/// clipped `(lo, hi)` value pair with sub-bin precision.
fn invert_range(histogram: &Histogram, saturation: f64) -> (f64, f64) {
    let (full_lo, full_hi) = histogram.full_range();

    // Keep only positions where the CDF strictly increases so interpolation
    // never runs across a flat (zero-probability) stretch.
    let sel = strictly_increasing_indices(histogram.cdf());
    if sel.len() < 2 {
        return (full_lo, full_hi);
    }

    let xs: Vec<f64> = sel.iter().map(|&i| histogram.cdf()[i]).collect();
    let n = sel.len() as f64;

    let pos_lo = invert_position(&xs, saturation);
    let pos_hi = invert_position(&xs, 1.0 - saturation);

    let lo = if pos_lo > 1.0 && pos_lo < n {
        value_at(histogram.values(), &sel, pos_lo)
    } else {
        full_lo
    };
    let hi = if pos_hi > 1.0 && pos_hi < n {
        value_at(histogram.values(), &sel, pos_hi)
    } else {
        full_hi
    };
    (lo, hi)
}

/// Indices where the CDF strictly increases from its predecessor.
/// The first index is always kept.
fn strictly_increasing_indices(cdf: &[f64]) -> Vec<usize> {
    let mut sel = vec![0];
    for i in 1..cdf.len() {
        if cdf[i] > cdf[i - 1] {
            sel.push(i);
        }
    }
    sel
}

/// Inverts a strictly increasing sequence `xs` at `q`, returning the 1-based
/// fractional position. Queries outside `[xs[0], xs[n-1]]` extrapolate
/// linearly along the nearest segment.
fn invert_position(xs: &[f64], q: f64) -> f64 {
    let n = xs.len();
    let seg = if q <= xs[0] {
        0
    } else if q >= xs[n - 1] {
        n - 2
    } else {
        xs.partition_point(|&x| x < q) - 1
    };
    let t = (q - xs[seg]) / (xs[seg + 1] - xs[seg]);
    (seg + 1) as f64 + t
}

/// Interpolates bin-center values at a fractional 1-based position within the
/// deduplicated index selection, giving sub-bin precision.
fn value_at(values: &[f64], sel: &[usize], pos: f64) -> f64 {
    let floor = pos.floor() as usize;
    let ceil = pos.ceil() as usize;
    let v0 = values[sel[floor - 1]];
    let v1 = values[sel[ceil - 1]];
    v0 + (pos - floor as f64) * (v1 - v0)
}
