// SPDX-License-Identifier: MPL-2.0
//! Preset saturation levels for contrast auto-ranging.
//!
//! Each level is a small fraction of probability mass clipped from each tail
//! of the pixel-value distribution. Levels grow with the preset index, so a
//! higher index clips more mass and yields a tighter display range.

use crate::config::defaults::{CONTRAST_LEVEL_COEFF, NUM_CONTRAST_LEVELS};

/// Ordered sequence of tail-clip fractions, each inside (0, 0.5).
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastLevels(Vec<f64>);

impl ContrastLevels {
    /// Generates the default preset sequence
    /// `s_k = CONTRAST_LEVEL_COEFF * (1 + 10*(k-1))^4`.
    #[must_use]
    pub fn generate() -> Self {
        Self::with_coefficient(CONTRAST_LEVEL_COEFF, NUM_CONTRAST_LEVELS)
    }

    /// Generates `count` levels from an arbitrary coefficient.
    ///
    /// Levels are clamped into (0, 0.5) so that a misconfigured coefficient
    /// can never request clipping half the distribution or more.
    #[must_use]
    pub fn with_coefficient(coeff: f64, count: usize) -> Self {
        let count = count.max(1);
        let levels = (1..=count)
            .map(|k| {
                let base = 1.0 + 10.0 * (k as f64 - 1.0);
                (coeff * base.powi(4)).clamp(f64::MIN_POSITIVE, 0.4999)
            })
            .collect();
        Self(levels)
    }

    /// Number of preset levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the saturation fraction for 1-based index `k`, clamped into
    /// the valid index range.
    #[must_use]
    pub fn level(&self, k: usize) -> f64 {
        let k = k.clamp(1, self.0.len());
        self.0[k - 1]
    }
}

impl Default for ContrastLevels {
    fn default() -> Self {
        Self::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, F64_EPSILON};

    #[test]
    fn generate_produces_configured_count() {
        let levels = ContrastLevels::generate();
        assert_eq!(levels.len(), NUM_CONTRAST_LEVELS);
    }

    #[test]
    fn levels_are_strictly_increasing_tail_fractions() {
        let levels = ContrastLevels::generate();
        for k in 1..levels.len() {
            assert!(levels.level(k) < levels.level(k + 1));
        }
        for k in 1..=levels.len() {
            assert!(levels.level(k) > 0.0);
            assert!(levels.level(k) < 0.5);
        }
    }

    #[test]
    fn first_level_matches_coefficient() {
        let levels = ContrastLevels::generate();
        assert_abs_diff_eq!(levels.level(1), CONTRAST_LEVEL_COEFF, epsilon = F64_EPSILON);
    }

    #[test]
    fn level_clamps_out_of_range_indices() {
        let levels = ContrastLevels::generate();
        assert_abs_diff_eq!(levels.level(0), levels.level(1), epsilon = F64_EPSILON);
        assert_abs_diff_eq!(
            levels.level(999),
            levels.level(levels.len()),
            epsilon = F64_EPSILON
        );
    }

    #[test]
    fn oversized_coefficient_is_clamped_below_half() {
        let levels = ContrastLevels::with_coefficient(1.0, 4);
        for k in 1..=4 {
            assert!(levels.level(k) < 0.5);
        }
    }

    #[test]
    fn zero_count_yields_a_single_level() {
        let levels = ContrastLevels::with_coefficient(CONTRAST_LEVEL_COEFF, 0);
        assert_eq!(levels.len(), 1);
    }
}
