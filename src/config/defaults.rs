// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Histogram**: down-sampling and binning bounds for histogram construction
//! - **Contrast**: preset saturation levels for contrast auto-ranging
//! - **Playback**: frame-rate bounds and tick-period floor

// ==========================================================================
// Histogram Defaults
// ==========================================================================

/// Minimum number of frame groups that justifies down-sampling.
///
/// Movies with at most `MIN_NUMBINS * CONTRAST_BINNING` frames are
/// histogrammed in full; longer movies are averaged down first.
pub const MIN_NUMBINS: usize = 20;

/// Number of frame groups produced when down-sampling along the frame axis.
///
/// Bounds histogram-construction cost independent of movie length.
pub const CONTRAST_BINNING: usize = 30;

/// Upper bound on automatically chosen histogram bin counts.
pub const MAX_HISTOGRAM_BINS: usize = 1024;

// ==========================================================================
// Contrast Defaults
// ==========================================================================

/// Number of preset contrast saturation levels.
pub const NUM_CONTRAST_LEVELS: usize = 5;

/// Coefficient of the preset saturation-level generator.
///
/// Level `k` (1-based) clips `CONTRAST_LEVEL_COEFF * (1 + 10*(k-1))^4` of
/// probability mass from each tail, so higher levels clip more mass and
/// produce a tighter display range. Every level must stay inside (0, 0.5).
pub const CONTRAST_LEVEL_COEFF: f64 = 1e-7;

/// Default preset contrast index selected on load (1-based).
pub const DEFAULT_CONTRAST_INDEX: usize = 2;

// ==========================================================================
// Playback Defaults
// ==========================================================================

/// Default playback rate in frames per second.
pub const DEFAULT_PLAYBACK_FPS: f64 = 10.0;

/// Minimum allowed playback rate.
pub const MIN_PLAYBACK_FPS: f64 = 0.5;

/// Maximum allowed playback rate.
pub const MAX_PLAYBACK_FPS: f64 = 120.0;

/// Floor for the playback tick period in milliseconds.
pub const MIN_TICK_PERIOD_MS: u64 = 1;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Histogram validation
    assert!(MIN_NUMBINS > 0);
    assert!(CONTRAST_BINNING > 1);
    assert!(MAX_HISTOGRAM_BINS >= 2);

    // Contrast validation
    assert!(NUM_CONTRAST_LEVELS >= 1);
    assert!(DEFAULT_CONTRAST_INDEX >= 1);
    assert!(DEFAULT_CONTRAST_INDEX <= NUM_CONTRAST_LEVELS);
    assert!(CONTRAST_LEVEL_COEFF > 0.0);
    // Largest level: coeff * (1 + 10*(NUM_CONTRAST_LEVELS-1))^4 = coeff * 41^4
    assert!(CONTRAST_LEVEL_COEFF * 2_825_761.0 < 0.5);

    // Playback validation
    assert!(MIN_PLAYBACK_FPS > 0.0);
    assert!(MAX_PLAYBACK_FPS > MIN_PLAYBACK_FPS);
    assert!(DEFAULT_PLAYBACK_FPS >= MIN_PLAYBACK_FPS);
    assert!(DEFAULT_PLAYBACK_FPS <= MAX_PLAYBACK_FPS);
    assert!(MIN_TICK_PERIOD_MS > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_defaults_are_valid() {
        assert_eq!(MIN_NUMBINS, 20);
        assert_eq!(CONTRAST_BINNING, 30);
        assert!(MAX_HISTOGRAM_BINS >= CONTRAST_BINNING);
    }

    #[test]
    fn contrast_defaults_are_valid() {
        assert_eq!(NUM_CONTRAST_LEVELS, 5);
        assert!(DEFAULT_CONTRAST_INDEX >= 1);
        assert!(DEFAULT_CONTRAST_INDEX <= NUM_CONTRAST_LEVELS);
    }

    #[test]
    fn every_preset_level_is_a_valid_tail_fraction() {
        for k in 1..=NUM_CONTRAST_LEVELS {
            let base = 1.0 + 10.0 * (k as f64 - 1.0);
            let level = CONTRAST_LEVEL_COEFF * base.powi(4);
            assert!(level > 0.0, "level {} is not positive", k);
            assert!(level < 0.5, "level {} clips half the mass or more", k);
        }
    }

    #[test]
    fn playback_defaults_are_valid() {
        assert_eq!(DEFAULT_PLAYBACK_FPS, 10.0);
        assert!(DEFAULT_PLAYBACK_FPS >= MIN_PLAYBACK_FPS);
        assert!(DEFAULT_PLAYBACK_FPS <= MAX_PLAYBACK_FPS);
    }
}
