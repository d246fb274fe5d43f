// SPDX-License-Identifier: MPL-2.0
//! Playback rate domain type.
//!
//! This module provides a type-safe wrapper for playback frame rates,
//! ensuring they are always within the valid range and converting them
//! into the whole-millisecond tick period the clock runs at.

use crate::config::defaults::{
    DEFAULT_PLAYBACK_FPS, MAX_PLAYBACK_FPS, MIN_PLAYBACK_FPS, MIN_TICK_PERIOD_MS,
};
use std::time::Duration;

/// Playback rate in frames per second, guaranteed to be within the valid
/// range.
///
/// This newtype enforces validity at the type level, making it impossible
/// to create a zero or negative rate.
///
/// # Example
///
/// ```
/// use stack_lens::playback::PlaybackFps;
///
/// let fps = PlaybackFps::new(25.0);
/// assert_eq!(fps.value(), 25.0);
///
/// // Values outside range are clamped
/// let too_fast = PlaybackFps::new(100_000.0);
/// assert_eq!(too_fast.value(), 120.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackFps(f64);

impl PlaybackFps {
    /// Creates a new playback rate, clamping to the valid range.
    /// Non-finite input falls back to the default rate.
    #[must_use]
    pub fn new(fps: f64) -> Self {
        if fps.is_finite() {
            Self(fps.clamp(MIN_PLAYBACK_FPS, MAX_PLAYBACK_FPS))
        } else {
            Self(DEFAULT_PLAYBACK_FPS)
        }
    }

    /// Returns the rate as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the tick period for this rate: `1000 / fps` rounded to whole
    /// milliseconds, never below the configured floor.
    #[must_use]
    pub fn tick_period(self) -> Duration {
        let millis = (1000.0 / self.0).round() as u64;
        Duration::from_millis(millis.max(MIN_TICK_PERIOD_MS))
    }
}

impl Default for PlaybackFps {
    fn default() -> Self {
        Self(DEFAULT_PLAYBACK_FPS)
    }
}
