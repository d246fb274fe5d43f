// SPDX-License-Identifier: MPL-2.0
//! Per-viewer display state.
//!
//! A [`ViewerState`] owns one loaded movie together with everything needed
//! to present it: the pixel-value histogram, the contrast engine, the
//! playback clock, and the current frame cursor. It knows nothing about
//! rendering; whenever its presentation changes it calls the host-installed
//! redraw hook and lets the host repaint.
//!
//! Viewers never talk to each other directly. Frame and repeat changes are
//! propagated to grouped peers by the [`ViewerRegistry`](registry), one
//! level deep.

pub mod registry;

pub use registry::{ViewerId, ViewerRegistry};

use crate::config::Config;
use crate::contrast::{ContrastDomain, ContrastEngine, ContrastRequest, PixelRange};
use crate::histogram::Histogram;
use crate::playback::{PlaybackClock, PlaybackFps, PlaybackRun, Tick};
use crate::tensor::{MovieTensor, PixelMask};

/// What changed, passed to the redraw hook so hosts can repaint selectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RedrawReason {
    /// The frame cursor moved to this frame (1-based).
    FrameChanged(usize),
    /// The display range changed.
    ContrastChanged(PixelRange),
}

/// Host callback invoked after every visible state change.
pub type RedrawHook = Box<dyn FnMut(RedrawReason) + Send>;

/// Caller choices applied when a movie is loaded.
#[derive(Default)]
pub struct LoadOptions {
    /// Hard bounds on displayable pixel values.
    pub domain: ContrastDomain,
    /// Initial contrast: a preset index or an explicit range.
    pub contrast: ContrastRequest,
    /// Region restriction for histogram construction. A mask whose shape
    /// does not match the movie is ignored.
    pub mask: Option<PixelMask>,
}

impl LoadOptions {
    /// Builds options carrying the configured initial contrast.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            contrast: config.initial_contrast(),
            ..Self::default()
        }
    }
}

/// Display state for one movie viewer.
pub struct ViewerState {
    tensor: Option<MovieTensor>,
    histogram: Histogram,
    contrast: ContrastEngine,
    clock: PlaybackClock,
    fps: PlaybackFps,
    current_frame: usize,
    total_frames: usize,
    do_repeat: bool,
    pub(crate) peers: Vec<ViewerId>,
    redraw: Option<RedrawHook>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tensor: None,
            histogram: Histogram::placeholder(),
            contrast: ContrastEngine::new(ContrastDomain::unbounded()),
            clock: PlaybackClock::new(),
            fps: PlaybackFps::default(),
            current_frame: 0,
            total_frames: 0,
            do_repeat: false,
            peers: Vec::new(),
            redraw: None,
        }
    }

    /// Builds a viewer preloaded with persisted preferences.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut viewer = Self::new();
        viewer.fps = config.initial_fps();
        viewer.do_repeat = config.initial_repeat();
        viewer
    }

    /// Installs the redraw hook, replacing any previous one.
    pub fn set_redraw_hook(&mut self, hook: RedrawHook) {
        self.redraw = Some(hook);
    }

    fn emit(&mut self, reason: RedrawReason) {
        if let Some(hook) = self.redraw.as_mut() {
            hook(reason);
        }
    }

    /// Loads a movie, replacing any previous one.
    ///
    /// Playback stops, the frame cursor resets to frame 1, and for grayscale
    /// movies the histogram and display range are rebuilt. Colored movies
    /// bypass contrast entirely. An empty tensor is rejected and leaves the
    /// viewer unchanged.
    pub fn load(&mut self, tensor: MovieTensor, options: LoadOptions) -> bool {
        if tensor.is_empty() {
            return false;
        }
        self.clock.stop();

        if let Some(data) = tensor.gray() {
            let mask = options
                .mask
                .as_ref()
                .filter(|mask| tensor.mask_fits(mask));
            self.histogram = Histogram::from_movie(data, mask);
        } else {
            self.histogram = Histogram::placeholder();
        }

        self.contrast = ContrastEngine::new(options.domain);
        if tensor.is_gray() {
            let applied = match options.contrast {
                ContrastRequest::Index(k) => self.contrast.set_by_index(k, &self.histogram),
                ContrastRequest::Range(lo, hi) => self.contrast.set_by_range(lo, hi),
            };
            // An unusable caller-given range falls back to the default preset.
            if !applied {
                self.contrast
                    .set_by_index(crate::config::DEFAULT_CONTRAST_INDEX, &self.histogram);
            }
        }

        self.total_frames = tensor.frame_count();
        self.current_frame = 1;
        let is_gray = tensor.is_gray();
        self.tensor = Some(tensor);

        self.emit(RedrawReason::FrameChanged(1));
        if is_gray {
            let range = self.contrast.pixel_range();
            self.emit(RedrawReason::ContrastChanged(range));
        }
        true
    }

    #[must_use]
    pub fn tensor(&self) -> Option<&MovieTensor> {
        self.tensor.as_ref()
    }

    #[must_use]
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    #[must_use]
    pub fn repeat(&self) -> bool {
        self.do_repeat
    }

    #[must_use]
    pub fn playback_fps(&self) -> PlaybackFps {
        self.fps
    }

    #[must_use]
    pub fn pixel_range(&self) -> PixelRange {
        self.contrast.pixel_range()
    }

    #[must_use]
    pub fn contrast_index(&self) -> usize {
        self.contrast.contrast_index()
    }

    /// Moves the frame cursor, clamping into `[1, total_frames]`.
    ///
    /// Returns true only when the cursor actually moved; a clamped repeat at
    /// a boundary (or a viewer with no movie) is a no-op with no redraw.
    pub fn set_frame(&mut self, frame: i64) -> bool {
        if self.total_frames == 0 {
            return false;
        }
        let clamped = frame.clamp(1, self.total_frames as i64) as usize;
        if clamped == self.current_frame {
            return false;
        }
        self.current_frame = clamped;
        self.emit(RedrawReason::FrameChanged(clamped));
        true
    }

    /// Selects a preset contrast level. No-op for colored or unloaded
    /// movies.
    pub fn set_contrast_index(&mut self, k: usize) -> bool {
        if !self.tensor.as_ref().is_some_and(MovieTensor::is_gray) {
            return false;
        }
        if self.contrast.set_by_index(k, &self.histogram) {
            let range = self.contrast.pixel_range();
            self.emit(RedrawReason::ContrastChanged(range));
            true
        } else {
            false
        }
    }

    /// Commits an explicit display range. No-op for colored or unloaded
    /// movies; an invalid pair is silently rejected.
    pub fn set_contrast_range(&mut self, lo: f64, hi: f64) -> bool {
        if !self.tensor.as_ref().is_some_and(MovieTensor::is_gray) {
            return false;
        }
        if self.contrast.set_by_range(lo, hi) {
            let range = self.contrast.pixel_range();
            self.emit(RedrawReason::ContrastChanged(range));
            true
        } else {
            false
        }
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.do_repeat = repeat;
    }

    /// Sets the playback rate. A running clock keeps its captured period;
    /// the new rate applies from the next start.
    pub fn set_playback_fps(&mut self, fps: f64) {
        self.fps = PlaybackFps::new(fps);
    }

    /// Starts the playback clock at the current rate. Returns `None` when
    /// the movie has fewer than two frames (or none is loaded).
    pub fn start_playback(&mut self) -> Option<PlaybackRun> {
        self.clock
            .start(self.current_frame, self.total_frames, self.fps)
    }

    /// Stops playback. Idempotent.
    pub fn stop_playback(&mut self) {
        self.clock.stop();
    }

    #[must_use]
    pub fn playback_epoch(&self) -> u64 {
        self.clock.epoch()
    }

    /// Processes one playback tick: advances the frame cursor or auto-stops
    /// at the end. Returns the new frame when one was applied.
    pub fn tick(&mut self) -> Option<usize> {
        match self
            .clock
            .tick(self.current_frame, self.total_frames, self.do_repeat)
        {
            Tick::Advance(frame) => {
                self.current_frame = frame;
                self.emit(RedrawReason::FrameChanged(frame));
                Some(frame)
            }
            Tick::Stop => None,
        }
    }
}
