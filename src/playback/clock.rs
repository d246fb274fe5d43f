// SPDX-License-Identifier: MPL-2.0
//! Playback clock state machine.
//!
//! Manages timed frame advancement with two states:
//! - Stopped: no playback
//! - Playing: a periodic tick advances the frame by one
//!
//! The clock decides *what* the next frame is; it never touches the frame
//! itself. The owning viewer applies the advance and a host-driven timer
//! (or the tokio driver in [`super::driver`]) delivers the ticks.

use super::fps::PlaybackFps;
use std::time::Duration;

/// Playback clock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    /// No playback in progress.
    #[default]
    Stopped,
    /// Ticks are advancing the frame.
    Playing,
}

impl ClockState {
    /// Returns true if the clock is running.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Outcome of a single clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Advance to this frame (1-based).
    Advance(usize),
    /// End of the movie without repeat: the clock auto-stopped and the
    /// frame stays where it is.
    Stop,
}

/// Handle describing one playback run, returned by a successful start.
///
/// The period is fixed for the life of the run: changing the playback rate
/// while playing takes effect on the next stop/start cycle. The epoch lets
/// a timer task detect that its run has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackRun {
    pub period: Duration,
    pub epoch: u64,
}

/// Timed frame-advance state machine for one viewer.
#[derive(Debug, Default)]
pub struct PlaybackClock {
    state: ClockState,
    period: Option<Duration>,
    rewound: bool,
    epoch: u64,
}

impl PlaybackClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the clock is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Returns the running tick period, if playing.
    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Returns the current run epoch. Incremented on every start and on
    /// every stop of a running clock, so a stale timer task can tell that
    /// its run ended.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Starts playback.
    ///
    /// Requires more than one frame; a single-frame movie is a no-op and
    /// returns `None`. Starting at the last frame rewinds logically to
    /// frame 0 so the first tick advances to frame 1, giving a seamless
    /// loop-from-end. The tick period is captured from `fps` now and stays
    /// fixed until the next stop/start cycle.
    pub fn start(
        &mut self,
        current_frame: usize,
        total_frames: usize,
        fps: PlaybackFps,
    ) -> Option<PlaybackRun> {
        if total_frames <= 1 {
            return None;
        }
        self.rewound = current_frame >= total_frames;
        self.period = Some(fps.tick_period());
        self.state = ClockState::Playing;
        self.epoch += 1;
        Some(PlaybackRun {
            period: fps.tick_period(),
            epoch: self.epoch,
        })
    }

    /// Stops the clock. Idempotent: safe to call on an already-stopped
    /// clock, in which case nothing changes.
    pub fn stop(&mut self) {
        if self.state.is_playing() {
            self.epoch += 1;
        }
        self.state = ClockState::Stopped;
        self.period = None;
        self.rewound = false;
    }

    /// Processes one timer tick.
    ///
    /// At or past the last frame the clock wraps to frame 1 when `repeat`
    /// is set, and otherwise auto-stops without advancing. Ticking a
    /// stopped clock yields `Stop` and changes nothing.
    pub fn tick(&mut self, current_frame: usize, total_frames: usize, repeat: bool) -> Tick {
        if !self.state.is_playing() {
            return Tick::Stop;
        }
        let current = if self.rewound { 0 } else { current_frame };
        self.rewound = false;

        if current >= total_frames {
            if repeat {
                Tick::Advance(1)
            } else {
                self.stop();
                Tick::Stop
            }
        } else {
            Tick::Advance(current + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_is_stopped() {
        let clock = PlaybackClock::new();
        assert!(!clock.is_playing());
        assert_eq!(clock.period(), None);
    }

    #[test]
    fn start_requires_more_than_one_frame() {
        let mut clock = PlaybackClock::new();
        assert!(clock.start(1, 1, PlaybackFps::default()).is_none());
        assert!(!clock.is_playing());

        assert!(clock.start(1, 2, PlaybackFps::default()).is_some());
        assert!(clock.is_playing());
    }

    #[test]
    fn start_captures_period_from_fps() {
        let mut clock = PlaybackClock::new();
        let run = clock
            .start(1, 10, PlaybackFps::new(25.0))
            .expect("start should succeed");
        assert_eq!(run.period, Duration::from_millis(40));
        assert_eq!(clock.period(), Some(Duration::from_millis(40)));
    }

    #[test]
    fn ticks_advance_one_frame_at_a_time() {
        let mut clock = PlaybackClock::new();
        clock.start(1, 5, PlaybackFps::default());

        assert_eq!(clock.tick(1, 5, false), Tick::Advance(2));
        assert_eq!(clock.tick(2, 5, false), Tick::Advance(3));
        assert_eq!(clock.tick(3, 5, false), Tick::Advance(4));
    }

    #[test]
    fn tick_at_end_without_repeat_auto_stops() {
        let mut clock = PlaybackClock::new();
        clock.start(1, 3, PlaybackFps::default());

        assert_eq!(clock.tick(3, 3, false), Tick::Stop);
        assert!(!clock.is_playing());
    }

    #[test]
    fn tick_at_end_with_repeat_wraps_to_first_frame() {
        let mut clock = PlaybackClock::new();
        clock.start(1, 3, PlaybackFps::default());

        assert_eq!(clock.tick(3, 3, true), Tick::Advance(1));
        assert!(clock.is_playing());
    }

    #[test]
    fn starting_at_last_frame_rewinds_for_seamless_restart() {
        let mut clock = PlaybackClock::new();
        clock.start(10, 10, PlaybackFps::default());

        // Even without repeat, the first tick restarts from the beginning.
        assert_eq!(clock.tick(10, 10, false), Tick::Advance(1));
        assert_eq!(clock.tick(1, 10, false), Tick::Advance(2));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = PlaybackClock::new();
        clock.start(1, 5, PlaybackFps::default());
        clock.stop();
        let epoch = clock.epoch();

        clock.stop();
        clock.stop();
        assert!(!clock.is_playing());
        assert_eq!(clock.epoch(), epoch);
    }

    #[test]
    fn ticking_a_stopped_clock_changes_nothing() {
        let mut clock = PlaybackClock::new();
        assert_eq!(clock.tick(1, 10, true), Tick::Stop);
        assert!(!clock.is_playing());
    }

    #[test]
    fn epoch_changes_on_every_run_boundary() {
        let mut clock = PlaybackClock::new();
        let e0 = clock.epoch();

        clock.start(1, 5, PlaybackFps::default());
        let e1 = clock.epoch();
        assert_ne!(e0, e1);

        clock.stop();
        let e2 = clock.epoch();
        assert_ne!(e1, e2);

        clock.start(1, 5, PlaybackFps::default());
        assert_ne!(e2, clock.epoch());
    }

    #[test]
    fn restart_picks_up_new_fps() {
        let mut clock = PlaybackClock::new();
        clock.start(1, 10, PlaybackFps::new(10.0));
        assert_eq!(clock.period(), Some(Duration::from_millis(100)));

        // A restart re-captures the period; until then the old one runs.
        clock.stop();
        clock.start(1, 10, PlaybackFps::new(50.0));
        assert_eq!(clock.period(), Some(Duration::from_millis(20)));
    }
}
