// SPDX-License-Identifier: MPL-2.0
//! Timed playback for multi-frame movies.
//!
//! [`PlaybackClock`] is the pure state machine: it decides, per tick, what
//! the next frame is. [`PlaybackFps`] carries the validated rate and derives
//! the tick period. The [`driver`] module delivers the ticks on a tokio
//! timer; hosts with their own event loop can call the clock directly
//! instead.

pub mod clock;
pub mod driver;
pub mod fps;

pub use clock::{ClockState, PlaybackClock, PlaybackRun, Tick};
pub use driver::{create_shared_registry, spawn_playback, SharedRegistry};
pub use fps::PlaybackFps;
