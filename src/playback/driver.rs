// SPDX-License-Identifier: MPL-2.0
//! Tokio-based tick delivery for playback clocks.
//!
//! Each playing viewer gets its own timer task firing at the period captured
//! when playback started; viewers grouped together still run independent
//! timers (the initiating viewer's tick drives its own frame, and sync
//! propagation pushes the resulting frame value to peers).
//!
//! Tick delivery is bounded and lossy: a tick that arrives while the
//! previous tick's work still holds the registry lock is dropped, never
//! queued, so a host that renders slower than the requested rate can never
//! build up a backlog.

use crate::playback::clock::PlaybackRun;
use crate::viewer::{ViewerId, ViewerRegistry};
use std::sync::{Arc, Mutex, TryLockError};
use tokio::time::MissedTickBehavior;

/// Registry shared between the host and the timer tasks.
pub type SharedRegistry = Arc<Mutex<ViewerRegistry>>;

/// Creates a new shared registry.
#[must_use]
pub fn create_shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(ViewerRegistry::new()))
}

/// Starts playback for `id` and spawns a timer task that delivers ticks at
/// the clock's period until the run ends.
///
/// Returns false when playback cannot start (unknown viewer or single-frame
/// movie). Must be called from within a tokio runtime.
pub fn spawn_playback(registry: &SharedRegistry, id: ViewerId) -> bool {
    let Ok(mut guard) = registry.lock() else {
        return false;
    };
    let Some(run) = guard.start_playback(id) else {
        return false;
    };
    drop(guard);
    tokio::spawn(drive_clock(Arc::clone(registry), id, run));
    true
}

/// Delivers ticks for one playback run.
///
/// The task exits when the viewer auto-stops, is stopped by the host, is
/// removed from the registry, or starts a newer run (epoch mismatch).
async fn drive_clock(registry: SharedRegistry, id: ViewerId, run: PlaybackRun) {
    let mut interval = tokio::time::interval(run.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick completes immediately; consume it so the
    // first frame advance happens one full period after start.
    interval.tick().await;

    loop {
        interval.tick().await;
        match registry.try_lock() {
            Ok(mut registry) => {
                if !registry.tick_epoch(id, run.epoch) {
                    break;
                }
            }
            // Previous tick's work still in progress: drop this tick.
            Err(TryLockError::WouldBlock) => continue,
            Err(TryLockError::Poisoned(_)) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::MovieTensor;
    use crate::viewer::LoadOptions;
    use ndarray::Array3;
    use std::time::Duration;

    fn ramp_movie(frames: usize) -> MovieTensor {
        MovieTensor::Gray(Array3::from_shape_fn((4, 4, frames), |(r, c, f)| {
            (r + c + f) as f64
        }))
    }

    fn registry_with_viewer(frames: usize, fps: f64) -> (SharedRegistry, ViewerId) {
        let shared = create_shared_registry();
        let id = {
            let mut registry = shared.lock().expect("registry lock");
            let id = registry.create_viewer();
            registry.load(id, ramp_movie(frames), LoadOptions::default());
            registry.set_playback_fps(id, fps);
            id
        };
        (shared, id)
    }

    #[tokio::test(start_paused = true)]
    async fn playback_advances_frames_over_time() {
        let (shared, id) = registry_with_viewer(10, 10.0);
        assert!(spawn_playback(&shared, id));

        // 10 fps = 100ms period; after ~350ms three ticks have fired.
        tokio::time::sleep(Duration::from_millis(350)).await;
        let frame = shared.lock().expect("registry lock").current_frame(id);
        assert_eq!(frame, Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn playback_auto_stops_at_end_without_repeat() {
        let (shared, id) = registry_with_viewer(3, 10.0);
        assert!(spawn_playback(&shared, id));

        tokio::time::sleep(Duration::from_secs(2)).await;
        let registry = shared.lock().expect("registry lock");
        assert_eq!(registry.current_frame(id), Some(3));
        assert_eq!(registry.is_playing(id), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn playback_wraps_with_repeat() {
        let (shared, id) = registry_with_viewer(3, 10.0);
        shared
            .lock()
            .expect("registry lock")
            .set_repeat(id, true);
        assert!(spawn_playback(&shared, id));

        // 3 frames at 100ms: the movie wraps indefinitely and keeps playing.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let registry = shared.lock().expect("registry lock");
        assert_eq!(registry.is_playing(id), Some(true));
        let frame = registry.current_frame(id).expect("viewer is live");
        assert!((1..=3).contains(&frame));
    }

    #[tokio::test(start_paused = true)]
    async fn spawn_fails_for_single_frame_movie() {
        let (shared, id) = registry_with_viewer(1, 10.0);
        assert!(!spawn_playback(&shared, id));
        assert_eq!(
            shared.lock().expect("registry lock").is_playing(id),
            Some(false)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_ends_the_timer_task() {
        let (shared, id) = registry_with_viewer(100, 10.0);
        assert!(spawn_playback(&shared, id));

        tokio::time::sleep(Duration::from_millis(250)).await;
        shared.lock().expect("registry lock").stop_playback(id);
        let frame_at_stop = shared.lock().expect("registry lock").current_frame(id);

        // A dead run must not keep advancing frames.
        tokio::time::sleep(Duration::from_secs(1)).await;
        let frame_later = shared.lock().expect("registry lock").current_frame(id);
        assert_eq!(frame_at_stop, frame_later);
    }

    #[tokio::test(start_paused = true)]
    async fn removing_the_viewer_ends_the_timer_task() {
        let (shared, id) = registry_with_viewer(100, 10.0);
        assert!(spawn_playback(&shared, id));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(shared.lock().expect("registry lock").remove(id));

        // The task notices the missing viewer on its next tick and exits.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            shared.lock().expect("registry lock").current_frame(id),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn grouped_peers_follow_driven_playback() {
        let shared = create_shared_registry();
        let (a, b) = {
            let mut registry = shared.lock().expect("registry lock");
            let a = registry.create_viewer();
            let b = registry.create_viewer();
            registry.load(a, ramp_movie(10), LoadOptions::default());
            registry.load(b, ramp_movie(10), LoadOptions::default());
            registry.set_playback_fps(a, 10.0);
            registry.group(&[a, b]);
            (a, b)
        };
        assert!(spawn_playback(&shared, a));

        tokio::time::sleep(Duration::from_millis(350)).await;
        let registry = shared.lock().expect("registry lock");
        assert_eq!(registry.current_frame(a), Some(4));
        assert_eq!(registry.current_frame(b), Some(4));
    }
}
