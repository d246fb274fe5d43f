// SPDX-License-Identifier: MPL-2.0
//! Viewer registry and frame synchronization.
//!
//! The registry owns every live [`ViewerState`] and hands out opaque
//! [`ViewerId`] handles. Ids are monotonic and never reused, so a stale
//! handle held by the host (or recorded in a peer list) can always be
//! detected as dead instead of silently addressing a newer viewer.
//!
//! Grouped viewers keep each other's ids, not references. When a frame or
//! repeat change lands on one member the registry pushes the value to the
//! surviving peers exactly one level deep: a peer applies the change
//! locally and never fans it out again, which keeps propagation loop-free
//! without any visited-set bookkeeping.

use crate::config::Config;
use crate::playback::PlaybackRun;
use crate::tensor::MovieTensor;
use crate::viewer::{LoadOptions, RedrawHook, ViewerState};
use std::collections::HashMap;

/// Opaque handle to a viewer in a [`ViewerRegistry`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewerId(u64);

/// Owner of all live viewers.
#[derive(Default)]
pub struct ViewerRegistry {
    viewers: HashMap<ViewerId, ViewerState>,
    next_id: u64,
}

impl ViewerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh viewer and returns its handle.
    pub fn create_viewer(&mut self) -> ViewerId {
        self.insert(ViewerState::new())
    }

    /// Creates a viewer preloaded with persisted preferences.
    pub fn create_viewer_from_config(&mut self, config: &Config) -> ViewerId {
        self.insert(ViewerState::from_config(config))
    }

    fn insert(&mut self, viewer: ViewerState) -> ViewerId {
        let id = ViewerId(self.next_id);
        self.next_id += 1;
        self.viewers.insert(id, viewer);
        id
    }

    /// Destroys a viewer. Peers holding its id keep it until their next
    /// propagation, which prunes dead entries as a side effect.
    pub fn remove(&mut self, id: ViewerId) -> bool {
        self.viewers.remove(&id).is_some()
    }

    #[must_use]
    pub fn contains(&self, id: ViewerId) -> bool {
        self.viewers.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.viewers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }

    /// Read access to a viewer's state.
    #[must_use]
    pub fn viewer(&self, id: ViewerId) -> Option<&ViewerState> {
        self.viewers.get(&id)
    }

    pub fn set_redraw_hook(&mut self, id: ViewerId, hook: RedrawHook) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => {
                viewer.set_redraw_hook(hook);
                true
            }
            None => false,
        }
    }

    /// Loads a movie into a viewer. Grouping is unaffected; the new movie's
    /// frame count applies from the next propagation.
    pub fn load(&mut self, id: ViewerId, tensor: MovieTensor, options: LoadOptions) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => viewer.load(tensor, options),
            None => false,
        }
    }

    #[must_use]
    pub fn current_frame(&self, id: ViewerId) -> Option<usize> {
        self.viewers.get(&id).map(ViewerState::current_frame)
    }

    #[must_use]
    pub fn total_frames(&self, id: ViewerId) -> Option<usize> {
        self.viewers.get(&id).map(ViewerState::total_frames)
    }

    #[must_use]
    pub fn is_playing(&self, id: ViewerId) -> Option<bool> {
        self.viewers.get(&id).map(ViewerState::is_playing)
    }

    /// Moves a viewer's frame cursor (clamped) and pushes the resulting
    /// frame to its grouped peers, each clamping into its own movie.
    ///
    /// Returns true only when the initiating viewer's cursor actually
    /// moved; boundary-clamped repeats propagate nothing.
    pub fn set_frame(&mut self, id: ViewerId, frame: i64) -> bool {
        let applied = match self.viewers.get_mut(&id) {
            Some(viewer) => {
                if !viewer.set_frame(frame) {
                    return false;
                }
                viewer.current_frame()
            }
            None => return false,
        };
        self.propagate_frame(id, applied);
        true
    }

    /// Moves a viewer's frame cursor by a signed offset.
    pub fn shift_frame(&mut self, id: ViewerId, delta: i64) -> bool {
        let target = match self.viewers.get(&id) {
            Some(viewer) if viewer.total_frames() > 0 => viewer.current_frame() as i64 + delta,
            _ => return false,
        };
        self.set_frame(id, target)
    }

    /// Applies a frame number typed by the user.
    ///
    /// Unparseable text is silently rejected (state unchanged); valid input
    /// stops playback first so the jump is not immediately overwritten by
    /// the next tick.
    pub fn set_typed_frame(&mut self, id: ViewerId, text: &str) -> bool {
        let Ok(frame) = text.trim().parse::<i64>() else {
            return false;
        };
        match self.viewers.get_mut(&id) {
            Some(viewer) => viewer.stop_playback(),
            None => return false,
        }
        self.set_frame(id, frame)
    }

    pub fn set_contrast_index(&mut self, id: ViewerId, k: usize) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => viewer.set_contrast_index(k),
            None => false,
        }
    }

    pub fn set_contrast_range(&mut self, id: ViewerId, lo: f64, hi: f64) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => viewer.set_contrast_range(lo, hi),
            None => false,
        }
    }

    /// Sets the repeat flag and mirrors it to grouped peers.
    pub fn set_repeat(&mut self, id: ViewerId, repeat: bool) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => viewer.set_repeat(repeat),
            None => return false,
        }
        for peer in self.live_peers(id) {
            if let Some(viewer) = self.viewers.get_mut(&peer) {
                viewer.set_repeat(repeat);
            }
        }
        true
    }

    pub fn set_playback_fps(&mut self, id: ViewerId, fps: f64) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => {
                viewer.set_playback_fps(fps);
                true
            }
            None => false,
        }
    }

    /// Starts a viewer's playback clock.
    pub fn start_playback(&mut self, id: ViewerId) -> Option<PlaybackRun> {
        self.viewers.get_mut(&id)?.start_playback()
    }

    pub fn stop_playback(&mut self, id: ViewerId) -> bool {
        match self.viewers.get_mut(&id) {
            Some(viewer) => {
                viewer.stop_playback();
                true
            }
            None => false,
        }
    }

    /// Delivers one playback tick, propagating any frame advance to peers.
    /// Returns the applied frame, or `None` when the clock (auto-)stopped.
    pub fn tick(&mut self, id: ViewerId) -> Option<usize> {
        let frame = self.viewers.get_mut(&id)?.tick()?;
        self.propagate_frame(id, frame);
        Some(frame)
    }

    /// Tick entry point for timer tasks: delivers the tick only while the
    /// viewer is live and still on the run identified by `epoch`.
    ///
    /// Returns false when the run is over in any way (viewer removed, run
    /// superseded, clock stopped or auto-stopped), telling the task to exit.
    pub fn tick_epoch(&mut self, id: ViewerId, epoch: u64) -> bool {
        match self.viewers.get(&id) {
            Some(viewer) if viewer.playback_epoch() == epoch => {}
            _ => return false,
        }
        self.tick(id).is_some()
    }

    /// Groups viewers for frame synchronization.
    ///
    /// Dead ids and duplicates are dropped; each surviving member's peer set
    /// becomes exactly the other members, replacing any previous grouping.
    pub fn group(&mut self, ids: &[ViewerId]) {
        let mut members: Vec<ViewerId> = Vec::with_capacity(ids.len());
        for &id in ids {
            if self.viewers.contains_key(&id) && !members.contains(&id) {
                members.push(id);
            }
        }
        for &id in &members {
            let peers: Vec<ViewerId> = members.iter().copied().filter(|&p| p != id).collect();
            if let Some(viewer) = self.viewers.get_mut(&id) {
                viewer.peers = peers;
            }
        }
    }

    /// Detaches a viewer from its group. Its former peers keep each other.
    pub fn ungroup(&mut self, id: ViewerId) {
        let Some(viewer) = self.viewers.get_mut(&id) else {
            return;
        };
        let peers = std::mem::take(&mut viewer.peers);
        for peer in peers {
            if let Some(viewer) = self.viewers.get_mut(&peer) {
                viewer.peers.retain(|&p| p != id);
            }
        }
    }

    /// Returns a viewer's surviving peers, pruning dead ids from its peer
    /// list in the process. Pruning is idempotent.
    fn live_peers(&mut self, id: ViewerId) -> Vec<ViewerId> {
        let live: Vec<ViewerId> = match self.viewers.get(&id) {
            Some(viewer) => viewer
                .peers
                .iter()
                .copied()
                .filter(|peer| self.viewers.contains_key(peer))
                .collect(),
            None => return Vec::new(),
        };
        if let Some(viewer) = self.viewers.get_mut(&id) {
            viewer.peers = live.clone();
        }
        live
    }

    /// Pushes a frame value to a viewer's peers. Each peer applies it with
    /// a plain local set, so propagation never cascades further.
    fn propagate_frame(&mut self, id: ViewerId, frame: usize) {
        for peer in self.live_peers(id) {
            if let Some(viewer) = self.viewers.get_mut(&peer) {
                viewer.set_frame(frame as i64);
            }
        }
    }
}
