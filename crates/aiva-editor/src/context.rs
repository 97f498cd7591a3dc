// crates/aiva-editor/src/context.rs
//
// EditorContext owns the runtime handles that are NOT part of the project:
// nothing in here is saved, undone or redone.
//
//   EditorContext
//     ├── worker          the backend worker and its result channel
//     ├── surface         the playback surface (retargeted by the controller)
//     ├── surface_target  which clip/path the surface currently holds
//     └── toasts          transient notifications

use aiva_backend::BackendWorker;
use aiva_core::state::ClipId;

use crate::surface::{PlaybackSurface, SurfaceEvent};
use crate::toast::Toasts;

/// The clip the surface was last loaded for. The path is kept alongside the
/// id so an artifact swap on the same clip forces a reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceTarget {
    pub clip_id: ClipId,
    pub path:    String,
}

pub struct EditorContext<P: PlaybackSurface> {
    pub worker:           BackendWorker,
    pub surface:          P,
    pub surface_target:   Option<SurfaceTarget>,
    /// Media duration reported for the current target, in seconds.
    pub surface_duration: Option<f64>,
    /// The surface hit the end of its media. Cleared on load or seek so a
    /// finished clip is never restarted from 0 by a blind `play()`.
    pub surface_ended:    bool,
    pub toasts:           Toasts,
}

impl<P: PlaybackSurface> EditorContext<P> {
    pub fn new(worker: BackendWorker, surface: P, toasts: Toasts) -> Self {
        Self {
            worker,
            surface,
            surface_target:   None,
            surface_duration: None,
            surface_ended:    false,
            toasts,
        }
    }

    /// Load `target` and park it at `media_time`.
    pub fn retarget(&mut self, target: SurfaceTarget, media_time: f64) {
        self.surface.load(&target.path);
        self.surface.seek(media_time);
        self.surface_target   = Some(target);
        self.surface_duration = None;
        self.surface_ended    = false;
    }

    pub fn seek_surface(&mut self, media_time: f64) {
        self.surface.seek(media_time);
        self.surface_ended = false;
    }

    /// Unload and go idle. No-op when already idle.
    pub fn idle_surface(&mut self) {
        if self.surface_target.take().is_some() {
            self.surface.unload();
            self.surface_duration = None;
            self.surface_ended    = false;
        }
    }

    /// Drain surface notifications into the tracking fields above. A time
    /// report at or past the known media end counts as `Ended`.
    pub fn ingest_surface_events(&mut self) {
        for event in self.surface.poll_events() {
            match event {
                SurfaceEvent::Ended            => self.surface_ended = true,
                SurfaceEvent::DurationKnown(d) => self.surface_duration = Some(d),
                SurfaceEvent::TimeUpdate(t)    => {
                    if self.past_media_end(t) {
                        self.surface_ended = true;
                    }
                }
            }
        }
    }

    /// True once the surface has nothing left to play for its target, so it
    /// can no longer drive the clock.
    pub fn surface_exhausted(&self) -> bool {
        self.surface_ended || self.past_media_end(self.surface.current_time())
    }

    fn past_media_end(&self, media_time: f64) -> bool {
        self.surface_duration.is_some_and(|d| media_time >= d)
    }

    /// Tear down on exit: parked backend requests resolve as failed.
    pub fn shutdown(&mut self) {
        self.worker.shutdown();
        self.idle_surface();
    }
}
