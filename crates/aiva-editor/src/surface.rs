// crates/aiva-editor/src/surface.rs
//
// The playback surface: whatever actually decodes and shows media. The
// controller retargets it (load + seek) as the active clip changes and reads
// its media time back as the master clock while it plays.
//
// Times here are media seconds, relative to the loaded file's start. Turning
// them into timeline positions is the controller's job.

use std::time::Instant;

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// Media reached its end; the surface is now paused.
    Ended,
    TimeUpdate(f64),
    /// Media duration became known after a load.
    DurationKnown(f64),
}

pub trait PlaybackSurface {
    /// Path of the loaded media, if any.
    fn source(&self) -> Option<&str>;
    /// Replace the loaded media. Leaves the surface paused at 0.
    fn load(&mut self, path: &str);
    fn unload(&mut self);
    fn current_time(&self) -> f64;
    fn seek(&mut self, seconds: f64);
    fn is_paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// `None` until the media's duration is known.
    fn duration(&self) -> Option<f64>;
    /// Events since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
}

// ── HeadlessSurface ───────────────────────────────────────────────────────────

/// Decodes nothing. Media time advances with the wall clock while playing,
/// which is enough to drive the clock from the `aiva` shell.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    source:   Option<String>,
    /// Media time at `anchor`.
    offset:   f64,
    /// Set while playing.
    anchor:   Option<Instant>,
    duration: Option<f64>,
    events:   Vec<SurfaceEvent>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the decoder reported the media length.
    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = Some(seconds);
        self.events.push(SurfaceEvent::DurationKnown(seconds));
    }
}

impl PlaybackSurface for HeadlessSurface {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn load(&mut self, path: &str) {
        debug!(path, "surface load");
        self.source   = Some(path.to_string());
        self.offset   = 0.0;
        self.anchor   = None;
        self.duration = None;
    }

    fn unload(&mut self) {
        debug!("surface idle");
        self.source   = None;
        self.offset   = 0.0;
        self.anchor   = None;
        self.duration = None;
    }

    fn current_time(&self) -> f64 {
        let t = match self.anchor {
            Some(at) => self.offset + at.elapsed().as_secs_f64(),
            None     => self.offset,
        };
        match self.duration {
            Some(d) => t.min(d),
            None    => t,
        }
    }

    fn seek(&mut self, seconds: f64) {
        self.offset = seconds.max(0.0);
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }

    fn is_paused(&self) -> bool {
        self.anchor.is_none()
    }

    fn play(&mut self) {
        if self.source.is_some() && self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.offset = self.current_time();
        self.anchor = None;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        if self.anchor.is_some() {
            let t = self.current_time();
            if self.duration.is_some_and(|d| t >= d) {
                self.offset = t;
                self.anchor = None;
                self.events.push(SurfaceEvent::Ended);
            } else {
                self.events.push(SurfaceEvent::TimeUpdate(t));
            }
        }
        std::mem::take(&mut self.events)
    }
}
