// crates/aiva-core/src/clock.rs
//
// The playhead clock.
//
// While playing, each animation tick produces the new playhead:
//   - surface-driven: the playback surface is active and not paused, so its
//     time is the master clock (`seconds * 100`);
//   - free-running: no surface is active, so the playhead advances by
//     `100 / refresh_rate_hz` units per tick, carrying the remainder between
//     ticks in integer arithmetic so 60 ticks at 60 Hz advance exactly one
//     second.
// While paused the playhead only moves through explicit navigation.
//
// Switching sources mid-playback can jump by one tick's worth; this is not
// smoothed.
//
// The recurring tick itself comes from an injected FrameScheduler. The clock
// starts it on play and stops it on pause, so no tick runs while paused.

use tracing::debug;

use crate::helpers::time::{step_back, step_forward, UNITS_PER_SECOND};

pub const DEFAULT_REFRESH_RATE_HZ: u32 = 60;

/// Recurring per-frame callback source (display refresh, timer thread, test stub).
pub trait FrameScheduler {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
}

/// Scheduler with no timer behind it. The owner calls `Clock::tick` by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    running: bool,
    starts:  u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `start` has been called.
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Where the last tick's playhead came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSource {
    Idle,
    Surface,
    FreeRunning,
}

#[derive(Debug)]
pub struct Clock<S: FrameScheduler> {
    scheduler:       S,
    playhead:        i64,
    playing:         bool,
    refresh_rate_hz: u32,
    /// Free-running remainder, in units * refresh_rate_hz.
    carry:           i64,
    source:          ClockSource,
}

impl<S: FrameScheduler> Clock<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_refresh_rate(scheduler, DEFAULT_REFRESH_RATE_HZ)
    }

    pub fn with_refresh_rate(scheduler: S, refresh_rate_hz: u32) -> Self {
        let refresh_rate_hz = if refresh_rate_hz > 0 { refresh_rate_hz } else { DEFAULT_REFRESH_RATE_HZ };
        Self {
            scheduler,
            playhead: 0,
            playing:  false,
            refresh_rate_hz,
            carry:    0,
            source:   ClockSource::Idle,
        }
    }

    pub fn playhead(&self) -> i64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }

    pub fn refresh_rate_hz(&self) -> u32 {
        self.refresh_rate_hz
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Units added per free-running tick.
    pub fn units_per_tick(&self) -> f64 {
        UNITS_PER_SECOND as f64 / self.refresh_rate_hz as f64
    }

    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.carry   = 0;
        self.scheduler.start();
        debug!(playhead = self.playhead, "clock started");
    }

    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.source  = ClockSource::Idle;
        self.scheduler.stop();
        debug!(playhead = self.playhead, "clock paused");
    }

    pub fn toggle(&mut self) {
        if self.playing { self.pause() } else { self.play() }
    }

    /// Advance one animation tick.
    ///
    /// `surface_time` is the playback surface's position in timeline seconds,
    /// or `None` when no surface is active or it is paused. Invalid readings
    /// (NaN, infinite, negative) count as no surface.
    pub fn tick(&mut self, surface_time: Option<f64>) -> i64 {
        if !self.playing {
            return self.playhead;
        }
        match surface_time.filter(|t| t.is_finite() && *t >= 0.0) {
            Some(secs) => {
                self.playhead = (secs * UNITS_PER_SECOND as f64).round() as i64;
                self.carry    = 0;
                self.source   = ClockSource::Surface;
            }
            None => {
                let hz = i64::from(self.refresh_rate_hz);
                self.carry += UNITS_PER_SECOND;
                self.playhead = self.playhead.saturating_add(self.carry / hz);
                self.carry %= hz;
                self.source = ClockSource::FreeRunning;
            }
        }
        self.playhead
    }

    /// Explicit navigation (jump, scrub, drag). Clamped to `>= 0`.
    pub fn seek(&mut self, units: i64) {
        self.playhead = units.max(0);
        self.carry    = 0;
    }

    pub fn step_back(&mut self) -> i64 {
        self.seek(step_back(self.playhead));
        self.playhead
    }

    pub fn step_forward(&mut self) -> i64 {
        self.seek(step_forward(self.playhead));
        self.playhead
    }
}
