// crates/aiva-editor/src/scheduler.rs
//
// Timer-backed FrameScheduler for the headless binary. Running means a
// crossbeam tick channel exists; stopping drops it, so a paused editor
// wakes for nothing but input and backend results.

use std::time::{Duration, Instant};

use crossbeam_channel::{never, tick, Receiver};

use aiva_core::clock::FrameScheduler;

#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    ticks:  Option<Receiver<Instant>>,
}

impl TickScheduler {
    pub fn new(refresh_rate_hz: u32) -> Self {
        let hz = refresh_rate_hz.max(1);
        Self {
            period: Duration::from_secs(1) / hz,
            ticks:  None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Channel to select on. A receiver that never fires while stopped.
    pub fn receiver(&self) -> Receiver<Instant> {
        self.ticks.clone().unwrap_or_else(never)
    }
}

impl FrameScheduler for TickScheduler {
    fn start(&mut self) {
        self.ticks = Some(tick(self.period));
    }

    fn stop(&mut self) {
        self.ticks = None;
    }

    fn is_running(&self) -> bool {
        self.ticks.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_while_running() {
        let mut s = TickScheduler::new(100);
        assert_eq!(s.period(), Duration::from_millis(10));
        assert!(s.receiver().recv_timeout(Duration::from_millis(40)).is_err());

        s.start();
        assert!(s.is_running());
        assert!(s.receiver().recv_timeout(Duration::from_secs(1)).is_ok());

        s.stop();
        assert!(!s.is_running());
        assert!(s.receiver().recv_timeout(Duration::from_millis(40)).is_err());
    }
}
