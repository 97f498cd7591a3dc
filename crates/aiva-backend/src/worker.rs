// crates/aiva-backend/src/worker.rs
//
// BackendWorker: runs backend requests off the editor thread.
// All public API that aiva-editor calls lives here.
//
// Every submit spawns one gatekeeper thread that waits for a free slot and
// then runs the request itself, so at most `max_concurrent` requests are on
// the wire while queued ones sit parked on the condvar. Every submitted job
// produces exactly one BackendResult on `rx`, including on failure and
// shutdown, so the job queue never keeps a job processing forever.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use aiva_core::backend_types::{BackendOutcome, BackendRequest, BackendResult};
use aiva_core::jobs::JobId;
use aiva_core::state::ClipId;

use crate::client::Backend;
use crate::error::BackendError;

pub const DEFAULT_CONCURRENCY: u32 = 4;

type Slots = Arc<(Mutex<u32>, Condvar)>;

// RAII release: decrements the active count and wakes the next waiter.
struct SlotGuard(Slots);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.0;
        *lock.lock() -= 1;
        cvar.notify_one();
    }
}

pub struct BackendWorker {
    /// Results for every submitted job, in completion order.
    pub rx:         Receiver<BackendResult>,
    tx:             Sender<BackendResult>,
    backend:        Arc<dyn Backend>,
    shutdown:       Arc<AtomicBool>,
    slots:          Slots,
    max_concurrent: u32,
    /// Jobs submitted whose result has not been sent yet.
    in_flight:      Arc<Mutex<HashSet<JobId>>>,
}

impl BackendWorker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_concurrency(backend, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(backend: Arc<dyn Backend>, max_concurrent: u32) -> Self {
        let (tx, rx) = bounded(512);
        Self {
            rx,
            tx,
            backend,
            shutdown:       Arc::new(AtomicBool::new(false)),
            slots:          Arc::new((Mutex::new(0), Condvar::new())),
            max_concurrent: max_concurrent.max(1),
            in_flight:      Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Parked gatekeepers re-check the flag once woken.
        self.slots.1.notify_all();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    pub fn submit(&self, job_id: JobId, clip_id: Option<ClipId>, request: BackendRequest) {
        let tx        = self.tx.clone();
        let sd        = self.shutdown.clone();
        let slots     = self.slots.clone();
        let backend   = self.backend.clone();
        let in_flight = self.in_flight.clone();
        let limit     = self.max_concurrent;

        in_flight.lock().insert(job_id);
        debug!(job = %job_id, kind = request.kind.label(), "backend job queued");

        thread::spawn(move || {
            {
                let (lock, cvar) = &*slots;
                let mut active = lock.lock();
                while *active >= limit && !sd.load(Ordering::Relaxed) {
                    cvar.wait(&mut active);
                }
                *active += 1;
            }
            let _guard = SlotGuard(slots);

            let outcome = if sd.load(Ordering::Relaxed) {
                BackendOutcome::Error(BackendError::ShuttingDown.to_string())
            } else {
                match backend.execute(&request) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!(job = %job_id, "backend call failed: {e}");
                        BackendOutcome::Error(e.to_string())
                    }
                }
            };

            in_flight.lock().remove(&job_id);
            let result = BackendResult { job_id, clip_id, kind: request.kind, outcome };
            if tx.send(result).is_err() {
                debug!(job = %job_id, "result dropped, receiver gone");
            }
        });
    }
}

impl Drop for BackendWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
