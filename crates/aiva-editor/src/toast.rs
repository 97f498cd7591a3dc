// crates/aiva-editor/src/toast.rs
//
// Transient user notifications. Every backend failure ends up here as well
// as in the job list; nothing user-visible is reported any other way.

use std::time::{Duration, Instant};

use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    /// Increases by one per toast, so readers can tell which ones are new.
    pub id:      u64,
    pub level:   ToastLevel,
    pub message: String,
    pub created: Instant,
}

#[derive(Debug)]
pub struct Toasts {
    items:    Vec<Toast>,
    lifetime: Duration,
    next_id:  u64,
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Self {
        Self { items: Vec::new(), lifetime, next_id: 1 }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.push_at(level, message, Instant::now());
    }

    pub fn push_at(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        match level {
            ToastLevel::Error => warn!(toast = %message),
            _                 => info!(toast = %message),
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Toast { id, level, message, created: now });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    /// Drop toasts older than the configured lifetime.
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.items.retain(|t| now.saturating_duration_since(t.created) < lifetime);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    /// Toasts pushed after the one with id `seen`, oldest first.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &Toast> {
        self.items.iter().filter(move |t| t.id > seen)
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}
