// crates/aiva-backend/src/lib.rs
//
// Talks to the AI processing backend over HTTP. No editor state here:
// requests come in through BackendWorker::submit, results go back to
// aiva-editor over a channel.

pub mod client;
pub mod error;
pub mod protocol;
pub mod worker;

pub use client::{Backend, HttpBackend};
pub use error::BackendError;
pub use worker::BackendWorker;
pub use aiva_core::backend_types::{BackendOutcome, BackendRequest, BackendResult};
