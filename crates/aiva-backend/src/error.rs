// crates/aiva-backend/src/error.rs

use thiserror::Error;

pub type BackendResultOf<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection refused, timeout, TLS, non-2xx status…
    #[error("Backend request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Backend worker is shutting down")]
    ShuttingDown,
}
