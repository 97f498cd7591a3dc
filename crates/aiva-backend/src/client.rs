// crates/aiva-backend/src/client.rs
//
// The processing backend as seen from the worker threads: one blocking call
// per request. `HttpBackend` is the real thing; tests plug in their own.

use std::time::Duration;

use tracing::{debug, warn};

use aiva_core::backend_types::{BackendOutcome, BackendRequest};

use crate::error::{BackendError, BackendResultOf};
use crate::protocol::{self, WireResponse};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT:  Duration = Duration::from_secs(300);

pub trait Backend: Send + Sync {
    /// Run `request` to completion. Transport failures are `Err`; a backend
    /// that answered with an error is `Ok(BackendOutcome::Error(..))`.
    fn execute(&self, request: &BackendRequest) -> BackendResultOf<BackendOutcome>;
}

pub struct HttpBackend {
    base_url: String,
    agent:    ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &BackendRequest) -> String {
        format!("{}{}", self.base_url, protocol::endpoint(request.kind))
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

impl Backend for HttpBackend {
    fn execute(&self, request: &BackendRequest) -> BackendResultOf<BackendOutcome> {
        let url  = self.url_for(request);
        let body = protocol::request_body(request);
        debug!(%url, kind = request.kind.label(), "backend request");

        let mut resp = self.agent.post(&url).send_json(&body)?;
        let wire: WireResponse = resp.body_mut().read_json().map_err(|e| {
            warn!(%url, "unreadable backend reply: {e}");
            BackendError::Decode(e.to_string())
        })?;
        Ok(protocol::decode(request.kind, wire))
    }
}
