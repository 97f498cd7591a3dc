// crates/aiva-core/src/backend_types.rs
//
// Types that flow across the channel between aiva-backend and aiva-editor.
// No HTTP and no threads, just plain data.

use serde_json::Value;

use crate::jobs::{JobId, JobKind, JobOutcome, JobResult};
use crate::state::ClipId;

/// One request to the processing backend.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendRequest {
    pub kind:          JobKind,
    /// Artifact the action runs on (the clip's `path`, or the export target).
    pub artifact_path: String,
    /// Free-form action parameters (`{"effect": "robot"}`, a project body, …).
    pub params:        Value,
}

impl BackendRequest {
    pub fn new(kind: JobKind, artifact_path: impl Into<String>) -> Self {
        Self { kind, artifact_path: artifact_path.into(), params: Value::Null }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }
}

/// Decoded backend reply.
#[derive(Clone, Debug, PartialEq)]
pub enum BackendOutcome {
    /// Success with a new artifact path. `None` when the backend reported
    /// success without producing a file.
    Artifact(Option<String>),
    Transcript(String),
    /// Scene cuts in canonical units, relative to the artifact start.
    Markers(Vec<i64>),
    Error(String),
}

impl BackendOutcome {
    /// The terminal job transition this reply maps to.
    pub fn to_job_outcome(&self) -> JobOutcome {
        match self {
            BackendOutcome::Artifact(path) => {
                JobOutcome::Completed(path.clone().map(JobResult::Artifact))
            }
            BackendOutcome::Transcript(text) => {
                JobOutcome::Completed(Some(JobResult::Transcript(text.clone())))
            }
            BackendOutcome::Markers(m) => JobOutcome::Completed(Some(JobResult::Markers(m.clone()))),
            BackendOutcome::Error(msg) => JobOutcome::Failed(msg.clone()),
        }
    }
}

/// Result sent from the backend worker threads to the editor.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendResult {
    pub job_id:  JobId,
    /// Clip captured at submission time; may no longer exist.
    pub clip_id: Option<ClipId>,
    pub kind:    JobKind,
    pub outcome: BackendOutcome,
}
