// crates/aiva-backend/src/protocol.rs
//
// JSON wire format of the processing backend.
//
// Requests:
//   POST /apply               { action, file_path, context }
//   POST /ai/generative_fill  { file_path, context }
//   POST /ai/transcribe       { file_path }
//   POST /ai/scene_detect     { file_path }
//   POST /export              { output_path, project }
//
// Replies share one loose shape: `status` is "success" or "error", with
// `message` on error. The payload field depends on the endpoint:
// `output_file` / `image_path` for artifacts, `transcription` (string or
// `{ text }`) for transcripts, `scenes` (list of `{ time }`, or a "nothing
// found" string) for scene detection.

use serde::Deserialize;
use serde_json::{json, Value};

use aiva_core::backend_types::{BackendOutcome, BackendRequest};
use aiva_core::helpers::time::seconds_to_units;
use aiva_core::jobs::{AiAction, JobKind};

/// Path relative to the backend base URL.
pub fn endpoint(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Effect(AiAction::GenerativeFill) => "/ai/generative_fill",
        JobKind::Effect(_)                        => "/apply",
        JobKind::Transcribe                       => "/ai/transcribe",
        JobKind::SceneDetect                      => "/ai/scene_detect",
        JobKind::Export                           => "/export",
    }
}

/// JSON body for `request`.
pub fn request_body(request: &BackendRequest) -> Value {
    let context = if request.params.is_null() { json!({}) } else { request.params.clone() };
    match request.kind {
        JobKind::Effect(AiAction::GenerativeFill) => json!({
            "file_path": request.artifact_path,
            "context":   context,
        }),
        JobKind::Effect(action) => json!({
            "action":    action.as_str(),
            "file_path": request.artifact_path,
            "context":   context,
        }),
        JobKind::Transcribe | JobKind::SceneDetect => json!({
            "file_path": request.artifact_path,
        }),
        JobKind::Export => json!({
            "output_path": request.artifact_path,
            "project":     request.params,
        }),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WireResponse {
    #[serde(default)]
    pub status:        Option<String>,
    #[serde(default)]
    pub message:       Option<String>,
    #[serde(default)]
    pub output_file:   Option<String>,
    #[serde(default)]
    pub image_path:    Option<String>,
    #[serde(default)]
    pub transcription: Option<WireTranscript>,
    #[serde(default)]
    pub text:          Option<String>,
    #[serde(default)]
    pub scenes:        Option<WireScenes>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireTranscript {
    Text(String),
    Object { text: String },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireScenes {
    List(Vec<WireScene>),
    /// "No scene changes detected"
    Note(String),
}

#[derive(Debug, Deserialize)]
pub struct WireScene {
    #[serde(alias = "timeSeconds", alias = "time_seconds")]
    pub time: f64,
}

/// Map a reply onto the outcome for a job of `kind`.
pub fn decode(kind: JobKind, resp: WireResponse) -> BackendOutcome {
    let failed = resp.status.as_deref().is_some_and(|s| s != "success");
    if failed {
        return BackendOutcome::Error(
            resp.message.unwrap_or_else(|| "backend reported an error".into()),
        );
    }
    match kind {
        JobKind::Transcribe => {
            let text = match resp.transcription {
                Some(WireTranscript::Text(t))           => Some(t),
                Some(WireTranscript::Object { text })   => Some(text),
                None                                    => resp.text,
            };
            match text {
                Some(t) => BackendOutcome::Transcript(t),
                None    => BackendOutcome::Error("transcription missing from response".into()),
            }
        }
        JobKind::SceneDetect => {
            let markers = match resp.scenes {
                Some(WireScenes::List(scenes)) => scenes.iter()
                    .filter(|s| s.time.is_finite() && s.time >= 0.0)
                    .map(|s| seconds_to_units(s.time))
                    .collect(),
                Some(WireScenes::Note(_)) | None => Vec::new(),
            };
            BackendOutcome::Markers(markers)
        }
        JobKind::Effect(_) | JobKind::Export => {
            BackendOutcome::Artifact(resp.output_file.or(resp.image_path))
        }
    }
}

/// Parse a raw JSON reply body.
pub fn decode_str(kind: JobKind, body: &str) -> Result<BackendOutcome, serde_json::Error> {
    Ok(decode(kind, serde_json::from_str(body)?))
}
