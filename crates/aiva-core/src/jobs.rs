// crates/aiva-core/src/jobs.rs
//
// Outstanding backend work, most recent first.
//
// Lifecycle per job:  processing ──► completed | failed   (terminal)
//
// A job is created in `processing` at submission and resolves exactly once.
// Late or duplicate responses for a terminal job are ignored. Nothing here
// retries, expires or de-duplicates; `clear` is the only way jobs leave.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::ClipId;

// ── Job identity and kind ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing actions the backend `/apply` family understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    VoiceChanger,
    RemoveSilence,
    EnhanceAudio,
    StabilizeVideo,
    SmartCrop,
    NormalizeAudio,
    ReduceGain,
    ColorBoost,
    SmartEnhance,
    CinematicGrade,
    UpscaleAi,
    GenerativeFill,
}

impl AiAction {
    pub const ALL: [AiAction; 12] = [
        AiAction::VoiceChanger,
        AiAction::RemoveSilence,
        AiAction::EnhanceAudio,
        AiAction::StabilizeVideo,
        AiAction::SmartCrop,
        AiAction::NormalizeAudio,
        AiAction::ReduceGain,
        AiAction::ColorBoost,
        AiAction::SmartEnhance,
        AiAction::CinematicGrade,
        AiAction::UpscaleAi,
        AiAction::GenerativeFill,
    ];

    /// Wire name, e.g. `remove_silence`.
    pub fn as_str(self) -> &'static str {
        match self {
            AiAction::VoiceChanger   => "voice_changer",
            AiAction::RemoveSilence  => "remove_silence",
            AiAction::EnhanceAudio   => "enhance_audio",
            AiAction::StabilizeVideo => "stabilize_video",
            AiAction::SmartCrop      => "smart_crop",
            AiAction::NormalizeAudio => "normalize_audio",
            AiAction::ReduceGain     => "reduce_gain",
            AiAction::ColorBoost     => "color_boost",
            AiAction::SmartEnhance   => "smart_enhance",
            AiAction::CinematicGrade => "cinematic_grade",
            AiAction::UpscaleAi      => "upscale_ai",
            AiAction::GenerativeFill => "generative_fill",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// True when the action's output is an audio artifact.
    pub fn produces_audio(self) -> bool {
        matches!(
            self,
            AiAction::VoiceChanger
                | AiAction::RemoveSilence
                | AiAction::EnhanceAudio
                | AiAction::NormalizeAudio
                | AiAction::ReduceGain
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JobKind {
    Effect(AiAction),
    Transcribe,
    SceneDetect,
    Export,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            JobKind::Effect(a)   => a.as_str(),
            JobKind::Transcribe  => "transcribe",
            JobKind::SceneDetect => "scene_detect",
            JobKind::Export      => "export",
        }
    }
}

// ── Status and result ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// What a completed job produced.
#[derive(Clone, Debug, PartialEq)]
pub enum JobResult {
    /// Path of a new artifact written by the backend.
    Artifact(String),
    /// Transcription text.
    Transcript(String),
    /// Detected scene cuts, canonical units relative to the source start.
    Markers(Vec<i64>),
}

/// Terminal transition requested by a backend response.
#[derive(Clone, Debug, PartialEq)]
pub enum JobOutcome {
    Completed(Option<JobResult>),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    pub id:           JobId,
    pub kind:         JobKind,
    pub status:       JobStatus,
    pub submitted_at: DateTime<Utc>,
    /// Display name (usually the source artifact's file name).
    pub name:         String,
    /// Clip the job was submitted against, captured at submission.
    pub clip_id:      Option<ClipId>,
    pub result:       Option<JobResult>,
    pub error:        Option<String>,
}

impl Job {
    pub fn new(kind: JobKind, name: impl Into<String>, clip_id: Option<ClipId>) -> Self {
        Self {
            id:           JobId::fresh(),
            kind,
            status:       JobStatus::Pending,
            submitted_at: Utc::now(),
            name:         name.into(),
            clip_id,
            result:       None,
            error:        None,
        }
    }
}

// ── JobQueue ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct JobQueue {
    /// Index 0 is the most recently submitted job.
    jobs: Vec<Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the head in `processing`. Returns the job's id.
    pub fn submit(&mut self, mut job: Job) -> JobId {
        job.status = JobStatus::Processing;
        job.result = None;
        job.error  = None;
        let id = job.id;
        info!(job = %id, kind = job.kind.label(), name = %job.name, "job submitted");
        self.jobs.insert(0, job);
        id
    }

    /// Move `id` to its terminal state. Returns `false` (and changes nothing)
    /// when the job is unknown or already terminal.
    pub fn resolve(&mut self, id: JobId, outcome: JobOutcome) -> bool {
        let Some(job) = self.jobs.iter_mut().find(|j| j.id == id) else {
            debug!(job = %id, "resolve: unknown job, ignored");
            return false;
        };
        if job.status.is_terminal() {
            debug!(job = %id, status = ?job.status, "resolve: already terminal, ignored");
            return false;
        }
        match outcome {
            JobOutcome::Completed(result) => {
                job.status = JobStatus::Completed;
                job.result = result;
            }
            JobOutcome::Failed(msg) => {
                job.status = JobStatus::Failed;
                job.error  = Some(msg);
            }
        }
        info!(job = %id, status = ?job.status, "job resolved");
        true
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn processing_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.status == JobStatus::Processing).count()
    }

    /// The job of `kind` currently processing against `clip_id`, if any.
    pub fn in_flight(&self, clip_id: &ClipId, kind: JobKind) -> Option<&Job> {
        self.jobs.iter().find(|j| {
            j.status == JobStatus::Processing
                && j.kind == kind
                && j.clip_id.as_ref() == Some(clip_id)
        })
    }
}
