// crates/aiva-core/src/commands.rs
//
// Every user action in AIVA is expressed as an EditorCommand.
// Input surfaces (keyboard, pointer, voice, the headless shell) emit these;
// the EditorController processes them in order, one at a time.
// Adding a new feature = add a variant here + one match arm in the controller.

use std::path::PathBuf;

use serde_json::Value;

use crate::drag::DragMode;
use crate::editor::TrimEdge;
use crate::jobs::AiAction;
use crate::state::{Clip, ClipId, ClipPatch, TrackId, TrackKind};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // ── Playback ─────────────────────────────────────────────────────────────
    Play,
    Pause,
    TogglePlay,
    /// Jump the playhead (clamped to >= 0).
    SetPlayhead(i64),
    StepBack,
    StepForward,
    JumpToStart,
    /// Jump to the derived timeline duration.
    JumpToEnd,

    // ── Timeline ─────────────────────────────────────────────────────────────
    AddTrack(TrackKind),
    AddClip { track: TrackId, clip: Clip },
    UpdateClip { id: ClipId, patch: ClipPatch },
    SelectClip(Option<ClipId>),
    DeleteClip(ClipId),
    DeleteSelected,
    MoveClip { id: ClipId, new_start: i64 },
    TrimClip { id: ClipId, edge: TrimEdge, delta: i64 },
    SplitAt(i64),
    SplitAtPlayhead,
    AddMarker(i64),
    RemoveMarker(i64),
    ClearMarkers,

    // ── Pointer drags ────────────────────────────────────────────────────────
    /// Capture the clip's placement and push one undo snapshot.
    BeginDrag { id: ClipId, mode: DragMode },
    /// Cumulative pointer delta since BeginDrag, in canonical units.
    DragTo(i64),
    EndDrag,

    // ── Undo / Redo ──────────────────────────────────────────────────────────
    Undo,
    Redo,

    // ── Backend jobs ─────────────────────────────────────────────────────────
    /// Run an AI action on a clip; `None` targets the selection.
    ApplyAction { clip: Option<ClipId>, action: AiAction, params: Value },
    Transcribe(Option<ClipId>),
    DetectScenes(Option<ClipId>),
    Export { output_path: PathBuf },
    ClearJobs,

    // ── Voice ────────────────────────────────────────────────────────────────
    /// Recognized intent label (`CUT`, `PLAY`, …) plus the raw transcript.
    VoiceIntent { intent: String, text: String },

    // ── Project ──────────────────────────────────────────────────────────────
    SaveProject(PathBuf),
    LoadProject(PathBuf),
    NewProject,
}
