// crates/aiva-core/src/state.rs
// Pure timeline data: tracks, clips, markers. No I/O, no runtime handles.
// Serializable via serde. Used by aiva-backend and aiva-editor.
//
// Every mutation consumes the Timeline and returns the new value, so the
// controller that owns the single current Timeline is the only writer and no
// two callers can ever observe a half-applied edit.
//
// Addressing a missing track or clip is never an error: deletion can race
// with queued edits and backend completions, so those calls are no-ops.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::helpers::time::MIN_DURATION_UNITS;

// ── Ids ───────────────────────────────────────────────────────────────────────

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh random id (uuid v4 text).
            pub fn fresh() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self { Self(s.to_owned()) }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self { Self(s) }
        }
    };
}

string_id!(ClipId);
string_id!(TrackId);

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    #[default]
    Video,
    Audio,
    Image,
    /// Built-in synthetic marker layered over a cut. Never occludes footage.
    Transition,
    /// Built-in synthetic effect node. Not a decodable file.
    Effect,
}

impl ClipKind {
    /// True for kinds whose `path` names a real file the playback surface can load.
    pub fn is_decodable(self) -> bool {
        matches!(self, ClipKind::Video | ClipKind::Audio | ClipKind::Image)
    }

    pub fn label(self) -> &'static str {
        match self {
            ClipKind::Video      => "video",
            ClipKind::Audio      => "audio",
            ClipKind::Image      => "image",
            ClipKind::Transition => "transition",
            ClipKind::Effect     => "effect",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "video"      => Some(ClipKind::Video),
            "audio"      => Some(ClipKind::Audio),
            "image"      => Some(ClipKind::Image),
            "transition" => Some(ClipKind::Transition),
            "effect"     => Some(ClipKind::Effect),
            _            => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

// ── Clip parameters ───────────────────────────────────────────────────────────
// Pass-through state owned by the inspector. The core stores and round-trips
// these values but enforces no ranges on them.

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_x:   Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_y:   Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale:   Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorGrade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lift:        Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma:       Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain:        Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation:  Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast:    Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint:        Option<f32>,
}

/// Slate metadata carried over from the asset bin.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel:  Option<String>,
}

// ── Clip ──────────────────────────────────────────────────────────────────────

/// A placed reference to a media or synthetic artifact on a track.
///
/// `start` and `extent` are canonical units (100 = 1 s). The model keeps
/// `start >= 0` and `extent >= 1` for every clip it holds.
///
/// On disk `extent` is stored as `width` and `kind` as `type`, which is the
/// layout older project files use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id:    ClipId,
    #[serde(default)]
    pub name:  String,
    /// Artifact reference. Owned by the backend/storage, not by the timeline.
    pub path:  String,
    #[serde(rename = "type", default)]
    pub kind:  ClipKind,
    pub start: i64,
    #[serde(rename = "width", alias = "extent")]
    pub extent: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(flatten)]
    pub grade:     ColorGrade,
    #[serde(flatten)]
    pub metadata:  ClipMetadata,
    /// Per-clip gain multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume:  Option<f32>,
    /// `Some(false)` disables an effect/transition node without removing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Result text attached by a transcription job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
}

impl Clip {
    /// New clip with a fresh id. `start`/`extent` are clamped into range.
    pub fn new(path: impl Into<String>, kind: ClipKind, start: i64, extent: i64) -> Self {
        let path = path.into();
        let name = path.rsplit(['/', '\\']).next().unwrap_or_default().to_string();
        Self {
            id:            ClipId::fresh(),
            name,
            path,
            kind,
            start:         start.max(0),
            extent:        extent.max(1),
            color:         None,
            transform:     Transform::default(),
            grade:         ColorGrade::default(),
            metadata:      ClipMetadata::default(),
            volume:        None,
            enabled:       None,
            transcription: None,
        }
    }

    /// Exclusive end position, saturating at `i64::MAX`.
    pub fn end(&self) -> i64 {
        self.start.saturating_add(self.extent)
    }

    /// `[start, end]`, inclusive on both ends (composition semantics).
    pub fn covers(&self, pos: i64) -> bool {
        self.start <= pos && pos <= self.end()
    }

    /// `start < pos < end` (split semantics).
    pub fn is_interior(&self, pos: i64) -> bool {
        self.start < pos && pos < self.end()
    }

    pub(crate) fn clamp_extents(&mut self) {
        self.start  = self.start.max(0);
        self.extent = self.extent.max(1);
    }
}

/// Partial update for `Timeline::update_clip`. `None` members leave the
/// field untouched. Transform/grade/metadata are replaced as a unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipPatch {
    pub name:          Option<String>,
    pub path:          Option<String>,
    pub kind:          Option<ClipKind>,
    pub start:         Option<i64>,
    pub extent:        Option<i64>,
    pub color:         Option<String>,
    pub transform:     Option<Transform>,
    pub grade:         Option<ColorGrade>,
    pub metadata:      Option<ClipMetadata>,
    pub volume:        Option<f32>,
    pub enabled:       Option<bool>,
    pub transcription: Option<String>,
}

impl ClipPatch {
    pub fn start(start: i64) -> Self {
        Self { start: Some(start), ..Self::default() }
    }

    pub fn extent(extent: i64) -> Self {
        Self { extent: Some(extent), ..Self::default() }
    }

    pub fn placement(start: i64, extent: i64) -> Self {
        Self { start: Some(start), extent: Some(extent), ..Self::default() }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self { path: Some(path.into()), ..Self::default() }
    }

    pub fn transcription(text: impl Into<String>) -> Self {
        Self { transcription: Some(text.into()), ..Self::default() }
    }

    /// Apply onto `clip`, clamping start/extent back into range.
    pub fn apply(&self, clip: &mut Clip) {
        if let Some(v) = &self.name          { clip.name = v.clone(); }
        if let Some(v) = &self.path          { clip.path = v.clone(); }
        if let Some(v) = self.kind           { clip.kind = v; }
        if let Some(v) = self.start          { clip.start = v; }
        if let Some(v) = self.extent         { clip.extent = v; }
        if let Some(v) = &self.color         { clip.color = Some(v.clone()); }
        if let Some(v) = &self.transform     { clip.transform = v.clone(); }
        if let Some(v) = &self.grade         { clip.grade = v.clone(); }
        if let Some(v) = &self.metadata      { clip.metadata = v.clone(); }
        if let Some(v) = self.volume         { clip.volume = Some(v); }
        if let Some(v) = self.enabled        { clip.enabled = Some(v); }
        if let Some(v) = &self.transcription { clip.transcription = Some(v.clone()); }
        clip.clamp_extents();
    }
}

// ── Track ─────────────────────────────────────────────────────────────────────

/// Clips in insertion order (not sorted by position).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id:    TrackId,
    pub kind:  TrackKind,
    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self { id: TrackId::fresh(), kind, clips: Vec::new() }
    }

    /// Clips whose `[start, end]` contains `pos`, in insertion order.
    pub fn clips_at(&self, pos: i64) -> impl Iterator<Item = &Clip> {
        self.clips.iter().filter(move |c| c.covers(pos))
    }
}

// ── Timeline ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Index 0 is the bottom of the stack; the last track renders on top.
    pub video_tracks: Vec<Track>,
    pub audio_tracks: Vec<Track>,
    /// Scene-cut annotations in canonical units, sorted and unique.
    pub markers:      Vec<i64>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty track. Existing tracks keep their ids and order.
    pub fn add_track(mut self, kind: TrackKind) -> (Self, TrackId) {
        let track = Track::new(kind);
        let id = track.id.clone();
        debug!(track = %id, ?kind, "track added");
        self.tracks_mut(kind).push(track);
        (self, id)
    }

    /// Append `clip` to the named track. Unknown `track_id` is a no-op.
    pub fn add_clip(mut self, track_id: &TrackId, mut clip: Clip) -> Self {
        clip.clamp_extents();
        match self.track_mut(track_id) {
            Some(track) => {
                debug!(track = %track_id, clip = %clip.id, "clip added");
                track.clips.push(clip);
            }
            None => debug!(track = %track_id, "add_clip: unknown track, ignored"),
        }
        self
    }

    /// Apply `patch` to every clip with `id`, across video and audio tracks.
    /// A missing id is a no-op.
    pub fn update_clip(mut self, id: &ClipId, patch: &ClipPatch) -> Self {
        let mut hit = false;
        for clip in self.all_tracks_mut().flat_map(|t| t.clips.iter_mut()) {
            if &clip.id == id {
                patch.apply(clip);
                hit = true;
            }
        }
        if !hit {
            debug!(clip = %id, "update_clip: id not found, ignored");
        }
        self
    }

    /// Remove `id` from whichever track(s) hold it. A missing id is a no-op.
    pub fn remove_clip(mut self, id: &ClipId) -> Self {
        for track in self.all_tracks_mut() {
            track.clips.retain(|c| &c.id != id);
        }
        self
    }

    /// First clip with `id`, searching video tracks then audio tracks.
    pub fn find_clip(&self, id: &ClipId) -> Option<&Clip> {
        self.all_clips().find(|c| &c.id == id)
    }

    /// The track currently holding `id`, using the same search order as `find_clip`.
    pub fn track_of(&self, id: &ClipId) -> Option<&Track> {
        self.all_tracks().find(|t| t.clips.iter().any(|c| &c.id == id))
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.all_tracks().find(|t| &t.id == id)
    }

    pub fn tracks(&self, kind: TrackKind) -> &[Track] {
        match kind {
            TrackKind::Video => &self.video_tracks,
            TrackKind::Audio => &self.audio_tracks,
        }
    }

    /// Video tracks first, then audio tracks.
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.video_tracks.iter().chain(self.audio_tracks.iter())
    }

    pub fn all_clips(&self) -> impl Iterator<Item = &Clip> {
        self.all_tracks().flat_map(|t| t.clips.iter())
    }

    pub fn clip_count(&self) -> usize {
        self.all_tracks().map(|t| t.clips.len()).sum()
    }

    /// Derived duration: the latest clip end, floored at 60 s. Never stored.
    pub fn duration(&self) -> i64 {
        self.all_clips()
            .map(Clip::end)
            .fold(MIN_DURATION_UNITS, i64::max)
    }

    // ── Markers ──────────────────────────────────────────────────────────────

    pub fn add_marker(mut self, pos: i64) -> Self {
        let pos = pos.max(0);
        if let Err(idx) = self.markers.binary_search(&pos) {
            self.markers.insert(idx, pos);
        }
        self
    }

    pub fn add_markers(self, positions: impl IntoIterator<Item = i64>) -> Self {
        positions.into_iter().fold(self, Timeline::add_marker)
    }

    pub fn remove_marker(mut self, pos: i64) -> Self {
        self.markers.retain(|&m| m != pos);
        self
    }

    pub fn clear_markers(mut self) -> Self {
        self.markers.clear();
        self
    }

    // ── Internal ─────────────────────────────────────────────────────────────

    pub(crate) fn tracks_mut(&mut self, kind: TrackKind) -> &mut Vec<Track> {
        match kind {
            TrackKind::Video => &mut self.video_tracks,
            TrackKind::Audio => &mut self.audio_tracks,
        }
    }

    pub(crate) fn all_tracks_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.video_tracks.iter_mut().chain(self.audio_tracks.iter_mut())
    }

    fn track_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.all_tracks_mut().find(|t| &t.id == id)
    }

    /// Restore the model invariants on data that did not come through the
    /// mutation API (e.g. a loaded project file).
    pub(crate) fn normalize(mut self) -> Self {
        for clip in self.all_tracks_mut().flat_map(|t| t.clips.iter_mut()) {
            clip.clamp_extents();
        }
        for m in &mut self.markers {
            *m = (*m).max(0);
        }
        self.markers.sort_unstable();
        self.markers.dedup();
        self
    }
}
