// crates/aiva-core/src/project.rs
//
// Versioned project file: { version, videoTracks, audioTracks, markers }.
//
// Every Clip field round-trips. Files without a `version` are treated as
// version 1 (the first layout, written before versioning existed). Files
// from a newer build are refused rather than silently truncated.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ProjectError, ProjectResult};
use crate::state::{Timeline, Track};

pub const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 { 1 }

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default = "default_version")]
    pub version:      u32,
    #[serde(default)]
    pub video_tracks: Vec<Track>,
    #[serde(default)]
    pub audio_tracks: Vec<Track>,
    #[serde(default)]
    pub markers:      Vec<i64>,
}

impl ProjectFile {
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self {
            version:      CURRENT_VERSION,
            video_tracks: timeline.video_tracks.clone(),
            audio_tracks: timeline.audio_tracks.clone(),
            markers:      timeline.markers.clone(),
        }
    }

    pub fn into_timeline(self) -> ProjectResult<Timeline> {
        if self.version > CURRENT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                found:     self.version,
                supported: CURRENT_VERSION,
            });
        }
        let timeline = Timeline {
            video_tracks: self.video_tracks,
            audio_tracks: self.audio_tracks,
            markers:      self.markers,
        };
        Ok(timeline.normalize())
    }
}

pub fn to_json(timeline: &Timeline) -> ProjectResult<String> {
    Ok(serde_json::to_string_pretty(&ProjectFile::from_timeline(timeline))?)
}

pub fn from_json(json: &str) -> ProjectResult<Timeline> {
    serde_json::from_str::<ProjectFile>(json)?.into_timeline()
}

/// Write the project as pretty JSON. The file is written next to `path`
/// under a temporary name and renamed into place, so a crash mid-write never
/// leaves a truncated project behind.
pub fn save_project(path: &Path, timeline: &Timeline) -> ProjectResult<()> {
    let json = to_json(timeline)?;
    let tmp = path.with_extension("json.tmp");
    let mut f = fs::File::create(&tmp).map_err(|e| ProjectError::io(&tmp, e))?;
    f.write_all(json.as_bytes()).map_err(|e| ProjectError::io(&tmp, e))?;
    f.sync_all().map_err(|e| ProjectError::io(&tmp, e))?;
    drop(f);
    fs::rename(&tmp, path).map_err(|e| ProjectError::io(path, e))?;
    info!(path = %path.display(), clips = timeline.clip_count(), "project saved");
    Ok(())
}

pub fn load_project(path: &Path) -> ProjectResult<Timeline> {
    let json = fs::read_to_string(path).map_err(|e| ProjectError::io(path, e))?;
    let timeline = from_json(&json)?;
    info!(path = %path.display(), clips = timeline.clip_count(), "project loaded");
    Ok(timeline)
}
