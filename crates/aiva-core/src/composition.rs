// crates/aiva-core/src/composition.rs
//
// "What is on screen right now?"
//
// Top track wins: video tracks are scanned from the last (top of the stack)
// down to the first. Within a track every clip whose [start, end] contains
// the playhead is a candidate, ends inclusive. Transition clips never
// occlude: a track whose only candidates are transitions passes the search
// down to the tracks below it.

use crate::state::{Clip, ClipKind, Timeline};

/// The single clip the playback surface should render at `playhead`, or
/// `None` when the surface should idle.
pub fn active_clip_at(timeline: &Timeline, playhead: i64) -> Option<&Clip> {
    timeline.video_tracks.iter().rev().find_map(|track| {
        track.clips_at(playhead).find(|c| c.kind != ClipKind::Transition)
    })
}

/// The transition clip layered over `playhead`, if any, searching top-down.
/// Shown in the shell's status readout; never affects which clip is rendered.
pub fn transition_at(timeline: &Timeline, playhead: i64) -> Option<&Clip> {
    timeline.video_tracks.iter().rev().find_map(|track| {
        track.clips_at(playhead).find(|c| c.kind == ClipKind::Transition)
    })
}

/// Audio clips sounding at `playhead`, one entry per audio track at most.
pub fn audio_clips_at(timeline: &Timeline, playhead: i64) -> Vec<&Clip> {
    timeline.audio_tracks.iter()
        .filter_map(|track| track.clips_at(playhead).find(|c| c.enabled != Some(false)))
        .collect()
}
