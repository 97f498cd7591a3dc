// crates/aiva-core/src/editor.rs
//
// Clip editing: split, move, trim, lift-delete.
//
// All operations take the Timeline by value and hand back the edited value.
// Out-of-range requests are clamped rather than rejected, because a drag
// produces transient nonsense intents on almost every pointer event.
//
// Frame snapping is the caller's job (see helpers::time::snap_to_frame and
// drag::DragSession). Nothing here rounds positions onto the frame grid.

use tracing::debug;

use crate::state::{Clip, ClipId, ClipPatch, Timeline, Track};

/// Which edge of a clip a trim operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrimEdge {
    Leading,
    Trailing,
}

/// The clip ids involved in a split on one track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutcome {
    /// The clip that was replaced; it no longer exists in the timeline.
    pub source: ClipId,
    pub left:   ClipId,
    pub right:  ClipId,
}

/// Split every track's interior clip at `position`.
///
/// Each track is handled independently; a clip matches when
/// `start < position < start + extent`. The returned outcome is the first
/// video-track split if any, otherwise the first audio-track split. `None`
/// means nothing was interior to `position` and the timeline is unchanged.
pub fn split(mut timeline: Timeline, position: i64) -> (Timeline, Option<SplitOutcome>) {
    let mut representative = None;
    for track in timeline.all_tracks_mut() {
        if let Some(outcome) = split_track(track, position) {
            debug!(track = %track.id, clip = %outcome.source, position, "clip split");
            if representative.is_none() {
                representative = Some(outcome);
            }
        }
    }
    (timeline, representative)
}

fn split_track(track: &mut Track, position: i64) -> Option<SplitOutcome> {
    // Clips in one track are treated as non-overlapping here; the first
    // interior match is the one that gets cut.
    let idx = track.clips.iter().position(|c| c.is_interior(position))?;
    let (left, right) = split_clip(&track.clips[idx], position);
    let outcome = SplitOutcome {
        source: track.clips[idx].id.clone(),
        left:   left.id.clone(),
        right:  right.id.clone(),
    };
    track.clips.splice(idx..=idx, [left, right]);
    Some(outcome)
}

/// The two halves of `clip` cut at interior `position`, each with a fresh id
/// and every other field inherited unchanged.
pub fn split_clip(clip: &Clip, position: i64) -> (Clip, Clip) {
    let left_extent = position - clip.start;
    let left = Clip {
        id:     ClipId::fresh(),
        extent: left_extent,
        ..clip.clone()
    };
    let right = Clip {
        id:     ClipId::fresh(),
        start:  position,
        extent: clip.extent - left_extent,
        ..clip.clone()
    };
    (left, right)
}

/// Set the clip's start to `max(0, new_start)`. Extent and siblings are untouched.
pub fn move_clip(timeline: Timeline, id: &ClipId, new_start: i64) -> Timeline {
    timeline.update_clip(id, &ClipPatch::start(new_start.max(0)))
}

/// Trim one edge of the clip by `delta` units.
pub fn trim(timeline: Timeline, id: &ClipId, edge: TrimEdge, delta: i64) -> Timeline {
    let Some(clip) = timeline.find_clip(id) else {
        return timeline;
    };
    let (start, extent) = trimmed(clip.start, clip.extent, edge, delta);
    timeline.update_clip(id, &ClipPatch::placement(start, extent))
}

/// Pure trim arithmetic on an original `(start, extent)` pair.
///
/// Trailing: `extent' = max(1, extent + delta)`.
/// Leading: the delta is clamped so `start' >= 0`, then truncated so
/// `extent' >= 1`; the right edge never moves.
pub fn trimmed(start: i64, extent: i64, edge: TrimEdge, delta: i64) -> (i64, i64) {
    match edge {
        TrimEdge::Trailing => (start, extent.saturating_add(delta).max(1)),
        TrimEdge::Leading  => {
            let delta = delta.max(-start).min(extent - 1);
            (start.saturating_add(delta), extent.saturating_sub(delta))
        }
    }
}

/// Lift the clip out of every track. Gaps stay where they are (no ripple).
pub fn remove(timeline: Timeline, id: &ClipId) -> Timeline {
    debug!(clip = %id, "clip lifted");
    timeline.remove_clip(id)
}
