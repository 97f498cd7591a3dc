// crates/aiva-core/src/drag.rs
//
// Pointer drag gestures over a clip.
//
// A drag captures the clip's placement once, at drag begin. Every pointer
// move then recomputes the placement from that origin plus the cumulative
// delta since the press. Only the delta is snapped to the frame grid, so an
// off-grid clip keeps its offset and a zero delta leaves it in place.
// Repeated moves never compound rounding, and a clip deleted mid-drag just
// turns the remaining updates into no-ops.

use crate::editor::{trimmed, TrimEdge};
use crate::helpers::time::snap_to_frame;
use crate::state::{ClipId, ClipPatch, Timeline};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Trim(TrimEdge),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub clip_id:  ClipId,
    pub mode:     DragMode,
    origin_start:  i64,
    origin_extent: i64,
}

impl DragSession {
    /// Capture the clip's current placement. `None` if the clip is gone.
    pub fn begin(timeline: &Timeline, clip_id: &ClipId, mode: DragMode) -> Option<Self> {
        let clip = timeline.find_clip(clip_id)?;
        Some(Self {
            clip_id:       clip_id.clone(),
            mode,
            origin_start:  clip.start,
            origin_extent: clip.extent,
        })
    }

    pub fn origin(&self) -> (i64, i64) {
        (self.origin_start, self.origin_extent)
    }

    /// Placement for a cumulative pointer delta, in canonical units.
    pub fn placement(&self, cumulative_delta: i64) -> (i64, i64) {
        let delta = snap_to_frame(cumulative_delta);
        match self.mode {
            DragMode::Move => {
                let start = self.origin_start.saturating_add(delta).max(0);
                (start, self.origin_extent)
            }
            DragMode::Trim(edge) => trimmed(self.origin_start, self.origin_extent, edge, delta),
        }
    }

    /// Apply the placement for `cumulative_delta` to the timeline.
    pub fn update(&self, timeline: Timeline, cumulative_delta: i64) -> Timeline {
        let (start, extent) = self.placement(cumulative_delta);
        timeline.update_clip(&self.clip_id, &ClipPatch::placement(start, extent))
    }
}
