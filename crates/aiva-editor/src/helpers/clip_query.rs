// crates/aiva-editor/src/helpers/clip_query.rs
//
// Clip lookups shared by the controller and the shell. All of them borrow
// the timeline immutably and hand back references tied to it.

use aiva_core::composition::{active_clip_at, audio_clips_at};
use aiva_core::state::{Clip, ClipId, Timeline};

/// The selected clip, or `None` when nothing is selected or it was deleted.
#[inline]
pub fn selected_clip<'t>(timeline: &'t Timeline, selection: Option<&ClipId>) -> Option<&'t Clip> {
    selection.and_then(|id| timeline.find_clip(id))
}

/// The clip under the playhead: the visible video clip first, otherwise the
/// first audio clip sounding there.
pub fn clip_under_playhead(timeline: &Timeline, playhead: i64) -> Option<&Clip> {
    active_clip_at(timeline, playhead)
        .or_else(|| audio_clips_at(timeline, playhead).into_iter().next())
}

/// Target of a clip action with no explicit clip: the selection, falling
/// back to the clip under the playhead.
pub fn action_target<'t>(
    timeline:  &'t Timeline,
    selection: Option<&ClipId>,
    playhead:  i64,
) -> Option<&'t Clip> {
    selected_clip(timeline, selection).or_else(|| clip_under_playhead(timeline, playhead))
}

/// Resolve a user-typed clip reference: a full id, or a unique id prefix.
pub fn find_by_prefix<'t>(timeline: &'t Timeline, prefix: &str) -> Option<&'t Clip> {
    if prefix.is_empty() {
        return None;
    }
    let mut hits = timeline.all_clips().filter(|c| c.id.as_str().starts_with(prefix));
    let first = hits.next()?;
    if first.id.as_str() == prefix || hits.next().is_none() {
        Some(first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiva_core::state::{ClipKind, TrackKind};

    fn sample() -> (Timeline, Clip, Clip) {
        let (tl, v) = Timeline::new().add_track(TrackKind::Video);
        let (tl, a) = tl.add_track(TrackKind::Audio);
        let video = Clip::new("v.mp4", ClipKind::Video, 0, 500);
        let audio = Clip::new("a.wav", ClipKind::Audio, 0, 2000);
        let tl = tl.add_clip(&v, video.clone()).add_clip(&a, audio.clone());
        (tl, video, audio)
    }

    #[test]
    fn selection_wins_over_playhead() {
        let (tl, video, audio) = sample();
        assert_eq!(action_target(&tl, Some(&audio.id), 100).map(|c| &c.id), Some(&audio.id));
        assert_eq!(action_target(&tl, None, 100).map(|c| &c.id), Some(&video.id));
    }

    #[test]
    fn falls_back_to_audio_past_video() {
        let (tl, _, audio) = sample();
        assert_eq!(clip_under_playhead(&tl, 1500).map(|c| &c.id), Some(&audio.id));
        assert!(clip_under_playhead(&tl, 5000).is_none());
    }

    #[test]
    fn stale_selection_falls_back() {
        let (tl, video, audio) = sample();
        let tl = tl.remove_clip(&audio.id);
        assert_eq!(action_target(&tl, Some(&audio.id), 10).map(|c| &c.id), Some(&video.id));
    }

    #[test]
    fn prefix_lookup() {
        let (tl, video, _) = sample();
        assert_eq!(find_by_prefix(&tl, video.id.as_str()).map(|c| &c.id), Some(&video.id));
        assert!(find_by_prefix(&tl, "").is_none());
        assert!(find_by_prefix(&tl, "no-such-clip").is_none());
    }
}
