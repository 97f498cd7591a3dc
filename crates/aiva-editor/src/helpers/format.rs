// crates/aiva-editor/src/helpers/format.rs
//
// Display strings for the shell. Time formatting lives in
// aiva_core::helpers::time; this module only lays things out.

use aiva_core::composition::{active_clip_at, transition_at};
use aiva_core::helpers::time::format_time;
use aiva_core::jobs::{Job, JobResult, JobStatus};
use aiva_core::state::{Clip, Timeline};

/// Clip `text` to at most `max` characters, ending in "…" when clipped.
pub fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    text.chars().take(max - 1).collect::<String>() + "…"
}

/// Short id for listings: the first 8 characters.
pub fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map(|(i, _)| &id[..i]).unwrap_or(id)
}

pub fn clip_line(clip: &Clip) -> String {
    format!(
        "{}  {:<10} {:<24} {} → {}",
        short_id(clip.id.as_str()),
        clip.kind.label(),
        fit(&clip.name, 24),
        format_time(clip.start),
        format_time(clip.end()),
    )
}

/// What the playhead sits on: the rendered clip plus any transition layered
/// over it.
pub fn on_screen_line(timeline: &Timeline, playhead: i64) -> String {
    let shown = active_clip_at(timeline, playhead)
        .map(|c| fit(&c.name, 24))
        .unwrap_or_else(|| "nothing".to_string());
    match transition_at(timeline, playhead) {
        Some(t) => format!("{shown} (under {})", fit(&t.name, 24)),
        None    => shown,
    }
}

pub fn job_line(job: &Job) -> String {
    let status = match job.status {
        JobStatus::Pending    => "pending",
        JobStatus::Processing => "processing",
        JobStatus::Completed  => "completed",
        JobStatus::Failed     => "failed",
    };
    let detail = match (&job.result, &job.error) {
        (_, Some(err))                           => fit(err, 40),
        (Some(JobResult::Artifact(p)), _)        => fit(p, 40),
        (Some(JobResult::Transcript(t)), _)      => format!("\"{}\"", fit(t, 38)),
        (Some(JobResult::Markers(m)), _)         => format!("{} markers", m.len()),
        (None, None)                             => String::new(),
    };
    format!(
        "{}  {:<16} {:<10} {:<20} {}",
        job.submitted_at.format("%H:%M:%S"),
        job.kind.label(),
        status,
        fit(&job.name, 20),
        detail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_unchanged() {
        assert_eq!(fit("hello", 10), "hello");
        assert_eq!(fit("hello", 5), "hello");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(fit("hello world", 6), "hello…");
        assert_eq!(fit("hello", 0), "");
    }

    #[test]
    fn multibyte_is_counted_by_char() {
        assert_eq!(fit("élan vital", 5), "élan…");
    }

    #[test]
    fn on_screen_names_clip_and_transition() {
        use aiva_core::state::{ClipKind, TrackKind};

        let (tl, low)  = Timeline::new().add_track(TrackKind::Video);
        let (tl, high) = tl.add_track(TrackKind::Video);
        let tl = tl
            .add_clip(&low, Clip::new("media/base.mp4", ClipKind::Video, 0, 1000))
            .add_clip(&high, Clip::new("builtin://dissolve", ClipKind::Transition, 400, 40));
        assert_eq!(on_screen_line(&tl, 100), "base.mp4");
        assert_eq!(on_screen_line(&tl, 420), "base.mp4 (under dissolve)");
        assert_eq!(on_screen_line(&tl, 5000), "nothing");
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("c1"), "c1");
    }
}
