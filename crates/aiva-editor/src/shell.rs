// crates/aiva-editor/src/shell.rs
//
// Line commands for the headless `aiva` binary. Parsing needs the current
// timeline to resolve clip and track references; everything that changes
// state comes out as an EditorCommand.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

use aiva_core::commands::EditorCommand;
use aiva_core::editor::TrimEdge;
use aiva_core::jobs::AiAction;
use aiva_core::state::{Clip, ClipId, ClipKind, Timeline, TrackId, TrackKind};

use crate::helpers::clip_query::find_by_prefix;
use crate::keyboard;

#[derive(Debug, PartialEq)]
pub enum ShellAction {
    Command(EditorCommand),
    Status,
    Jobs,
    Clips,
    Help,
    Quit,
    Nothing,
}

pub const HELP: &str = "\
transport   play | pause | toggle | seek <units> | step+ | step- | start | end
editing     split | select <clip|none> | delete | move <clip> <units>
            trim <clip> lead|trail <delta> | track video|audio
            add <track> <kind> <path> <start> <extent> | marker <units>
            undo | redo
backend     apply <action> [json] | transcribe | scenes | export <path>
            jobs | clear-jobs
other       key <combo> | voice <text> | save <path> | load <path> | new
            status | clips | help | quit
clips are referenced by id prefix, tracks as v1, v2, a1 …
key combos look like left, space, s, ctrl+b, ctrl+shift+z";

pub fn parse_line(line: &str, timeline: &Timeline) -> Result<ShellAction> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ShellAction::Nothing);
    };
    let args: Vec<&str> = words.collect();
    let cmd = match (verb, args.as_slice()) {
        ("help" | "?", _)    => return Ok(ShellAction::Help),
        ("quit" | "exit", _) => return Ok(ShellAction::Quit),
        ("status", _)        => return Ok(ShellAction::Status),
        ("jobs", _)          => return Ok(ShellAction::Jobs),
        ("clips", _)         => return Ok(ShellAction::Clips),

        ("play", [])   => EditorCommand::Play,
        ("pause", [])  => EditorCommand::Pause,
        ("toggle", []) => EditorCommand::TogglePlay,
        ("seek", [u])  => EditorCommand::SetPlayhead(units(u)?),
        ("step+", [])  => EditorCommand::StepForward,
        ("step-", [])  => EditorCommand::StepBack,
        ("start", [])  => EditorCommand::JumpToStart,
        ("end", [])    => EditorCommand::JumpToEnd,

        ("split", [])          => EditorCommand::SplitAtPlayhead,
        ("split", [u])         => EditorCommand::SplitAt(units(u)?),
        ("select", ["none"])   => EditorCommand::SelectClip(None),
        ("select", [c])        => EditorCommand::SelectClip(Some(clip(timeline, c)?)),
        ("delete", [])         => EditorCommand::DeleteSelected,
        ("delete", [c])        => EditorCommand::DeleteClip(clip(timeline, c)?),
        ("move", [c, u])       => EditorCommand::MoveClip { id: clip(timeline, c)?, new_start: units(u)? },
        ("trim", [c, edge, d]) => EditorCommand::TrimClip {
            id:    clip(timeline, c)?,
            edge:  trim_edge(edge)?,
            delta: units(d)?,
        },
        ("track", [kind]) => EditorCommand::AddTrack(track_kind(kind)?),
        ("add", [t, kind, path, start, extent]) => {
            let kind = ClipKind::parse(kind).ok_or_else(|| anyhow!("unknown clip kind {kind:?}"))?;
            EditorCommand::AddClip {
                track: track(timeline, t)?,
                clip:  Clip::new(*path, kind, units(start)?, units(extent)?),
            }
        }
        ("marker", [u]) => EditorCommand::AddMarker(units(u)?),
        ("undo", [])    => EditorCommand::Undo,
        ("redo", [])    => EditorCommand::Redo,

        ("apply", [action, rest @ ..]) => {
            let action = AiAction::parse(action).ok_or_else(|| anyhow!("unknown action {action:?}"))?;
            let params = if rest.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&rest.join(" ")).context("action parameters must be JSON")?
            };
            EditorCommand::ApplyAction { clip: None, action, params }
        }
        ("transcribe", [])  => EditorCommand::Transcribe(None),
        ("scenes", [])      => EditorCommand::DetectScenes(None),
        ("export", [path])  => EditorCommand::Export { output_path: PathBuf::from(path) },
        ("clear-jobs", [])  => EditorCommand::ClearJobs,

        ("key", [combo]) => {
            let (key, mods) = keyboard::parse_combo(combo)
                .ok_or_else(|| anyhow!("unknown key {combo:?}"))?;
            keyboard::command_for(key, mods).ok_or_else(|| anyhow!("{combo} is not bound"))?
        }
        ("voice", words) if !words.is_empty() => EditorCommand::VoiceIntent {
            intent: String::new(),
            text:   words.join(" "),
        },
        ("save", [path]) => EditorCommand::SaveProject(PathBuf::from(path)),
        ("load", [path]) => EditorCommand::LoadProject(PathBuf::from(path)),
        ("new", [])      => EditorCommand::NewProject,

        _ => bail!("can't parse {line:?} (try `help`)"),
    };
    Ok(ShellAction::Command(cmd))
}

fn units(s: &str) -> Result<i64> {
    s.parse().with_context(|| format!("{s:?} is not a whole number of units"))
}

fn clip(timeline: &Timeline, reference: &str) -> Result<ClipId> {
    find_by_prefix(timeline, reference)
        .map(|c| c.id.clone())
        .ok_or_else(|| anyhow!("no single clip matches {reference:?}"))
}

fn trim_edge(s: &str) -> Result<TrimEdge> {
    match s {
        "lead" | "leading"   => Ok(TrimEdge::Leading),
        "trail" | "trailing" => Ok(TrimEdge::Trailing),
        _ => bail!("trim edge must be lead or trail, got {s:?}"),
    }
}

fn track_kind(s: &str) -> Result<TrackKind> {
    match s {
        "video" | "v" => Ok(TrackKind::Video),
        "audio" | "a" => Ok(TrackKind::Audio),
        _ => bail!("track kind must be video or audio, got {s:?}"),
    }
}

/// `v1`/`a2` style (1-based, per kind), or a track id.
fn track(timeline: &Timeline, reference: &str) -> Result<TrackId> {
    let by_index = reference.get(..1).zip(reference.get(1..)).and_then(|(kind, n)| {
        let kind = track_kind(kind).ok()?;
        let n: usize = n.parse().ok()?;
        timeline.tracks(kind).get(n.checked_sub(1)?)
    });
    by_index
        .or_else(|| timeline.all_tracks().find(|t| t.id.as_str() == reference))
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow!("no track {reference:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> (Timeline, Clip) {
        let (tl, v) = Timeline::new().add_track(TrackKind::Video);
        let (tl, _) = tl.add_track(TrackKind::Audio);
        let clip = Clip::new("a.mp4", ClipKind::Video, 0, 400);
        (tl.add_clip(&v, clip.clone()), clip)
    }

    fn command(line: &str, tl: &Timeline) -> EditorCommand {
        match parse_line(line, tl).unwrap() {
            ShellAction::Command(cmd) => cmd,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn transport_words() {
        let (tl, _) = timeline();
        assert_eq!(command("seek 420", &tl), EditorCommand::SetPlayhead(420));
        assert_eq!(command("step-", &tl), EditorCommand::StepBack);
        assert_eq!(command("  toggle ", &tl), EditorCommand::TogglePlay);
        assert_eq!(parse_line("", &tl).unwrap(), ShellAction::Nothing);
        assert_eq!(parse_line("quit", &tl).unwrap(), ShellAction::Quit);
    }

    #[test]
    fn clip_references_by_prefix() {
        let (tl, clip) = timeline();
        let prefix = &clip.id.as_str()[..8];
        assert_eq!(
            command(&format!("trim {prefix} lead 40"), &tl),
            EditorCommand::TrimClip { id: clip.id.clone(), edge: TrimEdge::Leading, delta: 40 },
        );
        assert!(parse_line("select zzzz", &tl).is_err());
    }

    #[test]
    fn add_resolves_track_index() {
        let (tl, _) = timeline();
        match command("add a1 audio take.wav 100 250", &tl) {
            EditorCommand::AddClip { track, clip } => {
                assert_eq!(track, tl.audio_tracks[0].id);
                assert_eq!((clip.kind, clip.start, clip.extent), (ClipKind::Audio, 100, 250));
                assert_eq!(clip.name, "take.wav");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_line("add a2 audio take.wav 0 10", &tl).is_err());
        assert!(parse_line("add v0 video x.mp4 0 10", &tl).is_err());
    }

    #[test]
    fn apply_takes_optional_json() {
        let (tl, _) = timeline();
        assert_eq!(
            command(r#"apply voice_changer {"effect": "robot"}"#, &tl),
            EditorCommand::ApplyAction {
                clip:   None,
                action: AiAction::VoiceChanger,
                params: serde_json::json!({ "effect": "robot" }),
            },
        );
        assert!(parse_line("apply teleport", &tl).is_err());
        assert!(parse_line("apply smart_crop {oops", &tl).is_err());
    }

    #[test]
    fn voice_keeps_whole_text() {
        let (tl, _) = timeline();
        assert_eq!(
            command("voice aiva cut here", &tl),
            EditorCommand::VoiceIntent { intent: String::new(), text: "aiva cut here".into() },
        );
    }

    #[test]
    fn keys_go_through_the_keymap() {
        let (tl, _) = timeline();
        assert_eq!(command("key ctrl+z", &tl), EditorCommand::Undo);
        assert_eq!(command("key home", &tl), EditorCommand::JumpToStart);
        assert!(parse_line("key q", &tl).is_err());
    }

    #[test]
    fn bad_numbers_are_errors() {
        let (tl, _) = timeline();
        assert!(parse_line("seek soon", &tl).is_err());
        assert!(parse_line("seek", &tl).is_err());
    }
}
