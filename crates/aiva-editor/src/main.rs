// crates/aiva-editor/src/main.rs
//
// `aiva [project.json]`: the editor engine driven from stdin.
//
// One thread of control. stdin lines, frame ticks (only while playing) and
// backend results are multiplexed with `select!`, so a long backend job
// never blocks editing or playback.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use crossbeam_channel::{select, unbounded};
use tracing::info;

use aiva_backend::HttpBackend;
use aiva_core::commands::EditorCommand;
use aiva_core::helpers::time::{format_duration, format_time};
use aiva_editor::helpers::{format, log};
use aiva_editor::shell::{self, ShellAction};
use aiva_editor::toast::ToastLevel;
use aiva_editor::{EditorConfig, EditorController, HeadlessSurface, PlaybackSurface, TickScheduler};

type Editor = EditorController<TickScheduler, HeadlessSurface>;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let log_file = log::init();
    let config = EditorConfig::from_env();
    info!(backend = %config.backend_url, refresh_hz = config.refresh_rate_hz, "starting aiva");

    let backend   = Arc::new(HttpBackend::new(config.backend_url.clone(), config.request_timeout));
    let scheduler = TickScheduler::new(config.refresh_rate_hz);
    let mut editor: Editor = EditorController::new(config, scheduler, HeadlessSurface::new(), backend);

    if let Some(path) = std::env::args_os().nth(1) {
        editor.process_command(EditorCommand::LoadProject(PathBuf::from(path)));
    }

    // stdin reader. Dropping the sender on EOF ends the main loop.
    let (line_tx, line_rx) = unbounded::<String>();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("aiva: type `help` for commands");
    if let Some(path) = log_file {
        println!("log: {}", path.display());
    }

    let results = editor.backend_results();
    let mut seen_toast = 0;
    loop {
        // Never fires while paused.
        let ticks = editor.clock().scheduler().receiver();
        select! {
            recv(line_rx) -> line => {
                let Ok(line) = line else { break };
                match shell::parse_line(&line, editor.timeline()) {
                    Ok(ShellAction::Quit)         => break,
                    Ok(ShellAction::Nothing)      => {}
                    Ok(ShellAction::Help)         => println!("{}", shell::HELP),
                    Ok(ShellAction::Status)       => print_status(&editor),
                    Ok(ShellAction::Jobs)         => print_jobs(&editor),
                    Ok(ShellAction::Clips)        => print_clips(&editor),
                    Ok(ShellAction::Command(cmd)) => editor.process_command(cmd),
                    Err(e)                        => println!("error: {e:#}"),
                }
            }
            recv(ticks) -> _ => {
                editor.tick();
            }
            recv(results) -> result => {
                if let Ok(result) = result {
                    editor.apply_backend_result(result);
                }
            }
        }
        seen_toast = print_toasts(&editor, seen_toast);
    }

    editor.shutdown();
    info!("aiva stopped");
    Ok(())
}

fn print_toasts(editor: &Editor, seen: u64) -> u64 {
    let mut last = seen;
    for toast in editor.toasts().since(seen) {
        let tag = match toast.level {
            ToastLevel::Info    => "info",
            ToastLevel::Success => "ok",
            ToastLevel::Error   => "error",
        };
        println!("[{tag}] {}", toast.message);
        last = toast.id;
    }
    last
}

fn print_status(editor: &Editor) {
    let tl = editor.timeline();
    let state = if editor.clock().is_playing() { "playing" } else { "paused" };
    println!(
        "{state} at {} of {} ({} units)",
        format_time(editor.playhead()),
        format_duration(tl.duration()),
        editor.playhead(),
    );
    println!(
        "{} video / {} audio tracks, {} clips, {} markers",
        tl.video_tracks.len(), tl.audio_tracks.len(), tl.clip_count(), tl.markers.len(),
    );
    if let Some(clip) = editor.selection().and_then(|id| tl.find_clip(id)) {
        println!("selected: {}", format::clip_line(clip));
    }
    println!("on screen: {}", format::on_screen_line(tl, editor.playhead()));
    println!("surface: {}", editor.surface().source().unwrap_or("idle"));
    println!("jobs: {} processing of {}", editor.jobs().processing_count(), editor.jobs().len());
    if let Some(path) = editor.project_path() {
        println!("project: {}", path.display());
    }
}

fn print_jobs(editor: &Editor) {
    if editor.jobs().is_empty() {
        println!("no jobs");
    }
    for job in editor.jobs().iter() {
        println!("{}", format::job_line(job));
    }
}

fn print_clips(editor: &Editor) {
    let tl = editor.timeline();
    for (label, tracks) in [("v", &tl.video_tracks), ("a", &tl.audio_tracks)] {
        for (i, track) in tracks.iter().enumerate() {
            println!("{label}{}  ({} clips)", i + 1, track.clips.len());
            for clip in &track.clips {
                println!("    {}", format::clip_line(clip));
            }
        }
    }
}
