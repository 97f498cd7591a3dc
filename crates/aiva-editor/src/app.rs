// crates/aiva-editor/src/app.rs
//
// EditorController: the single owner of the current Timeline.
//
// Input surfaces (keyboard, voice, the shell) only ever produce
// EditorCommands; `process_command` is the one place they turn into
// timeline mutations, clock moves and backend submissions. Backend results
// come back through `apply_backend_result`, and `tick` runs once per frame
// while playing to advance the clock and keep the playback surface on the
// clip under the playhead.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;
use serde_json::Value;
use tracing::{debug, info, warn};

use aiva_backend::{Backend, BackendOutcome, BackendRequest, BackendResult, BackendWorker};
use aiva_core::clock::{Clock, FrameScheduler};
use aiva_core::commands::EditorCommand;
use aiva_core::composition::active_clip_at;
use aiva_core::drag::{DragMode, DragSession};
use aiva_core::editor::{self, SplitOutcome};
use aiva_core::helpers::time::{units_to_seconds, UNITS_PER_FRAME, UNITS_PER_SECOND};
use aiva_core::jobs::{Job, JobKind, JobQueue};
use aiva_core::project::{self, ProjectFile};
use aiva_core::state::{ClipId, ClipPatch, Timeline, TrackKind};

use crate::config::EditorConfig;
use crate::context::{EditorContext, SurfaceTarget};
use crate::helpers::clip_query;
use crate::history::History;
use crate::surface::PlaybackSurface;
use crate::toast::Toasts;
use crate::voice::VoiceIntent;

/// A paused surface within half a frame of the playhead is not re-seeked.
const SEEK_TOLERANCE_SECS: f64 = UNITS_PER_FRAME as f64 / UNITS_PER_SECOND as f64 / 2.0;

/// A fresh project: one video track and one audio track.
pub fn starter_timeline() -> Timeline {
    let (tl, _) = Timeline::new().add_track(TrackKind::Video);
    tl.add_track(TrackKind::Audio).0
}

// ── EditorController ──────────────────────────────────────────────────────────

pub struct EditorController<S: FrameScheduler, P: PlaybackSurface> {
    timeline:     Timeline,
    selection:    Option<ClipId>,
    clock:        Clock<S>,
    jobs:         JobQueue,
    history:      History,
    /// Active pointer drag. Holds the clip's placement at drag begin.
    drag:         Option<DragSession>,
    project_path: Option<PathBuf>,
    config:       EditorConfig,
    context:      EditorContext<P>,
}

impl<S: FrameScheduler, P: PlaybackSurface> EditorController<S, P> {
    pub fn new(config: EditorConfig, scheduler: S, surface: P, backend: Arc<dyn Backend>) -> Self {
        let worker = BackendWorker::with_concurrency(backend, config.max_concurrent_jobs);
        let toasts = Toasts::new(config.toast_lifetime);
        Self {
            timeline:     starter_timeline(),
            selection:    None,
            clock:        Clock::with_refresh_rate(scheduler, config.refresh_rate_hz),
            jobs:         JobQueue::new(),
            history:      History::new(config.undo_depth),
            drag:         None,
            project_path: None,
            context:      EditorContext::new(worker, surface, toasts),
            config,
        }
    }

    // ── Read access ──────────────────────────────────────────────────────────

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn selection(&self) -> Option<&ClipId> {
        self.selection.as_ref()
    }

    pub fn clock(&self) -> &Clock<S> {
        &self.clock
    }

    pub fn playhead(&self) -> i64 {
        self.clock.playhead()
    }

    pub fn jobs(&self) -> &JobQueue {
        &self.jobs
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn toasts(&self) -> &Toasts {
        &self.context.toasts
    }

    pub fn surface(&self) -> &P {
        &self.context.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.context.surface
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Channel carrying finished backend jobs, for callers that block on it.
    pub fn backend_results(&self) -> Receiver<BackendResult> {
        self.context.worker.rx.clone()
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn process_command(&mut self, cmd: EditorCommand) {
        debug!(?cmd, "command");
        match cmd {
            // ── Playback ─────────────────────────────────────────────────────
            EditorCommand::Play       => self.play(),
            EditorCommand::Pause      => self.pause(),
            EditorCommand::TogglePlay => {
                if self.clock.is_playing() { self.pause() } else { self.play() }
            }
            EditorCommand::SetPlayhead(units) => {
                self.clock.seek(units);
                self.sync_surface(true);
            }
            EditorCommand::StepBack => {
                self.clock.step_back();
                self.sync_surface(true);
            }
            EditorCommand::StepForward => {
                self.clock.step_forward();
                self.sync_surface(true);
            }
            EditorCommand::JumpToStart => {
                self.clock.seek(0);
                self.sync_surface(true);
            }
            EditorCommand::JumpToEnd => {
                self.clock.seek(self.timeline.duration());
                self.sync_surface(true);
            }

            // ── Timeline ─────────────────────────────────────────────────────
            EditorCommand::AddTrack(kind) => {
                self.commit(|tl| tl.add_track(kind).0);
            }
            EditorCommand::AddClip { track, clip } => {
                self.commit(|tl| tl.add_clip(&track, clip));
            }
            EditorCommand::UpdateClip { id, patch } => {
                self.commit(|tl| tl.update_clip(&id, &patch));
            }
            EditorCommand::SelectClip(id) => {
                self.selection = id.filter(|id| self.timeline.find_clip(id).is_some());
            }
            EditorCommand::DeleteClip(id) => self.delete_clip(&id),
            EditorCommand::DeleteSelected => {
                if let Some(id) = self.selection.clone() {
                    self.delete_clip(&id);
                }
            }
            EditorCommand::MoveClip { id, new_start } => {
                self.commit(|tl| editor::move_clip(tl, &id, new_start));
            }
            EditorCommand::TrimClip { id, edge, delta } => {
                self.commit(|tl| editor::trim(tl, &id, edge, delta));
            }
            EditorCommand::SplitAt(pos)    => self.split_at(pos),
            EditorCommand::SplitAtPlayhead => self.split_at(self.clock.playhead()),
            EditorCommand::AddMarker(pos) => {
                self.commit(|tl| tl.add_marker(pos));
            }
            EditorCommand::RemoveMarker(pos) => {
                self.commit(|tl| tl.remove_marker(pos));
            }
            EditorCommand::ClearMarkers => {
                self.commit(Timeline::clear_markers);
            }

            // ── Pointer drags ────────────────────────────────────────────────
            EditorCommand::BeginDrag { id, mode } => self.begin_drag(&id, mode),
            EditorCommand::DragTo(delta) => {
                if let Some(drag) = &self.drag {
                    let tl = std::mem::take(&mut self.timeline);
                    self.timeline = drag.update(tl, delta);
                    self.sync_surface(false);
                }
            }
            EditorCommand::EndDrag => {
                if self.drag.take().is_some() {
                    debug!("drag ended");
                }
            }

            // ── Undo / Redo ──────────────────────────────────────────────────
            EditorCommand::Undo => {
                self.drag = None;
                let tl = std::mem::take(&mut self.timeline);
                self.timeline = self.history.undo(tl);
                self.after_timeline_swap();
            }
            EditorCommand::Redo => {
                self.drag = None;
                let tl = std::mem::take(&mut self.timeline);
                self.timeline = self.history.redo(tl);
                self.after_timeline_swap();
            }

            // ── Backend jobs ─────────────────────────────────────────────────
            EditorCommand::ApplyAction { clip, action, params } => {
                self.submit_clip_job(JobKind::Effect(action), clip, params);
            }
            EditorCommand::Transcribe(clip) => {
                self.submit_clip_job(JobKind::Transcribe, clip, Value::Null);
            }
            EditorCommand::DetectScenes(clip) => {
                self.submit_clip_job(JobKind::SceneDetect, clip, Value::Null);
            }
            EditorCommand::Export { output_path } => self.submit_export(&output_path),
            EditorCommand::ClearJobs => self.jobs.clear(),

            // ── Voice ────────────────────────────────────────────────────────
            EditorCommand::VoiceIntent { intent, text } => self.handle_voice(&intent, &text),

            // ── Project ──────────────────────────────────────────────────────
            EditorCommand::SaveProject(path) => self.save(&path),
            EditorCommand::LoadProject(path) => self.load(&path),
            EditorCommand::NewProject        => self.replace_timeline(starter_timeline(), None),
        }
    }

    /// Apply a discrete edit and record one undo step if it changed anything.
    fn commit(&mut self, edit: impl FnOnce(Timeline) -> Timeline) -> bool {
        let before = self.timeline.clone();
        self.timeline = edit(std::mem::take(&mut self.timeline));
        let changed = self.timeline != before;
        if changed {
            self.history.push(&before);
            self.sync_surface(false);
        }
        changed
    }

    fn play(&mut self) {
        // Restart from the top when parked at the end.
        if self.clock.playhead() >= self.timeline.duration() {
            self.clock.seek(0);
        }
        self.clock.play();
        self.sync_surface(true);
    }

    fn pause(&mut self) {
        self.clock.pause();
        self.sync_surface(false);
    }

    fn delete_clip(&mut self, id: &ClipId) {
        self.commit(|tl| editor::remove(tl, id));
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
    }

    fn split_at(&mut self, pos: i64) {
        let mut outcome: Option<SplitOutcome> = None;
        self.commit(|tl| {
            let (tl, split) = editor::split(tl, pos);
            outcome = split;
            tl
        });
        // A split selection follows its right half, the piece under the cut.
        if let Some(split) = outcome {
            if self.selection.as_ref() == Some(&split.source) {
                self.selection = Some(split.right);
            }
        }
        self.prune_selection();
    }

    fn begin_drag(&mut self, id: &ClipId, mode: DragMode) {
        match DragSession::begin(&self.timeline, id, mode) {
            Some(session) => {
                // One undo step for the whole gesture.
                self.history.push(&self.timeline);
                self.drag = Some(session);
            }
            None => debug!(clip = %id, "drag on missing clip ignored"),
        }
    }

    fn prune_selection(&mut self) {
        if let Some(id) = &self.selection {
            if self.timeline.find_clip(id).is_none() {
                self.selection = None;
            }
        }
    }

    fn after_timeline_swap(&mut self) {
        self.prune_selection();
        self.sync_surface(true);
    }

    fn replace_timeline(&mut self, timeline: Timeline, path: Option<PathBuf>) {
        self.clock.pause();
        self.clock.seek(0);
        self.timeline     = timeline;
        self.selection    = None;
        self.drag         = None;
        self.project_path = path;
        self.history.clear();
        self.sync_surface(true);
    }

    // ── Backend jobs ─────────────────────────────────────────────────────────

    fn submit_clip_job(&mut self, kind: JobKind, clip: Option<ClipId>, params: Value) {
        let playhead = self.clock.playhead();
        let target = match &clip {
            Some(id) => self.timeline.find_clip(id),
            None     => clip_query::action_target(&self.timeline, self.selection.as_ref(), playhead),
        };
        let Some(target) = target else {
            self.context.toasts.error(format!("{}: no clip to process", kind.label()));
            return;
        };
        if !target.kind.is_decodable() {
            self.context.toasts.error(format!(
                "{}: {} clips have no media to process", kind.label(), target.kind.label(),
            ));
            return;
        }
        if self.config.single_flight_jobs && self.jobs.in_flight(&target.id, kind).is_some() {
            self.context.toasts.error(format!(
                "{} is already running on {}", kind.label(), target.name,
            ));
            return;
        }

        let request = BackendRequest::new(kind, target.path.clone()).with_params(params);
        let clip_id = target.id.clone();
        let name    = target.name.clone();
        let job_id  = self.jobs.submit(Job::new(kind, name.clone(), Some(clip_id.clone())));
        self.context.worker.submit(job_id, Some(clip_id), request);
        self.context.toasts.info(format!("{} started on {name}", kind.label()));
    }

    fn submit_export(&mut self, output: &Path) {
        let project = match serde_json::to_value(ProjectFile::from_timeline(&self.timeline)) {
            Ok(v) => v,
            Err(e) => {
                self.context.toasts.error(format!("Export failed: {e}"));
                return;
            }
        };
        let path = output.to_string_lossy().into_owned();
        let name = output.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        let request = BackendRequest::new(JobKind::Export, path).with_params(project);
        let job_id  = self.jobs.submit(Job::new(JobKind::Export, name.clone(), None));
        self.context.worker.submit(job_id, None, request);
        self.context.toasts.info(format!("Exporting {name}"));
    }

    /// Drain every backend result that has arrived. Returns how many.
    pub fn poll_backend(&mut self) -> usize {
        let results: Vec<BackendResult> = self.context.worker.rx.try_iter().collect();
        let n = results.len();
        for result in results {
            self.apply_backend_result(result);
        }
        n
    }

    /// Resolve the job and apply its payload to the clip captured at
    /// submission. A clip deleted since then turns the update into a no-op;
    /// the job still resolves.
    pub fn apply_backend_result(&mut self, result: BackendResult) {
        let BackendResult { job_id, clip_id, kind, outcome } = result;

        // Jobs removed by ClearJobs still deliver their payload. Only a
        // second result for a job already terminal is dropped.
        let tracked = self.jobs.get(job_id).is_some();
        if !self.jobs.resolve(job_id, outcome.to_job_outcome()) && tracked {
            debug!(job = %job_id, "duplicate result ignored");
            return;
        }

        let label = kind.label();
        match outcome {
            BackendOutcome::Error(msg) => {
                self.context.toasts.error(format!("{label} failed: {msg}"));
            }
            BackendOutcome::Artifact(path) => {
                if let (Some(path), Some(id)) = (&path, &clip_id) {
                    let tl = std::mem::take(&mut self.timeline);
                    self.timeline = tl.update_clip(id, &ClipPatch::path(path.clone()));
                    self.sync_surface(false);
                }
                match path {
                    Some(p) => self.context.toasts.success(format!("{label} finished: {p}")),
                    None    => self.context.toasts.success(format!("{label} finished")),
                }
            }
            BackendOutcome::Transcript(text) => {
                if let Some(id) = &clip_id {
                    let tl = std::mem::take(&mut self.timeline);
                    self.timeline = tl.update_clip(id, &ClipPatch::transcription(text));
                }
                self.context.toasts.success(format!("{label} finished"));
            }
            BackendOutcome::Markers(cuts) => {
                let origin = clip_id.as_ref()
                    .and_then(|id| self.timeline.find_clip(id))
                    .map(|c| c.start);
                match origin {
                    Some(start) => {
                        let n  = cuts.len();
                        let tl = std::mem::take(&mut self.timeline);
                        self.timeline = tl.add_markers(cuts.into_iter().map(|m| start.saturating_add(m)));
                        self.context.toasts.success(format!("{n} scene cuts found"));
                    }
                    None => debug!(job = %job_id, "scene cuts for a deleted clip dropped"),
                }
            }
        }
    }

    // ── Voice ────────────────────────────────────────────────────────────────

    fn handle_voice(&mut self, label: &str, text: &str) {
        let intent = match VoiceIntent::from_label(label) {
            VoiceIntent::Unknown => VoiceIntent::parse(text, self.config.wake_word.as_deref()),
            known                => known,
        };
        info!(intent = intent.as_str(), text, "voice command");
        match intent.command() {
            Some(cmd) => self.process_command(cmd),
            None      => self.context.toasts.info(format!("Didn't catch that: \"{text}\"")),
        }
    }

    // ── Project ──────────────────────────────────────────────────────────────

    fn save(&mut self, path: &Path) {
        match project::save_project(path, &self.timeline) {
            Ok(()) => {
                self.project_path = Some(path.to_path_buf());
                self.context.toasts.success(format!("Saved {}", path.display()));
            }
            Err(e) => {
                warn!("save failed: {e}");
                self.context.toasts.error(format!("Save failed: {e}"));
            }
        }
    }

    fn load(&mut self, path: &Path) {
        match project::load_project(path) {
            Ok(tl) => {
                self.replace_timeline(tl, Some(path.to_path_buf()));
                self.context.toasts.success(format!("Opened {}", path.display()));
            }
            Err(e) => {
                warn!("load failed: {e}");
                self.context.toasts.error(format!("Open failed: {e}"));
            }
        }
    }

    // ── Per-frame ────────────────────────────────────────────────────────────

    /// One animation frame. Advances the clock while playing, stops at the
    /// derived duration, keeps the surface on the active clip and expires
    /// toasts. Returns the playhead.
    pub fn tick(&mut self) -> i64 {
        self.context.ingest_surface_events();
        if self.clock.is_playing() {
            let surface_time = self.surface_timeline_seconds();
            let playhead = self.clock.tick(surface_time);
            let end = self.timeline.duration();
            if playhead >= end {
                self.clock.seek(end);
                self.clock.pause();
                info!(playhead = end, "playback reached the end");
            }
        }
        self.sync_surface(false);
        self.context.toasts.expire(Instant::now());
        self.clock.playhead()
    }

    /// The surface's position in timeline seconds, when it can drive the clock.
    fn surface_timeline_seconds(&self) -> Option<f64> {
        let ctx = &self.context;
        let target = ctx.surface_target.as_ref()?;
        if ctx.surface.is_paused() || ctx.surface_exhausted() {
            return None;
        }
        let clip = self.timeline.find_clip(&target.clip_id)?;
        Some(units_to_seconds(clip.start) + ctx.surface.current_time())
    }

    /// Point the surface at the clip under the playhead. Issues at most one
    /// seek per call: on retarget, on `force_seek`, or when a paused surface
    /// has drifted from the playhead.
    fn sync_surface(&mut self, force_seek: bool) {
        let playhead = self.clock.playhead();
        let playing  = self.clock.is_playing();
        let wanted = active_clip_at(&self.timeline, playhead)
            .filter(|c| c.kind.is_decodable())
            .map(|c| {
                let target = SurfaceTarget { clip_id: c.id.clone(), path: c.path.clone() };
                (target, units_to_seconds(playhead - c.start))
            });

        let ctx = &mut self.context;
        let Some((target, media_time)) = wanted else {
            ctx.idle_surface();
            return;
        };

        let same_clip  = ctx.surface_target.as_ref() == Some(&target);
        let same_media = ctx.surface_target.as_ref().is_some_and(|cur| cur.path == target.path);
        if same_clip {
            let drifted = !playing
                && (ctx.surface.current_time() - media_time).abs() > SEEK_TOLERANCE_SECS;
            if force_seek || drifted {
                ctx.seek_surface(media_time);
            }
        } else if same_media {
            // Same file under a new clip id (after a split): no reload.
            ctx.surface_target = Some(target);
            ctx.seek_surface(media_time);
        } else {
            debug!(clip = %target.clip_id, path = %target.path, media_time, "surface retarget");
            ctx.retarget(target, media_time);
        }

        if playing && ctx.surface.is_paused() && !ctx.surface_exhausted() {
            ctx.surface.play();
        } else if !playing && !ctx.surface.is_paused() {
            ctx.surface.pause();
        }
    }

    pub fn shutdown(&mut self) {
        self.clock.pause();
        self.context.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use aiva_backend::error::BackendResultOf;
    use aiva_core::clock::{ClockSource, ManualScheduler};
    use aiva_core::editor::TrimEdge;
    use aiva_core::jobs::{AiAction, JobId, JobResult, JobStatus};
    use aiva_core::state::{Clip, ClipKind, TrackId};

    use crate::surface::SurfaceEvent;
    use crate::toast::ToastLevel;

    // ── Test doubles ─────────────────────────────────────────────────────────

    struct Canned(BackendOutcome);

    impl Backend for Canned {
        fn execute(&self, _: &BackendRequest) -> BackendResultOf<BackendOutcome> {
            Ok(self.0.clone())
        }
    }

    /// Records every load and seek; media time is set by the test.
    struct FakeSurface {
        source: Option<String>,
        time:   f64,
        paused: bool,
        loads:  Vec<String>,
        seeks:  Vec<f64>,
        events: Vec<SurfaceEvent>,
    }

    impl FakeSurface {
        fn new() -> Self {
            Self { source: None, time: 0.0, paused: true, loads: vec![], seeks: vec![], events: vec![] }
        }
    }

    impl PlaybackSurface for FakeSurface {
        fn source(&self) -> Option<&str> { self.source.as_deref() }
        fn load(&mut self, path: &str) {
            self.source = Some(path.to_string());
            self.loads.push(path.to_string());
            self.time = 0.0;
            self.paused = true;
        }
        fn unload(&mut self) { self.source = None; self.paused = true; }
        fn current_time(&self) -> f64 { self.time }
        fn seek(&mut self, seconds: f64) { self.time = seconds; self.seeks.push(seconds); }
        fn is_paused(&self) -> bool { self.paused }
        fn play(&mut self) { self.paused = false; }
        fn pause(&mut self) { self.paused = true; }
        fn duration(&self) -> Option<f64> { None }
        fn poll_events(&mut self) -> Vec<SurfaceEvent> { std::mem::take(&mut self.events) }
    }

    type Editor = EditorController<ManualScheduler, FakeSurface>;

    fn editor_with(config: EditorConfig, outcome: BackendOutcome) -> Editor {
        EditorController::new(config, ManualScheduler::new(), FakeSurface::new(), Arc::new(Canned(outcome)))
    }

    fn editor() -> Editor {
        editor_with(EditorConfig::default(), BackendOutcome::Artifact(None))
    }

    fn video_track(ed: &Editor) -> TrackId {
        ed.timeline().video_tracks[0].id.clone()
    }

    fn add_clip(ed: &mut Editor, track: &TrackId, path: &str, kind: ClipKind, start: i64, extent: i64) -> ClipId {
        let clip = Clip::new(path, kind, start, extent);
        let id = clip.id.clone();
        ed.process_command(EditorCommand::AddClip { track: track.clone(), clip });
        id
    }

    fn last_job_id(ed: &Editor) -> JobId {
        ed.jobs().iter().next().expect("a job was submitted").id
    }

    // ── Editing ──────────────────────────────────────────────────────────────

    #[test]
    fn split_at_playhead_moves_selection_to_right_half() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 100, 400);
        ed.process_command(EditorCommand::SelectClip(Some(id.clone())));
        ed.process_command(EditorCommand::SetPlayhead(300));
        ed.process_command(EditorCommand::SplitAtPlayhead);

        let clips = &ed.timeline().video_tracks[0].clips;
        assert_eq!(clips.len(), 2);
        assert_eq!((clips[0].start, clips[0].extent), (100, 200));
        assert_eq!((clips[1].start, clips[1].extent), (300, 200));
        assert_eq!(ed.selection(), Some(&clips[1].id));

        ed.process_command(EditorCommand::Undo);
        assert_eq!(ed.timeline().video_tracks[0].clips[0].id, id);
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 100);
        ed.process_command(EditorCommand::SelectClip(Some(id.clone())));
        ed.process_command(EditorCommand::DeleteSelected);
        assert!(ed.timeline().find_clip(&id).is_none());
        assert_eq!(ed.selection(), None);
    }

    #[test]
    fn no_op_edits_do_not_grow_history() {
        let mut ed = editor();
        ed.process_command(EditorCommand::MoveClip { id: ClipId::from("ghost"), new_start: 10 });
        ed.process_command(EditorCommand::SplitAt(50));
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn trim_and_move_clamp() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 100, 400);
        ed.process_command(EditorCommand::TrimClip { id: id.clone(), edge: TrimEdge::Trailing, delta: -1000 });
        ed.process_command(EditorCommand::MoveClip { id: id.clone(), new_start: -30 });
        let c = ed.timeline().find_clip(&id).unwrap();
        assert_eq!((c.start, c.extent), (0, 1));
    }

    #[test]
    fn drag_is_one_undo_step() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 100, 400);
        let before = ed.timeline().clone();

        ed.process_command(EditorCommand::BeginDrag { id: id.clone(), mode: DragMode::Move });
        for delta in [3, 9, 17, 40] {
            ed.process_command(EditorCommand::DragTo(delta));
        }
        ed.process_command(EditorCommand::EndDrag);
        assert_eq!(ed.timeline().find_clip(&id).unwrap().start, 140);

        ed.process_command(EditorCommand::Undo);
        assert_eq!(ed.timeline(), &before);
    }

    #[test]
    fn drag_after_delete_is_harmless() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 100, 400);
        ed.process_command(EditorCommand::BeginDrag { id: id.clone(), mode: DragMode::Trim(TrimEdge::Trailing) });
        ed.process_command(EditorCommand::DeleteClip(id.clone()));
        let snapshot = ed.timeline().clone();
        ed.process_command(EditorCommand::DragTo(80));
        assert_eq!(ed.timeline(), &snapshot);
    }

    // ── Clock & surface ──────────────────────────────────────────────────────

    #[test]
    fn free_running_playback_stops_at_duration() {
        let mut ed = editor();
        ed.process_command(EditorCommand::SetPlayhead(5990));
        ed.process_command(EditorCommand::Play);
        assert!(ed.clock().scheduler().is_running());
        for _ in 0..20 {
            ed.tick();
        }
        assert_eq!(ed.playhead(), 6000);
        assert!(!ed.clock().is_playing());
        assert!(!ed.clock().scheduler().is_running());

        // Play at the end restarts from zero.
        ed.process_command(EditorCommand::Play);
        assert_eq!(ed.playhead(), 0);
    }

    #[test]
    fn surface_follows_the_active_clip() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 500);
        add_clip(&mut ed, &v, "b.mp4", ClipKind::Video, 500, 500);

        ed.process_command(EditorCommand::SetPlayhead(650));
        assert_eq!(ed.surface().source(), Some("b.mp4"));
        assert_eq!(ed.surface().seeks.last(), Some(&1.5));

        ed.process_command(EditorCommand::SetPlayhead(2000));
        assert_eq!(ed.surface().source(), None);
    }

    #[test]
    fn transition_on_top_track_never_loads() {
        let mut ed = editor();
        let a = video_track(&ed);
        ed.process_command(EditorCommand::AddTrack(TrackKind::Video));
        let b = ed.timeline().video_tracks[1].id.clone();
        add_clip(&mut ed, &a, "base.mp4", ClipKind::Video, 0, 1000);
        add_clip(&mut ed, &b, "builtin://dissolve", ClipKind::Transition, 400, 40);

        ed.process_command(EditorCommand::SetPlayhead(420));
        assert_eq!(ed.surface().source(), Some("base.mp4"));
        assert!(ed.surface().loads.iter().all(|p| p == "base.mp4"));
    }

    #[test]
    fn playing_surface_drives_the_clock() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 100, 1000);
        ed.process_command(EditorCommand::SetPlayhead(100));
        ed.process_command(EditorCommand::Play);
        assert!(!ed.surface().is_paused());

        ed.surface_mut().time = 1.5;
        assert_eq!(ed.tick(), 250);
        assert_eq!(ed.clock().source(), ClockSource::Surface);
    }

    #[test]
    fn ended_surface_hands_over_to_free_running() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 1000);
        ed.process_command(EditorCommand::Play);
        ed.surface_mut().paused = true;
        ed.surface_mut().events.push(SurfaceEvent::Ended);

        ed.tick();
        assert_eq!(ed.clock().source(), ClockSource::FreeRunning);
        // An ended surface is not restarted by the sync.
        assert!(ed.surface().is_paused());
    }

    #[test]
    fn surface_cannot_drive_the_clock_past_its_media_end() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "short.mp4", ClipKind::Video, 0, 1000);
        ed.process_command(EditorCommand::Play);
        ed.surface_mut().events.push(SurfaceEvent::DurationKnown(2.0));

        ed.surface_mut().time = 1.0;
        assert_eq!(ed.tick(), 100);
        assert_eq!(ed.clock().source(), ClockSource::Surface);

        // The media is shorter than the clip: the surface sits at its end.
        ed.surface_mut().time = 2.0;
        ed.tick();
        assert_eq!(ed.clock().source(), ClockSource::FreeRunning);
        assert!(ed.tick() > 100);
    }

    #[test]
    fn time_report_past_media_end_marks_the_surface_ended() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "short.mp4", ClipKind::Video, 0, 1000);
        ed.process_command(EditorCommand::Play);
        ed.surface_mut().events.push(SurfaceEvent::DurationKnown(2.0));
        ed.surface_mut().events.push(SurfaceEvent::TimeUpdate(2.5));
        ed.surface_mut().paused = true;

        ed.tick();
        assert_eq!(ed.clock().source(), ClockSource::FreeRunning);
        assert!(ed.surface().is_paused());
    }

    #[test]
    fn at_most_one_seek_per_tick() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 1000);
        ed.process_command(EditorCommand::SetPlayhead(200));
        let seeks = ed.surface().seeks.len();
        ed.tick();
        ed.tick();
        assert_eq!(ed.surface().seeks.len(), seeks);

        ed.process_command(EditorCommand::StepForward);
        assert_eq!(ed.surface().seeks.len(), seeks + 1);
    }

    // ── Jobs ─────────────────────────────────────────────────────────────────

    #[test]
    fn artifact_result_swaps_clip_path() {
        let mut ed = editor_with(
            EditorConfig::default(),
            BackendOutcome::Artifact(Some("take_clean.wav".into())),
        );
        let a = ed.timeline().audio_tracks[0].id.clone();
        let id = add_clip(&mut ed, &a, "take.wav", ClipKind::Audio, 0, 500);
        ed.process_command(EditorCommand::ApplyAction {
            clip:   Some(id.clone()),
            action: AiAction::RemoveSilence,
            params: Value::Null,
        });
        assert_eq!(ed.jobs().processing_count(), 1);

        let result = ed.backend_results().recv_timeout(Duration::from_secs(5)).unwrap();
        ed.apply_backend_result(result);

        assert_eq!(ed.timeline().find_clip(&id).unwrap().path, "take_clean.wav");
        let job = ed.jobs().iter().next().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result, Some(JobResult::Artifact("take_clean.wav".into())));
    }

    #[test]
    fn result_for_deleted_clip_still_resolves_job() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 500);
        ed.process_command(EditorCommand::ApplyAction {
            clip:   Some(id.clone()),
            action: AiAction::ColorBoost,
            params: Value::Null,
        });
        let job_id = last_job_id(&ed);
        ed.process_command(EditorCommand::DeleteClip(id.clone()));
        let before = ed.timeline().clone();

        ed.apply_backend_result(BackendResult {
            job_id,
            clip_id: Some(id),
            kind:    JobKind::Effect(AiAction::ColorBoost),
            outcome: BackendOutcome::Artifact(Some("a_boost.mp4".into())),
        });
        assert_eq!(ed.timeline(), &before);
        assert_eq!(ed.jobs().get(job_id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn failure_marks_job_and_raises_error_toast() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 500);
        ed.process_command(EditorCommand::Transcribe(Some(id.clone())));
        let job_id = last_job_id(&ed);

        ed.apply_backend_result(BackendResult {
            job_id,
            clip_id: Some(id.clone()),
            kind:    JobKind::Transcribe,
            outcome: BackendOutcome::Error("File not found".into()),
        });
        let job = ed.jobs().get(job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("File not found"));
        let toast = ed.toasts().latest().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(toast.message.contains("File not found"));

        // A late success for the same job changes nothing.
        ed.apply_backend_result(BackendResult {
            job_id,
            clip_id: Some(id.clone()),
            kind:    JobKind::Transcribe,
            outcome: BackendOutcome::Transcript("hello".into()),
        });
        assert_eq!(ed.jobs().get(job_id).unwrap().status, JobStatus::Failed);
        assert_eq!(ed.timeline().find_clip(&id).unwrap().transcription, None);
    }

    #[test]
    fn duplicate_jobs_allowed_by_default() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 500);
        for _ in 0..2 {
            ed.process_command(EditorCommand::ApplyAction {
                clip:   Some(id.clone()),
                action: AiAction::SmartCrop,
                params: Value::Null,
            });
        }
        assert_eq!(ed.jobs().len(), 2);
    }

    #[test]
    fn single_flight_refuses_second_job() {
        let config = EditorConfig { single_flight_jobs: true, ..EditorConfig::default() };
        let mut ed = editor_with(config, BackendOutcome::Artifact(None));
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 500);
        for _ in 0..2 {
            ed.process_command(EditorCommand::ApplyAction {
                clip:   Some(id.clone()),
                action: AiAction::SmartCrop,
                params: Value::Null,
            });
        }
        assert_eq!(ed.jobs().len(), 1);
        assert_eq!(ed.toasts().latest().unwrap().level, ToastLevel::Error);

        // A different kind on the same clip is still allowed.
        ed.process_command(EditorCommand::Transcribe(Some(id)));
        assert_eq!(ed.jobs().len(), 2);
    }

    #[test]
    fn scene_cuts_merge_relative_to_clip_start() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 1000, 3000);
        ed.process_command(EditorCommand::AddMarker(1150));
        ed.process_command(EditorCommand::DetectScenes(Some(id.clone())));
        let job_id = last_job_id(&ed);

        ed.apply_backend_result(BackendResult {
            job_id,
            clip_id: Some(id),
            kind:    JobKind::SceneDetect,
            outcome: BackendOutcome::Markers(vec![150, 1225]),
        });
        assert_eq!(ed.timeline().markers, vec![1150, 2225]);
    }

    #[test]
    fn job_without_target_only_toasts() {
        let mut ed = editor();
        ed.process_command(EditorCommand::Transcribe(None));
        assert!(ed.jobs().is_empty());
        assert_eq!(ed.toasts().latest().unwrap().level, ToastLevel::Error);
    }

    #[test]
    fn synthetic_clips_are_not_sent_to_the_backend() {
        let mut ed = editor();
        let v = video_track(&ed);
        let id = add_clip(&mut ed, &v, "builtin://wipe", ClipKind::Transition, 0, 40);
        ed.process_command(EditorCommand::Transcribe(Some(id)));
        assert!(ed.jobs().is_empty());
    }

    // ── Voice ────────────────────────────────────────────────────────────────

    #[test]
    fn voice_cut_splits_at_playhead() {
        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 0, 400);
        ed.process_command(EditorCommand::SetPlayhead(200));
        ed.process_command(EditorCommand::VoiceIntent { intent: "UNKNOWN".into(), text: "cut here".into() });
        assert_eq!(ed.timeline().video_tracks[0].clips.len(), 2);
    }

    #[test]
    fn voice_remove_silence_targets_clip_under_playhead() {
        let mut ed = editor();
        let a = ed.timeline().audio_tracks[0].id.clone();
        let id = add_clip(&mut ed, &a, "take.wav", ClipKind::Audio, 0, 400);
        ed.process_command(EditorCommand::SetPlayhead(100));
        ed.process_command(EditorCommand::VoiceIntent { intent: "REMOVE_SILENCE".into(), text: String::new() });
        let job = ed.jobs().iter().next().unwrap();
        assert_eq!(job.kind, JobKind::Effect(AiAction::RemoveSilence));
        assert_eq!(job.clip_id, Some(id));
    }

    #[test]
    fn wake_word_gates_keyword_fallback() {
        let config = EditorConfig { wake_word: Some("aiva".into()), ..EditorConfig::default() };
        let mut ed = editor_with(config, BackendOutcome::Artifact(None));
        ed.process_command(EditorCommand::VoiceIntent { intent: String::new(), text: "play".into() });
        assert!(!ed.clock().is_playing());
        ed.process_command(EditorCommand::VoiceIntent { intent: String::new(), text: "aiva play".into() });
        assert!(ed.clock().is_playing());
    }

    // ── Project ──────────────────────────────────────────────────────────────

    #[test]
    fn save_then_load_restores_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.json");

        let mut ed = editor();
        let v = video_track(&ed);
        add_clip(&mut ed, &v, "a.mp4", ClipKind::Video, 40, 400);
        ed.process_command(EditorCommand::AddMarker(120));
        ed.process_command(EditorCommand::SaveProject(path.clone()));
        let saved = ed.timeline().clone();

        ed.process_command(EditorCommand::NewProject);
        assert_eq!(ed.timeline().clip_count(), 0);

        ed.process_command(EditorCommand::LoadProject(path.clone()));
        assert_eq!(ed.timeline(), &saved);
        assert_eq!(ed.project_path(), Some(path.as_path()));
        assert!(!ed.history().can_undo());
    }

    #[test]
    fn load_failure_keeps_current_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor();
        let before = ed.timeline().clone();
        ed.process_command(EditorCommand::LoadProject(dir.path().join("missing.json")));
        assert_eq!(ed.timeline(), &before);
        assert_eq!(ed.toasts().latest().unwrap().level, ToastLevel::Error);
    }
}
