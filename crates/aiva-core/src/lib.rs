// crates/aiva-core/src/lib.rs
//
// Timeline data model and its editing engine. No threads, no HTTP, no UI.
//
//   state          Timeline / Track / Clip, model queries and mutations
//   editor         split, move, trim, lift-delete
//   drag           pointer gestures recomputed from a captured origin
//   composition    which clip the playback surface renders at a playhead
//   clock          playhead clock + FrameScheduler seam
//   jobs           JobQueue state machine for backend work
//   commands       EditorCommand, the single input vocabulary
//   project        versioned project file
//   backend_types  request/result types shared with aiva-backend

pub mod backend_types;
pub mod clock;
pub mod commands;
pub mod composition;
pub mod drag;
pub mod editor;
pub mod error;
pub mod helpers;
pub mod jobs;
pub mod project;
pub mod state;

pub use error::{ProjectError, ProjectResult};
pub use state::{Clip, ClipId, ClipKind, ClipPatch, Timeline, Track, TrackId, TrackKind};
