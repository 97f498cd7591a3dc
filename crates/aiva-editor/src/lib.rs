// crates/aiva-editor/src/lib.rs
//
// The editor engine around aiva-core: command processing, playback-surface
// sync, backend job plumbing, undo, and the inputs (keyboard, voice, shell)
// that feed it. No GUI here; a front end owns an EditorController and calls
// `process_command` / `tick` / `poll_backend` from its event loop.

pub mod app;
pub mod config;
pub mod context;
pub mod helpers;
pub mod history;
pub mod keyboard;
pub mod scheduler;
pub mod shell;
pub mod surface;
pub mod toast;
pub mod voice;

pub use app::EditorController;
pub use config::EditorConfig;
pub use scheduler::TickScheduler;
pub use surface::{HeadlessSurface, PlaybackSurface, SurfaceEvent};
