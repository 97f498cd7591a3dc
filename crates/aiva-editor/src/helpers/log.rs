// crates/aiva-editor/src/helpers/log.rs
//
// Logging setup for the editor.
//
// The shell's stdout belongs to command output, so log lines go to a file
// in the OS temp directory instead:
//
//   $TMPDIR/aiva.log  (append-only, shared by every session)
//
// `RUST_LOG` overrides the default filter. If the file cannot be opened the
// subscriber writes to stderr. Initialising twice is harmless.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "warn,aiva=info,aiva_core=info,aiva_backend=info,aiva_editor=info";

pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("aiva.log")
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging fell back to stderr.
pub fn init() -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let path = log_path();

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(true)
                        .with_writer(Mutex::new(file)),
                )
                .try_init();
            Some(path)
        }
        Err(e) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            tracing::warn!(path = %path.display(), "log file unavailable, using stderr: {e}");
            None
        }
    }
}
