//! gdmovie Launcher
//!
//! Runs the engine's movie writer for an export request.
//!
//! ```text
//! ExportRequest ── build_arguments ──► ArgumentVector
//!                                            │
//!                      ProcessLauncher::launch (project dir, keep_open)
//!                                            │
//!                                            ▼
//!                                   engine exit code
//! ```

pub mod export;
pub mod process;

#[cfg(test)]
mod test_support;

pub use export::*;
pub use process::*;
