//! gdmovie Export Model
//!
//! Turns a typed export request into the command line of a Godot
//! movie-writer run:
//! - **Request:** output path, project path, frame rate, resolution,
//!   verbosity, extra arguments, keep-open flag
//! - **Arguments:** validation and ordered flag construction
//! - **Paths:** absolute-path normalization and directory checks
//! - **Formats:** container extensions the engine can write, by version
//!
//! ```text
//! --write-movie <output> --path <project> [extra...] [--resolution WxH]
//!     [--quiet | --print-fps [--verbose]] [--fixed-fps N]
//! ```

pub mod args;
pub mod formats;
pub mod paths;
pub mod request;

pub use args::*;
pub use formats::*;
pub use paths::*;
pub use request::*;
