//! gdmovie Common Utilities
//!
//! Shared infrastructure for all gdmovie crates:
//! - Error types and result aliases
//! - Configuration and export presets
//! - Tracing/logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
