//! Output containers the engine's movie writer supports.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use gdmovie_common::error::ExportError;
use serde::{Deserialize, Serialize};

/// Engine release, as reported by `godot --version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: 0,
        }
    }

    /// Ogg Theora output was added in 4.5.
    pub fn supports_ogv(&self) -> bool {
        self.major > 4 || (self.major == 4 && self.minor >= 5)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for EngineVersion {
    type Err = ExportError;

    /// Accepts `4.5`, `4.2.1` and full build strings such as
    /// `4.2.1.stable.official.b09f793f5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExportError::InvalidVersion {
            value: s.to_string(),
        };
        let line = s.lines().next().unwrap_or_default().trim();
        let line = line.strip_prefix('v').unwrap_or(line);

        let numbers: Vec<u32> = line
            .split('.')
            .map_while(|part| part.parse::<u32>().ok())
            .take(3)
            .collect();

        match numbers.as_slice() {
            [major, minor, rest @ ..] => Ok(Self {
                major: *major,
                minor: *minor,
                patch: rest.first().copied().unwrap_or(0),
            }),
            _ => Err(invalid()),
        }
    }
}

/// File extensions the movie writer can produce for `version`.
pub fn builtin_output_formats(version: EngineVersion) -> Vec<&'static str> {
    let mut formats = vec!["avi", "png"];
    if version.supports_ogv() {
        formats.push("ogv");
    }
    formats
}

/// Lowercased extension of an output path, which selects the movie writer.
pub fn output_format_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}
