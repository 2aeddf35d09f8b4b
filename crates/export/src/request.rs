//! Export request types.
//!
//! A request is built once per export, from CLI flags or a stored preset,
//! and is not modified afterwards.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use gdmovie_common::config::ExportPreset;
use gdmovie_common::error::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};

/// Engine logging tier. Tiers are ordered: `VerboseAll` implies the
/// fps output of `VerboseFps`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Verbosity {
    Quiet = -1,
    #[default]
    Unset = 0,
    VerboseFps = 1,
    VerboseAll = 2,
}

impl Verbosity {
    pub fn as_i64(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Verbosity {
    type Error = ExportError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Quiet),
            0 => Ok(Self::Unset),
            1 => Ok(Self::VerboseFps),
            2 => Ok(Self::VerboseAll),
            _ => Err(ExportError::InvalidVerbosity {
                value: value.to_string(),
            }),
        }
    }
}

impl From<Verbosity> for i64 {
    fn from(value: Verbosity) -> Self {
        value.as_i64()
    }
}

impl FromStr for Verbosity {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ExportError::InvalidVerbosity {
                value: s.to_string(),
            })?;
        Self::try_from(value)
    }
}

/// Forced render resolution. `0x0` means no override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const NONE: Resolution = Resolution {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both axes set.
    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Neither axis set.
    pub fn is_unset(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ExportError::InvalidResolutionFormat {
            value: s.to_string(),
        };
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { width, height })
    }
}

impl From<[u32; 2]> for Resolution {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

/// A single movie export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    output_path: PathBuf,
    source_project_path: PathBuf,
    frame_rate: u32,
    resolution_override: Resolution,
    verbosity: Verbosity,
    extra_arguments: Vec<String>,
    keep_open: bool,
}

impl ExportRequest {
    /// Request with every optional setting at its engine default.
    pub fn new(output_path: impl Into<PathBuf>, source_project_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            source_project_path: source_project_path.into(),
            frame_rate: 0,
            resolution_override: Resolution::NONE,
            verbosity: Verbosity::Unset,
            extra_arguments: Vec::new(),
            keep_open: false,
        }
    }

    /// Request seeded from a stored preset.
    pub fn from_preset(
        output_path: impl Into<PathBuf>,
        source_project_path: impl Into<PathBuf>,
        preset: &ExportPreset,
    ) -> ExportResult<Self> {
        Ok(Self::new(output_path, source_project_path)
            .with_frame_rate(preset.fps)
            .with_resolution(preset.resolution_override.into())
            .with_verbosity(Verbosity::try_from(preset.verbosity)?)
            .with_extra_arguments(preset.additional_arguments.iter().cloned())
            .with_keep_open(preset.keep_open))
    }

    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution_override = resolution;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Append arguments after any already present.
    pub fn with_extra_arguments<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_arguments.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn source_project_path(&self) -> &Path {
        &self.source_project_path
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn resolution_override(&self) -> Resolution {
        self.resolution_override
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn extra_arguments(&self) -> &[String] {
        &self.extra_arguments
    }

    pub fn keep_open(&self) -> bool {
        self.keep_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_tiers_are_ordered() {
        assert!(Verbosity::Quiet < Verbosity::Unset);
        assert!(Verbosity::VerboseFps < Verbosity::VerboseAll);
        assert_eq!(Verbosity::try_from(2).unwrap(), Verbosity::VerboseAll);
        assert!(matches!(
            Verbosity::try_from(3),
            Err(ExportError::InvalidVerbosity { value }) if value == "3"
        ));
        assert_eq!("-1".parse::<Verbosity>().unwrap(), Verbosity::Quiet);
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_verbosity_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Verbosity::Quiet).unwrap(), "-1");
        let v: Verbosity = serde_json::from_str("1").unwrap();
        assert_eq!(v, Verbosity::VerboseFps);
        assert!(serde_json::from_str::<Verbosity>("7").is_err());
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!(
            "1920x1080".parse::<Resolution>().unwrap(),
            Resolution::new(1920, 1080)
        );
        assert_eq!("0x0".parse::<Resolution>().unwrap(), Resolution::NONE);
        // Partial overrides parse; the argument builder rejects them.
        assert_eq!("1280x0".parse::<Resolution>().unwrap(), Resolution::new(1280, 0));
        assert!("1920".parse::<Resolution>().is_err());
        assert!("-1x720".parse::<Resolution>().is_err());
        assert_eq!(Resolution::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn test_request_from_preset() {
        let preset = ExportPreset {
            fps: 30,
            resolution_override: [1280, 720],
            additional_arguments: vec!["--headless".to_string()],
            verbosity: 2,
            keep_open: true,
        };
        let request = ExportRequest::from_preset("/out/a.avi", "/game", &preset)
            .unwrap()
            .with_extra_arguments(["--foo"]);

        assert_eq!(request.frame_rate(), 30);
        assert_eq!(request.resolution_override(), Resolution::new(1280, 720));
        assert_eq!(request.verbosity(), Verbosity::VerboseAll);
        assert_eq!(request.extra_arguments(), ["--headless", "--foo"]);
        assert!(request.keep_open());
    }

    #[test]
    fn test_request_from_preset_rejects_bad_verbosity() {
        let preset = ExportPreset {
            verbosity: -4,
            ..ExportPreset::default()
        };
        assert!(ExportRequest::from_preset("/out/a.avi", "/game", &preset).is_err());
    }
}
