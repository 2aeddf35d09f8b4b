//! Engine command-line construction.
//!
//! The two path flags always come first, followed by the caller's extra
//! arguments, then the optional resolution, logging and pacing flags.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use gdmovie_common::error::{ExportError, ExportResult};

use crate::paths::PathNormalizer;
use crate::request::{ExportRequest, Verbosity};

/// Filename marking a Godot project root.
pub const PROJECT_DESCRIPTOR: &str = "project.godot";

pub const FLAG_WRITE_MOVIE: &str = "--write-movie";
pub const FLAG_PROJECT_PATH: &str = "--path";
pub const FLAG_RESOLUTION: &str = "--resolution";
pub const FLAG_FIXED_FPS: &str = "--fixed-fps";
pub const FLAG_PRINT_FPS: &str = "--print-fps";
pub const FLAG_VERBOSE: &str = "--verbose";
pub const FLAG_QUIET: &str = "--quiet";

/// Ordered engine arguments, without the executable itself.
///
/// Tokens are OS strings so paths reach the engine byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentVector(Vec<OsString>);

impl ArgumentVector {
    pub fn as_slice(&self) -> &[OsString] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OsString> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, token: impl AsRef<OsStr>) -> bool {
        self.position(token).is_some()
    }

    /// Index of the first occurrence of `token`.
    pub fn position(&self, token: impl AsRef<OsStr>) -> Option<usize> {
        let token = token.as_ref();
        self.0.iter().position(|t| t == token)
    }

    /// Token following the first occurrence of `flag`.
    pub fn value_of(&self, flag: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.position(flag)
            .and_then(|i| self.0.get(i + 1))
            .map(OsString::as_os_str)
    }

    pub fn into_inner(self) -> Vec<OsString> {
        self.0
    }

    fn push(&mut self, token: impl Into<OsString>) {
        self.0.push(token.into());
    }

    fn push_pair(&mut self, flag: &str, value: impl Into<OsString>) {
        self.push(flag);
        self.push(value);
    }
}

impl<'a> IntoIterator for &'a ArgumentVector {
    type Item = &'a OsString;
    type IntoIter = std::slice::Iter<'a, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Shell-style rendering for logs. Tokens with whitespace or quotes are
/// single-quoted; invalid UTF-8 is shown lossily.
impl fmt::Display for ArgumentVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let token = token.to_string_lossy();
            if token.is_empty() || token.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
                write!(f, "'{}'", token.replace('\'', r"'\''"))?;
            } else {
                f.write_str(&token)?;
            }
        }
        Ok(())
    }
}

/// Source and output locations after normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub output: PathBuf,
    pub project_dir: PathBuf,
}

/// Normalize and validate the request's paths.
///
/// A path naming the project descriptor file is accepted in place of the
/// project directory.
pub fn resolve_paths(
    request: &ExportRequest,
    normalizer: &dyn PathNormalizer,
) -> ExportResult<ResolvedPaths> {
    let output = normalizer.normalize_absolute(request.output_path(), true)?;
    let mut project_dir = normalizer.normalize_absolute(request.source_project_path(), true)?;

    if !normalizer.directory_exists(&project_dir) && names_descriptor(&project_dir) {
        if let Some(parent) = project_dir.parent() {
            project_dir = parent.to_path_buf();
        }
    }
    if !normalizer.directory_exists(&project_dir) {
        return Err(ExportError::SourceNotFound { path: project_dir });
    }

    if normalizer.directory_exists(&output) {
        return Err(ExportError::OutputIsDirectory { path: output });
    }

    Ok(ResolvedPaths {
        output,
        project_dir,
    })
}

fn names_descriptor(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == PROJECT_DESCRIPTOR)
}

/// Build the engine arguments for `request`.
pub fn build_arguments(
    request: &ExportRequest,
    normalizer: &dyn PathNormalizer,
) -> ExportResult<ArgumentVector> {
    let paths = resolve_paths(request, normalizer)?;
    arguments_for(request, &paths)
}

/// Build the engine arguments for `request` against already resolved paths.
pub fn arguments_for(request: &ExportRequest, paths: &ResolvedPaths) -> ExportResult<ArgumentVector> {
    let mut args = ArgumentVector::default();
    args.push_pair(FLAG_WRITE_MOVIE, &paths.output);
    args.push_pair(FLAG_PROJECT_PATH, &paths.project_dir);

    for extra in request.extra_arguments() {
        args.push(extra.as_str());
    }

    let resolution = request.resolution_override();
    if resolution.is_complete() {
        args.push_pair(FLAG_RESOLUTION, resolution.to_string());
    } else if !resolution.is_unset() {
        return Err(ExportError::InvalidResolution {
            width: resolution.width,
            height: resolution.height,
        });
    }

    let verbosity = request.verbosity();
    if verbosity < Verbosity::Unset {
        args.push(FLAG_QUIET);
    } else if verbosity > Verbosity::Unset {
        args.push(FLAG_PRINT_FPS);
        if verbosity >= Verbosity::VerboseAll {
            args.push(FLAG_VERBOSE);
        }
    }

    if request.frame_rate() > 0 {
        args.push_pair(FLAG_FIXED_FPS, request.frame_rate().to_string());
    }

    Ok(args)
}
