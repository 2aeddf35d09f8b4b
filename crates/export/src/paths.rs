//! Path normalization.

use std::path::{Component, Path, PathBuf};

use gdmovie_common::error::ExportResult;

/// Resolves user-supplied paths and answers existence queries.
pub trait PathNormalizer {
    /// Make `path` absolute. With `expand_home`, a leading `~` is replaced
    /// by the user's home directory.
    fn normalize_absolute(&self, path: &Path, expand_home: bool) -> ExportResult<PathBuf>;

    /// Whether `path` exists and is a directory.
    fn directory_exists(&self, path: &Path) -> bool;
}

/// Normalizer backed by the real filesystem.
///
/// Relative paths are joined onto a base directory (the process working
/// directory unless overridden); `.` and `..` are resolved lexically,
/// without following symlinks.
#[derive(Debug, Clone, Default)]
pub struct FsPathNormalizer {
    base: Option<PathBuf>,
}

impl FsPathNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `base` instead of the working directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn base_dir(&self) -> ExportResult<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

impl PathNormalizer for FsPathNormalizer {
    fn normalize_absolute(&self, path: &Path, expand_home: bool) -> ExportResult<PathBuf> {
        let expanded = if expand_home {
            expand_tilde(path)
        } else {
            path.to_path_buf()
        };

        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir()?.join(expanded)
        };

        Ok(clean_path(&absolute))
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Lexically remove `.` and `..` components. `..` at the root stays at
/// the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                if !at_root {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
