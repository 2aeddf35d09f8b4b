//! Export entry point.

use std::path::{Path, PathBuf};

use gdmovie_common::error::{ExportError, ExportResult};
use gdmovie_export::{
    build_arguments, builtin_output_formats, output_format_of, ExportRequest, PathNormalizer,
    FLAG_PROJECT_PATH,
};

use crate::process::ProcessLauncher;

/// Validate `request`, build the engine arguments and run the engine.
///
/// Returns the engine's exit code unchanged. Validation errors are
/// reported before any process is started, including the version query
/// behind the output format check.
pub async fn export_video(
    request: &ExportRequest,
    normalizer: &dyn PathNormalizer,
    launcher: &dyn ProcessLauncher,
) -> ExportResult<i32> {
    let args = build_arguments(request, normalizer)?;
    let project_dir = args
        .value_of(FLAG_PROJECT_PATH)
        .map(PathBuf::from)
        .ok_or_else(|| ExportError::launch("Engine arguments carry no project path"))?;

    if !request.extra_arguments().is_empty() {
        tracing::warn!(
            extra = ?request.extra_arguments(),
            "Passing additional arguments to the engine unfiltered"
        );
    }

    check_output_format(request.output_path(), launcher).await;

    tracing::info!(
        output = %request.output_path().display(),
        project = %project_dir.display(),
        launcher = launcher.name(),
        "Starting movie export"
    );

    launcher
        .launch(&args, &project_dir, request.keep_open())
        .await
}

/// Warn when the output extension is not a builtin movie writer format.
async fn check_output_format(output: &Path, launcher: &dyn ProcessLauncher) {
    let Some(version) = launcher.engine_version().await else {
        tracing::debug!("Skipping output format check");
        return;
    };

    let formats = builtin_output_formats(version);
    match output_format_of(output) {
        Some(ext) if formats.iter().any(|f| *f == ext) => {}
        other => tracing::warn!(
            extension = ?other,
            supported = ?formats,
            engine = %version,
            "Output extension is not a builtin movie writer format"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CapturedLogs;
    use gdmovie_export::{ArgumentVector, EngineVersion, FsPathNormalizer, Resolution, FLAG_RESOLUTION};
    use std::ffi::OsStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const EXTRAS_WARNING: &str = "Passing additional arguments to the engine unfiltered";
    const FORMAT_WARNING: &str = "Output extension is not a builtin movie writer format";

    /// Records launches instead of starting processes.
    struct RecordingLauncher {
        exit_code: i32,
        version: Option<EngineVersion>,
        version_queries: AtomicUsize,
        calls: Mutex<Vec<(ArgumentVector, PathBuf, bool)>>,
    }

    impl RecordingLauncher {
        fn exiting_with(exit_code: i32) -> Self {
            Self {
                exit_code,
                version: None,
                version_queries: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn reporting(mut self, version: EngineVersion) -> Self {
            self.version = Some(version);
            self
        }

        fn calls(&self) -> Vec<(ArgumentVector, PathBuf, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ProcessLauncher for RecordingLauncher {
        async fn launch(
            &self,
            args: &ArgumentVector,
            working_dir: &Path,
            keep_open: bool,
        ) -> ExportResult<i32> {
            self.calls
                .lock()
                .unwrap()
                .push((args.clone(), working_dir.to_path_buf(), keep_open));
            Ok(self.exit_code)
        }

        async fn engine_version(&self) -> Option<EngineVersion> {
            self.version_queries.fetch_add(1, Ordering::SeqCst);
            self.version
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn project_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("project.godot"), "config_version=5\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_exit_code_is_returned_unchanged() {
        let project = project_dir();
        let request = ExportRequest::new(project.path().join("out.avi"), project.path())
            .with_keep_open(true);
        let launcher = RecordingLauncher::exiting_with(7);

        let code = export_video(&request, &FsPathNormalizer::new(), &launcher)
            .await
            .unwrap();
        assert_eq!(code, 7);

        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        let (args, cwd, keep_open) = &calls[0];
        assert_eq!(cwd, project.path());
        assert!(*keep_open);
        assert_eq!(args.value_of("--path"), Some(project.path().as_os_str()));
    }

    #[tokio::test]
    async fn test_descriptor_file_runs_in_project_dir() {
        let project = project_dir();
        let request = ExportRequest::new(
            project.path().join("out.png"),
            project.path().join("project.godot"),
        );
        let launcher = RecordingLauncher::exiting_with(0);

        export_video(&request, &FsPathNormalizer::new(), &launcher)
            .await
            .unwrap();
        assert_eq!(launcher.calls()[0].1, project.path());
    }

    #[tokio::test]
    async fn test_nothing_launched_on_validation_error() {
        let project = project_dir();
        let normalizer = FsPathNormalizer::new();
        let launcher = RecordingLauncher::exiting_with(0).reporting(EngineVersion::new(4, 5));

        let bad_resolution = ExportRequest::new(project.path().join("out.avi"), project.path())
            .with_resolution(Resolution::new(0, 720));
        let err = export_video(&bad_resolution, &normalizer, &launcher)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::InvalidResolution { width: 0, height: 720 }));

        let into_dir = ExportRequest::new(project.path(), project.path());
        let err = export_video(&into_dir, &normalizer, &launcher)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::OutputIsDirectory { .. }));

        let missing = ExportRequest::new(
            project.path().join("out.avi"),
            project.path().join("missing"),
        );
        let err = export_video(&missing, &normalizer, &launcher)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::SourceNotFound { .. }));

        assert!(launcher.calls().is_empty());
        assert_eq!(launcher.version_queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_launched_arguments_match_request() {
        let project = project_dir();
        let request = ExportRequest::new(project.path().join("out.avi"), project.path())
            .with_resolution(Resolution::new(1920, 1080))
            .with_extra_arguments(["--headless"]);
        let launcher = RecordingLauncher::exiting_with(0);

        export_video(&request, &FsPathNormalizer::new(), &launcher)
            .await
            .unwrap();
        let (args, _, _) = &launcher.calls()[0];
        assert_eq!(args.as_slice()[4].as_os_str(), OsStr::new("--headless"));
        assert_eq!(args.value_of(FLAG_RESOLUTION), Some(OsStr::new("1920x1080")));
    }

    #[tokio::test]
    async fn test_extra_arguments_warn_once() {
        let project = project_dir();
        let launcher = RecordingLauncher::exiting_with(0);
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(tracing::Level::WARN));

        let plain = ExportRequest::new(project.path().join("out.avi"), project.path());
        export_video(&plain, &FsPathNormalizer::new(), &launcher)
            .await
            .unwrap();
        assert_eq!(logs.count(EXTRAS_WARNING), 0);

        let with_extras = plain.with_extra_arguments(["--headless", "--audio-driver", "Dummy"]);
        export_video(&with_extras, &FsPathNormalizer::new(), &launcher)
            .await
            .unwrap();
        assert_eq!(logs.count(EXTRAS_WARNING), 1);
        assert!(logs.contents().contains("--audio-driver"));
    }

    #[tokio::test]
    async fn test_output_format_checked_against_engine_version() {
        let project = project_dir();
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber(tracing::Level::WARN));
        let request = ExportRequest::new(project.path().join("out.ogv"), project.path());

        let old = RecordingLauncher::exiting_with(0).reporting(EngineVersion::new(4, 4));
        export_video(&request, &FsPathNormalizer::new(), &old)
            .await
            .unwrap();
        assert_eq!(logs.count(FORMAT_WARNING), 1);

        let new = RecordingLauncher::exiting_with(0).reporting(EngineVersion::new(4, 5));
        export_video(&request, &FsPathNormalizer::new(), &new)
            .await
            .unwrap();
        assert_eq!(logs.count(FORMAT_WARNING), 1);
        assert_eq!(new.calls().len(), 1);
    }
}
