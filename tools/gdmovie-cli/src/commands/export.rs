//! Render a project to a movie file.

use std::path::PathBuf;

use gdmovie_common::config::AppConfig;
use gdmovie_export::{ExportRequest, FsPathNormalizer, Resolution, Verbosity};
use gdmovie_launcher::{export_video, EngineLauncher};

/// Export flags as given on the command line.
pub struct ExportOptions {
    pub project: PathBuf,
    pub output: PathBuf,
    pub fps: Option<u32>,
    pub resolution: Option<Resolution>,
    pub verbosity: Option<Verbosity>,
    /// `Some` when `--keep-open` or `--no-keep-open` was given.
    pub keep_open: Option<bool>,
    pub preset: Option<String>,
    pub extra: Vec<String>,
}

/// Preset values first, explicit flags on top, extra arguments appended.
pub fn build_request(config: &AppConfig, options: ExportOptions) -> anyhow::Result<ExportRequest> {
    let mut request = match &options.preset {
        Some(name) => {
            let preset = config
                .preset(name)
                .ok_or_else(|| anyhow::anyhow!("Unknown preset: {name}"))?;
            ExportRequest::from_preset(&options.output, &options.project, preset)
                .map_err(|e| anyhow::anyhow!("Invalid preset '{name}': {e}"))?
        }
        None => ExportRequest::new(&options.output, &options.project),
    };

    if let Some(fps) = options.fps {
        request = request.with_frame_rate(fps);
    }
    if let Some(resolution) = options.resolution {
        request = request.with_resolution(resolution);
    }
    if let Some(verbosity) = options.verbosity {
        request = request.with_verbosity(verbosity);
    }
    if let Some(keep_open) = options.keep_open {
        request = request.with_keep_open(keep_open);
    }

    Ok(request.with_extra_arguments(options.extra))
}

pub async fn run(
    config: &AppConfig,
    options: ExportOptions,
    godot: Option<PathBuf>,
) -> anyhow::Result<i32> {
    let request = build_request(config, options)?;
    let launcher = EngineLauncher::new(config.resolve_engine_binary(godot.as_deref()));

    println!("Exporting project at: {}", request.source_project_path().display());
    println!("  Output: {}", request.output_path().display());
    println!("  Engine: {}", launcher.binary().display());

    let code = export_video(&request, &FsPathNormalizer::new(), &launcher)
        .await
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    if code == 0 {
        println!("Export complete: {}", request.output_path().display());
    } else {
        println!("Engine exited with status {code}");
    }

    Ok(code)
}
