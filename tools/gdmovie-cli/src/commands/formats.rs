//! List movie writer output formats.

use std::path::PathBuf;

use gdmovie_common::config::AppConfig;
use gdmovie_export::{builtin_output_formats, EngineVersion};
use gdmovie_launcher::EngineLauncher;

pub async fn run(
    config: &AppConfig,
    engine_version: Option<EngineVersion>,
    godot: Option<PathBuf>,
) -> anyhow::Result<()> {
    let version = match engine_version {
        Some(version) => version,
        None => {
            let launcher = EngineLauncher::new(config.resolve_engine_binary(godot.as_deref()));
            launcher
                .query_version()
                .await
                .map_err(|e| anyhow::anyhow!("Could not determine engine version: {e}"))?
        }
    };

    tracing::debug!(engine = %version, "Listing builtin formats");
    for format in builtin_output_formats(version) {
        println!("{format}");
    }

    Ok(())
}
