//! Check the engine installation.

use std::path::PathBuf;

use gdmovie_common::config::AppConfig;
use gdmovie_export::builtin_output_formats;
use gdmovie_launcher::EngineLauncher;

pub async fn run(config: &AppConfig, godot: Option<PathBuf>) -> anyhow::Result<()> {
    println!("gdmovie System Check");
    println!("{}", "=".repeat(50));

    let launcher = EngineLauncher::new(config.resolve_engine_binary(godot.as_deref()));

    let resolved = match launcher.resolve() {
        Ok(path) => {
            println!("[OK] Engine binary: {}", path.display());
            path
        }
        Err(e) => {
            println!("[FAIL] Engine binary: {e}");
            println!();
            println!("Install Godot or point --godot / GDMOVIE_GODOT at the executable.");
            return Ok(());
        }
    };

    match EngineLauncher::new(resolved).query_version().await {
        Ok(version) => {
            println!("[OK] Engine version: {version}");
            println!(
                "     Movie writer formats: {}",
                builtin_output_formats(version).join(", ")
            );
            if version.major < 4 {
                println!("[WARN] The movie writer requires Godot 4.0 or newer");
            }
        }
        Err(e) => println!("[WARN] Engine version: {e}"),
    }

    println!();
    println!("Presets configured: {}", config.presets.len());

    Ok(())
}
