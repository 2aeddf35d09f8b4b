//! List configured export presets.

use gdmovie_common::config::AppConfig;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    if config.presets.is_empty() {
        println!("No presets configured.");
        return Ok(());
    }

    for (name, preset) in &config.presets {
        println!("{name}:");
        println!("  FPS: {}", preset.fps);
        println!(
            "  Resolution: {}x{}",
            preset.resolution_override[0], preset.resolution_override[1]
        );
        println!("  Verbosity: {}", preset.verbosity);
        println!("  Keep open: {}", preset.keep_open);
        if !preset.additional_arguments.is_empty() {
            println!("  Arguments: {}", preset.additional_arguments.join(" "));
        }
    }

    Ok(())
}
