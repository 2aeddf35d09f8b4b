pub mod check;
pub mod export;
pub mod formats;
pub mod presets;
