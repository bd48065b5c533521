//! Static configuration for capture and saving.
//!
//! Values ship as compiled-in defaults; a `config.json` next to the executable
//! overrides them at startup. There are no runtime flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete capture configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Width of the screen area the target occupies (pixels)
    pub capture_width: u32,
    /// Height of the screen area the target occupies (pixels)
    pub capture_height: u32,
    /// Vertical offset of the capture region from the top of the screen (pixels)
    pub capture_offset: u32,
    /// Declared target width for saved images. Images are currently saved at
    /// native capture resolution; this is not enforced on save.
    pub save_width: u32,
    /// Declared target height for saved images. Not enforced on save.
    pub save_height: u32,
    /// Root images folder. A leading `.` stands for the executable's directory.
    pub images_root: String,
    /// First Canny threshold
    pub canny_threshold1: f32,
    /// Second Canny threshold
    pub canny_threshold2: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            capture_width: 1280,
            capture_height: 720,
            capture_offset: 30,
            save_width: 256,
            save_height: 256,
            images_root: "./images".to_string(),
            canny_threshold1: 200.0,
            canny_threshold2: 50.0,
        }
    }
}

impl CaptureConfig {
    /// Loads configuration from config.json or returns defaults.
    /// Looks for config.json in the same directory as the executable.
    pub fn load() -> Self {
        let config_path = crate::paths::get_exe_dir().join("config.json");
        Self::load_from(&config_path)
    }

    fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(contents) => match serde_json::from_str(&contents) {
                    Ok(config) => {
                        crate::log(&format!("Config loaded from {}", config_path.display()));
                        return config;
                    }
                    Err(e) => {
                        crate::log(&format!(
                            "Failed to parse {}: {}. Using defaults.",
                            config_path.display(),
                            e
                        ));
                    }
                },
                Err(e) => {
                    crate::log(&format!(
                        "Failed to read {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    ));
                }
            }
        } else {
            crate::log("config.json not found. Using default config.");
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CaptureConfig::default();

        assert_eq!(config.capture_width, 1280);
        assert_eq!(config.capture_height, 720);
        assert_eq!(config.capture_offset, 30);
        assert_eq!(config.save_width, 256);
        assert_eq!(config.save_height, 256);
        assert_eq!(config.images_root, "./images");
        assert_eq!(config.canny_threshold1, 200.0);
        assert_eq!(config.canny_threshold2, 50.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CaptureConfig =
            serde_json::from_str(r#"{ "capture_offset": 0 }"#).unwrap();

        assert_eq!(config.capture_offset, 0);
        assert_eq!(config.capture_width, 1280);
        assert_eq!(config.images_root, "./images");
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CaptureConfig::load_from(&dir.path().join("config.json"));

        assert_eq!(config.capture_width, 1280);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let written = CaptureConfig {
            images_root: "/tmp/dataset".to_string(),
            canny_threshold1: 120.0,
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&written).unwrap()).unwrap();

        let loaded = CaptureConfig::load_from(&path);

        assert_eq!(loaded.images_root, "/tmp/dataset");
        assert_eq!(loaded.canny_threshold1, 120.0);
        assert_eq!(loaded.capture_height, 720);
    }
}
