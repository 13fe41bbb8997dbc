//! Persistent application settings, stored as JSON.

use crate::decoder::Architecture;
use crate::error::HexDataError;
use crate::lines::{DEFAULT_BYTES_PER_LINE, clamp_bytes_per_line};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OPTIONS_FILE_NAME: &str = "hexpane.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub dark_mode: bool,
    /// Width used for newly opened files
    pub default_bytes_per_line: usize,
    /// Reload unmodified buffers when their file changes on disk
    pub auto_reload: bool,
    /// Fill the annotation column
    pub disassembly: bool,
    pub architecture: Architecture,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            dark_mode: false,
            default_bytes_per_line: DEFAULT_BYTES_PER_LINE,
            auto_reload: false,
            disassembly: false,
            architecture: Architecture::default(),
        }
    }
}

impl AppOptions {
    /// Reads the options from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns [`HexDataError::Read`] if the file exists but cannot be read, or
    /// [`HexDataError::Options`] if it is not valid JSON.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, HexDataError> {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No options file at '{}', using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(HexDataError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut options: Self = serde_json::from_str(&text)?;
        options.default_bytes_per_line = clamp_bytes_per_line(options.default_bytes_per_line);
        Ok(options)
    }

    /// Writes the options to `path` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`HexDataError::Write`] if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), HexDataError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| HexDataError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Saved options to '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        // Act
        let res = AppOptions::load_or_default("build/missing/options.json");

        // Assert
        assert_eq!(res.ok(), Some(AppOptions::default()));
    }

    #[test]
    fn test_partial_json_and_clamp() {
        // Arrange
        let json = r#"{ "dark_mode": true, "default_bytes_per_line": 100 }"#;

        // Act
        let mut options: AppOptions = serde_json::from_str(json).unwrap_or_default();
        options.default_bytes_per_line = clamp_bytes_per_line(options.default_bytes_per_line);

        // Assert
        assert!(options.dark_mode);
        assert_eq!(options.default_bytes_per_line, 48);
        assert_eq!(options.architecture, Architecture::X86_64);
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = "build/options_t1";
        std::fs::create_dir_all(dir).unwrap();
        let path = format!("{dir}/{OPTIONS_FILE_NAME}");
        let options = AppOptions {
            dark_mode: true,
            default_bytes_per_line: 8,
            auto_reload: true,
            disassembly: true,
            architecture: Architecture::X86_32,
        };

        // Act
        options.save(&path).unwrap();
        let loaded = AppOptions::load_or_default(&path).unwrap();

        // Assert
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_invalid_json() {
        // Arrange
        let dir = "build/options_t2";
        std::fs::create_dir_all(dir).unwrap();
        let path = format!("{dir}/{OPTIONS_FILE_NAME}");
        std::fs::write(&path, "{ not json").unwrap();

        // Act
        let res = AppOptions::load_or_default(&path);

        // Assert
        assert!(matches!(res, Err(HexDataError::Options(_))));
    }
}
