//! This module provides the `PresetLoader` struct, responsible for loading turmite
//! presets from various sources, including files and strings.

use crate::parser::parse;
use crate::types::{Preset, TurmiteError, MAX_PRESET_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of preset files.
pub const PRESET_EXTENSION: &str = "ant";

/// `PresetLoader` is a utility struct for loading presets from individual files,
/// from string content, and from every `.ant` file within a directory.
pub struct PresetLoader;

impl PresetLoader {
    /// Loads a single preset from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Preset)` if the file is successfully read and parsed.
    /// * `Err(TurmiteError::FileError)` if the file cannot be read.
    /// * `Err(TurmiteError::ParseError)` if the file content is not a valid preset.
    pub fn load_preset(path: &Path) -> Result<Preset, TurmiteError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TurmiteError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_preset_from_string(&content)
    }

    /// Loads a single preset from the provided string content.
    ///
    /// Content larger than `MAX_PRESET_SIZE` bytes is rejected before parsing.
    pub fn load_preset_from_string(content: &str) -> Result<Preset, TurmiteError> {
        if content.len() > MAX_PRESET_SIZE {
            return Err(TurmiteError::ValidationError(format!(
                "Preset is {} bytes (at most {} allowed)",
                content.len(),
                MAX_PRESET_SIZE
            )));
        }

        parse(content)
    }

    /// Loads every preset file (`.ant` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the
    /// result reports either the loaded preset with its path or the failure for one file.
    pub fn load_presets(directory: &Path) -> Vec<Result<(PathBuf, Preset), TurmiteError>> {
        if !directory.exists() {
            return vec![Err(TurmiteError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TurmiteError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TurmiteError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != PRESET_EXTENSION) {
                    return None;
                }

                match Self::load_preset(&path) {
                    Ok(preset) => Some(Ok((path, preset))),
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "skipping preset");
                        Some(Err(TurmiteError::FileError(format!(
                            "Failed to load preset from {}: {}",
                            path.display(),
                            e
                        ))))
                    }
                }
            })
            .collect()
    }
}
