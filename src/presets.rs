use crate::types::{Preset, TurmiteError};

use std::sync::RwLock;

// Default embedded presets
const PRESET_TEXTS: [&str; 6] = [
    include_str!("../presets/langtons-ant.ant"),
    include_str!("../presets/chaotic-growth.ant"),
    include_str!("../presets/symmetric.ant"),
    include_str!("../presets/square-filler.ant"),
    include_str!("../presets/convoluted-highway.ant"),
    include_str!("../presets/edge-walker.ant"),
];

lazy_static::lazy_static! {
    pub static ref PRESETS: RwLock<Vec<Preset>> = RwLock::new(Vec::new());
}

pub struct PresetManager;

impl PresetManager {
    /// Parses the embedded presets into `PRESETS`, once.
    pub fn load() -> Result<(), TurmiteError> {
        if PRESETS.read().is_ok_and(|presets| !presets.is_empty()) {
            return Ok(());
        }

        let mut presets = Vec::new();
        for text in PRESET_TEXTS {
            match crate::parser::parse(text) {
                Ok(preset) => presets.push(preset),
                Err(e) => tracing::warn!(error = %e, "failed to parse embedded preset"),
            }
        }

        let mut write_guard = PRESETS
            .write()
            .map_err(|_| TurmiteError::FileError("Failed to acquire write lock".to_string()))?;
        *write_guard = presets;

        Ok(())
    }

    /// Get the number of available presets
    pub fn count() -> usize {
        let _ = Self::load();

        PRESETS.read().map(|presets| presets.len()).unwrap_or(0)
    }

    /// Get a preset by its index
    pub fn get_preset_by_index(index: usize) -> Result<Preset, TurmiteError> {
        let _ = Self::load();

        PRESETS
            .read()
            .map_err(|_| TurmiteError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TurmiteError::ValidationError(format!("Preset index {} out of range", index))
            })
    }

    /// Get a preset by its name
    pub fn get_preset_by_name(name: &str) -> Result<Preset, TurmiteError> {
        let _ = Self::load();

        PRESETS
            .read()
            .map_err(|_| TurmiteError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|preset| preset.name == name)
            .cloned()
            .ok_or_else(|| TurmiteError::ValidationError(format!("Preset '{}' not found", name)))
    }

    /// List all preset names
    pub fn list_preset_names() -> Vec<String> {
        let _ = Self::load();

        PRESETS
            .read()
            .map(|presets| presets.iter().map(|preset| preset.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Search for presets whose name contains `query`, ignoring case
    pub fn search_presets(query: &str) -> Vec<usize> {
        let _ = Self::load();
        let query = query.to_lowercase();

        PRESETS
            .read()
            .map(|presets| {
                presets
                    .iter()
                    .enumerate()
                    .filter(|(_, preset)| preset.name.to_lowercase().contains(&query))
                    .map(|(index, _)| index)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the original text of a preset by its index
    pub fn get_preset_text_by_index(index: usize) -> Result<&'static str, TurmiteError> {
        PRESET_TEXTS.get(index).copied().ok_or_else(|| {
            TurmiteError::ValidationError(format!("Preset text index {} out of range", index))
        })
    }
}
