//! This module provides functions for analyzing turmite presets to detect invalid
//! configurations before a simulation is built: grid size range, rule length and
//! the position of an explicit start pose.

use crate::rule::Rule;
use crate::types::{Preset, TurmiteError, MAX_GRID_SIZE};

/// Represents the problems that can be found while analyzing a `Preset`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The preset has a blank name.
    EmptyName,
    /// The grid size is zero or larger than `MAX_GRID_SIZE`.
    InvalidSize(usize),
    /// The rule string cannot build a `Rule`.
    InvalidRule(String),
    /// The explicit start pose is not on the grid.
    StartOutOfBounds { x: i64, y: i64, size: usize },
}

impl From<AnalysisError> for TurmiteError {
    /// Converts an `AnalysisError` into a `TurmiteError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::EmptyName => {
                TurmiteError::ValidationError("Preset name must not be empty".to_string())
            }
            AnalysisError::InvalidSize(size) => TurmiteError::ValidationError(format!(
                "Invalid grid size: {} (expected 1..={})",
                size, MAX_GRID_SIZE
            )),
            AnalysisError::InvalidRule(reason) => {
                TurmiteError::ValidationError(format!("Invalid rule: {}", reason))
            }
            AnalysisError::StartOutOfBounds { x, y, size } => {
                TurmiteError::ValidationError(format!(
                    "Start position ({}, {}) is outside a {}x{} grid",
                    x, y, size, size
                ))
            }
        }
    }
}

/// Analyzes a `Preset` and returns the first problem found.
///
/// # Returns
///
/// * `Ok(())` if the preset can build a `Simulation`.
/// * `Err(TurmiteError::ValidationError)` otherwise.
pub fn analyze(preset: &Preset) -> Result<(), TurmiteError> {
    [check_name, check_size, check_rule, check_start]
        .iter()
        .find_map(|check| check(preset).err())
        .map_or(Ok(()), |error| Err(error.into()))
}

fn check_name(preset: &Preset) -> Result<(), AnalysisError> {
    if preset.name.trim().is_empty() {
        return Err(AnalysisError::EmptyName);
    }

    Ok(())
}

fn check_size(preset: &Preset) -> Result<(), AnalysisError> {
    if preset.size == 0 || preset.size > MAX_GRID_SIZE {
        return Err(AnalysisError::InvalidSize(preset.size));
    }

    Ok(())
}

fn check_rule(preset: &Preset) -> Result<(), AnalysisError> {
    Rule::parse(&preset.rule)
        .map(|_| ())
        .map_err(|e| AnalysisError::InvalidRule(e.to_string()))
}

/// Checks that an explicit start pose lies on the grid.
fn check_start(preset: &Preset) -> Result<(), AnalysisError> {
    let Some(start) = preset.start else {
        return Ok(());
    };

    let size = preset.size as i64;
    if !(0..size).contains(&start.x) || !(0..size).contains(&start.y) {
        return Err(AnalysisError::StartOutOfBounds {
            x: start.x,
            y: start.y,
            size: preset.size,
        });
    }

    Ok(())
}
