//! This crate provides the core logic for a generalized Langton's Ant (turmite) simulator.
//! It includes the grid and rule model, the stepping engine with boundary halting, a
//! read-only contour tracer for periodic "highway" paths, and a preset configuration layer.

pub mod analyzer;
pub mod contour;
pub mod grid;
pub mod loader;
pub mod parser;
pub mod presets;
pub mod rule;
pub mod simulation;
pub mod types;

/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the contour types from the contour module.
pub use contour::{Contour, ContourFailure};
/// Re-exports the `Grid` struct from the grid module.
pub use grid::Grid;
/// Re-exports the `PresetLoader` struct from the loader module.
pub use loader::PresetLoader;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `PresetManager` and `PRESETS` from the presets module.
pub use presets::{PresetManager, PRESETS};
/// Re-exports the turning `Rule` from the rule module.
pub use rule::Rule;
/// Re-exports the `Simulation` struct and its `Snapshot` view.
pub use simulation::{Simulation, Snapshot};
/// Re-exports the data types and error type from the types module.
pub use types::{Cell, Heading, Pose, Preset, Step, Turn, TurmiteError, MAX_PRESET_SIZE};
