//! This module defines the core data structures and types used throughout the turmite
//! simulator, including turn symbols, headings, poses, presets and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The grid size used when a preset does not declare one.
pub const DEFAULT_GRID_SIZE: usize = 101;
/// The largest accepted grid edge length.
pub const MAX_GRID_SIZE: usize = 4096;
/// The longest accepted rule. Cell states are stored as `u8`.
pub const MAX_RULE_LENGTH: usize = 256;
/// The maximum number of steps `Simulation::run` executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 1_000_000;
/// The heading of a freshly placed ant.
pub const DEFAULT_HEADING: Heading = Heading::Right;
/// The maximum size for a preset source in bytes.
pub const MAX_PRESET_SIZE: usize = 4096;

/// A single symbol of a turning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Rotate a quarter turn clockwise.
    Right,
    /// Rotate a quarter turn counter-clockwise.
    Left,
}

impl Turn {
    /// Maps a rule character onto a turn. Only `'R'` turns right.
    pub fn from_char(c: char) -> Self {
        if c == 'R' {
            Turn::Right
        } else {
            Turn::Left
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Turn::Right => 'R',
            Turn::Left => 'L',
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The four directions an ant can face.
///
/// The discriminants match the numeric encoding `0=up, 1=right, 2=down, 3=left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    /// Builds a heading from its numeric encoding, taken modulo 4.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the heading after applying `turn`.
    pub fn turn(self, turn: Turn) -> Self {
        match turn {
            Turn::Right => Self::from_index(self.index() + 1),
            Turn::Left => Self::from_index(self.index() + 3),
        }
    }

    /// Returns the `(dx, dy)` unit offset. `y` grows downward.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Heading::Up => (0, -1),
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
        }
    }

    /// Parses a lowercase heading name such as `right`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Heading::Up),
            "right" => Some(Heading::Right),
            "down" => Some(Heading::Down),
            "left" => Some(Heading::Left),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heading::Up => "up",
            Heading::Right => "right",
            Heading::Down => "down",
            Heading::Left => "left",
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position and heading of an ant.
///
/// Coordinates are signed: once the ant walks off the grid it keeps the
/// out-of-bounds coordinate (for example `x == -1`) and the simulation halts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Column, growing rightward.
    pub x: i64,
    /// Row, growing downward.
    pub y: i64,
    pub heading: Heading,
}

impl Pose {
    pub fn new(x: i64, y: i64, heading: Heading) -> Self {
        Self { x, y, heading }
    }

    /// Returns the pose one cell further along the current heading.
    pub fn moved(self) -> Self {
        let (dx, dy) = self.heading.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            heading: self.heading,
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) facing {}", self.x, self.y, self.heading)
    }
}

/// An in-bounds grid coordinate. Equality and hashing are by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Represents the outcome of a single simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The ant performed a step and is ready for the next one.
    Continue,
    /// The ant stands outside the grid; nothing was changed.
    Halt,
}

/// A named simulation configuration, as loaded from an `.ant` file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// The display name of the preset.
    pub name: String,
    /// Edge length of the square grid.
    pub size: usize,
    /// The rule string, e.g. `RL` or `LLRR`.
    pub rule: String,
    /// Explicit start pose. Defaults to the grid centre facing right.
    pub start: Option<Pose>,
}

/// Represents various errors that can occur while building or configuring a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TurmiteError {
    /// The requested grid edge length is zero or too large.
    #[error("Invalid grid size: {0} (expected 1..={max})", max = MAX_GRID_SIZE)]
    InvalidGridSize(usize),
    /// The rule has no symbols.
    #[error("Rule must contain at least one symbol")]
    EmptyRule,
    /// The rule has more symbols than a cell state can hold.
    #[error("Rule has {0} symbols (at most {max} allowed)", max = MAX_RULE_LENGTH)]
    RuleTooLong(usize),
    /// An explicit start pose lies outside the grid.
    #[error("Start position ({x}, {y}) is outside a {size}x{size} grid")]
    StartOutOfBounds { x: i64, y: i64, size: usize },
    /// Indicates an error during the parsing of a preset definition.
    #[error("Preset parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<crate::parser::Rule>>),
    /// Indicates a well-formed preset carrying invalid values.
    #[error("Preset validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to reading preset files.
    #[error("File error: {0}")]
    FileError(String),
}
