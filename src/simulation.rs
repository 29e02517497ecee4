//! This module defines the `Simulation` struct, which runs a single turmite on a finite
//! square grid. It owns the grid, the rule and the ant, applies transitions, and
//! exposes the contour tracer over the live grid.

use serde::Serialize;
use std::collections::HashSet;

use crate::contour::{self, Contour};
use crate::grid::Grid;
use crate::rule::Rule;
use crate::types::{
    Cell, Pose, Preset, Step, TurmiteError, DEFAULT_HEADING, MAX_EXECUTION_STEPS,
};

/// A turmite walking on a finite grid.
///
/// The grid and rule are fixed at construction; running with another size or
/// rule means building a new `Simulation`. The step counter only grows.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    rule: Rule,
    ant: Pose,
    initial: Pose,
    step_count: usize,
}

/// A serializable view of a simulation at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub size: usize,
    pub rule: String,
    pub ant: Pose,
    pub step_count: usize,
    pub halted: bool,
    pub rows: Vec<Vec<u8>>,
}

impl Simulation {
    /// Creates a simulation with the ant on the centre cell facing right.
    ///
    /// # Returns
    ///
    /// * `Err(TurmiteError::InvalidGridSize)` if `size` is zero or above `MAX_GRID_SIZE`.
    pub fn new(size: usize, rule: Rule) -> Result<Self, TurmiteError> {
        let centre = (size / 2) as i64;
        Self::with_start(size, rule, Pose::new(centre, centre, DEFAULT_HEADING))
    }

    /// Creates a simulation with an explicit start pose, which must lie on the grid.
    pub fn with_start(size: usize, rule: Rule, start: Pose) -> Result<Self, TurmiteError> {
        let grid = Grid::new(size)?;
        if grid.cell(start.x, start.y).is_none() {
            return Err(TurmiteError::StartOutOfBounds {
                x: start.x,
                y: start.y,
                size,
            });
        }

        Ok(Self {
            grid,
            rule,
            ant: start,
            initial: start,
            step_count: 0,
        })
    }

    /// Creates a simulation from a `Preset`.
    pub fn from_preset(preset: &Preset) -> Result<Self, TurmiteError> {
        let rule = Rule::parse(&preset.rule)?;
        match preset.start {
            Some(start) => Self::with_start(preset.size, rule, start),
            None => Self::new(preset.size, rule),
        }
    }

    /// Executes a single step: turn on the current cell's state, increment the
    /// cell, then move one cell along the new heading.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the step was performed.
    /// * `Step::Halt` if the ant is already off the grid. Nothing changes in that case.
    pub fn step(&mut self) -> Step {
        match self.grid.cell(self.ant.x, self.ant.y) {
            Some(cell) => {
                self.transition(cell);
                self.step_count += 1;
                Step::Continue
            }
            None => Step::Halt,
        }
    }

    /// Performs up to `steps` steps and returns the distinct cells the ant stood on.
    ///
    /// Before each step the ant's position is checked; if it is off the grid the
    /// batch stops and the step counter grows only by the steps completed. Once
    /// halted, every further call is a no-op returning an empty set.
    pub fn advance(&mut self, steps: usize) -> HashSet<Cell> {
        let mut visited = HashSet::new();

        for completed in 0..steps {
            let Some(cell) = self.grid.cell(self.ant.x, self.ant.y) else {
                self.step_count += completed;
                tracing::debug!(
                    completed,
                    requested = steps,
                    ant = %self.ant,
                    "ant left the grid"
                );
                return visited;
            };

            visited.insert(cell);
            self.transition(cell);
        }

        self.step_count += steps;
        tracing::trace!(steps, touched = visited.len(), "advanced");
        visited
    }

    /// Steps until the ant leaves the grid or `MAX_EXECUTION_STEPS` steps have run.
    pub fn run(&mut self) -> Step {
        for _ in 0..MAX_EXECUTION_STEPS {
            if self.step() == Step::Halt {
                return Step::Halt;
            }
        }

        Step::Continue
    }

    /// Traces the cycle from the ant's current pose back to its initial pose
    /// without touching the grid. See `contour::trace`.
    pub fn principal_contour(&self) -> Contour {
        contour::trace(&self.grid, &self.rule, self.ant, self.initial)
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Returns the ant's current pose, which may be off the grid once halted.
    pub fn ant(&self) -> Pose {
        self.ant
    }

    /// Returns the pose captured at construction.
    pub fn initial_pose(&self) -> Pose {
        self.initial
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Checks if the ant has left the grid. A halted simulation never resumes.
    pub fn is_halted(&self) -> bool {
        self.grid.cell(self.ant.x, self.ant.y).is_none()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.grid.size(),
            rule: self.rule.to_string(),
            ant: self.ant,
            step_count: self.step_count,
            halted: self.is_halted(),
            rows: self.grid.rows(),
        }
    }

    fn transition(&mut self, cell: Cell) {
        // Turn and increment both use the state read before this step.
        let state = self.grid.increment(cell, self.rule.len());
        self.ant.heading = self.rule.turn(state, self.ant.heading);
        self.ant = self.ant.moved();
    }
}
