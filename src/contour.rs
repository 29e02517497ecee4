//! Read-only replay of the ant's future path, used to extract the periodic "highway"
//! cycle a turmite settles into.
//!
//! The tracer walks a scratch ant over a frozen `&Grid`: it reads cell states and
//! applies the rule's turns, but never increments a cell. The replay is only
//! meaningful once the real ant has entered a periodic regime.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::grid::Grid;
use crate::rule::Rule;
use crate::types::{Cell, Pose, Turn};

/// Why a contour could not be closed onto its target pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub enum ContourFailure {
    /// The replay came back to a cell whose state is odd.
    #[error("revisited cell {cell} holding an odd state")]
    OddRevisit { cell: Cell },
    /// The replay walked off the grid.
    #[error("left the grid at ({x}, {y})")]
    LeftGrid { x: i64, y: i64 },
    /// The replay ran for the maximum number of iterations without closing.
    #[error("no closure within {0} iterations")]
    IterationLimit(usize),
}

/// The rule symbols met along a traced path.
///
/// When `failure` is `None` the path closed onto the target pose and `symbols`
/// is one full period of the cycle. Otherwise `symbols` holds the partial trace
/// gathered before the failure was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contour {
    symbols: Vec<Turn>,
    failure: Option<ContourFailure>,
}

impl Contour {
    pub fn symbols(&self) -> &[Turn] {
        &self.symbols
    }

    pub fn failure(&self) -> Option<ContourFailure> {
        self.failure
    }

    pub fn is_closed(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns the cycle length, if the contour closed.
    pub fn period(&self) -> Option<usize> {
        self.is_closed().then_some(self.symbols.len())
    }

    /// Converts the contour into a `Result`, keeping the partial trace on failure.
    pub fn into_result(self) -> Result<Vec<Turn>, (ContourFailure, Vec<Turn>)> {
        match self.failure {
            None => Ok(self.symbols),
            Some(failure) => Err((failure, self.symbols)),
        }
    }
}

impl fmt::Display for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// Replays the ant from `from` over `grid` until it reaches `target` again.
///
/// Every iteration reads the state under the scratch ant, records the rule
/// symbol for it, turns and moves one cell. Closure is checked after each
/// move, so starting on `target` traces a full cycle rather than an empty one.
///
/// The trace fails when it revisits a cell holding an odd state, when it walks
/// off the grid, or after `size² + 1` iterations.
pub fn trace(grid: &Grid, rule: &Rule, from: Pose, target: Pose) -> Contour {
    let limit = grid.size() * grid.size() + 1;
    let mut visited: HashSet<Cell> = HashSet::new();
    let mut symbols = Vec::new();
    let mut scratch = from;

    for _ in 0..limit {
        let Some(cell) = grid.cell(scratch.x, scratch.y) else {
            return failed(
                symbols,
                ContourFailure::LeftGrid {
                    x: scratch.x,
                    y: scratch.y,
                },
            );
        };

        let state = grid.get(cell);
        if !visited.insert(cell) && state % 2 == 1 {
            return failed(symbols, ContourFailure::OddRevisit { cell });
        }

        symbols.push(rule.symbol(state));
        scratch.heading = rule.turn(state, scratch.heading);
        scratch = scratch.moved();

        if scratch == target {
            return Contour {
                symbols,
                failure: None,
            };
        }
    }

    failed(symbols, ContourFailure::IterationLimit(limit))
}

fn failed(symbols: Vec<Turn>, failure: ContourFailure) -> Contour {
    tracing::debug!(%failure, traced = symbols.len(), "contour did not close");
    Contour {
        symbols,
        failure: Some(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Heading;

    #[test]
    fn test_blank_grid_closes_in_a_square() {
        // On an all-zero grid "RL" turns right every time: a 2x2 loop.
        let grid = Grid::new(3).unwrap();
        let rule = Rule::parse("RL").unwrap();
        let start = Pose::new(1, 1, Heading::Right);

        let contour = trace(&grid, &rule, start, start);

        assert!(contour.is_closed());
        assert_eq!(contour.period(), Some(4));
        assert_eq!(contour.to_string(), "RRRR");
    }

    #[test]
    fn test_leaving_grid_fails() {
        let grid = Grid::new(3).unwrap();
        let rule = Rule::parse("RL").unwrap();
        // Turning right from up on the top-right corner heads off the east edge.
        let start = Pose::new(2, 0, Heading::Up);

        let contour = trace(&grid, &rule, start, start);

        assert_eq!(
            contour.failure(),
            Some(ContourFailure::LeftGrid { x: 3, y: 0 })
        );
        assert_eq!(contour.symbols(), &[Turn::Right]);
        assert_eq!(contour.period(), None);
    }

    #[test]
    fn test_out_of_bounds_start_fails_immediately() {
        let grid = Grid::new(3).unwrap();
        let rule = Rule::parse("RL").unwrap();
        let start = Pose::new(-1, 1, Heading::Left);

        let contour = trace(&grid, &rule, start, Pose::new(1, 1, Heading::Right));

        assert!(contour.symbols().is_empty());
        assert_eq!(
            contour.failure(),
            Some(ContourFailure::LeftGrid { x: -1, y: 1 })
        );
    }

    #[test]
    fn test_unreachable_target_hits_iteration_limit() {
        let grid = Grid::new(3).unwrap();
        let rule = Rule::parse("RL").unwrap();
        let start = Pose::new(1, 1, Heading::Right);
        // The square loop never passes through the opposite corner.
        let target = Pose::new(0, 0, Heading::Up);

        let contour = trace(&grid, &rule, start, target);

        assert_eq!(contour.failure(), Some(ContourFailure::IterationLimit(10)));
        assert_eq!(contour.symbols().len(), 10);
    }

    #[test]
    fn test_odd_revisit_fails() {
        let mut grid = Grid::new(3).unwrap();
        // With "RR" every state turns right, so the replay circles the same four
        // cells; (1,1) holds state 1 and aborts on the second lap.
        grid.increment(Cell::new(1, 1), 2);
        let rule = Rule::parse("RR").unwrap();
        let start = Pose::new(1, 1, Heading::Right);
        let target = Pose::new(0, 0, Heading::Up);

        let contour = trace(&grid, &rule, start, target);

        assert_eq!(
            contour.failure(),
            Some(ContourFailure::OddRevisit {
                cell: Cell::new(1, 1)
            })
        );
        assert_eq!(contour.symbols().len(), 4);
    }

    #[test]
    fn test_trace_does_not_mutate_grid() {
        let mut grid = Grid::new(4).unwrap();
        grid.increment(Cell::new(2, 2), 2);
        let before = grid.clone();
        let rule = Rule::parse("RL").unwrap();
        let start = Pose::new(2, 2, Heading::Up);

        let _ = trace(&grid, &rule, start, start);

        assert_eq!(grid, before);
    }

    #[test]
    fn test_into_result_keeps_partial_trace() {
        let grid = Grid::new(3).unwrap();
        let rule = Rule::parse("RL").unwrap();
        let start = Pose::new(2, 0, Heading::Up);

        let (failure, partial) = trace(&grid, &rule, start, start).into_result().unwrap_err();
        assert_eq!(failure, ContourFailure::LeftGrid { x: 3, y: 0 });
        assert_eq!(partial, vec![Turn::Right]);
    }
}
