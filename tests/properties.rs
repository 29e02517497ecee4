use proptest::prelude::*;
use std::collections::HashSet;
use turmite::{Cell, Heading, Pose, Rule, Simulation, Step};

fn rule_strategy() -> impl Strategy<Value = String> {
    "[RL]{1,8}"
}

// =============================================================================
// Turn function
// =============================================================================

proptest! {
    /// turn(v, d) == turn(v + K, d)
    #[test]
    fn prop_turn_normalises_state(rule in rule_strategy(), state in 0usize..1000, index in 0usize..4) {
        let rule = Rule::parse(&rule).unwrap();
        let heading = Heading::from_index(index);
        prop_assert_eq!(rule.turn(state, heading), rule.turn(state + rule.len(), heading));
    }

    /// A turn always rotates by exactly one quarter.
    #[test]
    fn prop_turn_is_quarter_rotation(rule in rule_strategy(), state in 0usize..64, index in 0usize..4) {
        let rule = Rule::parse(&rule).unwrap();
        let before = Heading::from_index(index).index();
        let after = rule.turn(state, Heading::from_index(index)).index();
        prop_assert!(after == (before + 1) % 4 || after == (before + 3) % 4);
    }
}

// =============================================================================
// Stepping
// =============================================================================

proptest! {
    /// Every cell value stays in [0, K) however many steps run.
    #[test]
    fn prop_cells_stay_in_range(rule in rule_strategy(), size in 1usize..16, steps in 0usize..500) {
        let rule = Rule::parse(&rule).unwrap();
        let k = rule.len();
        let mut sim = Simulation::new(size, rule).unwrap();

        for _ in 0..steps {
            if sim.step() == Step::Halt {
                break;
            }
        }

        prop_assert!(sim.grid().cells().iter().all(|&v| (v as usize) < k));
    }

    /// advance(0) changes nothing and touches nothing.
    #[test]
    fn prop_advance_zero_is_noop(rule in rule_strategy(), size in 1usize..16, warmup in 0usize..100) {
        let mut sim = Simulation::new(size, Rule::parse(&rule).unwrap()).unwrap();
        sim.advance(warmup);
        let before = sim.snapshot();

        prop_assert!(sim.advance(0).is_empty());
        prop_assert_eq!(sim.snapshot(), before);
    }

    /// The step counter grows by the steps completed, never by more than requested,
    /// and the visited set never outgrows it.
    #[test]
    fn prop_counter_tracks_completed_steps(rule in rule_strategy(), size in 1usize..10, steps in 0usize..300) {
        let mut sim = Simulation::new(size, Rule::parse(&rule).unwrap()).unwrap();

        let visited = sim.advance(steps);

        prop_assert!(sim.step_count() <= steps);
        prop_assert!(visited.len() <= sim.step_count());
        if !sim.is_halted() {
            prop_assert_eq!(sim.step_count(), steps);
        }
        prop_assert!(visited.iter().all(|c| c.x < size && c.y < size));
    }

    /// Once the ant is off the grid, nothing moves again.
    #[test]
    fn prop_halted_state_is_idempotent(rule in rule_strategy(), size in 1usize..6, more in 0usize..50) {
        let mut sim = Simulation::new(size, Rule::parse(&rule).unwrap()).unwrap();
        sim.advance(5_000);
        if !sim.is_halted() {
            // Some rules circle forever on small grids.
            return Ok(());
        }
        let before = sim.snapshot();

        prop_assert!(sim.advance(more).is_empty());
        prop_assert_eq!(sim.snapshot(), before);
    }

    /// Identical construction and batches give identical results.
    #[test]
    fn prop_deterministic(rule in rule_strategy(), size in 1usize..20, batches in prop::collection::vec(0usize..200, 0..5)) {
        let rule = Rule::parse(&rule).unwrap();
        let mut a = Simulation::new(size, rule.clone()).unwrap();
        let mut b = Simulation::new(size, rule).unwrap();

        for steps in batches {
            prop_assert_eq!(a.advance(steps), b.advance(steps));
        }

        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    /// The contour tracer never changes the simulation.
    #[test]
    fn prop_contour_is_read_only(rule in rule_strategy(), size in 1usize..12, steps in 0usize..300) {
        let mut sim = Simulation::new(size, Rule::parse(&rule).unwrap()).unwrap();
        sim.advance(steps);
        let before = sim.snapshot();

        let contour = sim.principal_contour();

        prop_assert_eq!(sim.snapshot(), before);
        prop_assert!(contour.symbols().len() <= size * size + 1);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_three_by_three_two_steps() {
    let mut sim = Simulation::new(3, Rule::parse("RL").unwrap()).unwrap();
    assert_eq!(sim.ant(), Pose::new(1, 1, Heading::Right));

    let visited = sim.advance(2);

    assert_eq!(visited, HashSet::from([Cell::new(1, 1), Cell::new(1, 2)]));
    assert_eq!(sim.ant(), Pose::new(0, 2, Heading::Left));
    assert_eq!(sim.grid().get(Cell::new(1, 1)), 1);
    assert_eq!(sim.grid().get(Cell::new(1, 2)), 1);
    assert_eq!(sim.step_count(), 2);
}

#[test]
fn test_one_by_one_halts_permanently() {
    for rule in ["R", "L", "RL", "LLRR"] {
        let mut sim = Simulation::new(1, Rule::parse(rule).unwrap()).unwrap();

        let visited = sim.advance(5);

        assert!(visited.len() <= 1);
        assert_eq!(sim.step_count(), visited.len());
        assert!(sim.is_halted());
        assert!(sim.advance(5).is_empty());
        assert_eq!(sim.step_count(), 1);
    }
}

#[test]
fn test_boundary_exit_counts_completed_steps() {
    // Facing up on the top row, "L" turns left and walks off the west edge.
    let start = Pose::new(0, 0, Heading::Up);
    let mut sim = Simulation::with_start(4, Rule::parse("L").unwrap(), start).unwrap();

    let visited = sim.advance(10);

    assert_eq!(visited.len(), 1);
    assert_eq!(sim.step_count(), 1);
    assert_eq!(sim.ant(), Pose::new(-1, 0, Heading::Left));
}
