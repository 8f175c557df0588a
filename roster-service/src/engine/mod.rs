//! Day-by-day constraint solving engine: pattern calendar, feasibility
//! pre-analysis, per-day MILP solve, and the recursive backtracking driver.

pub mod day_solver;
pub mod driver;
pub mod feasibility;
pub mod model;
pub mod pattern;
pub mod state;

pub use day_solver::{SolveError, SolveOutcome};
pub use driver::{DriverError, Failure, FailureReason, RosterOutcome, Success};
pub use feasibility::{check_feasibility, Message, Severity};
pub use model::{ConfigError, Constraints, EmployeeProfile, Pattern, Problem, ShiftId};
pub use state::State;

/// Entry point mirroring the engine's `generate_roster(problem, initial_state)`
/// contract: never raises for `NoSolution`, only for malformed input.
pub fn generate_roster(problem: &Problem, initial_state: State) -> Result<RosterOutcome, DriverError> {
    driver::generate_roster(problem, initial_state)
}
