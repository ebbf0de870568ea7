//! Rule-driven integration: the strategy booklet and the solver that
//! dispatches over it.

pub mod solver;
pub mod strategies;

pub use solver::{Notation, Solution, Solver, SolverConfig, STUCK};
pub use strategies::{Rulebook, Strategy};
