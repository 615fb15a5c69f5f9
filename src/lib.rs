/// Symbolic unrolling of sequential AIGER circuits into per-tick CNFs.
mod aiger;
/// Module containing the reference solver cadical.
mod cadical_solver;
/// The CNF representation of formulas, with resolution and Boolean
/// composition.
mod cnf;
/// CNFs partitioned into ordered color classes.
mod colored;
/// The error kinds shared across the crate.
mod error;
/// The interpolation engine over LRAT refutations.
mod interpolant;
/// The LRAT emitting solver process driver.
mod lrat_solver;
/// The Solver traits which have to be implemented by each backend.
mod sat_solver;

pub use aiger::{AigerCircuit, AndGate, Latch};
pub use cadical_solver::{implies, CadicalSolver};
pub use cnf::{Clause, Literal, VarId, VarSet, CNF, FALSE, TRUE};
pub use colored::ColoredCnf;
pub use error::Error;
pub use interpolant::Interpolator;
pub use lrat_solver::LratSolver;
pub use sat_solver::{ProofSolver, Satisfiability, Solver};
