use crate::cnf::{Clause, Literal, CNF};
use crate::error::Error;
use std::io::BufRead;

/// Outcome of a solver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    Satisfiable,
    Unsatisfiable,
}

/// The Solver trait which has to be implemented by each backend.
pub trait Solver {
    /// Adds a single clause to the solver.
    fn add_clause(&mut self, clause: &Clause);

    /// Adds every clause of a formula.
    fn add_formula(&mut self, formula: &CNF) {
        for clause in formula {
            self.add_clause(clause);
        }
    }

    /// Solves the formula added so far.
    fn solve(&mut self) -> Result<Satisfiability, Error> {
        self.solve_with(&[], None)
    }

    /// Solves under assumption literals and an optional constraint
    /// clause, both in force for this call only.
    fn solve_with(
        &mut self,
        assumptions: &[Literal],
        constraint: Option<&Clause>,
    ) -> Result<Satisfiability, Error>;
}

/// A solver that emits an LRAT proof when it answers UNSAT.
///
/// Proof indices refer to clauses in [`Solver::add_clause`] order,
/// starting at 1 with the first added clause.
pub trait ProofSolver: Solver {
    /// Opens the proof produced by the last unsatisfiable answer.
    fn proof(&mut self) -> Result<Box<dyn BufRead>, Error>;
}
