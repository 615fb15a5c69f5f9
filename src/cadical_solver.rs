use crate::cnf::{Clause, Literal, CNF, TRUE};
use crate::error::Error;
use crate::sat_solver::{Satisfiability, Solver};

/// Incremental CDCL backend over the bundled CaDiCaL library. This is
/// the solver driving the bounded model checking loop: clauses stay in
/// the solver between calls and per-call assumptions toggle the
/// switching variables of the unrolling.
pub struct CadicalSolver {
    solver: cadical::Solver,
}

impl CadicalSolver {
    pub fn new() -> CadicalSolver {
        CadicalSolver {
            solver: Default::default(),
        }
    }
}

impl Default for CadicalSolver {
    fn default() -> CadicalSolver {
        CadicalSolver::new()
    }
}

impl Solver for CadicalSolver {
    fn add_clause(&mut self, clause: &Clause) {
        self.solver
            .add_clause(clause.iter().map(|literal| literal.to_i32()));
    }

    fn solve_with(
        &mut self,
        assumptions: &[Literal],
        constraint: Option<&Clause>,
    ) -> Result<Satisfiability, Error> {
        if constraint.is_some() {
            return Err(Error::Solver(
                "transient constraint clauses are not supported by the bundled cadical bindings"
                    .to_string(),
            ));
        }
        let assumptions = assumptions.iter().map(|literal| literal.to_i32());
        match self.solver.solve_with(assumptions) {
            Some(true) => Ok(Satisfiability::Satisfiable),
            Some(false) => Ok(Satisfiability::Unsatisfiable),
            None => Err(Error::Solver(
                "solver terminated without an answer".to_string(),
            )),
        }
    }
}

/// Decides `premise ⊨ conclusion` on a fresh solver by checking that
/// `premise ∧ ¬conclusion` is unsatisfiable. The constant-true unit is
/// asserted first so that the reserved variable 1 keeps its meaning in
/// both formulas.
pub fn implies(premise: &CNF, conclusion: &CNF) -> Result<bool, Error> {
    let mut solver = CadicalSolver::new();
    solver.add_clause(&Clause::unit(TRUE));
    solver.add_formula(premise);
    solver.add_formula(&conclusion.negate());
    Ok(solver.solve()? == Satisfiability::Unsatisfiable)
}
