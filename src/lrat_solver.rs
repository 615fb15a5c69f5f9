use crate::cnf::{Clause, Literal, VarId};
use crate::error::Error;
use crate::sat_solver::{ProofSolver, Satisfiability, Solver};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// LRAT-emitting solver driving a CaDiCaL process.
///
/// Clauses are buffered in add order and handed to the executable as
/// DIMACS on stdin, so the indices the LRAT file refers to are the add
/// order starting at 1. The proof lands in the file named at
/// construction, in text format (quiet mode, LRAT tracing on, binary
/// proofs off).
pub struct LratSolver {
    binary: PathBuf,
    proof_path: PathBuf,
    clauses: Vec<Clause>,
    max_variable: VarId,
}

impl LratSolver {
    pub fn new(proof_path: impl Into<PathBuf>) -> LratSolver {
        LratSolver {
            binary: PathBuf::from("cadical"),
            proof_path: proof_path.into(),
            clauses: Vec::new(),
            max_variable: 1,
        }
    }

    /// Uses the given CaDiCaL executable instead of `cadical` from the
    /// search path.
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> LratSolver {
        self.binary = binary.into();
        self
    }

    #[inline]
    pub fn proof_path(&self) -> &Path {
        &self.proof_path
    }

    /// Prints the buffered formula in DIMACS compatible form
    fn dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.max_variable, self.clauses.len());
        for clause in &self.clauses {
            for literal in clause {
                out.push_str(&literal.to_i32().to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }
}

impl Solver for LratSolver {
    fn add_clause(&mut self, clause: &Clause) {
        for literal in clause {
            self.max_variable = self.max_variable.max(literal.variable());
        }
        self.clauses.push(clause.clone());
    }

    fn solve_with(
        &mut self,
        assumptions: &[Literal],
        constraint: Option<&Clause>,
    ) -> Result<Satisfiability, Error> {
        if !assumptions.is_empty() || constraint.is_some() {
            // Proofs under assumptions do not refute the formula that
            // was added; interpolation inputs must be materialized.
            return Err(Error::Contract(
                "the proof tracing solver solves materialized formulas only".to_string(),
            ));
        }
        debug!(
            "tracing {} clauses through {} into {}",
            self.clauses.len(),
            self.binary.display(),
            self.proof_path.display()
        );
        let mut child = Command::new(&self.binary)
            .arg("-q")
            .arg("--lrat")
            .arg("--no-binary")
            .arg("-")
            .arg(&self.proof_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Solver("no pipe to the solver process".to_string()))?;
        stdin.write_all(self.dimacs().as_bytes())?;
        drop(stdin);
        let status = child.wait()?;
        debug!("solver exited with status {:?}", status.code());
        match status.code() {
            Some(10) => Ok(Satisfiability::Satisfiable),
            Some(20) => Ok(Satisfiability::Unsatisfiable),
            code => Err(Error::Solver(format!(
                "unexpected solver exit status {:?}",
                code
            ))),
        }
    }
}

impl ProofSolver for LratSolver {
    fn proof(&mut self) -> Result<Box<dyn BufRead>, Error> {
        let file = File::open(&self.proof_path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
