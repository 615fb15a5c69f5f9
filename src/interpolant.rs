use crate::cnf::{Clause, Literal, VarSet, CNF, TRUE};
use crate::colored::ColoredCnf;
use crate::error::Error;
use crate::sat_solver::{ProofSolver, Satisfiability};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::BufRead;
use std::iter;

/// A derivation line of an LRAT proof: the asserted clause and the
/// ordered antecedent indices it resolves from.
#[derive(Debug, Clone)]
struct ProofStep {
    clause: Clause,
    parents: Vec<usize>,
}

/// Parses one LRAT line, `<idx> <lit>* 0 <antecedent>* 0`. Deletion
/// lines (`<idx> d <idx>* 0`) yield `None`.
fn parse_step(line: &str) -> Result<Option<(usize, ProofStep)>, Error> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let index: usize = tokens
        .get(0)
        .ok_or_else(|| Error::Parse("empty proof line".to_string()))?
        .parse()
        .map_err(|_| Error::Parse(format!("invalid proof index in line `{}`", line)))?;
    if tokens.get(1) == Some(&"d") {
        return Ok(None);
    }
    let rest = &tokens[1..];
    let separator = rest
        .iter()
        .position(|token| *token == "0")
        .ok_or_else(|| Error::Parse(format!("missing literal terminator in line `{}`", line)))?;
    if rest.len() < separator + 2 || rest.last() != Some(&"0") {
        return Err(Error::Parse(format!(
            "missing antecedent terminator in line `{}`",
            line
        )));
    }
    let literals = rest[..separator]
        .iter()
        .map(|token| {
            token
                .parse::<i32>()
                .ok()
                .and_then(|value| Literal::try_new(value).ok())
                .ok_or_else(|| Error::Parse(format!("invalid literal `{}` in proof line", token)))
        })
        .collect::<Result<Vec<Literal>, Error>>()?;
    let parents = rest[separator + 1..rest.len() - 1]
        .iter()
        .map(|token| {
            token.parse::<usize>().map_err(|_| {
                Error::Parse(format!("invalid antecedent `{}` in proof line", token))
            })
        })
        .collect::<Result<Vec<usize>, Error>>()?;
    Ok(Some((
        index,
        ProofStep {
            clause: Clause::new(literals),
            parents,
        },
    )))
}

/// Builds Craig interpolants for two-colored CNFs from LRAT
/// refutations.
///
/// The A part is color 0 and the B part color 1. Input clauses carry
/// LRAT indices in registration order starting at 1 with the
/// constant-true unit the engine prepends; derivations are labeled
/// bottom-up with the Pudlak/McMillan rules, and the label of the final
/// derivation is the interpolant.
pub struct Interpolator {
    inputs: Vec<Clause>,
    b_clauses: FxHashSet<Clause>,
    b_variables: VarSet,
    steps: FxHashMap<usize, ProofStep>,
    labels: FxHashMap<usize, CNF>,
}

impl Interpolator {
    /// Prepares interpolation for a CNF split into an A part and a B
    /// part. Any other number of colors is a contract violation.
    pub fn new(colored: &ColoredCnf) -> Result<Interpolator, Error> {
        if colored.colors().len() != 2 {
            return Err(Error::Contract(format!(
                "interpolation needs exactly two colors, got {}",
                colored.colors().len()
            )));
        }
        let inputs = iter::once(Clause::unit(TRUE))
            .chain(colored.clauses().iter().cloned())
            .collect();
        let b_clauses = colored.color(1).iter().cloned().collect();
        let b_variables = colored.variables(1);
        Ok(Interpolator {
            inputs,
            b_clauses,
            b_variables,
            steps: FxHashMap::default(),
            labels: FxHashMap::default(),
        })
    }

    /// Input clauses in solver registration order; the clause at
    /// position `i` has LRAT index `i + 1`.
    #[inline]
    pub fn inputs(&self) -> &[Clause] {
        &self.inputs
    }

    /// Runs the whole pipeline: registers the inputs, solves, and
    /// labels the returned refutation. A satisfiable formula is
    /// reported as [`Error::Satisfiable`], never as an interpolant.
    pub fn compute<S: ProofSolver>(colored: &ColoredCnf, solver: &mut S) -> Result<CNF, Error> {
        let mut interpolator = Interpolator::new(colored)?;
        for clause in interpolator.inputs() {
            solver.add_clause(clause);
        }
        match solver.solve()? {
            Satisfiability::Satisfiable => Err(Error::Satisfiable),
            Satisfiability::Unsatisfiable => {
                let proof = solver.proof()?;
                interpolator.interpolant(proof)
            }
        }
    }

    /// Consumes an LRAT refutation of the registered inputs and
    /// returns the interpolant.
    pub fn interpolant<R: BufRead>(&mut self, proof: R) -> Result<CNF, Error> {
        let mut last = 0;
        for line in proof.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some((index, step)) = parse_step(&line)? {
                if index <= self.inputs.len() {
                    return Err(Error::Parse(format!(
                        "proof step {} collides with the input clauses",
                        index
                    )));
                }
                if index <= last {
                    return Err(Error::Parse(format!(
                        "proof indices must increase, step {} after {}",
                        index, last
                    )));
                }
                self.steps.insert(index, step);
                last = index;
            }
        }
        if last == 0 {
            return Err(Error::Parse(
                "proof contains no derivation steps".to_string(),
            ));
        }
        debug!("labeling {} proof steps, root {}", self.steps.len(), last);
        let interpolant = self.label(last)?;
        debug!("interpolant has {} clauses", interpolant.len());
        Ok(interpolant)
    }

    fn clause_at(&self, index: usize) -> Result<&Clause, Error> {
        if index == 0 {
            return Err(Error::Parse(
                "proof references the reserved index 0".to_string(),
            ));
        }
        if index <= self.inputs.len() {
            return Ok(&self.inputs[index - 1]);
        }
        self.steps
            .get(&index)
            .map(|step| &step.clause)
            .ok_or_else(|| Error::Parse(format!("proof references unknown step {}", index)))
    }

    /// Leaf labels: clauses of B are trivially valid, clauses of A are
    /// projected onto B's variables.
    fn leaf_label(&self, clause: &Clause) -> CNF {
        if self.b_clauses.contains(clause) {
            CNF::minimal(iter::once(Clause::valid()))
        } else {
            CNF::minimal(iter::once(clause.restrict(&self.b_variables)))
        }
    }

    /// Memoized post-order labeling over the proof DAG. Proof DAGs get
    /// too deep for native recursion, hence the explicit work stack.
    fn label(&mut self, root: usize) -> Result<CNF, Error> {
        let mut stack = vec![root];
        while let Some(&index) = stack.last() {
            if self.labels.contains_key(&index) {
                stack.pop();
                continue;
            }
            if index <= self.inputs.len() {
                let clause = self.clause_at(index)?.clone();
                let label = self.leaf_label(&clause);
                self.labels.insert(index, label);
                stack.pop();
                continue;
            }
            let step = self
                .steps
                .get(&index)
                .ok_or_else(|| Error::Parse(format!("proof references unknown step {}", index)))?
                .clone();
            if let Some(&parent) = step.parents.iter().find(|&&parent| parent >= index) {
                return Err(Error::Parse(format!(
                    "step {} resolves from a later step {}",
                    index, parent
                )));
            }
            let pending: Vec<usize> = step
                .parents
                .iter()
                .copied()
                .filter(|parent| !self.labels.contains_key(parent))
                .collect();
            if pending.is_empty() {
                let label = self.combine(index, &step)?;
                self.labels.insert(index, label);
                stack.pop();
            } else {
                stack.extend(pending);
            }
        }
        self.labels
            .get(&root)
            .cloned()
            .ok_or_else(|| Error::Parse(format!("no label for proof step {}", root)))
    }

    /// Folds one derivation: start from the last antecedent and resolve
    /// backwards through the remaining ones, disjoining labels on
    /// pivots outside B and conjoining on B pivots.
    fn combine(&self, index: usize, step: &ProofStep) -> Result<CNF, Error> {
        let last = match step.parents.last() {
            Some(&parent) => parent,
            None => {
                return Err(Error::Parse(format!("step {} has no antecedents", index)));
            }
        };
        let mut clause = self.clause_at(last)?.clone();
        let mut label = self.label_of(last)?.clone();
        for &parent in step.parents[..step.parents.len() - 1].iter().rev() {
            let parent_clause = self.clause_at(parent)?;
            let pivot = clause.resolvant(parent_clause);
            if pivot == 0 {
                return Err(Error::Parse(format!(
                    "no unique resolution pivot between antecedents of step {}",
                    index
                )));
            }
            let parent_label = self.label_of(parent)?;
            label = if self.b_variables.contains(&pivot) {
                label.and(parent_label)
            } else {
                label.or(parent_label)
            };
            clause = clause.resolve_on(parent_clause, pivot);
        }
        Ok(label)
    }

    fn label_of(&self, index: usize) -> Result<&CNF, Error> {
        self.labels
            .get(&index)
            .ok_or_else(|| Error::Parse(format!("no label for proof step {}", index)))
    }
}
