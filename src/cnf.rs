use crate::error::Error;
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt;
use std::iter::FromIterator;

/// Type used for referencing logical variables
pub type VarId = i32;

/// Set of variable identifiers
pub type VarSet = FxHashSet<VarId>;

/// The constant-true literal; DIMACS variable 1 is reserved for it.
pub const TRUE: Literal = Literal(1);

/// The constant-false literal.
pub const FALSE: Literal = Literal(-1);

/// A propositional literal in DIMACS convention: a nonzero signed
/// integer whose absolute value is the variable and whose sign is the
/// polarity. Literal 0 does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(i32);

impl Literal {
    /// Creates a literal from its DIMACS encoding. Passing 0 is a
    /// caller contract violation.
    #[inline]
    pub fn new(literal: i32) -> Literal {
        assert!(literal != 0, "literal 0 does not exist");
        Literal(literal)
    }

    /// Fallible counterpart of [`Literal::new`] for values read from
    /// external input.
    pub fn try_new(literal: i32) -> Result<Literal, Error> {
        if literal == 0 {
            Err(Error::Contract("literal 0 does not exist".to_string()))
        } else {
            Ok(Literal(literal))
        }
    }

    #[inline]
    pub fn variable(self) -> VarId {
        self.0.abs()
    }

    /// +1 for positive literals, -1 for negated ones.
    #[inline]
    pub fn polarity(self) -> i32 {
        self.0.signum()
    }

    #[inline]
    pub fn is_true(self) -> bool {
        self.0 == 1
    }

    #[inline]
    pub fn is_false(self) -> bool {
        self.0 == -1
    }

    #[inline]
    pub fn to_i32(self) -> i32 {
        self.0
    }
}

impl std::ops::Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Literal {
        Literal(-self.0)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A disjunction of literals, kept as a sorted duplicate-free vector so
/// that equality, hashing and ordering go by contents and are
/// deterministic.
///
/// Construction enforces the normal form: a clause containing [`TRUE`]
/// or a complementary pair collapses to `{TRUE}`, [`FALSE`] literals
/// are dropped, and a clause left empty becomes `{FALSE}` (the empty
/// disjunction, unsatisfiable).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Clause {
        let mut kept: Vec<Literal> = Vec::new();
        for literal in literals {
            if literal.is_true() {
                return Clause::valid();
            }
            if !literal.is_false() {
                kept.push(literal);
            }
        }
        kept.sort_unstable();
        kept.dedup();
        if kept.iter().any(|literal| kept.binary_search(&-*literal).is_ok()) {
            return Clause::valid();
        }
        if kept.is_empty() {
            kept.push(FALSE);
        }
        Clause { literals: kept }
    }

    /// The tautologically valid clause `{TRUE}`.
    #[inline]
    pub fn valid() -> Clause {
        Clause { literals: vec![TRUE] }
    }

    /// The empty disjunction `{FALSE}`.
    #[inline]
    pub fn unsat() -> Clause {
        Clause { literals: vec![FALSE] }
    }

    /// Creates a clause containing a single literal
    #[inline]
    pub fn unit(literal: Literal) -> Clause {
        Clause::new(std::iter::once(literal))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.literals == [TRUE]
    }

    #[inline]
    pub fn is_unsat(&self) -> bool {
        self.literals == [FALSE]
    }

    /// Calculates number of literals in clause
    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Literal> {
        self.literals.iter()
    }

    #[inline]
    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.binary_search(&literal).is_ok()
    }

    /// The literal of a singleton clause.
    pub fn unit_literal(&self) -> Option<Literal> {
        match self.literals.as_slice() {
            [literal] => Some(*literal),
            _ => None,
        }
    }

    /// Collects the variables of all literals. Note that the constants
    /// report the reserved variable 1.
    pub fn variables(&self) -> VarSet {
        self.literals.iter().map(|literal| literal.variable()).collect()
    }

    /// Disjunction with another clause, normalized.
    pub fn or(&self, other: &Clause) -> Clause {
        Clause::new(self.iter().chain(other.iter()).copied())
    }

    /// Negation by De Morgan: one unit clause per literal. The valid
    /// clause negates to the trivially unsatisfiable CNF and vice
    /// versa.
    pub fn negate(&self) -> CNF {
        if self.is_valid() {
            return CNF::new(Some(Clause::unsat()));
        }
        if self.is_unsat() {
            return CNF::new(None);
        }
        self.literals.iter().map(|literal| Clause::unit(-*literal)).collect()
    }

    /// The unique variable occurring with opposing polarity in `self`
    /// and `other`, or 0 if there is none or more than one.
    pub fn resolvant(&self, other: &Clause) -> VarId {
        let mut pivot = 0;
        for &literal in &self.literals {
            if other.contains(-literal) {
                if pivot != 0 {
                    return 0;
                }
                pivot = literal.variable();
            }
        }
        pivot
    }

    /// Resolves with `other` on `pivot`: the union of both clauses with
    /// both polarities of the pivot removed.
    pub fn resolve_on(&self, other: &Clause, pivot: VarId) -> Clause {
        Clause::new(
            self.iter()
                .chain(other.iter())
                .filter(|literal| literal.variable() != pivot)
                .copied(),
        )
    }

    /// Restricts the clause to literals over the given variables.
    pub fn restrict(&self, variables: &VarSet) -> Clause {
        Clause::new(
            self.iter()
                .filter(|literal| variables.contains(&literal.variable()))
                .copied(),
        )
    }

    /// Subsumption: every literal of `self` occurs in `other`.
    pub fn implies(&self, other: &Clause) -> bool {
        self.literals.iter().all(|literal| other.contains(*literal))
    }

    /// Applies unit literals: a clause containing a unit is valid, and
    /// literals whose negation is a unit are dropped.
    fn distribute(&self, units: &FxHashSet<Literal>) -> Clause {
        let mut kept = Vec::with_capacity(self.literals.len());
        for &literal in &self.literals {
            if units.contains(&literal) {
                return Clause::valid();
            }
            if !units.contains(&-literal) {
                kept.push(literal);
            }
        }
        Clause::new(kept)
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Clause::new(iter)
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Literal;
    type IntoIter = std::slice::Iter<'a, Literal>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literals.iter().join(" "))
    }
}

/// A conjunction of clauses.
///
/// Valid clauses are omitted and a member equal to `{FALSE}` collapses
/// the whole CNF to the single empty clause, so the trivially valid CNF
/// is `{}` and the trivially unsatisfiable one is `{{FALSE}}`. With
/// [`CNF::minimal`] the eager normal form additionally runs unit
/// propagation and subsumption removal, and every operation on such a
/// CNF re-normalizes its result; labels built during interpolation rely
/// on this to keep their size in check.
#[derive(Debug, Clone)]
pub struct CNF {
    clauses: FxHashSet<Clause>,
    keep_minimal: bool,
}

impl CNF {
    pub fn new(clauses: impl IntoIterator<Item = Clause>) -> CNF {
        CNF::build(clauses, false)
    }

    /// Like [`CNF::new`] but keeping the eager normal form.
    pub fn minimal(clauses: impl IntoIterator<Item = Clause>) -> CNF {
        CNF::build(clauses, true)
    }

    fn build(clauses: impl IntoIterator<Item = Clause>, keep_minimal: bool) -> CNF {
        let mut set = FxHashSet::default();
        for clause in clauses {
            if clause.is_unsat() {
                return CNF::contradiction(keep_minimal);
            }
            if !clause.is_valid() {
                set.insert(clause);
            }
        }
        let mut cnf = CNF { clauses: set, keep_minimal };
        if keep_minimal {
            cnf.propagate_units();
            cnf.remove_implied();
        }
        cnf
    }

    fn contradiction(keep_minimal: bool) -> CNF {
        let mut clauses = FxHashSet::default();
        clauses.insert(Clause::unsat());
        CNF { clauses, keep_minimal }
    }

    /// `{}`, the empty conjunction.
    #[inline]
    pub fn is_trivially_valid(&self) -> bool {
        self.clauses.is_empty()
    }

    /// `{{FALSE}}`, the collapsed unsatisfiable CNF.
    pub fn is_trivially_unsat(&self) -> bool {
        self.clauses.len() == 1 && self.clauses.iter().all(Clause::is_unsat)
    }

    /// Returns number of clauses in the formula
    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[inline]
    pub fn contains(&self, clause: &Clause) -> bool {
        self.clauses.contains(clause)
    }

    #[inline]
    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Collects all variable identifiers that appear in the formula
    pub fn variables(&self) -> VarSet {
        self.clauses.iter().flat_map(Clause::variables).collect()
    }

    /// Conjunction: the union of both clause sets.
    pub fn and(&self, other: &CNF) -> CNF {
        CNF::build(
            self.clauses.iter().chain(other.clauses.iter()).cloned(),
            self.keep_minimal,
        )
    }

    /// Disjunction distributes over the conjunctions: the result holds
    /// one clause per pair of clauses.
    pub fn or(&self, other: &CNF) -> CNF {
        CNF::build(
            self.clauses
                .iter()
                .flat_map(|left| other.clauses.iter().map(move |right| left.or(right))),
            self.keep_minimal,
        )
    }

    /// De Morgan dualization, disjoining the per-clause unit CNFs.
    pub fn negate(&self) -> CNF {
        let mut result = CNF::contradiction(self.keep_minimal);
        for clause in &self.clauses {
            result = result.or(&clause.negate());
        }
        result
    }

    /// Every clause of `other` is subsumed by some clause of `self`.
    pub fn implies(&self, other: &CNF) -> bool {
        other
            .clauses
            .iter()
            .all(|clause| self.clauses.iter().any(|own| own.implies(clause)))
    }

    /// Unit propagation to a fixpoint. Complementary units or an
    /// emptied clause collapse the CNF to the contradiction; the units
    /// themselves are reinserted as singletons at the end.
    fn propagate_units(&mut self) {
        let mut units: FxHashSet<Literal> = FxHashSet::default();
        let mut fresh = self.unit_literals();
        while !fresh.is_empty() {
            units.extend(fresh.iter().copied());
            if fresh.iter().any(|unit| units.contains(&-*unit)) {
                *self = CNF::contradiction(self.keep_minimal);
                return;
            }
            let mut conflict = false;
            let mut reduced = FxHashSet::default();
            for clause in &self.clauses {
                let clause = clause.distribute(&fresh);
                if clause.is_unsat() {
                    conflict = true;
                    break;
                }
                if !clause.is_valid() {
                    reduced.insert(clause);
                }
            }
            if conflict {
                *self = CNF::contradiction(self.keep_minimal);
                return;
            }
            self.clauses = reduced;
            fresh = self.unit_literals();
        }
        self.clauses.extend(units.into_iter().map(Clause::unit));
    }

    fn unit_literals(&self) -> FxHashSet<Literal> {
        self.clauses.iter().filter_map(Clause::unit_literal).collect()
    }

    /// Drops every clause that is a strict superset of another one.
    fn remove_implied(&mut self) {
        let kept: FxHashSet<Clause> = self
            .clauses
            .iter()
            .filter(|clause| {
                !self
                    .clauses
                    .iter()
                    .any(|other| other != *clause && other.implies(clause))
            })
            .cloned()
            .collect();
        self.clauses = kept;
    }
}

impl PartialEq for CNF {
    fn eq(&self, other: &CNF) -> bool {
        self.clauses == other.clauses
    }
}

impl Eq for CNF {}

impl FromIterator<Clause> for CNF {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        CNF::new(iter)
    }
}

impl<'a> IntoIterator for &'a CNF {
    type Item = &'a Clause;
    type IntoIter = std::collections::hash_set::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl IntoIterator for CNF {
    type Item = Clause;
    type IntoIter = std::collections::hash_set::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in self.clauses.iter().sorted() {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}
