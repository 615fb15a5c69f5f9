use crate::cnf::{Clause, VarSet, CNF};
use itertools::Itertools;
use rustc_hash::FxHashSet;

/// A CNF partitioned into an ordered list of color classes.
///
/// The combined clause list is duplicate free and deterministically
/// ordered (colors in the given order, clauses sorted within each
/// color). Interpolation registers input clauses with the solver in
/// exactly this order, so it doubles as the LRAT indexing of the
/// inputs. A clause occurring in several colors appears once in the
/// combined list; color membership stays set membership per color.
#[derive(Debug, Clone)]
pub struct ColoredCnf {
    colors: Vec<CNF>,
    clauses: Vec<Clause>,
}

impl ColoredCnf {
    pub fn new(colors: Vec<CNF>) -> ColoredCnf {
        let mut clauses = Vec::new();
        let mut seen = FxHashSet::default();
        for color in &colors {
            for clause in color.iter().sorted() {
                if seen.insert(clause.clone()) {
                    clauses.push(clause.clone());
                }
            }
        }
        ColoredCnf { colors, clauses }
    }

    #[inline]
    pub fn colors(&self) -> &[CNF] {
        &self.colors
    }

    #[inline]
    pub fn color(&self, index: usize) -> &CNF {
        &self.colors[index]
    }

    /// Combined clauses in registration order.
    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Variables of a single color class.
    pub fn variables(&self, index: usize) -> VarSet {
        self.colors[index].variables()
    }

    /// Returns number of clauses in the combined formula
    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }
}
