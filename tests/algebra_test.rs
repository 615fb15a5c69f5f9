use craig::{implies, Clause, Literal, VarSet, CNF};
use proptest::collection::vec;
use proptest::prelude::*;

fn clause(literals: &[i32]) -> Clause {
    literals.iter().map(|literal| Literal::new(*literal)).collect()
}

fn cnf(clauses: &[&[i32]]) -> CNF {
    clauses.iter().map(|literals| clause(literals)).collect()
}

#[test]
fn literal_accessors() {
    let literal = Literal::new(-7);
    assert_eq!(literal.variable(), 7);
    assert_eq!(literal.polarity(), -1);
    assert_eq!(-literal, Literal::new(7));
    assert!(Literal::try_new(0).is_err());
}

#[test]
fn true_literal_collapses_clause() {
    assert!(clause(&[2, 1, -3]).is_valid());
}

#[test]
fn complementary_literals_collapse_clause() {
    assert!(clause(&[2, 3, -2]).is_valid());
}

#[test]
fn false_literals_are_dropped() {
    assert_eq!(clause(&[-1, 2]), clause(&[2]));
}

#[test]
fn empty_clause_is_unsat() {
    assert!(clause(&[]).is_unsat());
    assert!(clause(&[-1]).is_unsat());
}

#[test]
fn clause_equality_ignores_order_and_duplicates() {
    assert_eq!(clause(&[2, 3, 2]), clause(&[3, 2]));
    assert_eq!(clause(&[5, -4, 2]), clause(&[2, -4, 5]));
}

#[test]
fn clause_negation_yields_unit_cnf() {
    assert_eq!(clause(&[2, 3]).negate(), cnf(&[&[-2], &[-3]]));
    assert!(Clause::valid().negate().is_trivially_unsat());
    assert!(Clause::unsat().negate().is_trivially_valid());
}

#[test]
fn restriction_keeps_shared_variables() {
    let shared: VarSet = [3, 5].iter().copied().collect();
    assert_eq!(clause(&[2, -3, 5]).restrict(&shared), clause(&[-3, 5]));
    assert!(clause(&[2]).restrict(&shared).is_unsat());
}

#[test]
fn valid_clauses_are_omitted_from_cnf() {
    assert_eq!(cnf(&[&[1], &[2]]), cnf(&[&[2]]));
}

#[test]
fn unsat_clause_collapses_cnf() {
    let collapsed = cnf(&[&[2], &[]]);
    assert!(collapsed.is_trivially_unsat());
    assert_eq!(collapsed.len(), 1);
}

#[test]
fn negation_distributes_over_clauses() {
    assert_eq!(
        cnf(&[&[2, 3], &[4, 5]]).negate(),
        cnf(&[&[-2, -4], &[-2, -5], &[-3, -4], &[-3, -5]])
    );
}

#[test]
fn negation_combinatorics() {
    let negated = cnf(&[&[2, 3, 4], &[5, 6, 7], &[8, 9, 10]]).negate();
    assert_eq!(negated.len(), 27);
}

#[test]
fn negation_of_the_trivial_formulas() {
    assert!(CNF::new(None).negate().is_trivially_unsat());
    assert!(cnf(&[&[]]).negate().is_trivially_valid());
}

#[test]
fn subsumed_clauses_are_removed() {
    let minimal = CNF::minimal(vec![clause(&[2, 3]), clause(&[2, 3, 4]), clause(&[3, 4])]);
    assert_eq!(minimal, cnf(&[&[2, 3], &[3, 4]]));
}

#[test]
fn unit_propagation_reduces_clauses() {
    let minimal = CNF::minimal(vec![clause(&[2]), clause(&[-2, 3]), clause(&[3, 4])]);
    assert_eq!(minimal, cnf(&[&[2], &[3]]));
}

#[test]
fn complementary_units_collapse() {
    assert!(CNF::minimal(vec![clause(&[2]), clause(&[-2])]).is_trivially_unsat());
}

#[test]
fn resolution_finds_the_unique_pivot() {
    let left = clause(&[2, 5]);
    let right = clause(&[-5, 3]);
    assert_eq!(left.resolvant(&right), 5);
    assert_eq!(left.resolve_on(&right, 5), clause(&[2, 3]));
    assert_eq!(clause(&[2, 5]).resolvant(&clause(&[-2, -5])), 0);
    assert_eq!(clause(&[2]).resolvant(&clause(&[3])), 0);
}

#[test]
fn cnf_implication_is_clausewise_subsumption() {
    let strong = cnf(&[&[2], &[3, 4]]);
    let weak = cnf(&[&[2, 5], &[3, 4, 6]]);
    assert!(strong.implies(&weak));
    assert!(!weak.implies(&strong));
}

fn literals(max_len: usize) -> impl Strategy<Value = Vec<Literal>> {
    vec((2..8i32, any::<bool>()), 1..=max_len).prop_map(|literals| {
        literals
            .into_iter()
            .map(|(variable, positive)| Literal::new(if positive { variable } else { -variable }))
            .collect()
    })
}

fn clauses(max_len: usize) -> impl Strategy<Value = Clause> {
    literals(max_len).prop_map(Clause::new)
}

fn formulas(max_clauses: usize, max_len: usize) -> impl Strategy<Value = CNF> {
    vec(literals(max_len), 1..=max_clauses)
        .prop_map(|clauses| clauses.into_iter().map(Clause::new).collect())
}

proptest! {
    #[test]
    fn resolution_eliminates_the_pivot(left in clauses(4), right in clauses(4)) {
        let pivot = left.resolvant(&right);
        if pivot != 0 {
            let resolved = left.resolve_on(&right, pivot);
            prop_assert!(!resolved.variables().contains(&pivot));
            let union: VarSet = left.variables().union(&right.variables()).copied().collect();
            prop_assert!(
                resolved.is_valid()
                    || resolved.is_unsat()
                    || resolved.variables().is_subset(&union)
            );
        }
    }

    #[test]
    fn conjunction_implies_both_parts(x in formulas(4, 3), y in formulas(4, 3)) {
        let both = x.and(&y);
        prop_assert!(both.implies(&x));
        prop_assert!(both.implies(&y));
    }

    #[test]
    fn disjunction_is_implied_by_either_part(x in formulas(3, 3), y in formulas(3, 3)) {
        let either = x.or(&y);
        prop_assert!(x.implies(&either));
        prop_assert!(y.implies(&either));
    }

    #[test]
    fn keep_minimal_is_idempotent(x in formulas(5, 3)) {
        let minimal = CNF::minimal(x.iter().cloned());
        let again = CNF::minimal(minimal.iter().cloned());
        prop_assert_eq!(&again, &minimal);
    }

    #[test]
    fn double_negation_is_equivalent(x in formulas(2, 2)) {
        let double = x.negate().negate();
        prop_assert!(implies(&x, &double).unwrap());
        prop_assert!(implies(&double, &x).unwrap());
    }
}
