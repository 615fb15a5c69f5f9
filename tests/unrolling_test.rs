use craig::{AigerCircuit, Clause, Error, Literal, CNF, FALSE, TRUE};
use std::collections::HashSet;

fn clause(literals: &[i32]) -> Clause {
    literals.iter().map(|literal| Literal::new(*literal)).collect()
}

fn cnf(clauses: &[&[i32]]) -> CNF {
    clauses.iter().map(|literals| clause(literals)).collect()
}

// v3 = v1 ∧ v2, the output is the gate.
const AND_GATE: &str = "aag 3 1 0 1 1\n2\n6\n6 2 4\n";

// A single latch fed by the only other variable.
const LATCHED: &str = "aag 2 0 1 1 0\n4 2\n4\n";

#[test]
fn and_gate_clauses_at_tick_zero() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(circuit.maxvar(), 5);
    assert_eq!(circuit.output(), Literal::new(4));
    assert_eq!(circuit.and_gates().len(), 1);
    assert!(circuit.latches().is_empty());
    assert_eq!(
        circuit.clauses_gates(0),
        cnf(&[&[-4, 2], &[-4, 3], &[4, -2, -3]])
    );
}

#[test]
fn gate_clauses_shift_with_the_tick() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(
        circuit.clauses_gates(1),
        cnf(&[&[-9, 7], &[-9, 8], &[9, -7, -8]])
    );
}

#[test]
fn constant_gate_inputs_collapse() {
    // The gate output is tied to constant inputs, so two of the three
    // defining clauses are tautologies.
    let circuit = AigerCircuit::parse("aag 1 0 0 1 1\n2\n2 1 0\n").unwrap();
    assert_eq!(circuit.clauses_gates(0), cnf(&[&[-2]]));
}

#[test]
fn latches_initialize_to_false() {
    let circuit = AigerCircuit::parse(LATCHED).unwrap();
    assert_eq!(circuit.latches().len(), 1);
    assert_eq!(circuit.clauses_latches(0), cnf(&[&[-3]]));
}

#[test]
fn latches_carry_the_previous_next_state() {
    let circuit = AigerCircuit::parse(LATCHED).unwrap();
    // maxvar is 4: the current-state variable 3 at tick 1 is 7, the
    // next-state function 2 stays at tick 0.
    assert_eq!(
        circuit.clauses_latches(1),
        cnf(&[&[-7, 2], &[7, -2]])
    );
}

#[test]
fn constants_are_fixpoints_of_shifting() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    for tick in 0..5 {
        assert_eq!(circuit.literal_at(TRUE, tick), TRUE);
        assert_eq!(circuit.literal_at(FALSE, tick), FALSE);
    }
}

#[test]
fn shifting_preserves_polarity_and_is_injective() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    let mut seen = HashSet::new();
    for tick in 0..4 {
        for variable in 2..=circuit.maxvar() {
            let shifted = circuit.literal_at(Literal::new(variable), tick);
            assert_eq!(shifted.polarity(), 1);
            assert_eq!(
                circuit.literal_at(Literal::new(-variable), tick),
                -shifted
            );
            assert!(seen.insert(shifted));
        }
    }
}

#[test]
fn output_clause_is_the_shifted_bad_state() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(circuit.clause_output(0), clause(&[4]));
    assert_eq!(circuit.clause_output(1), clause(&[9]));
}

#[test]
fn whole_cnfs_shift_clausewise() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(
        circuit.cnf_at_tick(&cnf(&[&[2, -3]]), 1),
        cnf(&[&[7, -8]])
    );
}

#[test]
fn switching_literal_guards_every_clause() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(circuit.switching_variable(), 5);
    assert_eq!(
        circuit.apply_switch(&cnf(&[&[2], &[3, 4]]), 1),
        cnf(&[&[2, 10], &[3, 4, 10]])
    );
}

#[test]
fn assumptions_enable_all_but_the_current_tick() {
    let circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(circuit.assumptions(0), vec![Literal::new(-5)]);
    assert_eq!(
        circuit.assumptions(2),
        vec![Literal::new(5), Literal::new(10), Literal::new(-15)]
    );
}

#[test]
fn unrolling_accumulates_beyond_the_first_transition() {
    let mut circuit = AigerCircuit::parse(LATCHED).unwrap();
    circuit.clauses_system(0);
    circuit.clauses_system(1);
    assert!(circuit.unrolled().is_trivially_valid());
    let tick_two = circuit.clauses_system(2);
    assert_eq!(circuit.unrolled(), &tick_two);
}

#[test]
fn system_clauses_join_gates_and_latches() {
    let mut circuit = AigerCircuit::parse(AND_GATE).unwrap();
    assert_eq!(circuit.clauses_system(0), circuit.clauses_gates(0));
}

#[test]
fn malformed_circuits_are_rejected() {
    // Wrong magic.
    assert!(matches!(
        AigerCircuit::parse("abc 1 0 0 1 0\n2\n"),
        Err(Error::Parse(_))
    ));
    // More than one output.
    assert!(matches!(
        AigerCircuit::parse("aag 3 1 0 2 1\n2\n6\n4\n6 2 4\n"),
        Err(Error::Parse(_))
    ));
    // Latch line with the wrong arity.
    assert!(matches!(
        AigerCircuit::parse("aag 2 0 1 1 0\n4 2 6\n4\n"),
        Err(Error::Parse(_))
    ));
    // And line with the wrong arity.
    assert!(matches!(
        AigerCircuit::parse("aag 3 1 0 1 1\n2\n6\n6 2\n"),
        Err(Error::Parse(_))
    ));
    // Truncated before the output line.
    assert!(matches!(
        AigerCircuit::parse("aag 2 0 1 1 0\n4 2\n"),
        Err(Error::Parse(_))
    ));
    // Literals are nonnegative numbers.
    assert!(matches!(
        AigerCircuit::parse("aag 2 0 1 1 0\n4 -2\n4\n"),
        Err(Error::Parse(_))
    ));
}
