use crate::cnf::{Clause, Literal, VarId, CNF, FALSE, TRUE};
use crate::error::Error;
use log::debug;
use std::fs;
use std::iter;
use std::path::Path;

/// A latch: current-state literal and next-state function literal,
/// both already remapped to DIMACS.
#[derive(Debug, Clone, Copy)]
pub struct Latch {
    pub current: Literal,
    pub next: Literal,
}

/// An AND gate `out ↔ lhs ∧ rhs`.
#[derive(Debug, Clone, Copy)]
pub struct AndGate {
    pub out: Literal,
    pub lhs: Literal,
    pub rhs: Literal,
}

/// A sequential circuit parsed from ASCII AIGER, unrolled tick by tick
/// into CNF.
///
/// DIMACS variable 1 is reserved for the AIGER constant, and one more
/// variable per frame (the switching variable) guards clause slices
/// for incremental solving, so `maxvar` is the AIGER maximum plus two.
/// Tick `t` shifts every non-constant variable up by `t · maxvar`.
pub struct AigerCircuit {
    maxvar: VarId,
    latches: Vec<Latch>,
    output: Literal,
    and_gates: Vec<AndGate>,
    b: CNF,
}

impl AigerCircuit {
    /// Parses the ASCII format: header `aag M I L O A`, `I` input
    /// lines, `L` latch lines `current next`, a single output line and
    /// `A` AND lines `out lhs rhs`. Multiple outputs are unsupported.
    pub fn parse(text: &str) -> Result<AigerCircuit, Error> {
        let mut lines = text.lines();
        let header: Vec<&str> = next_line(&mut lines)?.split_whitespace().collect();
        if header.len() != 6 || header[0] != "aag" {
            return Err(Error::Parse("expected header `aag M I L O A`".to_string()));
        }
        let counts = header[1..]
            .iter()
            .map(|token| {
                token
                    .parse::<VarId>()
                    .ok()
                    .filter(|count| *count >= 0)
                    .ok_or_else(|| Error::Parse(format!("invalid header count `{}`", token)))
            })
            .collect::<Result<Vec<VarId>, Error>>()?;
        let (maxvar, inputs, latch_count, outputs, gates) =
            (counts[0], counts[1], counts[2], counts[3], counts[4]);
        if outputs != 1 {
            return Err(Error::Parse(format!(
                "expected a single output, got {}",
                outputs
            )));
        }
        // Inputs stay unconstrained, their lines are only consumed.
        for _ in 0..inputs {
            next_line(&mut lines)?;
        }
        let mut latches = Vec::with_capacity(latch_count as usize);
        for _ in 0..latch_count {
            match parse_fields(next_line(&mut lines)?)?.as_slice() {
                [current, next] => latches.push(Latch {
                    current: *current,
                    next: *next,
                }),
                _ => {
                    return Err(Error::Parse(
                        "expected latch line `current next`".to_string(),
                    ));
                }
            }
        }
        let output = match parse_fields(next_line(&mut lines)?)?.as_slice() {
            [output] => *output,
            _ => {
                return Err(Error::Parse(
                    "expected output line with a single literal".to_string(),
                ));
            }
        };
        let mut and_gates = Vec::with_capacity(gates as usize);
        for _ in 0..gates {
            match parse_fields(next_line(&mut lines)?)?.as_slice() {
                [out, lhs, rhs] => and_gates.push(AndGate {
                    out: *out,
                    lhs: *lhs,
                    rhs: *rhs,
                }),
                _ => {
                    return Err(Error::Parse("expected and line `out lhs rhs`".to_string()));
                }
            }
        }
        debug!(
            "parsed aiger circuit: maxvar {}, {} latches, {} and gates",
            maxvar + 2,
            latches.len(),
            and_gates.len()
        );
        Ok(AigerCircuit {
            maxvar: maxvar + 2,
            latches,
            output,
            and_gates,
            b: CNF::new(None),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<AigerCircuit, Error> {
        AigerCircuit::parse(&fs::read_to_string(path)?)
    }

    /// The circuit maximum plus room for the constant and the
    /// switching variable.
    #[inline]
    pub fn maxvar(&self) -> VarId {
        self.maxvar
    }

    /// The per-tick assumption variable; shifting spreads it as
    /// `maxvar · (tick + 1)` across the variable space.
    #[inline]
    pub fn switching_variable(&self) -> VarId {
        self.maxvar
    }

    #[inline]
    pub fn output(&self) -> Literal {
        self.output
    }

    #[inline]
    pub fn latches(&self) -> &[Latch] {
        &self.latches
    }

    #[inline]
    pub fn and_gates(&self) -> &[AndGate] {
        &self.and_gates
    }

    /// Shifts a literal to a tick, preserving polarity; the constants
    /// are fixpoints.
    pub fn literal_at(&self, literal: Literal, tick: usize) -> Literal {
        if literal.is_true() || literal.is_false() {
            return literal;
        }
        let variable_at_0 = (literal.variable() - 1) % self.maxvar + 1;
        let variable_at_tick = variable_at_0 + tick as VarId * self.maxvar;
        Literal::new(literal.polarity() * variable_at_tick)
    }

    /// Three clauses per AND gate enforcing `out ↔ lhs ∧ rhs` at the
    /// given tick.
    pub fn clauses_gates(&self, tick: usize) -> CNF {
        let mut clauses = Vec::with_capacity(3 * self.and_gates.len());
        for gate in &self.and_gates {
            let out = self.literal_at(gate.out, tick);
            let lhs = self.literal_at(gate.lhs, tick);
            let rhs = self.literal_at(gate.rhs, tick);
            clauses.push(Clause::new(vec![-out, lhs]));
            clauses.push(Clause::new(vec![-out, rhs]));
            clauses.push(Clause::new(vec![out, -lhs, -rhs]));
        }
        CNF::new(clauses)
    }

    /// Latch semantics: every latch starts out false, and from tick 1
    /// on the current state equals the previous next-state function.
    pub fn clauses_latches(&self, tick: usize) -> CNF {
        if tick == 0 {
            return self
                .latches
                .iter()
                .map(|latch| Clause::unit(-latch.current))
                .collect();
        }
        let mut clauses = Vec::with_capacity(2 * self.latches.len());
        for latch in &self.latches {
            let current = self.literal_at(latch.current, tick);
            let next = self.literal_at(latch.next, tick - 1);
            clauses.push(Clause::new(vec![-current, next]));
            clauses.push(Clause::new(vec![current, -next]));
        }
        CNF::new(clauses)
    }

    /// Gates and latches of one tick. Ticks beyond the first
    /// transition also accumulate into the unrolled tail kept for
    /// interpolant construction, see [`AigerCircuit::unrolled`].
    pub fn clauses_system(&mut self, tick: usize) -> CNF {
        let clauses = self.clauses_gates(tick).and(&self.clauses_latches(tick));
        if tick > 1 {
            self.b = self.b.and(&clauses);
        }
        clauses
    }

    /// The bad-state literal at a tick, as a unit clause.
    pub fn clause_output(&self, tick: usize) -> Clause {
        Clause::unit(self.literal_at(self.output, tick))
    }

    /// The system unrolled beyond tick 1 so far.
    #[inline]
    pub fn unrolled(&self) -> &CNF {
        &self.b
    }

    /// Shifts a whole CNF to a tick.
    pub fn cnf_at_tick(&self, cnf: &CNF, tick: usize) -> CNF {
        cnf.iter()
            .map(|clause| {
                Clause::new(
                    clause
                        .iter()
                        .map(|literal| self.literal_at(*literal, tick)),
                )
            })
            .collect()
    }

    /// Guards every clause with the tick's switching literal: asserting
    /// the switch satisfies the slice and takes it out of force,
    /// negating the switch puts the slice back in force.
    pub fn apply_switch(&self, cnf: &CNF, tick: usize) -> CNF {
        cnf.or(&CNF::new(iter::once(Clause::unit(self.switch_at(tick)))))
    }

    /// Assumption literals for an incremental call at a tick: the
    /// switches of all earlier ticks asserted, the current one negated.
    pub fn assumptions(&self, tick: usize) -> Vec<Literal> {
        (0..tick)
            .map(|earlier| self.switch_at(earlier))
            .chain(iter::once(-self.switch_at(tick)))
            .collect()
    }

    fn switch_at(&self, tick: usize) -> Literal {
        Literal::new(self.switching_variable() * (tick as VarId + 1))
    }
}

fn next_line<'a>(lines: &mut std::str::Lines<'a>) -> Result<&'a str, Error> {
    lines
        .next()
        .ok_or_else(|| Error::Parse("unexpected end of aiger input".to_string()))
}

fn parse_fields(line: &str) -> Result<Vec<Literal>, Error> {
    line.split_whitespace().map(remap).collect()
}

/// Remaps an AIGER literal to DIMACS: the constants 0/1 become ∓1, and
/// variable n with its sign in the low bit shifts up by one to leave
/// room for the constant.
fn remap(token: &str) -> Result<Literal, Error> {
    let number: VarId = token
        .parse()
        .map_err(|_| Error::Parse(format!("invalid aiger literal `{}`", token)))?;
    if number < 0 {
        return Err(Error::Parse(format!(
            "negative aiger literal `{}`",
            token
        )));
    }
    Ok(match number {
        0 => FALSE,
        1 => TRUE,
        n if n % 2 == 0 => Literal::new(n / 2 + 1),
        n => Literal::new(-(n / 2) - 1),
    })
}
