use thiserror::Error as ThisError;

/// Crate-wide error kinds.
///
/// Malformed input and API misuse are distinct so that callers can tell
/// a broken file from a broken call site; an unexpectedly satisfiable
/// formula gets its own kind because it is an answer, not a fault, and
/// callers typically react to it (e.g. by extracting a counterexample).
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("malformed input: {0}")]
    Parse(String),
    #[error("contract violation: {0}")]
    Contract(String),
    #[error("formula is satisfiable")]
    Satisfiable,
    #[error("solver failure: {0}")]
    Solver(String),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}
