//! Errors surfaced by the search engine.

use crate::schema::{ConfigError, SearchPhase};

use super::individual::{ConstructionFailure, MemberId};

/// Terminal failures of a search run.
///
/// Recoverable conditions (rejected variations, oversized offspring) are
/// handled inside the engine and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Member {member} has no comparison set (population {population}, archive {archive})")]
    DegenerateScoring {
        member: MemberId,
        population: usize,
        archive: usize,
    },
    #[error("Breeding failed {attempts} consecutive times, last failure: {last}")]
    RetryLimitExceeded {
        attempts: usize,
        last: ConstructionFailure,
    },
    #[error("Distance between {a} and {b} is not finite: {value}")]
    NonFiniteDistance {
        a: MemberId,
        b: MemberId,
        value: f64,
    },
    #[error("Operation requires phase {expected:?}, engine is {actual:?}")]
    InvalidPhase {
        expected: SearchPhase,
        actual: SearchPhase,
    },
    #[error("Population is empty")]
    EmptyPopulation,
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
