//! Contract for candidate solutions evolved by the engine.
//!
//! The engine never looks inside an individual. It clones, mutates and ages
//! it, asks for its size, and tracks its identity through a [`MemberId`]
//! handle rather than through value equality.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::rng::SearchRng;

/// Raised when a variation cannot be legally applied to an individual.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("construction failed: {reason}")]
pub struct ConstructionFailure {
    /// Why the variation was rejected.
    pub reason: String,
}

impl ConstructionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A candidate solution.
///
/// `Clone` must produce a deep, independent copy.
pub trait Individual: Clone + Send + Sync {
    /// Mutate in place. May reject the mutation.
    fn mutate(&mut self, rng: &mut SearchRng) -> Result<(), ConstructionFailure>;

    /// Whether the last variation actually changed this individual.
    fn is_changed(&self) -> bool;

    /// Record the generation this individual was (re)born in.
    fn update_age(&mut self, generation: usize);

    /// Size used for the maximum-size bound.
    fn size(&self) -> usize;
}

/// Produces the initial population.
pub trait IndividualFactory<I>: Send {
    fn create(&mut self, rng: &mut SearchRng) -> I;
}

impl<I, F> IndividualFactory<I> for F
where
    F: FnMut(&mut SearchRng) -> I + Send,
{
    fn create(&mut self, rng: &mut SearchRng) -> I {
        self(rng)
    }
}

/// Stable identity handle of a population member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(u64);

impl MemberId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An individual together with its identity and latest novelty score.
#[derive(Debug, Clone)]
pub struct Member<I> {
    id: MemberId,
    individual: I,
    novelty: f64,
}

impl<I> Member<I> {
    /// Wrap an individual under the given handle, unscored.
    pub fn new(id: MemberId, individual: I) -> Self {
        Self {
            id,
            individual,
            novelty: 0.0,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn individual(&self) -> &I {
        &self.individual
    }

    /// Novelty from the most recent scoring pass.
    pub fn novelty(&self) -> f64 {
        self.novelty
    }

    pub fn into_individual(self) -> I {
        self.individual
    }

    pub(crate) fn set_novelty(&mut self, novelty: f64) {
        self.novelty = novelty;
    }
}
