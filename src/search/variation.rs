//! Crossover strategies.
//!
//! Mutation belongs to the individual itself; crossover is pluggable
//! because it depends on how two representations can be recombined.

use super::individual::ConstructionFailure;
use super::rng::SearchRng;

/// Recombines two offspring in place.
pub trait VariationStrategy<I>: Send + Sync {
    fn crossover(
        &self,
        a: &mut I,
        b: &mut I,
        rng: &mut SearchRng,
    ) -> Result<(), ConstructionFailure>;
}

impl<I, F> VariationStrategy<I> for F
where
    F: Fn(&mut I, &mut I, &mut SearchRng) -> Result<(), ConstructionFailure> + Send + Sync,
{
    fn crossover(
        &self,
        a: &mut I,
        b: &mut I,
        rng: &mut SearchRng,
    ) -> Result<(), ConstructionFailure> {
        self(a, b, rng)
    }
}

/// Leaves both offspring untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCrossover;

impl<I> VariationStrategy<I> for NoCrossover {
    fn crossover(
        &self,
        _: &mut I,
        _: &mut I,
        _: &mut SearchRng,
    ) -> Result<(), ConstructionFailure> {
        Ok(())
    }
}
