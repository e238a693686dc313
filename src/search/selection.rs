//! Parent selection strategies.

use crate::schema::SelectionMethod;

use super::individual::Member;
use super::rng::SearchRng;

/// Chooses a parent from the current population.
///
/// Returns an index into `population`, which is never empty and is sorted
/// by descending novelty. Selection is with replacement.
pub trait SelectionStrategy<I>: Send + Sync {
    fn select(&self, population: &[Member<I>], rng: &mut SearchRng) -> usize;
}

/// Tournament selection: best novelty out of `size` uniform draws.
#[derive(Debug, Clone, Copy)]
pub struct Tournament {
    pub size: usize,
}

/// Linear rank selection: the top-ranked member is `n` times as likely as
/// the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankBased;

/// Novelty-proportionate selection. Falls back to uniform when every
/// score is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouletteWheel;

impl<I> SelectionStrategy<I> for Tournament {
    fn select(&self, population: &[Member<I>], rng: &mut SearchRng) -> usize {
        let mut best_idx = rng.index(population.len());
        for _ in 1..self.size.max(1) {
            let idx = rng.index(population.len());
            if population[idx].novelty() > population[best_idx].novelty() {
                best_idx = idx;
            }
        }
        best_idx
    }
}

impl<I> SelectionStrategy<I> for RankBased {
    fn select(&self, population: &[Member<I>], rng: &mut SearchRng) -> usize {
        let n = population.len();
        let total_rank = n * (n + 1) / 2;
        let mut target = rng.index(total_rank);
        for i in 0..n {
            let rank = n - i;
            if target < rank {
                return i;
            }
            target -= rank;
        }
        0
    }
}

impl<I> SelectionStrategy<I> for RouletteWheel {
    fn select(&self, population: &[Member<I>], rng: &mut SearchRng) -> usize {
        let total: f64 = population.iter().map(|m| m.novelty().max(0.0)).sum();
        if total <= 0.0 {
            return rng.index(population.len());
        }

        let target = rng.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, member) in population.iter().enumerate() {
            cumulative += member.novelty().max(0.0);
            if cumulative > target {
                return i;
            }
        }
        population.len() - 1
    }
}

impl SelectionMethod {
    /// Build the strategy selected in configuration.
    pub fn build<I: 'static>(&self) -> Box<dyn SelectionStrategy<I>> {
        match self {
            SelectionMethod::Tournament { size } => Box::new(Tournament { size: *size }),
            SelectionMethod::RankBased => Box::new(RankBased),
            SelectionMethod::RouletteWheel => Box::new(RouletteWheel),
        }
    }
}
