//! Reference individual: a variable-length real-valued genome.
//!
//! Provides random generation, crossover, and mutation operations.

use serde::{Deserialize, Serialize};

use super::distance::Behavior;
use super::individual::{ConstructionFailure, Individual};
use super::rng::SearchRng;
use super::variation::VariationStrategy;

/// Probability of inserting a gene during mutation.
const INSERTION_PROBABILITY: f64 = 0.1;
/// Probability of removing a gene during mutation.
const REMOVAL_PROBABILITY: f64 = 0.1;
/// Default Gaussian mutation strength, relative to the bounds width.
const DEFAULT_STRENGTH: f64 = 0.1;

/// Genes within fixed bounds. The genes double as the behavior descriptor.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorGenome {
    genes: Vec<f64>,
    bounds: (f64, f64),
    strength: f64,
    age: usize,
    #[serde(skip)]
    changed: bool,
}

impl Clone for VectorGenome {
    /// Fresh copy with the change flag cleared.
    fn clone(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            bounds: self.bounds,
            strength: self.strength,
            age: self.age,
            changed: false,
        }
    }
}

impl VectorGenome {
    /// Create from explicit genes, clamped into `bounds`.
    pub fn new(genes: Vec<f64>, bounds: (f64, f64)) -> Self {
        let genes = genes
            .into_iter()
            .map(|g| g.clamp(bounds.0, bounds.1))
            .collect();
        Self {
            genes,
            bounds,
            strength: DEFAULT_STRENGTH,
            age: 0,
            changed: true,
        }
    }

    /// Generate a random genome of `len` genes.
    pub fn random(rng: &mut SearchRng, len: usize, bounds: (f64, f64)) -> Self {
        let genes = (0..len).map(|_| rng.uniform(bounds)).collect();
        Self::new(genes, bounds)
    }

    /// Set the Gaussian mutation strength.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }

    /// Generation this genome last changed in.
    pub fn age(&self) -> usize {
        self.age
    }
}

impl Individual for VectorGenome {
    fn mutate(&mut self, rng: &mut SearchRng) -> Result<(), ConstructionFailure> {
        if self.genes.is_empty() {
            return Err(ConstructionFailure::new("cannot mutate an empty genome"));
        }

        let rate = 1.0 / self.genes.len() as f64;
        for gene in self.genes.iter_mut() {
            if rng.chance(rate) {
                *gene = rng.gaussian_mutate(*gene, self.strength, self.bounds);
                self.changed = true;
            }
        }

        // Occasionally add or remove a gene
        if rng.chance(INSERTION_PROBABILITY) {
            let idx = rng.index(self.genes.len() + 1);
            let gene = rng.uniform(self.bounds);
            self.genes.insert(idx, gene);
            self.changed = true;
        }
        if self.genes.len() > 1 && rng.chance(REMOVAL_PROBABILITY) {
            let idx = rng.index(self.genes.len());
            self.genes.remove(idx);
            self.changed = true;
        }

        Ok(())
    }

    fn is_changed(&self) -> bool {
        self.changed
    }

    fn update_age(&mut self, generation: usize) {
        self.age = generation;
    }

    fn size(&self) -> usize {
        self.genes.len()
    }
}

impl Behavior for VectorGenome {
    fn behavior(&self) -> &[f64] {
        &self.genes
    }
}

/// Swaps tails at the same relative position in both parents.
///
/// Lengths of the offspring may differ from their parents'.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePointCrossover;

impl VariationStrategy<VectorGenome> for SinglePointCrossover {
    fn crossover(
        &self,
        a: &mut VectorGenome,
        b: &mut VectorGenome,
        rng: &mut SearchRng,
    ) -> Result<(), ConstructionFailure> {
        if a.genes.len() < 2 || b.genes.len() < 2 {
            return Err(ConstructionFailure::new(
                "single-point crossover needs at least two genes per parent",
            ));
        }

        let split = rng.next_f64();
        let point_a = cut_point(a.genes.len(), split);
        let point_b = cut_point(b.genes.len(), split);

        let tail_a = a.genes.split_off(point_a);
        let tail_b = b.genes.split_off(point_b);
        a.genes.extend(tail_b);
        b.genes.extend(tail_a);
        a.changed = true;
        b.changed = true;
        Ok(())
    }
}

/// Cut strictly inside the genome so both sides keep at least one gene.
fn cut_point(len: usize, split: f64) -> usize {
    ((split * len as f64).round() as usize).clamp(1, len - 1)
}

/// Swaps aligned genes with probability one half.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCrossover;

impl VariationStrategy<VectorGenome> for UniformCrossover {
    fn crossover(
        &self,
        a: &mut VectorGenome,
        b: &mut VectorGenome,
        rng: &mut SearchRng,
    ) -> Result<(), ConstructionFailure> {
        for (x, y) in a.genes.iter_mut().zip(b.genes.iter_mut()) {
            if rng.chance(0.5) {
                std::mem::swap(x, y);
                a.changed = true;
                b.changed = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_genome() {
        let mut rng = SearchRng::new(42);
        let genome = VectorGenome::random(&mut rng, 8, (-1.0, 1.0));

        assert_eq!(genome.size(), 8);
        assert!(genome.genes().iter().all(|g| (-1.0..=1.0).contains(g)));
    }

    #[test]
    fn test_clone_clears_change_flag() {
        let genome = VectorGenome::new(vec![0.1, 0.2], (0.0, 1.0));
        assert!(genome.is_changed());

        let copy = genome.clone();
        assert!(!copy.is_changed());
        assert_eq!(copy.genes(), genome.genes());
    }

    #[test]
    fn test_mutation_stays_in_bounds() {
        let mut rng = SearchRng::new(42);
        let mut genome = VectorGenome::random(&mut rng, 6, (0.0, 1.0)).with_strength(2.0);

        for _ in 0..200 {
            genome.mutate(&mut rng).unwrap();
            assert!(genome.size() >= 1);
            assert!(genome.genes().iter().all(|g| (0.0..=1.0).contains(g)));
        }
    }

    #[test]
    fn test_empty_genome_mutation_fails() {
        let mut genome = VectorGenome::new(Vec::new(), (0.0, 1.0));
        assert!(genome.mutate(&mut SearchRng::new(1)).is_err());
    }

    #[test]
    fn test_single_point_preserves_genes() {
        let mut rng = SearchRng::new(9);
        let mut a = VectorGenome::new(vec![0.1, 0.2, 0.3, 0.4], (0.0, 1.0)).clone();
        let mut b = VectorGenome::new(vec![0.5, 0.6, 0.7], (0.0, 1.0)).clone();

        SinglePointCrossover.crossover(&mut a, &mut b, &mut rng).unwrap();

        assert_eq!(a.size() + b.size(), 7);
        assert!(a.is_changed() && b.is_changed());
        let mut all: Vec<f64> = a.genes().iter().chain(b.genes()).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        // Heads are kept in place.
        assert_eq!(a.genes()[0], 0.1);
        assert_eq!(b.genes()[0], 0.5);
    }

    #[test]
    fn test_single_point_rejects_short_parents() {
        let mut a = VectorGenome::new(vec![0.1], (0.0, 1.0));
        let mut b = VectorGenome::new(vec![0.5, 0.6], (0.0, 1.0));
        let result = SinglePointCrossover.crossover(&mut a, &mut b, &mut SearchRng::new(0));
        assert!(result.is_err());
    }

    #[test]
    fn test_uniform_crossover_keeps_positions() {
        let mut rng = SearchRng::new(5);
        let mut a = VectorGenome::new(vec![0.0; 16], (0.0, 1.0));
        let mut b = VectorGenome::new(vec![1.0; 16], (0.0, 1.0));

        UniformCrossover.crossover(&mut a, &mut b, &mut rng).unwrap();

        for (x, y) in a.genes().iter().zip(b.genes()) {
            assert_eq!(x + y, 1.0);
        }
    }
}
