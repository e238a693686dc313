//! Novelty scoring against the population and archive.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::schema::NoveltyMethod;

use super::archive::NoveltyArchive;
use super::distance::DistanceMetric;
use super::error::SearchError;
use super::individual::Member;

/// Turns pairwise distances into one novelty score per individual.
pub struct NoveltyScorer<I> {
    metric: Box<dyn DistanceMetric<I>>,
    method: NoveltyMethod,
}

impl<I> NoveltyScorer<I> {
    pub fn new(metric: Box<dyn DistanceMetric<I>>, method: NoveltyMethod) -> Self {
        Self { metric, method }
    }

    pub fn method(&self) -> &NoveltyMethod {
        &self.method
    }

    /// Novelty of `member` relative to `population` and `archive`.
    ///
    /// Entries sharing the member's handle are skipped in both sets. The
    /// score is the mean over the comparisons actually made; an empty
    /// comparison set is an error rather than a NaN.
    pub fn novelty(
        &self,
        member: &Member<I>,
        population: &[Member<I>],
        archive: &NoveltyArchive<I>,
    ) -> Result<f64, SearchError> {
        let others = population
            .iter()
            .chain(archive.iter())
            .filter(|other| other.id() != member.id());

        let (sum, count) = match self.method {
            NoveltyMethod::MeanDistance => {
                let mut sum = 0.0;
                let mut count = 0usize;
                for other in others {
                    sum += self.checked_distance(member, other)?;
                    count += 1;
                }
                (sum, count)
            }
            NoveltyMethod::KNearest { k } => {
                let mut distances = others
                    .map(|other| self.checked_distance(member, other))
                    .collect::<Result<Vec<f64>, SearchError>>()?;
                distances.sort_by(f64::total_cmp);
                distances.truncate(k.max(1));
                (distances.iter().sum(), distances.len())
            }
        };

        if count == 0 {
            return Err(SearchError::DegenerateScoring {
                member: member.id(),
                population: population.len(),
                archive: archive.len(),
            });
        }

        Ok(sum / count as f64)
    }

    fn checked_distance(&self, a: &Member<I>, b: &Member<I>) -> Result<f64, SearchError> {
        let value = self.metric.distance(a.individual(), b.individual());
        if value.is_finite() {
            Ok(value)
        } else {
            Err(SearchError::NonFiniteDistance {
                a: a.id(),
                b: b.id(),
                value,
            })
        }
    }
}

impl<I: Send + Sync> NoveltyScorer<I> {
    /// Score every population member against the same snapshot.
    ///
    /// Neither the population nor the archive changes during the pass, so
    /// the result is independent of evaluation order.
    #[cfg(feature = "parallel")]
    pub fn score_population(
        &self,
        population: &[Member<I>],
        archive: &NoveltyArchive<I>,
    ) -> Result<Vec<f64>, SearchError> {
        population
            .par_iter()
            .map(|member| self.novelty(member, population, archive))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn score_population(
        &self,
        population: &[Member<I>],
        archive: &NoveltyArchive<I>,
    ) -> Result<Vec<f64>, SearchError> {
        population
            .iter()
            .map(|member| self.novelty(member, population, archive))
            .collect()
    }
}
