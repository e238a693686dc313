//! Behavioral distance metrics.

use crate::schema::DistanceKind;

/// Pairwise dissimilarity between two individuals.
///
/// Implementations must be symmetric and non-negative. The triangle
/// inequality is not required.
pub trait DistanceMetric<I>: Send + Sync {
    fn distance(&self, a: &I, b: &I) -> f64;
}

impl<I, F> DistanceMetric<I> for F
where
    F: Fn(&I, &I) -> f64 + Send + Sync,
{
    fn distance(&self, a: &I, b: &I) -> f64 {
        self(a, b)
    }
}

/// Individuals that expose a numeric behavior descriptor.
pub trait Behavior {
    fn behavior(&self) -> &[f64];
}

/// Euclidean distance between behavior vectors.
///
/// Missing trailing components of the shorter vector count as zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

/// Sum of absolute component differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

/// Number of positions whose values differ, plus the length difference.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming;

const HAMMING_TOLERANCE: f64 = 1e-9;

impl<I: Behavior> DistanceMetric<I> for Euclidean {
    fn distance(&self, a: &I, b: &I) -> f64 {
        padded_pairs(a.behavior(), b.behavior())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

impl<I: Behavior> DistanceMetric<I> for Manhattan {
    fn distance(&self, a: &I, b: &I) -> f64 {
        padded_pairs(a.behavior(), b.behavior())
            .map(|(x, y)| (x - y).abs())
            .sum()
    }
}

impl<I: Behavior> DistanceMetric<I> for Hamming {
    fn distance(&self, a: &I, b: &I) -> f64 {
        let (a, b) = (a.behavior(), b.behavior());
        let mismatched = a
            .iter()
            .zip(b)
            .filter(|(x, y)| (*x - *y).abs() > HAMMING_TOLERANCE)
            .count();
        (mismatched + a.len().abs_diff(b.len())) as f64
    }
}

/// Zip two vectors, padding the shorter one with zeros.
fn padded_pairs<'a>(a: &'a [f64], b: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    let len = a.len().max(b.len());
    (0..len).map(move |i| {
        (
            a.get(i).copied().unwrap_or(0.0),
            b.get(i).copied().unwrap_or(0.0),
        )
    })
}

impl DistanceKind {
    /// Build the metric selected in configuration.
    pub fn build<I: Behavior + 'static>(self) -> Box<dyn DistanceMetric<I>> {
        match self {
            DistanceKind::Euclidean => Box::new(Euclidean),
            DistanceKind::Manhattan => Box::new(Manhattan),
            DistanceKind::Hamming => Box::new(Hamming),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point(Vec<f64>);

    impl Behavior for Point {
        fn behavior(&self) -> &[f64] {
            &self.0
        }
    }

    #[test]
    fn test_euclidean() {
        let a = Point(vec![0.0, 0.0]);
        let b = Point(vec![3.0, 4.0]);
        assert!((Euclidean.distance(&a, &b) - 5.0).abs() < 1e-12);
        assert!((Euclidean.distance(&b, &a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_manhattan_pads_shorter_vector() {
        let a = Point(vec![1.0]);
        let b = Point(vec![2.0, -3.0]);
        assert!((Manhattan.distance(&a, &b) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_hamming() {
        let a = Point(vec![1.0, 0.0, 1.0]);
        let b = Point(vec![1.0, 1.0, 1.0, 0.0]);
        assert_eq!(Hamming.distance(&a, &b), 2.0);
    }

    #[test]
    fn test_zero_for_same_behavior() {
        let a = Point(vec![0.25, 0.5]);
        let b = Point(vec![0.25, 0.5]);
        for kind in [DistanceKind::Euclidean, DistanceKind::Manhattan, DistanceKind::Hamming] {
            assert_eq!(kind.build::<Point>().distance(&a, &b), 0.0);
        }
    }

    #[test]
    fn test_closure_metric() {
        let metric = |a: &i32, b: &i32| (a - b).abs() as f64;
        assert_eq!(DistanceMetric::distance(&metric, &2, &7), 5.0);
    }
}
