//! Progress and result types reported while a search runs.

use serde::{Deserialize, Serialize};

/// Lifecycle of a search engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No population has been sampled yet.
    #[default]
    Uninitialized,
    /// Population sampled but not yet scored.
    PopulationReady,
    /// A new generation has been bred; its scores are stale.
    Evolving,
    /// Population scored and sorted by novelty.
    Scored,
    /// Budget exhausted, search finished.
    Terminated,
}

/// Progress update emitted once per generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Current generation number.
    pub generation: usize,
    /// Individual evaluations performed so far.
    pub evaluations: u64,
    /// Current population size.
    pub population_size: usize,
    /// Current archive size.
    pub archive_size: usize,
    /// Novelty of the top-ranked individual.
    pub best_novelty: f64,
    /// Mean novelty of the current population.
    pub mean_novelty: f64,
    /// Top N members for display.
    pub top_members: Vec<MemberSummary>,
    /// Current phase of the engine.
    pub phase: SearchPhase,
}

/// Compact description of a population member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberSummary {
    /// Identity handle.
    pub id: u64,
    /// Novelty at the last scoring pass.
    pub novelty: f64,
    /// Size reported by the individual.
    pub size: usize,
}

/// Per-generation statistics for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchHistory {
    /// Best novelty per generation.
    pub best_novelty: Vec<f64>,
    /// Mean novelty per generation.
    pub mean_novelty: Vec<f64>,
    /// Standard deviation of novelty per generation.
    pub novelty_std: Vec<f64>,
    /// Archive size after each scoring pass.
    pub archive_size: Vec<usize>,
}

impl SearchHistory {
    /// Record one scoring pass.
    pub fn record(&mut self, scores: &[f64], archive_size: usize) {
        let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let variance = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / scores.len() as f64
        };

        self.best_novelty.push(best);
        self.mean_novelty.push(mean);
        self.novelty_std.push(variance.sqrt());
        self.archive_size.push(archive_size);
    }

    /// Number of recorded scoring passes.
    pub fn len(&self) -> usize {
        self.best_novelty.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.best_novelty.is_empty()
    }
}

/// Statistics from a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total generations run.
    pub generations: usize,
    /// Total individual evaluations.
    pub total_evaluations: u64,
    /// Final archive size.
    pub archive_size: usize,
    /// Novelty of the final best individual.
    pub best_novelty: f64,
    /// Mean novelty of the final population.
    pub final_mean_novelty: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason a search stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Reached maximum generations.
    MaxGenerations,
    /// Reached maximum evaluations.
    MaxEvaluations,
    /// Wall-clock budget spent.
    MaxTime,
    /// User cancelled.
    Cancelled,
    /// A user-supplied stopping condition fired.
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_record() {
        let mut history = SearchHistory::default();
        history.record(&[3.0, 1.0, 2.0], 4);
        history.record(&[1.0, 1.0], 5);

        assert_eq!(history.len(), 2);
        assert_eq!(history.best_novelty, vec![3.0, 1.0]);
        assert!((history.mean_novelty[0] - 2.0).abs() < 1e-12);
        assert!(history.novelty_std[1].abs() < 1e-12);
        assert_eq!(history.archive_size, vec![4, 5]);
    }

    #[test]
    fn test_stop_reason_serialization() {
        let json = serde_json::to_string(&StopReason::Custom("plateau".into())).unwrap();
        let parsed: StopReason = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, StopReason::Custom("plateau".into()));
    }
}
