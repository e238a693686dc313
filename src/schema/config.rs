//! Configuration types for novelty search runs.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration for a novelty search run.
///
/// Read once when the engine is constructed and never mutated afterwards.
/// Per-run overrides are expressed with the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoveltySearchConfig {
    /// Number of individuals in every generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Probability of applying crossover to an offspring pair (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Individuals scoring at or above this novelty enter the archive.
    #[serde(default = "default_novelty_threshold")]
    pub novelty_threshold: f64,
    /// Offspring larger than this are replaced by their parent.
    #[serde(default = "default_max_individual_size")]
    pub max_individual_size: Option<usize>,
    /// Consecutive failed breeding attempts tolerated before giving up.
    #[serde(default = "default_max_breeding_retries")]
    pub max_breeding_retries: usize,
    /// Parent selection method.
    #[serde(default)]
    pub selection: SelectionMethod,
    /// How pairwise distances are reduced to a novelty score.
    #[serde(default)]
    pub novelty: NoveltyMethod,
    /// Behavioral distance used for novelty.
    #[serde(default)]
    pub distance: DistanceKind,
    /// Resource limits.
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for NoveltySearchConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            crossover_rate: default_crossover_rate(),
            novelty_threshold: default_novelty_threshold(),
            max_individual_size: default_max_individual_size(),
            max_breeding_retries: default_max_breeding_retries(),
            selection: SelectionMethod::default(),
            novelty: NoveltyMethod::default(),
            distance: DistanceKind::default(),
            budget: BudgetConfig::default(),
            random_seed: None,
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_crossover_rate() -> f64 {
    0.75
}
fn default_novelty_threshold() -> f64 {
    0.1
}
fn default_max_individual_size() -> Option<usize> {
    Some(40)
}
fn default_max_breeding_retries() -> usize {
    1000
}

/// Selection method for choosing parents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method")]
pub enum SelectionMethod {
    /// Tournament selection with configurable size.
    Tournament {
        #[serde(default = "default_tournament_size")]
        size: usize,
    },
    /// Rank-based selection over the sorted population.
    RankBased,
    /// Roulette wheel (novelty-proportionate) selection.
    RouletteWheel,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        Self::Tournament {
            size: default_tournament_size(),
        }
    }
}

fn default_tournament_size() -> usize {
    3
}

/// Reduction of pairwise distances into a single novelty score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum NoveltyMethod {
    /// Mean distance to every other population member and archive entry.
    #[default]
    MeanDistance,
    /// Mean distance to the `k` nearest comparisons.
    KNearest {
        #[serde(default = "default_k_nearest")]
        k: usize,
    },
}

fn default_k_nearest() -> usize {
    15
}

/// Behavioral distance between two individuals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type")]
pub enum DistanceKind {
    /// Euclidean distance between behavior vectors.
    #[default]
    Euclidean,
    /// Sum of absolute differences.
    Manhattan,
    /// Number of differing positions.
    Hamming,
}

/// Resource budget. The search stops once any configured limit is reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetConfig {
    /// Maximum number of generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: Option<usize>,
    /// Maximum number of individual evaluations (novelty scorings).
    #[serde(default)]
    pub max_evaluations: Option<u64>,
    /// Wall-clock limit in seconds.
    #[serde(default)]
    pub max_time_secs: Option<f64>,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_generations: default_max_generations(),
            max_evaluations: None,
            max_time_secs: None,
        }
    }
}

fn default_max_generations() -> Option<usize> {
    Some(100)
}

impl NoveltySearchConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Override the archive threshold.
    pub fn with_novelty_threshold(mut self, threshold: f64) -> Self {
        self.novelty_threshold = threshold;
        self
    }

    /// Override the crossover probability.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Override the resource budget.
    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }

    /// Fix the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::InvalidCrossoverRate(self.crossover_rate));
        }
        if !self.novelty_threshold.is_finite() || self.novelty_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.novelty_threshold));
        }
        if self.max_individual_size == Some(0) {
            return Err(ConfigError::InvalidMaxSize);
        }
        if self.selection == (SelectionMethod::Tournament { size: 0 }) {
            return Err(ConfigError::InvalidTournamentSize);
        }
        if self.novelty == (NoveltyMethod::KNearest { k: 0 }) {
            return Err(ConfigError::InvalidNeighbourCount);
        }
        self.budget.validate()
    }
}

impl BudgetConfig {
    /// Budget limited to a number of generations only.
    pub fn generations(max_generations: usize) -> Self {
        Self {
            max_generations: Some(max_generations),
            max_evaluations: None,
            max_time_secs: None,
        }
    }

    /// Validate budget limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_generations.is_none()
            && self.max_evaluations.is_none()
            && self.max_time_secs.is_none()
        {
            return Err(ConfigError::UnboundedBudget);
        }
        if let Some(secs) = self.max_time_secs
            && (secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err())
        {
            return Err(ConfigError::InvalidTimeLimit(secs));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    #[error("Crossover rate must be within [0, 1], got {0}")]
    InvalidCrossoverRate(f64),
    #[error("Novelty threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
    #[error("Maximum individual size must be non-zero")]
    InvalidMaxSize,
    #[error("Tournament size must be non-zero")]
    InvalidTournamentSize,
    #[error("Nearest neighbour count must be non-zero")]
    InvalidNeighbourCount,
    #[error("Budget must limit generations, evaluations or time")]
    UnboundedBudget,
    #[error("Time limit must be positive and representable, got {0}")]
    InvalidTimeLimit(f64),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
