//! Resource budget and stopping conditions.

use std::time::Duration;

use crate::schema::{BudgetConfig, ConfigError, StopReason};

/// Resources consumed so far, as seen at a generation boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetUsage {
    /// Completed generations.
    pub generation: usize,
    /// Individual evaluations performed.
    pub evaluations: u64,
    /// Wall-clock time since the search started.
    pub elapsed: Duration,
}

/// Decides whether the search should stop.
///
/// Consulted only between generations.
pub trait StoppingCondition: Send + Sync {
    fn is_finished(&self, usage: &BudgetUsage) -> bool;

    /// Reported when this condition ends the search.
    fn reason(&self) -> StopReason;
}

/// Stop after a fixed number of generations.
#[derive(Debug, Clone, Copy)]
pub struct MaxGenerations(pub usize);

/// Stop after a fixed number of evaluations.
#[derive(Debug, Clone, Copy)]
pub struct MaxEvaluations(pub u64);

/// Stop once the wall-clock budget is spent.
#[derive(Debug, Clone, Copy)]
pub struct MaxTime(pub Duration);

impl StoppingCondition for MaxGenerations {
    fn is_finished(&self, usage: &BudgetUsage) -> bool {
        usage.generation >= self.0
    }

    fn reason(&self) -> StopReason {
        StopReason::MaxGenerations
    }
}

impl StoppingCondition for MaxEvaluations {
    fn is_finished(&self, usage: &BudgetUsage) -> bool {
        usage.evaluations >= self.0
    }

    fn reason(&self) -> StopReason {
        StopReason::MaxEvaluations
    }
}

impl StoppingCondition for MaxTime {
    fn is_finished(&self, usage: &BudgetUsage) -> bool {
        usage.elapsed >= self.0
    }

    fn reason(&self) -> StopReason {
        StopReason::MaxTime
    }
}

/// A set of stopping conditions; exhausted once any of them is.
#[derive(Default)]
pub struct Budget {
    conditions: Vec<Box<dyn StoppingCondition>>,
}

impl Budget {
    /// Build the limits named in configuration.
    pub fn from_config(config: &BudgetConfig) -> Result<Self, ConfigError> {
        let mut budget = Self::default();
        if let Some(generations) = config.max_generations {
            budget.push(Box::new(MaxGenerations(generations)));
        }
        if let Some(evaluations) = config.max_evaluations {
            budget.push(Box::new(MaxEvaluations(evaluations)));
        }
        if let Some(secs) = config.max_time_secs {
            let limit =
                Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeLimit(secs))?;
            budget.push(Box::new(MaxTime(limit)));
        }
        Ok(budget)
    }

    /// Add a stopping condition.
    pub fn push(&mut self, condition: Box<dyn StoppingCondition>) {
        self.conditions.push(condition);
    }

    /// First condition that reports exhaustion, in insertion order.
    pub fn exhausted(&self, usage: &BudgetUsage) -> Option<StopReason> {
        self.conditions
            .iter()
            .find(|c| c.is_finished(usage))
            .map(|c| c.reason())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
