//! Observers notified as the search progresses.

use log::{debug, info};

use super::individual::Member;

/// Read-only view of the engine handed to listeners.
#[derive(Debug)]
pub struct GenerationView<'a, I> {
    /// Current generation index.
    pub generation: usize,
    /// Current population, sorted by novelty once scored.
    pub population: &'a [Member<I>],
    /// Current archive size.
    pub archive_size: usize,
}

/// Receives search lifecycle notifications. All methods default to no-ops.
pub trait SearchListener<I>: Send {
    fn search_started(&mut self, _view: &GenerationView<'_, I>) {}

    fn generation_started(&mut self, _view: &GenerationView<'_, I>) {}

    fn generation_finished(&mut self, _view: &GenerationView<'_, I>) {}

    /// Called before each offspring of `generation` is mutated.
    fn before_mutation(&mut self, _generation: usize, _offspring: &I) {}

    fn search_finished(&mut self, _view: &GenerationView<'_, I>) {}
}

/// Logs lifecycle events through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl<I> SearchListener<I> for LoggingListener {
    fn search_started(&mut self, view: &GenerationView<'_, I>) {
        info!(
            "Novelty search started with {} individuals",
            view.population.len()
        );
    }

    fn generation_finished(&mut self, view: &GenerationView<'_, I>) {
        let best = view.population.first().map_or(0.0, |m| m.novelty());
        debug!(
            "Generation {}: best novelty {:.4}, archive size {}",
            view.generation, best, view.archive_size
        );
    }

    fn search_finished(&mut self, view: &GenerationView<'_, I>) {
        info!(
            "Novelty search finished at generation {} with archive size {}",
            view.generation, view.archive_size
        );
    }
}
