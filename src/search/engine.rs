//! Generational novelty search engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::schema::{
    MemberSummary, NoveltySearchConfig, SearchHistory, SearchPhase, SearchProgress, SearchStats,
    StopReason,
};

use super::archive::NoveltyArchive;
use super::budget::{Budget, BudgetUsage, StoppingCondition};
use super::distance::{Behavior, DistanceMetric};
use super::error::SearchError;
use super::individual::{ConstructionFailure, Individual, IndividualFactory, Member, MemberId};
use super::listener::{GenerationView, SearchListener};
use super::novelty::NoveltyScorer;
use super::rng::SearchRng;
use super::selection::SelectionStrategy;
use super::variation::VariationStrategy;

/// Members reported in progress updates.
const PROGRESS_TOP_N: usize = 5;

/// Final result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult<I> {
    /// Top-ranked member of the final population.
    pub best: Member<I>,
    /// Archive contents in insertion order.
    pub archive: Vec<Member<I>>,
    /// Statistics from the run.
    pub stats: SearchStats,
    /// Full history for analysis.
    pub history: SearchHistory,
}

#[derive(Debug, Clone, Copy)]
enum Notification {
    SearchStarted,
    GenerationStarted,
    GenerationFinished,
    SearchFinished,
}

/// Novelty search engine that owns the population and archive of one run.
pub struct NoveltySearch<I: Individual + 'static> {
    config: NoveltySearchConfig,
    rng: SearchRng,
    factory: Box<dyn IndividualFactory<I>>,
    selection: Box<dyn SelectionStrategy<I>>,
    variation: Box<dyn VariationStrategy<I>>,
    scorer: NoveltyScorer<I>,
    budget: Budget,
    listeners: Vec<Box<dyn SearchListener<I>>>,
    population: Vec<Member<I>>,
    archive: NoveltyArchive<I>,
    history: SearchHistory,
    phase: SearchPhase,
    generation: usize,
    evaluations: u64,
    next_id: u64,
    started: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl<I: Individual + Behavior + 'static> NoveltySearch<I> {
    /// Create an engine whose distance metric is chosen by configuration.
    pub fn from_config<F>(
        config: NoveltySearchConfig,
        factory: F,
        variation: Box<dyn VariationStrategy<I>>,
    ) -> Result<Self, SearchError>
    where
        F: IndividualFactory<I> + 'static,
    {
        let distance = config.distance.build();
        Self::new(config, factory, distance, variation)
    }
}

impl<I: Individual + 'static> NoveltySearch<I> {
    /// Create a new engine with an explicit distance metric.
    ///
    /// `distance` replaces the metric named by `config.distance`, which is
    /// not consulted here. Use [`Self::from_config`] when individuals expose a
    /// [`Behavior`]. Fails if the configuration is invalid.
    pub fn new<F>(
        config: NoveltySearchConfig,
        factory: F,
        distance: Box<dyn DistanceMetric<I>>,
        variation: Box<dyn VariationStrategy<I>>,
    ) -> Result<Self, SearchError>
    where
        F: IndividualFactory<I> + 'static,
    {
        config.validate()?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let selection = config.selection.build();
        let scorer = NoveltyScorer::new(distance, config.novelty.clone());
        let budget = Budget::from_config(&config.budget)?;

        Ok(Self {
            config,
            rng: SearchRng::new(seed),
            factory: Box::new(factory),
            selection,
            variation,
            scorer,
            budget,
            listeners: Vec::new(),
            population: Vec::new(),
            archive: NoveltyArchive::new(),
            history: SearchHistory::default(),
            phase: SearchPhase::Uninitialized,
            generation: 0,
            evaluations: 0,
            next_id: 0,
            started: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replace the configured selection strategy.
    pub fn with_selection(mut self, selection: Box<dyn SelectionStrategy<I>>) -> Self {
        self.selection = selection;
        self
    }

    /// Add a stopping condition on top of the configured budget.
    pub fn with_stopping_condition(mut self, condition: Box<dyn StoppingCondition>) -> Self {
        self.budget.push(condition);
        self
    }

    /// Register an observer.
    pub fn with_listener(mut self, listener: Box<dyn SearchListener<I>>) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Get cancellation handle. Checked between generations only.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn config(&self) -> &NoveltySearchConfig {
        &self.config
    }

    /// Current population, sorted by novelty once scored.
    pub fn population(&self) -> &[Member<I>] {
        &self.population
    }

    pub fn archive(&self) -> &NoveltyArchive<I> {
        &self.archive
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Top-ranked member of the most recent scored population.
    pub fn best_individual(&self) -> Option<&Member<I>> {
        match self.phase {
            SearchPhase::Scored | SearchPhase::Terminated => self.population.first(),
            _ => None,
        }
    }

    /// Resources consumed so far.
    pub fn usage(&self) -> BudgetUsage {
        BudgetUsage {
            generation: self.generation,
            evaluations: self.evaluations,
            elapsed: self.started.map(|s| s.elapsed()).unwrap_or_default(),
        }
    }

    /// Sample a fresh population, then score and sort it.
    pub fn initialize_population(&mut self) -> Result<(), SearchError> {
        self.started.get_or_insert_with(Instant::now);
        self.population.clear();
        self.generation = 0;

        for _ in 0..self.config.population_size {
            let individual = self.factory.create(&mut self.rng);
            let id = self.allocate_id();
            self.population.push(Member::new(id, individual));
        }
        self.phase = SearchPhase::PopulationReady;
        info!(
            "Initialized population of {} individuals",
            self.population.len()
        );
        self.notify(Notification::SearchStarted);

        self.score_population()?;
        self.notify(Notification::GenerationFinished);
        Ok(())
    }

    /// Score every member, archive the novel ones, and sort by novelty.
    ///
    /// All scores come from the population and archive as they were before
    /// this call; archive insertion happens after every score is known.
    pub fn score_population(&mut self) -> Result<(), SearchError> {
        if self.phase == SearchPhase::Terminated {
            return Err(SearchError::InvalidPhase {
                expected: SearchPhase::Scored,
                actual: self.phase,
            });
        }
        if self.population.is_empty() {
            return Err(SearchError::EmptyPopulation);
        }

        let scores = self
            .scorer
            .score_population(&self.population, &self.archive)?;
        for (member, score) in self.population.iter_mut().zip(&scores) {
            member.set_novelty(*score);
        }
        self.evaluations += self.population.len() as u64;

        let archived_before = self.archive.len();
        for member in &self.population {
            if member.novelty() >= self.config.novelty_threshold {
                self.archive.insert(member);
            }
        }

        self.population.sort_by(|a, b| {
            b.novelty()
                .total_cmp(&a.novelty())
                .then_with(|| a.id().cmp(&b.id()))
        });
        self.history.record(&scores, self.archive.len());
        self.phase = SearchPhase::Scored;

        debug!(
            "Scored {} individuals, archive size {} (+{})",
            self.population.len(),
            self.archive.len(),
            self.archive.len() - archived_before
        );
        Ok(())
    }

    /// Breed the next generation and replace the current population.
    ///
    /// Leaves the engine in [`SearchPhase::Evolving`]: scores of the new
    /// population are not computed until [`Self::score_population`].
    pub fn evolve(&mut self) -> Result<(), SearchError> {
        if self.phase != SearchPhase::Scored {
            return Err(SearchError::InvalidPhase {
                expected: SearchPhase::Scored,
                actual: self.phase,
            });
        }

        let target = self.config.population_size;
        let next_generation = self.generation + 1;
        let mut next_gen = Vec::with_capacity(target);
        let mut failures = 0usize;

        while next_gen.len() < target {
            let idx1 = self.selection.select(&self.population, &mut self.rng);
            let idx2 = self.selection.select(&self.population, &mut self.rng);

            let mut offspring1 = self.population[idx1].individual().clone();
            let mut offspring2 = self.population[idx2].individual().clone();

            if let Err(failure) = self.vary(&mut offspring1, &mut offspring2) {
                failures += 1;
                if failures > self.config.max_breeding_retries {
                    warn!("Breeding failed {failures} consecutive times, giving up");
                    return Err(SearchError::RetryLimitExceeded {
                        attempts: failures,
                        last: failure,
                    });
                }
                debug!("Crossover/mutation failed: {failure}");
                continue;
            }
            failures = 0;

            for (mut offspring, parent) in [(offspring1, idx1), (offspring2, idx2)] {
                if next_gen.len() == target {
                    break;
                }
                if offspring.is_changed() {
                    offspring.update_age(next_generation);
                }
                let individual = if self.exceeds_size_bound(&offspring) {
                    self.population[parent].individual().clone()
                } else {
                    offspring
                };
                let id = self.allocate_id();
                next_gen.push(Member::new(id, individual));
            }
        }

        self.population = next_gen;
        self.generation = next_generation;
        self.phase = SearchPhase::Evolving;
        Ok(())
    }

    /// Run the search until the budget is exhausted.
    pub fn generate_solution(&mut self) -> Result<SearchResult<I>, SearchError> {
        self.run_with_callback(|_| {})
    }

    /// Run the search with a progress callback invoked once per generation.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<SearchResult<I>, SearchError>
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = Instant::now();
        self.started.get_or_insert(start_time);

        match self.phase {
            SearchPhase::Uninitialized => self.initialize_population()?,
            SearchPhase::PopulationReady | SearchPhase::Evolving => self.score_population()?,
            SearchPhase::Scored => {}
            SearchPhase::Terminated => {
                return Err(SearchError::InvalidPhase {
                    expected: SearchPhase::Scored,
                    actual: self.phase,
                });
            }
        }
        callback(&self.progress());

        info!("Starting evolution of novelty search");

        let stop_reason = loop {
            if let Some(reason) = self.should_stop() {
                break reason;
            }
            debug!(
                "Generation {} ({} evaluations so far)",
                self.generation, self.evaluations
            );

            self.notify(Notification::GenerationStarted);
            self.evolve()?;
            self.score_population()?;
            self.notify(Notification::GenerationFinished);

            callback(&self.progress());
        };

        self.phase = SearchPhase::Terminated;
        info!(
            "Novelty search finished after {} generations ({:?}), archive size {}",
            self.generation,
            stop_reason,
            self.archive.len()
        );
        self.notify(Notification::SearchFinished);

        self.result(stop_reason, start_time.elapsed())
    }

    /// Get current progress.
    pub fn progress(&self) -> SearchProgress {
        SearchProgress {
            generation: self.generation,
            evaluations: self.evaluations,
            population_size: self.population.len(),
            archive_size: self.archive.len(),
            best_novelty: self.best_individual().map_or(0.0, |m| m.novelty()),
            mean_novelty: self.mean_novelty(),
            top_members: self
                .population
                .iter()
                .take(PROGRESS_TOP_N)
                .map(|m| MemberSummary {
                    id: m.id().value(),
                    novelty: m.novelty(),
                    size: m.individual().size(),
                })
                .collect(),
            phase: self.phase,
        }
    }

    fn vary(&mut self, a: &mut I, b: &mut I) -> Result<(), ConstructionFailure> {
        if self.rng.chance(self.config.crossover_rate) {
            self.variation.crossover(a, b, &mut self.rng)?;
        }
        self.notify_mutation(a);
        a.mutate(&mut self.rng)?;
        self.notify_mutation(b);
        b.mutate(&mut self.rng)?;
        Ok(())
    }

    fn notify_mutation(&mut self, offspring: &I) {
        for listener in &mut self.listeners {
            listener.before_mutation(self.generation, offspring);
        }
    }

    fn exceeds_size_bound(&self, individual: &I) -> bool {
        self.config
            .max_individual_size
            .is_some_and(|max| individual.size() > max)
    }

    fn allocate_id(&mut self) -> MemberId {
        let id = MemberId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn mean_novelty(&self) -> f64 {
        if self.population.is_empty() {
            0.0
        } else {
            self.population.iter().map(|m| m.novelty()).sum::<f64>() / self.population.len() as f64
        }
    }

    /// Check if the search should stop.
    fn should_stop(&self) -> Option<StopReason> {
        if self.cancelled.load(Ordering::Relaxed) {
            return Some(StopReason::Cancelled);
        }
        self.budget.exhausted(&self.usage())
    }

    fn notify(&mut self, notification: Notification) {
        let view = GenerationView {
            generation: self.generation,
            population: &self.population,
            archive_size: self.archive.len(),
        };
        for listener in &mut self.listeners {
            match notification {
                Notification::SearchStarted => listener.search_started(&view),
                Notification::GenerationStarted => listener.generation_started(&view),
                Notification::GenerationFinished => listener.generation_finished(&view),
                Notification::SearchFinished => listener.search_finished(&view),
            }
        }
    }

    fn result(
        &self,
        stop_reason: StopReason,
        elapsed: Duration,
    ) -> Result<SearchResult<I>, SearchError> {
        let best = self
            .population
            .first()
            .cloned()
            .ok_or(SearchError::EmptyPopulation)?;
        let elapsed_seconds = elapsed.as_secs_f64();
        let evaluations_per_second = if elapsed_seconds > 0.0 {
            self.evaluations as f64 / elapsed_seconds
        } else {
            0.0
        };

        Ok(SearchResult {
            stats: SearchStats {
                generations: self.generation,
                total_evaluations: self.evaluations,
                archive_size: self.archive.len(),
                best_novelty: best.novelty(),
                final_mean_novelty: self.mean_novelty(),
                elapsed_seconds,
                evaluations_per_second,
                stop_reason,
            },
            best,
            archive: self.archive.members().to_vec(),
            history: self.history.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::schema::BudgetConfig;
    use crate::search::genome::{UniformCrossover, VectorGenome};
    use crate::search::variation::NoCrossover;

    #[derive(Debug, Clone, PartialEq)]
    struct Probe {
        value: f64,
        size: usize,
        age: usize,
        changed: bool,
        grow: bool,
        fail: bool,
    }

    impl Individual for Probe {
        fn mutate(&mut self, rng: &mut SearchRng) -> Result<(), ConstructionFailure> {
            if self.fail {
                return Err(ConstructionFailure::new("probe refuses mutation"));
            }
            self.value += rng.next_f64();
            if self.grow {
                self.size += 10;
            }
            self.changed = true;
            Ok(())
        }

        fn is_changed(&self) -> bool {
            self.changed
        }

        fn update_age(&mut self, generation: usize) {
            self.age = generation;
        }

        fn size(&self) -> usize {
            self.size
        }
    }

    impl Behavior for Probe {
        fn behavior(&self) -> &[f64] {
            std::slice::from_ref(&self.value)
        }
    }

    fn test_config(size: usize, generations: usize) -> NoveltySearchConfig {
        NoveltySearchConfig::default()
            .with_population_size(size)
            .with_budget(BudgetConfig::generations(generations))
            .with_random_seed(42)
    }

    fn probe_engine(config: NoveltySearchConfig, grow: bool, fail: bool) -> NoveltySearch<Probe> {
        NoveltySearch::from_config(
            config,
            move |rng: &mut SearchRng| Probe {
                value: rng.next_f64() * 10.0,
                size: 1,
                age: 0,
                changed: false,
                grow,
                fail,
            },
            Box::new(NoCrossover),
        )
        .unwrap()
    }

    #[derive(Debug, Default)]
    struct Recording {
        started: usize,
        finished: usize,
        generation_starts: Vec<usize>,
        generations: Vec<(usize, Vec<(u64, f64)>, usize)>,
        mutations: Vec<usize>,
    }

    struct Recorder(Arc<Mutex<Recording>>);

    impl<I> SearchListener<I> for Recorder {
        fn search_started(&mut self, _view: &GenerationView<'_, I>) {
            self.0.lock().unwrap().started += 1;
        }

        fn generation_started(&mut self, view: &GenerationView<'_, I>) {
            self.0.lock().unwrap().generation_starts.push(view.generation);
        }

        fn generation_finished(&mut self, view: &GenerationView<'_, I>) {
            let members = view
                .population
                .iter()
                .map(|m| (m.id().value(), m.novelty()))
                .collect();
            self.0
                .lock()
                .unwrap()
                .generations
                .push((view.generation, members, view.archive_size));
        }

        fn before_mutation(&mut self, generation: usize, _offspring: &I) {
            self.0.lock().unwrap().mutations.push(generation);
        }

        fn search_finished(&mut self, _view: &GenerationView<'_, I>) {
            self.0.lock().unwrap().finished += 1;
        }
    }

    fn recorded<I: Individual + 'static>(
        engine: NoveltySearch<I>,
    ) -> (NoveltySearch<I>, Arc<Mutex<Recording>>) {
        let recording = Arc::new(Mutex::new(Recording::default()));
        let engine = engine.with_listener(Box::new(Recorder(Arc::clone(&recording))));
        (engine, recording)
    }

    #[test]
    fn test_initialize_population() {
        let mut engine = probe_engine(test_config(10, 5), false, false);
        assert_eq!(engine.phase(), SearchPhase::Uninitialized);
        assert!(engine.best_individual().is_none());

        engine.initialize_population().unwrap();

        assert_eq!(engine.population().len(), 10);
        assert_eq!(engine.phase(), SearchPhase::Scored);
        assert_eq!(engine.evaluations(), 10);
        assert_eq!(engine.history().len(), 1);
        let best = engine.best_individual().unwrap();
        assert_eq!(best.id(), engine.population()[0].id());
    }

    #[test]
    fn test_evolve_requires_scored_population() {
        let mut engine = probe_engine(test_config(4, 5), false, false);
        assert!(matches!(
            engine.evolve(),
            Err(SearchError::InvalidPhase {
                expected: SearchPhase::Scored,
                actual: SearchPhase::Uninitialized,
            })
        ));
    }

    #[test]
    fn test_evolve_invalidates_scores() {
        let mut engine = probe_engine(test_config(4, 5), false, false);
        engine.initialize_population().unwrap();
        engine.evolve().unwrap();

        assert_eq!(engine.phase(), SearchPhase::Evolving);
        assert_eq!(engine.generation(), 1);
        assert!(engine.best_individual().is_none());
    }

    #[test]
    fn test_population_size_constant() {
        // Odd size: the last breeding step only contributes one offspring.
        let (mut engine, recording) = recorded(probe_engine(test_config(7, 6), false, false));
        engine.generate_solution().unwrap();

        let recording = recording.lock().unwrap();
        assert_eq!(recording.generations.len(), 7);
        for (_, members, _) in &recording.generations {
            assert_eq!(members.len(), 7);
        }
    }

    #[test]
    fn test_population_sorted_by_novelty() {
        let (mut engine, recording) = recorded(probe_engine(test_config(12, 5), false, false));
        engine.generate_solution().unwrap();

        for (_, members, _) in &recording.lock().unwrap().generations {
            for pair in members.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    #[test]
    fn test_archive_never_shrinks() {
        let config = test_config(10, 8).with_novelty_threshold(1.0);
        let (mut engine, recording) = recorded(probe_engine(config, false, false));
        engine.generate_solution().unwrap();

        let sizes: Vec<usize> = recording
            .lock()
            .unwrap()
            .generations
            .iter()
            .map(|(_, _, size)| *size)
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(engine.history().archive_size, sizes);
    }

    #[test]
    fn test_low_threshold_archives_every_member_once() {
        let config = test_config(6, 5).with_novelty_threshold(0.0);
        let mut engine = probe_engine(config, false, false);
        engine.initialize_population().unwrap();

        assert_eq!(engine.archive().len(), 6);
        for member in engine.population() {
            assert!(engine.archive().contains(member.id()));
        }

        // Rescoring the same population must not duplicate entries.
        engine.score_population().unwrap();
        assert_eq!(engine.archive().len(), 6);
        let ids: HashSet<_> = engine.archive().iter().map(|m| m.id()).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_oversized_offspring_replaced_by_parent() {
        let mut config = test_config(8, 5);
        config.max_individual_size = Some(5);
        let mut engine = probe_engine(config, true, false);
        engine.initialize_population().unwrap();

        let parent_values: Vec<f64> = engine
            .population()
            .iter()
            .map(|m| m.individual().value)
            .collect();
        let parent_ids: HashSet<MemberId> = engine.population().iter().map(|m| m.id()).collect();

        engine.evolve().unwrap();

        assert_eq!(engine.population().len(), 8);
        for member in engine.population() {
            let individual = member.individual();
            assert_eq!(individual.size, 1);
            assert!(parent_values.contains(&individual.value));
            assert!(!parent_ids.contains(&member.id()));
        }
    }

    #[test]
    fn test_changed_offspring_aged() {
        let mut config = test_config(6, 5);
        config.max_individual_size = None;
        let mut engine = probe_engine(config, false, false);
        engine.initialize_population().unwrap();
        engine.evolve().unwrap();
        engine.score_population().unwrap();
        engine.evolve().unwrap();

        assert!(engine.population().iter().all(|m| m.individual().age == 2));
    }

    #[test]
    fn test_listeners_see_every_mutation() {
        // Size 5 breeds three pairs per generation, each pair mutating twice.
        let (mut engine, recording) = recorded(probe_engine(test_config(5, 2), false, false));
        engine.generate_solution().unwrap();

        let mutations = &recording.lock().unwrap().mutations;
        assert_eq!(mutations.len(), 12);
        assert!(mutations[..6].iter().all(|&g| g == 0));
        assert!(mutations[6..].iter().all(|&g| g == 1));
    }

    #[test]
    fn test_explicit_metric_replaces_configured_distance() {
        let config = test_config(4, 1);
        let mut engine = NoveltySearch::new(
            config,
            |rng: &mut SearchRng| Probe {
                value: rng.next_f64() * 10.0,
                size: 1,
                age: 0,
                changed: false,
                grow: false,
                fail: false,
            },
            Box::new(|_: &Probe, _: &Probe| 2.5),
            Box::new(NoCrossover),
        )
        .unwrap();
        engine.initialize_population().unwrap();

        assert!(engine.population().iter().all(|m| m.novelty() == 2.5));
    }

    #[test]
    fn test_failing_mutation_hits_retry_cap() {
        let mut config = test_config(4, 5);
        config.max_breeding_retries = 10;
        let mut engine = probe_engine(config, false, true);
        engine.initialize_population().unwrap();

        match engine.evolve() {
            Err(SearchError::RetryLimitExceeded { attempts, .. }) => assert_eq!(attempts, 11),
            other => panic!("expected retry cap, got {other:?}"),
        }
    }

    #[test]
    fn test_failing_crossover_terminates_search() {
        let mut config = test_config(4, 5).with_crossover_rate(1.0);
        config.max_breeding_retries = 25;
        let always_fail =
            |_: &mut Probe, _: &mut Probe, _: &mut SearchRng| -> Result<(), ConstructionFailure> {
                Err(ConstructionFailure::new("incompatible parents"))
            };
        let mut engine = NoveltySearch::from_config(
            config,
            |rng: &mut SearchRng| Probe {
                value: rng.next_f64(),
                size: 1,
                age: 0,
                changed: false,
                grow: false,
                fail: false,
            },
            Box::new(always_fail),
        )
        .unwrap();

        assert!(matches!(
            engine.generate_solution(),
            Err(SearchError::RetryLimitExceeded { attempts: 26, .. })
        ));
    }

    #[test]
    fn test_generate_solution() {
        let (mut engine, recording) = recorded(probe_engine(test_config(5, 3), false, false));
        let result = engine.generate_solution().unwrap();

        assert_eq!(result.stats.generations, 3);
        assert_eq!(result.stats.stop_reason, StopReason::MaxGenerations);
        assert_eq!(result.stats.total_evaluations, 5 * 4);
        assert_eq!(result.history.len(), 4);
        assert_eq!(engine.phase(), SearchPhase::Terminated);
        assert_eq!(result.best.id(), engine.best_individual().unwrap().id());

        let recording = recording.lock().unwrap();
        assert_eq!(recording.started, 1);
        assert_eq!(recording.finished, 1);
        assert_eq!(recording.generation_starts, vec![0, 1, 2]);

        assert!(matches!(
            engine.generate_solution(),
            Err(SearchError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn test_evaluation_budget() {
        let config = test_config(5, 3).with_budget(BudgetConfig {
            max_generations: None,
            max_evaluations: Some(12),
            max_time_secs: None,
        });
        let mut engine = probe_engine(config, false, false);
        let result = engine.generate_solution().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::MaxEvaluations);
        assert_eq!(result.stats.total_evaluations, 15);
        assert_eq!(result.stats.generations, 2);
    }

    #[test]
    fn test_cancellation() {
        let mut engine = probe_engine(test_config(5, 100), false, false);
        let cancel = engine.cancel_handle();

        // Cancel immediately
        cancel.store(true, Ordering::Relaxed);

        let result = engine.generate_solution().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 0);
    }

    #[test]
    fn test_custom_stopping_condition() {
        struct ArchiveFull(usize);
        impl StoppingCondition for ArchiveFull {
            fn is_finished(&self, usage: &BudgetUsage) -> bool {
                usage.evaluations >= self.0 as u64
            }
            fn reason(&self) -> StopReason {
                StopReason::Custom("enough".into())
            }
        }

        let mut engine = probe_engine(test_config(4, 50), false, false)
            .with_stopping_condition(Box::new(ArchiveFull(8)));
        let result = engine.generate_solution().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::Custom("enough".into()));
        assert_eq!(result.stats.generations, 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let engine = NoveltySearch::from_config(
                test_config(9, 6),
                |rng: &mut SearchRng| VectorGenome::random(rng, 4, (-1.0, 1.0)),
                Box::new(UniformCrossover),
            )
            .unwrap();
            let (mut engine, recording) = recorded(engine);
            let result = engine.generate_solution().unwrap();
            let generations = recording.lock().unwrap().generations.clone();
            (result, generations)
        };

        let (first, first_generations) = run();
        let (second, second_generations) = run();

        assert_eq!(first_generations, second_generations);
        assert_eq!(first.best.id(), second.best.id());
        assert_eq!(first.best.individual(), second.best.individual());
        assert_eq!(first.stats.archive_size, second.stats.archive_size);
    }

    #[test]
    fn test_progress_report() {
        let mut engine = probe_engine(test_config(8, 2), false, false);
        let mut reports = Vec::new();
        engine
            .run_with_callback(|progress| reports.push(progress.clone()))
            .unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].generation, 0);
        assert_eq!(reports[2].generation, 2);
        assert!(reports.iter().all(|r| r.top_members.len() == PROGRESS_TOP_N));
        assert!(reports.iter().all(|r| r.phase == SearchPhase::Scored));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_population_size_invariant(size in 2usize..12, seed in any::<u64>()) {
            let config = NoveltySearchConfig::default()
                .with_population_size(size)
                .with_budget(BudgetConfig::generations(3))
                .with_random_seed(seed);
            let mut engine = NoveltySearch::from_config(
                config,
                |rng: &mut SearchRng| VectorGenome::random(rng, 5, (0.0, 1.0)),
                Box::new(UniformCrossover),
            )
            .unwrap();

            engine.initialize_population().unwrap();
            for _ in 0..3 {
                let archived = engine.archive().len();
                engine.evolve().unwrap();
                prop_assert_eq!(engine.population().len(), size);
                engine.score_population().unwrap();
                prop_assert_eq!(engine.population().len(), size);
                prop_assert!(engine.archive().len() >= archived);
            }
        }
    }
}
