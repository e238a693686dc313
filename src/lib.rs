//! Novelty Search - a generational metaheuristic driven by behavioral novelty.
//!
//! This crate evolves a population of candidate solutions toward behaviors
//! that differ from everything seen so far. Each generation is scored by its
//! mean distance to the rest of the population and to an ever-growing
//! archive of novel individuals.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, progress and result types
//! - `search`: The search engine and its pluggable collaborators
//!
//! # Example
//!
//! ```rust,no_run
//! use novelty_search::{
//!     schema::{BudgetConfig, NoveltySearchConfig},
//!     search::{NoveltySearch, SearchRng, SinglePointCrossover, VectorGenome},
//! };
//!
//! // Create configuration
//! let config = NoveltySearchConfig::default()
//!     .with_population_size(32)
//!     .with_budget(BudgetConfig::generations(50));
//!
//! // Individuals are sampled from a factory
//! let mut engine = NoveltySearch::from_config(
//!     config,
//!     |rng: &mut SearchRng| VectorGenome::random(rng, 10, (0.0, 1.0)),
//!     Box::new(SinglePointCrossover),
//! )
//! .unwrap();
//!
//! let result = engine.generate_solution().unwrap();
//! println!("Archive size after {} generations: {}",
//!     result.stats.generations, result.stats.archive_size);
//! ```

pub mod schema;
pub mod search;

// Re-export commonly used types
pub use schema::{NoveltySearchConfig, SearchProgress, SearchStats};
pub use search::{Individual, NoveltySearch, SearchError, SearchResult};
