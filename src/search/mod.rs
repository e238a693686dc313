//! Novelty search: evolve a population toward behavioral novelty.
//!
//! Instead of optimizing an objective, every individual is scored by how far
//! its behavior lies from the rest of the current population and from an
//! archive of previously novel individuals.
//!
//! # Overview
//!
//! - **Individuals** (`individual`): the contract candidates must fulfil
//! - **Distances** (`distance`): pluggable behavioral distance metrics
//! - **Scoring** (`novelty`): novelty of an individual against population and archive
//! - **Archive** (`archive`): append-only store of sufficiently novel individuals
//! - **Engine** (`engine`): the generational control loop
//! - **Operators** (`selection`, `variation`): parent choice and recombination
//! - **Budget** (`budget`): stopping conditions
//! - **Reference genome** (`genome`): a real-valued vector individual
//!
//! # Example
//!
//! ```rust,no_run
//! use novelty_search::schema::NoveltySearchConfig;
//! use novelty_search::search::{NoveltySearch, SearchRng, UniformCrossover, VectorGenome};
//!
//! let config = NoveltySearchConfig::default().with_random_seed(7);
//! let mut engine = NoveltySearch::from_config(
//!     config,
//!     |rng: &mut SearchRng| VectorGenome::random(rng, 8, (-1.0, 1.0)),
//!     Box::new(UniformCrossover),
//! )
//! .unwrap();
//!
//! let result = engine.run_with_callback(|progress| {
//!     println!("Generation {}: archive = {}", progress.generation, progress.archive_size);
//! })
//! .unwrap();
//! println!("Best novelty: {:.3}", result.stats.best_novelty);
//! ```

mod archive;
mod budget;
mod distance;
mod engine;
mod error;
mod genome;
mod individual;
mod listener;
mod novelty;
mod rng;
mod selection;
mod variation;

pub use archive::*;
pub use budget::*;
pub use distance::*;
pub use engine::*;
pub use error::*;
pub use genome::*;
pub use individual::*;
pub use listener::*;
pub use novelty::*;
pub use rng::*;
pub use selection::*;
pub use variation::*;
