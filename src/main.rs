//! Novelty Search CLI - Run a search over vector genomes from JSON configuration.

use std::path::PathBuf;

use novelty_search::{
    schema::NoveltySearchConfig,
    search::{LoggingListener, NoveltySearch, SearchRng, SinglePointCrossover, VectorGenome},
};

const GENE_BOUNDS: (f64, f64) = (-1.0, 1.0);

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [genome-length]", args[0]);
        eprintln!();
        eprintln!("Run novelty search over real-valued vector genomes.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json    Path to search configuration file");
        eprintln!("  genome-length  Initial number of genes (default: 8)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let genome_length: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(8);

    let config = NoveltySearchConfig::from_json_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("Novelty Search");
    println!("==============");
    println!("Population: {}", config.population_size);
    println!("Genome length: {}", genome_length);
    println!("Crossover rate: {}", config.crossover_rate);
    println!("Novelty threshold: {}", config.novelty_threshold);
    println!("Selection: {:?}", config.selection);
    println!("Distance: {:?}", config.distance);
    println!();

    let engine = NoveltySearch::from_config(
        config,
        move |rng: &mut SearchRng| VectorGenome::random(rng, genome_length, GENE_BOUNDS),
        Box::new(SinglePointCrossover),
    );
    let mut engine = match engine {
        Ok(engine) => engine.with_listener(Box::new(LoggingListener)),
        Err(e) => {
            eprintln!("Error creating search: {}", e);
            std::process::exit(1);
        }
    };

    println!("Running search...");
    let result = engine.run_with_callback(|progress| {
        if progress.generation % 10 == 0 {
            println!(
                "  Generation {}: best={:.4}, mean={:.4}, archive={}",
                progress.generation,
                progress.best_novelty,
                progress.mean_novelty,
                progress.archive_size
            );
        }
    });

    let result = result.unwrap_or_else(|e| {
        eprintln!("Search failed: {}", e);
        std::process::exit(1);
    });

    println!();
    println!("Finished: {:?}", result.stats.stop_reason);
    println!("  Generations: {}", result.stats.generations);
    println!("  Evaluations: {}", result.stats.total_evaluations);
    println!("  Archive size: {}", result.stats.archive_size);
    println!("  Final mean novelty: {:.4}", result.stats.final_mean_novelty);
    println!(
        "  Time: {:.2}s ({:.1} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );
    println!();
    println!(
        "Best individual {} (novelty {:.4}):",
        result.best.id(),
        result.best.novelty()
    );
    println!("  {:?}", result.best.individual().genes());
}

fn print_example_config() {
    let config = NoveltySearchConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
