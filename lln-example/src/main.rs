use lln_core::config::{parse_seed, parse_trials};
use lln_core::io::load_categories;
use lln_core::{Ensemble, Simulation, SimulationConfig};

/// Usage: `lln-example [categories.txt] [trials] [seed]`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Start from the default bag: 4 green, 3 yellow, 3 red chips, 50 draws
    let mut config = SimulationConfig::default();

    // A category file replaces the default bag (one "name weight" per line)
    if let Some(path) = args.first() {
        let set = load_categories(path)?;
        config.categories = set
            .categories()
            .iter()
            .map(|c| (c.name().to_owned(), c.weight() as i64))
            .collect();
    }
    if let Some(trials) = args.get(1) {
        config.trials = parse_trials(trials)?;
    }
    config.seed = match args.get(2) {
        Some(seed) => parse_seed(seed)?,
        None => Some(2024),
    };

    // Invalid configurations are reported, never silently fixed
    let mut broken = config.clone();
    broken.trials = 0;
    match Simulation::new(&broken) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected as expected: {e}"),
    }

    let simulation = Simulation::new(&config)?;
    let theoretical = simulation.theoretical();

    println!("Theoretical probabilities:");
    for (name, percent) in theoretical.percentages() {
        println!("- {name}: {percent}");
    }

    // Stream records one at a time, printing about 10 checkpoints
    let step = (simulation.trials() / 10).max(1);
    println!("\nTrial  {}", simulation.categories().names().collect::<Vec<_>>().join("  "));
    for record in simulation.stream() {
        if record.trial % step == 0 || record.trial == simulation.trials() {
            let row: Vec<String> = record.frequencies.iter().map(|f| format!("{f:.3}")).collect();
            println!("{:>5}  {}", record.trial, row.join("  "));
        }
    }

    // The batch form gives exactly the same trajectory
    let report = simulation.run();
    println!("\nFinal counts: {:?}", report.final_counts);

    // Repeat with many seeds and a large N to watch the gap close
    let ensemble = Ensemble::new(simulation.categories().clone(), 100_000, 8, simulation.seed())?;
    let convergence = ensemble.run();
    println!("\nAfter {} draws, across {} seeds:", convergence.trials, convergence.runs.len());
    for deviation in &convergence.categories {
        println!(
            "- {}: theoretical {:.4}, mean {:.4}, worst gap {:.4}",
            deviation.name, deviation.theoretical, deviation.mean_frequency, deviation.max_abs_deviation
        );
    }
    println!("Within 1%: {}", convergence.converged(0.01));

    Ok(())
}
