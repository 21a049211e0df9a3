//! Denizens - Entry Point
//!
//! Loads a kingdom definition, lays out its population and prints how the
//! census split it.

use std::path::PathBuf;

use clap::Parser;
use denizens::core::error::Result;
use denizens::denizen::traits::{Age, Demographic, Gender, Job, Race};
use denizens::{DenizenDatabase, KingdomDefinition, PopulationSample};

/// Lay out a kingdom's population and summarize it
#[derive(Parser, Debug)]
#[command(name = "denizens")]
#[command(about = "Build a denizen database from a kingdom definition")]
struct Args {
    /// Kingdom definition (TOML or JSON)
    #[arg(long, default_value = "data/kingdoms/two_regions.toml")]
    kingdom: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 69420)]
    seed: u64,

    /// Denizen ids to decode and print
    #[arg(long, num_args = 1..)]
    inspect: Vec<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("denizens=info")
        .init();

    let args = Args::parse();
    let kingdom = KingdomDefinition::load(&args.kingdom)?;
    let db = DenizenDatabase::new(args.seed, &kingdom)?;

    println!("\n=== KINGDOM ===");
    println!("Denizens: {}", db.population_size());

    for (index, region) in kingdom.regions.iter().enumerate() {
        let sample = db.query().region(index)?;
        println!(
            "\n{} ({} denizens, capacity {})",
            region.name,
            sample.count(),
            region.municipal_capacity()
        );
        print_dimension::<Gender>(&sample)?;
        print_dimension::<Age>(&sample)?;
        print_dimension::<Race>(&sample)?;
        print_dimension::<Job>(&sample)?;
    }

    for uid in args.inspect {
        match db.generate_denizen(uid) {
            Ok(record) => println!("{}", record),
            Err(e) => tracing::warn!("Cannot decode denizen {}: {}", uid, e),
        }
    }

    Ok(())
}

fn print_dimension<D: Demographic + std::fmt::Debug>(sample: &PopulationSample) -> Result<()> {
    let mut counts = Vec::with_capacity(D::count());
    for &group in D::ALL {
        counts.push(format!("{:?}={}", group, sample.demographic(group)?.count()));
    }
    println!("  {}: {}", D::DIMENSION, counts.join(", "));
    Ok(())
}
