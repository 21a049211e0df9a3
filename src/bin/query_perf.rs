//! Query Performance Harness
//!
//! Homes a thousand free denizens in one town, then times each query family
//! against the same predicate and checks they agree.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ahash::AHashSet;
use clap::{Parser, ValueEnum};
use denizens::core::error::Result;
use denizens::{
    DenizenDatabase, DenizenId, DenizenQuery, InUseFilter, KingdomDefinition, PopulationSample,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "query_perf")]
#[command(about = "Time the sequential, parallel and sample-restricted state queries")]
struct Args {
    /// Kingdom definition (TOML or JSON)
    #[arg(long, default_value = "data/kingdoms/two_regions.toml")]
    kingdom: PathBuf,

    /// Override the kingdom's total population
    #[arg(long)]
    population: Option<usize>,

    /// Denizens to home in the test town
    #[arg(long, default_value_t = 1000)]
    denizens: usize,

    /// Timed repetitions per query family
    #[arg(long, default_value_t = 100)]
    iterations: u32,

    /// Random seed for deterministic runs
    #[arg(long, default_value_t = 69420)]
    seed: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// The four ways of running the same state query
#[derive(Clone, Copy, Debug)]
enum QueryFamily {
    All,
    AllParallel,
    Sample,
    SampleParallel,
}

impl QueryFamily {
    const ALL: [QueryFamily; 4] = [
        QueryFamily::All,
        QueryFamily::AllParallel,
        QueryFamily::Sample,
        QueryFamily::SampleParallel,
    ];

    fn name(self) -> &'static str {
        match self {
            QueryFamily::All => "find_all_ids",
            QueryFamily::AllParallel => "find_all_ids_parallel",
            QueryFamily::Sample => "find_sample_ids",
            QueryFamily::SampleParallel => "find_sample_ids_parallel",
        }
    }

    fn run(
        self,
        db: &DenizenDatabase,
        sample: &PopulationSample,
        query: DenizenQuery,
        ids: &mut Vec<DenizenId>,
    ) {
        match self {
            QueryFamily::All => db.find_all_ids(query, ids),
            QueryFamily::AllParallel => db.find_all_ids_parallel(query, ids),
            QueryFamily::Sample => db.find_sample_ids(sample, query, ids),
            QueryFamily::SampleParallel => db.find_sample_ids_parallel(sample, query, ids),
        }
    }
}

const TEST_TOWN: u8 = 2;
const TEST_RESIDENCE: u16 = 27;

#[derive(Serialize)]
struct FamilyTiming {
    family: &'static str,
    matches: usize,
    total_us: u128,
    avg_us: f64,
}

#[derive(Serialize)]
struct Report {
    population: usize,
    homed: usize,
    setup_ms: u128,
    timings: Vec<FamilyTiming>,
}

fn residence_for(i: usize) -> u16 {
    if i % 2 == 0 {
        TEST_RESIDENCE
    } else if i % 3 == 0 {
        3
    } else if i % 5 == 0 {
        4
    } else {
        1
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("denizens=info")
        .init();

    let args = Args::parse();
    let mut kingdom = KingdomDefinition::load(&args.kingdom)?;
    if let Some(population) = args.population {
        kingdom.total_population = population;
    }

    let setup_start = Instant::now();
    let mut db = DenizenDatabase::new(args.seed, &kingdom)?;
    let region = db.query().region(kingdom.regions.len().saturating_sub(1))?;

    let mut homed = Vec::new();
    db.random_ids(&region, InUseFilter::NotInUse, args.denizens, &mut homed);
    let unique: AHashSet<DenizenId> = homed.iter().copied().collect();
    if unique.len() != homed.len() {
        tracing::warn!(
            "Random selection returned {} duplicates",
            homed.len() - unique.len()
        );
    }
    if homed.len() < args.denizens {
        tracing::warn!(
            "Only {} of {} requested denizens were free",
            homed.len(),
            args.denizens
        );
    }

    for (i, &uid) in homed.iter().enumerate() {
        db.set_in_use(uid, true)?;
        db.set_town_id(uid, TEST_TOWN)?;
        db.set_residence_id(uid, residence_for(i))?;
    }
    let setup_time = setup_start.elapsed();

    let query = DenizenQuery::Residence {
        town: TEST_TOWN,
        residence: TEST_RESIDENCE,
    };
    let expected = homed.len().div_ceil(2);
    let sample = region;

    let mut timings = Vec::new();
    let mut ids = Vec::new();

    for family in QueryFamily::ALL {
        let mut total = Duration::ZERO;
        for _ in 0..args.iterations {
            let start = Instant::now();
            family.run(&db, &sample, query, &mut ids);
            total += start.elapsed();
        }
        if ids.len() != expected {
            tracing::warn!(
                "{} found {} ids, expected {}",
                family.name(),
                ids.len(),
                expected
            );
        }
        timings.push(FamilyTiming {
            family: family.name(),
            matches: ids.len(),
            total_us: total.as_micros(),
            avg_us: total.as_secs_f64() * 1e6 / f64::from(args.iterations.max(1)),
        });
    }

    let report = Report {
        population: db.population_size(),
        homed: homed.len(),
        setup_ms: setup_time.as_millis(),
        timings,
    };

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n=== Query performance: {} denizens ===", report.population);
        println!("Setup time: {:?} ({} homed)", setup_time, report.homed);
        for timing in &report.timings {
            println!(
                "{:<26} {:>6} matches  avg {:>10.2}us  total {:>10}us",
                timing.family, timing.matches, timing.avg_us, timing.total_us
            );
        }
    }

    Ok(())
}
