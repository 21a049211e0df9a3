use criterion::{criterion_group, criterion_main, Criterion};
use denizens::{DenizenDatabase, DenizenQuery, InUseFilter, KingdomDefinition};
use std::hint::black_box;

const KINGDOM: &str = include_str!("../data/kingdoms/two_regions.toml");

fn homed_database(population: usize) -> DenizenDatabase {
    let mut kingdom = KingdomDefinition::from_toml(KINGDOM).expect("fixture loads");
    kingdom.total_population = population;
    let mut db = DenizenDatabase::new(0xBEEF, &kingdom).expect("database builds");

    let region = db.query().region(1).expect("region exists");
    let mut ids = Vec::new();
    db.random_ids(&region, InUseFilter::NotInUse, 1000, &mut ids);
    for (i, uid) in ids.into_iter().enumerate() {
        let residence = if i % 2 == 0 { 27 } else { 1 };
        db.set_in_use(uid, true).unwrap();
        db.set_town_id(uid, 2).unwrap();
        db.set_residence_id(uid, residence).unwrap();
    }
    db
}

fn bench_queries(c: &mut Criterion) {
    let population: usize = std::env::var("DENIZENS_BENCH_POPULATION")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(1 << 20);

    let db = homed_database(population);
    let sample = db.query().region(1).expect("region exists");
    let query = DenizenQuery::Residence { town: 2, residence: 27 };
    let mut ids = Vec::new();

    let mut group = c.benchmark_group(format!("residence_query_{}", population));
    group.bench_function("find_all_ids", |b| {
        b.iter(|| db.find_all_ids(black_box(query), &mut ids))
    });
    group.bench_function("find_all_ids_parallel", |b| {
        b.iter(|| db.find_all_ids_parallel(black_box(query), &mut ids))
    });
    group.bench_function("find_sample_ids", |b| {
        b.iter(|| db.find_sample_ids(&sample, black_box(query), &mut ids))
    });
    group.bench_function("find_sample_ids_parallel", |b| {
        b.iter(|| db.find_sample_ids_parallel(&sample, black_box(query), &mut ids))
    });
    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
