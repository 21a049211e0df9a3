//! Integration tests for demographic queries over a sliced kingdom
//!
//! These tests verify:
//! - Region and demographic narrowing yields the expected id ranges
//! - Narrowing is independent of filter order
//! - Every depth of the tree partitions the whole population
//! - Denizens decode back to the groups they were sliced into

use std::sync::Arc;

use denizens::denizen::traits::{Age, Gender, Job, Race};
use denizens::population::IndexRange;
use denizens::{DenizenDatabase, KingdomDefinition, PopulationError, PopulationSample, TreeDepth};

const KINGDOM: &str = include_str!("../data/kingdoms/two_regions.toml");

fn database() -> DenizenDatabase {
    let kingdom = KingdomDefinition::from_toml(KINGDOM).expect("fixture should load");
    DenizenDatabase::new(69420, &kingdom).expect("database should build")
}

fn ranges(pairs: &[(usize, usize)]) -> Vec<IndexRange> {
    pairs.iter().map(|&(s, e)| IndexRange::new(s, e)).collect()
}

#[test]
fn test_region_ranges() {
    let db = database();
    let west = db.query().region(0).unwrap();
    let dusk = db.query().region(1).unwrap();

    assert_eq!(west.ranges(), ranges(&[(0, 4000)]).as_slice());
    assert_eq!(dusk.ranges(), ranges(&[(4000, 10_000)]).as_slice());
    assert_eq!(west.count() + dusk.count(), db.population_size());
}

#[test]
fn test_narrowing_chain() {
    let db = database();
    let west = db.query().region(0).unwrap();

    let female = west.gender(Gender::Female).unwrap();
    assert_eq!(female.ranges(), ranges(&[(2000, 4000)]).as_slice());

    let teen = female.age(Age::Teen).unwrap();
    assert_eq!(teen.ranges(), ranges(&[(3700, 3900)]).as_slice());

    let dark_elf = teen.race(Race::DarkElf).unwrap();
    assert_eq!(dark_elf.ranges(), ranges(&[(3840, 3880)]).as_slice());

    let adventurer = dark_elf.job(Job::Adventurer).unwrap();
    assert_eq!(adventurer.ranges(), ranges(&[(3840, 3860)]).as_slice());
    assert_eq!(adventurer.count(), 20);
}

#[test]
fn test_filter_order_does_not_matter() {
    let db = database();
    let forward = db
        .query()
        .region(1)
        .and_then(|s| s.gender(Gender::Female))
        .and_then(|s| s.age(Age::Teen))
        .and_then(|s| s.race(Race::DarkElf))
        .and_then(|s| s.job(Job::Adventurer))
        .unwrap();
    let reversed = db
        .query()
        .job(Job::Adventurer)
        .and_then(|s| s.race(Race::DarkElf))
        .and_then(|s| s.age(Age::Teen))
        .and_then(|s| s.gender(Gender::Female))
        .and_then(|s| s.region(1))
        .unwrap();
    let scrambled = db
        .query()
        .age(Age::Teen)
        .and_then(|s| s.region(1))
        .and_then(|s| s.job(Job::Adventurer))
        .and_then(|s| s.gender(Gender::Female))
        .and_then(|s| s.race(Race::DarkElf))
        .unwrap();

    assert_eq!(forward.ranges(), ranges(&[(8482, 8515)]).as_slice());
    assert_eq!(forward, reversed);
    assert_eq!(forward, scrambled);
}

#[test]
fn test_unrestricted_region_spans_both() {
    let db = database();
    let sample = db
        .query()
        .gender(Gender::Male)
        .and_then(|s| s.age(Age::Teen))
        .and_then(|s| s.race(Race::DarkElf))
        .and_then(|s| s.job(Job::Adventurer))
        .unwrap();

    assert_eq!(sample.ranges(), ranges(&[(1840, 1860), (5458, 5485)]).as_slice());
    assert_eq!(sample.count(), 47);
}

#[test]
fn test_skipping_depths() {
    let db = database();
    let sample = db
        .query()
        .region(1)
        .and_then(|s| s.age(Age::Elderly))
        .and_then(|s| s.race(Race::Mark))
        .unwrap();

    assert_eq!(sample.ranges(), ranges(&[(6673, 6687), (9967, 9984)]).as_slice());
    assert_eq!(sample.count(), 31);
}

#[test]
fn test_every_depth_partitions_population() {
    let db = database();
    let tree = db.tree();

    for depth in 0..tree.max_depth() {
        let nodes = tree.nodes(depth).unwrap();
        assert_eq!(nodes.first().unwrap().range.start, 0, "depth {}", depth);
        assert_eq!(nodes.last().unwrap().range.end, 10_000, "depth {}", depth);
        for pair in nodes.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start, "depth {}", depth);
        }

        let total: usize = (0..tree.group_count(depth).unwrap())
            .map(|group| db.query().query(depth, group).unwrap().count())
            .sum();
        assert_eq!(total, 10_000, "depth {}", depth);
    }
}

#[test]
fn test_bad_group_index_fails() {
    let db = database();
    assert!(matches!(
        db.query().region(2),
        Err(PopulationError::InvalidGroupIndex { .. })
    ));
    assert!(db.query().query(TreeDepth::Job.index() + 1, 0).is_err());
}

#[test]
fn test_sample_from_ids_condenses() {
    let db = database();
    let sample = PopulationSample::from_ids(Arc::clone(db.tree()), &[7, 5, 6, 20, 21, 9]);
    assert_eq!(sample.ranges(), ranges(&[(5, 8), (9, 10), (20, 22)]).as_slice());
    assert_eq!(sample.count(), 6);
}

#[test]
fn test_recreate_denizen() {
    let mut db = database();
    let sample = db
        .query()
        .region(1)
        .and_then(|s| s.gender(Gender::Female))
        .and_then(|s| s.age(Age::Teen))
        .and_then(|s| s.race(Race::DarkElf))
        .and_then(|s| s.job(Job::Adventurer))
        .unwrap();

    let uid = db
        .random_id(&sample, denizens::InUseFilter::NotInUse)
        .expect("sample has free denizens");
    db.set_town_id(uid, 69).unwrap();
    db.set_in_use(uid, true).unwrap();

    let record = db.generate_denizen(uid).unwrap();
    assert_eq!(record.id, uid);
    assert_eq!(record.home.region, 1);
    assert_eq!(record.home.town, 69);
    assert_eq!(record.gender, Gender::Female);
    assert_eq!(record.age, Age::Teen);
    assert_eq!(record.race, Race::DarkElf);
    assert_eq!(record.job, Job::Adventurer);
}

#[test]
fn test_every_denizen_decodes_into_its_groups() {
    let db = database();
    for uid in (0..10_000).step_by(97) {
        let record = db.generate_denizen(uid).unwrap();
        let region = db.query().region(record.home.region.into()).unwrap();
        assert!(region.contains(uid));
        assert!(db.query().gender(record.gender).unwrap().contains(uid));
        assert!(db.query().age(record.age).unwrap().contains(uid));
        assert!(db.query().race(record.race).unwrap().contains(uid));
        assert!(db.query().job(record.job).unwrap().contains(uid));
    }
}
