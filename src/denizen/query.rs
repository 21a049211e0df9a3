//! Predicate scans over packed denizen state
//!
//! Four query families compute the same logical result and differ only in
//! search space and execution:
//!
//! | family                  | searches           | order      |
//! |-------------------------|--------------------|------------|
//! | `find_all`              | whole population   | ascending  |
//! | `find_all_parallel`     | whole population   | unordered  |
//! | `find_in_sample`        | a sample's ranges  | ascending  |
//! | `find_in_sample_parallel` | a sample's ranges | unordered |
//!
//! Every entry point clears the caller's list before filling it. An empty
//! result is a normal outcome, never an error.
//!
//! Parallel scans fan out on the rayon pool and block the calling thread
//! until every task has finished. There is no timeout and no cancellation.
//! Merge buffers are local to each call, so concurrent queries on a shared
//! `&StateStore` never see each other's results.

use std::sync::{Mutex, PoisonError};

use rayon::Scope;

use crate::core::config::config;
use crate::core::types::DenizenId;
use crate::denizen::layout::StateField;
use crate::denizen::state::StateStore;
use crate::population::range::IndexRange;
use crate::population::sample::PopulationSample;

/// Location predicate over the packed state
///
/// Residence and workplace ids are local to a town, so the composite
/// predicates always test the town as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenizenQuery {
    Town { town: u8 },
    Residence { town: u8, residence: u16 },
    Workplace { town: u8, workplace: u8 },
}

impl DenizenQuery {
    fn terms(&self) -> [(StateField, u64); 2] {
        match *self {
            DenizenQuery::Town { town } => {
                [(StateField::Town, town.into()), (StateField::Town, town.into())]
            }
            DenizenQuery::Residence { town, residence } => [
                (StateField::Residence, residence.into()),
                (StateField::Town, town.into()),
            ],
            DenizenQuery::Workplace { town, workplace } => [
                (StateField::Workplace, workplace.into()),
                (StateField::Town, town.into()),
            ],
        }
    }

    /// Whether a packed state word satisfies the predicate
    pub fn matches(&self, word: u64) -> bool {
        StateMatcher::new(*self).is_some_and(|m| m.matches(word))
    }
}

/// A query folded into one mask and one expected pattern
#[derive(Debug, Clone, Copy)]
struct StateMatcher {
    mask: u64,
    expected: u64,
}

impl StateMatcher {
    /// `None` when a queried value cannot be stored, so nothing can match
    fn new(query: DenizenQuery) -> Option<Self> {
        let mut mask = 0;
        let mut expected = 0;
        for (field, value) in query.terms() {
            if !field.spec().fits(value) {
                return None;
            }
            mask |= field.mask();
            expected |= value << field.shift();
        }
        Some(Self { mask, expected })
    }

    #[inline]
    fn matches(&self, word: u64) -> bool {
        word & self.mask == self.expected
    }

    /// Push the ids of matching words; `words[0]` has id `base`
    #[inline]
    fn scan(&self, words: &[u64], base: DenizenId, ids: &mut Vec<DenizenId>) {
        ids.extend(
            words
                .iter()
                .enumerate()
                .filter(|&(_, &word)| self.matches(word))
                .map(|(offset, _)| base + offset),
        );
    }
}

impl StateStore {
    /// Sequential scan of the whole population
    pub fn find_all(&self, query: DenizenQuery, ids: &mut Vec<DenizenId>) {
        ids.clear();
        if let Some(matcher) = StateMatcher::new(query) {
            matcher.scan(self.words(), 0, ids);
        }
    }

    /// Parallel scan of the whole population
    ///
    /// The population is cut into one contiguous chunk per worker (see
    /// [`crate::core::config::EngineConfig::chunk_count`]). Result order is
    /// unspecified.
    pub fn find_all_parallel(&self, query: DenizenQuery, ids: &mut Vec<DenizenId>) {
        ids.clear();
        let Some(matcher) = StateMatcher::new(query) else {
            return;
        };
        let words = self.words();
        if words.is_empty() {
            return;
        }

        let chunk_size = words.len().div_ceil(config().chunk_count());
        let found = Mutex::new(Vec::new());
        rayon::scope(|scope| {
            for (chunk_index, chunk) in words.chunks(chunk_size).enumerate() {
                spawn_scan(scope, &found, matcher, chunk, chunk_index * chunk_size);
            }
        });
        ids.extend(found.into_inner().unwrap_or_else(PoisonError::into_inner));
    }

    /// Sequential scan restricted to a sample's ranges
    pub fn find_in_sample(
        &self,
        sample: &PopulationSample,
        query: DenizenQuery,
        ids: &mut Vec<DenizenId>,
    ) {
        ids.clear();
        let Some(matcher) = StateMatcher::new(query) else {
            return;
        };
        for range in sample.ranges() {
            let range = self.clamp(*range);
            matcher.scan(&self.words()[range.ids()], range.start, ids);
        }
    }

    /// Parallel scan with one task per sample range
    ///
    /// Usually slower than [`Self::find_in_sample`]: samples tend to hold
    /// many small ranges and per-task dispatch dominates. Result order is
    /// unspecified.
    pub fn find_in_sample_parallel(
        &self,
        sample: &PopulationSample,
        query: DenizenQuery,
        ids: &mut Vec<DenizenId>,
    ) {
        ids.clear();
        let Some(matcher) = StateMatcher::new(query) else {
            return;
        };

        let found = Mutex::new(Vec::new());
        rayon::scope(|scope| {
            for range in sample.ranges() {
                let range = self.clamp(*range);
                spawn_scan(scope, &found, matcher, &self.words()[range.ids()], range.start);
            }
        });
        ids.extend(found.into_inner().unwrap_or_else(PoisonError::into_inner));
    }

    fn clamp(&self, range: IndexRange) -> IndexRange {
        let end = range.end.min(self.len());
        IndexRange::new(range.start.min(end), end)
    }
}

fn spawn_scan<'scope>(
    scope: &Scope<'scope>,
    found: &'scope Mutex<Vec<DenizenId>>,
    matcher: StateMatcher,
    words: &'scope [u64],
    base: DenizenId,
) {
    scope.spawn(move |_| {
        let mut local = Vec::new();
        matcher.scan(words, base, &mut local);
        if !local.is_empty() {
            found
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .extend(local);
        }
    });
}

impl PopulationSample {
    /// Members of this sample whose state satisfies `query`
    pub fn with_state(&self, store: &StateStore, query: DenizenQuery) -> PopulationSample {
        let mut ids = Vec::new();
        store.find_in_sample(self, query, &mut ids);
        PopulationSample::from_ids(self.tree().clone(), &ids)
    }

    pub fn with_town(&self, store: &StateStore, town: u8) -> PopulationSample {
        self.with_state(store, DenizenQuery::Town { town })
    }

    pub fn with_residence(&self, store: &StateStore, town: u8, residence: u16) -> PopulationSample {
        self.with_state(store, DenizenQuery::Residence { town, residence })
    }

    pub fn with_workplace(&self, store: &StateStore, town: u8, workplace: u8) -> PopulationSample {
        self.with_state(store, DenizenQuery::Workplace { town, workplace })
    }
}
