//! Denizen database - population layout plus packed per-denizen state
//!
//! Construction slices the population tree from a kingdom definition and
//! freezes it; from then on the tree is shared read-only with every sample
//! drawn from it, while the state store is mutated through `&mut self`.

use std::sync::Arc;

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::config;
use crate::core::error::{PopulationError, Result};
use crate::core::types::{DenizenId, InUseFilter, TreeDepth};
use crate::denizen::layout::{self, StateField, LAYOUT};
use crate::denizen::query::DenizenQuery;
use crate::denizen::record::{DenizenRecord, WorldCoord};
use crate::denizen::state::StateStore;
use crate::denizen::traits::{Age, Faction, Gender, GroupIndex, Job, Personality, Race};
use crate::population::kingdom::KingdomDefinition;
use crate::population::sample::PopulationSample;
use crate::population::slicer::slice_population;
use crate::population::tree::PopulationTree;

/// The population of a fantasy kingdom
pub struct DenizenDatabase {
    seed: u64,
    rng: ChaCha8Rng,
    tree: Arc<PopulationTree>,
    states: StateStore,
}

impl DenizenDatabase {
    /// Lay out `kingdom` and allocate a free, zeroed state per denizen
    pub fn new(seed: u64, kingdom: &KingdomDefinition) -> Result<Self> {
        config().validate().map_err(PopulationError::InvalidConfig)?;
        layout::validate(&LAYOUT)?;
        kingdom.validate()?;

        let mut tree = PopulationTree::new(kingdom.total_population);
        slice_population(&mut tree, kingdom)?;

        tracing::info!(
            "Denizen database ready: {} denizens, seed {}",
            kingdom.total_population,
            seed
        );

        Ok(Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tree: Arc::new(tree),
            states: StateStore::new(kingdom.total_population),
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tree(&self) -> &Arc<PopulationTree> {
        &self.tree
    }

    pub fn states(&self) -> &StateStore {
        &self.states
    }

    pub fn population_size(&self) -> usize {
        self.tree.population_size()
    }

    /// The whole population as a sample
    pub fn query(&self) -> PopulationSample {
        self.tree.query()
    }

    /// Free every slot and zero all state
    pub fn reset_population_states(&mut self) {
        self.states.reset();
    }

    // === DECODING ===

    /// Decode a denizen's demographics and home town
    pub fn generate_denizen(&self, uid: DenizenId) -> Result<DenizenRecord> {
        let groups = self.tree.remap(uid)?;
        let group = |depth: TreeDepth| {
            groups
                .get(depth.index())
                .copied()
                .ok_or(PopulationError::InvalidDepth {
                    depth: depth.index(),
                    max: groups.len(),
                })
        };

        let region = group(TreeDepth::Region)?;
        let region = u8::try_from(region).map_err(|_| PopulationError::UnknownGroup {
            dimension: "region",
            index: region,
        })?;
        let town = self.states.try_get(uid, StateField::Town)? as u8;

        Ok(DenizenRecord {
            id: uid,
            home: WorldCoord::new(region, town),
            gender: Gender::from_index(group(TreeDepth::Gender)?)?,
            age: Age::from_index(group(TreeDepth::Age)?)?,
            race: Race::from_index(group(TreeDepth::Race)?)?,
            job: Job::from_index(group(TreeDepth::Job)?)?,
        })
    }

    // === RANDOM SELECTION ===

    /// A random member of `sample` whose in-use flag passes `filter`
    ///
    /// Returns `None` only when no member qualifies.
    pub fn random_id(&mut self, sample: &PopulationSample, filter: InUseFilter) -> Option<DenizenId> {
        let total = sample.count();
        if total == 0 {
            return None;
        }

        for _ in 0..config().random_attempts_per_id {
            let id = sample.nth_id(self.rng.gen_range(0..total))?;
            if self.passes(id, filter) {
                return Some(id);
            }
        }

        let offset = self.rng.gen_range(0..total);
        let mut wrapped = sample.iter().skip(offset).chain(sample.iter().take(offset));
        wrapped.find(|&id| self.passes(id, filter))
    }

    /// Up to `count` distinct random members of `sample` passing `filter`
    ///
    /// `ids` is cleared first. Fewer than `count` ids are returned only when
    /// the sample does not hold that many candidates.
    pub fn random_ids(
        &mut self,
        sample: &PopulationSample,
        filter: InUseFilter,
        count: usize,
        ids: &mut Vec<DenizenId>,
    ) {
        ids.clear();
        let total = sample.count();
        if total == 0 || count == 0 {
            return;
        }

        let mut chosen = AHashSet::with_capacity(count);
        if count.saturating_mul(2) <= total {
            let budget = count.saturating_mul(config().random_attempts_per_id);
            for _ in 0..budget {
                if ids.len() == count {
                    return;
                }
                let Some(id) = sample.nth_id(self.rng.gen_range(0..total)) else {
                    continue;
                };
                if self.passes(id, filter) && chosen.insert(id) {
                    ids.push(id);
                }
            }
            if ids.len() == count {
                return;
            }
        }

        let candidates: Vec<DenizenId> = sample
            .iter()
            .filter(|id| !chosen.contains(id) && self.passes(*id, filter))
            .collect();
        let needed = count - ids.len();
        ids.extend(candidates.choose_multiple(&mut self.rng, needed).copied());
    }

    fn passes(&self, uid: DenizenId, filter: InUseFilter) -> bool {
        self.states
            .try_get(uid, StateField::InUse)
            .is_ok_and(|in_use| filter.accepts(in_use == 1))
    }

    // === QUERIES ===

    /// Every denizen matching `query`, ascending
    pub fn find_all_ids(&self, query: DenizenQuery, ids: &mut Vec<DenizenId>) {
        self.states.find_all(query, ids);
    }

    /// Every denizen matching `query`, scanned in parallel, unordered
    pub fn find_all_ids_parallel(&self, query: DenizenQuery, ids: &mut Vec<DenizenId>) {
        self.states.find_all_parallel(query, ids);
    }

    /// Members of `sample` matching `query`, ascending
    pub fn find_sample_ids(
        &self,
        sample: &PopulationSample,
        query: DenizenQuery,
        ids: &mut Vec<DenizenId>,
    ) {
        self.states.find_in_sample(sample, query, ids);
    }

    /// Members of `sample` matching `query`, one task per range, unordered
    pub fn find_sample_ids_parallel(
        &self,
        sample: &PopulationSample,
        query: DenizenQuery,
        ids: &mut Vec<DenizenId>,
    ) {
        self.states.find_in_sample_parallel(sample, query, ids);
    }

    // === STATE READS ===
    // Getters panic when `uid` is outside the population.

    pub fn is_in_use(&self, uid: DenizenId) -> bool {
        self.states.get(uid, StateField::InUse) == 1
    }

    pub fn residence_id(&self, uid: DenizenId) -> u16 {
        self.states.get(uid, StateField::Residence) as u16
    }

    pub fn town_id(&self, uid: DenizenId) -> u8 {
        self.states.get(uid, StateField::Town) as u8
    }

    pub fn workplace_id(&self, uid: DenizenId) -> u8 {
        self.states.get(uid, StateField::Workplace) as u8
    }

    pub fn faction(&self, uid: DenizenId) -> Faction {
        Faction::from_index(self.states.get(uid, StateField::Faction) as usize).unwrap_or_default()
    }

    pub fn is_dead(&self, uid: DenizenId) -> bool {
        self.states.get(uid, StateField::Death) == 1
    }

    pub fn personality(&self, uid: DenizenId) -> Personality {
        Personality::from_index(self.states.get(uid, StateField::Personality) as usize)
            .unwrap_or_default()
    }

    pub fn schedule_table(&self, uid: DenizenId) -> u8 {
        self.states.get(uid, StateField::Schedule) as u8
    }

    // === STATE WRITES ===

    pub fn set_in_use(&mut self, uid: DenizenId, in_use: bool) -> Result<()> {
        self.states.set_flag(uid, StateField::InUse, in_use)
    }

    /// Fails for residence ids of 1024 and above
    pub fn set_residence_id(&mut self, uid: DenizenId, residence: u16) -> Result<()> {
        self.states
            .set(uid, StateField::Residence, residence.into())
    }

    pub fn set_town_id(&mut self, uid: DenizenId, town: u8) -> Result<()> {
        self.states.set(uid, StateField::Town, town.into())
    }

    /// Fails for workplace ids of 128 and above
    pub fn set_workplace_id(&mut self, uid: DenizenId, workplace: u8) -> Result<()> {
        self.states
            .set(uid, StateField::Workplace, workplace.into())
    }

    pub fn set_faction(&mut self, uid: DenizenId, faction: Faction) -> Result<()> {
        self.states
            .set(uid, StateField::Faction, faction.index() as u64)
    }

    pub fn set_dead(&mut self, uid: DenizenId, dead: bool) -> Result<()> {
        self.states.set_flag(uid, StateField::Death, dead)
    }

    pub fn set_personality(&mut self, uid: DenizenId, personality: Personality) -> Result<()> {
        self.states
            .set(uid, StateField::Personality, personality.index() as u64)
    }

    pub fn set_schedule_table(&mut self, uid: DenizenId, table: u8) -> Result<()> {
        self.states.set(uid, StateField::Schedule, table.into())
    }
}
