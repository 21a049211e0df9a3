//! Population samples: id sets expressed as sorted, disjoint ranges

use std::sync::Arc;

use crate::core::error::Result;
use crate::core::types::{DenizenId, TreeDepth};
use crate::denizen::traits::{Age, Demographic, Gender, Job, Race};
use crate::population::range::{merge_adjacent, IndexRange};
use crate::population::tree::PopulationTree;

/// A set of denizens drawn from one population tree
///
/// Ranges are kept ascending, disjoint and non-adjacent, so two samples
/// describing the same ids always compare equal range for range.
#[derive(Debug, Clone)]
pub struct PopulationSample {
    tree: Arc<PopulationTree>,
    ranges: Vec<IndexRange>,
}

impl PopulationSample {
    pub fn new(tree: Arc<PopulationTree>, mut ranges: Vec<IndexRange>) -> Self {
        ranges.sort_unstable();
        Self {
            tree,
            ranges: merge_adjacent(ranges),
        }
    }

    /// Sample holding exactly the given ids
    pub fn from_ids(tree: Arc<PopulationTree>, ids: &[DenizenId]) -> Self {
        Self {
            tree,
            ranges: IndexRange::condense(ids),
        }
    }

    pub fn tree(&self) -> &Arc<PopulationTree> {
        &self.tree
    }

    pub fn ranges(&self) -> &[IndexRange] {
        &self.ranges
    }

    /// Number of denizens in the sample
    pub fn count(&self) -> usize {
        self.ranges.iter().map(IndexRange::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, id: DenizenId) -> bool {
        let at = self.ranges.partition_point(|range| range.end <= id);
        self.ranges.get(at).is_some_and(|range| range.contains(id))
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = DenizenId> + '_ {
        self.ranges.iter().flat_map(IndexRange::ids)
    }

    /// The `n`-th id in ascending order
    pub fn nth_id(&self, mut n: usize) -> Option<DenizenId> {
        for range in &self.ranges {
            if n < range.len() {
                return Some(range.start + n);
            }
            n -= range.len();
        }
        None
    }

    /// Narrow to the members of `group` at `depth`
    ///
    /// Narrowing intersects with the tree's ranges for that group, so
    /// applying filters in any order yields the same sample.
    pub fn query(&self, depth: usize, group: usize) -> Result<Self> {
        let group_ranges = self.tree.ranges_at(depth, group)?;
        Ok(Self {
            tree: Arc::clone(&self.tree),
            ranges: IndexRange::intersect_all(&self.ranges, &group_ranges),
        })
    }

    pub fn region(&self, region: usize) -> Result<Self> {
        self.query(TreeDepth::Region.index(), region)
    }

    /// Narrow to one value of a census dimension
    pub fn demographic<D: Demographic>(&self, value: D) -> Result<Self> {
        self.query(D::DEPTH.index(), value.index())
    }

    pub fn gender(&self, gender: Gender) -> Result<Self> {
        self.demographic(gender)
    }

    pub fn age(&self, age: Age) -> Result<Self> {
        self.demographic(age)
    }

    pub fn race(&self, race: Race) -> Result<Self> {
        self.demographic(race)
    }

    pub fn job(&self, job: Job) -> Result<Self> {
        self.demographic(job)
    }
}

impl PartialEq for PopulationSample {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.ranges == other.ranges
    }
}

impl Eq for PopulationSample {}
