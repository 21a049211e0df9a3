//! Lays out a kingdom's demographics over the population tree
//!
//! Regions are sliced first by their share of the kingdom. Each census
//! dimension is then sliced with a jagged share list: for every region, that
//! region's weights at the dimension, repeated once per split already made
//! above it within the region. Concatenated in region order, the list lines
//! up one-to-one with the nodes of the previous depth.

use crate::core::error::{PopulationError, Result};
use crate::core::types::TreeDepth;
use crate::population::census::CensusHierarchy;
use crate::population::kingdom::KingdomDefinition;
use crate::population::tree::PopulationTree;

/// Slice `tree` by region, gender, age, race and job
pub fn slice_population(tree: &mut PopulationTree, kingdom: &KingdomDefinition) -> Result<()> {
    if tree.max_depth() != TreeDepth::Region.index() {
        return Err(PopulationError::InvalidDepth {
            depth: TreeDepth::Region.index(),
            max: tree.max_depth() + 1,
        });
    }

    tree.slice(TreeDepth::Region.index(), &kingdom.region_shares())?;

    let censuses: Vec<CensusHierarchy> = kingdom
        .regions
        .iter()
        .map(|region| region.census.as_hierarchy())
        .collect();

    for depth in TreeDepth::CENSUS {
        let shares = tiled_shares(&censuses, depth)?;
        tree.jagged_slice(depth.index(), &shares)?;
    }

    tracing::info!(
        "Sliced {} denizens across {} regions to depth {}",
        tree.population_size(),
        kingdom.regions.len(),
        tree.max_depth() - 1
    );
    Ok(())
}

/// Share arrays for one census depth, tiled per region and concatenated
pub fn tiled_shares(censuses: &[CensusHierarchy], depth: TreeDepth) -> Result<Vec<&[f64]>> {
    let level = depth.census_level().ok_or(PopulationError::InvalidDepth {
        depth: depth.index(),
        max: TreeDepth::Job.index() + 1,
    })?;

    let mut shares = Vec::new();
    for census in censuses {
        shares.extend(census.tiled_at_depth(level)?);
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::range::IndexRange;

    const KINGDOM: &str = include_str!("../../data/kingdoms/two_regions.toml");

    fn sliced() -> PopulationTree {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        let mut tree = PopulationTree::new(kingdom.total_population);
        slice_population(&mut tree, &kingdom).unwrap();
        tree
    }

    #[test]
    fn test_tree_depths_and_groups() {
        let tree = sliced();
        assert_eq!(tree.max_depth(), TreeDepth::Job.index() + 1);
        assert_eq!(tree.group_count(TreeDepth::Region.index()).unwrap(), 2);
        assert_eq!(tree.group_count(TreeDepth::Gender.index()).unwrap(), 2);
        assert_eq!(tree.group_count(TreeDepth::Age.index()).unwrap(), 6);
        assert_eq!(tree.group_count(TreeDepth::Race.index()).unwrap(), 6);
        assert_eq!(tree.group_count(TreeDepth::Job.index()).unwrap(), 23);
    }

    #[test]
    fn test_node_counts_follow_tiling() {
        let tree = sliced();
        let expected = [1, 2, 4, 24, 144, 3312];
        for (depth, count) in expected.iter().enumerate() {
            assert_eq!(tree.nodes(depth).unwrap().len(), *count, "depth {}", depth);
        }
    }

    #[test]
    fn test_region_ranges() {
        let tree = sliced();
        assert_eq!(
            tree.ranges_at(TreeDepth::Region.index(), 0).unwrap(),
            vec![IndexRange::new(0, 4000)]
        );
        assert_eq!(
            tree.ranges_at(TreeDepth::Region.index(), 1).unwrap(),
            vec![IndexRange::new(4000, 10_000)]
        );
    }

    #[test]
    fn test_tiled_shares_rejects_non_census_depth() {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        let censuses: Vec<_> = kingdom
            .regions
            .iter()
            .map(|r| r.census.as_hierarchy())
            .collect();
        assert!(tiled_shares(&censuses, TreeDepth::Region).is_err());
        assert_eq!(tiled_shares(&censuses, TreeDepth::Age).unwrap().len(), 4);
    }

    #[test]
    fn test_slicing_twice_fails() {
        let kingdom = KingdomDefinition::from_toml(KINGDOM).unwrap();
        let mut tree = sliced();
        assert!(matches!(
            slice_population(&mut tree, &kingdom),
            Err(PopulationError::InvalidDepth { .. })
        ));
    }
}
