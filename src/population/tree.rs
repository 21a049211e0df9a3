//! Population partition tree
//!
//! The flat population buffer `[0, population)` is split level by level.
//! Depth 0 is a single root node; every later depth splits each node of the
//! previous depth into proportionally sized, contiguous children. Levels are
//! stored as flat arenas in breadth-first order, so every level's nodes are
//! ascending, disjoint, and cover the whole population.

use std::sync::Arc;

use crate::core::error::{PopulationError, Result};
use crate::core::types::DenizenId;
use crate::population::range::{merge_adjacent, IndexRange};
use crate::population::sample::PopulationSample;

/// One slice of the population at some depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    pub range: IndexRange,
    /// Index of the parent node within the previous level
    pub parent: usize,
    /// Position among the parent's children (the group this node belongs to)
    pub group: usize,
}

#[derive(Debug, Clone)]
struct TreeLevel {
    nodes: Vec<TreeNode>,
    group_count: usize,
}

/// Multi-level proportional partition of a population buffer
#[derive(Debug, Clone)]
pub struct PopulationTree {
    population: usize,
    levels: Vec<TreeLevel>,
}

impl PopulationTree {
    pub fn new(population: usize) -> Self {
        let root = TreeNode {
            range: IndexRange::new(0, population),
            parent: 0,
            group: 0,
        };
        Self {
            population,
            levels: vec![TreeLevel {
                nodes: vec![root],
                group_count: 1,
            }],
        }
    }

    pub fn population_size(&self) -> usize {
        self.population
    }

    /// Number of levels, root included
    pub fn max_depth(&self) -> usize {
        self.levels.len()
    }

    /// Split every node at `depth - 1` by the same shares
    pub fn slice(&mut self, depth: usize, shares: &[f64]) -> Result<()> {
        self.ensure_next_depth(depth)?;
        let parents = self.levels[depth - 1].nodes.len();
        let per_parent = vec![shares; parents];
        self.jagged_slice(depth, &per_parent)
    }

    /// Split each node at `depth - 1` by its own share array
    ///
    /// `shares[i]` applies to the i-th node of the previous level in
    /// breadth-first order.
    pub fn jagged_slice<S: AsRef<[f64]>>(&mut self, depth: usize, shares: &[S]) -> Result<()> {
        self.ensure_next_depth(depth)?;
        let parents = &self.levels[depth - 1].nodes;
        if parents.len() != shares.len() {
            return Err(PopulationError::ShareCountMismatch {
                depth,
                expected: parents.len(),
                got: shares.len(),
            });
        }

        let mut nodes = Vec::with_capacity(shares.iter().map(|s| s.as_ref().len()).sum());
        let mut group_count = 0;
        for (parent_index, (parent, parent_shares)) in parents.iter().zip(shares).enumerate() {
            let parent_shares = parent_shares.as_ref();
            group_count = group_count.max(parent_shares.len());
            nodes.extend(
                split_proportionally(parent.range, parent_shares)
                    .into_iter()
                    .enumerate()
                    .map(|(group, range)| TreeNode {
                        range,
                        parent: parent_index,
                        group,
                    }),
            );
        }

        tracing::debug!(
            "Sliced depth {} into {} nodes across {} groups",
            depth,
            nodes.len(),
            group_count
        );
        self.levels.push(TreeLevel { nodes, group_count });
        Ok(())
    }

    /// Number of distinct groups sliced at `depth`
    pub fn group_count(&self, depth: usize) -> Result<usize> {
        Ok(self.level(depth)?.group_count)
    }

    /// Every node at `depth`, in ascending id order
    pub fn nodes(&self, depth: usize) -> Result<&[TreeNode]> {
        Ok(&self.level(depth)?.nodes)
    }

    /// Id ranges of every node belonging to `group` at `depth`
    pub fn ranges_at(&self, depth: usize, group: usize) -> Result<Vec<IndexRange>> {
        let level = self.level(depth)?;
        if group >= level.group_count {
            return Err(PopulationError::InvalidGroupIndex {
                depth,
                index: group,
                groups: level.group_count,
            });
        }
        let ranges = level
            .nodes
            .iter()
            .filter(|node| node.group == group)
            .map(|node| node.range)
            .collect();
        Ok(merge_adjacent(ranges))
    }

    /// Group index of `id` at every depth, root (always 0) first
    pub fn remap(&self, id: DenizenId) -> Result<Vec<usize>> {
        if id >= self.population {
            return Err(PopulationError::DenizenOutOfRange {
                id,
                population: self.population,
            });
        }
        self.levels
            .iter()
            .map(|level| {
                // Nodes are contiguous, so the first node ending past `id` holds it
                let at = level.nodes.partition_point(|node| node.range.end <= id);
                level
                    .nodes
                    .get(at)
                    .map(|node| node.group)
                    .ok_or(PopulationError::DenizenOutOfRange {
                        id,
                        population: self.population,
                    })
            })
            .collect()
    }

    /// The whole population as a sample
    pub fn query(self: &Arc<Self>) -> PopulationSample {
        PopulationSample::new(
            Arc::clone(self),
            vec![IndexRange::new(0, self.population)],
        )
    }

    fn level(&self, depth: usize) -> Result<&TreeLevel> {
        self.levels.get(depth).ok_or(PopulationError::InvalidDepth {
            depth,
            max: self.levels.len(),
        })
    }

    fn ensure_next_depth(&self, depth: usize) -> Result<()> {
        if depth == 0 || depth != self.levels.len() {
            return Err(PopulationError::InvalidDepth {
                depth,
                max: self.levels.len() + 1,
            });
        }
        Ok(())
    }
}

/// Split `range` into one contiguous child per share
///
/// Boundaries come from rounding the cumulative share, so children never
/// overlap and the last child always ends at `range.end`, absorbing any drift
/// in the share total.
fn split_proportionally(range: IndexRange, shares: &[f64]) -> Vec<IndexRange> {
    let len = range.len() as f64;
    let mut children = Vec::with_capacity(shares.len());
    let mut cumulative = 0.0;
    let mut start = range.start;

    for (i, share) in shares.iter().enumerate() {
        let end = if i + 1 == shares.len() {
            range.end
        } else {
            cumulative += share.max(0.0);
            let offset = (len * cumulative).round() as usize;
            (range.start + offset).clamp(start, range.end)
        };
        children.push(IndexRange::new(start, end));
        start = end;
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(tree: &PopulationTree, depth: usize) {
        let nodes = tree.nodes(depth).unwrap();
        let mut next = 0;
        for node in nodes {
            assert_eq!(node.range.start, next, "gap or overlap at depth {}", depth);
            next = node.range.end;
        }
        assert_eq!(next, tree.population_size());
    }

    #[test]
    fn test_split_proportionally() {
        let children = split_proportionally(IndexRange::new(0, 10_000), &[0.4, 0.6]);
        assert_eq!(
            children,
            vec![IndexRange::new(0, 4000), IndexRange::new(4000, 10_000)]
        );
    }

    #[test]
    fn test_split_absorbs_drift_in_last_child() {
        let children = split_proportionally(IndexRange::new(100, 110), &[0.3, 0.3, 0.3]);
        assert_eq!(children.last().unwrap().end, 110);
        assert_eq!(children.iter().map(|c| c.len()).sum::<usize>(), 10);
    }

    #[test]
    fn test_split_keeps_empty_groups() {
        let children = split_proportionally(IndexRange::new(0, 3), &[0.0, 1.0, 0.0]);
        assert_eq!(children.len(), 3);
        assert!(children[0].is_empty());
        assert_eq!(children[1], IndexRange::new(0, 3));
        assert!(children[2].is_empty());
    }

    #[test]
    fn test_slice_and_jagged_slice_cover_population() {
        let mut tree = PopulationTree::new(1000);
        tree.slice(1, &[0.25, 0.75]).unwrap();
        tree.jagged_slice(2, &[vec![0.5, 0.5], vec![0.1, 0.2, 0.7]])
            .unwrap();

        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.group_count(1).unwrap(), 2);
        assert_eq!(tree.group_count(2).unwrap(), 3);
        for depth in 0..tree.max_depth() {
            assert_covers(&tree, depth);
        }
    }

    #[test]
    fn test_slice_rejects_skipped_depth() {
        let mut tree = PopulationTree::new(100);
        assert!(matches!(
            tree.slice(2, &[1.0]),
            Err(PopulationError::InvalidDepth { depth: 2, .. })
        ));
        assert!(tree.slice(0, &[1.0]).is_err());
    }

    #[test]
    fn test_jagged_slice_rejects_wrong_parent_count() {
        let mut tree = PopulationTree::new(100);
        tree.slice(1, &[0.5, 0.5]).unwrap();
        let err = tree.jagged_slice(2, &[vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            PopulationError::ShareCountMismatch {
                depth: 2,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn test_remap() {
        let mut tree = PopulationTree::new(100);
        tree.slice(1, &[0.5, 0.5]).unwrap();
        tree.slice(2, &[0.2, 0.8]).unwrap();

        assert_eq!(tree.remap(0).unwrap(), vec![0, 0, 0]);
        assert_eq!(tree.remap(15).unwrap(), vec![0, 0, 1]);
        assert_eq!(tree.remap(55).unwrap(), vec![0, 1, 0]);
        assert_eq!(tree.remap(99).unwrap(), vec![0, 1, 1]);
        assert!(tree.remap(100).is_err());
    }

    #[test]
    fn test_ranges_at_invalid_group() {
        let mut tree = PopulationTree::new(100);
        tree.slice(1, &[0.5, 0.5]).unwrap();
        assert!(matches!(
            tree.ranges_at(1, 2),
            Err(PopulationError::InvalidGroupIndex { groups: 2, .. })
        ));
        assert!(matches!(
            tree.ranges_at(4, 0),
            Err(PopulationError::InvalidDepth { depth: 4, max: 2 })
        ));
    }
}
