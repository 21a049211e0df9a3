//! Census hierarchy: nested demographic weight levels
//!
//! A region's census is an ordered list of weight arrays, one per
//! demographic dimension (gender, age, race, job). Level `d` is split once
//! for every group combination of the levels above it, which is what
//! tiling reproduces.

use crate::core::error::{PopulationError, Result};

/// Immutable, indexed chain of census levels
#[derive(Debug, Clone, PartialEq)]
pub struct CensusHierarchy {
    levels: Vec<Vec<f64>>,
}

impl CensusHierarchy {
    /// Build from levels ordered top (gender) to bottom (job)
    pub fn new(levels: Vec<Vec<f64>>) -> Self {
        Self { levels }
    }

    pub fn depth_count(&self) -> usize {
        self.levels.len()
    }

    /// Weights at `depth`
    pub fn at_depth(&self, depth: usize) -> Result<&[f64]> {
        self.levels
            .get(depth)
            .map(Vec::as_slice)
            .ok_or(self.invalid_depth(depth))
    }

    /// Splits already made above `depth`: the product of the lengths of
    /// every level above it
    pub fn tile_factor(&self, depth: usize) -> Result<usize> {
        if depth >= self.levels.len() {
            return Err(self.invalid_depth(depth));
        }
        Ok(self.levels[..depth].iter().map(Vec::len).product())
    }

    /// The weights at `depth`, once per split above it
    pub fn tiled_at_depth(&self, depth: usize) -> Result<Vec<&[f64]>> {
        let weights = self.at_depth(depth)?;
        Ok(vec![weights; self.tile_factor(depth)?])
    }

    /// [`Self::tiled_at_depth`] concatenated into one flat array
    pub fn flattened_tiled_at_depth(&self, depth: usize) -> Result<Vec<f64>> {
        Ok(self.tiled_at_depth(depth)?.concat())
    }

    fn invalid_depth(&self, depth: usize) -> PopulationError {
        PopulationError::InvalidDepth {
            depth,
            max: self.levels.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> CensusHierarchy {
        CensusHierarchy::new(vec![
            vec![0.5, 0.5],
            vec![0.2, 0.3, 0.5],
            vec![0.9, 0.1],
        ])
    }

    #[test]
    fn test_at_depth() {
        let census = hierarchy();
        assert_eq!(census.at_depth(1).unwrap(), &[0.2, 0.3, 0.5]);
        assert!(census.at_depth(3).is_err());
    }

    #[test]
    fn test_tiled_at_depth_repeats_per_split_above() {
        let census = hierarchy();
        assert_eq!(census.tiled_at_depth(0).unwrap().len(), 1);
        assert_eq!(census.tiled_at_depth(1).unwrap().len(), 2);

        let tiled = census.tiled_at_depth(2).unwrap();
        assert_eq!(tiled.len(), 6);
        assert!(tiled.iter().all(|tile| *tile == [0.9, 0.1]));
    }

    #[test]
    fn test_flattened_tiling() {
        let census = hierarchy();
        let flat = census.flattened_tiled_at_depth(1).unwrap();
        assert_eq!(flat, vec![0.2, 0.3, 0.5, 0.2, 0.3, 0.5]);
    }

    #[test]
    fn test_out_of_range_depth_fails() {
        let census = hierarchy();
        assert!(matches!(
            census.tiled_at_depth(4),
            Err(PopulationError::InvalidDepth { depth: 4, max: 3 })
        ));
        assert!(census.flattened_tiled_at_depth(3).is_err());
    }
}
