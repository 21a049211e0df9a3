//! Population layout
//!
//! Partitions the flat population buffer into nested demographic groups
//! (region, gender, age, race, job) from authored census data, and answers
//! group queries as sorted id ranges.

pub mod census;
pub mod kingdom;
pub mod range;
pub mod sample;
pub mod slicer;
pub mod tree;

pub use census::CensusHierarchy;
pub use kingdom::{Census, KingdomDefinition, MunicipalCounts, MunicipalPopulations, RegionDefinition};
pub use range::IndexRange;
pub use sample::PopulationSample;
pub use slicer::slice_population;
pub use tree::{PopulationTree, TreeNode};
