//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Dense index of a denizen in the population buffer
pub type DenizenId = usize;

/// Named levels of the population partition tree
///
/// Depth 0 is the unsliced root; each following depth splits every node of
/// the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreeDepth {
    Root = 0,
    Region = 1,
    Gender = 2,
    Age = 3,
    Race = 4,
    Job = 5,
}

impl TreeDepth {
    /// Demographic depths sliced from census data, in slicing order
    pub const CENSUS: [TreeDepth; 4] = [
        TreeDepth::Gender,
        TreeDepth::Age,
        TreeDepth::Race,
        TreeDepth::Job,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Depth of this level within a census hierarchy (gender = 0)
    pub const fn census_level(self) -> Option<usize> {
        match self {
            TreeDepth::Root | TreeDepth::Region => None,
            _ => Some(self as usize - TreeDepth::Gender as usize),
        }
    }
}

/// Filter applied to the in-use flag when picking random denizens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InUseFilter {
    InUse,
    NotInUse,
    #[default]
    Either,
}

impl InUseFilter {
    #[inline]
    pub fn accepts(self, in_use: bool) -> bool {
        match self {
            InUseFilter::InUse => in_use,
            InUseFilter::NotInUse => !in_use,
            InUseFilter::Either => true,
        }
    }
}
