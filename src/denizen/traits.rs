//! Demographic and role vocabularies of the fantasy setting
//!
//! Every vocabulary is a [`GroupIndex`]: a dense enumeration addressed by
//! ordinal. Gender, age, race and job are also [`Demographic`] dimensions,
//! assigned by the census slicing of the population tree. Faction and
//! personality are mutable role fields held in the packed state.

use serde::{Deserialize, Serialize};

use crate::core::error::{PopulationError, Result};
use crate::core::types::TreeDepth;

/// An enumeration whose values are addressed by a dense group index
pub trait GroupIndex: Copy + Sized + 'static {
    /// Dimension name used in error messages
    const DIMENSION: &'static str;
    /// Every value, in group-index order
    const ALL: &'static [Self];

    fn index(self) -> usize;

    fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PopulationError::UnknownGroup {
                dimension: Self::DIMENSION,
                index,
            })
    }

    fn count() -> usize {
        Self::ALL.len()
    }
}

/// A census dimension, sliced into the population tree at a fixed depth
pub trait Demographic: GroupIndex {
    const DEPTH: TreeDepth;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl GroupIndex for Gender {
    const DIMENSION: &'static str = "gender";
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Age {
    Infant,
    Child,
    Teen,
    YoungAdult,
    MiddleAged,
    Elderly,
}

impl GroupIndex for Age {
    const DIMENSION: &'static str = "age";
    const ALL: &'static [Self] = &[
        Age::Infant,
        Age::Child,
        Age::Teen,
        Age::YoungAdult,
        Age::MiddleAged,
        Age::Elderly,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    DarkElf,
    Shagga,
    Mark,
    Ocarim,
}

impl GroupIndex for Race {
    const DIMENSION: &'static str = "race";
    const ALL: &'static [Self] = &[
        Race::Human,
        Race::Elf,
        Race::DarkElf,
        Race::Shagga,
        Race::Mark,
        Race::Ocarim,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Job {
    // Specialty
    Adventurer,

    // Civil
    Laborer,
    Farmer,
    Carpenter,
    Smithy,
    Clothier,
    Armorer,
    Alchemist,
    Merchant,
    Librarian,
    Scholar,
    Magician,

    // Enforcement
    Militia,
    Officer,

    // Religious
    Clergy,

    // Military
    Soldier,
    MilitaryOfficer,

    // Nobility
    Noble,
    Royalty,

    // Underworld
    Thief,
    Thug,
    Assassin,
    CriminalOverlord,
}

impl GroupIndex for Job {
    const DIMENSION: &'static str = "job";
    const ALL: &'static [Self] = &[
        Job::Adventurer,
        Job::Laborer,
        Job::Farmer,
        Job::Carpenter,
        Job::Smithy,
        Job::Clothier,
        Job::Armorer,
        Job::Alchemist,
        Job::Merchant,
        Job::Librarian,
        Job::Scholar,
        Job::Magician,
        Job::Militia,
        Job::Officer,
        Job::Clergy,
        Job::Soldier,
        Job::MilitaryOfficer,
        Job::Noble,
        Job::Royalty,
        Job::Thief,
        Job::Thug,
        Job::Assassin,
        Job::CriminalOverlord,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Civil faction a denizen answers to
///
/// Stored in the state word by ordinal, so `None` plus seven named factions
/// fit the 4-bit field with room to spare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    None,
    Commoner,
    Nobility,
    Scholar,
    Underworld,
    Law,
    Merchant,
    Clergy,
}

impl GroupIndex for Faction {
    const DIMENSION: &'static str = "faction";
    const ALL: &'static [Self] = &[
        Faction::None,
        Faction::Commoner,
        Faction::Nobility,
        Faction::Scholar,
        Faction::Underworld,
        Faction::Law,
        Faction::Merchant,
        Faction::Clergy,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Personality {
    #[default]
    Neutral,
    Aggressive,
    Timid,
    Cheerful,
    Gloomy,
    Greedy,
    Generous,
    Curious,
    Stoic,
    Zealous,
    Cunning,
    Honest,
}

impl GroupIndex for Personality {
    const DIMENSION: &'static str = "personality";
    const ALL: &'static [Self] = &[
        Personality::Neutral,
        Personality::Aggressive,
        Personality::Timid,
        Personality::Cheerful,
        Personality::Gloomy,
        Personality::Greedy,
        Personality::Generous,
        Personality::Curious,
        Personality::Stoic,
        Personality::Zealous,
        Personality::Cunning,
        Personality::Honest,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl Demographic for Gender {
    const DEPTH: TreeDepth = TreeDepth::Gender;
}

impl Demographic for Age {
    const DEPTH: TreeDepth = TreeDepth::Age;
}

impl Demographic for Race {
    const DEPTH: TreeDepth = TreeDepth::Race;
}

impl Demographic for Job {
    const DEPTH: TreeDepth = TreeDepth::Job;
}
