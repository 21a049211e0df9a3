//! Decoded, read-only views of a denizen

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::DenizenId;
use crate::denizen::traits::{Age, Gender, Job, Race};

/// Coarse map location: which region and which town within it
///
/// Not meant for placing a denizen in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldCoord {
    pub region: u8,
    pub town: u8,
}

impl WorldCoord {
    pub fn new(region: u8, town: u8) -> Self {
        Self { region, town }
    }
}

/// Snapshot of a denizen's identity
///
/// Demographics come from the denizen's position in the population tree;
/// the town comes from its packed state at the time of decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenizenRecord {
    pub id: DenizenId,
    pub home: WorldCoord,
    pub gender: Gender,
    pub age: Age,
    pub race: Race,
    pub job: Job,
}

impl fmt::Display for DenizenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Denizen {} ({:?} {:?} {:?} {:?}) of region {} town {}",
            self.id, self.age, self.gender, self.race, self.job, self.home.region, self.home.town
        )
    }
}
