//! Denizens - procedural population database
//!
//! A kingdom's population is a flat range of denizen ids. Demographics
//! (region, gender, age, race, job) are never stored per denizen; they are
//! implied by where an id falls in a census-sliced partition tree. Mutable
//! per-denizen state lives in one packed `u64` word each.

pub mod core;
pub mod database;
pub mod denizen;
pub mod population;

pub use crate::core::error::{PopulationError, Result};
pub use crate::core::types::{DenizenId, InUseFilter, TreeDepth};
pub use database::DenizenDatabase;
pub use denizen::{DenizenQuery, DenizenRecord, WorldCoord};
pub use population::{KingdomDefinition, PopulationSample, PopulationTree};
