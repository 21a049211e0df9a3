//! Denizen state: packed layout, store, vocabularies and queries

pub mod layout;
pub mod query;
pub mod record;
pub mod state;
pub mod traits;

pub use layout::{FieldSpec, StateField, LAYOUT};
pub use query::DenizenQuery;
pub use record::{DenizenRecord, WorldCoord};
pub use state::StateStore;
pub use traits::{Age, Demographic, Faction, Gender, GroupIndex, Job, Personality, Race};
