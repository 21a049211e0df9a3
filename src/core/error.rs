use thiserror::Error;

use crate::core::types::DenizenId;

#[derive(Error, Debug)]
pub enum PopulationError {
    #[error("Value {value} does not fit the {width}-bit {field} field")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        width: u32,
    },

    #[error("Denizen {id} is outside a population of {population}")]
    DenizenOutOfRange { id: DenizenId, population: usize },

    #[error("Invalid depth {depth}: valid depths are below {max}")]
    InvalidDepth { depth: usize, max: usize },

    #[error("Group index {index} at depth {depth} exceeds the {groups} groups sliced there")]
    InvalidGroupIndex {
        depth: usize,
        index: usize,
        groups: usize,
    },

    #[error("Depth {depth} has {expected} parent groups but {got} share arrays were supplied")]
    ShareCountMismatch {
        depth: usize,
        expected: usize,
        got: usize,
    },

    #[error("No {dimension} exists for index {index}")]
    UnknownGroup {
        dimension: &'static str,
        index: usize,
    },

    #[error("Invalid state layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("Invalid kingdom definition: {0}")]
    InvalidKingdom(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PopulationError>;
