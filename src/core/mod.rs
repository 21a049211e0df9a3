pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, EngineConfig};
pub use error::{PopulationError, Result};
pub use types::{DenizenId, InUseFilter, TreeDepth};
