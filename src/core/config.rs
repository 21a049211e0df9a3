//! Engine configuration with documented constants
//!
//! Tunables for construction-time validation, random selection and the
//! parallel query fan-out live here rather than as scattered literals.

/// Configuration for the population engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // === CENSUS VALIDATION ===
    /// Allowed deviation of an authored share array from a total of 1.0
    ///
    /// Shares are never renormalised. Anything within this tolerance is
    /// accepted and the rounding residue lands in the last group of each
    /// split; anything outside it rejects the kingdom at load time.
    pub share_tolerance: f64,

    // === RANDOM SELECTION ===
    /// Rejection-sampling draws per requested id before falling back to
    /// an exhaustive candidate scan
    ///
    /// At 8, a sample that is at least ~20% eligible almost never reaches
    /// the fallback.
    pub random_attempts_per_id: usize,

    // === PARALLELIZATION ===
    /// Number of chunks a global parallel scan is split into
    ///
    /// `None` derives the count from the rayon pool, which is sized to the
    /// available hardware threads.
    pub parallel_chunks: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            share_tolerance: 1e-3,
            random_attempts_per_id: 8,
            parallel_chunks: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk count used by global parallel scans
    pub fn chunk_count(&self) -> usize {
        self.parallel_chunks
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..0.5).contains(&self.share_tolerance) {
            return Err(format!(
                "share_tolerance ({}) must be within [0, 0.5)",
                self.share_tolerance
            ));
        }

        if self.random_attempts_per_id == 0 {
            return Err("random_attempts_per_id must be positive".into());
        }

        if self.parallel_chunks == Some(0) {
            return Err("parallel_chunks must be positive when set".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> Result<(), EngineConfig> {
    CONFIG.set(config)
}
