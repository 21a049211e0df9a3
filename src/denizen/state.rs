//! Packed per-denizen state store
//!
//! One `u64` per denizen id holds every mutable location/role field (see
//! [`crate::denizen::layout`]). Keeping the whole population in a single dense
//! array lets a predicate scan touch one word per denizen.
//!
//! Mutation requires `&mut StateStore`, so a scan borrowing the store can
//! never observe a half-written word. Writes are plain read-modify-write and
//! are not atomic.

use crate::core::error::{PopulationError, Result};
use crate::core::types::DenizenId;
use crate::denizen::layout::StateField;

/// Dense array of packed denizen states
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    states: Vec<u64>,
}

impl StateStore {
    /// Allocate `population` zeroed states (free, alive, every id 0)
    pub fn new(population: usize) -> Self {
        Self {
            states: vec![0; population],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Raw packed words, indexed by denizen id
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.states
    }

    /// Read one field of a denizen's state
    ///
    /// # Panics
    /// Panics if `uid` is outside the population.
    #[inline]
    pub fn get(&self, uid: DenizenId, field: StateField) -> u64 {
        read_field(self.states[uid], field)
    }

    /// Read one field, reporting an out-of-range id as an error
    pub fn try_get(&self, uid: DenizenId, field: StateField) -> Result<u64> {
        self.states
            .get(uid)
            .map(|&word| read_field(word, field))
            .ok_or(PopulationError::DenizenOutOfRange {
                id: uid,
                population: self.states.len(),
            })
    }

    /// Overwrite one field of a denizen's state
    ///
    /// The value is range-checked before the word is touched, so a rejected
    /// write leaves the state unchanged.
    pub fn set(&mut self, uid: DenizenId, field: StateField, value: u64) -> Result<()> {
        let spec = field.spec();
        if !spec.fits(value) {
            return Err(PopulationError::FieldOverflow {
                field: spec.name,
                value,
                width: spec.width,
            });
        }

        let population = self.states.len();
        let word = self
            .states
            .get_mut(uid)
            .ok_or(PopulationError::DenizenOutOfRange {
                id: uid,
                population,
            })?;
        *word = (*word & !spec.mask()) | (value << spec.offset);
        Ok(())
    }

    /// Set or clear a single-bit field
    pub fn set_flag(&mut self, uid: DenizenId, field: StateField, value: bool) -> Result<()> {
        self.set(uid, field, u64::from(value))
    }

    /// Zero every state word
    pub fn reset(&mut self) {
        self.states.fill(0);
    }
}

/// Mask-and-shift a field out of a packed word
#[inline]
pub fn read_field(word: u64, field: StateField) -> u64 {
    (word & field.mask()) >> field.shift()
}
