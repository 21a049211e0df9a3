//! Bit layout of the packed denizen state word
//!
//! The layout is a table of (field, width) rows. Offsets are assigned in
//! table order at compile time, so resizing or appending a field is a table
//! edit. The whole table is checked against the word size both at compile
//! time and by [`validate`].
//!
//! ```text
//!  bits   | field            | values
//! --------+------------------+--------
//!  0      | in-use           | 2
//!  1-10   | residence id     | 1024
//!  11-18  | town id          | 256
//!  19-25  | workplace id     | 128
//!  26-29  | civil faction    | 16
//!  30     | death state      | 2
//!  31-34  | personality      | 16
//!  35-42  | schedule table   | 256
//! ```

use crate::core::error::{PopulationError, Result};

/// Bits available in one state word
pub const WORD_BITS: u32 = u64::BITS;

/// A field of the packed denizen state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateField {
    InUse,
    Residence,
    Town,
    Workplace,
    Faction,
    Death,
    Personality,
    Schedule,
}

impl StateField {
    pub const ALL: [StateField; 8] = [
        StateField::InUse,
        StateField::Residence,
        StateField::Town,
        StateField::Workplace,
        StateField::Faction,
        StateField::Death,
        StateField::Personality,
        StateField::Schedule,
    ];

    #[inline]
    pub const fn spec(self) -> FieldSpec {
        LAYOUT[self as usize]
    }

    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    #[inline]
    pub const fn shift(self) -> u32 {
        self.spec().offset
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.spec().width
    }

    /// Largest value the field can hold
    #[inline]
    pub const fn max_value(self) -> u64 {
        self.spec().max_value()
    }

    /// Field bits in place within the word
    #[inline]
    pub const fn mask(self) -> u64 {
        self.spec().mask()
    }
}

/// One row of the layout table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: StateField,
    pub name: &'static str,
    pub offset: u32,
    pub width: u32,
}

impl FieldSpec {
    #[inline]
    pub const fn max_value(&self) -> u64 {
        if self.width >= WORD_BITS {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    #[inline]
    pub const fn mask(&self) -> u64 {
        self.max_value() << self.offset
    }

    #[inline]
    pub const fn fits(&self, value: u64) -> bool {
        value <= self.max_value()
    }
}

const ROWS: [(StateField, &str, u32); 8] = [
    (StateField::InUse, "in-use", 1),
    (StateField::Residence, "residence", 10),
    (StateField::Town, "town", 8),
    (StateField::Workplace, "workplace", 7),
    (StateField::Faction, "civil faction", 4),
    (StateField::Death, "death state", 1),
    (StateField::Personality, "personality", 4),
    (StateField::Schedule, "schedule table", 8),
];

const fn pack_rows(rows: [(StateField, &'static str, u32); 8]) -> [FieldSpec; 8] {
    let mut specs = [FieldSpec {
        field: StateField::InUse,
        name: "",
        offset: 0,
        width: 0,
    }; 8];
    let mut offset = 0;
    let mut i = 0;
    while i < rows.len() {
        let (field, name, width) = rows[i];
        specs[i] = FieldSpec {
            field,
            name,
            offset,
            width,
        };
        offset += width;
        i += 1;
    }
    specs
}

/// The packed state layout, indexed by `StateField as usize`
pub const LAYOUT: [FieldSpec; 8] = pack_rows(ROWS);

/// First bit not claimed by any field
pub const USED_BITS: u32 = {
    let last = LAYOUT[LAYOUT.len() - 1];
    last.offset + last.width
};

const fn layout_is_sound(layout: &[FieldSpec]) -> bool {
    let mut claimed = 0u64;
    let mut i = 0;
    while i < layout.len() {
        let spec = layout[i];
        if spec.width == 0 || spec.offset + spec.width > WORD_BITS {
            return false;
        }
        if spec.field as usize != i || claimed & spec.mask() != 0 {
            return false;
        }
        claimed |= spec.mask();
        i += 1;
    }
    true
}

const _: () = assert!(layout_is_sound(&LAYOUT), "state layout overflows or overlaps");

/// Check a layout table: fields in enum order, non-empty, inside the word,
/// and pairwise disjoint
pub fn validate(layout: &[FieldSpec]) -> Result<()> {
    let mut claimed = 0u64;
    for (i, spec) in layout.iter().enumerate() {
        if spec.field as usize != i {
            return Err(PopulationError::InvalidLayout(format!(
                "row {} holds the {} field",
                i, spec.name
            )));
        }
        if spec.width == 0 {
            return Err(PopulationError::InvalidLayout(format!(
                "{} has zero width",
                spec.name
            )));
        }
        if spec.offset + spec.width > WORD_BITS {
            return Err(PopulationError::InvalidLayout(format!(
                "{} ends at bit {} past the {}-bit word",
                spec.name,
                spec.offset + spec.width,
                WORD_BITS
            )));
        }
        if claimed & spec.mask() != 0 {
            return Err(PopulationError::InvalidLayout(format!(
                "{} overlaps an earlier field",
                spec.name
            )));
        }
        claimed |= spec.mask();
    }
    Ok(())
}
