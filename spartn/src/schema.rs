//! Declarative payload schemas
//!
//! Each decodable message identity has a static tree of [`Node`]s describing
//! its payload: terminal fields, repeating groups and conditional groups. The
//! trees are plain `static` data shared by every decode.

mod fields;
pub(crate) mod payloads;
pub(crate) mod tables;

use std::fmt;

pub use fields::FieldId;
pub use tables::SPARE_SIGNAL;

/// How many bits a field occupies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    Fixed(u16),
    /// Indexed by the decoded value of a prior length-selector field
    Selected {
        selector: FieldId,
        widths: &'static [u16],
    },
    /// Equal to the decoded value of a prior field
    ValueOf(FieldId),
    /// One bit per node of a `(lat + 1) x (lon + 1)` grid
    GridNodes { lat: FieldId, lon: FieldId },
}

/// Semantic value attached to each set bit of a bitmask
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expansion {
    /// Satellite PRN, the 1-based bit position
    Satellite,
    /// Phase bias signal, labelled by bit position
    PhaseBias(&'static [&'static str]),
    /// Code bias signal, labelled by bit position
    CodeBias(&'static [&'static str]),
}

/// Value read from the expansion of an enclosing bitmask group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Prn,
    PhaseBias,
    CodeBias,
}

impl Lookup {
    pub(crate) fn matches(self, expansion: &Expansion) -> bool {
        matches!(
            (self, expansion),
            (Lookup::Prn, Expansion::Satellite)
                | (Lookup::PhaseBias, Expansion::PhaseBias(_))
                | (Lookup::CodeBias, Expansion::CodeBias(_))
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Integer,
    Enumeration,
    Bitmask(Option<Expansion>),
    /// `raw * resolution + min`
    Scaled {
        resolution: f64,
        min: f64,
    },
    /// Not present in the bitstream
    Derived(Lookup),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub width: Width,
    pub kind: FieldKind,
}

/// Repeat count of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(u16),
    ValueOf(FieldId),
    /// The named field holds the count minus one
    ValueOfPlusOne(FieldId),
    /// One iteration per set bit of the named bitmask, most significant first
    SetBits(FieldId),
}

/// Presence condition of a conditional group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Equals {
        field: FieldId,
        value: u64,
    },
    OneOf {
        field: FieldId,
        values: &'static [u64],
    },
}

impl Predicate {
    pub fn field(&self) -> FieldId {
        match self {
            Predicate::Equals { field, .. } | Predicate::OneOf { field, .. } => *field,
        }
    }

    pub fn holds(&self, value: u64) -> bool {
        match self {
            Predicate::Equals { value: expected, .. } => value == *expected,
            Predicate::OneOf { values, .. } => values.contains(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Field(FieldId),
    Group {
        count: Count,
        children: &'static [Node],
    },
    Conditional {
        predicate: Predicate,
        children: &'static [Node],
    },
}

/// Root of a payload schema
pub type Schema = &'static [Node];

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
